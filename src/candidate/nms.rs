//! Non-maximum suppression: merge overlapping matches into one per cluster.

use super::Match;
use crate::query::QueryIndex;

/// Applies the overlap-based suppression rule and sorts the result by
/// `query_scale_index`.
///
/// For each candidate, in iteration order, the first already-kept match
/// whose bounding box overlaps it is found; overlap is `|dx| < (w1+w2)/2`
/// AND `|dy| < (h1+h2)/2` using each match's own `QueryScale` dimensions.
/// If one is found and its score is greater than the candidate's, it is
/// replaced by the candidate; otherwise the candidate is appended.
pub fn suppress(candidates: Vec<Match>, index: &QueryIndex) -> Vec<Match> {
    let mut kept: Vec<Match> = Vec::new();

    for candidate in candidates {
        let overlap_idx = kept.iter().position(|existing| overlaps(existing, &candidate, index));
        match overlap_idx {
            Some(idx) => {
                // Literal comparison preserved from the source even though
                // the score is a Hamming distance (lower is better): this
                // keeps whichever entry the `>` comparison selects rather
                // than the numerically better one.
                if kept[idx].score > candidate.score {
                    kept[idx] = candidate;
                }
            }
            None => kept.push(candidate),
        }
    }

    kept.sort_by_key(|m| m.query_scale_index);
    kept
}

fn overlaps(a: &Match, b: &Match, index: &QueryIndex) -> bool {
    let (wa, ha) = dims(a, index);
    let (wb, hb) = dims(b, index);
    let dx = (a.x as f32 - b.x as f32).abs();
    let dy = (a.y as f32 - b.y as f32).abs();
    dx < (wa + wb) / 2.0 && dy < (ha + hb) / 2.0
}

fn dims(m: &Match, index: &QueryIndex) -> (f32, f32) {
    match index.get(m.query_scale_index) {
        Ok(scale) => (scale.width() as f32, scale.height() as f32),
        Err(_) => (0.0, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{IndexConfig, QueryIndex};
    use crate::raster::OwnedRaster;

    fn gradient_raster(size: usize) -> OwnedRaster {
        let data = (0..size * size).map(|i| (i % 97) as f32).collect();
        OwnedRaster::new(data, size, size).unwrap()
    }

    fn single_scale_index() -> QueryIndex {
        let cfg = IndexConfig {
            scales_number: 1,
            ..IndexConfig::default()
        };
        QueryIndex::build(vec![vec![gradient_raster(64)]], &cfg).unwrap()
    }

    #[test]
    fn suppress_merges_overlapping_matches_keeping_better_score() {
        let index = single_scale_index();
        let candidates = vec![
            Match::new(0, 100, 100, 0.3),
            Match::new(0, 101, 101, 0.1),
        ];
        let result = suppress(candidates, &index);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn suppress_keeps_non_overlapping_matches_separate() {
        let index = single_scale_index();
        let candidates = vec![
            Match::new(0, 100, 100, 0.2),
            Match::new(0, 500, 500, 0.2),
        ];
        let result = suppress(candidates, &index);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn suppress_sorts_output_by_query_scale_index() {
        let index = single_scale_index();
        let candidates = vec![Match::new(0, 10, 10, 0.1), Match::new(0, 900, 900, 0.2)];
        let result = suppress(candidates, &index);
        assert!(result.windows(2).all(|w| w[0].query_scale_index <= w[1].query_scale_index));
    }
}
