//! The three-stage per-pixel cascade decision.

use crate::candidate::Match;
use crate::descriptor::evaluate_circle_group_raw;
use crate::descriptor::evaluate_brief;
use crate::query::QueryIndex;
use crate::raster::OwnedRaster;
use crate::scorer::{hamming_distance, intensity_peak_position, normalized_correlation, probable_rotation};
use crate::util::{CorrMatchError, CorrMatchResult};

/// Stage 1 reject threshold: circle-filter correlation must exceed this.
pub const CIRCLE_FILTER_THRESHOLD: f32 = 0.95;
/// Stage 3 reject threshold: BRIEF Hamming distance must be strictly below this.
pub const BRIEF_FILTER_THRESHOLD: f32 = 0.25;

/// Per-pixel cascade thresholds.
#[derive(Copy, Clone, Debug)]
pub struct CascadeConfig {
    pub circle_filter_threshold: f32,
    pub brief_filter_threshold: f32,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            circle_filter_threshold: CIRCLE_FILTER_THRESHOLD,
            brief_filter_threshold: BRIEF_FILTER_THRESHOLD,
        }
    }
}

impl CascadeConfig {
    pub fn validate(&self) -> CorrMatchResult<()> {
        if !self.circle_filter_threshold.is_finite() {
            return Err(CorrMatchError::InvalidConfig {
                reason: "circle_filter_threshold must be finite",
            });
        }
        if !(0.0..=1.0).contains(&self.brief_filter_threshold) {
            return Err(CorrMatchError::InvalidConfig {
                reason: "brief_filter_threshold must be within [0, 1]",
            });
        }
        Ok(())
    }
}

/// Runs the three-stage cascade for one candidate center against every
/// `QueryScale` in `index`, returning the single best-scoring match if all
/// three stages accept, or `None` if any stage rejects.
pub fn evaluate_at(
    index: &QueryIndex,
    target: &OwnedRaster,
    x: usize,
    y: usize,
    cfg: &CascadeConfig,
) -> Option<Match> {
    let mut best: Option<(usize, f32, Vec<Vec<f32>>)> = None;

    for (scale_idx, scale) in index.scales().iter().enumerate() {
        let Some(raw) = evaluate_circle_group_raw(target, scale.circle_group(), x, y) else {
            continue;
        };
        let sums: Vec<f32> = raw.iter().map(|samples| samples.iter().sum()).collect();
        let score = normalized_correlation(&sums, scale.circle_descriptor());
        if best.as_ref().map_or(true, |(_, best_score, _)| score > *best_score) {
            best = Some((scale_idx, score, raw));
        }
    }

    let (winner_idx, winner_score, winner_raw) = best?;
    if winner_score <= cfg.circle_filter_threshold {
        return None;
    }
    let winner = &index.scales()[winner_idx];

    let target_intensity: Vec<f32> = winner_raw.iter().map(|samples| intensity_peak_position(samples)).collect();
    let rotation_idx = probable_rotation(&target_intensity, winner.intensity_descriptor());

    let brief_points = &winner.brief_group()[rotation_idx];
    let target_brief = evaluate_brief(target, brief_points, x, y)?;
    let query_brief = winner.brief_descriptor(rotation_idx);
    let distance = hamming_distance(&target_brief, query_brief);
    if distance >= cfg.brief_filter_threshold {
        return None;
    }

    Some(Match::new(winner_idx, x, y, distance))
}
