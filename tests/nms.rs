use cascade_matcher::candidate::nms::suppress;
use cascade_matcher::query::{IndexConfig, QueryIndex};
use cascade_matcher::raster::OwnedRaster;
use cascade_matcher::Match;

fn gradient_raster(size: usize) -> OwnedRaster {
    let data = (0..size * size).map(|i| (i % 101) as f32).collect();
    OwnedRaster::new(data, size, size).unwrap()
}

fn single_scale_index(size: usize) -> QueryIndex {
    let cfg = IndexConfig {
        scales_number: 1,
        ..IndexConfig::default()
    };
    QueryIndex::build(vec![vec![gradient_raster(size)]], &cfg).unwrap()
}

#[test]
fn suppress_collapses_a_cluster_of_near_duplicate_matches_into_one() {
    let index = single_scale_index(48);
    let candidates = vec![
        Match::new(0, 200, 200, 0.20),
        Match::new(0, 202, 199, 0.05),
        Match::new(0, 198, 203, 0.30),
    ];
    let result = suppress(candidates, &index);
    assert_eq!(result.len(), 1);
}

#[test]
fn suppress_keeps_matches_from_distinct_scales_separate_when_far_apart() {
    let index = single_scale_index(48);
    let far_apart = vec![Match::new(0, 50, 50, 0.1), Match::new(0, 700, 700, 0.1)];
    let result = suppress(far_apart, &index);
    assert_eq!(result.len(), 2);
}

#[test]
fn suppress_output_is_sorted_by_query_scale_index() {
    let index = single_scale_index(48);
    let candidates = vec![Match::new(0, 900, 900, 0.2), Match::new(0, 10, 10, 0.05)];
    let result = suppress(candidates, &index);
    assert!(result.windows(2).all(|w| w[0].query_scale_index <= w[1].query_scale_index));
}

#[test]
fn suppress_is_a_no_op_on_empty_input() {
    let index = single_scale_index(48);
    assert!(suppress(Vec::new(), &index).is_empty());
}
