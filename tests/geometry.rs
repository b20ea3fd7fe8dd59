use cascade_matcher::geometry::{circle_radii, generate_brief_group, generate_circle, DIRECTION_NUMBER};

#[test]
fn generate_circle_has_no_duplicate_points() {
    let set = generate_circle(10);
    let mut seen = std::collections::HashSet::new();
    for p in &set.points {
        assert!(seen.insert((p.x, p.y)), "duplicate point {:?}", p);
    }
}

#[test]
fn generate_circle_points_lie_near_the_target_radius() {
    let radius = 20;
    let set = generate_circle(radius);
    for p in &set.points {
        let dist = ((p.x * p.x + p.y * p.y) as f32).sqrt();
        assert!((dist - radius as f32).abs() <= 1.5, "{:?} at distance {dist}", p);
    }
}

#[test]
fn generate_circle_points_are_sorted_by_polar_angle() {
    let set = generate_circle(15);
    let upper: Vec<_> = set
        .points
        .iter()
        .filter(|p| p.y > 0 || (p.y == 0 && p.x >= 0))
        .collect();
    for w in upper.windows(2) {
        assert!(w[0].x >= w[1].x, "upper half should be x-descending: {:?} then {:?}", w[0], w[1]);
    }
}

#[test]
fn circle_radii_respects_min_dimension() {
    let radii = circle_radii(40);
    assert!(!radii.is_empty());
    assert!(radii.iter().all(|&r| r >= 2 && r < 20));
}

#[test]
fn circle_radii_degenerate_when_too_small() {
    assert!(circle_radii(2).is_empty());
}

#[test]
fn circle_radii_stays_distinct_when_range_is_tight() {
    // min_dimension=32 gives max_radius=15, a range of only 14 integers in
    // [2, 15], one short of CIRCLES_NUMBER=15. This must not be treated as
    // degenerate (max_radius=15 is nowhere near < MIN_CIRCLE_RADIUS=2) and
    // must not collapse two indices onto the same radius.
    let radii = circle_radii(32);
    assert_eq!(radii.len(), 14);
    let mut sorted = radii.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), 14, "radii must all be distinct: {radii:?}");
}

#[test]
fn brief_group_has_expected_direction_count_and_point_count() {
    let group = generate_brief_group(64);
    assert_eq!(group.len(), DIRECTION_NUMBER);
    for set in &group {
        assert_eq!(set.points.len(), 32 * 64);
    }
}

#[test]
fn brief_group_offsets_fit_within_their_own_query_radius() {
    let n = 48usize;
    let group = generate_brief_group(n);
    let half = (n / 2) as i32;
    for set in &group {
        for p in &set.points {
            assert!(p.x.abs() < half && p.y.abs() < half, "{:?} exceeds half-dimension {half}", p);
        }
    }
}
