//! BRIEF-style rotated point-set generation.
//!
//! Builds one randomly-sampled point set and rotates it `DIRECTION_NUMBER`
//! times to cover a full circle of candidate orientations. The PRNG is
//! seeded identically on every call so a query's index and later matching
//! agree on the exact same point coordinates.

use super::{Point, PointSet};
use crate::util::math::rotate2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use std::f32::consts::PI;

/// Number of rotated BRIEF variants generated per query scale.
pub const DIRECTION_NUMBER: usize = 36;

/// Fixed PRNG seed so that BRIEF point sets are reproducible across
/// invocations (query indexing and matching must agree on the same points).
const BRIEF_SEED: u64 = 0;

/// Generates `DIRECTION_NUMBER` rotated BRIEF point sets for a query whose
/// minimum dimension is `n`.
///
/// Each point set has `32 * n` points, drawn from `64 * n` samples of a
/// zero-mean normal distribution with variance `n^2 / 25` (the first `32n`
/// samples are x-coordinates, the next `32n` are y-coordinates of the
/// initial, unrotated point set). Successive variants apply the Givens
/// rotation by `2*pi/DIRECTION_NUMBER` to the previous variant's
/// floating-point coordinates before truncating to integer points, so
/// rounding error does not accumulate beyond one rotation step per variant.
pub fn generate_brief_group(n: usize) -> Vec<PointSet> {
    if n == 0 {
        return Vec::new();
    }
    let count = 32 * n;
    let variance = (n * n) as f32 / 25.0;
    let std_dev = variance.sqrt();
    let normal = Normal::new(0.0f32, std_dev).expect("variance is non-negative");
    let mut rng = ChaCha8Rng::seed_from_u64(BRIEF_SEED);

    let mut xs: Vec<f32> = (0..count).map(|_| normal.sample(&mut rng)).collect();
    let mut ys: Vec<f32> = (0..count).map(|_| normal.sample(&mut rng)).collect();

    // Clamp to one pixel short of a query raster's half-dimension so that
    // every generated point set fits at the exact center of the raster it
    // was generated for, regardless of how far a sampled offset landed in
    // the tail of the normal distribution.
    let clamp = ((n / 2) as i32 - 1).max(0);

    let theta = 2.0 * PI / DIRECTION_NUMBER as f32;
    let mut groups = Vec::with_capacity(DIRECTION_NUMBER);
    for _ in 0..DIRECTION_NUMBER {
        let points = xs
            .iter()
            .zip(ys.iter())
            .map(|(&x, &y)| {
                Point::new(
                    (x.floor() as i32).clamp(-clamp, clamp),
                    (y.floor() as i32).clamp(-clamp, clamp),
                )
            })
            .collect();
        groups.push(PointSet::from_points(points));

        for (x, y) in xs.iter_mut().zip(ys.iter_mut()) {
            let (rx, ry) = rotate2(*x, *y, theta);
            *x = rx;
            *y = ry;
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_brief_group_has_expected_cardinality() {
        let groups = generate_brief_group(8);
        assert_eq!(groups.len(), DIRECTION_NUMBER);
        for group in &groups {
            assert_eq!(group.len(), 32 * 8);
        }
    }

    #[test]
    fn generate_brief_group_is_deterministic() {
        let a = generate_brief_group(6);
        let b = generate_brief_group(6);
        for (ga, gb) in a.iter().zip(b.iter()) {
            assert_eq!(ga.points(), gb.points());
        }
    }

    #[test]
    fn generate_brief_group_degenerate_for_zero_dimension() {
        assert!(generate_brief_group(0).is_empty());
    }
}
