//! Scoring primitives: normalized correlation, Hamming distance, and the
//! sliding-window orientation hint.

use crate::util::math::{dot, snrm2};
use crate::geometry::DIRECTION_NUMBER;

/// Correlation reject threshold on the slope `beta`.
pub const BETA_THRESHOLD: f32 = 0.1;
/// Correlation reject threshold on the intercept `gamma`.
pub const GAMMA_THRESHOLD: f32 = 1.0;
/// Window width divisor for the sliding intensity reducer.
pub const KERNEL_SIZE: usize = 8;

/// Normalized correlation between two equal-length descriptors.
///
/// Fits `y ~= beta * x + gamma` in the least-squares sense and rejects the
/// pair as degenerate (returning 0) when the slope is too close to flat or
/// too extreme, or when the intercept is too large. Otherwise returns the
/// signed correlation coefficient scaled by `beta`'s sign.
pub fn normalized_correlation(x: &[f32], y: &[f32]) -> f32 {
    debug_assert_eq!(x.len(), y.len());
    let n = x.len();
    if n == 0 {
        return 0.0;
    }
    let mean_x = x.iter().sum::<f32>() / n as f32;
    let mean_y = y.iter().sum::<f32>() / n as f32;

    let xp: Vec<f32> = x.iter().map(|v| v - mean_x).collect();
    let yp: Vec<f32> = y.iter().map(|v| v - mean_y).collect();

    let s = dot(&xp, &xp);
    if s <= 0.0 {
        return 0.0;
    }
    let beta = dot(&xp, &yp) / s;
    let gamma = mean_y - beta * mean_x;

    if beta.abs() < BETA_THRESHOLD || beta.abs() > 1.0 / BETA_THRESHOLD || gamma.abs() > GAMMA_THRESHOLD
    {
        return 0.0;
    }

    let norm_xp = snrm2(&xp);
    let norm_yp = snrm2(&yp);
    if norm_xp <= 0.0 || norm_yp <= 0.0 {
        return 0.0;
    }
    (beta * s) / (norm_xp * norm_yp)
}

/// Hamming distance between two BRIEF descriptors of common even length.
///
/// The descriptor is interpreted as `m` pairs, first half against second
/// half: bit `i` is `sign(d[i] - d[i + m])`. Returns the fraction of bits
/// that disagree, a ratio in `[0, 1]`.
pub fn hamming_distance(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    debug_assert_eq!(a.len() % 2, 0);
    let m = a.len() / 2;
    if m == 0 {
        return 0.0;
    }
    let mismatches = (0..m)
        .filter(|&i| {
            let bit_a = (a[i] - a[i + m]).signum();
            let bit_b = (b[i] - b[i + m]).signum();
            bit_a != bit_b
        })
        .count();
    mismatches as f32 / m as f32
}

/// Sliding-window argmax over the circular extension of `v`, returning the
/// window start position normalized to `[0, 1)`.
///
/// The window width is `v.len() / KERNEL_SIZE` (minimum 1). The initial
/// window sum is computed once and then updated incrementally as the window
/// advances, per sample, rather than recomputed from scratch.
pub fn intensity_peak_position(v: &[f32]) -> f32 {
    let len = v.len();
    if len == 0 {
        return 0.0;
    }
    let window = (len / KERNEL_SIZE).max(1);
    if window >= len {
        return 0.0;
    }

    let mut sum: f32 = v[..window].iter().sum();
    let mut best_sum = sum;
    let mut best_pos = 0usize;

    for start in 1..len {
        let leaving = v[start - 1];
        let entering = v[(start + window - 1) % len];
        sum += entering - leaving;
        if sum > best_sum {
            best_sum = sum;
            best_pos = start;
        }
    }

    best_pos as f32 / len as f32
}

/// Probable rotation index from a target intensity vector and the query's
/// stored intensity descriptor (both the length of that query's own circle
/// group, at most `CIRCLES_NUMBER`).
///
/// Computes the elementwise difference, takes its mean, multiplies by
/// `DIRECTION_NUMBER`, floors to an integer, and wraps into
/// `[0, DIRECTION_NUMBER)`.
pub fn probable_rotation(target_intensity: &[f32], query_intensity: &[f32]) -> usize {
    debug_assert_eq!(target_intensity.len(), query_intensity.len());
    if target_intensity.is_empty() {
        return 0;
    }
    let mean_diff: f32 = target_intensity
        .iter()
        .zip(query_intensity.iter())
        .map(|(t, q)| t - q)
        .sum::<f32>()
        / target_intensity.len() as f32;

    let scaled = (mean_diff * DIRECTION_NUMBER as f32).floor() as i64;
    let n = DIRECTION_NUMBER as i64;
    (((scaled % n) + n) % n) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_correlation_self_is_one() {
        let x = [1.0f32, 2.0, 3.0, 5.0, 1.0];
        let score = normalized_correlation(&x, &x);
        assert!((score - 1.0).abs() < 1e-4);
    }

    #[test]
    fn normalized_correlation_is_symmetric_when_it_passes_the_gate() {
        let x = [1.0f32, 2.0, 3.0, 5.0, 1.0];
        let y = [2.0f32, 3.5, 5.0, 8.0, 2.0];
        let xy = normalized_correlation(&x, &y);
        let yx = normalized_correlation(&y, &x);
        assert!((xy - yx).abs() < 1e-4);
    }

    #[test]
    fn normalized_correlation_rejects_flat_patches() {
        let x = [5.0f32; 6];
        let y = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        assert_eq!(normalized_correlation(&x, &y), 0.0);
    }

    #[test]
    fn hamming_distance_self_is_zero() {
        let d = [1.0f32, -2.0, 3.0, 0.5, -0.5, 2.0];
        assert_eq!(hamming_distance(&d, &d), 0.0);
    }

    #[test]
    fn hamming_distance_is_bounded() {
        let a = [1.0f32, -1.0, 1.0, -1.0];
        let b = [-1.0f32, 1.0, -1.0, 1.0];
        let d = hamming_distance(&a, &b);
        assert!((0.0..=1.0).contains(&d));
    }

    #[test]
    fn intensity_peak_position_finds_bright_window() {
        let mut v = vec![0.0f32; 64];
        for sample in v.iter_mut().skip(20).take(8) {
            *sample = 10.0;
        }
        let pos = intensity_peak_position(&v);
        assert!((0.28..0.36).contains(&pos));
    }

    #[test]
    fn probable_rotation_wraps_into_range() {
        let target = vec![1.0f32; 15];
        let query = vec![0.0f32; 15];
        let idx = probable_rotation(&target, &query);
        assert!(idx < DIRECTION_NUMBER);
    }

    #[test]
    fn probable_rotation_is_zero_for_identical_vectors() {
        let v = vec![0.3f32; 15];
        assert_eq!(probable_rotation(&v, &v), 0);
    }
}
