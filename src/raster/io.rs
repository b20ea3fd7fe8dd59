//! Loading images via the `image` crate and converting to luminance rasters.
//!
//! Available when the `image-io` feature is enabled.

use super::OwnedRaster;
use crate::util::{CorrMatchError, CorrMatchResult};
use std::path::Path;

/// Converts an interleaved BGR byte buffer to a luminance raster.
///
/// Uses coefficients R=0.299, G=0.587, B=0.114. Division by 255 is
/// intentionally not applied; the sample range stays `[0, 255]`.
pub fn convert_bgr_to_luminance(
    bgr: &[u8],
    width: usize,
    height: usize,
) -> CorrMatchResult<OwnedRaster> {
    let needed = width
        .checked_mul(height)
        .and_then(|px| px.checked_mul(3))
        .ok_or(CorrMatchError::InvalidDimensions { width, height })?;
    if bgr.len() != needed {
        return Err(CorrMatchError::BufferTooSmall {
            needed,
            got: bgr.len(),
        });
    }
    let data = bgr
        .chunks_exact(3)
        .map(|px| {
            let b = px[0] as f32;
            let g = px[1] as f32;
            let r = px[2] as f32;
            0.299 * r + 0.587 * g + 0.114 * b
        })
        .collect();
    OwnedRaster::new(data, width, height)
}

/// Reassembles an RGB8 buffer as BGR and converts it to a luminance raster.
fn convert_rgb_to_luminance(rgb: &[u8], width: usize, height: usize) -> CorrMatchResult<OwnedRaster> {
    let mut bgr = Vec::with_capacity(rgb.len());
    for px in rgb.chunks_exact(3) {
        bgr.push(px[2]);
        bgr.push(px[1]);
        bgr.push(px[0]);
    }
    convert_bgr_to_luminance(&bgr, width, height)
}

/// Loads an image from disk and converts it to a luminance raster.
///
/// The `image` crate decodes to RGB8 regardless of source format; the bytes
/// are reordered to BGR before conversion so the channel-order contract in
/// the matcher's luminance formula holds for every supported input format.
pub fn load_raster<P: AsRef<Path>>(path: P) -> CorrMatchResult<OwnedRaster> {
    let img = image::open(path).map_err(|err| CorrMatchError::ImageIo {
        reason: err.to_string(),
    })?;
    let rgb = img.to_rgb8();
    let width = rgb.width() as usize;
    let height = rgb.height() as usize;
    convert_rgb_to_luminance(rgb.as_raw(), width, height)
}

#[cfg(test)]
mod tests {
    use super::convert_bgr_to_luminance;

    #[test]
    fn convert_bgr_to_luminance_uses_expected_coefficients() {
        // Pure red in BGR order: (B=0, G=0, R=255).
        let bgr = [0u8, 0, 255];
        let raster = convert_bgr_to_luminance(&bgr, 1, 1).unwrap();
        assert!((raster.at(0, 0) - 255.0 * 0.299).abs() < 1e-3);
    }

    #[test]
    fn convert_bgr_to_luminance_rejects_mismatched_buffer() {
        let bgr = [0u8; 5];
        assert!(convert_bgr_to_luminance(&bgr, 2, 1).is_err());
    }

    #[test]
    fn convert_bgr_to_luminance_does_not_normalize_by_255() {
        let bgr = [255u8, 255, 255];
        let raster = convert_bgr_to_luminance(&bgr, 1, 1).unwrap();
        assert!((raster.at(0, 0) - 255.0).abs() < 1e-3);
    }
}
