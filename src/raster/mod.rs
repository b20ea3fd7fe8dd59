//! Raster: a 2-D grayscale luminance image.
//!
//! `ImageView` is a borrowed 2D view into a 1D buffer with an explicit stride.
//! The stride counts elements between the starts of consecutive rows, so a
//! stride larger than the width represents padded rows. ROI slices are zero-copy
//! views into the same backing slice and retain the original stride.
//!
//! `OwnedRaster` is the owned, contiguous single-precision raster that the
//! rest of the crate operates on. Samples are luminance values in `[0, 255]`;
//! division by 255 is intentionally never applied (see `ops::convert_bgr_to_luminance`).

use crate::util::{CorrMatchError, CorrMatchResult};

#[cfg(feature = "image-io")]
pub mod io;
mod ops;

/// Borrowed 2D image view with an explicit stride.
#[derive(Copy, Clone)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> CorrMatchResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(data: &'a [T], width: usize, height: usize, stride: usize) -> CorrMatchResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(CorrMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y.checked_mul(self.stride)?.checked_add(x)?;
        self.data.get(idx)
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }

    /// Returns a zero-copy ROI view into the same backing buffer.
    pub fn roi(&self, x: usize, y: usize, width: usize, height: usize) -> CorrMatchResult<Self> {
        if width == 0 || height == 0 {
            return Err(CorrMatchError::InvalidDimensions { width, height });
        }
        let img_width = self.width;
        let img_height = self.height;
        let oob = || CorrMatchError::RoiOutOfBounds {
            x,
            y,
            width,
            height,
            img_width,
            img_height,
        };
        if x >= img_width || y >= img_height {
            return Err(oob());
        }
        let end_x = x.checked_add(width).ok_or_else(oob)?;
        let end_y = y.checked_add(height).ok_or_else(oob)?;
        if end_x > img_width || end_y > img_height {
            return Err(oob());
        }
        let start = y
            .checked_mul(self.stride)
            .and_then(|v| v.checked_add(x))
            .ok_or_else(oob)?;
        let data = self.data.get(start..).ok_or_else(oob)?;
        Self::new(data, width, height, self.stride)
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> CorrMatchResult<usize> {
    if width == 0 || height == 0 {
        return Err(CorrMatchError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(CorrMatchError::InvalidStride { width, stride });
    }
    let needed = (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(CorrMatchError::InvalidDimensions { width, height })?;
    Ok(needed)
}

/// Borrowed view specialized to luminance samples.
pub type RasterView<'a> = ImageView<'a, f32>;

/// Owned, contiguous single-precision grayscale raster.
#[derive(Clone, Debug)]
pub struct OwnedRaster {
    data: Vec<f32>,
    width: usize,
    height: usize,
}

impl OwnedRaster {
    /// Builds a raster from a contiguous row-major buffer.
    pub fn new(data: Vec<f32>, width: usize, height: usize) -> CorrMatchResult<Self> {
        if width == 0 || height == 0 {
            return Err(CorrMatchError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(CorrMatchError::InvalidDimensions { width, height })?;
        if data.len() != needed {
            return Err(CorrMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns the raster width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the raster height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns a borrowed view of the raster.
    pub fn view(&self) -> RasterView<'_> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }

    /// Returns the backing row-major buffer.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Reads the sample at `(x, y)`.
    ///
    /// The core never issues out-of-bounds reads (the fit predicate is
    /// checked before any descriptor evaluation touches the raster), so this
    /// panics rather than returning a sentinel value on misuse.
    pub fn at(&self, x: usize, y: usize) -> f32 {
        *self
            .view()
            .get(x, y)
            .expect("raster read must satisfy the fit predicate")
    }
}

#[cfg(test)]
mod tests {
    use super::{ImageView, OwnedRaster};
    use crate::util::CorrMatchError;

    #[test]
    fn image_view_rejects_invalid_dimensions() {
        let data = [0u8; 4];
        let err = ImageView::from_slice(&data, 0, 1).err().unwrap();
        assert_eq!(
            err,
            CorrMatchError::InvalidDimensions {
                width: 0,
                height: 1,
            }
        );
    }

    #[test]
    fn image_view_rejects_invalid_stride() {
        let data = [0u8; 8];
        let err = ImageView::new(&data, 4, 1, 3).err().unwrap();
        assert_eq!(
            err,
            CorrMatchError::InvalidStride {
                width: 4,
                stride: 3,
            }
        );
    }

    #[test]
    fn owned_raster_roundtrips_samples() {
        let raster = OwnedRaster::new(vec![0.0, 1.0, 2.0, 3.0], 2, 2).unwrap();
        assert_eq!(raster.at(0, 0), 0.0);
        assert_eq!(raster.at(1, 0), 1.0);
        assert_eq!(raster.at(0, 1), 2.0);
        assert_eq!(raster.at(1, 1), 3.0);
    }

    #[test]
    fn owned_raster_rejects_mismatched_buffer_len() {
        let err = OwnedRaster::new(vec![0.0; 3], 2, 2).err().unwrap();
        assert_eq!(err, CorrMatchError::BufferTooSmall { needed: 4, got: 3 });
    }

    #[test]
    fn roi_slices_preserve_stride_and_values() {
        let data: [u8; 9] = [0, 1, 2, 3, 4, 5, 6, 7, 8];
        let view = ImageView::new(&data, 3, 3, 3).unwrap();
        let roi = view.roi(1, 1, 2, 2).unwrap();
        assert_eq!(*roi.get(0, 0).unwrap(), 4);
        assert_eq!(*roi.get(1, 1).unwrap(), 8);
    }

    #[test]
    fn roi_out_of_bounds_is_rejected() {
        let data = [0u8; 9];
        let view = ImageView::from_slice(&data, 3, 3).unwrap();
        let err = view.roi(2, 2, 2, 2).err().unwrap();
        assert!(matches!(err, CorrMatchError::RoiOutOfBounds { .. }));
    }
}
