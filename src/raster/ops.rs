//! Resize, rotate and blur operations on `OwnedRaster`.

use super::OwnedRaster;
use crate::util::{CorrMatchError, CorrMatchResult};

impl OwnedRaster {
    /// Resamples the raster by `pct`.
    ///
    /// `pct` is ordinarily a percentage (`150.0` means 150% of the source
    /// size). A negative value is accepted for compatibility with call
    /// sites that already carry the scale factor in hundredths (`-80.0` is
    /// equivalent to `80.0`) — both reduce to the same magnitude divided by
    /// 100.
    pub fn resize(&self, pct: f32) -> CorrMatchResult<OwnedRaster> {
        let factor = pct.abs() / 100.0;
        if !factor.is_finite() || factor <= 0.0 {
            return Err(CorrMatchError::InvalidConfig {
                reason: "resize factor must be finite and positive",
            });
        }
        let new_width = ((self.width as f32) * factor).round().max(1.0) as usize;
        let new_height = ((self.height as f32) * factor).round().max(1.0) as usize;
        let mut data = Vec::with_capacity(new_width * new_height);
        let src_w = self.width as f32;
        let src_h = self.height as f32;
        for y in 0..new_height {
            let sy = ((y as f32 + 0.5) / new_height as f32) * src_h - 0.5;
            for x in 0..new_width {
                let sx = ((x as f32 + 0.5) / new_width as f32) * src_w - 0.5;
                data.push(self.sample_bilinear(sx, sy));
            }
        }
        OwnedRaster::new(data, new_width, new_height)
    }

    /// Rotates the raster counter-clockwise by `degrees`, growing the output
    /// canvas so the whole rotated content fits. Margins are filled with 0.
    pub fn rotate(&self, degrees: f32) -> OwnedRaster {
        let theta = degrees.to_radians();
        let (sin_t, cos_t) = theta.sin_cos();
        let w = self.width as f32;
        let h = self.height as f32;
        let new_w = (w * cos_t.abs() + h * sin_t.abs()).ceil().max(1.0) as usize;
        let new_h = (w * sin_t.abs() + h * cos_t.abs()).ceil().max(1.0) as usize;

        let cx_src = w / 2.0;
        let cy_src = h / 2.0;
        let cx_dst = new_w as f32 / 2.0;
        let cy_dst = new_h as f32 / 2.0;

        let mut data = vec![0.0f32; new_w * new_h];
        for y in 0..new_h {
            let dy = y as f32 + 0.5 - cy_dst;
            for x in 0..new_w {
                let dx = x as f32 + 0.5 - cx_dst;
                // Inverse rotation maps destination back into source space.
                let sx = cos_t * dx + sin_t * dy + cx_src;
                let sy = -sin_t * dx + cos_t * dy + cy_src;
                if sx >= 0.0 && sy >= 0.0 && sx < w && sy < h {
                    data[y * new_w + x] = self.sample_bilinear(sx - 0.5, sy - 0.5);
                }
            }
        }
        OwnedRaster {
            data,
            width: new_w,
            height: new_h,
        }
    }

    /// Applies a separable Gaussian blur with standard deviation `sigma`.
    pub fn blur(&self, sigma: f32) -> OwnedRaster {
        if sigma <= 0.0 {
            return self.clone();
        }
        let kernel = gaussian_kernel(sigma);
        let radius = (kernel.len() / 2) as isize;

        let mut horizontal = vec![0.0f32; self.data.len()];
        for y in 0..self.height {
            for x in 0..self.width {
                let mut acc = 0.0f32;
                for (k, weight) in kernel.iter().enumerate() {
                    let offset = k as isize - radius;
                    let sx = clamp_coord(x as isize + offset, self.width);
                    acc += weight * self.data[y * self.width + sx];
                }
                horizontal[y * self.width + x] = acc;
            }
        }

        let mut vertical = vec![0.0f32; self.data.len()];
        for y in 0..self.height {
            for x in 0..self.width {
                let mut acc = 0.0f32;
                for (k, weight) in kernel.iter().enumerate() {
                    let offset = k as isize - radius;
                    let sy = clamp_coord(y as isize + offset, self.height);
                    acc += weight * horizontal[sy * self.width + x];
                }
                vertical[y * self.width + x] = acc;
            }
        }

        OwnedRaster {
            data: vertical,
            width: self.width,
            height: self.height,
        }
    }

    fn sample_bilinear(&self, x: f32, y: f32) -> f32 {
        let x = x.clamp(0.0, (self.width - 1) as f32);
        let y = y.clamp(0.0, (self.height - 1) as f32);
        let x0 = x.floor() as usize;
        let y0 = y.floor() as usize;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let fx = x - x0 as f32;
        let fy = y - y0 as f32;

        let top = self.data[y0 * self.width + x0] * (1.0 - fx)
            + self.data[y0 * self.width + x1] * fx;
        let bottom = self.data[y1 * self.width + x0] * (1.0 - fx)
            + self.data[y1 * self.width + x1] * fx;
        top * (1.0 - fy) + bottom * fy
    }
}

fn clamp_coord(v: isize, len: usize) -> usize {
    v.clamp(0, len as isize - 1) as usize
}

fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (sigma * 3.0).ceil().max(1.0) as isize;
    let mut kernel: Vec<f32> = (-radius..=radius)
        .map(|i| {
            let x = i as f32;
            (-(x * x) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= sum;
    }
    kernel
}
