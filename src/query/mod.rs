//! Query indexing: precomputed per-scale geometry and descriptors for every
//! input pattern, built once before the target sweep begins.

use crate::descriptor::{evaluate_circle_group, evaluate_circle_group_raw, evaluate_brief};
use crate::geometry::{circle_radii, generate_brief_group, generate_circle, PointSet};
use crate::raster::OwnedRaster;
use crate::scorer::intensity_peak_position;
use crate::trace::{trace_event, trace_span};
use crate::util::{CorrMatchError, CorrMatchResult};

/// Default Gaussian blur sigma applied to every preprocessed raster.
pub const BLUR: f32 = 2.1;
/// Number of scaled copies built per query.
pub const SCALES_NUMBER: usize = 8;

/// Controls `QueryIndex` construction.
#[derive(Clone, Debug)]
pub struct IndexConfig {
    /// Number of scaled copies generated per query.
    pub scales_number: usize,
    /// Upper bound of the per-query scale sweep (caller-supplied).
    pub max_scale: f32,
    /// Gaussian blur sigma applied to every resized raster.
    pub blur_sigma: f32,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            scales_number: SCALES_NUMBER,
            max_scale: 1.0,
            blur_sigma: BLUR,
        }
    }
}

impl IndexConfig {
    /// Validates the configuration, returning an error if any value is out
    /// of its valid range.
    pub fn validate(&self) -> CorrMatchResult<()> {
        if self.scales_number == 0 {
            return Err(CorrMatchError::InvalidConfig {
                reason: "scales_number must be at least 1",
            });
        }
        if !self.max_scale.is_finite() || self.max_scale <= 0.5 {
            return Err(CorrMatchError::InvalidConfig {
                reason: "max_scale must be finite and greater than the sweep's minimum of 0.5",
            });
        }
        if !self.blur_sigma.is_finite() || self.blur_sigma <= 0.0 {
            return Err(CorrMatchError::InvalidConfig {
                reason: "blur_sigma must be finite and positive",
            });
        }
        Ok(())
    }
}

/// One (query, scale) pairing: a preprocessed raster plus its precomputed
/// geometry and descriptors.
pub struct QueryScale {
    raster: OwnedRaster,
    center: (usize, usize),
    circle_group: Vec<PointSet>,
    brief_group: Vec<PointSet>,
    circle_descriptor: Vec<f32>,
    intensity_descriptor: Vec<f32>,
    brief_descriptors: Vec<Vec<f32>>,
}

impl QueryScale {
    /// Builds a `QueryScale` from a resized (but not yet blurred) query
    /// raster. Returns `DegenerateQuery` when the raster is too small to
    /// host even a single circle.
    pub fn build(resized: OwnedRaster, blur_sigma: f32) -> CorrMatchResult<Self> {
        let raster = resized.blur(blur_sigma);
        let width = raster.width();
        let height = raster.height();
        let n = width.min(height);

        let radii = circle_radii(n);
        if radii.is_empty() {
            return Err(CorrMatchError::DegenerateQuery {
                reason: "query dimension too small for any circle",
            });
        }
        let circle_group: Vec<PointSet> = radii.iter().map(|&r| generate_circle(r)).collect();
        let brief_group = generate_brief_group(n);
        if brief_group.is_empty() {
            return Err(CorrMatchError::DegenerateQuery {
                reason: "query dimension too small for a brief group",
            });
        }

        let center = (width / 2, height / 2);

        let circle_descriptor = evaluate_circle_group(&raster, &circle_group, center.0, center.1)
            .ok_or(CorrMatchError::DegenerateQuery {
                reason: "circle group does not fit at the query's own center",
            })?;

        let raw_circles = evaluate_circle_group_raw(&raster, &circle_group, center.0, center.1)
            .ok_or(CorrMatchError::DegenerateQuery {
                reason: "circle group does not fit at the query's own center",
            })?;
        let intensity_descriptor: Vec<f32> = raw_circles
            .iter()
            .map(|samples| intensity_peak_position(samples))
            .collect();

        let brief_descriptors: Vec<Vec<f32>> = brief_group
            .iter()
            .map(|points| {
                evaluate_brief(&raster, points, center.0, center.1).ok_or(
                    CorrMatchError::DegenerateQuery {
                        reason: "brief point set does not fit at the query's own center",
                    },
                )
            })
            .collect::<CorrMatchResult<_>>()?;

        Ok(Self {
            raster,
            center,
            circle_group,
            brief_group,
            circle_descriptor,
            intensity_descriptor,
            brief_descriptors,
        })
    }

    pub fn raster(&self) -> &OwnedRaster {
        &self.raster
    }

    pub fn width(&self) -> usize {
        self.raster.width()
    }

    pub fn height(&self) -> usize {
        self.raster.height()
    }

    pub fn circle_group(&self) -> &[PointSet] {
        &self.circle_group
    }

    pub fn brief_group(&self) -> &[PointSet] {
        &self.brief_group
    }

    pub fn circle_descriptor(&self) -> &[f32] {
        &self.circle_descriptor
    }

    pub fn intensity_descriptor(&self) -> &[f32] {
        &self.intensity_descriptor
    }

    pub fn brief_descriptor(&self, rotation_idx: usize) -> &[f32] {
        &self.brief_descriptors[rotation_idx]
    }
}

/// Ordered list of `QueryScale`, concatenated across all input queries.
pub struct QueryIndex {
    scales: Vec<QueryScale>,
    scales_per_query: usize,
}

impl QueryIndex {
    /// Builds a `QueryIndex` from, for each query, a list of resized rasters
    /// (one per scale). Every query contributes `scales_per_query =
    /// cfg.scales_number` entries; a query whose scales cannot all be built
    /// (e.g. the smallest scale is too small for a circle group) is skipped
    /// entirely with a warning rather than aborting the whole run.
    pub fn build(queries: Vec<Vec<OwnedRaster>>, cfg: &IndexConfig) -> CorrMatchResult<Self> {
        cfg.validate()?;
        let _span = trace_span!("query_index_build", queries = queries.len()).entered();

        let mut scales = Vec::new();
        for (query_idx, per_scale_rasters) in queries.into_iter().enumerate() {
            if per_scale_rasters.len() != cfg.scales_number {
                return Err(CorrMatchError::InvalidConfig {
                    reason: "every query must contribute exactly scales_number rasters",
                });
            }
            let built: CorrMatchResult<Vec<QueryScale>> = per_scale_rasters
                .into_iter()
                .map(|raster| QueryScale::build(raster, cfg.blur_sigma))
                .collect();
            match built {
                Ok(mut query_scales) => scales.append(&mut query_scales),
                Err(_) => {
                    trace_event!("query_skipped_degenerate", query_idx = query_idx);
                }
            }
        }

        if scales.is_empty() {
            return Err(CorrMatchError::DegenerateQuery {
                reason: "no query produced a usable QueryIndex entry",
            });
        }

        Ok(Self {
            scales,
            scales_per_query: cfg.scales_number,
        })
    }

    pub fn scales(&self) -> &[QueryScale] {
        &self.scales
    }

    pub fn scales_per_query(&self) -> usize {
        self.scales_per_query
    }

    pub fn len(&self) -> usize {
        self.scales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scales.is_empty()
    }

    pub fn get(&self, scale_index: usize) -> CorrMatchResult<&QueryScale> {
        self.scales
            .get(scale_index)
            .ok_or(CorrMatchError::IndexOutOfBounds {
                index: scale_index,
                len: self.scales.len(),
                context: "query_scale_index",
            })
    }

    /// Maps a scale index back to its originating query id.
    pub fn query_id_for(&self, scale_index: usize) -> usize {
        scale_index / self.scales_per_query
    }
}
