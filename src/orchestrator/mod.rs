//! Top-level orchestration: target preprocessing, query-index construction,
//! the sweep, NMS, and coordinate remapping back to the original target
//! scale.

use crate::candidate::{nms, Match};
use crate::cascade::CascadeConfig;
use crate::query::{IndexConfig, QueryIndex};
use crate::raster::OwnedRaster;
use crate::sweep::sweep;
use crate::trace::{trace_event, trace_span};
use crate::util::{CorrMatchError, CorrMatchResult};

/// Target images larger than this many pixels are downscaled before the sweep.
pub const MAX_IMAGE_SIZE: usize = 4_000_000;
/// Lower bound of the per-query scale sweep, expressed as a fraction of `ratio`.
pub const MIN_SCALE_FRACTION: f32 = 0.5;

/// Ties the index and cascade configuration together with the
/// target-preprocessing and worker-pool parameters.
#[derive(Clone, Debug)]
pub struct OrchestratorConfig {
    pub max_image_size: usize,
    pub thread_count: i64,
    pub index: IndexConfig,
    pub cascade: CascadeConfig,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_image_size: MAX_IMAGE_SIZE,
            thread_count: 0,
            index: IndexConfig::default(),
            cascade: CascadeConfig::default(),
        }
    }
}

impl OrchestratorConfig {
    pub fn validate(&self) -> CorrMatchResult<()> {
        if self.max_image_size == 0 {
            return Err(CorrMatchError::InvalidConfig {
                reason: "max_image_size must be positive",
            });
        }
        self.index.validate()?;
        self.cascade.validate()?;
        Ok(())
    }
}

/// One emitted match, already remapped to the original target's coordinate
/// system.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EmittedMatch {
    pub query_id: usize,
    pub x: usize,
    pub y: usize,
}

/// Runs the full pipeline: preprocesses `target`, builds scaled copies of
/// every entry in `queries`, sweeps the target, suppresses overlapping
/// matches, and remaps coordinates back to `target`'s original resolution.
pub fn run(
    target: OwnedRaster,
    queries: Vec<OwnedRaster>,
    cfg: &OrchestratorConfig,
) -> CorrMatchResult<Vec<EmittedMatch>> {
    cfg.validate()?;
    let _span = trace_span!("orchestrator_run", queries = queries.len()).entered();

    let run_inner = || -> CorrMatchResult<Vec<EmittedMatch>> {
        let area = target.width() * target.height();
        let ratio = if area > cfg.max_image_size {
            1.0 / ((area as f32 / cfg.max_image_size as f32).sqrt())
        } else {
            1.0
        };
        trace_event!("preprocess_target", ratio = ratio);

        let resized_target = if ratio < 1.0 {
            target.resize(ratio * 100.0)?
        } else {
            target
        };
        let preprocessed_target = resized_target.blur(cfg.index.blur_sigma);

        let mut scaled_queries = Vec::with_capacity(queries.len());
        for query in &queries {
            scaled_queries.push(build_scale_sweep(query, ratio, cfg)?);
        }

        let index = QueryIndex::build(scaled_queries, &cfg.index)?;
        let matches = sweep(&index, &preprocessed_target, &cfg.cascade);
        let suppressed = nms::suppress(matches, &index);

        Ok(remap(&suppressed, &index, ratio))
    };

    #[cfg(feature = "rayon")]
    {
        // thread_count <= 0 means "platform default", matching rayon's own
        // num_threads(0) convention.
        let threads = if cfg.thread_count > 0 {
            cfg.thread_count as usize
        } else {
            0
        };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|_| CorrMatchError::InvalidConfig {
                reason: "failed to build the worker thread pool",
            })?;
        pool.install(run_inner)
    }

    #[cfg(not(feature = "rayon"))]
    {
        run_inner()
    }
}

/// Produces `cfg.index.scales_number` resized (not yet blurred) copies of
/// `query`, at scale factors evenly spaced in `[0.5 * ratio, max_scale *
/// ratio]`. Blurring happens later, inside `QueryScale::build`.
fn build_scale_sweep(
    query: &OwnedRaster,
    ratio: f32,
    cfg: &OrchestratorConfig,
) -> CorrMatchResult<Vec<OwnedRaster>> {
    let min_scale = MIN_SCALE_FRACTION * ratio;
    let max_scale = cfg.index.max_scale * ratio;
    let count = cfg.index.scales_number;

    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let t = if count > 1 {
            i as f32 / (count - 1) as f32
        } else {
            0.0
        };
        let factor = min_scale + t * (max_scale - min_scale);
        out.push(query.resize(factor * 100.0)?);
    }
    Ok(out)
}

fn remap(matches: &[Match], index: &QueryIndex, ratio: f32) -> Vec<EmittedMatch> {
    matches
        .iter()
        .map(|m| EmittedMatch {
            query_id: 1 + index.query_id_for(m.query_scale_index),
            x: (m.x as f32 / ratio).floor() as usize,
            y: (m.y as f32 / ratio).floor() as usize,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard(size: usize) -> OwnedRaster {
        let data = (0..size * size)
            .map(|i| {
                let x = i % size;
                let y = i / size;
                if (x / 4 + y / 4) % 2 == 0 {
                    200.0
                } else {
                    20.0
                }
            })
            .collect();
        OwnedRaster::new(data, size, size).unwrap()
    }

    #[test]
    fn run_finds_embedded_query_at_its_center() {
        let query = checkerboard(64);
        let mut cfg = OrchestratorConfig::default();
        cfg.index.scales_number = 1;
        cfg.index.max_scale = 1.0;

        let blurred = query.blur(cfg.index.blur_sigma);
        let mut data = vec![10.0f32; 400 * 400];
        let ox = 200 - blurred.width() / 2;
        let oy = 200 - blurred.height() / 2;
        for yy in 0..blurred.height() {
            for xx in 0..blurred.width() {
                data[(oy + yy) * 400 + (ox + xx)] = blurred.at(xx, yy);
            }
        }
        let target = OwnedRaster::new(data, 400, 400).unwrap();

        let results = run(target, vec![query], &cfg).unwrap();
        assert!(!results.is_empty());
        let m = &results[0];
        assert_eq!(m.query_id, 1);
        assert!((m.x as i64 - 200).abs() <= 2);
        assert!((m.y as i64 - 200).abs() <= 2);
    }

    #[test]
    fn run_rejects_flat_scene() {
        let query = OwnedRaster::new(vec![128.0; 64 * 64], 64, 64).unwrap();
        let mut cfg = OrchestratorConfig::default();
        cfg.index.scales_number = 1;
        let target = OwnedRaster::new(vec![128.0; 512 * 512], 512, 512).unwrap();
        let results = run(target, vec![query], &cfg).unwrap();
        assert!(results.is_empty());
    }
}
