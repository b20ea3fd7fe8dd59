//! Tiled data-parallel sweep over every target pixel.
//!
//! One logical task covers one `GRAIN_SIZE`-sided square tile of the target;
//! tiles partition the pixel grid and are scanned independently, each
//! returning its own `Vec<Match>` rather than writing into shared mutable
//! state — the same map-reduce idiom the row-parallel scan in this codebase
//! already uses.

use crate::candidate::Match;
use crate::cascade::{evaluate_at, CascadeConfig};
use crate::query::QueryIndex;
use crate::raster::OwnedRaster;
use crate::trace::{trace_event, trace_span};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Side length, in pixels, of one sweep tile.
pub const GRAIN_SIZE: usize = 256;

/// Runs the cascade at every pixel of `target`, tiled for parallelism.
pub fn sweep(index: &QueryIndex, target: &OwnedRaster, cfg: &CascadeConfig) -> Vec<Match> {
    let width = target.width();
    let height = target.height();
    let _span = trace_span!("sweep", width = width, height = height).entered();

    let tiles = tile_origins(width, height);

    #[cfg(feature = "rayon")]
    let matches: Vec<Match> = tiles
        .into_par_iter()
        .map(|(tx, ty)| scan_tile(index, target, cfg, tx, ty, width, height))
        .flatten()
        .collect();

    #[cfg(not(feature = "rayon"))]
    let matches: Vec<Match> = tiles
        .into_iter()
        .flat_map(|(tx, ty)| scan_tile(index, target, cfg, tx, ty, width, height))
        .collect();

    trace_event!("sweep_complete", matches = matches.len());
    matches
}

fn tile_origins(width: usize, height: usize) -> Vec<(usize, usize)> {
    let mut origins = Vec::new();
    let mut ty = 0;
    while ty < height {
        let mut tx = 0;
        while tx < width {
            origins.push((tx, ty));
            tx += GRAIN_SIZE;
        }
        ty += GRAIN_SIZE;
    }
    origins
}

fn scan_tile(
    index: &QueryIndex,
    target: &OwnedRaster,
    cfg: &CascadeConfig,
    tx: usize,
    ty: usize,
    width: usize,
    height: usize,
) -> Vec<Match> {
    let x_end = (tx + GRAIN_SIZE).min(width);
    let y_end = (ty + GRAIN_SIZE).min(height);
    let mut found = Vec::new();
    for y in ty..y_end {
        for x in tx..x_end {
            if let Some(m) = evaluate_at(index, target, x, y, cfg) {
                found.push(m);
            }
        }
    }
    found
}
