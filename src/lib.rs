//! A cascade-based, rotation- and scale-invariant template matcher.
//!
//! Locates rotated and rescaled instances of one or more small query images
//! ("patterns") inside a larger target image. A three-stage per-pixel
//! cascade (circle filter, orientation estimate, BRIEF-style binary filter)
//! prunes the search space before non-maximum suppression collapses
//! overlapping candidates into a final match list.

pub mod cascade;
pub mod candidate;
pub mod descriptor;
pub mod geometry;
pub mod orchestrator;
pub mod query;
pub mod raster;
pub mod scorer;
pub mod sweep;
mod trace;
pub mod util;

pub use candidate::Match;
pub use cascade::CascadeConfig;
pub use orchestrator::{run, EmittedMatch, OrchestratorConfig};
pub use query::{IndexConfig, QueryIndex, QueryScale};
pub use raster::{ImageView, OwnedRaster, RasterView};
pub use util::error::{CorrMatchError, CorrMatchResult};

#[cfg(feature = "image-io")]
pub use raster::io::{convert_bgr_to_luminance, load_raster};
