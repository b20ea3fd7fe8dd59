//! Error types for cascade-matcher.

use thiserror::Error;

/// Result alias for cascade-matcher operations.
pub type CorrMatchResult<T> = std::result::Result<T, CorrMatchError>;

/// Errors that can occur when running cascade-matcher operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CorrMatchError {
    /// The provided dimensions are invalid (must be non-zero).
    #[error("invalid dimensions: width={width} height={height}")]
    InvalidDimensions { width: usize, height: usize },
    /// The provided stride is smaller than the image width.
    #[error("invalid stride: width={width} stride={stride}")]
    InvalidStride { width: usize, stride: usize },
    /// The backing buffer is too small for the requested view.
    #[error("buffer too small: needed={needed} got={got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// The requested ROI lies outside the image bounds.
    #[error(
        "roi out of bounds: x={x} y={y} width={width} height={height} img_width={img_width} img_height={img_height}"
    )]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// A query is too small or too degenerate to build features from.
    #[error("degenerate query: {reason}")]
    DegenerateQuery { reason: &'static str },
    /// The requested index is out of bounds for a collection.
    #[error("index out of bounds: {context} index={index} len={len}")]
    IndexOutOfBounds {
        index: usize,
        len: usize,
        context: &'static str,
    },
    /// A configuration value is out of its valid range.
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: &'static str },
    /// Loading or decoding an image from disk failed.
    #[error("image io error: {reason}")]
    ImageIo { reason: String },
    /// The command line arguments were malformed.
    #[error("invalid arguments: {reason}")]
    InvalidArguments { reason: String },
}
