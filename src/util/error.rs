//! Error types for structflow.

use thiserror::Error;

/// Result alias for structflow operations.
pub type StructFlowResult<T> = std::result::Result<T, StructFlowError>;

/// Errors that can occur when building or analysing images.
///
/// Out-of-range pixel coordinates are never reported here; they are resolved
/// by clamping. Untextured optical-flow sites are not errors either.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StructFlowError {
    /// The requested shape is empty where a sample is required, or overflows.
    #[error("invalid dimensions {width}x{height}x{channels}")]
    InvalidDimensions {
        width: usize,
        height: usize,
        channels: usize,
    },
    /// A data buffer does not hold exactly `width * height * channels` samples.
    #[error("buffer length mismatch: needed {needed}, got {got}")]
    BufferLengthMismatch { needed: usize, got: usize },
    /// A convolution filter has neither 1 channel nor the source channel count.
    #[error("filter has {filter} channels, expected 1 or {image}")]
    ChannelMismatch { filter: usize, image: usize },
    /// Two images that must share a shape do not.
    #[error("shape mismatch: {left:?} vs {right:?}")]
    ShapeMismatch {
        left: (usize, usize, usize),
        right: (usize, usize, usize),
    },
    /// An image has a channel count the operation cannot handle.
    #[error("unsupported channel count: expected {expected}, got {got}")]
    UnsupportedChannels { expected: &'static str, got: usize },
    /// A numeric parameter is out of its valid range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
    /// Failed to load or save an image file.
    #[cfg(feature = "image-io")]
    #[error("image io: {reason}")]
    ImageIo { reason: String },
}
