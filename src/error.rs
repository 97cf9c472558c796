//! Error type shared by every filter.
//!
//! All failures are caller-supplied invalid geometry or parameters, plus
//! the one resource failure of not being able to reserve an output buffer.
//! Nothing is retried and no partial result is ever returned.

use std::fmt;

/// Errors reported by buffer construction and filter operations.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum FilterError {
    /// Width or height is zero.
    EmptyBuffer,
    /// Pixel array does not have exactly 4 channels.
    InvalidChannels { channels: usize },
    /// Row stride is smaller than `width * 4`.
    StrideTooSmall { stride: usize, min: usize },
    /// Raw byte region is too short for the given geometry.
    InsufficientData { expected: usize, actual: usize },
    /// Buffer size does not fit in `usize`.
    SizeOverflow,
    /// Two buffers that must share dimensions do not.
    /// Both sides are `(width, height)`.
    DimensionMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
    /// Blur radius is not a positive integer.
    InvalidRadius { radius: i64 },
    /// Kernel sigma is not a positive finite number.
    InvalidSigma { sigma: f64 },
    /// Channel factor is negative or not finite.
    InvalidFactor { factor: f64 },
    /// Host passed a blending mode code with no matching variant.
    UnknownBlendingMode { code: i64 },
    /// Output buffer could not be reserved.
    AllocationFailed { bytes: usize },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBuffer => f.write_str("buffer width and height must be non-zero"),
            Self::InvalidChannels { channels } => {
                write!(f, "expected 4 channels (RGBA), got {channels}")
            }
            Self::StrideTooSmall { stride, min } => {
                write!(f, "row stride {stride} is smaller than width * 4 = {min}")
            }
            Self::InsufficientData { expected, actual } => {
                write!(f, "pixel data too short: need {expected} bytes, got {actual}")
            }
            Self::SizeOverflow => f.write_str("buffer dimensions overflow usize"),
            Self::DimensionMismatch { left, right } => write!(
                f,
                "buffer dimensions differ: {}x{} vs {}x{}",
                left.0, left.1, right.0, right.1
            ),
            Self::InvalidRadius { radius } => {
                write!(f, "blur radius must be a positive integer, got {radius}")
            }
            Self::InvalidSigma { sigma } => {
                write!(f, "kernel sigma must be positive and finite, got {sigma}")
            }
            Self::InvalidFactor { factor } => {
                write!(f, "channel factor must be non-negative and finite, got {factor}")
            }
            Self::UnknownBlendingMode { code } => write!(f, "unknown blending mode {code}"),
            Self::AllocationFailed { bytes } => {
                write!(f, "failed to allocate {bytes} bytes for output buffer")
            }
        }
    }
}

impl std::error::Error for FilterError {}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FilterError>;
