//! Combining two equally sized buffers.
//!
//! Blending is applied byte by byte over all four channels. Alpha is
//! combined like color rather than with "over" compositing.

use std::fmt;

use tracing::trace;

use super::buffer::PixelBuffer;
use crate::error::{FilterError, Result};

/// How two buffers are merged by [`combine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlendingMode {
    /// Saturating per-byte addition.
    Add,
}

impl BlendingMode {
    /// Integer code used by host bindings.
    pub const fn code(self) -> i64 {
        match self {
            Self::Add => 0,
        }
    }

    #[inline]
    fn apply(self, a: u8, b: u8) -> u8 {
        match self {
            Self::Add => a.saturating_add(b),
        }
    }
}

impl TryFrom<i64> for BlendingMode {
    type Error = FilterError;

    fn try_from(code: i64) -> Result<Self> {
        match code {
            0 => Ok(Self::Add),
            _ => Err(FilterError::UnknownBlendingMode { code }),
        }
    }
}

impl fmt::Display for BlendingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => f.write_str("add"),
        }
    }
}

/// Merge two buffers of identical dimensions.
///
/// The output takes its stride from `a`.
///
/// # Errors
/// `DimensionMismatch` if the buffers differ in width or height.
pub fn combine(a: &PixelBuffer, b: &PixelBuffer, mode: BlendingMode) -> Result<PixelBuffer> {
    if a.dimensions() != b.dimensions() {
        return Err(FilterError::DimensionMismatch {
            left: a.dimensions(),
            right: b.dimensions(),
        });
    }

    trace!(width = a.width(), height = a.height(), %mode, "combining buffers");

    let mut output = a.empty_like()?;
    for ((dst, &x), &y) in output.flat_mut().iter_mut().zip(a.flat()).zip(b.flat()) {
        *dst = mode.apply(x, y);
    }

    Ok(output)
}
