//! Core utilities for image processing filters.
//!
//! This module provides shared functionality used by multiple filters:
//! - Saturating clamp helpers
//! - Gaussian kernel generation

use std::f64::consts::PI;
use std::mem::size_of;

use ndarray::Array2;
use tracing::trace;

use crate::error::{FilterError, Result};

// ============================================================================
// Saturating arithmetic
// ============================================================================

/// Clamp `number` into `[floor, ceiling]`.
///
/// Values below `floor` return `floor`, values above `ceiling` return
/// `ceiling`. NaN is passed through unchanged.
#[inline]
pub fn clamp(number: f64, floor: f64, ceiling: f64) -> f64 {
    if number < floor {
        floor
    } else if number > ceiling {
        ceiling
    } else {
        number
    }
}

/// Integer variant of [`clamp`]. The result is truncated toward zero.
#[inline]
pub fn int_clamp(number: i64, floor: i64, ceiling: i64) -> i64 {
    clamp(number as f64, floor as f64, ceiling as f64) as i64
}

/// Force a computed channel value into a byte, truncating toward zero.
#[inline]
pub fn saturate_u8(value: f64) -> u8 {
    clamp(value, 0.0, 255.0) as u8
}

/// Reserve an empty `Vec` with room for `len` elements.
///
/// Sizes beyond `isize::MAX` bytes are `SizeOverflow`; a refused reservation
/// is `AllocationFailed`.
pub(crate) fn try_alloc<T>(len: usize) -> Result<Vec<T>> {
    let bytes = len
        .checked_mul(size_of::<T>())
        .filter(|&b| b <= isize::MAX as usize)
        .ok_or(FilterError::SizeOverflow)?;
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| FilterError::AllocationFailed { bytes })?;
    Ok(data)
}

// ============================================================================
// Gaussian kernel
// ============================================================================

/// Square table of normalized Gaussian weights, indexed `[[y, x]]`.
#[derive(Clone, Debug)]
pub struct Kernel {
    weights: Array2<f64>,
}

impl Kernel {
    /// Side length of the kernel.
    pub fn radius(&self) -> usize {
        self.weights.nrows()
    }

    /// Weight at column `x`, row `y`.
    #[inline]
    pub fn weight(&self, x: usize, y: usize) -> f64 {
        self.weights[[y, x]]
    }

    /// All weights as a `[[y, x]]` array.
    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    /// Total of all weights, 1.0 up to rounding.
    pub fn sum(&self) -> f64 {
        self.weights.sum()
    }
}

/// Generate a 2D Gaussian kernel of `radius` x `radius` weights.
///
/// The center sits at `radius / 2` (integer division), so even radii give an
/// off-center kernel. Weights are normalized to sum to 1.
///
/// # Arguments
/// * `radius` - Side length of the kernel, must be > 0
/// * `sigma` - Standard deviation, must be positive and finite
pub fn generate_kernel(radius: u32, sigma: f64) -> Result<Kernel> {
    if radius == 0 {
        return Err(FilterError::InvalidRadius {
            radius: i64::from(radius),
        });
    }
    if !(sigma.is_finite() && sigma > 0.0) {
        return Err(FilterError::InvalidSigma { sigma });
    }

    let size = radius as usize;
    let mean = f64::from(radius / 2);
    let denom = 2.0 * PI * sigma * sigma;

    let len = size.checked_mul(size).ok_or(FilterError::SizeOverflow)?;
    let mut data = try_alloc::<f64>(len)?;
    for y in 0..size {
        let dy = (y as f64 - mean) / sigma;
        for x in 0..size {
            let dx = (x as f64 - mean) / sigma;
            data.push((-0.5 * (dx * dx + dy * dy)).exp() / denom);
        }
    }
    let mut weights =
        Array2::from_shape_vec((size, size), data).map_err(|_| FilterError::SizeOverflow)?;

    // Normalize
    let sum = weights.sum();
    weights.mapv_inplace(|w| w / sum);

    trace!(radius, sigma, "generated gaussian kernel");

    Ok(Kernel { weights })
}
