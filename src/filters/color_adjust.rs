//! Per-pixel color adjustments: Tint, Multiply.
//!
//! These are pixel-wise operations that don't require spatial context.
//! Each produces a new buffer with the same dimensions and stride as its
//! input.

use super::buffer::{PixelBuffer, CHANNELS};
use super::core::saturate_u8;
use crate::error::Result;

// ============================================================================
// Tint
// ============================================================================

/// Replace the color of every pixel, keeping its alpha.
///
/// # Arguments
/// * `buffer` - Source RGBA image
/// * `red`, `green`, `blue` - Replacement color
///
/// # Returns
/// Image where every pixel is `(red, green, blue, source alpha)`
pub fn tint(buffer: &PixelBuffer, red: u8, green: u8, blue: u8) -> Result<PixelBuffer> {
    let mut output = buffer.empty_like()?;

    for (dst, src) in output
        .flat_mut()
        .chunks_exact_mut(CHANNELS)
        .zip(buffer.flat().chunks_exact(CHANNELS))
    {
        dst[0] = red;
        dst[1] = green;
        dst[2] = blue;
        dst[3] = src[3];
    }

    Ok(output)
}

// ============================================================================
// Multiply
// ============================================================================

/// Multiply each channel by its own factor, saturating into `[0, 255]`.
///
/// Negative products saturate to 0; fractional results are truncated.
///
/// # Arguments
/// * `buffer` - Source RGBA image
/// * `red`, `green`, `blue`, `alpha` - Per-channel factors
///
/// # Returns
/// Scaled image
pub fn scale(
    buffer: &PixelBuffer,
    red: f64,
    green: f64,
    blue: f64,
    alpha: f64,
) -> Result<PixelBuffer> {
    let factors = [red, green, blue, alpha];
    let mut output = buffer.empty_like()?;

    for (dst, src) in output
        .flat_mut()
        .chunks_exact_mut(CHANNELS)
        .zip(buffer.flat().chunks_exact(CHANNELS))
    {
        for c in 0..CHANNELS {
            dst[c] = saturate_u8(f64::from(src[c]) * factors[c]);
        }
    }

    Ok(output)
}
