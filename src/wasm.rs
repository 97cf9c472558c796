//! WebAssembly exports for the pixbuf filters.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Images are
//! passed as flat, tightly packed RGBA byte arrays
//! (length = width * height * 4) and returned the same way.

use wasm_bindgen::prelude::*;

use crate::filters::blend::{combine, BlendingMode};
use crate::filters::blur::blur;
use crate::filters::buffer::PixelBuffer;
use crate::filters::color_adjust::{scale, tint};
use crate::filters::core::clamp;
use crate::filters::drop_shadow::add_shadow;

fn to_buffer(data: &[u8], width: usize, height: usize) -> Result<PixelBuffer, JsError> {
    Ok(PixelBuffer::from_raw(width, height, width.saturating_mul(4), data)?)
}

fn to_bytes(buffer: PixelBuffer) -> Vec<u8> {
    buffer.into_pixels().into_raw_vec_and_offset().0
}

// ============================================================================
// Arithmetic
// ============================================================================

/// Clamp `number` into `[floor, ceiling]`.
#[wasm_bindgen]
pub fn clamp_wasm(number: f64, floor: f64, ceiling: f64) -> f64 {
    clamp(number, floor, ceiling)
}

// ============================================================================
// Blur
// ============================================================================

/// Blur an RGBA image.
///
/// # Arguments
/// * `data` - Flat array of RGBA bytes
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `radius` - Blur radius in pixels (> 0)
/// * `use_box_mode` - Box blur when true, Gaussian kernel when false
#[wasm_bindgen]
pub fn blur_rgba_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    radius: u32,
    use_box_mode: bool,
) -> Result<Vec<u8>, JsError> {
    let buffer = to_buffer(data, width, height)?;
    Ok(to_bytes(blur(&buffer, radius, use_box_mode)?))
}

// ============================================================================
// Channel transforms
// ============================================================================

/// Add two RGBA images of identical size. `mode` 0 is saturating add.
#[wasm_bindgen]
pub fn combine_rgba_wasm(
    data_a: &[u8],
    data_b: &[u8],
    width: usize,
    height: usize,
    mode: i32,
) -> Result<Vec<u8>, JsError> {
    let mode = BlendingMode::try_from(i64::from(mode))?;
    let a = to_buffer(data_a, width, height)?;
    let b = to_buffer(data_b, width, height)?;
    Ok(to_bytes(combine(&a, &b, mode)?))
}

/// Replace RGB with a constant color, preserving alpha.
#[wasm_bindgen]
pub fn tint_rgba_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    red: u8,
    green: u8,
    blue: u8,
) -> Result<Vec<u8>, JsError> {
    let buffer = to_buffer(data, width, height)?;
    Ok(to_bytes(tint(&buffer, red, green, blue)?))
}

/// Multiply each channel by a factor, saturating to 0-255.
#[wasm_bindgen]
pub fn scale_rgba_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    red: f64,
    green: f64,
    blue: f64,
    alpha: f64,
) -> Result<Vec<u8>, JsError> {
    let buffer = to_buffer(data, width, height)?;
    Ok(to_bytes(scale(&buffer, red, green, blue, alpha)?))
}

// ============================================================================
// Effects
// ============================================================================

/// Apply a drop shadow. `opacity` is accepted but not used.
#[wasm_bindgen]
pub fn add_shadow_rgba_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    radius: u32,
    opacity: f64,
) -> Result<Vec<u8>, JsError> {
    let buffer = to_buffer(data, width, height)?;
    Ok(to_bytes(add_shadow(&buffer, radius, opacity)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_wasm() {
        assert_eq!(clamp_wasm(300.0, 0.0, 255.0), 255.0);
        assert_eq!(clamp_wasm(-1.0, 0.0, 255.0), 0.0);
        assert_eq!(clamp_wasm(42.0, 0.0, 255.0), 42.0);
    }

    #[test]
    fn test_scale_rgba_wasm() {
        let data = [200u8, 100, 50, 128, 10, 20, 30, 40];
        let result = scale_rgba_wasm(&data, 2, 1, 0.0, 1.0, 2.0, 0.75).ok();
        assert_eq!(result, Some(vec![0, 100, 100, 96, 0, 20, 60, 30]));
    }
}
