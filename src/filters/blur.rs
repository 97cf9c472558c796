//! Blur filters for RGBA images.
//!
//! Two interchangeable strategies over the same square window:
//! - **Box**: unweighted sum over a `2 * half` window clamped to the image,
//!   scaled by a fixed `1 / radius²`. Samples outside the image are dropped
//!   but the divisor is not adjusted, so edges come out darker.
//! - **Gaussian**: weighted sum over a `radius x radius` kernel with
//!   edge-clamped sampling.
//!
//! `half` is `ceil(radius / 2)` in both modes. All four channels, alpha
//! included, are blurred independently.

use tracing::debug;

use super::buffer::{PixelBuffer, CHANNELS};
use super::core::{generate_kernel, int_clamp, saturate_u8, try_alloc, Kernel};
use crate::error::{FilterError, Result};

/// Convolution strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlurMode {
    /// Uniform average with a fixed `1 / radius²` divisor.
    Box,
    /// Normalized Gaussian kernel, `sigma = radius / 2`.
    Gaussian,
}

impl BlurMode {
    /// Map the host's `use_box_mode` flag to a mode.
    pub fn from_box_flag(use_box_mode: bool) -> Self {
        if use_box_mode {
            Self::Box
        } else {
            Self::Gaussian
        }
    }
}

/// Blur an RGBA image.
///
/// # Arguments
/// * `buffer` - Source image, not modified
/// * `radius` - Blur radius in pixels, must be > 0
/// * `use_box_mode` - `true` for box blur, `false` for Gaussian
///
/// # Returns
/// Blurred image with the same dimensions and stride
pub fn blur(buffer: &PixelBuffer, radius: u32, use_box_mode: bool) -> Result<PixelBuffer> {
    convolve(buffer, radius, BlurMode::from_box_flag(use_box_mode))
}

/// Apply a box or Gaussian convolution to `buffer`.
pub fn convolve(buffer: &PixelBuffer, radius: u32, mode: BlurMode) -> Result<PixelBuffer> {
    if radius == 0 {
        return Err(FilterError::InvalidRadius { radius: 0 });
    }

    debug!(
        width = buffer.width(),
        height = buffer.height(),
        radius,
        ?mode,
        "blurring buffer"
    );

    match mode {
        BlurMode::Box => box_blur(buffer, radius),
        BlurMode::Gaussian => {
            let kernel = generate_kernel(radius, f64::from(radius) / 2.0)?;
            gaussian_blur(buffer, &kernel)
        }
    }
}

fn box_blur(buffer: &PixelBuffer, radius: u32) -> Result<PixelBuffer> {
    let (width, height) = buffer.dimensions();
    let half = i64::from(radius.div_ceil(2));
    let multiplier = 1.0 / (f64::from(radius) * f64::from(radius));
    let row_bytes = width * CHANNELS;

    let src = buffer.flat();
    let mut output = buffer.empty_like()?;
    let dst = output.flat_mut();

    for y in 0..height {
        let y_floor = int_clamp(y as i64 - half, 0, height as i64) as usize;
        let y_ceil = int_clamp(y as i64 + half, 0, height as i64) as usize;

        for x in 0..width {
            let x_floor = int_clamp(x as i64 - half, 0, width as i64) as usize;
            let x_ceil = int_clamp(x as i64 + half, 0, width as i64) as usize;

            let mut sum = [0u64; CHANNELS];
            for sy in y_floor..y_ceil {
                let row = &src[sy * row_bytes..(sy + 1) * row_bytes];
                for px in row[x_floor * CHANNELS..x_ceil * CHANNELS].chunks_exact(CHANNELS) {
                    for c in 0..CHANNELS {
                        sum[c] += u64::from(px[c]);
                    }
                }
            }

            let out = &mut dst[(y * width + x) * CHANNELS..][..CHANNELS];
            for c in 0..CHANNELS {
                out[c] = saturate_u8(sum[c] as f64 * multiplier);
            }
        }
    }

    Ok(output)
}

fn gaussian_blur(buffer: &PixelBuffer, kernel: &Kernel) -> Result<PixelBuffer> {
    let (width, height) = buffer.dimensions();
    let size = kernel.radius();
    let half = size.div_ceil(2) as i64;
    let row_bytes = width * CHANNELS;

    // Clamped source coordinate for every (output coordinate, kernel offset) pair.
    let sample_x = clamped_offsets(width, size, half)?;
    let sample_y = clamped_offsets(height, size, half)?;

    let src = buffer.flat();
    let mut output = buffer.empty_like()?;
    let dst = output.flat_mut();

    for y in 0..height {
        let rows = &sample_y[y * size..(y + 1) * size];

        for x in 0..width {
            let cols = &sample_x[x * size..(x + 1) * size];

            let mut sum = [0.0f64; CHANNELS];
            for (weights, &sy) in kernel.weights().rows().into_iter().zip(rows) {
                let row = &src[sy * row_bytes..(sy + 1) * row_bytes];
                for (&w, &sx) in weights.iter().zip(cols) {
                    let px = &row[sx * CHANNELS..(sx + 1) * CHANNELS];
                    for c in 0..CHANNELS {
                        sum[c] += f64::from(px[c]) * w;
                    }
                }
            }

            let out = &mut dst[(y * width + x) * CHANNELS..][..CHANNELS];
            for c in 0..CHANNELS {
                out[c] = saturate_u8(sum[c]);
            }
        }
    }

    Ok(output)
}

/// Table of `clamp(i + k - half, 0, len - 1)` laid out as `[i * size + k]`.
fn clamped_offsets(len: usize, size: usize, half: i64) -> Result<Vec<usize>> {
    let total = len.checked_mul(size).ok_or(FilterError::SizeOverflow)?;
    let mut table = try_alloc::<usize>(total)?;
    let last = len as i64 - 1;
    for i in 0..len {
        for k in 0..size {
            table.push(int_clamp(i as i64 + k as i64 - half, 0, last) as usize);
        }
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: usize, height: usize) -> PixelBuffer {
        let mut data = Vec::with_capacity(width * height * 4);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[
                    (x * 20) as u8,
                    (y * 30) as u8,
                    ((x + y) * 10) as u8,
                    (255 - x * 10) as u8,
                ]);
            }
        }
        PixelBuffer::from_raw(width, height, width * 4, &data).unwrap()
    }

    #[test]
    fn test_box_radius_one_white_2x2() {
        let img = PixelBuffer::filled(2, 2, [255, 255, 255, 255]).unwrap();
        let result = blur(&img, 1, true).unwrap();
        assert_eq!(result.pixel(0, 0), [255, 255, 255, 255]);
        // Larger windows saturate instead of wrapping
        assert_eq!(result.pixel(1, 1), [255, 255, 255, 255]);
    }

    #[test]
    fn test_box_radius_one_sums_window() {
        // half = 1, window [x-1, x+1), divisor 1
        let img = PixelBuffer::from_raw(2, 1, 8, &[10, 20, 30, 40, 1, 2, 3, 4]).unwrap();
        let result = blur(&img, 1, true).unwrap();
        assert_eq!(result.pixel(0, 0), [10, 20, 30, 40]);
        assert_eq!(result.pixel(1, 0), [11, 22, 33, 44]);
    }

    #[test]
    fn test_box_divisor_is_fixed() {
        let img = PixelBuffer::filled(4, 4, [100, 100, 100, 100]).unwrap();
        let result = blur(&img, 2, true).unwrap();

        // Interior window holds radius² samples
        assert_eq!(result.pixel(2, 2), [100, 100, 100, 100]);
        // Corner window holds a single sample but is still divided by 4
        assert_eq!(result.pixel(0, 0), [25, 25, 25, 25]);
        // Edge window holds two samples
        assert_eq!(result.pixel(2, 0), [50, 50, 50, 50]);
    }

    #[test]
    fn test_box_uniform_interior_unchanged() {
        let img = PixelBuffer::filled(8, 8, [200, 120, 40, 255]).unwrap();
        for radius in [2u32, 4] {
            let half = radius as usize / 2;
            let result = blur(&img, radius, true).unwrap();
            for y in half..=8 - half {
                for x in half..=8 - half {
                    assert_eq!(result.pixel(x, y), [200, 120, 40, 255]);
                }
            }
        }
    }

    #[test]
    fn test_gaussian_uniform_unchanged() {
        let color = [200u8, 120, 40, 255];
        let img = PixelBuffer::filled(6, 5, color).unwrap();
        for radius in 1..=9u32 {
            let result = blur(&img, radius, false).unwrap();
            for y in 0..5 {
                for x in 0..6 {
                    let px = result.pixel(x, y);
                    for c in 0..4 {
                        assert!(
                            (px[c] as i32 - color[c] as i32).abs() <= 1,
                            "radius {radius} at ({x}, {y}) channel {c}: {}",
                            px[c]
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_gaussian_radius_one_samples_up_left() {
        // 1x1 kernel with half = 1 reads (x - 1, y - 1), clamped
        let img = gradient(4, 3);
        let result = blur(&img, 1, false).unwrap();
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(result.pixel(x, y), img.pixel(x.saturating_sub(1), y.saturating_sub(1)));
            }
        }
    }

    #[test]
    fn test_gaussian_single_pixel_image() {
        let img = PixelBuffer::filled(1, 1, [10, 20, 30, 40]).unwrap();
        let result = blur(&img, 7, false).unwrap();
        let px = result.pixel(0, 0);
        for (got, want) in px.iter().zip([10u8, 20, 30, 40]) {
            assert!((*got as i32 - want as i32).abs() <= 1);
        }
    }

    #[test]
    fn test_gaussian_smooths_edge() {
        // Left half black, right half white
        let mut data = Vec::new();
        for _y in 0..6 {
            for x in 0..6 {
                let v = if x < 3 { 0 } else { 255 };
                data.extend_from_slice(&[v, v, v, 255]);
            }
        }
        let img = PixelBuffer::from_raw(6, 6, 24, &data).unwrap();
        let result = blur(&img, 3, false).unwrap();
        // Kernel columns sample x - 2 ..= x, so the transition lands at x = 3 and 4
        assert_eq!(result.pixel(2, 3)[0], 0);
        let left = result.pixel(3, 3)[0];
        let right = result.pixel(4, 3)[0];
        assert!(left > 0 && left < 255);
        assert!(right > left);
        assert!(result.pixel(3, 3)[3] >= 254);
    }

    #[test]
    fn test_alpha_is_blurred() {
        let mut data = vec![0u8; 4 * 4 * 4];
        // Single opaque pixel at (2, 2)
        data[(2 * 4 + 2) * 4 + 3] = 255;
        let img = PixelBuffer::from_raw(4, 4, 16, &data).unwrap();
        let result = blur(&img, 2, true).unwrap();
        // (2, 2) lies in windows [x-1, x+1) for x in {2, 3}
        assert_eq!(result.pixel(2, 2)[3], 63);
        assert_eq!(result.pixel(3, 3)[3], 63);
        assert_eq!(result.pixel(1, 1)[3], 0);
        assert_eq!(result.pixel(3, 3)[0], 0);
    }

    #[test]
    fn test_blur_keeps_geometry_and_input() {
        let data = vec![50u8; 20 * 3];
        let img = PixelBuffer::from_raw(4, 3, 20, &data).unwrap();
        let before = img.clone();
        for use_box in [true, false] {
            let result = blur(&img, 3, use_box).unwrap();
            assert_eq!(result.dimensions(), (4, 3));
            assert_eq!(result.stride(), 20);
        }
        assert_eq!(img, before);
    }

    #[test]
    fn test_zero_radius_rejected() {
        let img = PixelBuffer::new(2, 2).unwrap();
        assert_eq!(
            blur(&img, 0, true),
            Err(FilterError::InvalidRadius { radius: 0 })
        );
        assert_eq!(
            convolve(&img, 0, BlurMode::Gaussian),
            Err(FilterError::InvalidRadius { radius: 0 })
        );
    }

    #[test]
    fn test_oversized_radius_is_error() {
        let img = PixelBuffer::filled(1, 1, [10, 20, 30, 40]).unwrap();
        assert_eq!(blur(&img, u32::MAX, false), Err(FilterError::SizeOverflow));
        // Box mode needs no kernel and only sees the clamped window
        assert_eq!(blur(&img, u32::MAX, true).unwrap().pixel(0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn test_mode_from_flag() {
        assert_eq!(BlurMode::from_box_flag(true), BlurMode::Box);
        assert_eq!(BlurMode::from_box_flag(false), BlurMode::Gaussian);
    }

    #[test]
    fn test_clamped_offsets() {
        // len 3, size 3, half 2: i + k - 2
        let table = clamped_offsets(3, 3, 2).unwrap();
        assert_eq!(table, vec![0, 0, 0, 0, 0, 1, 0, 1, 2]);
    }
}
