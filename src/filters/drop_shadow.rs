//! Drop shadow filter.
//!
//! Creates a shadow effect by:
//! 1. Box-blurring the whole image, alpha included
//! 2. Forcing the blurred color to black and fading its alpha
//! 3. Adding the faded silhouette back onto the original
//!
//! No alpha compositing is involved: the halo comes purely from saturating
//! addition, and the output has the same dimensions as the input.

use tracing::debug;

use super::blend::{combine, BlendingMode};
use super::blur::{convolve, BlurMode};
use super::buffer::PixelBuffer;
use super::color_adjust::scale;
use crate::error::{FilterError, Result};

/// Alpha factor applied to the blurred silhouette by [`add_shadow`].
pub const SHADOW_ALPHA_FACTOR: f64 = 0.75;

/// Apply a drop shadow to an RGBA image.
///
/// # Arguments
/// * `buffer` - Source image
/// * `radius` - Shadow blur radius in pixels, must be > 0
/// * `opacity` - Accepted for host compatibility but not used; the
///   silhouette is always faded by [`SHADOW_ALPHA_FACTOR`]
///
/// # Returns
/// Image with a darkened halo around opaque content
pub fn add_shadow(buffer: &PixelBuffer, radius: u32, opacity: f64) -> Result<PixelBuffer> {
    debug!(opacity, "shadow opacity ignored, using fixed alpha factor");
    add_shadow_with_alpha(buffer, radius, SHADOW_ALPHA_FACTOR)
}

/// Drop shadow with an explicit fade factor for the silhouette alpha.
///
/// # Errors
/// `InvalidFactor` if `alpha_factor` is negative or not finite, and any
/// error from the blur step.
pub fn add_shadow_with_alpha(
    buffer: &PixelBuffer,
    radius: u32,
    alpha_factor: f64,
) -> Result<PixelBuffer> {
    if !(alpha_factor.is_finite() && alpha_factor >= 0.0) {
        return Err(FilterError::InvalidFactor {
            factor: alpha_factor,
        });
    }

    debug!(
        width = buffer.width(),
        height = buffer.height(),
        radius,
        alpha_factor,
        "adding drop shadow"
    );

    let shaded = {
        let blurred = convolve(buffer, radius, BlurMode::Box)?;
        scale(&blurred, 0.0, 0.0, 0.0, alpha_factor)?
    };
    combine(buffer, &shaded, BlendingMode::Add)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 5x5 transparent image with one opaque white pixel in the middle.
    fn dot() -> PixelBuffer {
        let mut data = vec![0u8; 5 * 5 * 4];
        let i = (2 * 5 + 2) * 4;
        data[i..i + 4].copy_from_slice(&[255, 255, 255, 255]);
        PixelBuffer::from_raw(5, 5, 20, &data).unwrap()
    }

    #[test]
    fn test_transparent_image_unchanged() {
        let img = PixelBuffer::filled(6, 4, [180, 90, 30, 0]).unwrap();
        let result = add_shadow(&img, 3, 0.5).unwrap();
        assert_eq!(result, img);
    }

    #[test]
    fn test_shadow_halo() {
        let img = dot();
        let result = add_shadow(&img, 2, 1.0).unwrap();

        // Box window [x-1, x+1) covers the dot for x, y in {2, 3}:
        // 255 / 4 = 63, then 63 * 0.75 = 47
        assert_eq!(result.pixel(2, 2), [255, 255, 255, 255]);
        assert_eq!(result.pixel(3, 3), [0, 0, 0, 47]);
        assert_eq!(result.pixel(3, 2), [0, 0, 0, 47]);
        assert_eq!(result.pixel(1, 1), [0, 0, 0, 0]);
        assert_eq!(result.pixel(4, 4), [0, 0, 0, 0]);
    }

    #[test]
    fn test_opacity_is_ignored() {
        let img = dot();
        let low = add_shadow(&img, 3, 0.1).unwrap();
        let high = add_shadow(&img, 3, 0.9).unwrap();
        assert_eq!(low, high);
        assert_eq!(low, add_shadow_with_alpha(&img, 3, SHADOW_ALPHA_FACTOR).unwrap());
    }

    #[test]
    fn test_zero_alpha_factor_returns_original() {
        let img = dot();
        let result = add_shadow_with_alpha(&img, 2, 0.0).unwrap();
        assert_eq!(result, img);
    }

    #[test]
    fn test_stronger_factor_darker_halo() {
        let img = dot();
        let faint = add_shadow_with_alpha(&img, 2, 0.25).unwrap();
        let strong = add_shadow_with_alpha(&img, 2, 1.0).unwrap();
        assert!(strong.pixel(3, 3)[3] > faint.pixel(3, 3)[3]);
    }

    #[test]
    fn test_geometry_preserved() {
        let data = vec![0u8; 24 * 3];
        let img = PixelBuffer::from_raw(5, 3, 24, &data).unwrap();
        let result = add_shadow(&img, 4, 0.75).unwrap();
        assert_eq!(result.dimensions(), (5, 3));
        assert_eq!(result.stride(), 24);
    }

    #[test]
    fn test_invalid_parameters() {
        let img = dot();
        assert_eq!(
            add_shadow(&img, 0, 0.75),
            Err(FilterError::InvalidRadius { radius: 0 })
        );
        assert!(matches!(
            add_shadow_with_alpha(&img, 2, -0.5),
            Err(FilterError::InvalidFactor { .. })
        ));
        assert!(matches!(
            add_shadow_with_alpha(&img, 2, f64::INFINITY),
            Err(FilterError::InvalidFactor { .. })
        ));
    }
}
