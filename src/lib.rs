//! Pixbuf Filters
//!
//! Raster filters for packed RGBA8 pixel buffers: box and Gaussian blur,
//! additive combining, tinting, channel multiplication and a drop shadow
//! built from those primitives. Python bindings via PyO3 and WASM bindings
//! for JavaScript are available behind the `python` and `wasm` features.
//!
//! ## Image Format
//! Every buffer is RGBA with one `u8` per channel. Internally pixels are
//! stored tightly packed as a `(height, width, 4)` array; a row stride
//! reported by the buffer source is remembered and re-applied when the
//! result is handed back with [`PixelBuffer::to_raw`].
//!
//! ## Filter Architecture
//! Every operation borrows its inputs and returns a new buffer with the same
//! dimensions as its primary input. Invalid geometry or parameters are
//! reported as [`FilterError`] rather than read out of bounds.

pub mod error;
pub mod filters;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{FilterError, Result};
pub use filters::blend::{combine, BlendingMode};
pub use filters::blur::{blur, convolve, BlurMode};
pub use filters::buffer::PixelBuffer;
pub use filters::color_adjust::{scale, tint};
pub use filters::core::{clamp, generate_kernel, int_clamp, Kernel};
pub use filters::drop_shadow::{add_shadow, add_shadow_with_alpha, SHADOW_ALPHA_FACTOR};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::{PyMemoryError, PyValueError};
    use pyo3::prelude::*;

    use crate::error::FilterError;
    use crate::filters::blend::{combine, BlendingMode};
    use crate::filters::blur::blur;
    use crate::filters::buffer::PixelBuffer;
    use crate::filters::color_adjust::{scale, tint};
    use crate::filters::core::clamp as clamp_impl;
    use crate::filters::drop_shadow::{add_shadow, SHADOW_ALPHA_FACTOR};

    impl From<FilterError> for PyErr {
        fn from(err: FilterError) -> PyErr {
            match err {
                FilterError::AllocationFailed { .. } => PyMemoryError::new_err(err.to_string()),
                _ => PyValueError::new_err(err.to_string()),
            }
        }
    }

    fn to_buffer(image: &PyReadonlyArray3<'_, u8>) -> PyResult<PixelBuffer> {
        Ok(PixelBuffer::from_pixels(image.as_array().to_owned())?)
    }

    fn to_radius(radius: i64) -> PyResult<u32> {
        u32::try_from(radius)
            .ok()
            .filter(|&r| r > 0)
            .ok_or_else(|| FilterError::InvalidRadius { radius }.into())
    }

    fn to_array(py: Python<'_>, buffer: PixelBuffer) -> Bound<'_, PyArray3<u8>> {
        buffer.into_pixels().into_pyarray(py)
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    /// Clamp `number` into `[floor, ceiling]`.
    #[pyfunction]
    pub fn clamp(number: f64, floor: f64, ceiling: f64) -> f64 {
        clamp_impl(number, floor, ceiling)
    }

    // ========================================================================
    // Blur
    // ========================================================================

    /// Blur an RGBA u8 image.
    ///
    /// # Arguments
    /// * `image` - RGBA image (height, width, 4) as u8
    /// * `radius` - Blur radius in pixels (> 0)
    /// * `use_box_mode` - Box blur when true, Gaussian kernel when false
    #[pyfunction]
    #[pyo3(signature = (image, radius, use_box_mode=false))]
    pub fn blur_pixbuf<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        radius: i64,
        use_box_mode: bool,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let buffer = to_buffer(&image)?;
        let result = blur(&buffer, to_radius(radius)?, use_box_mode)?;
        Ok(to_array(py, result))
    }

    // ========================================================================
    // Channel transforms
    // ========================================================================

    /// Add two RGBA images of identical size.
    ///
    /// `mode` is the integer blending mode code (0 = add).
    #[pyfunction]
    #[pyo3(signature = (image_a, image_b, mode=0))]
    pub fn combine_pixbufs<'py>(
        py: Python<'py>,
        image_a: PyReadonlyArray3<'py, u8>,
        image_b: PyReadonlyArray3<'py, u8>,
        mode: i64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let mode = BlendingMode::try_from(mode)?;
        let a = to_buffer(&image_a)?;
        let b = to_buffer(&image_b)?;
        let result = combine(&a, &b, mode)?;
        Ok(to_array(py, result))
    }

    /// Replace RGB with a constant color, preserving alpha.
    #[pyfunction]
    pub fn tint_pixbuf<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        red: u8,
        green: u8,
        blue: u8,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let buffer = to_buffer(&image)?;
        let result = tint(&buffer, red, green, blue)?;
        Ok(to_array(py, result))
    }

    /// Multiply each channel by a factor, saturating to 0-255.
    #[pyfunction]
    #[pyo3(signature = (image, red=1.0, green=1.0, blue=1.0, alpha=1.0))]
    pub fn scale_pixbuf<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        red: f64,
        green: f64,
        blue: f64,
        alpha: f64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let buffer = to_buffer(&image)?;
        let result = scale(&buffer, red, green, blue, alpha)?;
        Ok(to_array(py, result))
    }

    // ========================================================================
    // Effects
    // ========================================================================

    /// Apply a drop shadow to an RGBA u8 image.
    ///
    /// `opacity` is accepted but the shadow always uses a 0.75 alpha factor.
    #[pyfunction]
    #[pyo3(signature = (image, radius, opacity=SHADOW_ALPHA_FACTOR))]
    pub fn add_shadow_to_pixbuf<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        radius: i64,
        opacity: f64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let buffer = to_buffer(&image)?;
        let result = add_shadow(&buffer, to_radius(radius)?, opacity)?;
        Ok(to_array(py, result))
    }

    /// Pixbuf filters extension module
    #[pymodule]
    pub fn pixbuf_filters(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(clamp, m)?)?;
        m.add_function(wrap_pyfunction!(blur_pixbuf, m)?)?;
        m.add_function(wrap_pyfunction!(combine_pixbufs, m)?)?;
        m.add_function(wrap_pyfunction!(tint_pixbuf, m)?)?;
        m.add_function(wrap_pyfunction!(scale_pixbuf, m)?)?;
        m.add_function(wrap_pyfunction!(add_shadow_to_pixbuf, m)?)?;

        m.add("BLEND_ADD", BlendingMode::Add.code())?;

        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::pixbuf_filters;
