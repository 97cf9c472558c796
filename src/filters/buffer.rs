//! RGBA8 pixel buffer shared by all filters.
//!
//! Pixels are always stored tightly packed as an `(height, width, 4)` array.
//! The row stride reported by the buffer source is kept as metadata and only
//! applied when converting from or to a raw byte region (`from_raw` /
//! `to_raw`). Every filter output inherits the stride of its primary input.

use ndarray::{Array3, ArrayView3};
use tracing::trace;

use super::core::try_alloc;
use crate::error::{FilterError, Result};

/// Bytes per pixel: red, green, blue, alpha.
pub const CHANNELS: usize = 4;

/// An owned RGBA8 image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Array3<u8>,
    stride: usize,
}

impl PixelBuffer {
    /// Create a transparent black buffer with a tight stride.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let pixels = alloc_pixels(width, height)?;
        Ok(Self {
            pixels,
            stride: width * CHANNELS,
        })
    }

    /// Create a buffer where every pixel is `rgba`.
    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> Result<Self> {
        let mut buffer = Self::new(width, height)?;
        for px in buffer.flat_mut().chunks_exact_mut(CHANNELS) {
            px.copy_from_slice(&rgba);
        }
        Ok(buffer)
    }

    /// Wrap an existing `(height, width, 4)` array.
    pub fn from_pixels(pixels: Array3<u8>) -> Result<Self> {
        let (height, width, channels) = pixels.dim();
        if width == 0 || height == 0 {
            return Err(FilterError::EmptyBuffer);
        }
        if channels != CHANNELS {
            return Err(FilterError::InvalidChannels { channels });
        }
        // Force standard layout so flat slice access is always available.
        let pixels = if pixels.is_standard_layout() {
            pixels
        } else {
            pixels.as_standard_layout().into_owned()
        };
        Ok(Self {
            pixels,
            stride: width * CHANNELS,
        })
    }

    /// Copy pixels out of a strided byte region supplied by a buffer source.
    ///
    /// Bytes past `width * 4` in each row are padding and are not read. The
    /// last row does not need trailing padding.
    pub fn from_raw(width: usize, height: usize, stride: usize, data: &[u8]) -> Result<Self> {
        let row_bytes = row_bytes(width, height)?;
        if stride < row_bytes {
            return Err(FilterError::StrideTooSmall {
                stride,
                min: row_bytes,
            });
        }
        let expected = stride
            .checked_mul(height - 1)
            .and_then(|n| n.checked_add(row_bytes))
            .ok_or(FilterError::SizeOverflow)?;
        if data.len() < expected {
            return Err(FilterError::InsufficientData {
                expected,
                actual: data.len(),
            });
        }

        trace!(width, height, stride, "importing raw pixel data");

        let mut buffer = Self::new(width, height)?;
        buffer.stride = stride;
        let dst = buffer.flat_mut();
        for (y, row) in dst.chunks_exact_mut(row_bytes).enumerate() {
            let start = y * stride;
            row.copy_from_slice(&data[start..start + row_bytes]);
        }
        Ok(buffer)
    }

    /// Copy pixels into a `stride * height` byte region for a buffer sink.
    ///
    /// Row padding is zero-filled.
    pub fn to_raw(&self) -> Result<Vec<u8>> {
        let row_bytes = self.width() * CHANNELS;
        let total = self
            .stride
            .checked_mul(self.height())
            .ok_or(FilterError::SizeOverflow)?;
        let mut out = try_alloc::<u8>(total)?;
        out.resize(total, 0);

        for (src, dst) in self
            .flat()
            .chunks_exact(row_bytes)
            .zip(out.chunks_exact_mut(self.stride))
        {
            dst[..row_bytes].copy_from_slice(src);
        }
        Ok(out)
    }

    pub fn width(&self) -> usize {
        self.pixels.dim().1
    }

    pub fn height(&self) -> usize {
        self.pixels.dim().0
    }

    /// Row stride in bytes, as reported by the buffer source.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// `(width, height)` pair, used for dimension checks.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    /// Read-only `(height, width, 4)` view of the pixels.
    pub fn view(&self) -> ArrayView3<'_, u8> {
        self.pixels.view()
    }

    /// RGBA value at column `x`, row `y`.
    ///
    /// # Panics
    /// Panics if the coordinate is outside the buffer.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        [
            self.pixels[[y, x, 0]],
            self.pixels[[y, x, 1]],
            self.pixels[[y, x, 2]],
            self.pixels[[y, x, 3]],
        ]
    }

    pub fn into_pixels(self) -> Array3<u8> {
        self.pixels
    }

    /// Tightly packed RGBA bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        self.flat()
    }

    /// Allocate an empty output buffer with this buffer's geometry and stride.
    pub(crate) fn empty_like(&self) -> Result<Self> {
        let mut out = Self::new(self.width(), self.height())?;
        out.stride = self.stride;
        Ok(out)
    }

    pub(crate) fn flat(&self) -> &[u8] {
        self.pixels
            .as_slice()
            .unwrap_or_else(|| unreachable!("pixel arrays are kept in standard layout"))
    }

    pub(crate) fn flat_mut(&mut self) -> &mut [u8] {
        self.pixels
            .as_slice_mut()
            .unwrap_or_else(|| unreachable!("pixel arrays are kept in standard layout"))
    }
}

fn row_bytes(width: usize, height: usize) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(FilterError::EmptyBuffer);
    }
    width.checked_mul(CHANNELS).ok_or(FilterError::SizeOverflow)
}

/// Reserve a zeroed `(height, width, 4)` array, reporting allocation failure
/// instead of aborting.
fn alloc_pixels(width: usize, height: usize) -> Result<Array3<u8>> {
    let len = row_bytes(width, height)?
        .checked_mul(height)
        .ok_or(FilterError::SizeOverflow)?;
    let mut data = try_alloc::<u8>(len)?;
    data.resize(len, 0);
    Array3::from_shape_vec((height, width, CHANNELS), data).map_err(|_| FilterError::SizeOverflow)
}
