//! Filter modules for RGBA8 pixel buffers.
//!
//! ## Buffer Format
//!
//! | Property | Value |
//! |----------|-------|
//! | Channels | 4: red, green, blue, alpha |
//! | Depth | u8 per channel, 0-255 |
//! | Storage | tightly packed `(height, width, 4)` array |
//! | Stride | recorded from the source, applied on `from_raw` / `to_raw` |
//!
//! ## Architecture
//!
//! All filters follow these principles:
//! - **Pure** - inputs are borrowed and never modified, each call returns a new buffer
//! - **Saturating** - every computed channel is clamped into 0-255 and truncated
//! - **Alpha is data** - blur and combine treat alpha exactly like color
//! - **Fail fast** - invalid geometry or parameters return a [`FilterError`](crate::error::FilterError)
//!
//! ## Filter Categories
//!
//! - **Spatial**: box blur, Gaussian blur (`blur`)
//! - **Pixel-wise**: tint, multiply (`color_adjust`)
//! - **Combining**: additive blend (`blend`)
//! - **Effects**: drop shadow (`drop_shadow`)

pub mod buffer;
pub mod core;

pub mod blend;
pub mod blur;
pub mod color_adjust;
pub mod drop_shadow;
