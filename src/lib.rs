//! Pack planar 8-bit rasters into native true-color pixel layouts.
//!
//! A true-color display describes its pixel format with three channel
//! bit-masks, a pixel size in bits, and the byte order of pixel words in
//! memory. This crate converts one (gray-scale) or three (red, green, blue)
//! planar 8-bit channel buffers into a single interleaved buffer in exactly
//! that format, whatever the channel widths and positions:
//!
//! - [`resolve`] / [`FormatPlan`] — decode channel masks into bit offsets and
//!   value ranges, once per target format
//! - [`ByteOrder`] — host byte order, detected once
//! - [`PlanarImage`] — borrowed one- or three-plane source image
//! - [`pack`] / [`Packer`] — quantize, assemble and serialize every pixel
//!   into a fresh [`PackedBuffer`]
//! - [`PackLimits`] — optional caps checked before any pixel work
//!
//! ```
//! use truecolor_pack::{ChannelMasks, FormatPlan, Packer, PlanarImage};
//!
//! let plan = FormatPlan::from_masks(ChannelMasks::RGB888, 32)?;
//! let packer = Packer::new(plan);
//!
//! let (r, g, b) = ([255u8, 0], [0u8, 255], [0u8, 0]);
//! let packed = packer.pack(&PlanarImage::rgb(&r, &g, &b), 1, 2)?;
//! assert_eq!(packed.as_bytes().len(), 8);
//! # Ok::<(), truecolor_pack::PackError>(())
//! ```
//!
//! Masks must be non-overlapping contiguous runs of bits; this is assumed,
//! not validated. Connecting to a display, choosing a visual and loading
//! image files are left to the caller.

#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;

mod byte_order;
mod error;
mod limits;
mod mask;
mod packer;
mod planar;

pub use byte_order::ByteOrder;
pub use error::PackError;
pub use limits::{LimitExceeded, PackLimits};
pub use mask::{
    ChannelEncoding, ChannelMask, ChannelMasks, FormatPlan, pixel_bits_for_visual, resolve,
};
pub use packer::{PackedBuffer, Packer, pack};
pub use planar::PlanarImage;

// Re-exports for callers building samples and planes.
pub use imgref::{Img, ImgRef, ImgVec};
pub use rgb::Rgb;
