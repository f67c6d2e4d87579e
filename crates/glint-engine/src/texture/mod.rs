//! 2D texture resources.
//!
//! Image decoding is external: anything able to produce a [`PixelBuffer`]
//! (width x height x channels, row-major, unsigned bytes) can feed
//! [`TextureResource`]. The vertical-flip policy belongs to that decoding
//! collaborator and is applied once per session, before any texture is
//! built; [`PixelBuffer::flip_vertical`] exists for its benefit.

mod mipmap;
mod pixels;
mod resource;

pub use mipmap::mip_level_count;
pub use pixels::PixelBuffer;
pub use resource::{FilterMode, TextureResource, WrapMode};
