//! Glint engine crate.
//!
//! A small hardware-accelerated geometry renderer built on wgpu: shader
//! program lifecycle + uniform binding, vertex-layout/geometry buffers,
//! texture upload, the model/view/projection transform pipeline, and the
//! per-frame run loop that ties them together.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod error;
pub mod logging;
pub mod render;
pub mod geometry;
pub mod shader;
pub mod texture;
pub mod transform;
