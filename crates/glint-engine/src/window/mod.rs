//! Platform runtime.
//!
//! Owns the winit event loop and the single window + GPU pair, drives
//! input translation and the per-frame callback.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
