//! GPU rendering subsystem.
//!
//! The implicit "currently bound" state of the graphics API is modeled
//! explicitly: resource constructors take a [`GraphicsContext`] value, and
//! per-frame binding happens through [`ScenePass`] method calls.
//!
//! Convention:
//! - one render pass per frame: clear, bind, draw, present
//! - the viewport is stamped from the current framebuffer size when the
//!   pass opens, so a resize is visible on the very next draw

mod ctx;
mod pass;

pub use ctx::GraphicsContext;
pub use pass::ScenePass;
