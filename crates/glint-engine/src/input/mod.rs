//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types; the
//! runtime translates platform events into `InputEvent`s. Keyboard and
//! focus only — the renderer drives its demos from keys, not pointers.

mod frame;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{InputEvent, Key, KeyState};
