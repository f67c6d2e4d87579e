//! Vertex geometry: attribute layouts and GPU-side vertex/index storage.
//!
//! The wire format between caller and engine is a flat `&[f32]` whose
//! grouping (position/color/texcoord/...) is defined entirely by the
//! [`AttributeLayout`] passed alongside it.

mod buffer;
mod layout;

pub use buffer::GeometryBuffer;
pub use layout::{Attribute, AttributeLayout, ComponentType};
