//! Shader programs.
//!
//! A program is built from two plain-text WGSL sources, one per stage.
//! Each stage compiles independently (naga parse + validate) so failures
//! carry per-stage diagnostics; linking merges the stage interfaces,
//! checks them against the vertex layout, and produces the render
//! pipeline plus the uniform buffer behind `set_uniform`.
//!
//! Compile and link failures never panic and never abort construction:
//! the resulting program reports `Failed` and the caller decides whether
//! that is fatal to the session.

mod compile;
mod link;
mod program;
mod reflect;

pub use compile::{CompiledStage, ShaderStage, compile_stage};
pub use program::{
    ProgramBindings, ProgramDescriptor, ProgramState, ShaderProgram, UniformValue,
};

use std::path::Path;

use crate::error::RenderError;

/// Reads a shader source file.
///
/// The file-loading seam: callers hand paths to their sources and get
/// the text (or a [`RenderError::FileRead`]) back.
pub fn load_source(path: impl AsRef<Path>) -> Result<String, RenderError> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|source| RenderError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}
