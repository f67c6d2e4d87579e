//! Engine error types.
//!
//! Diagnostics travel in values; the caller decides whether a failure is
//! fatal to the session. Nothing in this module aborts the process.

use std::path::PathBuf;

use crate::shader::ShaderStage;

/// Errors produced while building or using rendering resources.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A single shader stage failed to compile.
    ///
    /// Carries the raw compiler diagnostic so the caller can act on it.
    #[error("{stage} shader compilation failed: {diagnostic}")]
    ShaderCompile {
        stage: ShaderStage,
        diagnostic: String,
    },

    /// Both stages compiled but the program could not be linked
    /// (mismatched interfaces, unsupported binding arrangement, ...).
    #[error("shader program link failed: {diagnostic}")]
    ShaderLink { diagnostic: String },

    /// A source file could not be read.
    ///
    /// Surfaced at the file-loading seam (`shader::load_source`).
    #[error("failed to read {}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The image-decoding collaborator failed to produce pixels.
    #[error("failed to decode image {}: {reason}", path.display())]
    ImageDecode { path: PathBuf, reason: String },

    /// A vertex attribute layout violates its invariants.
    #[error("invalid attribute layout: {0}")]
    InvalidLayout(String),

    /// A pixel buffer does not match its declared dimensions/channels.
    #[error("invalid pixel data: {0}")]
    InvalidPixelData(String),

    /// Texture bindings supplied to a program do not match its slots.
    #[error("texture binding mismatch: program expects {expected}, got {got}")]
    BindingMismatch { expected: usize, got: usize },

    /// An operation that needs a linked program ran against a failed one.
    #[error("shader program is not linked")]
    ProgramNotLinked,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_stage_and_diagnostic() {
        let err = RenderError::ShaderCompile {
            stage: ShaderStage::Vertex,
            diagnostic: "unexpected token".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("vertex"));
        assert!(msg.contains("unexpected token"));
    }

    #[test]
    fn display_binding_mismatch() {
        let err = RenderError::BindingMismatch {
            expected: 2,
            got: 0,
        };
        assert_eq!(
            err.to_string(),
            "texture binding mismatch: program expects 2, got 0"
        );
    }
}
