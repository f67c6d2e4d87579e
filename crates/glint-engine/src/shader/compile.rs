use std::fmt;

use crate::error::RenderError;

/// Pipeline stage a shader source targets.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub(crate) fn naga(self) -> naga::ShaderStage {
        match self {
            Self::Vertex => naga::ShaderStage::Vertex,
            Self::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => write!(f, "vertex"),
            Self::Fragment => write!(f, "fragment"),
        }
    }
}

/// A successfully compiled stage: validated IR plus the source text the
/// GPU module will be created from at link time.
#[derive(Debug)]
pub struct CompiledStage {
    pub stage: ShaderStage,
    pub source: String,
    pub entry_point: String,
    pub(crate) module: naga::Module,
}

/// Compiles one WGSL stage.
///
/// Parse errors, validation errors, and a missing entry point for the
/// requested stage all surface as [`RenderError::ShaderCompile`] with the
/// raw diagnostic text; the caller is never aborted.
pub fn compile_stage(stage: ShaderStage, source: &str) -> Result<CompiledStage, RenderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| RenderError::ShaderCompile {
        stage,
        diagnostic: e.emit_to_string(source),
    })?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator
        .validate(&module)
        .map_err(|e| RenderError::ShaderCompile {
            stage,
            diagnostic: format!("validation error: {e}"),
        })?;

    let entry_point = module
        .entry_points
        .iter()
        .find(|ep| ep.stage == stage.naga())
        .map(|ep| ep.name.clone())
        .ok_or_else(|| RenderError::ShaderCompile {
            stage,
            diagnostic: format!("source defines no {stage} entry point"),
        })?;

    Ok(CompiledStage {
        stage,
        source: source.to_string(),
        entry_point,
        module,
    })
}
