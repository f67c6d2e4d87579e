//! Stage interface reflection.
//!
//! Walks a validated naga module and extracts the parts of the interface
//! the program needs at link time: the group-0 uniform block with member
//! byte offsets, texture/sampler bindings, and (for the vertex stage)
//! the entry point's input locations.

use crate::error::RenderError;

use super::compile::{CompiledStage, ShaderStage};

/// One named member of a uniform block, with its std140-style placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UniformMember {
    pub name: String,
    pub offset: u32,
    pub size: u32,
}

/// A `var<uniform>` struct declared by one stage.
#[derive(Debug, Clone)]
pub(crate) struct UniformBlock {
    pub binding: u32,
    pub size: u32,
    pub members: Vec<UniformMember>,
}

/// A texture or sampler binding declared by one stage.
#[derive(Debug, Clone)]
pub(crate) struct ResourceSlot {
    pub name: String,
    pub binding: u32,
}

/// A vertex entry point input location and its scalar shape.
#[derive(Debug, Clone)]
pub(crate) struct VertexInput {
    pub location: u32,
    pub kind: naga::ScalarKind,
    pub component_count: u32,
}

/// Everything one stage exposes to the linker.
#[derive(Debug, Clone, Default)]
pub(crate) struct StageInterface {
    pub uniform_block: Option<UniformBlock>,
    pub textures: Vec<ResourceSlot>,
    pub samplers: Vec<ResourceSlot>,
    /// Populated for the vertex stage only.
    pub inputs: Vec<VertexInput>,
}

pub(crate) fn reflect_stage(compiled: &CompiledStage) -> Result<StageInterface, RenderError> {
    let module = &compiled.module;
    let mut interface = StageInterface::default();

    for (_, var) in module.global_variables.iter() {
        let Some(binding) = &var.binding else {
            continue;
        };
        let name = var.name.clone().unwrap_or_default();

        if binding.group != 0 {
            return Err(link_error(format!(
                "{} stage: `{name}` is bound to group {}; only bind group 0 is supported",
                compiled.stage, binding.group
            )));
        }

        match &module.types[var.ty].inner {
            naga::TypeInner::Struct { members, span } if var.space == naga::AddressSpace::Uniform => {
                if interface.uniform_block.is_some() {
                    return Err(link_error(format!(
                        "{} stage declares more than one uniform block",
                        compiled.stage
                    )));
                }
                interface.uniform_block = Some(reflect_block(module, binding.binding, members, *span));
            }
            naga::TypeInner::Image { .. } => {
                interface.textures.push(ResourceSlot {
                    name,
                    binding: binding.binding,
                });
            }
            naga::TypeInner::Sampler { .. } => {
                interface.samplers.push(ResourceSlot {
                    name,
                    binding: binding.binding,
                });
            }
            other => {
                return Err(link_error(format!(
                    "{} stage: `{name}` has unsupported binding type {other:?}",
                    compiled.stage
                )));
            }
        }
    }

    interface.textures.sort_by_key(|slot| slot.binding);
    interface.samplers.sort_by_key(|slot| slot.binding);

    if compiled.stage == ShaderStage::Vertex {
        interface.inputs = reflect_vertex_inputs(compiled)?;
    }

    Ok(interface)
}

fn reflect_block(
    module: &naga::Module,
    binding: u32,
    members: &[naga::StructMember],
    span: u32,
) -> UniformBlock {
    let members = members
        .iter()
        .map(|m| UniformMember {
            name: m.name.clone().unwrap_or_default(),
            offset: m.offset,
            size: module.types[m.ty].inner.size(module.to_ctx()),
        })
        .collect();

    UniformBlock {
        binding,
        size: span,
        members,
    }
}

fn reflect_vertex_inputs(compiled: &CompiledStage) -> Result<Vec<VertexInput>, RenderError> {
    let module = &compiled.module;
    let entry = module
        .entry_points
        .iter()
        .find(|ep| ep.stage == naga::ShaderStage::Vertex)
        .expect("compile_stage verified the entry point");

    let mut inputs = Vec::new();
    for arg in &entry.function.arguments {
        match &arg.binding {
            Some(naga::Binding::Location { location, .. }) => {
                inputs.push(input_at(compiled, module, *location, arg.ty)?);
            }
            Some(naga::Binding::BuiltIn(_)) => {}
            // Arguments without a binding are structs whose members carry
            // the locations.
            None => {
                if let naga::TypeInner::Struct { members, .. } = &module.types[arg.ty].inner {
                    for member in members {
                        if let Some(naga::Binding::Location { location, .. }) = &member.binding {
                            inputs.push(input_at(compiled, module, *location, member.ty)?);
                        }
                    }
                }
            }
        }
    }

    inputs.sort_by_key(|input| input.location);
    Ok(inputs)
}

fn input_at(
    compiled: &CompiledStage,
    module: &naga::Module,
    location: u32,
    ty: naga::Handle<naga::Type>,
) -> Result<VertexInput, RenderError> {
    let (kind, component_count) = match &module.types[ty].inner {
        naga::TypeInner::Scalar(scalar) => (scalar.kind, 1),
        naga::TypeInner::Vector { size, scalar } => (scalar.kind, *size as u32),
        other => {
            return Err(link_error(format!(
                "{} stage: input @location({location}) has unsupported type {other:?}",
                compiled.stage
            )));
        }
    };

    Ok(VertexInput {
        location,
        kind,
        component_count,
    })
}

fn link_error(diagnostic: String) -> RenderError {
    RenderError::ShaderLink { diagnostic }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::compile_stage;

    const VS: &str = r#"
        struct Scene {
            model: mat4x4<f32>,
            tint: vec4<f32>,
            intensity: f32,
        };
        @group(0) @binding(0) var<uniform> scene: Scene;

        @vertex
        fn vs_main(
            @location(0) pos: vec3<f32>,
            @location(1) uv: vec2<f32>,
        ) -> @builtin(position) vec4<f32> {
            _ = uv;
            _ = scene.intensity;
            return scene.model * (scene.tint + vec4<f32>(pos, 1.0));
        }
    "#;

    const FS: &str = r#"
        @group(0) @binding(1) var color_map: texture_2d<f32>;
        @group(0) @binding(2) var color_sampler: sampler;

        @fragment
        fn fs_main() -> @location(0) vec4<f32> {
            return textureSampleLevel(color_map, color_sampler, vec2<f32>(0.5), 0.0);
        }
    "#;

    #[test]
    fn uniform_block_members_have_std_offsets() {
        let vs = compile_stage(ShaderStage::Vertex, VS).unwrap();
        let iface = reflect_stage(&vs).unwrap();

        let block = iface.uniform_block.expect("block");
        assert_eq!(block.binding, 0);
        let find = |name: &str| {
            block
                .members
                .iter()
                .find(|m| m.name == name)
                .unwrap_or_else(|| panic!("missing member {name}"))
        };
        assert_eq!(find("model").offset, 0);
        assert_eq!(find("model").size, 64);
        assert_eq!(find("tint").offset, 64);
        assert_eq!(find("tint").size, 16);
        assert_eq!(find("intensity").offset, 80);
        assert_eq!(find("intensity").size, 4);
    }

    #[test]
    fn vertex_inputs_are_reflected_in_location_order() {
        let vs = compile_stage(ShaderStage::Vertex, VS).unwrap();
        let iface = reflect_stage(&vs).unwrap();

        assert_eq!(iface.inputs.len(), 2);
        assert_eq!(iface.inputs[0].location, 0);
        assert_eq!(iface.inputs[0].component_count, 3);
        assert_eq!(iface.inputs[1].location, 1);
        assert_eq!(iface.inputs[1].component_count, 2);
        assert!(matches!(iface.inputs[0].kind, naga::ScalarKind::Float));
    }

    #[test]
    fn texture_and_sampler_slots_are_collected() {
        let fs = compile_stage(ShaderStage::Fragment, FS).unwrap();
        let iface = reflect_stage(&fs).unwrap();

        assert!(iface.uniform_block.is_none());
        assert_eq!(iface.textures.len(), 1);
        assert_eq!(iface.textures[0].name, "color_map");
        assert_eq!(iface.textures[0].binding, 1);
        assert_eq!(iface.samplers.len(), 1);
        assert_eq!(iface.samplers[0].binding, 2);
    }

    #[test]
    fn nonzero_group_is_rejected() {
        let src = r#"
            @group(1) @binding(0) var bad: sampler;
            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                _ = bad;
                return vec4<f32>(0.0);
            }
        "#;
        let fs = compile_stage(ShaderStage::Fragment, src).unwrap();
        let err = reflect_stage(&fs).unwrap_err();
        assert!(matches!(err, RenderError::ShaderLink { .. }));
    }
}
