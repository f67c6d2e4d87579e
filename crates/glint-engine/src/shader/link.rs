//! Cross-stage interface linking.
//!
//! Runs entirely on the CPU before any GPU object exists: merges the two
//! stage interfaces, pairs texture bindings with sampler bindings in
//! binding order, and checks the vertex entry point's inputs against the
//! attribute layout the program will be drawn with. Any mismatch is a
//! link failure with a diagnostic naming the offending binding.

use wgpu::ShaderStages;

use crate::error::RenderError;
use crate::geometry::{AttributeLayout, ComponentType};

use super::compile::CompiledStage;
use super::reflect::{self, UniformBlock, VertexInput};

/// A texture/sampler pair, ordered by texture binding. The position in
/// [`ProgramInterface::texture_units`] is the unit index callers pass
/// textures in.
#[derive(Debug, Clone)]
pub(crate) struct TextureUnit {
    pub name: String,
    pub texture_binding: u32,
    pub sampler_binding: u32,
}

/// The merged program interface the pipeline and bind group layout are
/// built from.
#[derive(Debug, Clone)]
pub(crate) struct ProgramInterface {
    pub uniform_block: Option<UniformBlock>,
    /// Which stages read the uniform block.
    pub uniform_visibility: ShaderStages,
    pub texture_units: Vec<TextureUnit>,
}

impl ProgramInterface {
    /// Byte placement of a named uniform member, if the block has one.
    pub fn member(&self, name: &str) -> Option<(u32, u32)> {
        let block = self.uniform_block.as_ref()?;
        block
            .members
            .iter()
            .find(|m| m.name == name)
            .map(|m| (m.offset, m.size))
    }
}

pub(crate) fn link(
    vertex: &CompiledStage,
    fragment: &CompiledStage,
    layout: &AttributeLayout,
) -> Result<ProgramInterface, RenderError> {
    let vs = reflect::reflect_stage(vertex)?;
    let fs = reflect::reflect_stage(fragment)?;

    check_vertex_inputs(&vs.inputs, layout)?;

    let (uniform_block, uniform_visibility) = merge_blocks(vs.uniform_block, fs.uniform_block)?;

    let mut textures = vs.textures;
    textures.extend(fs.textures);
    let mut samplers = vs.samplers;
    samplers.extend(fs.samplers);
    textures.sort_by_key(|slot| slot.binding);
    textures.dedup_by(|a, b| a.binding == b.binding);
    samplers.sort_by_key(|slot| slot.binding);
    samplers.dedup_by(|a, b| a.binding == b.binding);

    if textures.len() != samplers.len() {
        return Err(link_error(format!(
            "{} texture binding(s) but {} sampler binding(s); each texture unit needs one of each",
            textures.len(),
            samplers.len()
        )));
    }

    let texture_units = textures
        .into_iter()
        .zip(samplers)
        .map(|(tex, smp)| TextureUnit {
            name: tex.name,
            texture_binding: tex.binding,
            sampler_binding: smp.binding,
        })
        .collect();

    let interface = ProgramInterface {
        uniform_block,
        uniform_visibility,
        texture_units,
    };
    check_binding_collisions(&interface)?;
    Ok(interface)
}

/// Every vertex input location must be fed by a layout attribute of the
/// same scalar kind and width. Attributes the shader ignores are fine.
fn check_vertex_inputs(
    inputs: &[VertexInput],
    layout: &AttributeLayout,
) -> Result<(), RenderError> {
    for input in inputs {
        let Some(attr) = layout
            .attributes()
            .iter()
            .find(|a| a.location == input.location)
        else {
            return Err(link_error(format!(
                "vertex input @location({}) has no attribute in the layout",
                input.location
            )));
        };

        let kind_matches = matches!(
            (attr.component_type, input.kind),
            (ComponentType::Float32, naga::ScalarKind::Float)
                | (ComponentType::Sint32, naga::ScalarKind::Sint)
                | (ComponentType::Uint32, naga::ScalarKind::Uint)
        );
        if !kind_matches || attr.component_count != input.component_count {
            return Err(link_error(format!(
                "vertex input @location({}) expects {} {:?} component(s); the layout \
                 provides {} x {:?}",
                input.location,
                input.component_count,
                input.kind,
                attr.component_count,
                attr.component_type
            )));
        }
    }
    Ok(())
}

/// Two stages may share one uniform block; if both declare one, the
/// declarations must agree on binding and layout.
fn merge_blocks(
    vs: Option<UniformBlock>,
    fs: Option<UniformBlock>,
) -> Result<(Option<UniformBlock>, ShaderStages), RenderError> {
    match (vs, fs) {
        (None, None) => Ok((None, ShaderStages::empty())),
        (Some(block), None) => Ok((Some(block), ShaderStages::VERTEX)),
        (None, Some(block)) => Ok((Some(block), ShaderStages::FRAGMENT)),
        (Some(vs), Some(fs)) => {
            if vs.binding != fs.binding {
                return Err(link_error(format!(
                    "stages declare uniform blocks at different bindings ({} vs {})",
                    vs.binding, fs.binding
                )));
            }
            if vs.size != fs.size || vs.members != fs.members {
                return Err(link_error(
                    "stages declare uniform blocks with mismatched layouts".to_string(),
                ));
            }
            Ok((Some(vs), ShaderStages::VERTEX_FRAGMENT))
        }
    }
}

fn check_binding_collisions(interface: &ProgramInterface) -> Result<(), RenderError> {
    let mut bindings: Vec<u32> = Vec::new();
    if let Some(block) = &interface.uniform_block {
        bindings.push(block.binding);
    }
    for unit in &interface.texture_units {
        bindings.push(unit.texture_binding);
        bindings.push(unit.sampler_binding);
    }
    bindings.sort_unstable();
    for pair in bindings.windows(2) {
        if pair[0] == pair[1] {
            return Err(link_error(format!(
                "binding {} is used by more than one resource in group 0",
                pair[0]
            )));
        }
    }
    Ok(())
}

fn link_error(diagnostic: String) -> RenderError {
    RenderError::ShaderLink { diagnostic }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::{ShaderStage, compile_stage};

    const VS: &str = r#"
        struct Scene {
            mvp: mat4x4<f32>,
        };
        @group(0) @binding(0) var<uniform> scene: Scene;

        struct VsOut {
            @builtin(position) clip: vec4<f32>,
            @location(0) uv: vec2<f32>,
        };

        @vertex
        fn vs_main(
            @location(0) pos: vec3<f32>,
            @location(1) uv: vec2<f32>,
        ) -> VsOut {
            var out: VsOut;
            out.clip = scene.mvp * vec4<f32>(pos, 1.0);
            out.uv = uv;
            return out;
        }
    "#;

    const FS: &str = r#"
        @group(0) @binding(1) var color_map: texture_2d<f32>;
        @group(0) @binding(2) var color_sampler: sampler;

        @fragment
        fn fs_main(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
            return textureSample(color_map, color_sampler, uv);
        }
    "#;

    fn pos_uv_layout() -> AttributeLayout {
        AttributeLayout::packed(&[
            (0, 3, ComponentType::Float32),
            (1, 2, ComponentType::Float32),
        ])
        .unwrap()
    }

    fn compiled(vs: &str, fs: &str) -> (CompiledStage, CompiledStage) {
        (
            compile_stage(ShaderStage::Vertex, vs).unwrap(),
            compile_stage(ShaderStage::Fragment, fs).unwrap(),
        )
    }

    #[test]
    fn textured_pair_links() {
        let (vs, fs) = compiled(VS, FS);
        let iface = link(&vs, &fs, &pos_uv_layout()).unwrap();

        let block = iface.uniform_block.as_ref().expect("block");
        assert_eq!(block.binding, 0);
        assert_eq!(iface.uniform_visibility, ShaderStages::VERTEX);
        assert_eq!(iface.member("mvp"), Some((0, 64)));
        assert_eq!(iface.member("missing"), None);

        assert_eq!(iface.texture_units.len(), 1);
        assert_eq!(iface.texture_units[0].name, "color_map");
        assert_eq!(iface.texture_units[0].texture_binding, 1);
        assert_eq!(iface.texture_units[0].sampler_binding, 2);
    }

    #[test]
    fn missing_attribute_is_a_link_failure() {
        let (vs, fs) = compiled(VS, FS);
        let positions_only =
            AttributeLayout::packed(&[(0, 3, ComponentType::Float32)]).unwrap();

        let err = link(&vs, &fs, &positions_only).unwrap_err();
        match err {
            RenderError::ShaderLink { diagnostic } => {
                assert!(diagnostic.contains("@location(1)"), "{diagnostic}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn component_count_mismatch_is_a_link_failure() {
        let (vs, fs) = compiled(VS, FS);
        let wrong_width = AttributeLayout::packed(&[
            (0, 2, ComponentType::Float32),
            (1, 2, ComponentType::Float32),
        ])
        .unwrap();

        let err = link(&vs, &fs, &wrong_width).unwrap_err();
        assert!(matches!(err, RenderError::ShaderLink { .. }));
    }

    #[test]
    fn sampler_without_texture_is_a_link_failure() {
        let fs_extra_sampler = r#"
            @group(0) @binding(1) var color_map: texture_2d<f32>;
            @group(0) @binding(2) var color_sampler: sampler;
            @group(0) @binding(3) var stray_sampler: sampler;

            @fragment
            fn fs_main(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
                _ = stray_sampler;
                return textureSample(color_map, color_sampler, uv);
            }
        "#;
        let (vs, fs) = compiled(VS, fs_extra_sampler);
        let err = link(&vs, &fs, &pos_uv_layout()).unwrap_err();
        assert!(matches!(err, RenderError::ShaderLink { .. }));
    }

    #[test]
    fn shared_block_merges_with_both_visibilities() {
        let fs_with_block = r#"
            struct Scene {
                mvp: mat4x4<f32>,
            };
            @group(0) @binding(0) var<uniform> scene: Scene;

            @fragment
            fn fs_main(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
                _ = uv;
                return scene.mvp[0];
            }
        "#;
        let (vs, fs) = compiled(VS, fs_with_block);
        let iface = link(&vs, &fs, &pos_uv_layout()).unwrap();
        assert_eq!(iface.uniform_visibility, ShaderStages::VERTEX_FRAGMENT);
        assert!(iface.texture_units.is_empty());
    }

    #[test]
    fn conflicting_block_bindings_fail_to_link() {
        let fs_other_binding = r#"
            struct Fog {
                color: vec4<f32>,
            };
            @group(0) @binding(0) var<uniform> fog: Fog;

            @fragment
            fn fs_main(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
                _ = uv;
                return fog.color;
            }
        "#;
        let (vs, fs) = compiled(VS, fs_other_binding);
        // Same binding, different layout.
        let err = link(&vs, &fs, &pos_uv_layout()).unwrap_err();
        assert!(matches!(err, RenderError::ShaderLink { .. }));
    }
}
