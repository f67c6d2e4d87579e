use std::collections::HashMap;

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::error::RenderError;
use crate::render::GraphicsContext;
use crate::texture::TextureResource;

use super::compile::{CompiledStage, ShaderStage, compile_stage};
use super::link::{self, ProgramInterface};
use crate::geometry::AttributeLayout;

/// Everything needed to build a [`ShaderProgram`].
pub struct ProgramDescriptor<'a> {
    pub label: &'a str,
    pub vertex_source: &'a str,
    pub fragment_source: &'a str,
    /// The vertex layout geometry drawn with this program will use.
    pub layout: &'a AttributeLayout,
    /// Depth test + write; ignored when the device has no depth buffer.
    pub depth_test: bool,
}

/// Observable lifecycle state of a program.
///
/// Construction compiles and links in one step, so callers only ever see
/// the terminal states. A rebuilt program is a new value with a fresh
/// uniform cache.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ProgramState {
    /// Pipeline exists; uniforms and draws work.
    Linked,
    /// Compilation or linking failed; diagnostics are in `errors()`.
    /// Binding a failed program skips draws instead of crashing.
    Failed,
}

/// A typed value routed into the program's uniform block by member name.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue {
    /// Uploaded as a `u32` (0 or 1), matching WGSL's host-shareable rules.
    Bool(bool),
    Int(i32),
    UInt(u32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
}

impl UniformValue {
    fn bytes(&self) -> Vec<u8> {
        match self {
            Self::Bool(b) => bytemuck::bytes_of(&(*b as u32)).to_vec(),
            Self::Int(v) => bytemuck::bytes_of(v).to_vec(),
            Self::UInt(v) => bytemuck::bytes_of(v).to_vec(),
            Self::Float(v) => bytemuck::bytes_of(v).to_vec(),
            Self::Vec2(v) => bytemuck::bytes_of(v).to_vec(),
            Self::Vec3(v) => bytemuck::bytes_of(v).to_vec(),
            Self::Vec4(v) => bytemuck::bytes_of(v).to_vec(),
            Self::Mat4(v) => bytemuck::bytes_of(v).to_vec(),
        }
    }
}

impl From<bool> for UniformValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}
impl From<i32> for UniformValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}
impl From<u32> for UniformValue {
    fn from(v: u32) -> Self {
        Self::UInt(v)
    }
}
impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}
impl From<Vec2> for UniformValue {
    fn from(v: Vec2) -> Self {
        Self::Vec2(v)
    }
}
impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self {
        Self::Vec3(v)
    }
}
impl From<Vec4> for UniformValue {
    fn from(v: Vec4) -> Self {
        Self::Vec4(v)
    }
}
impl From<Mat4> for UniformValue {
    fn from(v: Mat4) -> Self {
        Self::Mat4(v)
    }
}

#[derive(Debug, Copy, Clone)]
struct UniformLocation {
    offset: u32,
    size: u32,
}

struct ProgramGpu {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    uniform_buffer: Option<wgpu::Buffer>,
}

/// Group 0 bindings for one program: the uniform buffer plus the texture
/// units, ready to bind on a [`crate::render::ScenePass`].
#[derive(Debug)]
pub struct ProgramBindings {
    bind_group: wgpu::BindGroup,
}

impl ProgramBindings {
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

/// A linked (or failed) pair of WGSL stages with its pipeline, uniform
/// buffer, and the name-to-offset cache behind [`Self::set_uniform`].
pub struct ShaderProgram {
    label: String,
    state: ProgramState,
    errors: Vec<RenderError>,
    interface: Option<ProgramInterface>,
    gpu: Option<ProgramGpu>,
    /// Lazy per-name lookup results. `None` records a miss so unknown
    /// names are resolved (and logged) at most once.
    location_cache: HashMap<String, Option<UniformLocation>>,
}

impl ShaderProgram {
    /// Compiles both stages, links them against `layout`, and builds the
    /// pipeline. Never panics: on failure the program lands in
    /// [`ProgramState::Failed`] carrying every diagnostic collected, and
    /// stays safely bindable.
    pub fn new(gfx: &GraphicsContext<'_>, desc: &ProgramDescriptor<'_>) -> Self {
        match Self::build(gfx, desc) {
            Ok(program) => {
                log::debug!("shader program `{}` linked", desc.label);
                program
            }
            Err(errors) => {
                for err in &errors {
                    log::error!("shader program `{}`: {err}", desc.label);
                }
                Self {
                    label: desc.label.to_string(),
                    state: ProgramState::Failed,
                    errors,
                    interface: None,
                    gpu: None,
                    location_cache: HashMap::new(),
                }
            }
        }
    }

    fn build(
        gfx: &GraphicsContext<'_>,
        desc: &ProgramDescriptor<'_>,
    ) -> Result<Self, Vec<RenderError>> {
        // Compile both stages even when the first fails, so the caller
        // gets every diagnostic in one go.
        let mut errors = Vec::new();
        let vertex = compile_stage(ShaderStage::Vertex, desc.vertex_source)
            .map_err(|e| errors.push(e))
            .ok();
        let fragment = compile_stage(ShaderStage::Fragment, desc.fragment_source)
            .map_err(|e| errors.push(e))
            .ok();
        let (Some(vertex), Some(fragment)) = (vertex, fragment) else {
            return Err(errors);
        };

        let interface = link::link(&vertex, &fragment, desc.layout).map_err(|e| vec![e])?;
        let gpu = create_gpu(gfx, desc, &vertex, &fragment, &interface);

        Ok(Self {
            label: desc.label.to_string(),
            state: ProgramState::Linked,
            errors: Vec::new(),
            interface: Some(interface),
            gpu: Some(gpu),
            location_cache: HashMap::new(),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn state(&self) -> ProgramState {
        self.state
    }

    pub fn is_linked(&self) -> bool {
        self.state == ProgramState::Linked
    }

    /// Diagnostics from a failed build; empty when linked.
    pub fn errors(&self) -> &[RenderError] {
        &self.errors
    }

    /// The render pipeline, present only when linked.
    pub fn pipeline(&self) -> Option<&wgpu::RenderPipeline> {
        self.gpu.as_ref().map(|gpu| &gpu.pipeline)
    }

    /// Byte offset of a uniform block member, without touching the cache.
    pub fn uniform_offset(&self, name: &str) -> Option<u32> {
        self.interface
            .as_ref()
            .and_then(|iface| iface.member(name))
            .map(|(offset, _)| offset)
    }

    /// Number of texture units [`Self::bind_textures`] expects.
    pub fn texture_unit_count(&self) -> usize {
        self.interface
            .as_ref()
            .map(|iface| iface.texture_units.len())
            .unwrap_or(0)
    }

    /// Writes one named uniform into the program's uniform buffer.
    ///
    /// Name lookups are cached after the first resolution, including
    /// misses. Unknown names and size mismatches are logged no-ops; a
    /// failed program ignores writes entirely.
    pub fn set_uniform(
        &mut self,
        gfx: &GraphicsContext<'_>,
        name: &str,
        value: impl Into<UniformValue>,
    ) {
        if !self.is_linked() {
            return;
        }

        let location = match self.location_cache.get(name) {
            Some(cached) => *cached,
            None => {
                let resolved = self
                    .interface
                    .as_ref()
                    .and_then(|iface| iface.member(name))
                    .map(|(offset, size)| UniformLocation { offset, size });
                if resolved.is_none() {
                    log::debug!("`{}`: uniform `{name}` not found; write ignored", self.label);
                }
                self.location_cache.insert(name.to_string(), resolved);
                resolved
            }
        };

        let Some(location) = location else {
            return;
        };
        let Some(buffer) = self.gpu.as_ref().and_then(|gpu| gpu.uniform_buffer.as_ref()) else {
            return;
        };

        let value = value.into();
        let bytes = value.bytes();
        if bytes.len() as u32 != location.size {
            log::warn!(
                "`{}`: uniform `{name}` is {} bytes, value is {}; write ignored",
                self.label,
                location.size,
                bytes.len()
            );
            return;
        }

        gfx.queue
            .write_buffer(buffer, location.offset as u64, &bytes);
    }

    /// Builds the group-0 bind group for a set of textures.
    ///
    /// `textures[i]` feeds texture unit `i` (units are ordered by texture
    /// binding). The count must match the program's units exactly.
    pub fn bind_textures(
        &self,
        gfx: &GraphicsContext<'_>,
        textures: &[&TextureResource],
    ) -> Result<ProgramBindings, RenderError> {
        let (Some(interface), Some(gpu)) = (self.interface.as_ref(), self.gpu.as_ref()) else {
            return Err(RenderError::ProgramNotLinked);
        };

        if textures.len() != interface.texture_units.len() {
            return Err(RenderError::BindingMismatch {
                expected: interface.texture_units.len(),
                got: textures.len(),
            });
        }

        let mut entries = Vec::new();
        if let (Some(block), Some(buffer)) =
            (interface.uniform_block.as_ref(), gpu.uniform_buffer.as_ref())
        {
            entries.push(wgpu::BindGroupEntry {
                binding: block.binding,
                resource: buffer.as_entire_binding(),
            });
        }
        for (unit, texture) in interface.texture_units.iter().zip(textures) {
            entries.push(wgpu::BindGroupEntry {
                binding: unit.texture_binding,
                resource: wgpu::BindingResource::TextureView(texture.view()),
            });
            entries.push(wgpu::BindGroupEntry {
                binding: unit.sampler_binding,
                resource: wgpu::BindingResource::Sampler(texture.sampler()),
            });
        }

        let bind_group = gfx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} bindings", self.label)),
            layout: &gpu.bind_group_layout,
            entries: &entries,
        });

        Ok(ProgramBindings { bind_group })
    }
}

fn create_gpu(
    gfx: &GraphicsContext<'_>,
    desc: &ProgramDescriptor<'_>,
    vertex: &CompiledStage,
    fragment: &CompiledStage,
    interface: &ProgramInterface,
) -> ProgramGpu {
    let vs_module = gfx
        .device
        .create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{} vertex", desc.label)),
            source: wgpu::ShaderSource::Wgsl(vertex.source.clone().into()),
        });
    let fs_module = gfx
        .device
        .create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{} fragment", desc.label)),
            source: wgpu::ShaderSource::Wgsl(fragment.source.clone().into()),
        });

    let mut layout_entries = Vec::new();
    let uniform_buffer = interface.uniform_block.as_ref().map(|block| {
        layout_entries.push(wgpu::BindGroupLayoutEntry {
            binding: block.binding,
            visibility: interface.uniform_visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(block.size as u64),
            },
            count: None,
        });
        gfx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{} uniforms", desc.label)),
            size: block.size as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    });
    for unit in &interface.texture_units {
        layout_entries.push(wgpu::BindGroupLayoutEntry {
            binding: unit.texture_binding,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        });
        layout_entries.push(wgpu::BindGroupLayoutEntry {
            binding: unit.sampler_binding,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        });
    }

    let bind_group_layout = gfx
        .device
        .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("{} group 0", desc.label)),
            entries: &layout_entries,
        });

    let pipeline_layout = gfx
        .device
        .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{} layout", desc.label)),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

    let depth_stencil = gfx.depth_format.map(|format| wgpu::DepthStencilState {
        format,
        depth_write_enabled: desc.depth_test,
        depth_compare: if desc.depth_test {
            wgpu::CompareFunction::Less
        } else {
            wgpu::CompareFunction::Always
        },
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    });

    let pipeline = gfx
        .device
        .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(desc.label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vs_module,
                entry_point: Some(&vertex.entry_point),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                buffers: &[desc.layout.buffer_layout()],
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &fs_module,
                entry_point: Some(&fragment.entry_point),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gfx.surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            multiview_mask: None,
            cache: None,
        });

    ProgramGpu {
        pipeline,
        bind_group_layout,
        uniform_buffer,
    }
}
