use wgpu::util::DeviceExt;

use crate::error::RenderError;
use crate::render::GraphicsContext;

use super::AttributeLayout;

/// GPU-side vertex (+ optional index) storage described by an
/// [`AttributeLayout`].
///
/// Built once during scene setup with static-draw usage and never
/// mutated afterwards; per frame it costs exactly one bind call (see
/// [`crate::render::ScenePass::draw_geometry`]). Indexed drawing is used
/// when an index buffer is present, array drawing otherwise.
pub struct GeometryBuffer {
    vertex_buffer: wgpu::Buffer,
    index_buffer: Option<wgpu::Buffer>,
    layout: AttributeLayout,
    vertex_count: u32,
    index_count: u32,
}

impl GeometryBuffer {
    /// Uploads `vertices` (and `indices`, when given) to the GPU.
    ///
    /// `vertices` is the flat 32-bit float wire format; its grouping is
    /// defined entirely by `layout`. The data length must be a whole
    /// number of vertices.
    pub fn new(
        gfx: &GraphicsContext<'_>,
        label: &str,
        vertices: &[f32],
        indices: Option<&[u32]>,
        layout: AttributeLayout,
    ) -> Result<Self, RenderError> {
        let floats_per_vertex = layout.floats_per_vertex() as usize;
        if vertices.is_empty() || vertices.len() % floats_per_vertex != 0 {
            return Err(RenderError::InvalidLayout(format!(
                "vertex data length {} is not a multiple of {} floats per vertex",
                vertices.len(),
                floats_per_vertex
            )));
        }

        let vertex_buffer =
            gfx.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{label} vertex buffer")),
                    contents: bytemuck::cast_slice(vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });

        let index_buffer = indices.map(|idx| {
            gfx.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{label} index buffer")),
                    contents: bytemuck::cast_slice(idx),
                    usage: wgpu::BufferUsages::INDEX,
                })
        });

        Ok(Self {
            vertex_buffer,
            index_buffer,
            vertex_count: vertex_count(vertices.len(), floats_per_vertex),
            index_count: indices.map_or(0, |i| i.len() as u32),
            layout,
        })
    }

    pub fn vertex_buffer(&self) -> &wgpu::Buffer {
        &self.vertex_buffer
    }

    pub fn index_buffer(&self) -> Option<&wgpu::Buffer> {
        self.index_buffer.as_ref()
    }

    pub fn layout(&self) -> &AttributeLayout {
        &self.layout
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn is_indexed(&self) -> bool {
        self.index_buffer.is_some()
    }

    /// Releases the GPU storage immediately instead of waiting for Drop.
    ///
    /// The handles are released exactly once either way.
    pub fn destroy(self) {
        self.vertex_buffer.destroy();
        if let Some(ib) = self.index_buffer {
            ib.destroy();
        }
    }
}

/// Number of whole vertices a flat float array holds.
fn vertex_count(float_len: usize, floats_per_vertex: usize) -> u32 {
    (float_len / floats_per_vertex) as u32
}
