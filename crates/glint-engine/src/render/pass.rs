use crate::geometry::GeometryBuffer;
use crate::shader::{ProgramBindings, ShaderProgram};

/// A single scene render pass: clear, bind, draw.
///
/// Wraps the wgpu render pass with explicit bind operations. Draw calls
/// are ignored (with a log message, never a crash) until both a linked
/// program and its bindings have been bound — drawing with a `Failed`
/// program produces no output by design.
pub struct ScenePass<'p> {
    rpass: wgpu::RenderPass<'p>,
    program_bound: bool,
    bindings_bound: bool,
}

impl<'p> ScenePass<'p> {
    /// Opens the pass: clears color (and depth when `depth_view` is
    /// present) and stamps the viewport with the current framebuffer size.
    pub fn begin(
        encoder: &'p mut wgpu::CommandEncoder,
        color_view: &wgpu::TextureView,
        depth_view: Option<&wgpu::TextureView>,
        clear_color: wgpu::Color,
        viewport: (u32, u32),
    ) -> Self {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("glint scene pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: depth_view.map(|view| {
                wgpu::RenderPassDepthStencilAttachment {
                    view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }
            }),
            ..Default::default()
        });

        let (x, y, w, h) = viewport_rect(viewport);
        rpass.set_viewport(x, y, w, h, 0.0, 1.0);

        Self {
            rpass,
            program_bound: false,
            bindings_bound: false,
        }
    }

    /// Binds a shader program's pipeline.
    ///
    /// Binding a `Failed` program leaves the pass in a state where draw
    /// calls are skipped; the failure was already reported at build time.
    pub fn bind_program(&mut self, program: &ShaderProgram) {
        match program.pipeline() {
            Some(pipeline) => {
                self.rpass.set_pipeline(pipeline);
                self.program_bound = true;
            }
            None => {
                log::warn!("bind_program: program is not linked; draws will be skipped");
                self.program_bound = false;
            }
        }
        self.bindings_bound = false;
    }

    /// Binds the program's uniform buffer + texture units (group 0).
    pub fn bind_textures(&mut self, bindings: &ProgramBindings) {
        self.rpass.set_bind_group(0, bindings.bind_group(), &[]);
        self.bindings_bound = true;
    }

    /// The viewport rect this pass would stamp for a framebuffer size.
    pub fn viewport_rect_for(size: (u32, u32)) -> (f32, f32, f32, f32) {
        viewport_rect(size)
    }

    /// Binds the geometry and issues the draw call.
    ///
    /// This is the single bind operation the buffer promises: vertex
    /// buffer, optional index buffer, then an indexed or array draw.
    pub fn draw_geometry(&mut self, geometry: &GeometryBuffer) {
        if !self.program_bound || !self.bindings_bound {
            log::warn!("draw_geometry: no linked program/bindings bound; draw skipped");
            return;
        }

        self.rpass
            .set_vertex_buffer(0, geometry.vertex_buffer().slice(..));

        match geometry.index_buffer() {
            Some(ib) => {
                self.rpass.set_index_buffer(ib.slice(..), wgpu::IndexFormat::Uint32);
                self.rpass.draw_indexed(0..geometry.index_count(), 0, 0..1);
            }
            None => {
                self.rpass.draw(0..geometry.vertex_count(), 0..1);
            }
        }
    }
}

/// Full-framebuffer viewport `(x, y, w, h)` for a physical size.
///
/// Zero dimensions clamp to 1 so a mid-minimize frame never produces an
/// invalid viewport.
fn viewport_rect(size: (u32, u32)) -> (f32, f32, f32, f32) {
    let (w, h) = size;
    (0.0, 0.0, w.max(1) as f32, h.max(1) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_covers_the_resized_framebuffer() {
        // After a resize to 1024x768 the next pass stamps exactly that.
        assert_eq!(viewport_rect((1024, 768)), (0.0, 0.0, 1024.0, 768.0));
    }

    #[test]
    fn zero_sized_framebuffer_clamps_to_one() {
        assert_eq!(viewport_rect((0, 0)), (0.0, 0.0, 1.0, 1.0));
        assert_eq!(viewport_rect((1024, 0)), (0.0, 0.0, 1024.0, 1.0));
    }
}
