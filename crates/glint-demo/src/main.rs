//! Spinning textured cube.
//!
//! Exercises the whole engine surface: shader program build (file-loaded
//! WGSL), uniform writes by name each frame, interleaved vertex layout
//! with an index buffer, a mipmapped checkerboard texture, and the
//! depth-tested scene pass.
//!
//! Keys: Escape quits, Space pauses the spin.

mod assets;

use std::path::Path;

use anyhow::{Context, Result};
use glam::Vec3;

use glint_engine::core::{App, AppControl, FrameCtx};
use glint_engine::device::GpuInit;
use glint_engine::geometry::{AttributeLayout, ComponentType, GeometryBuffer};
use glint_engine::input::Key;
use glint_engine::logging::{LoggingConfig, init_logging};
use glint_engine::render::GraphicsContext;
use glint_engine::shader::{self, ProgramBindings, ProgramDescriptor, ShaderProgram};
use glint_engine::texture::{FilterMode, TextureResource, WrapMode};
use glint_engine::transform::{self, Transform};
use glint_engine::window::{Runtime, RuntimeConfig};

const CLEAR: wgpu::Color = wgpu::Color {
    r: 0.03,
    g: 0.04,
    b: 0.06,
    a: 1.0,
};

struct Scene {
    program: ShaderProgram,
    bindings: ProgramBindings,
    geometry: GeometryBuffer,
    _texture: TextureResource,
}

#[derive(Default)]
struct DemoApp {
    scene: Option<Scene>,
    angle: f32,
    paused: bool,
}

impl DemoApp {
    fn build_scene(gfx: &GraphicsContext<'_>) -> Result<Scene> {
        let shader_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders");
        let vertex_source = shader::load_source(shader_dir.join("scene.vert.wgsl"))?;
        let fragment_source = shader::load_source(shader_dir.join("scene.frag.wgsl"))?;

        let layout = AttributeLayout::packed(&[
            (0, 3, ComponentType::Float32), // position
            (1, 2, ComponentType::Float32), // uv
        ])?;

        let program = ShaderProgram::new(
            gfx,
            &ProgramDescriptor {
                label: "cube",
                vertex_source: &vertex_source,
                fragment_source: &fragment_source,
                layout: &layout,
                depth_test: true,
            },
        );
        if !program.is_linked() {
            let diagnostics: Vec<String> =
                program.errors().iter().map(|e| e.to_string()).collect();
            anyhow::bail!("cube program failed to build:\n{}", diagnostics.join("\n"));
        }

        let geometry = GeometryBuffer::new(
            gfx,
            "cube",
            &assets::cube_vertices(),
            Some(&assets::cube_indices()),
            layout,
        )?;

        let texture = TextureResource::new(
            gfx,
            "checkerboard",
            assets::checkerboard(256, 32)?,
            WrapMode::Repeat,
            FilterMode::LinearMipmapLinear,
        )?;

        let bindings = program.bind_textures(gfx, &[&texture])?;

        Ok(Scene {
            program,
            bindings,
            geometry,
            _texture: texture,
        })
    }
}

impl App for DemoApp {
    fn on_init(&mut self, gfx: &GraphicsContext<'_>) -> Result<()> {
        self.scene = Some(Self::build_scene(gfx).context("scene setup failed")?);
        log::info!("scene ready");
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.keys_pressed.contains(&Key::Escape) {
            return AppControl::Exit;
        }
        if ctx.input_frame.keys_pressed.contains(&Key::Space) {
            self.paused = !self.paused;
            log::info!("spin {}", if self.paused { "paused" } else { "resumed" });
        }

        if !self.paused {
            self.angle += ctx.time.dt * 45.0;
        }

        let Some(scene) = &mut self.scene else {
            return AppControl::Continue;
        };

        {
            let gfx = ctx.graphics_context();

            let model = Transform {
                rotation: transform::rotation_degrees(Vec3::Y, self.angle)
                    * transform::rotation_degrees(Vec3::X, self.angle * 0.6),
                ..Default::default()
            }
            .matrix();
            let view = transform::look_at(Vec3::new(0.0, 1.2, 2.8), Vec3::ZERO, Vec3::Y);
            let projection = transform::perspective(60.0, gfx.aspect_ratio(), 0.1, 100.0);

            scene.program.set_uniform(&gfx, "model", model);
            scene.program.set_uniform(&gfx, "view", view);
            scene.program.set_uniform(&gfx, "projection", projection);
        }

        ctx.render(CLEAR, |_gfx, pass| {
            pass.bind_program(&scene.program);
            pass.bind_textures(&scene.bindings);
            pass.draw_geometry(&scene.geometry);
        })
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    Runtime::run(
        RuntimeConfig {
            title: "glint demo".to_string(),
            initial_size: winit::dpi::LogicalSize::new(960.0, 600.0),
        },
        GpuInit::default().with_depth(),
        DemoApp::default(),
    )
}
