use winit::window::{Window, WindowId};

use crate::device::{Gpu, SurfaceErrorAction};
use crate::input::{InputFrame, InputState};
use crate::render::{GraphicsContext, ScenePass};
use crate::time::FrameTime;

use super::app::AppControl;

/// Window handle and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Returns the logical window size as `(width, height)`.
    pub fn logical_size(&self) -> (f32, f32) {
        let phys = self.window.inner_size();
        let scale = self.window.scale_factor();
        let logi: winit::dpi::LogicalSize<f64> = phys.to_logical(scale);
        (logi.width as f32, logi.height as f32)
    }
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub input: &'a InputState,
    pub input_frame: &'a InputFrame,
    pub time: FrameTime,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// The resource-facing context for this frame, sized to the current
    /// framebuffer.
    pub fn graphics_context(&self) -> GraphicsContext<'_> {
        self.gpu.graphics_context()
    }

    /// Acquires a frame, opens a scene pass cleared to `clear`, calls
    /// `draw`, then presents.
    ///
    /// Surface errors are triaged by the device layer: recoverable ones
    /// (lost/outdated surface) skip the frame after reconfiguring, fatal
    /// ones end the run.
    pub fn render<F>(&mut self, clear: wgpu::Color, draw: F) -> AppControl
    where
        F: FnOnce(&GraphicsContext<'_>, &mut ScenePass<'_>),
    {
        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                let action = self.gpu.handle_surface_error(err);
                if action == SurfaceErrorAction::Fatal {
                    return AppControl::Exit;
                }
                return AppControl::Continue;
            }
        };

        let size = self.gpu.size();
        let gfx = self.gpu.graphics_context();

        // Pass borrows frame.encoder; dropped before submit() takes frame.
        {
            let mut pass = ScenePass::begin(
                &mut frame.encoder,
                &frame.view,
                self.gpu.depth_view(),
                clear,
                (size.width, size.height),
            );
            draw(&gfx, &mut pass);
        }
        drop(gfx);

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);

        AppControl::Continue
    }
}
