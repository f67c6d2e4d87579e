use winit::event::WindowEvent;

use crate::render::GraphicsContext;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
pub trait App {
    /// Called once after the window and GPU exist, before the first
    /// frame. Scene resources (programs, geometry, textures) are built
    /// here; a hard failure aborts the run.
    fn on_init(&mut self, gfx: &GraphicsContext<'_>) -> anyhow::Result<()> {
        let _ = gfx;
        Ok(())
    }

    /// Called for raw window events the app may care about.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per rendered frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
