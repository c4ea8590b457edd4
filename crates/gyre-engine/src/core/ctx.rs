use winit::window::{Window, WindowId};

use crate::device::Gpu;
use crate::frame::{FrameLoop, GpuBackend, TickOutcome};
use crate::render::Renderer;
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

use super::app::AppControl;

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Runs one tick of `frame_loop` against this window's GPU context.
    ///
    /// Dropped frames keep the app running; a fatal surface error exits.
    pub fn run_frame(&mut self, frame_loop: &mut FrameLoop, renderer: &mut Renderer) -> AppControl {
        let mut backend = GpuBackend::new(&mut *self.gpu, self.window.window, renderer);

        match frame_loop.tick(&mut backend, self.time) {
            TickOutcome::Submitted | TickOutcome::Dropped(_) => AppControl::Continue,
            TickOutcome::Fatal => AppControl::Exit,
        }
    }
}
