use std::cell::RefCell;
use std::rc::Rc;

use gyre_engine::core::{App, AppControl, FrameCtx};
use gyre_engine::device::Gpu;
use gyre_engine::frame::FrameLoop;
use gyre_engine::render::{DecodedImage, Renderer, RendererConfig, SetupError};
use winit::window::WindowId;

/// Setup failure handed back to `main` once the event loop has stopped.
pub type SetupSlot = Rc<RefCell<Option<SetupError>>>;

/// Builds the renderer on the first frame, when the surface format is known,
/// and drives the frame loop afterwards.
pub struct DemoApp {
    config: RendererConfig,
    image: Option<DecodedImage>,
    frame_loop: FrameLoop,
    renderer: Option<Renderer>,
    setup_error: SetupSlot,
}

impl DemoApp {
    pub fn new(
        config: RendererConfig,
        image: Option<DecodedImage>,
        frame_loop: FrameLoop,
        setup_error: SetupSlot,
    ) -> Self {
        Self {
            config,
            image,
            frame_loop,
            renderer: None,
            setup_error,
        }
    }
}

impl App for DemoApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.renderer.is_none() {
            let gpu = &*ctx.gpu;
            match Renderer::new(
                gpu.device(),
                gpu.queue(),
                gpu.surface_format(),
                self.config,
                self.image.as_ref(),
            ) {
                Ok(renderer) => {
                    log::info!("renderer ready: {}", renderer.scene().label());
                    // Uploaded; the CPU copy is no longer needed.
                    self.image = None;
                    self.renderer = Some(renderer);
                }
                Err(err) => {
                    log::error!("renderer setup failed: {err}");
                    *self.setup_error.borrow_mut() = Some(err);
                    ctx.runtime.close_window(ctx.window.id);
                    return AppControl::Continue;
                }
            }
        }

        let Some(renderer) = self.renderer.as_mut() else {
            return AppControl::Continue;
        };
        ctx.run_frame(&mut self.frame_loop, renderer)
    }

    fn on_close(&mut self, _window_id: WindowId, gpu: &Gpu<'_>) {
        let Some(renderer) = self.renderer.take() else {
            return;
        };

        if !renderer.resources().wait_idle(gpu.device()) {
            log::warn!("tearing down with GPU work outstanding");
        }
        log::info!(
            "{} frame(s) submitted, {} dropped",
            self.frame_loop.frames_submitted(),
            self.frame_loop.frames_dropped()
        );
    }
}
