use winit::window::Window;

use crate::coords::DrawableSize;
use crate::device::{Gpu, GpuFrame, SurfaceErrorAction};
use crate::render::{
    CommandList, FrameResources, MvpUniform, RenderPipeline, Renderer, encode_pass,
};

use super::backend::{Acquire, FrameBackend};

/// [`FrameBackend`] over a window's [`Gpu`] and a [`Renderer`].
///
/// Built per frame; borrows everything and owns nothing.
pub struct GpuBackend<'a, 'w> {
    gpu: &'a mut Gpu<'w>,
    window: &'a Window,
    pipeline: &'a RenderPipeline,
    resources: &'a mut FrameResources,
}

impl<'a, 'w> GpuBackend<'a, 'w> {
    pub fn new(gpu: &'a mut Gpu<'w>, window: &'a Window, renderer: &'a mut Renderer) -> Self {
        let (pipeline, resources) = renderer.parts_mut();
        Self {
            gpu,
            window,
            pipeline,
            resources,
        }
    }
}

impl FrameBackend for GpuBackend<'_, '_> {
    type Surface = GpuFrame;

    fn drawable_size(&self) -> DrawableSize {
        self.gpu.drawable_size()
    }

    fn claim_uniform_slot(&mut self) -> Option<usize> {
        // Completion callbacks only fire from inside a poll.
        self.gpu.poll();
        self.resources.claim_uniform_slot()
    }

    fn acquire_surface(&mut self) -> Acquire<GpuFrame> {
        match self.gpu.begin_frame() {
            Ok(frame) => Acquire::Ready(frame),
            Err(err) => {
                log::debug!("surface acquisition failed: {err}");
                match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => Acquire::Fatal,
                    SurfaceErrorAction::Reconfigured | SurfaceErrorAction::SkipFrame => {
                        Acquire::Unavailable
                    }
                }
            }
        }
    }

    fn write_uniforms(&mut self, slot: usize, uniforms: &MvpUniform) {
        self.resources.write_uniforms(self.gpu.queue(), slot, uniforms);
    }

    fn prepare_depth(&mut self, size: DrawableSize) {
        self.resources.prepare_depth(self.gpu.device(), size);
    }

    fn encode(&mut self, frame: &mut GpuFrame, commands: &CommandList) {
        encode_pass(
            &mut frame.encoder,
            &frame.view,
            self.pipeline,
            &*self.resources,
            commands,
        );
    }

    fn submit(&mut self, frame: GpuFrame, slot: usize) {
        let fence = self.resources.arm_fence(slot);
        self.window.pre_present_notify();
        self.gpu.submit(frame, move || fence.signal());
    }
}
