use super::SetupError;
use super::geometry::SceneKind;
use super::pipeline::{PipelineConfig, RenderPipeline};
use super::resources::FrameResources;
use super::shader::ShaderLibrary;
use super::texture::DecodedImage;

/// What to draw and how far the CPU may run ahead of the GPU.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RendererConfig {
    pub scene: SceneKind,
    /// Uniform ring length. Clamped to at least one.
    pub frames_in_flight: usize,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            scene: SceneKind::default(),
            frames_in_flight: 3,
        }
    }
}

/// Pipeline plus the resources it draws from, built once at setup.
pub struct Renderer {
    pipeline: RenderPipeline,
    resources: FrameResources,
}

impl Renderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        config: RendererConfig,
        image: Option<&DecodedImage>,
    ) -> Result<Self, SetupError> {
        let library = ShaderLibrary::builtin(config.scene)?;
        let pipeline = RenderPipeline::new(
            device,
            &library,
            PipelineConfig::for_scene(config.scene, surface_format),
        )?;
        let resources = FrameResources::new(
            device,
            queue,
            &pipeline,
            surface_format,
            image,
            config.frames_in_flight,
        )?;

        Ok(Self {
            pipeline,
            resources,
        })
    }

    #[inline]
    pub fn scene(&self) -> SceneKind {
        self.pipeline.config().scene
    }

    #[inline]
    pub fn resources(&self) -> &FrameResources {
        &self.resources
    }

    /// Borrows the immutable pipeline alongside the mutable resources.
    #[inline]
    pub fn parts_mut(&mut self) -> (&RenderPipeline, &mut FrameResources) {
        (&self.pipeline, &mut self.resources)
    }
}
