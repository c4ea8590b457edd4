use super::SetupError;
use super::geometry::SceneKind;
use super::shader::{FRAGMENT_ENTRY, ShaderLibrary, VERTEX_ENTRY};
use super::uniform::MvpUniform;

/// Depth attachment format used by depth-tested scenes.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Bind group index of the per-frame uniforms.
pub const UNIFORM_GROUP: u32 = 0;
/// Binding of the MVP uniform inside [`UNIFORM_GROUP`].
pub const UNIFORM_BINDING: u32 = 1;
/// Bind group index of the texture + sampler pair.
pub const TEXTURE_GROUP: u32 = 1;

/// Depth-compare state. Matches a depth clear value of `1.0`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DepthConfig {
    pub format: wgpu::TextureFormat,
    pub compare: wgpu::CompareFunction,
    pub write_enabled: bool,
}

impl Default for DepthConfig {
    fn default() -> Self {
        Self {
            format: DEPTH_FORMAT,
            compare: wgpu::CompareFunction::Less,
            write_enabled: true,
        }
    }
}

/// Fixed-function description of a pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub scene: SceneKind,
    pub color_format: wgpu::TextureFormat,
    pub vertex_layout: wgpu::VertexBufferLayout<'static>,
    pub depth: Option<DepthConfig>,
}

impl PipelineConfig {
    pub fn for_scene(scene: SceneKind, color_format: wgpu::TextureFormat) -> Self {
        Self {
            scene,
            color_format,
            vertex_layout: scene.vertex_layout(),
            depth: scene.uses_depth().then(DepthConfig::default),
        }
    }
}

/// Compiled pipeline state plus the bind group layouts it was built with.
///
/// Built once at setup and borrowed by every frame.
pub struct RenderPipeline {
    config: PipelineConfig,
    raw: wgpu::RenderPipeline,
    uniform_layout: Option<wgpu::BindGroupLayout>,
    texture_layout: Option<wgpu::BindGroupLayout>,
}

impl RenderPipeline {
    /// Builds the pipeline for `config` from `library`.
    ///
    /// Fails if either entry point is missing, if the vertex stage inputs do
    /// not match the configured vertex layout, or if wgpu rejects the pipeline
    /// descriptor.
    pub fn new(
        device: &wgpu::Device,
        library: &ShaderLibrary,
        config: PipelineConfig,
    ) -> Result<Self, SetupError> {
        library.entry_point(VERTEX_ENTRY, naga::ShaderStage::Vertex)?;
        library.entry_point(FRAGMENT_ENTRY, naga::ShaderStage::Fragment)?;
        library.check_vertex_inputs(&config.vertex_layout)?;

        // Captures what naga cannot see: bindings missing from the layout,
        // unsupported targets. Uncaptured, these reach the device error handler.
        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(library.label()),
            source: wgpu::ShaderSource::Wgsl(library.source().into()),
        });

        let uniform_layout = config.scene.uses_transform().then(|| {
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("gyre uniform bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: UNIFORM_BINDING,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: Some(MvpUniform::min_binding_size()),
                    },
                    count: None,
                }],
            })
        });

        let texture_layout = config.scene.uses_texture().then(|| {
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("gyre texture bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            })
        });

        // Group indices are positional, so the texture group needs the
        // uniform group in front of it.
        let bind_group_layouts: Vec<&wgpu::BindGroupLayout> =
            uniform_layout.iter().chain(texture_layout.iter()).collect();

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("gyre pipeline layout"),
            bind_group_layouts: &bind_group_layouts,
            immediate_size: 0,
        });

        let raw = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("gyre pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some(VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: &[config.vertex_layout.clone()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some(FRAGMENT_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.color_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: config.depth.map(|depth| wgpu::DepthStencilState {
                format: depth.format,
                depth_write_enabled: depth.write_enabled,
                depth_compare: depth.compare,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(scope.pop()) {
            return Err(SetupError::PipelineValidation {
                label: library.label().to_string(),
                message: err.to_string(),
            });
        }

        log::info!(
            "pipeline ready: {} ({:?}, depth: {})",
            config.scene.label(),
            config.color_format,
            config.depth.is_some()
        );

        Ok(Self {
            config,
            raw,
            uniform_layout,
            texture_layout,
        })
    }

    #[inline]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    #[inline]
    pub fn raw(&self) -> &wgpu::RenderPipeline {
        &self.raw
    }

    #[inline]
    pub fn uniform_layout(&self) -> Option<&wgpu::BindGroupLayout> {
        self.uniform_layout.as_ref()
    }

    #[inline]
    pub fn texture_layout(&self) -> Option<&wgpu::BindGroupLayout> {
        self.texture_layout.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_only_for_depth_scenes() {
        let fmt = wgpu::TextureFormat::Bgra8Unorm;
        assert!(PipelineConfig::for_scene(SceneKind::Triangle, fmt).depth.is_none());
        assert!(PipelineConfig::for_scene(SceneKind::Cube, fmt).depth.is_none());

        let depth = PipelineConfig::for_scene(SceneKind::TexturedCube, fmt)
            .depth
            .expect("textured cube is depth tested");
        assert_eq!(depth.format, wgpu::TextureFormat::Depth32Float);
        assert_eq!(depth.compare, wgpu::CompareFunction::Less);
        assert!(depth.write_enabled);
    }

    #[test]
    fn config_uses_scene_layout() {
        let config = PipelineConfig::for_scene(SceneKind::TexturedCube, wgpu::TextureFormat::Rgba8Unorm);
        assert_eq!(config.vertex_layout.array_stride, 24);
        assert_eq!(config.color_format, wgpu::TextureFormat::Rgba8Unorm);
    }
}
