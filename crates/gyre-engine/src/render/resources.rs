use std::time::Duration;

use wgpu::util::DeviceExt;

use crate::coords::DrawableSize;

use super::SetupError;
use super::depth::{DepthTarget, SizedCache};
use super::fence::{Fence, FenceRing};
use super::geometry::SceneKind;
use super::pipeline::{RenderPipeline, UNIFORM_BINDING};
use super::texture::{DecodedImage, GpuTexture, create_repeat_sampler, texture_format_for};
use super::uniform::MvpUniform;

/// How long [`FrameResources::wait_idle`] blocks on the device.
const WAIT_IDLE_TIMEOUT: Duration = Duration::from_secs(2);

/// One uniform buffer of the ring and the bind group that exposes it.
struct UniformSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// The uploaded texture, its sampler, and their bind group.
struct TextureBinding {
    _texture: GpuTexture,
    _sampler: wgpu::Sampler,
    bind_group: wgpu::BindGroup,
}

/// GPU-resident data used by every frame.
///
/// Geometry and texture are uploaded once. Uniforms live in a ring with one
/// buffer per frame in flight, each guarded by a fence. The depth target is
/// rebuilt whenever the drawable size changes.
pub struct FrameResources {
    scene: SceneKind,
    vertex_buffer: wgpu::Buffer,
    index_buffer: Option<wgpu::Buffer>,
    uniforms: Vec<UniformSlot>,
    fences: FenceRing,
    texture: Option<TextureBinding>,
    depth: SizedCache<DepthTarget>,
}

impl FrameResources {
    /// Uploads the geometry of the pipeline's scene and allocates the uniform
    /// ring.
    ///
    /// `image` is required for textured scenes and ignored otherwise.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        pipeline: &RenderPipeline,
        surface_format: wgpu::TextureFormat,
        image: Option<&DecodedImage>,
        frames_in_flight: usize,
    ) -> Result<Self, SetupError> {
        let scene = pipeline.config().scene;

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("gyre vertices"),
            contents: scene.vertex_bytes(),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = scene.index_bytes().map(|indices| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("gyre indices"),
                contents: indices,
                usage: wgpu::BufferUsages::INDEX,
            })
        });

        let fences = FenceRing::new(frames_in_flight);

        let uniforms = match pipeline.uniform_layout() {
            Some(layout) => (0..fences.len())
                .map(|i| create_uniform_slot(device, layout, i))
                .collect(),
            None => Vec::new(),
        };

        let texture = match pipeline.texture_layout() {
            Some(layout) => {
                let image = image.ok_or(SetupError::MissingTexture)?;
                let texture =
                    GpuTexture::upload(device, queue, image, texture_format_for(surface_format))?;
                let sampler = create_repeat_sampler(device);
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("gyre texture bind group"),
                    layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: wgpu::BindingResource::TextureView(texture.view()),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::Sampler(&sampler),
                        },
                    ],
                });
                Some(TextureBinding {
                    _texture: texture,
                    _sampler: sampler,
                    bind_group,
                })
            }
            None => None,
        };

        log::debug!(
            "frame resources ready: {} ({} uniform slot(s), {} frame(s) in flight)",
            scene.label(),
            uniforms.len(),
            fences.len()
        );

        Ok(Self {
            scene,
            vertex_buffer,
            index_buffer,
            uniforms,
            fences,
            texture,
            depth: SizedCache::new(),
        })
    }

    /// Claims the next ring slot, or `None` while the GPU still reads it.
    #[inline]
    pub fn claim_uniform_slot(&mut self) -> Option<usize> {
        self.fences.claim()
    }

    /// Marks `slot` as in flight. Signal the returned fence when the
    /// submission using it completes.
    #[inline]
    pub fn arm_fence(&self, slot: usize) -> Fence {
        self.fences.arm(slot)
    }

    /// Overwrites the uniform buffer of `slot`.
    ///
    /// Scenes without a transform have no uniform buffers; this is a no-op for
    /// them.
    pub fn write_uniforms(&self, queue: &wgpu::Queue, slot: usize, uniforms: &MvpUniform) {
        if let Some(uniform) = self.uniforms.get(slot) {
            queue.write_buffer(&uniform.buffer, 0, bytemuck::bytes_of(uniforms));
        }
    }

    /// Makes sure the depth target matches `size`, rebuilding it on change.
    pub fn prepare_depth(&mut self, device: &wgpu::Device, size: DrawableSize) {
        if self.scene.uses_depth() {
            self.depth.get_or_rebuild(size, |size| DepthTarget::new(device, size));
        }
    }

    #[inline]
    pub fn vertex_buffer(&self) -> &wgpu::Buffer {
        &self.vertex_buffer
    }

    #[inline]
    pub fn index_buffer(&self) -> Option<&wgpu::Buffer> {
        self.index_buffer.as_ref()
    }

    #[inline]
    pub fn uniform_bind_group(&self, slot: usize) -> Option<&wgpu::BindGroup> {
        self.uniforms.get(slot).map(|u| &u.bind_group)
    }

    #[inline]
    pub fn texture_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.texture.as_ref().map(|t| &t.bind_group)
    }

    /// The depth target built by the last [`prepare_depth`](Self::prepare_depth).
    #[inline]
    pub fn depth_view(&self) -> Option<&wgpu::TextureView> {
        self.depth.get().map(DepthTarget::view)
    }

    /// Size the current depth target was built for.
    #[inline]
    pub fn depth_size(&self) -> Option<DrawableSize> {
        self.depth.size()
    }

    #[inline]
    pub fn in_flight(&self) -> usize {
        self.fences.in_flight()
    }

    /// Blocks on `device` until every submitted frame has completed.
    ///
    /// Returns `false` if frames are still in flight after
    /// [`WAIT_IDLE_TIMEOUT`].
    pub fn wait_idle(&self, device: &wgpu::Device) -> bool {
        if self.fences.all_signalled() {
            return true;
        }

        // Completion callbacks run before a waiting poll returns.
        match device.poll(wgpu::PollType::Wait {
            submission_index: None,
            timeout: Some(WAIT_IDLE_TIMEOUT),
        }) {
            Ok(_) => {}
            Err(wgpu::PollError::Timeout) => {
                log::warn!("timed out after {WAIT_IDLE_TIMEOUT:?} waiting for frames");
            }
            Err(err) => {
                log::warn!("device poll failed while waiting for frames: {err}");
            }
        }

        let pending = self.fences.in_flight();
        if pending > 0 {
            log::warn!("{pending} frame(s) still in flight at teardown");
        }
        pending == 0
    }
}

fn create_uniform_slot(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, index: usize) -> UniformSlot {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(&format!("gyre uniforms #{index}")),
        size: MvpUniform::SIZE,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("gyre uniform bind group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: UNIFORM_BINDING,
            resource: buffer.as_entire_binding(),
        }],
    });

    UniformSlot { buffer, bind_group }
}
