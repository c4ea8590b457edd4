//! Drives the real pipeline and frame loop against an offscreen target.
//!
//! Every test returns early when the machine has no usable adapter.

use std::io::Cursor;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Instant;

use gyre_engine::coords::DrawableSize;
use gyre_engine::frame::{Acquire, DropReason, FrameBackend, FrameLoop, FrameLoopConfig, TickOutcome};
use gyre_engine::render::{
    CommandList, DecodedImage, MvpUniform, PipelineConfig, RenderPipeline, Renderer,
    RendererConfig, SceneKind, SetupError, ShaderLibrary, encode_pass,
};
use gyre_engine::time::FrameTime;

const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

fn device() -> Option<(wgpu::Device, wgpu::Queue)> {
    pollster::block_on(async {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions::default())
            .await
            .ok()?;
        adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .ok()
    })
}

fn checker() -> DecodedImage {
    let img = image::RgbaImage::from_fn(16, 16, |x, y| {
        if (x / 4 + y / 4) % 2 == 0 {
            image::Rgba([255, 255, 255, 255])
        } else {
            image::Rgba([40, 90, 140, 255])
        }
    });
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("png encode");
    DecodedImage::decode(&bytes).expect("png decode")
}

struct Target {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    encoder: wgpu::CommandEncoder,
}

fn target(device: &wgpu::Device, size: DrawableSize) -> Target {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("offscreen target"),
        size: wgpu::Extent3d {
            width: size.width,
            height: size.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor::default());

    Target {
        _texture: texture,
        view,
        encoder,
    }
}

struct OffscreenBackend<'a> {
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    renderer: &'a mut Renderer,
    size: DrawableSize,
}

impl FrameBackend for OffscreenBackend<'_> {
    type Surface = Target;

    fn drawable_size(&self) -> DrawableSize {
        self.size
    }

    fn claim_uniform_slot(&mut self) -> Option<usize> {
        let _ = self.device.poll(wgpu::PollType::Poll);
        self.renderer.parts_mut().1.claim_uniform_slot()
    }

    fn acquire_surface(&mut self) -> Acquire<Target> {
        Acquire::Ready(target(self.device, self.size))
    }

    fn write_uniforms(&mut self, slot: usize, uniforms: &MvpUniform) {
        self.renderer
            .parts_mut()
            .1
            .write_uniforms(self.queue, slot, uniforms);
    }

    fn prepare_depth(&mut self, size: DrawableSize) {
        self.renderer.parts_mut().1.prepare_depth(self.device, size);
    }

    fn encode(&mut self, target: &mut Target, commands: &CommandList) {
        let (pipeline, resources) = self.renderer.parts_mut();
        encode_pass(&mut target.encoder, &target.view, pipeline, &*resources, commands);
    }

    fn submit(&mut self, target: Target, slot: usize) {
        let fence = self.renderer.resources().arm_fence(slot);
        self.queue.submit(std::iter::once(target.encoder.finish()));
        self.queue.on_submitted_work_done(move || fence.signal());
    }
}

fn frame_time(frame_index: u64) -> FrameTime {
    FrameTime {
        dt: 1.0 / 60.0,
        now: Instant::now(),
        frame_index,
    }
}

#[test]
fn every_scene_builds() {
    let Some((device, queue)) = device() else {
        eprintln!("no adapter; skipping");
        return;
    };
    let image = checker();

    for scene in [SceneKind::Triangle, SceneKind::Cube, SceneKind::TexturedCube] {
        let config = RendererConfig {
            scene,
            ..Default::default()
        };
        let renderer = Renderer::new(&device, &queue, FORMAT, config, Some(&image));
        assert!(renderer.is_ok(), "{scene:?}: {:?}", renderer.err());
    }
}

#[test]
fn textured_scene_requires_an_image() {
    let Some((device, queue)) = device() else {
        eprintln!("no adapter; skipping");
        return;
    };

    let config = RendererConfig {
        scene: SceneKind::TexturedCube,
        ..Default::default()
    };
    let result = Renderer::new(&device, &queue, FORMAT, config, None);
    assert!(matches!(result.err(), Some(SetupError::MissingTexture)));
}

#[test]
fn frames_render_across_a_resize() {
    let Some((device, queue)) = device() else {
        eprintln!("no adapter; skipping");
        return;
    };
    let image = checker();

    let mut renderer = Renderer::new(
        &device,
        &queue,
        FORMAT,
        RendererConfig::default(),
        Some(&image),
    )
    .expect("renderer");
    let mut frame_loop = FrameLoop::new(SceneKind::TexturedCube, FrameLoopConfig::default())
        .expect("frame loop");

    let sizes = [DrawableSize::new(64, 48), DrawableSize::new(96, 96)];
    let mut submitted = 0;
    for (i, size) in sizes.iter().cycle().take(8).enumerate() {
        let mut backend = OffscreenBackend {
            device: &device,
            queue: &queue,
            renderer: &mut renderer,
            size: *size,
        };
        match frame_loop.tick(&mut backend, frame_time(i as u64)) {
            TickOutcome::Submitted => submitted += 1,
            TickOutcome::Dropped(DropReason::UniformsInFlight) => {}
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(renderer.resources().wait_idle(&device), "frame {i} never completed");
    }

    assert_eq!(submitted, 8);
    assert_eq!(renderer.resources().in_flight(), 0);
    assert_eq!(renderer.resources().depth_size(), Some(DrawableSize::new(96, 96)));
}

// Uniform at binding 0, while the cube pipeline layout declares binding 1.
const MISBOUND_CUBE: &str = r#"
struct Uniforms {
    mvp: mat4x4<f32>,
};

@group(0) @binding(0) var<uniform> uniforms: Uniforms;

@vertex
fn vertex_main(@location(0) position: vec4<f32>) -> @builtin(position) vec4<f32> {
    return uniforms.mvp * position;
}

@fragment
fn fragment_main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0);
}
"#;

#[test]
fn pipeline_layout_mismatch_is_a_setup_error() {
    let Some((device, _queue)) = device() else {
        eprintln!("no adapter; skipping");
        return;
    };

    let library = ShaderLibrary::from_wgsl("misbound cube", MISBOUND_CUBE).expect("valid wgsl");
    let result = RenderPipeline::new(
        &device,
        &library,
        PipelineConfig::for_scene(SceneKind::Cube, FORMAT),
    );

    match result {
        Err(SetupError::PipelineValidation { label, message }) => {
            assert_eq!(label, "misbound cube");
            assert!(!message.is_empty());
        }
        Err(other) => panic!("expected a pipeline validation error, got {other}"),
        Ok(_) => panic!("pipeline with a mismatched binding was accepted"),
    }
}

#[test]
fn wait_idle_completes_a_fresh_submission() {
    let Some((device, queue)) = device() else {
        eprintln!("no adapter; skipping");
        return;
    };
    let image = checker();

    let mut renderer = Renderer::new(
        &device,
        &queue,
        FORMAT,
        RendererConfig::default(),
        Some(&image),
    )
    .expect("renderer");
    let mut frame_loop = FrameLoop::new(SceneKind::TexturedCube, FrameLoopConfig::default())
        .expect("frame loop");

    let mut backend = OffscreenBackend {
        device: &device,
        queue: &queue,
        renderer: &mut renderer,
        size: DrawableSize::new(32, 32),
    };
    assert_eq!(frame_loop.tick(&mut backend, frame_time(0)), TickOutcome::Submitted);

    assert!(renderer.resources().wait_idle(&device));
    assert_eq!(renderer.resources().in_flight(), 0);
}

#[test]
fn commands_for_another_scene_are_flagged() {
    let Some((device, queue)) = device() else {
        eprintln!("no adapter; skipping");
        return;
    };

    let config = RendererConfig {
        scene: SceneKind::Triangle,
        ..Default::default()
    };
    let mut renderer = Renderer::new(&device, &queue, FORMAT, config, None).expect("renderer");
    let size = DrawableSize::new(16, 16);

    // Cube commands bind uniforms and indices the triangle never allocates.
    let mut commands = CommandList::new();
    commands.record(SceneKind::Cube, 0, wgpu::Color::BLACK);

    let (pipeline, resources) = renderer.parts_mut();
    let mut frame = target(&device, size);
    let result = catch_unwind(AssertUnwindSafe(|| {
        encode_pass(&mut frame.encoder, &frame.view, pipeline, &*resources, &commands);
    }));

    assert_eq!(result.is_err(), cfg!(debug_assertions));
}
