mod app;
mod args;

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result};
use gyre_engine::device::GpuInit;
use gyre_engine::frame::{FrameLoop, FrameLoopConfig};
use gyre_engine::logging::{LoggingConfig, init_logging};
use gyre_engine::render::{DecodedImage, RendererConfig};
use gyre_engine::window::{Runtime, RuntimeConfig};

use app::DemoApp;
use args::DemoArgs;

const BUNDLED_TEXTURE: &[u8] = include_bytes!("../assets/checker.png");

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let args = DemoArgs::parse(std::env::args().skip(1))?;

    let image = if args.scene.uses_texture() {
        let image = match &args.image {
            Some(path) => DecodedImage::open(path)
                .with_context(|| format!("failed to load texture {}", path.display()))?,
            None => DecodedImage::decode(BUNDLED_TEXTURE).context("bundled texture is corrupt")?,
        };
        log::info!("texture {}x{}", image.width(), image.height());
        Some(image)
    } else {
        None
    };

    let frame_loop = FrameLoop::new(args.scene, FrameLoopConfig::default())
        .context("invalid frame loop configuration")?;

    let renderer_config = RendererConfig {
        scene: args.scene,
        ..Default::default()
    };

    let setup_error = Rc::new(RefCell::new(None));
    let app = DemoApp::new(renderer_config, image, frame_loop, setup_error.clone());

    let runtime_config = RuntimeConfig {
        title: format!("gyre · {}", args.scene.label()),
        ..Default::default()
    };

    Runtime::run(runtime_config, GpuInit::default(), app)?;

    if let Some(err) = setup_error.borrow_mut().take() {
        return Err(err).context("renderer setup failed");
    }
    Ok(())
}
