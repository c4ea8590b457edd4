//! GPU rendering subsystem.
//!
//! Everything here is built once at setup and borrowed by the frame loop:
//! - `shader` / `pipeline`: parsed WGSL and the immutable pipeline state
//! - `resources`: geometry, uniform ring, texture, size-keyed depth target
//! - `cmd`: the backend-agnostic command list a frame records
//! - `encode`: turns a command list into a wgpu render pass
//!
//! Convention: matrices are column-major. `math::perspective` maps depth to
//! [-1, 1]; wgpu clips to [0, 1], which the fixed camera distance stays inside.

pub mod cmd;
mod depth;
mod encode;
mod error;
mod fence;
pub mod geometry;
pub mod pipeline;
mod renderer;
pub mod resources;
pub mod shader;
mod texture;
mod uniform;

pub use cmd::{CommandList, DepthOps, PassOps, RenderCmd};
pub use depth::{DepthTarget, SizedCache};
pub use encode::encode_pass;
pub use error::SetupError;
pub use fence::{Fence, FenceRing};
pub use geometry::{DrawCall, SceneKind};
pub use pipeline::{DepthConfig, PipelineConfig, RenderPipeline};
pub use renderer::{Renderer, RendererConfig};
pub use resources::FrameResources;
pub use shader::ShaderLibrary;
pub use texture::{DecodedImage, GpuTexture, texture_format_for};
pub use uniform::MvpUniform;
