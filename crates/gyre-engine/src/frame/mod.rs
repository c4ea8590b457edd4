//! Per-frame orchestration.
//!
//! `FrameLoop` owns the rotation angle and the order of GPU work for a tick.
//! The GPU side sits behind `FrameBackend` so the sequencing can be driven by
//! the real `GpuBackend` or by a recording backend in tests.

mod backend;
mod config;
mod frame_loop;
mod gpu_backend;

pub use backend::{Acquire, FrameBackend};
pub use config::{ConfigError, FrameLoopConfig, RotationRate};
pub use frame_loop::{DropReason, FrameLoop, FramePhase, TickOutcome};
pub use gpu_backend::GpuBackend;
