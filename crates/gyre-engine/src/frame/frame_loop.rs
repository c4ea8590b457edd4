use std::f32::consts::TAU;

use glam::{Mat4, Vec3};

use crate::math;
use crate::render::{CommandList, MvpUniform, SceneKind};
use crate::time::FrameTime;

use super::backend::{Acquire, FrameBackend};
use super::config::{ConfigError, FrameLoopConfig};

/// Where the current tick is. A finished or dropped tick restarts at `Idle`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum FramePhase {
    #[default]
    Idle,
    AnglesUpdated,
    SurfaceAcquired,
    Encoding,
    Submitted,
}

/// Why a tick produced no frame. Nothing is retried; the next tick starts over.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DropReason {
    /// The window is minimized or not laid out yet.
    ZeroSizedDrawable,
    /// The GPU still reads the uniform slot this frame would overwrite.
    UniformsInFlight,
    /// No surface could be acquired this tick.
    SurfaceUnavailable,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TickOutcome {
    Submitted,
    Dropped(DropReason),
    /// The surface is gone; stop ticking.
    Fatal,
}

/// Per-tick orchestration: advance the angle, acquire, encode, submit.
pub struct FrameLoop {
    scene: SceneKind,
    config: FrameLoopConfig,
    axis: Vec3,
    view: Mat4,
    angle: f32,
    phase: FramePhase,
    commands: CommandList,
    submitted: u64,
    dropped: u64,
}

impl FrameLoop {
    pub fn new(scene: SceneKind, config: FrameLoopConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let axis = config
            .rotation_axis
            .try_normalize()
            .ok_or(ConfigError::RotationAxis(config.rotation_axis))?;
        let t = config.view_translation;

        Ok(Self {
            scene,
            config,
            axis,
            view: math::translation(t.x, t.y, t.z),
            angle: 0.0,
            phase: FramePhase::Idle,
            commands: CommandList::new(),
            submitted: 0,
            dropped: 0,
        })
    }

    /// Runs one tick against `backend`.
    pub fn tick<B: FrameBackend>(&mut self, backend: &mut B, time: FrameTime) -> TickOutcome {
        self.phase = FramePhase::Idle;

        self.angle = (self.angle + self.config.rotation_rate.step(time.dt)).rem_euclid(TAU);
        self.phase = FramePhase::AnglesUpdated;

        let size = backend.drawable_size();
        if size.is_empty() {
            return self.drop_frame(DropReason::ZeroSizedDrawable);
        }

        let Some(slot) = backend.claim_uniform_slot() else {
            return self.drop_frame(DropReason::UniformsInFlight);
        };

        let mut surface = match backend.acquire_surface() {
            Acquire::Ready(surface) => surface,
            Acquire::Unavailable => return self.drop_frame(DropReason::SurfaceUnavailable),
            Acquire::Fatal => {
                log::error!("surface lost for good; stopping frame loop");
                self.commands.clear();
                self.phase = FramePhase::Idle;
                return TickOutcome::Fatal;
            }
        };
        self.phase = FramePhase::SurfaceAcquired;

        if self.scene.uses_transform() {
            let mvp = self.model_view_projection(size.aspect_ratio());
            backend.write_uniforms(slot, &MvpUniform::new(mvp));
        }
        if self.scene.uses_depth() {
            backend.prepare_depth(size);
        }

        self.commands.record(self.scene, slot, self.config.clear_color);
        self.phase = FramePhase::Encoding;
        backend.encode(&mut surface, &self.commands);

        backend.submit(surface, slot);
        self.phase = FramePhase::Submitted;
        self.submitted += 1;

        log::trace!(
            "frame {} submitted (slot {slot}, angle {:.3})",
            time.frame_index,
            self.angle
        );
        TickOutcome::Submitted
    }

    fn drop_frame(&mut self, reason: DropReason) -> TickOutcome {
        log::trace!("frame dropped: {reason:?}");
        self.commands.clear();
        self.phase = FramePhase::Idle;
        self.dropped += 1;
        TickOutcome::Dropped(reason)
    }

    /// MVP for the current angle at `aspect`.
    pub fn model_view_projection(&self, aspect: f32) -> Mat4 {
        let projection = math::perspective(
            math::degrees_to_radians(self.config.fov_y_degrees),
            aspect,
            self.config.near,
            self.config.far,
        );
        let model = math::rotation(self.angle, self.axis);
        math::model_view_projection(projection, self.view, model)
    }

    #[inline]
    pub fn scene(&self) -> SceneKind {
        self.scene
    }

    #[inline]
    pub fn config(&self) -> &FrameLoopConfig {
        &self.config
    }

    /// Current rotation angle in `[0, 2π)`.
    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    #[inline]
    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    /// Commands of the last submitted frame; empty after a dropped tick.
    #[inline]
    pub fn commands(&self) -> &CommandList {
        &self.commands
    }

    #[inline]
    pub fn frames_submitted(&self) -> u64 {
        self.submitted
    }

    #[inline]
    pub fn frames_dropped(&self) -> u64 {
        self.dropped
    }
}
