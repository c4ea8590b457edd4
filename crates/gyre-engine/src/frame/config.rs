use glam::Vec3;
use thiserror::Error;

/// How fast the model rotates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum RotationRate {
    /// Fixed step in radians per tick. Visual speed follows the refresh rate.
    PerTick(f32),
    /// Radians per second, scaled by the frame delta.
    PerSecond(f32),
}

impl Default for RotationRate {
    fn default() -> Self {
        Self::PerTick(0.01)
    }
}

impl RotationRate {
    /// Angle increment for a tick that took `dt` seconds.
    #[inline]
    pub fn step(self, dt: f32) -> f32 {
        match self {
            Self::PerTick(step) => step,
            Self::PerSecond(rate) => rate * dt,
        }
    }

    fn is_finite(self) -> bool {
        match self {
            Self::PerTick(v) | Self::PerSecond(v) => v.is_finite(),
        }
    }
}

/// Camera, projection and animation parameters of the frame loop.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameLoopConfig {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Camera placement, applied as the view transform.
    pub view_translation: Vec3,
    /// Model rotation axis. Normalized once when the loop is built.
    pub rotation_axis: Vec3,
    pub rotation_rate: RotationRate,
    pub clear_color: wgpu::Color,
}

impl Default for FrameLoopConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 1000.0,
            view_translation: Vec3::new(0.0, 0.0, -20.0),
            rotation_axis: Vec3::new(0.5, 1.0, 0.0),
            rotation_rate: RotationRate::default(),
            clear_color: wgpu::Color::BLACK,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("field of view must lie in (0, 180) degrees, got {0}")]
    FieldOfView(f32),

    #[error("clip planes must satisfy 0 < near < far, got near = {near}, far = {far}")]
    ClipPlanes { near: f32, far: f32 },

    #[error("rotation axis {0} cannot be normalized")]
    RotationAxis(Vec3),

    #[error("rotation rate must be finite")]
    RotationRate,
}

impl FrameLoopConfig {
    /// Checks the projection and rotation parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fov = self.fov_y_degrees;
        if !(fov > 0.0 && fov < 180.0) {
            return Err(ConfigError::FieldOfView(fov));
        }

        let (near, far) = (self.near, self.far);
        if !(near > 0.0 && near < far && far.is_finite()) {
            return Err(ConfigError::ClipPlanes { near, far });
        }

        if self.rotation_axis.try_normalize().is_none() {
            return Err(ConfigError::RotationAxis(self.rotation_axis));
        }

        if !self.rotation_rate.is_finite() {
            return Err(ConfigError::RotationRate);
        }

        Ok(())
    }
}
