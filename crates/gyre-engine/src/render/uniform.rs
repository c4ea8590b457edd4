use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Per-frame uniform block: one column-major 4x4 matrix.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MvpUniform {
    pub model_view_projection: [[f32; 4]; 4],
}

impl MvpUniform {
    pub const SIZE: u64 = std::mem::size_of::<MvpUniform>() as u64;

    #[inline]
    pub fn new(mvp: Mat4) -> Self {
        Self {
            model_view_projection: mvp.to_cols_array_2d(),
        }
    }

    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model_view_projection)
    }

    /// Minimum binding size for the uniform layout entry.
    pub fn min_binding_size() -> std::num::NonZeroU64 {
        std::num::NonZeroU64::new(Self::SIZE)
            .expect("MvpUniform has non-zero size by construction")
    }
}
