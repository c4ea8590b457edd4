//! Matrix math for the per-frame transform.
//!
//! All functions are pure and GPU-independent. Matrices are `glam::Mat4`
//! (column-major) and are applied to column vectors: `clip = mvp * v`.

mod transform;

pub use transform::{
    degrees_to_radians, model_view_projection, perspective, rotation, translation,
};
