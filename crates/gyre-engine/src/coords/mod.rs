//! Coordinate and size types shared by the device and render layers.
//!
//! Sizes are in physical pixels, matching the surface configuration.

mod size;

pub use size::DrawableSize;
