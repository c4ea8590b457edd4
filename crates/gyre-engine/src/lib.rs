//! Gyre engine crate.
//!
//! Platform + GPU runtime for a rotating-cube renderer: window and device
//! setup, the immutable render pipeline, per-frame resources and the frame
//! loop that ties them together.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod math;
pub mod render;
pub mod frame;
