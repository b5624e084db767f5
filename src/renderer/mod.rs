//! Rendering module
//!
//! Camera and visible-range computation. Drawing itself is left to the
//! caller through the tile map's render callback.

mod camera;

pub use camera::{Bounds, Camera};
