//! A 2D tile engine core built in Rust
//!
//! This crate provides:
//! - 2D/3D vectors that accept loosely-typed input
//! - Tile maps with view-culled rendering through a callback
//! - Axis-separated tile collision with pluggable responses
//! - A clamped, target-following camera and frame-sequence sprites

pub mod animation;
pub mod core;
pub mod map;
pub mod math;
pub mod physics;
pub mod renderer;

// Re-exports for convenience
pub use glam;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::animation::{Sprite, SpriteError};
    pub use crate::core::{Clock, Stage, StageConfig, StageError, TickReport};
    pub use crate::map::{Level, MapError, TileGrid, TileId, TileMap, TileRect, tileset_index};
    pub use crate::math::{Vector2, Vector3, VectorError, VectorLike};
    pub use crate::physics::{AxisResponse, AxisSweep, Collider, CollisionError, Sweep};
    pub use crate::renderer::{Bounds, Camera};
    pub use glam::{IVec2, UVec2, Vec2};
}
