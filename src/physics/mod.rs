//! Tile collision module
//!
//! Axis-separated sweeps of axis-aligned boxes against tile maps

mod collider;

pub use collider::{
    Axis, AxisResponse, AxisSweep, Collider, CollisionError, DEFAULT_MAX_SCAN_CELLS, Sweep, TileHit,
};
