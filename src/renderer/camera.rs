//! Orthographic camera for tile maps
//!
//! The camera is a box in world space. Each frame it follows a target,
//! clamps itself to the world, and works out which tiles it can see.

use glam::IVec2;

use crate::map::{TileMap, TileRect};
use crate::math::{Vector2, Vector3};
use crate::physics::Collider;

/// An axis-aligned box in world space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    /// Top-left corner (`z` is depth)
    pub pos: Vector3,
    /// Width, height and depth
    pub dimension: Vector3,
}

impl Bounds {
    #[must_use]
    pub const fn new(pos: Vector3, dimension: Vector3) -> Self {
        Self { pos, dimension }
    }

    /// Center of the box on the XY plane
    #[must_use]
    pub fn center(&self) -> Vector2 {
        self.pos
            .truncate()
            .add_scale(self.dimension.truncate(), 0.5)
    }
}

/// Orthographic camera over a tile map
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// World-space box covered by the camera
    pub bounds: Bounds,
    /// Visible tile range computed by [`Camera::look_at`]
    view: TileRect,
}

impl Camera {
    /// Create a camera at `pos` covering `dimension` world units
    #[must_use]
    pub fn new(pos: Vector3, dimension: Vector3) -> Self {
        Self {
            bounds: Bounds::new(pos, dimension),
            view: TileRect::EMPTY,
        }
    }

    /// Create a camera at the origin with a viewport of `width` x `height`
    #[must_use]
    pub fn with_viewport(width: f32, height: f32) -> Self {
        Self::new(Vector3::ZERO, Vector3::new(width, height, 0.0))
    }

    /// Recompute the visible tile range
    ///
    /// Uses the map's tile size unless `tile_size` overrides it. Overrides
    /// with a zero or negative component are ignored.
    pub fn look_at(&mut self, map: &TileMap, tile_size: Option<Vector2>) {
        let size = match tile_size {
            Some(size) if size.x > 0.0 && size.y > 0.0 => size,
            Some(size) => {
                log::warn!("Ignoring camera tile size override {}x{}", size.x, size.y);
                map.size()
            }
            None => map.size(),
        };
        self.view = TileRect::from_world(
            self.bounds.pos.truncate(),
            self.bounds.dimension.truncate(),
            size,
        );
    }

    /// Keep the visible tile range inside `[min, max)`
    ///
    /// Each bound is enforced on its own, so a view larger than the allowed
    /// range is cut on both sides.
    pub fn set_map_clamp(&mut self, min: IVec2, max: IVec2) {
        self.view = self.view.intersect(TileRect::new(min, max));
    }

    /// Keep the camera box inside `[min, max)` on X/Y and `pos.z` inside
    /// `[min.z, max.z]`
    ///
    /// The upper bound is applied first, so a camera larger than the allowed
    /// area is pinned to `min`.
    pub fn set_pos_clamp(&mut self, min: Vector3, max: Vector3) {
        let Bounds { pos, dimension } = &mut self.bounds;

        if pos.x + dimension.x > max.x {
            pos.x = max.x - dimension.x;
        }
        if pos.x < min.x {
            pos.x = min.x;
        }

        if pos.y + dimension.y > max.y {
            pos.y = max.y - dimension.y;
        }
        if pos.y < min.y {
            pos.y = min.y;
        }

        pos.z = pos.z.min(max.z).max(min.z);
    }

    /// Center the camera on a target box
    pub fn follow(&mut self, target_pos: Vector2, target_dimension: Vector2) {
        let center = target_pos.add_scale(target_dimension, 0.5);
        let pos = center.sub(self.bounds.dimension.truncate().scale(0.5));
        self.bounds.pos = pos.extend(self.bounds.pos.z);
    }

    /// Center the camera on a collider
    pub fn follow_collider(&mut self, target: &Collider) {
        self.follow(target.pos, target.dimension);
    }

    /// Convert a world position into camera-relative coordinates
    #[must_use]
    pub fn to_view(&self, world: Vector2) -> Vector2 {
        world.sub(self.bounds.pos.truncate())
    }

    /// Visible tile range
    #[must_use]
    pub const fn view(&self) -> TileRect {
        self.view
    }

    /// First visible tile
    #[must_use]
    pub const fn min_pos(&self) -> IVec2 {
        self.view.min
    }

    /// First tile past the visible range
    #[must_use]
    pub const fn max_pos(&self) -> IVec2 {
        self.view.max
    }

    #[must_use]
    pub const fn pos(&self) -> Vector3 {
        self.bounds.pos
    }

    #[must_use]
    pub const fn dimension(&self) -> Vector3 {
        self.bounds.dimension
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vector3::ZERO, Vector3::ZERO)
    }
}
