//! Axis-separated tile collision
//!
//! A collider moves its bounding box against a [`TileMap`] one axis at a
//! time, X first and then Y. Each axis sweep reports every tile the box would
//! overlap after the move; the caller decides how to respond before the
//! position is committed.

use glam::IVec2;
use smallvec::SmallVec;

use crate::map::{TileId, TileMap, TileRect};
use crate::math::Vector2;

/// Default upper bound on the number of tiles a single axis sweep may scan
pub const DEFAULT_MAX_SCAN_CELLS: u64 = 4096;

/// Movement axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Component of `v` along this axis
    #[must_use]
    pub const fn component(self, v: Vector2) -> f32 {
        match self {
            Self::X => v.x,
            Self::Y => v.y,
        }
    }

    /// Tile coordinate of `index` along this axis
    #[must_use]
    pub const fn tile(self, index: IVec2) -> i32 {
        match self {
            Self::X => index.x,
            Self::Y => index.y,
        }
    }

    /// `v` with this axis' component replaced by `value`
    #[must_use]
    pub const fn with(self, v: Vector2, value: f32) -> Vector2 {
        match self {
            Self::X => Vector2::with_w(value, v.y, v.w),
            Self::Y => Vector2::with_w(v.x, value, v.w),
        }
    }
}

/// A tile overlapped by a sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileHit {
    /// Tile index
    pub index: IVec2,
    /// Tile id, `None` outside the map
    pub id: Option<TileId>,
}

/// Result of sweeping one axis
#[derive(Debug, Clone, PartialEq)]
pub struct AxisSweep {
    pub axis: Axis,
    /// Position before the move
    pub from: Vector2,
    /// Proposed position after the move
    pub to: Vector2,
    /// Tiles covered by the box at `to`
    pub range: TileRect,
    /// Every tile in `range`, row-major
    pub hits: SmallVec<[TileHit; 8]>,
    /// Tile size of the swept map
    pub tile_size: Vector2,
    /// Box dimension of the collider
    pub dimension: Vector2,
    /// Tile bounds of the swept map
    pub map_bounds: TileRect,
}

impl AxisSweep {
    fn stationary(axis: Axis, from: Vector2, map: &TileMap, dimension: Vector2) -> Self {
        Self {
            axis,
            from,
            to: from,
            range: TileRect::EMPTY,
            hits: SmallVec::new(),
            tile_size: map.size(),
            dimension,
            map_bounds: map.bounds(),
        }
    }

    /// Signed distance travelled along the axis
    #[must_use]
    pub fn delta(&self) -> f32 {
        self.axis.component(self.to) - self.axis.component(self.from)
    }

    /// Ids of the overlapped tiles inside the map
    pub fn ids(&self) -> impl Iterator<Item = TileId> + '_ {
        self.hits.iter().filter_map(|hit| hit.id)
    }
}

/// Both axis sweeps of one move, X then Y
#[derive(Debug, Clone, PartialEq)]
pub struct Sweep {
    pub x: AxisSweep,
    pub y: AxisSweep,
}

impl Sweep {
    /// Final proposed position
    #[must_use]
    pub fn proposed(&self) -> Vector2 {
        self.y.to
    }
}

/// How a collider responds to an axis sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisResponse {
    /// Accept the proposed position
    Move,
    /// Stay put on this axis and zero its velocity
    Stop,
    /// Place the box at this coordinate and zero the axis velocity
    SnapTo(f32),
}

/// Errors raised while sweeping
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollisionError {
    /// The box covers more tiles than the configured limit
    ScanTooLarge {
        /// Tiles the sweep would scan
        cells: u64,
        /// Configured limit
        limit: u64,
    },
}

impl std::fmt::Display for CollisionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ScanTooLarge { cells, limit } => {
                write!(f, "Sweep covers {cells} tiles, limit is {limit}")
            }
        }
    }
}

impl std::error::Error for CollisionError {}

/// A movable axis-aligned box that collides with tiles
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    /// Top-left corner in world units
    pub pos: Vector2,
    /// Width and height in world units
    pub dimension: Vector2,
    /// Displacement applied by [`Collider::move_and_collide`]
    pub velocity: Vector2,
    /// Stored for the renderer, not used by collision
    pub rotation: f32,
    max_scan_cells: u64,
}

impl Collider {
    #[must_use]
    pub fn new(pos: Vector2, dimension: Vector2) -> Self {
        Self {
            pos,
            dimension,
            velocity: Vector2::ZERO,
            rotation: 0.0,
            max_scan_cells: DEFAULT_MAX_SCAN_CELLS,
        }
    }

    /// Set the largest number of tiles one axis sweep may scan
    #[must_use]
    pub fn with_max_scan_cells(mut self, limit: u64) -> Self {
        self.max_scan_cells = limit;
        self
    }

    #[must_use]
    pub const fn max_scan_cells(&self) -> u64 {
        self.max_scan_cells
    }

    /// Center of the box
    #[must_use]
    pub fn center(&self) -> Vector2 {
        self.pos.add_scale(self.dimension, 0.5)
    }

    /// Sweep a single axis from the current position
    ///
    /// # Errors
    ///
    /// Returns [`CollisionError::ScanTooLarge`] when the box covers more
    /// tiles than allowed
    pub fn sweep_axis(
        &self,
        map: &TileMap,
        axis: Axis,
        delta: f32,
    ) -> Result<AxisSweep, CollisionError> {
        self.sweep_from(map, self.pos, axis, delta)
    }

    /// Sweep X then Y without moving
    ///
    /// The Y sweep starts from the X proposal.
    ///
    /// # Errors
    ///
    /// Returns [`CollisionError::ScanTooLarge`] when the box covers more
    /// tiles than allowed
    pub fn sweep(&self, map: &TileMap, velocity: Vector2) -> Result<Sweep, CollisionError> {
        let x = self.sweep_from(map, self.pos, Axis::X, velocity.x)?;
        let y = self.sweep_from(map, x.to, Axis::Y, velocity.y)?;
        Ok(Sweep { x, y })
    }

    /// Move by the current velocity, letting `resolve` decide each axis
    ///
    /// X is swept, resolved and committed before Y is swept from the
    /// committed position. Returns the two sweeps as they were resolved.
    ///
    /// # Errors
    ///
    /// Returns [`CollisionError::ScanTooLarge`] when the box covers more
    /// tiles than allowed; the position is left unchanged for that axis
    pub fn move_and_collide(
        &mut self,
        map: &TileMap,
        mut resolve: impl FnMut(&AxisSweep) -> AxisResponse,
    ) -> Result<Sweep, CollisionError> {
        let x = self.sweep_from(map, self.pos, Axis::X, self.velocity.x)?;
        self.commit(&x, &mut resolve);
        let y = self.sweep_from(map, self.pos, Axis::Y, self.velocity.y)?;
        self.commit(&y, &mut resolve);
        Ok(Sweep { x, y })
    }

    /// Resolver that stops the box flush against blocking tiles
    ///
    /// `is_solid` receives each overlapped tile id, or `None` for tiles
    /// outside the map. Blocking tiles outside the map count as a wall at the
    /// map edge, so a box that overshoots the map stops at its border.
    ///
    /// Only the destination box is scanned: a move longer than a tile can
    /// still pass through thin walls inside the map.
    pub fn solid_resolver(
        is_solid: impl Fn(Option<TileId>) -> bool,
    ) -> impl FnMut(&AxisSweep) -> AxisResponse {
        move |sweep: &AxisSweep| {
            let delta = sweep.delta();
            if delta == 0.0 {
                return AxisResponse::Move;
            }
            let axis = sweep.axis;
            let edge = if delta > 0.0 {
                axis.tile(sweep.map_bounds.max)
            } else {
                axis.tile(sweep.map_bounds.min) - 1
            };
            let blocking = sweep
                .hits
                .iter()
                .filter(|hit| is_solid(hit.id))
                .map(|hit| match hit.id {
                    Some(_) => axis.tile(hit.index),
                    None if delta > 0.0 => axis.tile(hit.index).min(edge),
                    None => axis.tile(hit.index).max(edge),
                });

            let tile = axis.component(sweep.tile_size);
            let extent = axis.component(sweep.dimension);
            if delta > 0.0 {
                blocking
                    .min()
                    .map_or(AxisResponse::Move, |t| AxisResponse::SnapTo(t as f32 * tile - extent))
            } else {
                blocking
                    .max()
                    .map_or(AxisResponse::Move, |t| AxisResponse::SnapTo((t + 1) as f32 * tile))
            }
        }
    }

    fn sweep_from(
        &self,
        map: &TileMap,
        from: Vector2,
        axis: Axis,
        delta: f32,
    ) -> Result<AxisSweep, CollisionError> {
        if !map.is_ready() {
            log::debug!("Sweep skipped: tile map has no dimension yet");
            return Ok(AxisSweep::stationary(axis, from, map, self.dimension));
        }

        let to = axis.with(from, axis.component(from) + delta);
        let reach = axis.component(to) / axis.component(map.size());
        if !reach.is_finite() || reach.abs() >= i32::MAX as f32 {
            log::warn!("Sweep of {delta} along {axis:?} leaves tile space, ignoring");
            return Ok(AxisSweep::stationary(axis, from, map, self.dimension));
        }

        let range = TileRect::from_world(to, self.dimension, map.size());
        let cells = range.cell_count();
        if cells > self.max_scan_cells {
            log::warn!(
                "Sweep over {cells} tiles exceeds limit of {}",
                self.max_scan_cells
            );
            return Err(CollisionError::ScanTooLarge {
                cells,
                limit: self.max_scan_cells,
            });
        }

        let hits = range
            .cells()
            .map(|index| TileHit {
                index,
                id: map.tile_at(index),
            })
            .collect();

        Ok(AxisSweep {
            axis,
            from,
            to,
            range,
            hits,
            tile_size: map.size(),
            dimension: self.dimension,
            map_bounds: map.bounds(),
        })
    }

    fn commit(&mut self, sweep: &AxisSweep, resolve: &mut impl FnMut(&AxisSweep) -> AxisResponse) {
        if sweep.from == sweep.to && sweep.hits.is_empty() {
            return;
        }
        let axis = sweep.axis;
        match resolve(sweep) {
            AxisResponse::Move => self.pos = sweep.to,
            AxisResponse::Stop => {
                self.pos = sweep.from;
                self.velocity = axis.with(self.velocity, 0.0);
            }
            AxisResponse::SnapTo(coord) => {
                self.pos = axis.with(sweep.from, coord);
                self.velocity = axis.with(self.velocity, 0.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 5x4 room: walls (1) around a 3x2 floor (0), 16px tiles
    fn room() -> TileMap {
        TileMap::from_rows(
            vec![
                vec![1, 1, 1, 1, 1],
                vec![1, 0, 0, 0, 1],
                vec![1, 0, 0, 0, 1],
                vec![1, 1, 1, 1, 1],
            ],
            [16.0, 16.0],
        )
        .unwrap()
    }

    fn walls() -> impl FnMut(&AxisSweep) -> AxisResponse {
        Collider::solid_resolver(|id| id.is_none_or(|id| id == 1))
    }

    #[test]
    fn test_sweep_scans_row_major_per_axis() {
        let map = room();
        let collider = Collider::new(Vector2::new(20.0, 20.0), Vector2::new(8.0, 8.0));

        let sweep = collider.sweep(&map, Vector2::new(4.0, 0.0)).unwrap();
        assert_eq!(sweep.x.to, Vector2::new(24.0, 20.0));
        assert_eq!(sweep.x.range, TileRect::new(IVec2::new(1, 1), IVec2::new(2, 2)));
        assert_eq!(sweep.x.hits.len(), 1);

        // Y starts from the X proposal
        assert_eq!(sweep.y.from, sweep.x.to);
        assert_eq!(sweep.proposed(), Vector2::new(24.0, 20.0));

        // Sweeping does not move the collider
        assert_eq!(collider.pos, Vector2::new(20.0, 20.0));

        let sweep = collider.sweep(&map, Vector2::new(8.0, 0.0)).unwrap();
        let indices: Vec<IVec2> = sweep.x.hits.iter().map(|h| h.index).collect();
        assert_eq!(indices, vec![IVec2::new(1, 1), IVec2::new(2, 1)]);
    }

    #[test]
    fn test_move_into_open_space() {
        let map = room();
        let mut collider = Collider::new(Vector2::new(16.0, 16.0), Vector2::new(16.0, 16.0));
        collider.velocity = Vector2::new(10.0, 5.0);

        collider.move_and_collide(&map, walls()).unwrap();
        assert_eq!(collider.pos, Vector2::new(26.0, 21.0));
        assert_eq!(collider.velocity, Vector2::new(10.0, 5.0));
    }

    #[test]
    fn test_snap_against_right_wall() {
        let map = room();
        let mut collider = Collider::new(Vector2::new(16.0, 16.0), Vector2::new(16.0, 16.0));
        collider.velocity = Vector2::new(40.0, 0.0);

        let sweep = collider.move_and_collide(&map, walls()).unwrap();
        assert_eq!(collider.pos, Vector2::new(48.0, 16.0));
        assert_eq!(collider.velocity.x, 0.0);
        assert!(sweep.x.ids().any(|id| id == 1));
    }

    #[test]
    fn test_snap_against_left_wall_and_outside() {
        let map = room();
        let mut collider = Collider::new(Vector2::new(48.0, 32.0), Vector2::new(16.0, 16.0));
        collider.velocity = Vector2::new(-50.0, 0.0);

        let sweep = collider.move_and_collide(&map, walls()).unwrap();
        assert!(sweep.x.hits.iter().any(|hit| hit.id.is_none()));
        assert_eq!(collider.pos, Vector2::new(16.0, 32.0));
    }

    #[test]
    fn test_land_on_floor() {
        let map = room();
        let mut collider = Collider::new(Vector2::new(16.0, 16.0), Vector2::new(16.0, 16.0));
        collider.velocity = Vector2::new(0.0, 40.0);

        collider.move_and_collide(&map, walls()).unwrap();
        assert_eq!(collider.pos, Vector2::new(16.0, 32.0));
        assert_eq!(collider.velocity, Vector2::ZERO);

        // Resting flush on the floor does not touch the floor row
        collider.velocity = Vector2::new(0.0, 0.0);
        let sweep = collider.sweep(&map, Vector2::ZERO).unwrap();
        assert!(sweep.y.ids().all(|id| id == 0));
    }

    #[test]
    fn test_x_resolves_before_y() {
        let map = room();
        let mut collider = Collider::new(Vector2::new(16.0, 16.0), Vector2::new(16.0, 16.0));
        collider.velocity = Vector2::new(40.0, 40.0);

        let mut order = Vec::new();
        collider
            .move_and_collide(&map, |sweep| {
                order.push((sweep.axis, sweep.from));
                AxisResponse::Stop
            })
            .unwrap();

        assert_eq!(
            order,
            vec![
                (Axis::X, Vector2::new(16.0, 16.0)),
                (Axis::Y, Vector2::new(16.0, 16.0)),
            ]
        );
        assert_eq!(collider.pos, Vector2::new(16.0, 16.0));
        assert_eq!(collider.velocity, Vector2::ZERO);
    }

    #[test]
    fn test_unready_map_is_noop() {
        let map = TileMap::new(crate::map::TileGrid::Flat(vec![0; 6]), [16.0, 16.0]).unwrap();
        let mut collider = Collider::new(Vector2::new(5.0, 5.0), Vector2::new(8.0, 8.0));
        collider.velocity = Vector2::new(3.0, 3.0);

        let sweep = collider
            .move_and_collide(&map, |_| panic!("resolver called on unready map"))
            .unwrap();
        assert!(sweep.x.hits.is_empty());
        assert!(sweep.y.hits.is_empty());
        assert_eq!(sweep.x.tile_size, Vector2::new(16.0, 16.0));
        assert_eq!(collider.pos, Vector2::new(5.0, 5.0));
    }

    #[test]
    fn test_overshoot_stops_at_map_edge() {
        let map = TileMap::from_rows(vec![vec![0; 4]; 4], [16.0, 16.0]).unwrap();
        let mut collider = Collider::new(Vector2::new(16.0, 16.0), Vector2::new(16.0, 16.0));

        collider.velocity = Vector2::new(1000.0, 0.0);
        collider.move_and_collide(&map, walls()).unwrap();
        assert_eq!(collider.pos, Vector2::new(48.0, 16.0));

        collider.velocity = Vector2::new(-1000.0, 0.0);
        collider.move_and_collide(&map, walls()).unwrap();
        assert_eq!(collider.pos, Vector2::new(0.0, 16.0));
    }

    #[test]
    fn test_unbounded_velocity_is_ignored() {
        let map = room();
        let mut collider = Collider::new(Vector2::new(16.0, 16.0), Vector2::new(16.0, 16.0));
        collider.velocity = Vector2::new(f32::INFINITY, -1.0e30);

        let sweep = collider.move_and_collide(&map, walls()).unwrap();
        assert!(sweep.x.hits.is_empty());
        assert!(sweep.y.hits.is_empty());
        assert_eq!(collider.pos, Vector2::new(16.0, 16.0));
    }

    #[test]
    fn test_zero_size_box_scans_nothing() {
        let map = room();
        let collider = Collider::new(Vector2::new(16.0, 16.0), Vector2::ZERO);
        let sweep = collider.sweep_axis(&map, Axis::X, 0.0).unwrap();
        assert!(sweep.range.is_empty());
        assert!(sweep.hits.is_empty());
    }

    #[test]
    fn test_scan_limit() {
        let map = room();
        let collider = Collider::new(Vector2::ZERO, Vector2::splat(1.0e6)).with_max_scan_cells(64);
        assert!(matches!(
            collider.sweep(&map, Vector2::new(1.0, 0.0)),
            Err(CollisionError::ScanTooLarge { limit: 64, .. })
        ));
    }
}
