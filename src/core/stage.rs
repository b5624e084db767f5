//! Per-tick simulation of one level
//!
//! A stage owns the tile map, the player collider and the camera, and runs
//! them in a fixed order every tick: collide, follow, clamp, look, render.
//! Rendering always sees the post-collision position.

use glam::IVec2;
use rustc_hash::FxHashSet;

use super::config::StageConfig;
use crate::map::{Level, MapError, TileId, TileMap, TileRect};
use crate::math::{Vector2, Vector3};
use crate::physics::{AxisResponse, AxisSweep, Collider, CollisionError, Sweep};
use crate::renderer::Camera;

/// Errors raised while building or running a stage
#[derive(Debug, Clone, PartialEq)]
pub enum StageError {
    /// Level data was invalid
    Map(MapError),
    /// A collision sweep failed
    Collision(CollisionError),
    /// Configuration could not be loaded
    Config(String),
}

impl std::fmt::Display for StageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Map(e) => write!(f, "Map error: {e}"),
            Self::Collision(e) => write!(f, "Collision error: {e}"),
            Self::Config(e) => write!(f, "Config error: {e}"),
        }
    }
}

impl std::error::Error for StageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Map(e) => Some(e),
            Self::Collision(e) => Some(e),
            Self::Config(_) => None,
        }
    }
}

impl From<MapError> for StageError {
    fn from(e: MapError) -> Self {
        Self::Map(e)
    }
}

impl From<CollisionError> for StageError {
    fn from(e: CollisionError) -> Self {
        Self::Collision(e)
    }
}

/// Outcome of one tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Player sweeps as resolved
    pub sweep: Sweep,
    /// Tile range handed to the renderer
    pub view: TileRect,
    /// Number of tiles rendered
    pub rendered: usize,
}

/// A running level
#[derive(Debug, Clone)]
pub struct Stage {
    map: TileMap,
    /// Tile ids that block movement
    solid: FxHashSet<TileId>,
    pub player: Collider,
    pub camera: Camera,
    world_min: Vector3,
    world_max: Vector3,
    config: StageConfig,
}

impl Stage {
    /// Create a stage over `map` with the player at `spawn`
    ///
    /// World bounds default to the map's extent.
    #[must_use]
    pub fn new(map: TileMap, spawn: Vector2, config: StageConfig) -> Self {
        let player =
            Collider::new(spawn, config.player_size).with_max_scan_cells(config.max_scan_cells);
        let camera = Camera::with_viewport(config.camera_width, config.camera_height);
        let world_max = map.world_size().extend(0.0);
        Self {
            map,
            solid: FxHashSet::default(),
            player,
            camera,
            world_min: Vector3::ZERO,
            world_max,
            config,
        }
    }

    /// Build a stage from level data
    ///
    /// # Errors
    ///
    /// Returns [`StageError::Map`] if the level is invalid
    pub fn from_level(level: &Level, config: StageConfig) -> Result<Self, StageError> {
        let map = level.to_tile_map()?;
        let (world_min, world_max) = level.world_bounds(&map)?;
        let spawn = level.spawn()?;

        let mut stage = Self::new(map, spawn, config)
            .with_solid(level.solid.iter().copied())
            .with_world_bounds(world_min, world_max);
        stage.settle_camera();

        log::info!(
            "Stage '{}' ready: {}x{} tiles, {} solid ids",
            level.name,
            stage.map.dimension().x,
            stage.map.dimension().y,
            stage.solid.len()
        );
        Ok(stage)
    }

    /// Set which tile ids block movement
    #[must_use]
    pub fn with_solid(mut self, ids: impl IntoIterator<Item = TileId>) -> Self {
        self.solid = ids.into_iter().collect();
        self
    }

    /// Set the world area the camera is clamped to
    #[must_use]
    pub fn with_world_bounds(mut self, min: Vector3, max: Vector3) -> Self {
        self.world_min = min;
        self.world_max = max;
        self
    }

    /// Whether `id` blocks movement; `None` means outside the map
    #[must_use]
    pub fn is_solid(&self, id: Option<TileId>) -> bool {
        blocks(&self.solid, self.config.solid_edges, id)
    }

    /// Run one tick with the player moving by `velocity`
    ///
    /// Solid tiles stop the player flush against them. `draw` receives every
    /// visible tile.
    ///
    /// # Errors
    ///
    /// Returns [`StageError::Collision`] if the player's sweep is too large
    pub fn tick(
        &mut self,
        velocity: Vector2,
        draw: impl FnMut(IVec2, TileId),
    ) -> Result<TickReport, StageError> {
        self.player.velocity = velocity;
        let (solid, solid_edges) = (&self.solid, self.config.solid_edges);
        let resolve = Collider::solid_resolver(|id| blocks(solid, solid_edges, id));
        let sweep = self.player.move_and_collide(&self.map, resolve)?;
        Ok(self.present(sweep, draw))
    }

    /// Run one tick with a custom collision response
    ///
    /// # Errors
    ///
    /// Returns [`StageError::Collision`] if the player's sweep is too large
    pub fn tick_with(
        &mut self,
        velocity: Vector2,
        resolve: impl FnMut(&AxisSweep) -> AxisResponse,
        draw: impl FnMut(IVec2, TileId),
    ) -> Result<TickReport, StageError> {
        self.player.velocity = velocity;
        let sweep = self.player.move_and_collide(&self.map, resolve)?;
        Ok(self.present(sweep, draw))
    }

    /// Update the camera from the committed player position and render
    fn present(&mut self, sweep: Sweep, draw: impl FnMut(IVec2, TileId)) -> TickReport {
        self.settle_camera();
        let view = self.camera.view();
        self.map.set_view_rect(view);
        let rendered = self.map.render(draw);

        TickReport {
            sweep,
            view,
            rendered,
        }
    }

    /// Follow the player, clamp to the world, and recompute the view
    fn settle_camera(&mut self) {
        self.camera.follow_collider(&self.player);
        self.camera.set_pos_clamp(self.world_min, self.world_max);
        self.camera.look_at(&self.map, self.config.camera_tile_size);
        self.camera.set_map_clamp(IVec2::ZERO, self.map.dimension());
    }

    #[must_use]
    pub const fn map(&self) -> &TileMap {
        &self.map
    }

    #[must_use]
    pub const fn config(&self) -> &StageConfig {
        &self.config
    }

    /// World area the camera is clamped to
    #[must_use]
    pub const fn world_bounds(&self) -> (Vector3, Vector3) {
        (self.world_min, self.world_max)
    }
}

/// Whether a tile blocks movement; `None` is outside the map
fn blocks(solid: &FxHashSet<TileId>, solid_edges: bool, id: Option<TileId>) -> bool {
    id.map_or(solid_edges, |id| solid.contains(&id))
}
