//! Stage configuration

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::math::Vector2;
use crate::physics::DEFAULT_MAX_SCAN_CELLS;

use super::stage::StageError;

/// Stage configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Camera viewport width in world units
    pub camera_width: f32,
    /// Camera viewport height in world units
    pub camera_height: f32,
    /// Player box size in world units
    pub player_size: Vector2,
    /// Largest number of tiles one collision sweep may scan
    pub max_scan_cells: u64,
    /// Tile size used by the camera instead of the map's
    pub camera_tile_size: Option<Vector2>,
    /// Treat tiles outside the map as solid
    pub solid_edges: bool,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            camera_width: 320.0,
            camera_height: 240.0,
            player_size: Vector2::new(16.0, 16.0),
            max_scan_cells: DEFAULT_MAX_SCAN_CELLS,
            camera_tile_size: None,
            solid_edges: true,
        }
    }
}

impl StageConfig {
    /// Set camera viewport size
    #[must_use]
    pub fn with_camera_size(mut self, width: f32, height: f32) -> Self {
        self.camera_width = width;
        self.camera_height = height;
        self
    }

    /// Set player box size
    #[must_use]
    pub fn with_player_size(mut self, width: f32, height: f32) -> Self {
        self.player_size = Vector2::new(width, height);
        self
    }

    /// Set the collision scan limit
    #[must_use]
    pub fn with_max_scan_cells(mut self, limit: u64) -> Self {
        self.max_scan_cells = limit;
        self
    }

    /// Override the tile size the camera uses to compute its view
    #[must_use]
    pub fn with_camera_tile_size(mut self, size: Vector2) -> Self {
        self.camera_tile_size = Some(size);
        self
    }

    /// Enable or disable solid map edges
    #[must_use]
    pub fn with_solid_edges(mut self, solid: bool) -> Self {
        self.solid_edges = solid;
        self
    }

    /// Parse a configuration from RON; missing fields take their defaults
    ///
    /// # Errors
    ///
    /// Returns [`StageError::Config`] if the data is malformed
    pub fn from_ron_str(content: &str) -> Result<Self, StageError> {
        ron::from_str(content).map_err(|e| StageError::Config(e.to_string()))
    }

    /// Load a configuration from a RON file
    ///
    /// # Errors
    ///
    /// Returns [`StageError::Config`] if the file cannot be read or parsed
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, StageError> {
        let content = fs::read_to_string(path).map_err(|e| StageError::Config(e.to_string()))?;
        Self::from_ron_str(&content)
    }
}
