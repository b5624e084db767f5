//! Level data loading
//!
//! Levels are stored in RON or JSON and describe the tile grid, tile size,
//! which tiles are solid, and the world bounds the camera is clamped to.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::tilemap::{MapError, TileGrid, TileId, TileMap};
use crate::math::{Vector2, Vector3, VectorLike};

/// Serializable description of a level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    /// Level name
    pub name: String,
    /// Tile width/height in pixels, as `[w, h]` or `(x: w, y: h)`
    pub tile_size: VectorLike,
    /// Tile ids, nested rows or a flat list
    pub tiles: TileGrid,
    /// Row stride for flat tile lists
    #[serde(default)]
    pub columns: Option<u32>,
    /// Tile ids that block movement
    #[serde(default)]
    pub solid: Vec<TileId>,
    /// Player spawn position in world units
    #[serde(default)]
    pub spawn: Option<VectorLike>,
    /// Lower world bound for the camera (defaults to the origin)
    #[serde(default)]
    pub world_min: Option<VectorLike>,
    /// Upper world bound for the camera (defaults to the map extent)
    #[serde(default)]
    pub world_max: Option<VectorLike>,
}

impl Level {
    /// Parse a level from a RON string
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Construction`] if the data is malformed
    pub fn from_ron_str(content: &str) -> Result<Self, MapError> {
        ron::from_str(content).map_err(|e| MapError::Construction(e.to_string()))
    }

    /// Parse a level from a JSON string
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Construction`] if the data is malformed
    pub fn from_json_str(content: &str) -> Result<Self, MapError> {
        serde_json::from_str(content).map_err(|e| MapError::Construction(e.to_string()))
    }

    /// Load a level from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let content = fs::read_to_string(path).map_err(|e| MapError::Io(e.to_string()))?;
        Self::from_ron_str(&content)
    }

    /// Load a level from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let content = fs::read_to_string(path).map_err(|e| MapError::Io(e.to_string()))?;
        Self::from_json_str(&content)
    }

    /// Save the level to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the file cannot be written
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), MapError> {
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| MapError::Construction(e.to_string()))?;
        fs::write(path, content).map_err(|e| MapError::Io(e.to_string()))
    }

    /// Build the tile map described by this level
    ///
    /// # Errors
    ///
    /// Returns an error if the grid or tile size is invalid
    pub fn to_tile_map(&self) -> Result<TileMap, MapError> {
        match (&self.tiles, self.columns) {
            (TileGrid::Flat(ids), Some(columns)) => {
                TileMap::flat_with_columns(ids.clone(), columns, self.tile_size.clone())
            }
            (TileGrid::Flat(_), None) => {
                log::warn!(
                    "Level '{}' has a flat tile list without a column count",
                    self.name
                );
                TileMap::new(self.tiles.clone(), self.tile_size.clone())
            }
            (TileGrid::Rows(_), _) => TileMap::new(self.tiles.clone(), self.tile_size.clone()),
        }
    }

    /// Spawn position, the origin when unset
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Construction`] if the spawn is not vector-like
    pub fn spawn(&self) -> Result<Vector2, MapError> {
        self.spawn
            .clone()
            .map_or(Ok(Vector2::ZERO), Vector2::create_from)
            .map_err(|e| MapError::Construction(e.to_string()))
    }

    /// World bounds for camera clamping
    ///
    /// Defaults to the origin and the map's extent in world units.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Construction`] if a bound is not vector-like
    pub fn world_bounds(&self, map: &TileMap) -> Result<(Vector3, Vector3), MapError> {
        let min = self
            .world_min
            .clone()
            .map_or(Ok(Vector3::ZERO), Vector3::create_from)
            .map_err(|e| MapError::Construction(e.to_string()))?;
        let max = self
            .world_max
            .clone()
            .map_or(Ok(map.world_size().extend(0.0)), Vector3::create_from)
            .map_err(|e| MapError::Construction(e.to_string()))?;
        Ok((min, max))
    }
}
