//! Orthographic tile map
//!
//! Stores a grid of tile ids, either flat (one row after another) or nested
//! (one `Vec` per row), and walks the currently visible rectangle for the
//! renderer.

use glam::{IVec2, UVec2};
use serde::{Deserialize, Serialize};

use super::rect::TileRect;
use crate::math::{Vector2, VectorLike};

/// Raw tile identifier as stored in level data
pub type TileId = u32;

/// Backing storage for tile ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TileGrid {
    /// One `Vec` per row
    Rows(Vec<Vec<TileId>>),
    /// Rows laid out back to back; the row stride is supplied separately
    Flat(Vec<TileId>),
}

impl TileGrid {
    /// Look up the tile at `index`
    ///
    /// Nested grids index `rows[y][x]` and ignore `row_stride`; flat grids
    /// read offset `y * row_stride + x`.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::OutOfRange`] when the index falls outside the grid
    pub fn get(&self, index: IVec2, row_stride: usize) -> Result<TileId, MapError> {
        let out_of_range = || MapError::OutOfRange {
            index,
            dimension: self.extent(row_stride),
        };
        if index.x < 0 || index.y < 0 {
            return Err(out_of_range());
        }
        let (x, y) = (index.x as usize, index.y as usize);

        match self {
            Self::Rows(rows) => rows
                .get(y)
                .and_then(|row| row.get(x))
                .copied()
                .ok_or_else(out_of_range),
            Self::Flat(ids) => {
                if x >= row_stride {
                    return Err(out_of_range());
                }
                y.checked_mul(row_stride)
                    .and_then(|offset| offset.checked_add(x))
                    .and_then(|offset| ids.get(offset))
                    .copied()
                    .ok_or_else(out_of_range)
            }
        }
    }

    /// Total number of stored tiles
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Rows(rows) => rows.iter().map(Vec::len).sum(),
            Self::Flat(ids) => ids.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Columns and rows of the grid as seen with the given stride
    fn extent(&self, row_stride: usize) -> IVec2 {
        match self {
            Self::Rows(rows) => {
                IVec2::new(rows.first().map_or(0, Vec::len) as i32, rows.len() as i32)
            }
            Self::Flat(ids) if row_stride > 0 => {
                IVec2::new(row_stride as i32, ids.len().div_ceil(row_stride) as i32)
            }
            Self::Flat(_) => IVec2::ZERO,
        }
    }
}

/// Errors raised by tile maps and level data
#[derive(Debug, Clone, PartialEq)]
pub enum MapError {
    /// Map data could not be turned into a tile map
    Construction(String),
    /// A lookup fell outside the map
    OutOfRange {
        /// Requested tile index
        index: IVec2,
        /// Columns and rows of the map
        dimension: IVec2,
    },
    /// A dimension does not match the stored grid
    DimensionMismatch {
        /// Dimension that was requested
        requested: IVec2,
        /// Number of stored tiles
        tiles: usize,
    },
    /// Tile sizes must be positive and finite
    InvalidTileSize(f32, f32),
    /// Level file could not be read or written
    Io(String),
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Construction(e) => write!(f, "Failed to initialize map: {e}"),
            Self::OutOfRange { index, dimension } => write!(
                f,
                "Tile index ({}, {}) is outside the {}x{} map",
                index.x, index.y, dimension.x, dimension.y
            ),
            Self::DimensionMismatch { requested, tiles } => write!(
                f,
                "Dimension {}x{} does not match {tiles} stored tiles",
                requested.x, requested.y
            ),
            Self::InvalidTileSize(w, h) => write!(f, "Invalid tile size {w}x{h}"),
            Self::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for MapError {}

/// Orthographic tile map with a visible view rectangle
#[derive(Debug, Clone)]
pub struct TileMap {
    grid: TileGrid,
    /// Tile width/height in pixels
    size: Vector2,
    /// Columns and rows
    dimension: IVec2,
    view: TileRect,
    /// Index of the tile most recently handed to the render callback
    index: IVec2,
    /// Id of the tile most recently handed to the render callback
    id: Option<TileId>,
}

impl TileMap {
    /// Create a map from grid data and a tile size
    ///
    /// Nested grids get their dimension from their shape. Flat grids start
    /// with a zero dimension until [`TileMap::set_dimension`] supplies one.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Construction`] for empty or ragged grids and
    /// malformed sizes, and [`MapError::InvalidTileSize`] for zero, negative
    /// or non-finite tile sizes
    pub fn new(grid: TileGrid, size: impl Into<VectorLike>) -> Result<Self, MapError> {
        let size = Vector2::create_from(size).map_err(|e| MapError::Construction(e.to_string()))?;
        if !(size.x.is_finite() && size.y.is_finite() && size.x > 0.0 && size.y > 0.0) {
            return Err(MapError::InvalidTileSize(size.x, size.y));
        }

        let dimension = match &grid {
            TileGrid::Rows(rows) => {
                let columns = rows.first().map_or(0, Vec::len);
                if columns == 0 {
                    return Err(MapError::Construction("map has no tiles".into()));
                }
                if let Some(row) = rows.iter().position(|row| row.len() != columns) {
                    return Err(MapError::Construction(format!(
                        "row {row} has {} tiles, expected {columns}",
                        rows[row].len()
                    )));
                }
                IVec2::new(columns as i32, rows.len() as i32)
            }
            TileGrid::Flat(ids) => {
                if ids.is_empty() {
                    return Err(MapError::Construction("map has no tiles".into()));
                }
                IVec2::ZERO
            }
        };

        log::debug!(
            "Tile map created: {}x{} tiles of {}x{}",
            dimension.x,
            dimension.y,
            size.x,
            size.y
        );

        Ok(Self {
            grid,
            size,
            dimension,
            view: TileRect::EMPTY,
            index: IVec2::ZERO,
            id: None,
        })
    }

    /// Create a map from nested rows
    ///
    /// # Errors
    ///
    /// See [`TileMap::new`]
    pub fn from_rows(
        rows: Vec<Vec<TileId>>,
        size: impl Into<VectorLike>,
    ) -> Result<Self, MapError> {
        Self::new(TileGrid::Rows(rows), size)
    }

    /// Create a flat map with a known column count
    ///
    /// # Errors
    ///
    /// See [`TileMap::new`] and [`TileMap::set_dimension`]
    pub fn flat_with_columns(
        ids: Vec<TileId>,
        columns: u32,
        size: impl Into<VectorLike>,
    ) -> Result<Self, MapError> {
        let mut map = Self::new(TileGrid::Flat(ids), size)?;
        if columns == 0 {
            return Err(MapError::Construction("column count must be non-zero".into()));
        }
        let rows = map.grid.len().div_ceil(columns as usize);
        map.set_dimension(IVec2::new(columns as i32, rows as i32))?;
        Ok(map)
    }

    /// Set the number of columns and rows
    ///
    /// # Errors
    ///
    /// Returns [`MapError::DimensionMismatch`] when the dimension does not
    /// describe exactly the stored tiles
    pub fn set_dimension(&mut self, dimension: IVec2) -> Result<(), MapError> {
        let mismatch = MapError::DimensionMismatch {
            requested: dimension,
            tiles: self.grid.len(),
        };
        if dimension.x <= 0 || dimension.y <= 0 {
            return Err(mismatch);
        }
        let matches = match &self.grid {
            TileGrid::Rows(rows) => {
                rows.len() == dimension.y as usize && rows[0].len() == dimension.x as usize
            }
            TileGrid::Flat(ids) => dimension.x as usize * dimension.y as usize == ids.len(),
        };
        if !matches {
            return Err(mismatch);
        }
        self.dimension = dimension;
        Ok(())
    }

    /// Tile at `index`, checked against the map dimension
    ///
    /// # Errors
    ///
    /// Returns [`MapError::OutOfRange`] when `index` lies outside
    /// `[0, dimension)`
    pub fn get_map_id(&self, index: IVec2) -> Result<TileId, MapError> {
        if !self.bounds().contains(index) {
            return Err(MapError::OutOfRange {
                index,
                dimension: self.dimension,
            });
        }
        self.grid.get(index, self.dimension.x as usize)
    }

    /// Tile at `index`, or `None` outside the map
    #[must_use]
    pub fn tile_at(&self, index: IVec2) -> Option<TileId> {
        self.get_map_id(index).ok()
    }

    /// Set the visible rectangle; `max` is exclusive on both axes
    pub fn set_view(&mut self, min: IVec2, max: IVec2) {
        self.view = TileRect::new(min, max);
    }

    /// Set the visible rectangle from a [`TileRect`]
    pub fn set_view_rect(&mut self, view: TileRect) {
        self.view = view;
    }

    /// Walk every visible tile row by row, handing `(index, id)` to `callback`
    ///
    /// The view is intersected with the map bounds, so tiles outside the map
    /// are never visited. Returns the number of tiles visited.
    pub fn render(&mut self, mut callback: impl FnMut(IVec2, TileId)) -> usize {
        let visible = self.view.intersect(self.bounds());
        let mut count = 0;
        for index in visible.cells() {
            let Some(id) = self.tile_at(index) else {
                continue;
            };
            self.index = index;
            self.id = Some(id);
            callback(index, id);
            count += 1;
        }
        count
    }

    /// Lazily iterate over the visible tiles
    pub fn visible_tiles(&self) -> impl Iterator<Item = (IVec2, TileId)> + '_ {
        self.view
            .intersect(self.bounds())
            .cells()
            .filter_map(|index| self.tile_at(index).map(|id| (index, id)))
    }

    /// Whether the map knows its dimension
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.dimension.x > 0 && self.dimension.y > 0
    }

    /// Rectangle covering the whole map
    #[must_use]
    pub fn bounds(&self) -> TileRect {
        TileRect::new(IVec2::ZERO, self.dimension)
    }

    /// Map extent in world units
    #[must_use]
    pub fn world_size(&self) -> Vector2 {
        Vector2::from(self.dimension).mult(self.size)
    }

    #[must_use]
    pub const fn size(&self) -> Vector2 {
        self.size
    }

    #[must_use]
    pub const fn dimension(&self) -> IVec2 {
        self.dimension
    }

    #[must_use]
    pub const fn view(&self) -> TileRect {
        self.view
    }

    #[must_use]
    pub const fn grid(&self) -> &TileGrid {
        &self.grid
    }

    /// Index of the last rendered tile
    #[must_use]
    pub const fn index(&self) -> IVec2 {
        self.index
    }

    /// Id of the last rendered tile
    #[must_use]
    pub const fn id(&self) -> Option<TileId> {
        self.id
    }
}

/// Source cell of tile `id` in a tileset image with `columns` columns
#[must_use]
pub fn tileset_index(id: TileId, columns: u32) -> Option<UVec2> {
    if columns == 0 {
        return None;
    }
    Some(UVec2::new(id % columns, id / columns))
}
