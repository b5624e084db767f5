//! Tile maps, view rectangles and level data

mod level;
mod rect;
mod tilemap;

pub use level::Level;
pub use rect::{Cells, TileRect};
pub use tilemap::{MapError, TileGrid, TileId, TileMap, tileset_index};
