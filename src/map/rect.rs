//! Half-open rectangles in tile-index space

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::math::Vector2;

/// A rectangle of tile indices covering columns `[min.x, max.x)` and rows
/// `[min.y, max.y)`
///
/// An inverted rectangle (`max <= min` on either axis) is empty and yields no
/// cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TileRect {
    /// First column/row inside the rectangle
    pub min: IVec2,
    /// First column/row past the rectangle
    pub max: IVec2,
}

impl TileRect {
    /// The empty rectangle at the origin
    pub const EMPTY: Self = Self::new(IVec2::ZERO, IVec2::ZERO);

    #[must_use]
    pub const fn new(min: IVec2, max: IVec2) -> Self {
        Self { min, max }
    }

    /// Tile range overlapped by a world-space box
    ///
    /// The minimum corner is floored and the maximum corner ceiled after
    /// scaling by the inverse tile size, so partially covered tiles count.
    #[must_use]
    pub fn from_world(pos: Vector2, dimension: Vector2, tile_size: Vector2) -> Self {
        let inv = tile_size.inverse();
        let min = pos.mult(inv).apply_func(f32::floor);
        let max = pos.add(dimension).mult(inv).apply_func(f32::ceil);
        Self::new(
            IVec2::new(min.x as i32, min.y as i32),
            IVec2::new(max.x as i32, max.y as i32),
        )
    }

    /// Number of columns (0 when inverted)
    #[must_use]
    pub fn width(&self) -> i32 {
        self.max.x.saturating_sub(self.min.x).max(0)
    }

    /// Number of rows (0 when inverted)
    #[must_use]
    pub fn height(&self) -> i32 {
        self.max.y.saturating_sub(self.min.y).max(0)
    }

    /// Number of cells in the rectangle
    #[must_use]
    pub fn cell_count(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    #[must_use]
    pub fn contains(&self, index: IVec2) -> bool {
        index.x >= self.min.x
            && index.x < self.max.x
            && index.y >= self.min.y
            && index.y < self.max.y
    }

    /// Overlap of two rectangles
    #[must_use]
    pub fn intersect(&self, other: Self) -> Self {
        Self::new(self.min.max(other.min), self.max.min(other.max))
    }

    /// Iterate over every cell, top row first, left to right
    #[must_use]
    pub fn cells(&self) -> Cells {
        Cells::new(*self)
    }
}

/// Row-major iterator over the cells of a [`TileRect`]
#[derive(Debug, Clone)]
pub struct Cells {
    rect: TileRect,
    next: IVec2,
}

impl Cells {
    fn new(rect: TileRect) -> Self {
        let next = if rect.is_empty() {
            IVec2::new(rect.min.x, rect.max.y)
        } else {
            rect.min
        };
        Self { rect, next }
    }
}

impl Iterator for Cells {
    type Item = IVec2;

    fn next(&mut self) -> Option<IVec2> {
        if self.next.y >= self.rect.max.y {
            return None;
        }
        let current = self.next;
        self.next.x += 1;
        if self.next.x >= self.rect.max.x {
            self.next.x = self.rect.min.x;
            self.next.y += 1;
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cells_row_major() {
        let rect = TileRect::new(IVec2::new(1, 2), IVec2::new(3, 4));
        let cells: Vec<IVec2> = rect.cells().collect();
        assert_eq!(
            cells,
            vec![
                IVec2::new(1, 2),
                IVec2::new(2, 2),
                IVec2::new(1, 3),
                IVec2::new(2, 3),
            ]
        );
        assert_eq!(rect.cell_count(), 4);
    }

    #[test]
    fn test_inverted_rect_is_empty() {
        let rect = TileRect::new(IVec2::new(5, 5), IVec2::new(2, 8));
        assert!(rect.is_empty());
        assert_eq!(rect.cells().count(), 0);
        assert_eq!(TileRect::EMPTY.cells().count(), 0);
    }

    #[test]
    fn test_from_world() {
        // 20x20 box at (10, 10) on a 16px grid touches tiles 0..2 on both axes
        let rect = TileRect::from_world(
            Vector2::new(10.0, 10.0),
            Vector2::new(20.0, 20.0),
            Vector2::new(16.0, 16.0),
        );
        assert_eq!(rect, TileRect::new(IVec2::ZERO, IVec2::new(2, 2)));

        // Tile-aligned box covers exactly one tile
        let rect = TileRect::from_world(
            Vector2::new(32.0, 16.0),
            Vector2::new(16.0, 16.0),
            Vector2::new(16.0, 16.0),
        );
        assert_eq!(rect, TileRect::new(IVec2::new(2, 1), IVec2::new(3, 2)));

        let rect = TileRect::from_world(
            Vector2::new(-4.0, 0.0),
            Vector2::new(8.0, 8.0),
            Vector2::new(16.0, 16.0),
        );
        assert_eq!(rect.min, IVec2::new(-1, 0));
    }

    #[test]
    fn test_intersect_and_contains() {
        let a = TileRect::new(IVec2::new(-2, -2), IVec2::new(4, 4));
        let b = TileRect::new(IVec2::ZERO, IVec2::new(3, 10));
        let c = a.intersect(b);
        assert_eq!(c, TileRect::new(IVec2::ZERO, IVec2::new(3, 4)));
        assert!(c.contains(IVec2::new(2, 3)));
        assert!(!c.contains(IVec2::new(3, 3)));
    }
}
