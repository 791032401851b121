// Dense 3D tile grid: the authoritative store of what every cell holds.
//
// Stored as a flat `Vec<TileType>` indexed by
// `x + y * width + level * width * height`, giving O(1) reads and writes.
// Every in-range cell always holds a tile (`Empty` at construction).
//
// Bounds policy:
// - Reads outside the grid return `None` ("absent"), never a default tile.
// - Writes outside the grid fail with `GridError::OutOfBounds` and change
//   nothing.
//
// Deserialization goes through `TryFrom<TileGridData>`, so a loaded grid whose
// storage length disagrees with its dimensions is rejected instead of
// panicking on a later read.
//
// Coordinates are `i32` at this boundary so negative input is representable
// and rejected rather than wrapped.
//
// See also: `asteroid.rs`, the only writer, which mirrors every write into
// the Level/TileGroup visual caches.

use crate::tile::TileType;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A write addressed a cell outside the grid, or a loaded grid is malformed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    #[error(
        "cell ({x}, {y}) on level {level} is outside the {width}x{height}x{depth} grid"
    )]
    OutOfBounds {
        x: i32,
        y: i32,
        level: i32,
        width: u32,
        height: u32,
        depth: u32,
    },
    #[error("grid storage holds {found} tiles, not {width}x{height}x{depth}")]
    StorageMismatch {
        width: u32,
        height: u32,
        depth: u32,
        found: usize,
    },
}

/// Dense grid of tiles, `depth` levels of `width` x `height` cells.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TileGridData")]
pub struct TileGrid {
    /// Flat storage: index = x + y * width + level * width * height.
    tiles: Vec<TileType>,
    width: u32,
    height: u32,
    depth: u32,
}

/// Unchecked wire form of `TileGrid`.
#[derive(Deserialize)]
struct TileGridData {
    tiles: Vec<TileType>,
    width: u32,
    height: u32,
    depth: u32,
}

impl TryFrom<TileGridData> for TileGrid {
    type Error = GridError;

    fn try_from(data: TileGridData) -> Result<Self, GridError> {
        let expected = (data.width as usize)
            .checked_mul(data.height as usize)
            .and_then(|n| n.checked_mul(data.depth as usize));
        if expected != Some(data.tiles.len()) {
            return Err(GridError::StorageMismatch {
                width: data.width,
                height: data.height,
                depth: data.depth,
                found: data.tiles.len(),
            });
        }
        Ok(Self {
            tiles: data.tiles,
            width: data.width,
            height: data.height,
            depth: data.depth,
        })
    }
}

impl TileGrid {
    /// Create a grid filled with `Empty`.
    pub fn new(width: u32, height: u32, depth: u32) -> Self {
        let total = (width as usize) * (height as usize) * (depth as usize);
        Self {
            tiles: vec![TileType::EMPTY; total],
            width,
            height,
            depth,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Whether `(x, y, level)` addresses a cell.
    pub fn in_bounds(&self, x: i32, y: i32, level: i32) -> bool {
        x >= 0
            && y >= 0
            && level >= 0
            && (x as u32) < self.width
            && (y as u32) < self.height
            && (level as u32) < self.depth
    }

    fn index(&self, x: i32, y: i32, level: i32) -> Option<usize> {
        if self.in_bounds(x, y, level) {
            let w = self.width as usize;
            let h = self.height as usize;
            Some(x as usize + y as usize * w + level as usize * w * h)
        } else {
            None
        }
    }

    /// Read a cell. `None` outside the grid.
    pub fn get(&self, x: i32, y: i32, level: i32) -> Option<TileType> {
        self.index(x, y, level).map(|i| self.tiles[i])
    }

    /// Write a cell.
    pub fn set(&mut self, x: i32, y: i32, level: i32, tile: TileType) -> Result<(), GridError> {
        match self.index(x, y, level) {
            Some(i) => {
                self.tiles[i] = tile;
                Ok(())
            }
            None => Err(self.out_of_bounds(x, y, level)),
        }
    }

    /// Number of cells satisfying `pred`.
    pub fn count(&self, pred: impl Fn(&TileType) -> bool) -> usize {
        self.tiles.iter().filter(|t| pred(t)).count()
    }

    pub(crate) fn out_of_bounds(&self, x: i32, y: i32, level: i32) -> GridError {
        GridError::OutOfBounds {
            x,
            y,
            level,
            width: self.width,
            height: self.height,
            depth: self.depth,
        }
    }
}
