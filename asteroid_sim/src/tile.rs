// Tile types: what a single grid cell is made of.
//
// A `TileType` is a small `Copy` value holding kind, passability and an optional
// visual. Cells store it by value; because it is immutable and tiny, sharing
// one constant like `TileType::ROCK` across thousands of cells costs nothing.
//
// The kinds form a closed set:
// - `Empty`:   passable, no visual.
// - `Natural`: impassable raw material with a caller-chosen visual.
// - `Rock`:    natural material wearing the rock texture.
//
// Natural material can be tunneled: `tunnel()` returns the same tile marked
// passable. It keeps its visual, so tunneling a cell does not dirty its tile
// group. Drawing tunnel openings is not implemented.

use crate::types::VisualId;
use serde::{Deserialize, Serialize};

/// Classification of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Empty,
    Natural,
    Rock,
}

/// The contents of one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileType {
    kind: TileKind,
    passable: bool,
    visual: Option<VisualId>,
}

impl TileType {
    /// Open space.
    pub const EMPTY: TileType = TileType {
        kind: TileKind::Empty,
        passable: true,
        visual: None,
    };

    /// Solid rock.
    pub const ROCK: TileType = TileType {
        kind: TileKind::Rock,
        passable: false,
        visual: Some(VisualId::ROCKS),
    };

    /// Impassable natural material drawn with `visual`.
    pub const fn natural(visual: Option<VisualId>) -> Self {
        Self {
            kind: TileKind::Natural,
            passable: false,
            visual,
        }
    }

    pub fn kind(&self) -> TileKind {
        self.kind
    }

    pub fn is_passable(&self) -> bool {
        self.passable
    }

    /// Visual handed to the renderer; `None` draws nothing.
    pub fn visual(&self) -> Option<VisualId> {
        self.visual
    }

    /// Dig through this tile. Natural kinds become passable and keep their
    /// visual; `Empty` is returned unchanged.
    pub fn tunnel(self) -> Self {
        match self.kind {
            TileKind::Empty => self,
            TileKind::Natural | TileKind::Rock => Self {
                passable: true,
                ..self
            },
        }
    }

    /// True for natural material that has been tunneled through.
    pub fn is_tunneled(&self) -> bool {
        self.kind != TileKind::Empty && self.passable
    }
}

impl Default for TileType {
    fn default() -> Self {
        Self::EMPTY
    }
}
