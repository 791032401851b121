// Small shared value types.
//
// Defines the opaque visual handle that tiles hand to the renderer
// (`VisualId`), world-space positions (`WorldPos`), the addressing scheme
// for tile groups (`GroupKey`) and scene nodes (`NodeId`), and the carving
// axis used by the tunnel generator (`Axis`).
//
// `GroupKey` and `NodeId` are how children refer back to their owners: a
// TileGroup knows which Level and slot it lives in by index, never by
// pointer, so the Asteroid -> Level -> TileGroup ownership stays a tree.
//
// See also: `tile.rs` for `TileType`, `render.rs` for the collaborator
// contract that consumes `NodeId`/`GroupKey`, `asteroid.rs` for the owner of
// everything.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Visual identifiers
// ---------------------------------------------------------------------------

/// Opaque handle to a texture (or any other visual) owned by the renderer.
///
/// The core only compares these for equality; their meaning belongs to the
/// rendering side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VisualId(pub u32);

impl VisualId {
    /// Rock texture, the visual of `TileType::ROCK`.
    pub const ROCKS: VisualId = VisualId(1);
}

// ---------------------------------------------------------------------------
// Spatial types
// ---------------------------------------------------------------------------

/// A point or offset in world space.
///
/// Axis convention shared with the renderer: X runs along grid columns, Y
/// along the level stack, Z along grid rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl WorldPos {
    pub const ZERO: WorldPos = WorldPos::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Component-wise sum.
    pub fn offset(self, dx: f32, dy: f32, dz: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

/// Address of one tile group: its level, then its row (grid y / G) and
/// column (grid x / G) within that level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupKey {
    pub level: u32,
    pub row: u32,
    pub col: u32,
}

impl GroupKey {
    pub const fn new(level: u32, row: u32, col: u32) -> Self {
        Self { level, row, col }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Level#{}:TileGroup({},{})",
            self.level, self.col, self.row
        )
    }
}

/// A node of the fixed scene hierarchy, as seen by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeId {
    Asteroid,
    Level(u32),
    Group(GroupKey),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Asteroid => write!(f, "Asteroid"),
            NodeId::Level(n) => write!(f, "Level#{n}"),
            NodeId::Group(key) => write!(f, "{key}"),
        }
    }
}

/// Horizontal carving direction within a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Run varies x; y is held at the center row.
    X,
    /// Run varies y; x is held at the center column.
    Y,
}
