// Contract with the rendering collaborator.
//
// The core never draws anything. When a dirty tile group is redrawn it
// produces a `TileBatch` (every non-empty cell with its local offset and
// visual) and `submit_batch()` feeds it to a `TileRenderer`:
//
//   begin_container(group) -> place_tile(...) per tile -> flatten(container)
//     -> replace_drawable(group, drawable)
//
// `replace_drawable` is an atomic swap: whatever the renderer held for that
// group is dropped and the new flattened unit takes its place, so stale
// visuals cannot survive a redraw. An empty batch is still submitted; it
// replaces the old drawable with an empty one.
//
// Layout goes through `set_position`, called once per node when the
// hierarchy is laid out. Positions are relative to the parent node
// (asteroid -> level -> group -> tile).
//
// Batch construction is pure, which is what lets `Asteroid::redraw_parallel`
// build batches on worker threads and submit them afterwards.
//
// See also: `tile_group.rs` which builds batches, the `asteroid_graphics`
// crate for a headless mesh-building implementation.

use crate::types::{GroupKey, NodeId, VisualId, WorldPos};

/// The rendering backend, seen from the core.
pub trait TileRenderer {
    /// Scratch container tiles are placed into before flattening.
    type Container;
    /// The merged, single-draw representation of one tile group.
    type Drawable;

    /// Place `node` at `position` relative to its parent.
    fn set_position(&mut self, node: NodeId, position: WorldPos);

    /// Start collecting tiles for `group`.
    fn begin_container(&mut self, group: GroupKey) -> Self::Container;

    /// Add one tile to `container`. Tiles must render two-sided.
    fn place_tile(&mut self, container: &mut Self::Container, tile: &PlacedTile);

    /// Merge everything placed in `container` into one drawable.
    fn flatten(&mut self, container: Self::Container) -> Self::Drawable;

    /// Drop the group's previous drawable and attach `drawable`.
    fn replace_drawable(&mut self, group: GroupKey, drawable: Self::Drawable);
}

/// One tile to draw inside a group.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedTile {
    /// Cell column within the group, `0..G`.
    pub local_x: u32,
    /// Cell row within the group, `0..G`.
    pub local_y: u32,
    /// Corner of the tile relative to the group node.
    pub offset: WorldPos,
    /// Edge length of the tile.
    pub size: f32,
    pub visual: VisualId,
}

/// Everything needed to regenerate one tile group's drawable.
#[derive(Clone, Debug, PartialEq)]
pub struct TileBatch {
    pub group: GroupKey,
    /// Non-empty cells in column-major order (x outer, y inner).
    pub tiles: Vec<PlacedTile>,
}

/// Drive `renderer` through one group's regeneration.
pub fn submit_batch<R: TileRenderer>(renderer: &mut R, batch: TileBatch) {
    let mut container = renderer.begin_container(batch.group);
    for tile in &batch.tiles {
        renderer.place_tile(&mut container, tile);
    }
    let drawable = renderer.flatten(container);
    renderer.replace_drawable(batch.group, drawable);
}
