// Tile groups: the unit of dirty tracking and batched redraw.
//
// A `TileGroup` caches the visual of each cell in its G x G patch and a
// dirty flag. It is a two-state machine:
//
//   Clean --update(changed visual)--> Dirty --redraw--> Clean
//
// `update()` with the visual the cell already shows is a no-op and leaves the
// state alone; that is what keeps bulk writes from regenerating untouched
// groups. `redraw()` on a Clean group returns immediately without calling
// the renderer.
//
// The group identifies its owner through `GroupKey` (level index, row,
// column), not a reference.
//
// See also: `level.rs` which owns L x L of these, `render.rs` for the
// batch/renderer contract.

use crate::render::{self, PlacedTile, TileBatch, TileRenderer};
use crate::types::{GroupKey, VisualId, WorldPos};

/// A G x G patch of cached cell visuals plus a dirty flag.
#[derive(Clone, Debug)]
pub struct TileGroup {
    key: GroupKey,
    size: u32,
    /// Cell visuals, index = local_x * size + local_y.
    visuals: Vec<Option<VisualId>>,
    dirty: bool,
}

impl TileGroup {
    /// A clean group with every cell showing nothing.
    pub fn new(key: GroupKey, size: u32) -> Self {
        Self {
            key,
            size,
            visuals: vec![None; (size as usize) * (size as usize)],
            dirty: false,
        }
    }

    pub fn key(&self) -> GroupKey {
        self.key
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn slot(&self, local_x: u32, local_y: u32) -> usize {
        debug_assert!(local_x < self.size && local_y < self.size);
        local_x as usize * self.size as usize + local_y as usize
    }

    /// Cached visual of a cell.
    pub fn visual(&self, local_x: u32, local_y: u32) -> Option<VisualId> {
        self.visuals[self.slot(local_x, local_y)]
    }

    /// Record a cell's visual. Returns `true` (and marks the group dirty) only
    /// when the visual actually changed.
    pub fn update(&mut self, local_x: u32, local_y: u32, visual: Option<VisualId>) -> bool {
        let slot = self.slot(local_x, local_y);
        if self.visuals[slot] == visual {
            return false;
        }
        self.visuals[slot] = visual;
        self.dirty = true;
        true
    }

    /// Snapshot of every visible cell, regardless of the dirty flag.
    pub fn batch(&self, tile_size: f32) -> TileBatch {
        let mut tiles = Vec::new();
        for local_x in 0..self.size {
            for local_y in 0..self.size {
                if let Some(visual) = self.visual(local_x, local_y) {
                    tiles.push(PlacedTile {
                        local_x,
                        local_y,
                        offset: WorldPos::new(
                            local_x as f32 * tile_size,
                            0.0,
                            local_y as f32 * tile_size,
                        ),
                        size: tile_size,
                        visual,
                    });
                }
            }
        }
        TileBatch {
            group: self.key,
            tiles,
        }
    }

    /// If dirty, clear the flag and return the batch to draw.
    pub fn take_batch(&mut self, tile_size: f32) -> Option<TileBatch> {
        if !self.dirty {
            return None;
        }
        let batch = self.batch(tile_size);
        self.dirty = false;
        Some(batch)
    }

    /// Regenerate this group's drawable if dirty. Returns whether any
    /// renderer work happened.
    pub fn redraw<R: TileRenderer>(&mut self, renderer: &mut R, tile_size: f32) -> bool {
        match self.take_batch(tile_size) {
            Some(batch) => {
                log::trace!("redrawing {} ({} tiles)", self.key, batch.tiles.len());
                render::submit_batch(renderer, batch);
                true
            }
            None => false,
        }
    }
}
