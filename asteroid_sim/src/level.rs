// One level of the asteroid: an L x L arrangement of tile groups.
//
// A level translates level-local cell coordinates into
// `(group row, group col)` + `(local x, local y)` and routes visual updates to
// the owning group. Groups are stored row-major (`row * L + col`), and every
// walk over them (redraw, batching, layout) uses that order, so redraw output
// is reproducible.
//
// Coordinates arriving here are already validated `u32`s, so the divisions
// below never see negative input.
//
// Placement: the level node sits at `(0, index * level_spacing, 0)` under the
// asteroid root; group `(row, col)` sits at `(col * G * tile_size, 0,
// row * G * tile_size)` under the level.
//
// See also: `tile_group.rs`, `asteroid.rs` which owns D of these.

use crate::config::AsteroidConfig;
use crate::render::{TileBatch, TileRenderer};
use crate::tile_group::TileGroup;
use crate::types::{GroupKey, NodeId, VisualId, WorldPos};

/// A single level's tile groups.
#[derive(Clone, Debug)]
pub struct Level {
    index: u32,
    level_size: u32,
    group_size: u32,
    tile_size: f32,
    origin: WorldPos,
    group_origins: Vec<WorldPos>,
    /// Row-major: index = row * level_size + col.
    groups: Vec<TileGroup>,
}

impl Level {
    /// Build level `index` with every group clean and blank.
    pub fn new(index: u32, config: &AsteroidConfig) -> Self {
        let level_size = config.level_size;
        let span = config.group_span();
        let mut groups = Vec::with_capacity((level_size * level_size) as usize);
        let mut group_origins = Vec::with_capacity(groups.capacity());
        for row in 0..level_size {
            for col in 0..level_size {
                groups.push(TileGroup::new(
                    GroupKey::new(index, row, col),
                    config.tile_group_size,
                ));
                group_origins.push(WorldPos::new(col as f32 * span, 0.0, row as f32 * span));
            }
        }
        Self {
            index,
            level_size,
            group_size: config.tile_group_size,
            tile_size: config.tile_size,
            origin: WorldPos::new(0.0, index as f32 * config.level_spacing, 0.0),
            group_origins,
            groups,
        }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    /// Position relative to the asteroid root.
    pub fn origin(&self) -> WorldPos {
        self.origin
    }

    pub fn groups(&self) -> &[TileGroup] {
        &self.groups
    }

    /// Group at `(row, col)`, if in range.
    pub fn group(&self, row: u32, col: u32) -> Option<&TileGroup> {
        if row < self.level_size && col < self.level_size {
            Some(&self.groups[(row * self.level_size + col) as usize])
        } else {
            None
        }
    }

    /// Which group owns level-local cell `(x, y)`, and where inside it.
    /// Returns `(row, col, local_x, local_y)`.
    pub fn locate(&self, x: u32, y: u32) -> (u32, u32, u32, u32) {
        let g = self.group_size;
        (y / g, x / g, x % g, y % g)
    }

    /// Forward a cell's visual to its group. Returns whether the group was
    /// dirtied.
    pub fn update(&mut self, x: u32, y: u32, visual: Option<VisualId>) -> bool {
        let (row, col, local_x, local_y) = self.locate(x, y);
        let slot = (row * self.level_size + col) as usize;
        self.groups[slot].update(local_x, local_y, visual)
    }

    /// Redraw every dirty group in row-major order. Returns how many were
    /// regenerated.
    pub fn redraw<R: TileRenderer>(&mut self, renderer: &mut R) -> usize {
        let tile_size = self.tile_size;
        self.groups
            .iter_mut()
            .map(|group| group.redraw(renderer, tile_size))
            .filter(|&drew| drew)
            .count()
    }

    /// Collect batches for every dirty group (row-major) and mark them clean.
    pub fn take_dirty_batches(&mut self) -> Vec<TileBatch> {
        let tile_size = self.tile_size;
        self.groups
            .iter_mut()
            .filter_map(|group| group.take_batch(tile_size))
            .collect()
    }

    pub fn dirty_count(&self) -> usize {
        self.groups.iter().filter(|g| g.is_dirty()).count()
    }

    /// Tell the renderer where this level and its groups sit.
    pub fn lay_out<R: TileRenderer>(&self, renderer: &mut R) {
        renderer.set_position(NodeId::Level(self.index), self.origin);
        for (group, origin) in self.groups.iter().zip(&self.group_origins) {
            renderer.set_position(NodeId::Group(group.key()), *origin);
        }
    }
}
