// The asteroid: root of the spatial hierarchy and sole entry point for
// mutation.
//
// `Asteroid` owns the authoritative `TileGrid` (depth levels of
// (G*L) x (G*L) cells) and a stack of `Level`s that cache per-cell visuals
// for rendering. Every write goes through `update()`, which:
//
//   1. writes the grid cell (fails fast on out-of-range coordinates, leaving
//      everything untouched), then
//   2. forwards the tile's visual to `levels[level]`, which dirties the
//      owning tile group only if the visual changed.
//
// `redraw()` then regenerates exactly the dirty groups. A second `redraw()`
// with no update in between does no renderer work at all.
// `redraw_parallel()` builds the same batches on the rayon pool, one task per
// level, and submits them in the same order as `redraw()`.
//
// ## Save/load
//
// The name, config, root origin and grid are persisted; `levels` is
// `#[serde(skip)]` because it is derived data. Every deserializer (JSON,
// bincode, anything serde) goes through `TryFrom<AsteroidSave>`, which checks
// the config against the grid and rebuilds levels from it, so a loaded
// asteroid is never missing its levels. Every group holding a visual comes
// back dirty; the caller should `lay_out()` and `redraw()` once.
//
// See also: `grid.rs`, `level.rs`, `tile_group.rs`, `render.rs` for the
// renderer contract, `generate.rs` for the spheroid fill and tunnel carve.
//
// **Critical constraint: single writer.** Nothing here is synchronized. The
// only parallel path (`redraw_parallel`) splits work per level under an
// exclusive borrow.

use crate::config::{AsteroidConfig, ConfigError};
use crate::generate;
use crate::grid::{GridError, TileGrid};
use crate::level::Level;
use crate::render::{self, TileBatch, TileRenderer};
use crate::tile::TileType;
use crate::types::{NodeId, WorldPos};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures from asteroid construction, generation and loading.
#[derive(Debug, Error)]
pub enum AsteroidError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("malformed asteroid save: {0}")]
    Json(#[from] serde_json::Error),
    #[error("saved grid is {found:?} but config describes {expected:?}")]
    GridMismatch {
        expected: (u32, u32, u32),
        found: (u32, u32, u32),
    },
}

/// A layered grid of tiles plus its render-side caches.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "AsteroidSave")]
pub struct Asteroid {
    name: String,
    config: AsteroidConfig,
    origin: WorldPos,
    grid: TileGrid,
    #[serde(skip)]
    levels: Vec<Level>,
}

/// Persisted fields of an `Asteroid`, before validation.
#[derive(Deserialize)]
struct AsteroidSave {
    name: String,
    config: AsteroidConfig,
    origin: WorldPos,
    grid: TileGrid,
}

impl TryFrom<AsteroidSave> for Asteroid {
    type Error = AsteroidError;

    fn try_from(save: AsteroidSave) -> Result<Self, AsteroidError> {
        let mut asteroid = Asteroid {
            name: save.name,
            config: save.config,
            origin: save.origin,
            grid: save.grid,
            levels: Vec::new(),
        };
        if let Err(e) = asteroid.check_loaded() {
            log::warn!("rejecting asteroid save {:?}: {e}", asteroid.name);
            return Err(e);
        }
        asteroid.rebuild_transient_state();
        Ok(asteroid)
    }
}

impl Asteroid {
    /// Build an empty asteroid and lay its nodes out with `renderer`.
    pub fn new<R: TileRenderer>(
        name: &str,
        config: AsteroidConfig,
        renderer: &mut R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = TileGrid::new(config.width(), config.height(), config.depth());
        let levels = (0..config.depth()).map(|i| Level::new(i, &config)).collect();
        let asteroid = Self {
            name: name.to_string(),
            config,
            origin: WorldPos::ZERO,
            grid,
            levels,
        };
        asteroid.lay_out(renderer);
        log::debug!(
            "built asteroid {:?}: {}x{}x{} cells",
            asteroid.name,
            asteroid.width(),
            asteroid.height(),
            asteroid.depth()
        );
        Ok(asteroid)
    }

    /// Build an asteroid filled with `tile` inside the inscribed spheroid,
    /// then redraw it.
    pub fn make_spheroid<R: TileRenderer>(
        tile: TileType,
        name: &str,
        config: AsteroidConfig,
        renderer: &mut R,
    ) -> Result<Self, AsteroidError> {
        let mut asteroid = Self::new(name, config, renderer)?;
        let filled = generate::fill_spheroid(&mut asteroid, tile)?;
        let redrawn = asteroid.redraw(renderer);
        log::info!(
            "spheroid {:?}: filled {filled} cells across {redrawn} tile groups",
            asteroid.name
        );
        Ok(asteroid)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &AsteroidConfig {
        &self.config
    }

    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    pub fn depth(&self) -> u32 {
        self.grid.depth()
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn level(&self, index: u32) -> Option<&Level> {
        self.levels.get(index as usize)
    }

    /// Position of the root node.
    pub fn origin(&self) -> WorldPos {
        self.origin
    }

    /// Move the root node.
    pub fn set_origin<R: TileRenderer>(&mut self, origin: WorldPos, renderer: &mut R) {
        self.origin = origin;
        renderer.set_position(NodeId::Asteroid, origin);
    }

    /// Report every node's position to `renderer`: the root, then each level
    /// followed by its groups.
    pub fn lay_out<R: TileRenderer>(&self, renderer: &mut R) {
        renderer.set_position(NodeId::Asteroid, self.origin);
        for level in &self.levels {
            level.lay_out(renderer);
        }
    }

    /// Write `tile` into the cell. Returns `true` if its tile group went
    /// dirty (the visual changed).
    pub fn update(&mut self, x: i32, y: i32, level: i32, tile: TileType) -> Result<bool, GridError> {
        self.grid.set(x, y, level, tile)?;
        // In range: `set` succeeded.
        Ok(self.levels[level as usize].update(x as u32, y as u32, tile.visual()))
    }

    /// The tile at a cell, or `None` outside the grid.
    pub fn get(&self, x: i32, y: i32, level: i32) -> Option<TileType> {
        self.grid.get(x, y, level)
    }

    /// Apply the tunnel transition to a cell. The visual is unchanged, so no
    /// tile group is dirtied. Returns the new tile.
    pub fn tunnel_at(&mut self, x: i32, y: i32, level: i32) -> Result<TileType, GridError> {
        let tile = self
            .get(x, y, level)
            .ok_or_else(|| self.grid.out_of_bounds(x, y, level))?
            .tunnel();
        self.update(x, y, level, tile)?;
        Ok(tile)
    }

    /// Whether the group owning a cell is dirty; `None` outside the grid.
    pub fn is_dirty_at(&self, x: i32, y: i32, level: i32) -> Option<bool> {
        if !self.grid.in_bounds(x, y, level) {
            return None;
        }
        let lvl = &self.levels[level as usize];
        let (row, col, _, _) = lvl.locate(x as u32, y as u32);
        lvl.group(row, col).map(|g| g.is_dirty())
    }

    pub fn dirty_group_count(&self) -> usize {
        self.levels.iter().map(Level::dirty_count).sum()
    }

    /// Regenerate every dirty tile group, level by level. Returns how many
    /// groups were redrawn.
    pub fn redraw<R: TileRenderer>(&mut self, renderer: &mut R) -> usize {
        let redrawn: usize = self.levels.iter_mut().map(|l| l.redraw(renderer)).sum();
        if redrawn > 0 {
            log::debug!("{}: redrew {redrawn} tile groups", self.name);
        }
        redrawn
    }

    /// Like `redraw()`, but batches are built on the rayon pool. Submission to
    /// `renderer` stays on the calling thread and in `redraw()` order.
    pub fn redraw_parallel<R: TileRenderer>(&mut self, renderer: &mut R) -> usize {
        let per_level: Vec<Vec<TileBatch>> = self
            .levels
            .par_iter_mut()
            .map(Level::take_dirty_batches)
            .collect();
        let mut redrawn = 0;
        for batch in per_level.into_iter().flatten() {
            render::submit_batch(renderer, batch);
            redrawn += 1;
        }
        if redrawn > 0 {
            log::debug!("{}: redrew {redrawn} tile groups in parallel", self.name);
        }
        redrawn
    }

    /// World position of a cell's center:
    /// `origin + (tile_size * (x + 0.5), level * level_spacing, tile_size * (y + 0.5))`.
    ///
    /// Pure arithmetic with no bounds check: coordinates outside the grid
    /// extrapolate along the same lattice. Use `cell_center` when the cell
    /// must exist.
    pub fn get_pos(&self, x: i32, y: i32, level: i32) -> WorldPos {
        let ts = self.config.tile_size;
        self.origin.offset(
            ts * (x as f32 + 0.5),
            level as f32 * self.config.level_spacing,
            ts * (y as f32 + 0.5),
        )
    }

    /// Like `get_pos`, but `None` outside the grid, matching `get`.
    pub fn cell_center(&self, x: i32, y: i32, level: i32) -> Option<WorldPos> {
        self.grid
            .in_bounds(x, y, level)
            .then(|| self.get_pos(x, y, level))
    }

    /// Number of cells holding a tile matching `pred`.
    pub fn count_tiles(&self, pred: impl Fn(&TileType) -> bool) -> usize {
        self.grid.count(pred)
    }

    // -----------------------------------------------------------------------
    // Save/load
    // -----------------------------------------------------------------------

    /// Serialize name, config, origin and grid.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Load a save and rebuild the level caches from the grid. Keeps the
    /// typed error that plain `serde_json::from_str::<Asteroid>` would
    /// flatten into a message.
    pub fn from_json(json: &str) -> Result<Self, AsteroidError> {
        let save: AsteroidSave = serde_json::from_str(json)?;
        Asteroid::try_from(save)
    }

    fn check_loaded(&self) -> Result<(), AsteroidError> {
        self.config.validate()?;
        let expected = (self.config.width(), self.config.height(), self.config.depth());
        let found = (self.grid.width(), self.grid.height(), self.grid.depth());
        if expected != found {
            return Err(AsteroidError::GridMismatch { expected, found });
        }
        Ok(())
    }

    /// Rebuild `levels` (skipped by serde) from the grid. Groups that hold any
    /// visual end up dirty.
    fn rebuild_transient_state(&mut self) {
        let mut levels: Vec<Level> = (0..self.config.depth())
            .map(|i| Level::new(i, &self.config))
            .collect();
        for (index, level) in levels.iter_mut().enumerate() {
            for y in 0..self.grid.height() {
                for x in 0..self.grid.width() {
                    if let Some(tile) = self.grid.get(x as i32, y as i32, index as i32) {
                        level.update(x, y, tile.visual());
                    }
                }
            }
        }
        self.levels = levels;
    }
}
