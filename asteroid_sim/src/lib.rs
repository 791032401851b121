// asteroid_sim: the asteroid's spatial hierarchy, with no rendering backend.
//
// An asteroid is a stack of levels, each a square grid of cells holding a
// tile type. This crate owns the authoritative grid, the Level/TileGroup
// hierarchy that caches per-cell visuals, the dirty tracking that limits
// redraws to the groups that actually changed, and the two procedural
// generators. Drawing happens behind the `TileRenderer` trait.
//
// Module overview:
// - `asteroid.rs`:   Root `Asteroid`: update/get/redraw, world positions, save/load.
// - `level.rs`:      `Level`: L x L tile groups, coordinate routing.
// - `tile_group.rs`: `TileGroup`: G x G cached visuals + dirty flag; batch building.
// - `grid.rs`:       `TileGrid`: dense 3D tile storage, bounds policy, `GridError`.
// - `tile.rs`:       `TileType` / `TileKind`: passability, visual, tunnel transition.
// - `render.rs`:     `TileRenderer` collaborator contract, `TileBatch`, `submit_batch`.
// - `generate.rs`:   Spheroid fill and tunnel carve.
// - `config.rs`:     `AsteroidConfig`: every size constant, loaded from JSON.
// - `types.rs`:      `VisualId`, `WorldPos`, `GroupKey`, `NodeId`, `Axis`.
// - `prng`:          Re-exported from `asteroid_prng`: seeded xoshiro256++.
//
// **Critical constraint: determinism.** Given the same config, the same
// sequence of updates, and the same PRNG seed, the grid, the dirty set and
// the order of renderer calls are identical on every run.

pub mod asteroid;
pub mod config;
pub mod generate;
pub mod grid;
pub mod level;
pub use asteroid_prng as prng;
pub mod render;
pub mod tile;
pub mod tile_group;
pub mod types;
