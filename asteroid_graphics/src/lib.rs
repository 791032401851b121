// asteroid_graphics: headless rendering for asteroid tile groups.
//
// Implements `asteroid_sim::render::TileRenderer` by building mesh buffers
// instead of talking to a GPU. A frontend uploads each `GroupMesh` as-is;
// tests and benchmarks use it to observe exactly what a redraw produced.
//
// Module overview:
// - `renderer.rs`:  `MeshRenderer`: node positions, per-group drawables,
//                   render stats.
// - `tile_mesh.rs`: `MeshData` and the two-sided tile quads.
//
// Not subject to the sim's determinism constraint beyond what tests rely on:
// drawables are stable for equal input.

pub mod renderer;
pub mod tile_mesh;

pub use renderer::{GroupMesh, MeshRenderer, RenderStats, Surface};
pub use tile_mesh::MeshData;
