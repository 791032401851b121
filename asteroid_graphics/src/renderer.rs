// Headless `TileRenderer`: turns tile batches into mesh buffers.
//
// Each tile group's drawable is a `GroupMesh`, one `Surface` per visual
// (texture) with every tile of that visual merged into a single
// `MeshData`. That is the "flatten" step: however many tiles a group holds,
// the frontend issues one draw per visual per group.
//
// The renderer also keeps the scene hierarchy's node positions (parent
// relative, as reported by `set_position`) so it can compose a group's
// world-space origin: asteroid + level + group.
//
// Containers gather quads in an `FxHashMap` keyed by visual; `flatten`
// sorts the surfaces by visual so two renderers fed the same batches hold
// identical drawables.
//
// See also: `tile_mesh.rs` for the per-tile quads, `asteroid_sim::render`
// for the contract this implements.

use crate::tile_mesh::{self, MeshData};
use asteroid_sim::render::{PlacedTile, TileRenderer};
use asteroid_sim::types::{GroupKey, NodeId, VisualId, WorldPos};
use rustc_hash::FxHashMap;

/// All tiles of one visual within a group, merged.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Surface {
    pub visual: VisualId,
    pub mesh: MeshData,
}

/// The flattened drawable for one tile group.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupMesh {
    /// Sorted by visual.
    pub surfaces: Vec<Surface>,
}

impl GroupMesh {
    pub fn is_empty(&self) -> bool {
        self.surfaces.iter().all(|s| s.mesh.is_empty())
    }

    pub fn tile_count(&self) -> usize {
        self.surfaces
            .iter()
            .map(|s| s.mesh.vertex_count() / tile_mesh::VERTICES_PER_TILE)
            .sum()
    }

    pub fn surface(&self, visual: VisualId) -> Option<&Surface> {
        self.surfaces.iter().find(|s| s.visual == visual)
    }
}

/// Scratch space for one group between `begin_container` and `flatten`.
#[derive(Debug)]
pub struct TileContainer {
    group: GroupKey,
    by_visual: FxHashMap<VisualId, MeshData>,
}

/// Counters for collaborator work since the last `reset_stats`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub tiles_placed: usize,
    pub groups_flattened: usize,
    pub drawables_replaced: usize,
    /// Replacements that dropped a previous drawable.
    pub drawables_dropped: usize,
}

/// Mesh-building renderer with no GPU behind it.
#[derive(Debug, Default)]
pub struct MeshRenderer {
    positions: FxHashMap<NodeId, WorldPos>,
    drawables: FxHashMap<GroupKey, GroupMesh>,
    stats: RenderStats,
}

impl MeshRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current drawable of a group, if it was ever redrawn.
    pub fn drawable(&self, group: GroupKey) -> Option<&GroupMesh> {
        self.drawables.get(&group)
    }

    pub fn drawable_count(&self) -> usize {
        self.drawables.len()
    }

    /// Tiles across every drawable.
    pub fn total_tiles(&self) -> usize {
        self.drawables.values().map(GroupMesh::tile_count).sum()
    }

    /// Position of `node` relative to its parent, as last reported.
    pub fn position(&self, node: NodeId) -> Option<WorldPos> {
        self.positions.get(&node).copied()
    }

    /// World-space origin of a node: its own position plus every ancestor's.
    /// `None` if any node on the chain has not been placed.
    pub fn world_position(&self, node: NodeId) -> Option<WorldPos> {
        let own = self.position(node)?;
        let parent = match node {
            NodeId::Asteroid => return Some(own),
            NodeId::Level(_) => NodeId::Asteroid,
            NodeId::Group(key) => NodeId::Level(key.level),
        };
        let base = self.world_position(parent)?;
        Some(base.offset(own.x, own.y, own.z))
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = RenderStats::default();
    }
}

impl TileRenderer for MeshRenderer {
    type Container = TileContainer;
    type Drawable = GroupMesh;

    fn set_position(&mut self, node: NodeId, position: WorldPos) {
        self.positions.insert(node, position);
    }

    fn begin_container(&mut self, group: GroupKey) -> TileContainer {
        TileContainer {
            group,
            by_visual: FxHashMap::default(),
        }
    }

    fn place_tile(&mut self, container: &mut TileContainer, tile: &PlacedTile) {
        let mesh = container.by_visual.entry(tile.visual).or_default();
        tile_mesh::emit_tile(mesh, tile.offset.to_array(), tile.size);
        self.stats.tiles_placed += 1;
    }

    fn flatten(&mut self, container: TileContainer) -> GroupMesh {
        let mut surfaces: Vec<Surface> = container
            .by_visual
            .into_iter()
            .map(|(visual, mesh)| Surface { visual, mesh })
            .collect();
        surfaces.sort_by_key(|s| s.visual);
        self.stats.groups_flattened += 1;
        log::trace!("{}: flattened {} surfaces", container.group, surfaces.len());
        GroupMesh { surfaces }
    }

    fn replace_drawable(&mut self, group: GroupKey, drawable: GroupMesh) {
        if self.drawables.insert(group, drawable).is_some() {
            self.stats.drawables_dropped += 1;
        }
        self.stats.drawables_replaced += 1;
    }
}
