// Flat tile geometry.
//
// Every tile is a square lying in the X-Z plane of its group node, from
// its corner offset to `offset + size` along X and Z. Tiles are visible from
// both sides, so each one is emitted as two quads: an upward-facing quad
// (+Y normal) and a downward-facing copy with reversed winding (-Y normal).
//
// Output is interleaved flat arrays, the same layout the rest of the engine
// uses for generated meshes.
//
// See also: `renderer.rs`, which merges the quads of one tile group into one
// `MeshData` per visual.

/// Mesh geometry as flat arrays.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeshData {
    /// Vertex positions as flat [x, y, z, x, y, z, ...].
    pub vertices: Vec<f32>,
    /// Per-vertex normals as flat [nx, ny, nz, ...].
    pub normals: Vec<f32>,
    /// Per-vertex UV coordinates as flat [u, v, u, v, ...].
    pub uvs: Vec<f32>,
    /// Triangle indices (3 per triangle).
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Vertices emitted per tile (two quads).
pub const VERTICES_PER_TILE: usize = 8;
/// Triangles emitted per tile (two per quad).
pub const TRIANGLES_PER_TILE: usize = 4;

const UP: [f32; 3] = [0.0, 1.0, 0.0];
const DOWN: [f32; 3] = [0.0, -1.0, 0.0];

/// Append a two-sided tile with its corner at `offset`.
pub fn emit_tile(mesh: &mut MeshData, offset: [f32; 3], size: f32) {
    let [x, y, z] = offset;
    let c0 = [x, y, z];
    let c1 = [x, y, z + size];
    let c2 = [x + size, y, z + size];
    let c3 = [x + size, y, z];
    // CCW seen from above.
    emit_quad(mesh, [c0, c1, c2, c3], UP);
    // Same corners, CCW seen from below.
    emit_quad(mesh, [c0, c3, c2, c1], DOWN);
}

/// Emit a single quad (2 triangles). Corners are CCW seen from the side the
/// normal points to. UVs cover the full texture once per quad.
fn emit_quad(mesh: &mut MeshData, corners: [[f32; 3]; 4], normal: [f32; 3]) {
    const UVS: [[f32; 2]; 4] = [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]];
    let base_idx = mesh.vertex_count() as u32;

    for (corner, uv) in corners.iter().zip(UVS) {
        mesh.vertices.extend_from_slice(corner);
        mesh.normals.extend_from_slice(&normal);
        mesh.uvs.extend_from_slice(&uv);
    }

    // 2 triangles: 0-1-2, 0-2-3
    mesh.indices.extend_from_slice(&[
        base_idx,
        base_idx + 1,
        base_idx + 2,
        base_idx,
        base_idx + 2,
        base_idx + 3,
    ]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    fn vertex(mesh: &MeshData, i: u32) -> [f32; 3] {
        let i = i as usize * 3;
        [mesh.vertices[i], mesh.vertices[i + 1], mesh.vertices[i + 2]]
    }

    #[test]
    fn one_tile_is_two_quads() {
        let mut mesh = MeshData::default();
        emit_tile(&mut mesh, [0.0, 0.0, 0.0], 10.0);
        assert_eq!(mesh.vertex_count(), VERTICES_PER_TILE);
        assert_eq!(mesh.triangle_count(), TRIANGLES_PER_TILE);
        assert_eq!(mesh.normals.len(), mesh.vertices.len());
        assert_eq!(mesh.uvs.len(), VERTICES_PER_TILE * 2);
    }

    #[test]
    fn tile_spans_offset_to_offset_plus_size() {
        let mut mesh = MeshData::default();
        emit_tile(&mut mesh, [20.0, 0.0, 30.0], 10.0);
        let xs: Vec<f32> = mesh.vertices.iter().step_by(3).copied().collect();
        let zs: Vec<f32> = mesh.vertices.iter().skip(2).step_by(3).copied().collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 20.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 30.0);
        assert_eq!(zs.iter().cloned().fold(f32::MAX, f32::min), 30.0);
        assert_eq!(zs.iter().cloned().fold(f32::MIN, f32::max), 40.0);
        assert!(mesh.vertices.iter().skip(1).step_by(3).all(|&y| y == 0.0));
    }

    #[test]
    fn both_faces_wind_toward_their_normals() {
        let mut mesh = MeshData::default();
        emit_tile(&mut mesh, [0.0, 0.0, 0.0], 1.0);
        for tri in mesh.indices.chunks(3) {
            let (a, b, c) = (
                vertex(&mesh, tri[0]),
                vertex(&mesh, tri[1]),
                vertex(&mesh, tri[2]),
            );
            let e1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
            let e2 = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
            let n = cross(e1, e2);
            let normal_y = mesh.normals[tri[0] as usize * 3 + 1];
            assert!(n[1] * normal_y > 0.0, "triangle {tri:?} faces away from its normal");
        }
    }
}
