//! Terrain plane mesh generation

use crate::heightmap::Heightmap;
use sward_scene::BufferGeometry;

/// Generate a square terrain grid mesh from a heightmap.
///
/// `size` is the world-space extent along X and Z, `resolution` the number
/// of quads per edge (vertices = resolution + 1). Vertices are row-major
/// (rows along Z), which is the layout `MeshTerrain` expects.
pub fn generate_plane(
    heightmap: &Heightmap,
    size: f32,
    height_scale: f32,
    resolution: u32,
) -> BufferGeometry {
    let resolution = resolution.max(1);
    let verts_per_edge = resolution + 1;
    let vert_count = (verts_per_edge * verts_per_edge) as usize;

    let mut positions = Vec::with_capacity(vert_count);
    let mut normals = Vec::with_capacity(vert_count);
    let mut uvs = Vec::with_capacity(vert_count);

    for vz in 0..verts_per_edge {
        for vx in 0..verts_per_edge {
            let u = vx as f32 / resolution as f32;
            let v = vz as f32 / resolution as f32;

            let height = heightmap.sample(u, v) * height_scale;
            positions.push([u * size, height, v * size]);
            normals.push(heightmap.compute_normal(u, v, size, height_scale));
            uvs.push([u, v]);
        }
    }

    // Two triangles per quad, CCW winding seen from above
    let index_count = (resolution * resolution * 6) as usize;
    let mut indices = Vec::with_capacity(index_count);

    for qz in 0..resolution {
        for qx in 0..resolution {
            let tl = qz * verts_per_edge + qx;
            let tr = tl + 1;
            let bl = tl + verts_per_edge;
            let br = bl + 1;

            indices.extend_from_slice(&[tl, bl, br, tl, br, tr]);
        }
    }

    BufferGeometry {
        positions,
        normals,
        uvs,
        indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{MeshTerrain, TerrainProvider};

    #[test]
    fn flat_heightmap_generates_correct_mesh() {
        let hm = Heightmap::from_raw(vec![0.5; 16], 4, 4).unwrap();
        let plane = generate_plane(&hm, 10.0, 20.0, 3);

        // res=3 means 4 verts per edge
        assert_eq!(plane.vertex_count(), 4 * 4);
        assert_eq!(plane.index_count(), 3 * 3 * 6);
        assert!(plane.positions.iter().all(|p| (p[1] - 10.0).abs() < 1e-5));
        assert!(plane.indices.iter().all(|&i| (i as usize) < plane.vertex_count()));
    }

    #[test]
    fn plane_spans_requested_size() {
        let hm = Heightmap::from_raw(vec![0.0; 4], 2, 2).unwrap();
        let plane = generate_plane(&hm, 64.0, 1.0, 8);
        let aabb = plane.bounding_box();
        assert_eq!(aabb.min.x, 0.0);
        assert_eq!(aabb.max.x, 64.0);
        assert_eq!(aabb.max.z, 64.0);
    }

    #[test]
    fn plane_layout_matches_mesh_terrain_lookup() {
        // Height rises along u only
        let hm = Heightmap::from_raw(vec![0.0, 1.0, 0.0, 1.0], 2, 2).unwrap();
        let plane = generate_plane(&hm, 10.0, 8.0, 4);
        let terrain = MeshTerrain::from_geometry(&plane).with_min_vertices(0);

        assert_eq!(terrain.resolution(), 5);
        assert!((terrain.height_at(0.0, 0.5).unwrap()).abs() < 1e-5);
        assert!((terrain.height_at(1.0, 0.5).unwrap() - 8.0).abs() < 1e-5);
        assert!((terrain.height_at(0.5, 0.0).unwrap() - 4.0).abs() < 1e-5);
    }
}
