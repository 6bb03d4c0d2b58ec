//! Height sources

use sward_scene::BufferGeometry;

/// Vertex count below which a terrain mesh is treated as still streaming in
/// (a 58x58 grid, i.e. 10000 position floats).
pub const MIN_TERRAIN_VERTICES: usize = 3334;

/// Something that can report ground height across a terrain tile.
///
/// Coordinates are normalized over the tile: (0, 0) is one corner and
/// (1, 1) the opposite one. `None` means no height is available there yet.
pub trait TerrainProvider {
    fn height_at(&self, u: f32, v: f32) -> Option<f32>;

    /// Whether the source has data at all. Callers use this to report the
    /// placeholder path once instead of per sample.
    fn is_ready(&self) -> bool {
        true
    }
}

/// Constant-height ground
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatTerrain(pub f32);

impl TerrainProvider for FlatTerrain {
    fn height_at(&self, _u: f32, _v: f32) -> Option<f32> {
        Some(self.0)
    }
}

/// Height lookup over a square terrain vertex grid owned by someone else.
///
/// Vertices are row-major: index = row * resolution + column, with rows
/// running along v and columns along u. Queries snap to the nearest vertex.
#[derive(Debug, Clone, Copy)]
pub struct MeshTerrain<'a> {
    positions: &'a [[f32; 3]],
    resolution: usize,
    min_vertices: usize,
}

impl<'a> MeshTerrain<'a> {
    /// `resolution` is the number of vertices per side
    pub fn new(positions: &'a [[f32; 3]], resolution: usize) -> Self {
        Self {
            positions,
            resolution,
            min_vertices: MIN_TERRAIN_VERTICES,
        }
    }

    /// Borrow a square grid mesh, inferring the per-side resolution from the
    /// vertex count
    pub fn from_geometry(geometry: &'a BufferGeometry) -> Self {
        Self::new(&geometry.positions, grid_side(geometry.vertex_count()))
    }

    /// Override the viability threshold
    pub fn with_min_vertices(mut self, min_vertices: usize) -> Self {
        self.min_vertices = min_vertices;
        self
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Vertex index nearest to (u, v)
    pub fn nearest_index(&self, u: f32, v: f32) -> usize {
        let span = self.resolution.saturating_sub(1) as f32;
        let col = (u.clamp(0.0, 1.0) * span).round() as usize;
        let row = (v.clamp(0.0, 1.0) * span).round() as usize;
        row * self.resolution + col
    }
}

impl TerrainProvider for MeshTerrain<'_> {
    fn height_at(&self, u: f32, v: f32) -> Option<f32> {
        if !self.is_ready() {
            return None;
        }
        self.positions.get(self.nearest_index(u, v)).map(|p| p[1])
    }

    fn is_ready(&self) -> bool {
        self.resolution >= 2
            && self.positions.len() >= self.min_vertices
            && self.resolution * self.resolution <= self.positions.len()
    }
}

/// Per-side vertex count of a square grid holding `vertex_count` vertices
fn grid_side(vertex_count: usize) -> usize {
    let mut side = (vertex_count as f64).sqrt() as usize;
    while side * side > vertex_count {
        side -= 1;
    }
    while (side + 1) * (side + 1) <= vertex_count {
        side += 1;
    }
    side
}
