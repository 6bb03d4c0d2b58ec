//! Heightmap loading and sampling

use std::path::Path;
use sward_core::{Result, SwardError};

use crate::provider::TerrainProvider;

/// A grayscale heightmap with bilinear sampling
#[derive(Debug, Clone)]
pub struct Heightmap {
    /// Row-major height values normalized to [0..1]
    heights: Vec<f32>,
    /// Width in pixels
    pub width: u32,
    /// Depth (height) in pixels
    pub depth: u32,
}

impl Heightmap {
    /// Load a heightmap from a grayscale PNG file.
    /// Values are normalized to [0..1] regardless of bit depth.
    pub fn from_png(path: &Path) -> Result<Self> {
        let img = image::open(path).map_err(|e| {
            SwardError::HeightmapError(format!(
                "Failed to load heightmap '{}': {}",
                path.display(),
                e
            ))
        })?;

        let gray = img.into_luma16();
        let width = gray.width();
        let depth = gray.height();

        let heights: Vec<f32> = gray
            .pixels()
            .map(|p| p.0[0] as f32 / 65535.0)
            .collect();

        Self::from_raw(heights, width, depth)
    }

    /// Create a heightmap from raw float data. Needs at least 2x2 samples.
    pub fn from_raw(heights: Vec<f32>, width: u32, depth: u32) -> Result<Self> {
        if width < 2 || depth < 2 {
            return Err(SwardError::HeightmapError(format!(
                "heightmap must be at least 2x2, got {width}x{depth}"
            )));
        }
        if heights.len() != (width as usize) * (depth as usize) {
            return Err(SwardError::HeightmapError(format!(
                "expected {} samples for {width}x{depth}, got {}",
                width as usize * depth as usize,
                heights.len()
            )));
        }
        Ok(Self {
            heights,
            width,
            depth,
        })
    }

    /// Bilinear sample at normalized UV coordinates (0..1, 0..1).
    /// Returns interpolated height in [0..1].
    pub fn sample(&self, u: f32, v: f32) -> f32 {
        let u = u.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);

        let fx = u * (self.width - 1) as f32;
        let fz = v * (self.depth - 1) as f32;

        let x0 = (fx as u32).min(self.width - 2);
        let z0 = (fz as u32).min(self.depth - 2);
        let x1 = x0 + 1;
        let z1 = z0 + 1;

        let tx = fx - x0 as f32;
        let tz = fz - z0 as f32;

        let h00 = self.get(x0, z0);
        let h10 = self.get(x1, z0);
        let h01 = self.get(x0, z1);
        let h11 = self.get(x1, z1);

        let h0 = h00 * (1.0 - tx) + h10 * tx;
        let h1 = h01 * (1.0 - tx) + h11 * tx;

        h0 * (1.0 - tz) + h1 * tz
    }

    /// Compute the surface normal at a UV position using finite differences.
    pub fn compute_normal(&self, u: f32, v: f32, size: f32, height_scale: f32) -> [f32; 3] {
        let eps_u = 1.0 / (self.width as f32);
        let eps_v = 1.0 / (self.depth as f32);

        let h_left = self.sample((u - eps_u).max(0.0), v) * height_scale;
        let h_right = self.sample((u + eps_u).min(1.0), v) * height_scale;
        let h_down = self.sample(u, (v - eps_v).max(0.0)) * height_scale;
        let h_up = self.sample(u, (v + eps_v).min(1.0)) * height_scale;

        let dx = (h_right - h_left) / (2.0 * eps_u * size);
        let dz = (h_up - h_down) / (2.0 * eps_v * size);

        // Normal = normalize(-dh/dx, 1, -dh/dz)
        let nx = -dx;
        let ny = 1.0;
        let nz = -dz;
        let len = (nx * nx + ny * ny + nz * nz).sqrt();

        [nx / len, ny / len, nz / len]
    }

    fn get(&self, x: u32, z: u32) -> f32 {
        self.heights[(z * self.width + x) as usize]
    }
}

/// A heightmap scaled to world units, usable directly as a height source
#[derive(Debug, Clone)]
pub struct HeightmapTerrain {
    pub heightmap: Heightmap,
    /// World-space Y that a sample of 1.0 maps to
    pub height_scale: f32,
}

impl HeightmapTerrain {
    pub fn new(heightmap: Heightmap, height_scale: f32) -> Self {
        Self {
            heightmap,
            height_scale,
        }
    }
}

impl TerrainProvider for HeightmapTerrain {
    fn height_at(&self, u: f32, v: f32) -> Option<f32> {
        Some(self.heightmap.sample(u, v) * self.height_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_sampling_returns_correct_values() {
        // 3x3 heightmap: center pixel is 1.0, edges are 0.0
        let heights = vec![
            0.0, 0.0, 0.0,
            0.0, 1.0, 0.0,
            0.0, 0.0, 0.0,
        ];
        let hm = Heightmap::from_raw(heights, 3, 3).unwrap();

        let center = hm.sample(0.5, 0.5);
        assert!((center - 1.0).abs() < 0.01);

        let corner = hm.sample(0.0, 0.0);
        assert!((corner - 0.0).abs() < 0.01);
    }

    #[test]
    fn out_of_range_uv_is_clamped() {
        let hm = Heightmap::from_raw(vec![0.25, 0.25, 0.75, 0.75], 2, 2).unwrap();
        assert!((hm.sample(-3.0, 0.0) - 0.25).abs() < 1e-6);
        assert!((hm.sample(0.0, 9.0) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn raw_size_mismatch_is_rejected() {
        assert!(Heightmap::from_raw(vec![0.0; 3], 2, 2).is_err());
        assert!(Heightmap::from_raw(vec![0.0; 1], 1, 1).is_err());
    }

    #[test]
    fn normal_computation_on_flat_terrain() {
        let hm = Heightmap::from_raw(vec![0.5; 9], 3, 3).unwrap();
        let normal = hm.compute_normal(0.5, 0.5, 10.0, 10.0);
        assert!((normal[0]).abs() < 0.01);
        assert!((normal[1] - 1.0).abs() < 0.01);
        assert!((normal[2]).abs() < 0.01);
    }

    #[test]
    fn scaled_terrain_reports_world_height() {
        let hm = Heightmap::from_raw(vec![0.5; 4], 2, 2).unwrap();
        let terrain = HeightmapTerrain::new(hm, 40.0);
        assert_eq!(terrain.height_at(0.0, 0.0), Some(20.0));
        assert!(terrain.is_ready());
    }
}
