//! Per-instance placement: offset, scale, heading and index for every blade

use glam::Vec3;
use rand::Rng;
use std::f32::consts::PI;
use std::ops::Range;
use sward_scene::{Aabb, BoundingSphere, InstancedAttribute, InstancedGeometry};
use sward_terrain::HeightSampler;

use crate::blade::BladeTemplate;
use crate::instance::{pack_instances, GrassInstance};

/// Instanced attribute names the grass shader reads
pub const OFFSET_ATTRIBUTE: &str = "offset";
pub const SCALE_ATTRIBUTE: &str = "scale";
pub const HALF_ROOT_ANGLE_ATTRIBUTE: &str = "halfRootAngle";
pub const INDEX_ATTRIBUTE: &str = "index";

/// Scale range for instances whose index is not a multiple of three
pub const WIDE_SCALE: Range<f32> = 0.3..1.55;
/// Scale range for every third instance (index 0, 3, 6, ...)
pub const NARROW_SCALE: Range<f32> = 0.3..1.3;

/// Sampling-grid resolution is capped so dense placement on huge tiles does
/// not outrun the terrain's own vertex density.
const MAX_GRID_RESOLUTION: f32 = 99.0;

/// Scale range used for instance `i`
pub fn scale_range(i: usize) -> Range<f32> {
    if i % 3 != 0 {
        WIDE_SCALE
    } else {
        NARROW_SCALE
    }
}

/// Grid the field is sampled on, mapped onto the field's local extent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingGrid {
    /// Quads per side
    pub resolution: u32,
    /// Vertices per side (`resolution + 1`)
    pub cells: u32,
    /// Grid units per world unit
    pub ratio: f32,
    pub half_size: f32,
}

impl SamplingGrid {
    pub fn new(field_size: f32) -> Self {
        let resolution = (field_size - 1.0).min(MAX_GRID_RESOLUTION).floor().max(1.0) as u32;
        let cells = resolution + 1;
        Self {
            resolution,
            cells,
            ratio: cells as f32 / field_size,
            half_size: field_size / 2.0,
        }
    }

    /// Extent of grid coordinates: samples fall in [0, span)
    pub fn span(&self) -> f32 {
        (self.cells - 1) as f32
    }

    /// Grid coordinate to field-local world coordinate
    pub fn to_local(&self, grid: f32) -> f32 {
        grid / self.ratio - self.half_size
    }

    /// Grid coordinate to normalized tile coordinate in [0, 1), the same
    /// tile fraction `to_local` places the blade at
    pub fn to_normalized(&self, grid: f32) -> f32 {
        grid / self.cells as f32
    }
}

/// Parallel per-instance buffers, N entries each, in instance order
#[derive(Debug, Clone)]
pub struct InstanceBuffers {
    /// xyz per instance
    pub offsets: Vec<f32>,
    pub scales: Vec<f32>,
    /// (sin, cos) of half the heading per instance
    pub half_root_angles: Vec<f32>,
    /// i / N per instance
    pub indices: Vec<f32>,
    pub bounds: Aabb,
    pub sphere: BoundingSphere,
}

impl InstanceBuffers {
    pub fn len(&self) -> usize {
        self.scales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scales.is_empty()
    }

    pub fn offset(&self, i: usize) -> Option<Vec3> {
        self.offsets
            .get(i * 3..i * 3 + 3)
            .map(|o| Vec3::new(o[0], o[1], o[2]))
    }

    /// Lowest and highest instance root height
    pub fn height_range(&self) -> Option<(f32, f32)> {
        self.offsets.chunks_exact(3).map(|o| o[1]).fold(None, |acc, y| match acc {
            None => Some((y, y)),
            Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
        })
    }

    /// Pack into GPU instance records
    pub fn interleaved(&self) -> Vec<GrassInstance> {
        pack_instances(&self.offsets, &self.scales, &self.half_root_angles, &self.indices)
    }

    /// Replace the four named attributes and the bounds on `geometry`
    pub fn apply_to(&self, geometry: &mut InstancedGeometry) {
        geometry.set_attribute(OFFSET_ATTRIBUTE, InstancedAttribute::new(self.offsets.clone(), 3));
        geometry.set_attribute(SCALE_ATTRIBUTE, InstancedAttribute::new(self.scales.clone(), 1));
        geometry.set_attribute(
            HALF_ROOT_ANGLE_ATTRIBUTE,
            InstancedAttribute::new(self.half_root_angles.clone(), 2),
        );
        geometry.set_attribute(INDEX_ATTRIBUTE, InstancedAttribute::new(self.indices.clone(), 1));
        geometry.bounding_box = Some(self.bounds);
        geometry.bounding_sphere = Some(self.sphere);
    }
}

/// Scatter `count` blades across a square field of side `field_size`.
///
/// Offsets are field-local (the field is centered on its origin); the
/// caller positions the mesh. Bounds cover every blade at its scale.
pub fn generate_instances<R: Rng + ?Sized>(
    count: usize,
    field_size: f32,
    sampler: &HeightSampler<'_>,
    template: &BladeTemplate,
    rng: &mut R,
) -> InstanceBuffers {
    let grid = SamplingGrid::new(field_size);
    let span = grid.span();

    let mut offsets = Vec::with_capacity(count * 3);
    let mut scales = Vec::with_capacity(count);
    let mut half_root_angles = Vec::with_capacity(count * 2);
    let mut indices = Vec::with_capacity(count);
    let mut bounds = Aabb::EMPTY;

    // Vertical reach of one blade, always spanning its root
    let blade = template.bounds();
    let (low, high) = (blade.min.y.min(0.0), blade.max.y.max(0.0));
    let radius = template.radius();

    for i in 0..count {
        let x_grid = rng.gen_range(0.0..span);
        let z_grid = rng.gen_range(0.0..span);
        let height = sampler.height_at(grid.to_normalized(x_grid), grid.to_normalized(z_grid));
        let offset = Vec3::new(grid.to_local(x_grid), height, grid.to_local(z_grid));

        let heading: f32 = rng.gen_range(-PI..PI);
        let half = heading / 2.0;

        let scale = rng.gen_range(scale_range(i));

        offsets.extend_from_slice(&offset.to_array());
        half_root_angles.push(half.sin());
        half_root_angles.push(half.cos());
        scales.push(scale);
        indices.push(i as f32 / count as f32);

        let reach = radius * scale;
        bounds.expand_to_include(Vec3::new(
            offset.x - reach,
            offset.y + low * scale,
            offset.z - reach,
        ));
        bounds.expand_to_include(Vec3::new(
            offset.x + reach,
            offset.y + high * scale,
            offset.z + reach,
        ));
    }

    InstanceBuffers {
        offsets,
        scales,
        half_root_angles,
        indices,
        sphere: bounds.bounding_sphere(),
        bounds,
    }
}
