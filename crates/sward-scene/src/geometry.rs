//! CPU-side geometry buffers and bounding volumes

use glam::Vec3;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Indexed triangle geometry with per-vertex positions, normals and UVs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BufferGeometry {
    /// Vertex positions in local space
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals
    pub normals: Vec<[f32; 3]>,
    /// UV coordinates
    pub uvs: Vec<[f32; 2]>,
    /// Triangle indices (CCW winding)
    pub indices: Vec<u32>,
}

impl BufferGeometry {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Translate every vertex position by `offset`
    pub fn translate(&mut self, offset: Vec3) {
        for p in &mut self.positions {
            *p = (Vec3::from_array(*p) + offset).to_array();
        }
    }

    /// Recompute smooth vertex normals from the current topology.
    ///
    /// Face normals are accumulated unnormalized (area-weighted) on every
    /// vertex of the triangle, then normalized. Vertices not referenced by
    /// any triangle end up with a zero normal.
    pub fn compute_vertex_normals(&mut self) {
        let mut accum = vec![Vec3::ZERO; self.positions.len()];

        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let pa = Vec3::from_array(self.positions[a]);
            let pb = Vec3::from_array(self.positions[b]);
            let pc = Vec3::from_array(self.positions[c]);

            let face = (pc - pb).cross(pa - pb);
            accum[a] += face;
            accum[b] += face;
            accum[c] += face;
        }

        self.normals = accum
            .into_iter()
            .map(|n| n.normalize_or_zero().to_array())
            .collect();
    }

    /// Axis-aligned bounds of the vertex positions
    pub fn bounding_box(&self) -> Aabb {
        let mut aabb = Aabb::EMPTY;
        for p in &self.positions {
            aabb.expand_to_include(Vec3::from_array(*p));
        }
        aabb
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Inverted-infinite box: contains nothing, grows to fit the first point added
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }

    pub fn expand_to_include(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Smallest sphere centered on the box that encloses it.
    /// An empty box yields a sphere of radius -1.
    pub fn bounding_sphere(&self) -> BoundingSphere {
        if self.is_empty() {
            return BoundingSphere {
                center: Vec3::ZERO,
                radius: -1.0,
            };
        }
        BoundingSphere {
            center: self.center(),
            radius: self.size().length() * 0.5,
        }
    }
}

/// Bounding sphere used for frustum tests by the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    pub fn contains(&self, point: Vec3) -> bool {
        self.radius >= 0.0 && point.distance(self.center) <= self.radius + 1e-4
    }
}

/// A per-instance vertex attribute: `item_size` floats per instance
#[derive(Debug, Clone, PartialEq)]
pub struct InstancedAttribute {
    pub item_size: usize,
    pub data: Vec<f32>,
}

impl InstancedAttribute {
    pub fn new(data: Vec<f32>, item_size: usize) -> Self {
        Self { item_size, data }
    }

    /// Number of instances this attribute describes
    pub fn count(&self) -> usize {
        if self.item_size == 0 {
            0
        } else {
            self.data.len() / self.item_size
        }
    }

    /// The `item_size` floats for instance `index`
    pub fn item(&self, index: usize) -> Option<&[f32]> {
        let start = index * self.item_size;
        self.data.get(start..start + self.item_size)
    }
}

/// Geometry drawn many times from one shared vertex/index set, varied per
/// copy by named instanced attributes.
#[derive(Debug, Clone)]
pub struct InstancedGeometry {
    base: Rc<BufferGeometry>,
    attributes: BTreeMap<String, InstancedAttribute>,
    /// Bounds of all instances in geometry-local space
    pub bounding_box: Option<Aabb>,
    /// Sphere enclosing `bounding_box`
    pub bounding_sphere: Option<BoundingSphere>,
}

impl InstancedGeometry {
    /// Wrap a base geometry. The vertex buffers are shared, not copied.
    pub fn new(base: Rc<BufferGeometry>) -> Self {
        Self {
            base,
            attributes: BTreeMap::new(),
            bounding_box: None,
            bounding_sphere: None,
        }
    }

    pub fn base(&self) -> &Rc<BufferGeometry> {
        &self.base
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, attribute: InstancedAttribute) {
        self.attributes.insert(name.into(), attribute);
    }

    pub fn attribute(&self, name: &str) -> Option<&InstancedAttribute> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &InstancedAttribute)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Instance count, taken as the smallest count across all attributes
    pub fn instance_count(&self) -> usize {
        self.attributes
            .values()
            .map(InstancedAttribute::count)
            .min()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> BufferGeometry {
        BufferGeometry {
            positions: vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            normals: vec![[0.0; 3]; 4],
            uvs: vec![[0.0; 2]; 4],
            indices: vec![0, 1, 2, 0, 2, 3],
        }
    }

    #[test]
    fn normals_of_flat_quad_face_plus_z() {
        let mut geo = quad();
        geo.compute_vertex_normals();
        for n in &geo.normals {
            assert!((n[0]).abs() < 1e-6);
            assert!((n[1]).abs() < 1e-6);
            assert!((n[2] - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn translate_moves_bounds() {
        let mut geo = quad();
        geo.translate(Vec3::new(0.0, 2.0, 0.0));
        let aabb = geo.bounding_box();
        assert_eq!(aabb.min, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 3.0, 0.0));
    }

    #[test]
    fn empty_aabb_grows_to_first_point() {
        let mut aabb = Aabb::EMPTY;
        assert!(aabb.is_empty());
        assert!(aabb.bounding_sphere().radius < 0.0);

        aabb.expand_to_include(Vec3::new(1.0, 2.0, 3.0));
        assert!(!aabb.is_empty());
        assert_eq!(aabb.min, aabb.max);
        assert_eq!(aabb.bounding_sphere().radius, 0.0);
    }

    #[test]
    fn sphere_encloses_box_corners() {
        let aabb = Aabb::new(Vec3::new(-1.0, 0.0, -2.0), Vec3::new(3.0, 1.0, 2.0));
        let sphere = aabb.bounding_sphere();
        assert!(sphere.contains(aabb.min));
        assert!(sphere.contains(aabb.max));
        assert!(sphere.contains(Vec3::new(-1.0, 1.0, 2.0)));
    }

    #[test]
    fn instanced_geometry_shares_base_buffers() {
        let base = Rc::new(quad());
        let mut inst = InstancedGeometry::new(Rc::clone(&base));
        assert!(Rc::ptr_eq(inst.base(), &base));
        assert_eq!(inst.instance_count(), 0);

        inst.set_attribute("offset", InstancedAttribute::new(vec![0.0; 6], 3));
        inst.set_attribute("scale", InstancedAttribute::new(vec![1.0, 2.0], 1));
        assert_eq!(inst.instance_count(), 2);
        assert_eq!(inst.attribute("scale").and_then(|a| a.item(1)), Some(&[2.0][..]));
        assert!(inst.attribute("scale").and_then(|a| a.item(2)).is_none());
    }
}
