//! The single blade mesh every grass instance draws
//!
//! A blade starts as a flat vertical strip and is bent by rotating each
//! vertex with an orientation slerped from a base facing (at the root)
//! towards a fully bent orientation (at the tip), weighted by how far up the
//! blade the vertex sits.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;
use std::rc::Rc;
use sward_scene::{Aabb, BufferGeometry};

/// Shape and bend of the blade template. Angles are in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BladeParams {
    pub width: f32,
    pub height: f32,
    /// Vertical subdivisions
    pub joints: u32,
    /// Bend about the vertical axis
    pub bend_y: f32,
    /// Bend about the lateral axis
    pub bend_x: f32,
    /// Bend about the depth axis
    pub bend_z: f32,
}

impl Default for BladeParams {
    fn default() -> Self {
        Self {
            width: 0.04,
            height: 0.3,
            joints: 4,
            bend_y: 0.05,
            bend_x: 0.3,
            bend_z: 0.1,
        }
    }
}

/// Fully bent orientation: rotate about Y, then X, then Z, composed by
/// quaternion multiplication in that order.
pub fn compose_bend(angle_y: f32, angle_x: f32, angle_z: f32) -> Quat {
    let q_y = Quat::from_axis_angle(Vec3::Y, angle_y);
    let q_x = Quat::from_axis_angle(Vec3::X, angle_x);
    let q_z = Quat::from_axis_angle(Vec3::Z, angle_z);
    q_y * q_x * q_z
}

/// Facing applied at the root: a quarter turn about Y
pub fn base_orientation() -> Quat {
    Quat::from_axis_angle(Vec3::Y, FRAC_PI_2)
}

/// Normalized position along the blade, 0 at the root and 1 at the tip.
/// Zero-height blades report 0 everywhere.
pub fn height_fraction(y: f32, blade_height: f32) -> f32 {
    if blade_height == 0.0 {
        return 0.0;
    }
    (y / blade_height).clamp(0.0, 1.0)
}

/// Orientation for a vertex at `fraction` up the blade
pub fn bend_orientation(bend: Quat, fraction: f32) -> Quat {
    base_orientation().slerp(bend, fraction)
}

/// The bent, ready-to-instance blade geometry. Immutable once built.
#[derive(Debug, Clone)]
pub struct BladeTemplate {
    params: BladeParams,
    geometry: Rc<BufferGeometry>,
    bounds: Aabb,
    radius: f32,
}

impl BladeTemplate {
    /// Build and bend the blade. Deterministic for fixed parameters.
    pub fn build(params: &BladeParams) -> Self {
        let mut geometry = vertical_strip(params.width, params.height, params.joints.max(1));
        geometry.translate(Vec3::new(0.0, params.height / 2.0, 0.0));

        let bend = compose_bend(params.bend_y, params.bend_x, params.bend_z);
        for p in &mut geometry.positions {
            let vertex = Vec3::from_array(*p);
            let orientation = bend_orientation(bend, height_fraction(vertex.y, params.height));
            *p = (orientation * vertex).to_array();
        }

        geometry.compute_vertex_normals();

        let bounds = geometry.bounding_box();
        let radius = geometry
            .positions
            .iter()
            .map(|p| (p[0] * p[0] + p[2] * p[2]).sqrt())
            .fold(0.0, f32::max);

        Self {
            params: *params,
            geometry: Rc::new(geometry),
            bounds,
            radius,
        }
    }

    pub fn params(&self) -> &BladeParams {
        &self.params
    }

    /// Shared handle to the vertex/index buffers
    pub fn geometry(&self) -> &Rc<BufferGeometry> {
        &self.geometry
    }

    /// Local-space bounds of the bent blade
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Largest horizontal distance of any vertex from the root axis; the
    /// blade stays inside this radius under any yaw.
    pub fn radius(&self) -> f32 {
        self.radius
    }
}

/// Flat strip in the XY plane, one segment wide and `joints` tall, centered
/// on the origin. Rows run from the top down; normals face +Z.
fn vertical_strip(width: f32, height: f32, joints: u32) -> BufferGeometry {
    let columns = 1u32;
    let row_len = columns + 1;
    let seg_width = width / columns as f32;
    let seg_height = height / joints as f32;

    let vert_count = (row_len * (joints + 1)) as usize;
    let mut positions = Vec::with_capacity(vert_count);
    let mut normals = Vec::with_capacity(vert_count);
    let mut uvs = Vec::with_capacity(vert_count);

    for iy in 0..=joints {
        let y = iy as f32 * seg_height - height / 2.0;
        for ix in 0..=columns {
            let x = ix as f32 * seg_width - width / 2.0;
            positions.push([x, -y, 0.0]);
            normals.push([0.0, 0.0, 1.0]);
            uvs.push([
                ix as f32 / columns as f32,
                1.0 - iy as f32 / joints as f32,
            ]);
        }
    }

    let mut indices = Vec::with_capacity((columns * joints * 6) as usize);
    for iy in 0..joints {
        for ix in 0..columns {
            let a = ix + row_len * iy;
            let b = ix + row_len * (iy + 1);
            let c = ix + 1 + row_len * (iy + 1);
            let d = ix + 1 + row_len * iy;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
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

    /// Quaternions q and -q are the same rotation
    fn same_rotation(a: Quat, b: Quat) -> bool {
        a.dot(b).abs() > 1.0 - 1e-5
    }

    #[test]
    fn bend_endpoints_match_base_and_full_bend() {
        let angles = [
            (0.05, 0.3, 0.1),
            (0.0, 0.0, 0.0),
            (1.2, -0.7, 0.4),
            (-2.5, 1.5, -3.0),
            (3.0, 3.0, 3.0),
        ];
        for (y, x, z) in angles {
            let bend = compose_bend(y, x, z);
            assert!(same_rotation(bend_orientation(bend, 0.0), base_orientation()));
            assert!(same_rotation(bend_orientation(bend, 1.0), bend));
        }
    }

    #[test]
    fn compose_order_is_y_then_x_then_z() {
        let q = compose_bend(0.5, 0.25, 0.75);
        let expected = (Quat::from_rotation_y(0.5) * Quat::from_rotation_x(0.25))
            * Quat::from_rotation_z(0.75);
        assert!(same_rotation(q, expected));

        // Different order, different rotation
        let swapped = Quat::from_rotation_x(0.25) * Quat::from_rotation_y(0.5)
            * Quat::from_rotation_z(0.75);
        assert!(!same_rotation(q, swapped));
    }

    #[test]
    fn height_fraction_guards_zero_height() {
        assert_eq!(height_fraction(0.2, 0.0), 0.0);
        assert_eq!(height_fraction(0.15, 0.3), 0.5);
        assert_eq!(height_fraction(0.6, 0.3), 1.0);
        assert_eq!(height_fraction(-0.1, 0.3), 0.0);
    }

    #[test]
    fn strip_has_expected_topology() {
        let params = BladeParams::default();
        let blade = BladeTemplate::build(&params);
        let geo = blade.geometry();

        // 2 columns of vertices, joints + 1 rows
        assert_eq!(geo.vertex_count(), 2 * 5);
        assert_eq!(geo.index_count(), 4 * 6);
        assert_eq!(geo.uvs.len(), geo.vertex_count());
        assert_eq!(geo.normals.len(), geo.vertex_count());
        for n in &geo.normals {
            let len = Vec3::from_array(*n).length();
            assert!((len - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn uv_v_tracks_height_fraction_for_any_height() {
        let params = BladeParams {
            height: 0.8,
            joints: 8,
            ..BladeParams::default()
        };
        let blade = BladeTemplate::build(&params);
        let geo = blade.geometry();
        let rows = params.joints as usize + 1;

        for (i, uv) in geo.uvs.iter().enumerate() {
            // Rows run tip first
            let row = i / 2;
            let expected = 1.0 - row as f32 / params.joints as f32;
            assert!((uv[1] - expected).abs() < 1e-6);
        }
        assert_eq!(geo.uvs[0][1], 1.0);
        assert_eq!(geo.uvs[rows * 2 - 1][1], 0.0);
    }

    #[test]
    fn root_stays_on_ground_and_tip_is_bent() {
        let params = BladeParams::default();
        let blade = BladeTemplate::build(&params);
        let geo = blade.geometry();

        // Last row is the root (y = 0 before bending)
        let root = &geo.positions[geo.vertex_count() - 2..];
        for p in root {
            assert!(p[1].abs() < 1e-6);
        }

        // Root is only turned by the base facing: the strip now lies in the YZ plane
        let half = params.width / 2.0;
        for p in root {
            assert!(p[0].abs() < 1e-6);
            assert!((p[2].abs() - half).abs() < 1e-6);
        }

        // First row is the tip; bending pulls it off the vertical
        let tip = Vec3::from_array(geo.positions[0]);
        let unbent_tip = base_orientation() * Vec3::new(-half, params.height, 0.0);
        assert!(tip.distance(unbent_tip) > 1e-3);
        assert!(tip.y < params.height);
    }

    #[test]
    fn build_is_deterministic() {
        let params = BladeParams {
            bend_x: 0.9,
            ..BladeParams::default()
        };
        let a = BladeTemplate::build(&params);
        let b = BladeTemplate::build(&params);
        assert_eq!(a.geometry().as_ref(), b.geometry().as_ref());
    }

    #[test]
    fn zero_height_blade_has_no_nans() {
        let params = BladeParams {
            height: 0.0,
            ..BladeParams::default()
        };
        let blade = BladeTemplate::build(&params);
        for p in &blade.geometry().positions {
            assert!(p.iter().all(|c| c.is_finite()));
        }
        for n in &blade.geometry().normals {
            assert!(n.iter().all(|c| c.is_finite()));
        }
    }

    #[test]
    fn radius_and_bounds_enclose_blade() {
        let blade = BladeTemplate::build(&BladeParams::default());
        let bounds = blade.bounds();
        for p in &blade.geometry().positions {
            let v = Vec3::from_array(*p);
            assert!(bounds.contains(v));
            assert!((v.x * v.x + v.z * v.z).sqrt() <= blade.radius() + 1e-6);
        }
        assert!(blade.radius() > 0.0);
    }
}
