//! GPU-side vertex and instance records for the grass pass

use bytemuck::{Pod, Zeroable};
use sward_scene::{BufferGeometry, InstancedGeometry};

use crate::attributes::{
    HALF_ROOT_ANGLE_ATTRIBUTE, INDEX_ATTRIBUTE, OFFSET_ATTRIBUTE, SCALE_ATTRIBUTE,
};

/// One blade vertex, matching WGSL `BladeVertex` (locations 0-2)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct BladeVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl BladeVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,   // position
        1 => Float32x3,   // normal
        2 => Float32x2,   // uv
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<BladeVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Per-instance data, matching WGSL `GrassInstance` (locations 3-6).
/// 32 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct GrassInstance {
    pub offset: [f32; 3],
    pub scale: f32,
    /// sin, cos of half the heading
    pub half_root_angle: [f32; 2],
    /// i / N
    pub index: f32,
    pub _pad: f32,
}

impl GrassInstance {
    const ATTRIBS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        3 => Float32x3,   // offset
        4 => Float32,     // scale
        5 => Float32x2,   // half_root_angle
        6 => Float32,     // index
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GrassInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Zip the four parallel attribute buffers into instance records.
/// Stops at the shortest buffer.
pub fn pack_instances(
    offsets: &[f32],
    scales: &[f32],
    half_root_angles: &[f32],
    indices: &[f32],
) -> Vec<GrassInstance> {
    offsets
        .chunks_exact(3)
        .zip(scales)
        .zip(half_root_angles.chunks_exact(2))
        .zip(indices)
        .map(|(((offset, &scale), angle), &index)| GrassInstance {
            offset: [offset[0], offset[1], offset[2]],
            scale,
            half_root_angle: [angle[0], angle[1]],
            index,
            _pad: 0.0,
        })
        .collect()
}

/// Pack the named grass attributes of `geometry`. Empty until the field
/// has been generated.
pub fn pack_geometry(geometry: &InstancedGeometry) -> Vec<GrassInstance> {
    let data = |name: &str| geometry.attribute(name).map(|a| a.data.as_slice()).unwrap_or(&[]);
    pack_instances(
        data(OFFSET_ATTRIBUTE),
        data(SCALE_ATTRIBUTE),
        data(HALF_ROOT_ANGLE_ATTRIBUTE),
        data(INDEX_ATTRIBUTE),
    )
}

/// Interleave a blade's position/normal/uv buffers for upload.
/// Missing normals or uvs are zero-filled.
pub fn blade_vertices(geometry: &BufferGeometry) -> Vec<BladeVertex> {
    geometry
        .positions
        .iter()
        .enumerate()
        .map(|(i, position)| BladeVertex {
            position: *position,
            normal: geometry.normals.get(i).copied().unwrap_or([0.0; 3]),
            uv: geometry.uvs.get(i).copied().unwrap_or([0.0; 2]),
        })
        .collect()
}
