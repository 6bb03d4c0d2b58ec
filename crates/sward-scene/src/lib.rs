//! Sward Scene - the scene-graph handle and the CPU data it carries
//!
//! Provides:
//! - `SceneGraph` / `SceneNode` - named node tree with one-level nested lookup
//! - `BufferGeometry`, `InstancedGeometry` - vertex buffers shared across instances
//! - `Aabb`, `BoundingSphere` - bounding volumes
//! - `ShaderMaterial`, `TextureSlot` - opaque shader programs with named uniforms
//!
//! GPU upload and drawing live in the host renderer.

pub mod geometry;
pub mod graph;
pub mod material;

pub use geometry::{Aabb, BoundingSphere, BufferGeometry, InstancedAttribute, InstancedGeometry};
pub use graph::{InstancedMesh, NodeKind, SceneGraph, SceneNode};
pub use material::{
    QueuedTextureLoader, ShaderMaterial, ShaderProgram, TextureHandle, TextureLoader,
    TextureSlot, TextureState, Uniform,
};
