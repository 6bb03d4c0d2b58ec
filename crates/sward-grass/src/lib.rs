//! Sward Grass - procedural instanced vegetation
//!
//! One bent blade mesh is built once and drawn thousands of times, each
//! copy varied by per-instance offset, scale, heading and index:
//! - `blade` - builds and bends the blade template
//! - `attributes` - scatters instances over the tile at terrain height
//! - `field` - `VegetationField`, the scene lifecycle around both
//! - `material` - the grass shader program and its uniforms
//! - `instance` - GPU vertex/instance records and layouts
//! - `config` - TOML field configuration
//! - `system` - `GrassSystem` for the runtime frame loop

pub mod attributes;
pub mod blade;
pub mod config;
pub mod field;
pub mod instance;
pub mod material;
pub mod system;

pub use attributes::{generate_instances, InstanceBuffers, SamplingGrid};
pub use blade::{
    base_orientation, bend_orientation, compose_bend, height_fraction, BladeParams,
    BladeTemplate,
};
pub use config::FieldConfig;
pub use field::{FieldOptions, VegetationField, FIELD_NODE};
pub use instance::{blade_vertices, pack_geometry, pack_instances, BladeVertex, GrassInstance};
pub use material::{grass_material, LightingParams, TexturePaths, TIME_UNIFORM};
pub use system::GrassSystem;
