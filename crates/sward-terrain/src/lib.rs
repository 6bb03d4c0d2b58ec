//! Sward Terrain - ground height for vegetation placement
//!
//! Provides heightmap loading, terrain plane mesh generation, the
//! `TerrainProvider` height-source trait and `HeightSampler`, which turns
//! any (or no) height source into clearance-adjusted placement heights.
//! Does not own the terrain the host streams in; it only borrows it per query.

pub mod heightmap;
pub mod lookup;
pub mod plane;
pub mod provider;
pub mod sampler;

pub use heightmap::{Heightmap, HeightmapTerrain};
pub use lookup::{find_terrain_mesh, ENVIRONMENT_NODE, TERRAIN_NODE};
pub use plane::generate_plane;
pub use provider::{FlatTerrain, MeshTerrain, TerrainProvider, MIN_TERRAIN_VERTICES};
pub use sampler::{HeightSampler, DEFAULT_CLEARANCE, PLACEHOLDER_GROUND};
