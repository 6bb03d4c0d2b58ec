//! Locating the terrain mesh inside a scene

use sward_scene::{BufferGeometry, SceneGraph};

/// Name of the terrain mesh node
pub const TERRAIN_NODE: &str = "plane";

/// Container the terrain mesh may be nested in, one level deep
pub const ENVIRONMENT_NODE: &str = "environment";

/// Find the terrain mesh: a node named `"plane"` at the top level, or a
/// direct child of a top-level `"environment"` node. Nodes with those names
/// that carry no mesh are treated as absent terrain.
pub fn find_terrain_mesh(scene: &SceneGraph) -> Option<&BufferGeometry> {
    let id = scene.find_nested(ENVIRONMENT_NODE, TERRAIN_NODE)?;
    scene.get(id)?.as_mesh().map(|geometry| &**geometry)
}
