//! Runtime system trait

use sward_core::Result;
use sward_scene::SceneGraph;

/// A system that can be ticked by the frame loop
///
/// Systems are updated in registration order, synchronously, within the
/// frame's update phase. None of the calls may block.
pub trait RuntimeSystem {
    /// Called once when the system is first registered
    fn initialize(&mut self, scene: &mut SceneGraph) -> Result<()>;

    /// Called once per frame
    fn update(&mut self, scene: &mut SceneGraph, dt: f64) -> Result<()>;

    /// Called when the system is being shut down; must leave nothing behind in the scene
    fn shutdown(&mut self, scene: &mut SceneGraph) -> Result<()>;

    /// Human-readable name for this system
    fn name(&self) -> &str;
}
