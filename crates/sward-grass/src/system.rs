//! Drives a vegetation field from the runtime frame loop

use log::info;
use std::cell::RefCell;
use std::rc::Rc;
use sward_core::Result;
use sward_runtime::RuntimeSystem;
use sward_scene::SceneGraph;

use crate::field::VegetationField;

/// Runtime system that refreshes one field per frame.
///
/// The field is shared so the host can keep toggling it (enable, resize)
/// while the runtime owns the system.
pub struct GrassSystem {
    field: Rc<RefCell<VegetationField>>,
}

impl GrassSystem {
    pub fn new(field: VegetationField) -> Self {
        Self {
            field: Rc::new(RefCell::new(field)),
        }
    }

    /// Shared handle to the driven field
    pub fn field(&self) -> Rc<RefCell<VegetationField>> {
        Rc::clone(&self.field)
    }
}

impl RuntimeSystem for GrassSystem {
    fn initialize(&mut self, _scene: &mut SceneGraph) -> Result<()> {
        let field = self.field.borrow();
        info!(
            "[grass] system ready ({} blades, {})",
            field.instance_count(),
            if field.is_enabled() { "enabled" } else { "disabled" }
        );
        Ok(())
    }

    fn update(&mut self, scene: &mut SceneGraph, dt: f64) -> Result<()> {
        self.field.borrow_mut().advance(scene, dt);
        Ok(())
    }

    fn shutdown(&mut self, scene: &mut SceneGraph) -> Result<()> {
        self.field.borrow_mut().destroy(scene);
        Ok(())
    }

    fn name(&self) -> &str {
        "grass"
    }
}
