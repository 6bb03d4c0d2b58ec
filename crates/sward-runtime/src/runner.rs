//! Ordered system runner

use crate::clock::GameClock;
use crate::system::RuntimeSystem;
use log::{debug, info};
use sward_core::{Result, SwardError};
use sward_scene::SceneGraph;

/// Owns the registered systems and the frame clock
pub struct Runtime {
    pub clock: GameClock,
    systems: Vec<Box<dyn RuntimeSystem>>,
    initialized: bool,
    frames: u64,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    pub fn new() -> Self {
        Self {
            clock: GameClock::new(),
            systems: Vec::new(),
            initialized: false,
            frames: 0,
        }
    }

    /// Register a system. Systems registered after `initialize` are
    /// initialized on the spot.
    pub fn register(
        &mut self,
        mut system: Box<dyn RuntimeSystem>,
        scene: &mut SceneGraph,
    ) -> Result<()> {
        if self.initialized {
            system.initialize(scene)?;
        }
        debug!("[runtime] registered system '{}'", system.name());
        self.systems.push(system);
        Ok(())
    }

    pub fn initialize(&mut self, scene: &mut SceneGraph) -> Result<()> {
        if self.initialized {
            return Ok(());
        }
        for system in &mut self.systems {
            system.initialize(scene)?;
        }
        self.initialized = true;
        info!("[runtime] initialized {} system(s)", self.systems.len());
        Ok(())
    }

    /// Run one frame using wall-clock time
    pub fn frame(&mut self, scene: &mut SceneGraph) -> Result<()> {
        self.clock.tick();
        self.run_systems(scene)
    }

    /// Run one frame with an explicit delta
    pub fn frame_with_delta(&mut self, scene: &mut SceneGraph, dt: f64) -> Result<()> {
        self.clock.advance(dt);
        self.run_systems(scene)
    }

    pub fn shutdown(&mut self, scene: &mut SceneGraph) -> Result<()> {
        for system in self.systems.iter_mut().rev() {
            system.shutdown(scene)?;
        }
        self.initialized = false;
        info!("[runtime] shut down after {} frame(s)", self.frames);
        Ok(())
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|s| s.name()).collect()
    }

    fn run_systems(&mut self, scene: &mut SceneGraph) -> Result<()> {
        if !self.initialized {
            return Err(SwardError::RuntimeError(
                "frame requested before initialize".to_string(),
            ));
        }
        let dt = self.clock.delta_time;
        for system in &mut self.systems {
            system.update(scene, dt)?;
        }
        self.frames += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        name: String,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl RuntimeSystem for Recorder {
        fn initialize(&mut self, _scene: &mut SceneGraph) -> Result<()> {
            self.log.borrow_mut().push(format!("{}:init", self.name));
            Ok(())
        }

        fn update(&mut self, _scene: &mut SceneGraph, dt: f64) -> Result<()> {
            self.log.borrow_mut().push(format!("{}:update:{dt}", self.name));
            Ok(())
        }

        fn shutdown(&mut self, _scene: &mut SceneGraph) -> Result<()> {
            self.log.borrow_mut().push(format!("{}:shutdown", self.name));
            Ok(())
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    fn recorder(name: &str, log: &Rc<RefCell<Vec<String>>>) -> Box<dyn RuntimeSystem> {
        Box::new(Recorder {
            name: name.to_string(),
            log: Rc::clone(log),
        })
    }

    #[test]
    fn systems_run_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scene = SceneGraph::new();
        let mut runtime = Runtime::new();
        runtime.register(recorder("a", &log), &mut scene).unwrap();
        runtime.register(recorder("b", &log), &mut scene).unwrap();

        runtime.initialize(&mut scene).unwrap();
        runtime.frame_with_delta(&mut scene, 0.125).unwrap();
        runtime.shutdown(&mut scene).unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                "a:init",
                "b:init",
                "a:update:0.125",
                "b:update:0.125",
                "b:shutdown",
                "a:shutdown",
            ]
        );
        assert_eq!(runtime.frames(), 1);
        assert_eq!(runtime.system_names(), vec!["a", "b"]);
    }

    #[test]
    fn frame_before_initialize_is_an_error() {
        let mut scene = SceneGraph::new();
        let mut runtime = Runtime::new();
        assert!(runtime.frame_with_delta(&mut scene, 0.016).is_err());
    }

    #[test]
    fn late_registration_initializes_immediately() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scene = SceneGraph::new();
        let mut runtime = Runtime::new();
        runtime.initialize(&mut scene).unwrap();
        runtime.register(recorder("late", &log), &mut scene).unwrap();
        assert_eq!(*log.borrow(), vec!["late:init"]);
    }
}
