//! Simulate command

use anyhow::{Context, Result};
use log::{debug, info};
use sward_grass::{GrassSystem, VegetationField, FIELD_NODE, TIME_UNIFORM};
use sward_runtime::Runtime;
use sward_scene::{QueuedTextureLoader, SceneGraph, Uniform};

use super::load_config;

pub struct SimulateArgs {
    pub config: Option<String>,
    pub frames: u32,
    pub dt: f64,
    pub disable_after: Option<u32>,
}

pub fn run(args: SimulateArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    config.field.enabled = true;

    let mut scene = SceneGraph::new();
    let mut loader = QueuedTextureLoader::new();
    let system = GrassSystem::new(VegetationField::new(config.into_options(), &mut loader));
    let field = system.field();

    let mut runtime = Runtime::new();
    runtime
        .register(Box::new(system), &mut scene)
        .context("Failed to register grass system")?;
    runtime.initialize(&mut scene).context("Failed to initialize runtime")?;

    // Textures arrive after the first frame, as they would from disk
    let mut textures_pending = true;

    for frame in 0..args.frames {
        if args.disable_after == Some(frame) {
            field.borrow_mut().set_enabled(false);
            info!("[simulate] field disabled at frame {}", frame);
        }

        runtime
            .frame_with_delta(&mut scene, args.dt)
            .with_context(|| format!("Frame {} failed", frame))?;

        if textures_pending {
            loader.complete_all();
            textures_pending = false;
        }

        let time = scene
            .find_by_name(FIELD_NODE)
            .and_then(|id| scene.get(id))
            .and_then(|node| node.as_instanced())
            .and_then(|mesh| {
                let material = mesh.material.borrow();
                material.uniform(TIME_UNIFORM).and_then(Uniform::as_float)
            });
        match time {
            Some(time) => debug!("[simulate] frame {} time={:.3}", frame, time),
            None => debug!("[simulate] frame {} (detached)", frame),
        }
    }

    let attached = scene.count_named(FIELD_NODE) == 1;
    let (regenerations, elapsed, textures_ready) = {
        let field = field.borrow();
        let ready = field.material().textures_ready();
        (field.regenerations(), field.elapsed(), ready)
    };

    runtime.shutdown(&mut scene).context("Failed to shut down runtime")?;

    println!("Simulated {} frame(s)", runtime.frames());
    println!("  attached at end: {}", attached);
    println!("  regenerations:   {}", regenerations);
    println!("  animation time:  {:.3}s", elapsed);
    println!("  textures ready:  {}", textures_ready);
    println!("  nodes left:      {}", scene.len());

    Ok(())
}
