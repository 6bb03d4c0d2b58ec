//! Generate command

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use std::rc::Rc;
use sward_grass::attributes::OFFSET_ATTRIBUTE;
use sward_grass::{pack_geometry, VegetationField};
use sward_scene::{Aabb, QueuedTextureLoader, SceneGraph, SceneNode};
use sward_terrain::{generate_plane, Heightmap, HeightmapTerrain, TERRAIN_NODE};

use super::load_config;

/// Quads per side of the terrain plane built from `--heightmap`; 64x64
/// vertices is dense enough for the terrain to count as loaded.
const TERRAIN_RESOLUTION: u32 = 63;

pub struct GenerateArgs {
    pub config: Option<String>,
    pub heightmap: Option<String>,
    pub height_scale: f32,
    pub bilinear: bool,
    pub seed: Option<u64>,
    pub count: Option<usize>,
    pub size: Option<f32>,
    pub format: String,
    pub out: Option<String>,
}

#[derive(Serialize)]
struct FieldSummary {
    instances: usize,
    field_size: f32,
    regenerations: u64,
    terrain: &'static str,
    bounds_min: [f32; 3],
    bounds_max: [f32; 3],
    sphere_radius: f32,
    height_min: f32,
    height_max: f32,
}

pub fn run(args: GenerateArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.field.seed = Some(seed);
    }
    if let Some(count) = args.count {
        config.field.instance_count = count;
    }
    if let Some(size) = args.size {
        config.field.size = size;
    }
    config.field.enabled = true;
    config.validate().context("Invalid field settings")?;

    let mut scene = SceneGraph::new();
    let heightmap = match &args.heightmap {
        Some(path) => {
            let heightmap = Heightmap::from_png(Path::new(path))
                .with_context(|| format!("Failed to load heightmap '{}'", path))?;
            let plane = generate_plane(
                &heightmap,
                config.field.size,
                args.height_scale,
                TERRAIN_RESOLUTION,
            );
            scene.add(SceneNode::mesh(TERRAIN_NODE, Rc::new(plane)));
            Some(heightmap)
        }
        None => None,
    };

    let mut loader = QueuedTextureLoader::new();
    let mut field = VegetationField::new(config.into_options(), &mut loader);
    let terrain = match heightmap {
        Some(heightmap) if args.bilinear => {
            field = field.with_terrain(Box::new(HeightmapTerrain::new(
                heightmap,
                args.height_scale,
            )));
            "heightmap (bilinear)"
        }
        Some(_) => "terrain mesh",
        None => "placeholder",
    };
    field.add_to_scene(&mut scene);

    let summary = summarize(&field, terrain);
    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        _ => print_summary(&summary),
    }

    if let Some(out) = &args.out {
        let instances = pack_geometry(&field.geometry());
        std::fs::write(out, bytemuck::cast_slice(&instances))
            .with_context(|| format!("Failed to write '{}'", out))?;
        println!("Wrote {} instance records to {}", instances.len(), out);
    }

    Ok(())
}

fn summarize(field: &VegetationField, terrain: &'static str) -> FieldSummary {
    let geometry = field.geometry();
    let (height_min, height_max) = geometry
        .attribute(OFFSET_ATTRIBUTE)
        .map(|offsets| {
            offsets
                .data
                .chunks_exact(3)
                .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), o| {
                    (lo.min(o[1]), hi.max(o[1]))
                })
        })
        .filter(|(lo, hi)| lo <= hi)
        .unwrap_or((0.0, 0.0));
    let bounds = geometry.bounding_box.unwrap_or(Aabb::EMPTY);
    let sphere_radius = geometry.bounding_sphere.map(|s| s.radius).unwrap_or(-1.0);

    FieldSummary {
        instances: geometry.instance_count(),
        field_size: field.field_size(),
        regenerations: field.regenerations(),
        terrain,
        bounds_min: bounds.min.to_array(),
        bounds_max: bounds.max.to_array(),
        sphere_radius,
        height_min,
        height_max,
    }
}

fn print_summary(summary: &FieldSummary) {
    println!("Field");
    println!("  instances:     {}", summary.instances);
    println!("  size:          {}", summary.field_size);
    println!("  terrain:       {}", summary.terrain);
    println!("  regenerations: {}", summary.regenerations);
    println!(
        "  bounds:        ({:.3}, {:.3}, {:.3}) .. ({:.3}, {:.3}, {:.3})",
        summary.bounds_min[0],
        summary.bounds_min[1],
        summary.bounds_min[2],
        summary.bounds_max[0],
        summary.bounds_max[1],
        summary.bounds_max[2]
    );
    println!("  sphere radius: {:.3}", summary.sphere_radius);
    println!(
        "  root heights:  {:.3} .. {:.3}",
        summary.height_min, summary.height_max
    );
}
