//! Blade command

use anyhow::Result;
use serde_json::json;
use sward_grass::BladeTemplate;

use super::load_config;

pub fn run(config_path: Option<&str>, format: &str) -> Result<()> {
    let config = load_config(config_path)?;
    let blade = BladeTemplate::build(&config.blade);
    let geometry = blade.geometry();

    // Rows run tip first, root last
    let tip = geometry.positions.first().copied().unwrap_or_default();
    let root = geometry.positions.last().copied().unwrap_or_default();
    let bounds = blade.bounds();

    match format {
        "json" => {
            let report = json!({
                "params": config.blade,
                "vertices": geometry.vertex_count(),
                "indices": geometry.index_count(),
                "tip": tip,
                "root": root,
                "radius": blade.radius(),
                "bounds_min": bounds.min.to_array(),
                "bounds_max": bounds.max.to_array(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            let params = blade.params();
            println!("Blade");
            println!("  width x height: {} x {}", params.width, params.height);
            println!("  joints:         {}", params.joints);
            println!(
                "  bend (y, x, z): ({}, {}, {})",
                params.bend_y, params.bend_x, params.bend_z
            );
            println!("  vertices:       {}", geometry.vertex_count());
            println!("  indices:        {}", geometry.index_count());
            println!("  tip:            ({:.4}, {:.4}, {:.4})", tip[0], tip[1], tip[2]);
            println!("  root:           ({:.4}, {:.4}, {:.4})", root[0], root[1], root[2]);
            println!("  radius:         {:.4}", blade.radius());
        }
    }

    Ok(())
}
