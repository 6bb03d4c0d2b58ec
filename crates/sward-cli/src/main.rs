//! Sward CLI - headless generation and inspection of grass fields

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{blade, generate, simulate};

#[derive(Parser)]
#[command(name = "sward")]
#[command(about = "Procedural instanced grass for terrain tiles", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a field in a fresh scene and summarize it
    Generate {
        /// Path to a field config TOML file
        #[arg(long)]
        config: Option<String>,

        /// Grayscale PNG used as the terrain under the field
        #[arg(long)]
        heightmap: Option<String>,

        /// World height of a white heightmap pixel
        #[arg(long, default_value = "50.0")]
        height_scale: f32,

        /// Read heights straight from the heightmap with bilinear filtering
        /// instead of snapping to the nearest terrain mesh vertex
        #[arg(long)]
        bilinear: bool,

        /// Placement seed (overrides the config)
        #[arg(long)]
        seed: Option<u64>,

        /// Number of blades (overrides the config)
        #[arg(long)]
        count: Option<usize>,

        /// Tile side length (overrides the config)
        #[arg(long)]
        size: Option<f32>,

        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = parse_format)]
        format: String,

        /// Write packed instance records to this file
        #[arg(long)]
        out: Option<String>,
    },

    /// Print the bent blade template
    Blade {
        /// Path to a field config TOML file
        #[arg(long)]
        config: Option<String>,

        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = parse_format)]
        format: String,
    },

    /// Drive a field through the runtime frame loop
    Simulate {
        /// Path to a field config TOML file
        #[arg(long)]
        config: Option<String>,

        /// Frames to run
        #[arg(long, default_value = "60")]
        frames: u32,

        /// Seconds per frame, applied as given (no long-frame clamp)
        #[arg(long, default_value = "0.016666668")]
        dt: f64,

        /// Disable the field after this many frames
        #[arg(long)]
        disable_after: Option<u32>,
    },
}

fn parse_format(s: &str) -> Result<String, String> {
    match s {
        "text" | "json" => Ok(s.to_string()),
        _ => Err(format!("unknown format '{}'; valid values: text, json", s)),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            config,
            heightmap,
            height_scale,
            bilinear,
            seed,
            count,
            size,
            format,
            out,
        } => generate::run(generate::GenerateArgs {
            config,
            heightmap,
            height_scale,
            bilinear,
            seed,
            count,
            size,
            format,
            out,
        }),
        Commands::Blade { config, format } => blade::run(config.as_deref(), &format),
        Commands::Simulate {
            config,
            frames,
            dt,
            disable_after,
        } => simulate::run(simulate::SimulateArgs {
            config,
            frames,
            dt,
            disable_after,
        }),
    }
}
