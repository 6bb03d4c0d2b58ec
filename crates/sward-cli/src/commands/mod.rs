//! CLI command implementations

pub mod blade;
pub mod generate;
pub mod simulate;

use anyhow::{Context, Result};
use std::path::Path;
use sward_grass::FieldConfig;

/// Load the config file if one was given, defaults otherwise
pub fn load_config(path: Option<&str>) -> Result<FieldConfig> {
    match path {
        Some(path) => FieldConfig::load(Path::new(path))
            .with_context(|| format!("Failed to load field config '{}'", path)),
        None => Ok(FieldConfig::default()),
    }
}
