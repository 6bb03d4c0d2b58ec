//! Field configuration loaded from TOML
//!
//! ```toml
//! [field]
//! instance_count = 5000
//! size = 256.0
//! enabled = true
//! seed = 42
//!
//! [blade]
//! height = 0.4
//!
//! [lighting]
//! azimuth = 1.2
//! ```
//!
//! Every key is optional. Two environment variables override the file:
//! `SWARD_GRASS_SEED` and `SWARD_GRASS_COUNT`.

use serde::{Deserialize, Serialize};
use std::path::Path;
use sward_core::{Result, SwardError};
use sward_terrain::DEFAULT_CLEARANCE;

use crate::blade::BladeParams;
use crate::field::FieldOptions;
use crate::material::{LightingParams, TexturePaths};

/// Upper bound accepted for `instance_count`
pub const MAX_INSTANCES: usize = 4_000_000;

const SEED_ENV: &str = "SWARD_GRASS_SEED";
const COUNT_ENV: &str = "SWARD_GRASS_COUNT";

/// `[field]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSection {
    pub instance_count: usize,
    pub size: f32,
    pub enabled: bool,
    pub seed: Option<u64>,
    pub clearance: f32,
}

impl Default for FieldSection {
    fn default() -> Self {
        Self {
            instance_count: 1000,
            size: 10000.0,
            enabled: false,
            seed: None,
            clearance: DEFAULT_CLEARANCE,
        }
    }
}

/// Top-level config file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    #[serde(default)]
    pub field: FieldSection,
    #[serde(default)]
    pub blade: BladeParams,
    #[serde(default)]
    pub lighting: LightingParams,
    #[serde(default)]
    pub textures: TexturePaths,
}

impl FieldConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: FieldConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file, then apply environment overrides
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SwardError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let mut config = Self::from_toml_str(&content)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Apply `SWARD_GRASS_*` overrides from `lookup`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(raw) = lookup(SEED_ENV) {
            let seed = raw.trim().parse::<u64>().map_err(|e| {
                SwardError::ConfigError(format!("{SEED_ENV}='{raw}' is not a seed: {e}"))
            })?;
            self.field.seed = Some(seed);
        }
        if let Some(raw) = lookup(COUNT_ENV) {
            let count = raw.trim().parse::<usize>().map_err(|e| {
                SwardError::ConfigError(format!("{COUNT_ENV}='{raw}' is not a count: {e}"))
            })?;
            self.field.instance_count = count;
        }
        self.validate()
    }

    /// Reject values the field cannot be built from
    pub fn validate(&self) -> Result<()> {
        let field = &self.field;
        if field.instance_count > MAX_INSTANCES {
            return Err(out_of_range(
                "field.instance_count",
                0.0,
                MAX_INSTANCES as f64,
                field.instance_count as f64,
            ));
        }
        if !field.size.is_finite() || field.size <= 0.0 {
            return Err(out_of_range("field.size", f64::MIN_POSITIVE, f64::MAX, field.size as f64));
        }
        if !field.clearance.is_finite() {
            return Err(SwardError::ConfigError(
                "field.clearance must be finite".into(),
            ));
        }
        if self.blade.joints == 0 {
            return Err(out_of_range("blade.joints", 1.0, u32::MAX as f64, 0.0));
        }
        if !self.blade.height.is_finite() || self.blade.height < 0.0 {
            return Err(out_of_range(
                "blade.height",
                0.0,
                f64::MAX,
                self.blade.height as f64,
            ));
        }
        Ok(())
    }

    pub fn into_options(self) -> FieldOptions {
        FieldOptions {
            instance_count: self.field.instance_count,
            field_size: self.field.size,
            enabled: self.field.enabled,
            seed: self.field.seed,
            clearance: self.field.clearance,
            blade: self.blade,
            lighting: self.lighting,
            textures: self.textures,
        }
    }
}

fn out_of_range(field: &str, min: f64, max: f64, value: f64) -> SwardError {
    SwardError::ValueOutOfRange {
        field: field.into(),
        min,
        max,
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = FieldConfig::from_toml_str("").unwrap();
        assert_eq!(config, FieldConfig::default());

        let options = config.into_options();
        assert_eq!(options.instance_count, 1000);
        assert_eq!(options.field_size, 10000.0);
        assert!(!options.enabled);
        assert_eq!(options.seed, None);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = FieldConfig::from_toml_str(
            r#"
[field]
instance_count = 3
size = 10.0
enabled = true
seed = 9

[blade]
height = 0.5

[lighting]
shininess = 64.0
"#,
        )
        .unwrap();

        assert_eq!(config.field.instance_count, 3);
        assert_eq!(config.field.seed, Some(9));
        assert_eq!(config.blade.height, 0.5);
        assert_eq!(config.blade.joints, 4);
        assert_eq!(config.lighting.shininess, 64.0);
        assert_eq!(config.lighting.ambient_strength, 0.7);
        assert_eq!(config.textures, TexturePaths::default());
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            FieldConfig::from_toml_str("[field]\nsize = -4.0"),
            Err(SwardError::ValueOutOfRange { .. })
        ));
        assert!(matches!(
            FieldConfig::from_toml_str("[blade]\njoints = 0"),
            Err(SwardError::ValueOutOfRange { .. })
        ));
        assert!(matches!(
            FieldConfig::from_toml_str("[field]\nsize = \"big\""),
            Err(SwardError::TomlParseError(_))
        ));
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut config = FieldConfig::from_toml_str("[field]\nseed = 1").unwrap();
        config
            .apply_overrides(|key| match key {
                "SWARD_GRASS_SEED" => Some("77".into()),
                "SWARD_GRASS_COUNT" => Some(" 12 ".into()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.field.seed, Some(77));
        assert_eq!(config.field.instance_count, 12);

        let err = config.apply_overrides(|key| (key == "SWARD_GRASS_SEED").then(|| "x".into()));
        assert!(matches!(err, Err(SwardError::ConfigError(_))));
    }

    #[test]
    fn serialized_config_parses_back() {
        let mut config = FieldConfig::default();
        config.field.seed = Some(5);
        config.blade.bend_x = 0.6;
        let text = config.to_toml_string().unwrap();
        assert_eq!(FieldConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = FieldConfig::load(Path::new("/nonexistent/sward/field.toml"));
        assert!(matches!(err, Err(SwardError::ConfigError(_))));
    }
}
