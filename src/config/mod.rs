//! Configuration file support for mapmeasure.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/mapmeasure/config.toml`. Settings cover drag/click
//! disambiguation, coordinate matching tolerance and graphic styling.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

pub use enums::ColorSpec;
pub use types::{InteractionConfig, StyleConfig};

use anyhow::{Context, Result};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// # Example TOML
/// ```toml
/// [interaction]
/// drag_threshold_px = 5.0
/// drag_cooldown_ms = 200
/// coordinate_epsilon = 1e-9
///
/// [style]
/// point_color = "yellow"
/// polygon_color = [0, 200, 120]
/// line_width = 3.0
/// polygon_opacity = 0.3
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Pointer interaction tuning
    #[serde(default)]
    pub interaction: InteractionConfig,

    /// Measurement graphic appearance
    #[serde(default)]
    pub style: StyleConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is logged.
    ///
    /// Validated ranges:
    /// - `drag_threshold_px`: 1.0 - 50.0
    /// - `drag_cooldown_ms`: 0 - 2000
    /// - `coordinate_epsilon`: 1e-12 - 1e-3
    /// - `line_width`: 0.5 - 20.0
    /// - `point_size`: 1.0 - 40.0
    /// - `polygon_opacity`: 0.0 - 1.0
    fn validate_and_clamp(&mut self) {
        let interaction = &mut self.interaction;
        if !(1.0..=50.0).contains(&interaction.drag_threshold_px) {
            log::warn!(
                "Invalid drag_threshold_px {:.1}, clamping to 1.0-50.0 range",
                interaction.drag_threshold_px
            );
            interaction.drag_threshold_px = clamp_or(interaction.drag_threshold_px, 1.0, 50.0, 5.0);
        }

        if interaction.drag_cooldown_ms > 2000 {
            log::warn!(
                "Invalid drag_cooldown_ms {}, clamping to 0-2000 range",
                interaction.drag_cooldown_ms
            );
            interaction.drag_cooldown_ms = 2000;
        }

        if !(1e-12..=1e-3).contains(&interaction.coordinate_epsilon) {
            log::warn!(
                "Invalid coordinate_epsilon {:e}, clamping to 1e-12-1e-3 range",
                interaction.coordinate_epsilon
            );
            interaction.coordinate_epsilon = clamp_or(
                interaction.coordinate_epsilon,
                1e-12,
                1e-3,
                crate::coord::DEFAULT_EPSILON,
            );
        }

        let style = &mut self.style;
        if !(0.5..=20.0).contains(&style.line_width) {
            log::warn!(
                "Invalid line_width {:.1}, clamping to 0.5-20.0 range",
                style.line_width
            );
            style.line_width = clamp_or(style.line_width, 0.5, 20.0, 3.0);
        }

        if !(1.0..=40.0).contains(&style.point_size) {
            log::warn!(
                "Invalid point_size {:.1}, clamping to 1.0-40.0 range",
                style.point_size
            );
            style.point_size = clamp_or(style.point_size, 1.0, 40.0, 8.0);
        }

        if !(0.0..=1.0).contains(&style.polygon_opacity) {
            log::warn!(
                "Invalid polygon_opacity {:.2}, clamping to 0.0-1.0 range",
                style.polygon_opacity
            );
            style.polygon_opacity = clamp_or(style.polygon_opacity, 0.0, 1.0, 0.3);
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/mapmeasure/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("mapmeasure");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Loads configuration from an explicit path, or returns defaults if it doesn't exist.
    ///
    /// All loaded values are validated and clamped to acceptable ranges.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Serializes the config to TOML and writes it to `config_path`.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let config_str = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, config_str)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        info!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// JSON schema describing the config file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}

/// Clamps `value` into range, substituting `fallback` for NaN.
fn clamp_or(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}
