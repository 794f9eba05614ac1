//! Run configuration: physical parameters for the coupled models and loop
//! settings for the driver.
//!
//! Configuration is stored as JSON. The wave parameters are keyed by their
//! standard variable names, so a parameter dictionary written for the wave
//! model loads without renaming:
//!
//! ```text
//! {
//!   "parameters": {
//!     "grid_spacing": 100.0,
//!     "shelf_slope": 0.001,
//!     "shoreface_depth": 10.0,
//!     "shoreface_slope": 0.01,
//!     "sea_surface_water_wave__height": 2.0,
//!     "sea_surface_water_wave__period": 7.0,
//!     "sea_shoreline_wave~incoming~deepwater__ashton_et_al_approach_angle_highness_parameter": 0.2,
//!     "sea_shoreline_wave~incoming~deepwater__ashton_et_al_approach_angle_asymmetry_parameter": 0.5
//!   },
//!   "run": { "iterations": 3650, "render_interval": 365 }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("Parse error: {0}")]
    Parse(String),

    /// A value is outside its valid range
    #[error("Invalid value for '{key}': {value} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Physical parameters handed to the shoreline and wave models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    /// Cell size of the shoreline model grid (m)
    #[serde(default = "default_grid_spacing")]
    pub grid_spacing: f64,

    /// Slope of the continental shelf
    #[serde(default = "default_shelf_slope")]
    pub shelf_slope: f64,

    /// Depth of the shoreface toe (m)
    #[serde(default = "default_shoreface_depth")]
    pub shoreface_depth: f64,

    /// Average slope of the shoreface
    #[serde(default = "default_shoreface_slope")]
    pub shoreface_slope: f64,

    /// Deep-water significant wave height (m)
    #[serde(
        rename = "sea_surface_water_wave__height",
        default = "default_wave_height"
    )]
    pub wave_height: f64,

    /// Wave period (s)
    #[serde(
        rename = "sea_surface_water_wave__period",
        default = "default_wave_period"
    )]
    pub wave_period: f64,

    /// Fraction of waves approaching at angles above 45° (U)
    #[serde(
        rename = "sea_shoreline_wave~incoming~deepwater__ashton_et_al_approach_angle_highness_parameter",
        default = "default_highness"
    )]
    pub wave_angle_highness: f64,

    /// Fraction of waves approaching from the left, looking offshore (A)
    #[serde(
        rename = "sea_shoreline_wave~incoming~deepwater__ashton_et_al_approach_angle_asymmetry_parameter",
        default = "default_asymmetry"
    )]
    pub wave_angle_asymmetry: f64,
}

fn default_grid_spacing() -> f64 {
    100.0
}
fn default_shelf_slope() -> f64 {
    0.001
}
fn default_shoreface_depth() -> f64 {
    10.0
}
fn default_shoreface_slope() -> f64 {
    0.01
}
fn default_wave_height() -> f64 {
    2.0
}
fn default_wave_period() -> f64 {
    7.0
}
fn default_highness() -> f64 {
    0.2
}
fn default_asymmetry() -> f64 {
    0.5
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            grid_spacing: default_grid_spacing(),
            shelf_slope: default_shelf_slope(),
            shoreface_depth: default_shoreface_depth(),
            shoreface_slope: default_shoreface_slope(),
            wave_height: default_wave_height(),
            wave_period: default_wave_period(),
            wave_angle_highness: default_highness(),
            wave_angle_asymmetry: default_asymmetry(),
        }
    }
}

impl ModelParameters {
    /// Check that every parameter lies in its physical range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("grid_spacing", self.grid_spacing)?;
        positive("shoreface_depth", self.shoreface_depth)?;
        positive("shoreface_slope", self.shoreface_slope)?;
        positive("sea_surface_water_wave__height", self.wave_height)?;
        positive("sea_surface_water_wave__period", self.wave_period)?;

        if !self.shelf_slope.is_finite() || self.shelf_slope < 0.0 {
            return Err(ConfigError::Invalid {
                key: "shelf_slope",
                value: self.shelf_slope.to_string(),
                reason: "must be finite and non-negative",
            });
        }

        fraction("wave_angle_highness", self.wave_angle_highness)?;
        fraction("wave_angle_asymmetry", self.wave_angle_asymmetry)?;

        Ok(())
    }
}

fn positive(key: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: "must be finite and positive",
        })
    }
}

fn fraction(key: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: "must lie in [0, 1]",
        })
    }
}

/// Settings for the coupled time-stepping loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of coupled iterations (one shoreline-model time step each)
    #[serde(default = "default_iterations")]
    pub iterations: usize,

    /// Render the depth field every this many iterations
    #[serde(default = "default_render_interval")]
    pub render_interval: usize,

    /// Render frames; when false only progress is logged
    #[serde(default = "default_animate")]
    pub animate: bool,

    /// Directory for rendered frames
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Elevation at or above which a cell counts as land
    #[serde(default = "default_land_threshold")]
    pub land_threshold: f64,
}

fn default_iterations() -> usize {
    3650
}
fn default_render_interval() -> usize {
    1000
}
fn default_animate() -> bool {
    true
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}
fn default_land_threshold() -> f64 {
    1.0
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            render_interval: default_render_interval(),
            animate: default_animate(),
            output_dir: default_output_dir(),
            land_threshold: default_land_threshold(),
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.render_interval == 0 {
            return Err(ConfigError::Invalid {
                key: "render_interval",
                value: "0".to_string(),
                reason: "must be at least 1",
            });
        }
        if !self.land_threshold.is_finite() {
            return Err(ConfigError::Invalid {
                key: "land_threshold",
                value: self.land_threshold.to_string(),
                reason: "must be finite",
            });
        }
        Ok(())
    }
}

/// Complete configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoastConfig {
    #[serde(default)]
    pub parameters: ModelParameters,

    #[serde(default)]
    pub run: RunConfig,
}

impl CoastConfig {
    /// Load and validate a JSON configuration file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&content)?;
        Ok(config)
    }

    /// Parse and validate a JSON configuration string.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: CoastConfig =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.parameters.validate()?;
        self.run.validate()
    }

    /// Save as pretty-printed JSON.
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
