//! Chart configuration: TOML file with defaults for every field.
//!
//! ```toml
//! default_granularity = "week"
//!
//! [window]
//! max_zoom = 6.0
//! drag_sensitivity_px = 8.0
//!
//! [palette]
//! colors = ["#1f77b4", "#ff7f0e"]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{Granularity, DEFAULT_PALETTE};
use crate::window::{ZoomLimits, DEFAULT_DRAG_SENSITIVITY_PX};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub default_granularity: Granularity,
    pub window: WindowConfig,
    pub palette: PaletteConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_step: f64,
    pub drag_sensitivity_px: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub colors: Vec<String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            default_granularity: Granularity::Day,
            window: WindowConfig::default(),
            palette: PaletteConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        let limits = ZoomLimits::default();
        Self {
            min_zoom: limits.min,
            max_zoom: limits.max,
            zoom_step: limits.step,
            drag_sensitivity_px: DEFAULT_DRAG_SENSITIVITY_PX,
        }
    }
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            colors: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl ChartConfig {
    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Load `path` if it exists, otherwise defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.window;
        if !(w.min_zoom.is_finite() && w.min_zoom >= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "window.min_zoom must be >= 1, got {}",
                w.min_zoom
            )));
        }
        if !(w.max_zoom.is_finite() && w.max_zoom >= w.min_zoom) {
            return Err(ConfigError::Invalid(format!(
                "window.max_zoom ({}) must be >= min_zoom ({})",
                w.max_zoom, w.min_zoom
            )));
        }
        if !(w.zoom_step.is_finite() && w.zoom_step > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "window.zoom_step must be > 0, got {}",
                w.zoom_step
            )));
        }
        if !(w.drag_sensitivity_px.is_finite() && w.drag_sensitivity_px > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "window.drag_sensitivity_px must be > 0, got {}",
                w.drag_sensitivity_px
            )));
        }
        if self.palette.colors.is_empty() {
            return Err(ConfigError::Invalid("palette.colors must not be empty".into()));
        }
        Ok(())
    }

    pub fn zoom_limits(&self) -> ZoomLimits {
        ZoomLimits {
            min: self.window.min_zoom,
            max: self.window.max_zoom,
            step: self.window.zoom_step,
        }
    }

    pub fn drag_sensitivity_px(&self) -> f64 {
        self.window.drag_sensitivity_px
    }

    pub fn palette(&self) -> &[String] {
        &self.palette.colors
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
