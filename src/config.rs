//! Application configuration, read from an optional TOML file.
//!
//! Every section and key is optional; anything missing takes its default.
//!
//! ```toml
//! [layout]
//! padding = 24.0
//!
//! [rotation_bar]
//! max_degrees = 45.0
//!
//! [resize]
//! min_crop_size = 8.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::resize::{MIN_CROP_SIZE, Resizer};
use crate::rotation::RotationBarConfig;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropperConfig {
    pub layout: LayoutConfig,
    pub rotation_bar: RotationBarConfig,
    pub resize: ResizeConfig,
}

/// Sizes used when laying out and drawing the editor canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Empty margin around the image.
    pub padding: f32,
    pub handle_radius: f32,
    /// Pointer distance within which a handle or edge is grabbed.
    pub hit_tolerance: f32,
    /// Alpha of the dimming drawn outside the crop rectangle.
    pub overlay_alpha: u8,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding: 20.0,
            handle_radius: 6.0,
            hit_tolerance: 10.0,
            overlay_alpha: 150,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeConfig {
    /// Smallest crop width or height a handle drag can produce, in screen points.
    pub min_crop_size: f64,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            min_crop_size: MIN_CROP_SIZE,
        }
    }
}

impl ResizeConfig {
    pub fn resizer(&self) -> Resizer {
        Resizer::new(self.min_crop_size)
    }
}

impl CropperConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate().map_err(|reason| ConfigError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(cfg)
    }

    /// Rejects values that parse but cannot drive the editor.
    pub fn validate(&self) -> Result<(), String> {
        self.rotation_bar.validate()?;
        let min = self.resize.min_crop_size;
        if !(min.is_finite() && min >= 0.0) {
            return Err(format!("resize.min_crop_size must not be negative, got {min}"));
        }
        Ok(())
    }

    /// Loads `path` if given, falling back to defaults when it is `None`.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                let cfg = Self::load(p)?;
                log::info!("Loaded config from {}", p.display());
                Ok(cfg)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
