use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::math::{DEFAULT_STEPS_U, DEFAULT_STEPS_V, vertex_count};

pub const CONFIG_ENV_VAR: &str = "SURFACE3D_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "surface3d.toml";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub surface: SurfaceConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Parametric Surface".to_string(),
            width: 800,
            height: 800,
        }
    }
}

/// Tessellation resolution, fixed for the lifetime of the process.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SurfaceConfig {
    pub steps_u: usize,
    pub steps_v: usize,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            steps_u: DEFAULT_STEPS_U,
            steps_v: DEFAULT_STEPS_V,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderConfig {
    pub vsync: bool,
    pub show_overlay: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            vsync: true,
            show_overlay: true,
        }
    }
}

impl AppConfig {
    /// Loads from `$SURFACE3D_CONFIG`, then `./surface3d.toml`, else defaults.
    pub fn load() -> Result<Self, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Self::from_file(PathBuf::from(path));
        }

        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            return Self::from_file(local);
        }

        info!("no config file found, using defaults");
        let config = Self::default();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.surface.steps_u == 0 {
            return Err(ConfigError::Invalid {
                field: "surface.steps_u",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.surface.steps_v == 0 {
            return Err(ConfigError::Invalid {
                field: "surface.steps_v",
                reason: "must be at least 1".to_string(),
            });
        }
        let (steps_u, steps_v) = (self.surface.steps_u, self.surface.steps_v);
        match vertex_count(steps_u, steps_v) {
            Some(count) if count <= u32::MAX as usize => {}
            _ => {
                return Err(ConfigError::Invalid {
                    field: "surface",
                    reason: format!(
                        "resolution {steps_u}x{steps_v} needs more than {} vertices",
                        u32::MAX
                    ),
                });
            }
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid {
                field: "window",
                reason: format!(
                    "size {}x{} has a zero dimension",
                    self.window.width, self.window.height
                ),
            });
        }
        Ok(())
    }
}
