//! Configuration file handling.
//!
//! Settings come from an optional `airport-dashboard.toml`; every field has a
//! default so a missing file or a partial file is fine.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::loader::NEW_ENGLAND_REGIONS;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "airport-dashboard.toml";

/// Environment variable overriding the config file path.
pub const CONFIG_ENV: &str = "AIRPORT_DASHBOARD_CONFIG";

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub view: ViewConfig,
}

/// Where to read airports from and which regions to keep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Dataset opened on start-up.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// `iso_region` codes kept by the loader.
    #[serde(default = "default_allowed_regions")]
    pub allowed_regions: Vec<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: None,
            allowed_regions: default_allowed_regions(),
        }
    }
}

fn default_allowed_regions() -> Vec<String> {
    NEW_ENGLAND_REGIONS.iter().map(|r| r.to_string()).collect()
}

/// Chart and map presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Length of the highest-elevation ranking.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    #[serde(default = "default_map_zoom")]
    pub map_zoom: f32,

    /// Map point radius in metres.
    #[serde(default = "default_point_radius")]
    pub point_radius: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            map_zoom: default_map_zoom(),
            point_radius: default_point_radius(),
        }
    }
}

fn default_top_n() -> usize {
    10
}

fn default_map_zoom() -> f32 {
    6.0
}

fn default_point_radius() -> f64 {
    800.0
}

impl Config {
    /// Parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Load `path` if it exists; fall back to defaults (with a warning) when
    /// it cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config: {e:#}");
                Self::default()
            }
        }
    }

    /// Config file path: `$AIRPORT_DASHBOARD_CONFIG` or [`CONFIG_FILE`].
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
    }
}
