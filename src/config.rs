// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Settings are read from `config.yaml` in the platform config directory.
//! Every field has a default, so a partial or missing file is fine.

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Tuning parameters of the interaction engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Factor applied to each incremental rotation step.
    pub rotation_damping: f64,
    /// Relative scale change per wheel unit.
    pub wheel_sensitivity: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    /// Scale increment of the zoom buttons.
    pub zoom_step: f64,
    /// Image-space distance moved by one arrow key press.
    pub nudge_step: f64,
    /// Color given to newly drawn rectangles.
    pub default_color: String,
    /// Handle hit radius, in screen pixels.
    pub handle_radius: f64,
    /// Distance of the rotate handle above the top edge, in screen pixels.
    pub rotate_handle_offset: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rotation_damping: 0.91,
            wheel_sensitivity: 0.003,
            min_scale: 0.1,
            max_scale: 10.0,
            zoom_step: 0.01,
            nudge_step: 1.0,
            default_color: "#ff0000".to_string(),
            handle_radius: 5.0,
            rotate_handle_offset: 30.0,
        }
    }
}

impl EngineConfig {
    /// Reject values the viewport math cannot work with.
    pub fn validate(&self) -> Result<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.min_scale) || !positive(self.max_scale) {
            bail!(
                "scale bounds must be finite and positive (min {}, max {})",
                self.min_scale,
                self.max_scale
            );
        }
        if self.min_scale > self.max_scale {
            bail!(
                "min_scale {} exceeds max_scale {}",
                self.min_scale,
                self.max_scale
            );
        }
        if !positive(self.wheel_sensitivity) {
            bail!("wheel_sensitivity must be finite and positive");
        }
        if !positive(self.zoom_step) {
            bail!("zoom_step must be finite and positive");
        }
        if !self.rotation_damping.is_finite() || !self.nudge_step.is_finite() {
            bail!("rotation_damping and nudge_step must be finite");
        }
        Ok(())
    }
}

/// Template store settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Simulated round-trip latency of every gateway call.
    pub latency_ms: u64,
    /// Storage directory; the platform data directory when unset.
    pub directory: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            latency_ms: 100,
            directory: None,
        }
    }
}

impl StoreConfig {
    /// Resolve the directory holding the key-value files.
    pub fn resolve_directory(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.directory {
            return Ok(dir.clone());
        }
        let dirs = project_dirs().context("cannot resolve data directory")?;
        Ok(dirs.data_dir().to_path_buf())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub store: StoreConfig,
}

impl AppConfig {
    /// Load from the default location, falling back to defaults.
    pub fn load() -> Self {
        let Some(path) = Self::file_path() else {
            log::warn!("Cannot resolve config directory, using defaults");
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config {}: {:#}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&yaml)
            .with_context(|| format!("parsing {}", path.display()))?;
        config
            .engine
            .validate()
            .with_context(|| format!("invalid engine settings in {}", path.display()))?;
        Ok(config)
    }

    fn file_path() -> Option<PathBuf> {
        Some(project_dirs()?.config_dir().join("config.yaml"))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "roimark", "roimark")
}
