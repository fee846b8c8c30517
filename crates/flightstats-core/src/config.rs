// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CRUISE_SPEED_KMH: f64 = 850.0;
pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_MILESTONES_KM: [f64; 5] = [1_000.0, 10_000.0, 50_000.0, 100_000.0, 1_000_000.0];

/// Tunables for the statistics pass. The defaults reproduce the numbers the
/// dashboard has always shown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Assumed average ground speed when converting distance into time.
    pub cruise_speed_kmh: f64,
    /// Length of the top airports / top routes lists.
    pub top_n: usize,
    /// Cumulative distance thresholds reported as milestones.
    pub milestones_km: Vec<f64>,
    /// IATA code of the home airport, for the compass extremes.
    pub hometown: Option<String>,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            cruise_speed_kmh: DEFAULT_CRUISE_SPEED_KMH,
            top_n: DEFAULT_TOP_N,
            milestones_km: DEFAULT_MILESTONES_KM.to_vec(),
            hometown: None,
        }
    }
}

impl StatsConfig {
    /// Loads a JSON config. A missing file is not an error and yields defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).context("Failed to create config directory")?;
            }
        }
        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).context("Failed to write config")
    }
}

pub fn get_config_root() -> PathBuf {
    directories::ProjectDirs::from("org", "flightstats", "FlightStats")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".flightstats"))
}

pub fn default_config_path() -> PathBuf {
    get_config_root().join("config.json")
}
