//! Optional TOML configuration.
//!
//! ```toml
//! roms = ["Akumajou Densetsu (J).nes", "Castlevania III (U).nes"]
//! format = "text"
//!
//! [[search]]
//! us = "$32"
//! jp = "$34"
//! values = "$0D $0E"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use aku_core::SearchParameters;
use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::cli::OutputFormat;
use crate::commands::target::parameters_from_parts;

/// Config file read when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "aku.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub roms: Vec<PathBuf>,
    pub format: Option<OutputFormat>,
    pub search: Vec<SearchEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchEntry {
    pub us: Option<String>,
    pub jp: Option<String>,
    pub values: Option<String>,
}

impl SearchEntry {
    pub fn to_parameters(&self) -> Result<SearchParameters> {
        parameters_from_parts(
            self.us.as_deref(),
            self.jp.as_deref(),
            self.values.as_deref(),
        )
    }
}

impl Config {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load an explicitly named config, or the default one if it exists.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Self::load(path)
                } else {
                    debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn search_parameters(&self) -> Result<Vec<SearchParameters>> {
        self.search
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                entry
                    .to_parameters()
                    .with_context(|| format!("Invalid [[search]] entry {}", i + 1))
            })
            .collect()
    }
}
