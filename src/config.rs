use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("Invalid config format: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QedConfig {
    /// Gap capacity of a fresh buffer. Small values exercise growth early.
    pub initial_gap: usize,
    /// Free bytes guaranteed before each insert.
    pub min_gap_growth: usize,
    /// Chord string to command name, layered over the default keymap.
    pub bindings: BTreeMap<String, String>,
}

impl Default for QedConfig {
    fn default() -> Self {
        Self {
            initial_gap: 2,
            min_gap_growth: 1,
            bindings: BTreeMap::new(),
        }
    }
}

impl QedConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

pub fn get_config_dir() -> PathBuf {
    let config_home = dirs::config_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".config")
    });
    config_home.join("qed")
}

pub fn find_config_file() -> Option<PathBuf> {
    let mut paths = vec![get_config_dir().join("config.toml")];
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".qed").join("config.toml"));
    }
    paths.into_iter().find(|p| p.exists())
}
