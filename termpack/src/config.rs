//! Configuration module for the termpack CLI.
//!
//! Settings come from `termpack.toml`, searched for in the current
//! directory, then `~/.config/termpack/`, then the system configuration
//! directory. Command-line flags override file values.

use dirs::{config_dir, home_dir};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use sterm_lz::LzConfig;
use sterm_util::HashTableConfig;

use crate::error::{Result, TermpackError};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "termpack.toml";

/// Application configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Global verbose setting.
    #[serde(default)]
    pub verbose: bool,

    /// Compression settings.
    #[serde(default)]
    pub lz: LzSection,

    /// Symbol table settings.
    #[serde(default)]
    pub table: TableSection,
}

/// `[lz]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LzSection {
    /// Sliding window size in bytes.
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Longest back-reference.
    #[serde(default = "default_lookahead_max")]
    pub lookahead_max: usize,
}

/// `[table]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableSection {
    /// Initial symbol table size.
    #[serde(default = "default_initial_size")]
    pub initial_size: usize,

    /// Load percentage that triggers a resize.
    #[serde(default = "default_max_load_percent")]
    pub max_load_percent: u8,
}

fn default_window_size() -> usize {
    LzConfig::default().window_size
}

fn default_lookahead_max() -> usize {
    LzConfig::default().lookahead_max
}

fn default_initial_size() -> usize {
    HashTableConfig::default().initial_size
}

fn default_max_load_percent() -> u8 {
    HashTableConfig::default().max_load_percent
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose: false,
            lz: LzSection::default(),
            table: TableSection::default(),
        }
    }
}

impl Default for LzSection {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            lookahead_max: default_lookahead_max(),
        }
    }
}

impl Default for TableSection {
    fn default() -> Self {
        Self {
            initial_size: default_initial_size(),
            max_load_percent: default_max_load_percent(),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns the default configuration if no config file is found.
    pub fn load() -> Result<Self> {
        match Self::find_config_file() {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(TermpackError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| TermpackError::Config(format!("Failed to parse configuration: {}", e)))?;

        tracing::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Compression settings, with optional command-line overrides.
    pub fn lz_config(&self, window: Option<usize>, lookahead: Option<usize>) -> Result<LzConfig> {
        let config = LzConfig {
            window_size: window.unwrap_or(self.lz.window_size),
            lookahead_max: lookahead.unwrap_or(self.lz.lookahead_max),
        };
        config
            .validate()
            .map_err(|e| TermpackError::Validation(e.to_string()))?;
        Ok(config)
    }

    /// Symbol table settings.
    pub fn table_config(&self) -> Result<HashTableConfig> {
        let config = HashTableConfig {
            initial_size: self.table.initial_size,
            max_load_percent: self.table.max_load_percent,
        };
        config.validate()?;
        Ok(config)
    }

    fn check_current_dir_config() -> Option<PathBuf> {
        let path = PathBuf::from(CONFIG_FILE_NAME);
        path.exists().then_some(path)
    }

    fn check_home_config() -> Option<PathBuf> {
        home_dir()
            .map(|dir| dir.join(".config").join("termpack").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    fn check_system_config() -> Option<PathBuf> {
        config_dir()
            .map(|dir| dir.join("termpack").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    /// Find the configuration file in standard locations.
    fn find_config_file() -> Option<PathBuf> {
        Self::check_current_dir_config()
            .or_else(Self::check_home_config)
            .or_else(Self::check_system_config)
    }
}
