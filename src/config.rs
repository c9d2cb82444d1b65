//! Configuration for legacytxt.
//!
//! Settings are read from `~/.legacytxt/config.toml`; command line flags
//! override them. A missing or unreadable file means defaults.
//!
//! ```toml
//! # Encoding used when none is given on the command line
//! encoding = "CP437"
//!
//! # Controls passed through: eof, tab, bell, cr, lf, bs, del, esc, ff, vt
//! controls = ["eof", "tab"]
//!
//! # Rune swaps: null, bar, house, pipe, root, space
//! swap = ["null", "bar"]
//!
//! # Wrap lines at this many characters, 0 to disable
//! width = 0
//!
//! [table]
//! color = true
//! ```

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::pipeline::{ControlPolicy, Swap};

/// Main configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default encoding name or alias
    pub encoding: String,
    /// Control names to pass through
    pub controls: Vec<String>,
    /// Swap names to apply
    pub swap: Vec<String>,
    /// Maximum line width
    pub width: usize,
    /// Code table settings
    pub table: TableConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            encoding: "CP437".to_string(),
            controls: vec!["eof".to_string(), "tab".to_string()],
            swap: vec!["null".to_string(), "bar".to_string()],
            width: 0,
            table: TableConfig::default(),
        }
    }
}

/// Code table configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub color: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Self {
        if let Some(path) = Self::get_config_path() {
            if path.exists() {
                if let Ok(content) = fs::read_to_string(&path) {
                    match Self::parse(&content) {
                        Ok(config) => return config,
                        Err(e) => warn!("Ignoring {}: {}", path.display(), e),
                    }
                }
            }
        }
        Self::default()
    }

    /// Parse configuration text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Configuration as TOML text
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {}", e))
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<PathBuf, String> {
        let path = Self::get_config_path().ok_or("Could not determine config path")?;
        fs::write(&path, self.to_toml()?)
            .map_err(|e| format!("Failed to write config: {}", e))?;
        Ok(path)
    }

    /// Get config file path
    fn get_config_path() -> Option<PathBuf> {
        let dir = home_dir()?.join(".legacytxt");
        if !dir.exists() {
            let _ = fs::create_dir_all(&dir);
        }
        Some(dir.join("config.toml"))
    }

    /// The control policy, warning about names it does not know
    pub fn control_policy(&self) -> ControlPolicy {
        let (policy, unknown) = ControlPolicy::parse(&self.controls);
        for name in unknown {
            warn!("Unknown control name: {}", name);
        }
        policy
    }

    /// The swaps in application order, warning about names it does not know
    pub fn swaps(&self) -> Vec<Swap> {
        let (swaps, unknown) = Swap::parse(&self.swap);
        for name in unknown {
            warn!("Unknown swap name: {}", name);
        }
        swaps
    }
}

// Get home directory
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE")
        .or_else(|| std::env::var_os("HOME"))
        .map(PathBuf::from)
}
