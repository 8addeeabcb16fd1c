//! Configuration management for webtty
//!
//! Holds the file-backed configuration: the default settings layer every new
//! session starts from, the display history limit, and the log level used
//! by the binary.

pub mod loader;
pub mod settings;

pub use settings::{Setting, SettingValue, Settings, SettingsStore};

use serde::{Deserialize, Serialize};

/// Log levels accepted in `log_level`
pub const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Main configuration structure for webtty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default settings layer for new sessions
    pub settings: Settings,

    /// Maximum number of echoed commands kept per session
    pub history_limit: usize,

    /// Log level used when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settings: Settings::defaults(),
            history_limit: 1000,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Default settings with the built-in table filling any gaps
    pub fn settings_defaults(&self) -> Settings {
        Settings::defaults().merged_with(&self.settings)
    }
}
