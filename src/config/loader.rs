//! Configuration File Loading
//!
//! Finds, loads, validates and saves configuration files. TOML is the
//! primary format; a `.json` extension selects JSON.

use super::{Config, LOG_LEVELS};
use crate::error::{Error, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV_VAR: &str = "WEBTTY_CONFIG";

/// File name looked up in the working directory
const LOCAL_CONFIG_FILE: &str = "webtty.toml";

/// Largest accepted history limit
const MAX_HISTORY_LIMIT: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    /// TOML format
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    /// Pick the format from a file extension, defaulting to TOML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }

    fn label(self) -> &'static str {
        match self {
            ConfigFormat::Toml => "TOML",
            ConfigFormat::Json => "JSON",
        }
    }
}

/// Configuration file loader
#[derive(Debug)]
pub struct ConfigLoader {
    /// Candidate files, in priority order
    search_paths: Vec<PathBuf>,
    /// File the last successful load came from
    current_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a loader with the default search paths
    pub fn new() -> Self {
        Self {
            search_paths: Self::default_search_paths(),
            current_path: None,
        }
    }

    /// Create a loader that only looks at `path`
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            search_paths: vec![path],
            current_path: None,
        }
    }

    /// Load configuration from the default locations, falling back to defaults
    pub fn load() -> Result<Config> {
        Self::new().load_or_default()
    }

    /// Load the first readable file on the search path, or the defaults if none exists
    pub fn load_or_default(&mut self) -> Result<Config> {
        for path in self.search_paths.clone() {
            if !path.exists() {
                continue;
            }

            match Self::load_from_path(&path) {
                Ok(config) => {
                    info!("Configuration loaded from {}", path.display());
                    self.current_path = Some(path);
                    return Ok(config);
                }
                Err(e) => {
                    // Keep looking; a broken file should not block startup
                    warn!("Failed to load config from {}: {}", path.display(), e);
                }
            }
        }

        debug!("No configuration file found, using defaults");
        let config = Config::default();
        validate_config(&config)?;
        Ok(config)
    }

    /// Load and validate a specific file
    pub fn load_from_path(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(Error::ConfigLoadFailed {
                path: path.to_path_buf(),
                reason: "Configuration file does not exist".to_string(),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| Error::ConfigLoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let format = ConfigFormat::from_path(path);
        let config = parse_config(&content, format)?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Save configuration to a specific path, creating parent directories
    pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let format = ConfigFormat::from_path(path);
        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(config).map_err(|e| {
                Error::ConfigSerializationFailed {
                    format: format.label().to_string(),
                    reason: e.to_string(),
                }
            })?,
            ConfigFormat::Toml => {
                toml::to_string_pretty(config).map_err(|e| Error::ConfigSerializationFailed {
                    format: format.label().to_string(),
                    reason: e.to_string(),
                })?
            }
        };

        fs::write(path, content).map_err(|e| Error::ConfigSaveFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Get the default search paths for configuration files
    fn default_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(explicit) = env::var(CONFIG_ENV_VAR) {
            if !explicit.trim().is_empty() {
                paths.push(PathBuf::from(explicit));
            }
        }

        if let Ok(cwd) = env::current_dir() {
            paths.push(cwd.join(LOCAL_CONFIG_FILE));
        }

        if dirs::config_dir().is_some() {
            paths.push(Self::default_config_path());
        }

        paths
    }

    /// Default location used when saving a fresh configuration
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("webtty")
            .join("config.toml")
    }

    /// The file the last successful load came from
    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    /// List all search paths
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Add a custom search path with the lowest priority
    pub fn add_search_path(&mut self, path: PathBuf) {
        self.search_paths.push(path);
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_config(content: &str, format: ConfigFormat) -> Result<Config> {
    match format {
        ConfigFormat::Toml => toml::from_str(content).map_err(|e| Error::ConfigParseFailed {
            format: format.label().to_string(),
            reason: e.to_string(),
        }),
        ConfigFormat::Json => serde_json::from_str(content).map_err(|e| Error::ConfigParseFailed {
            format: format.label().to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Validate configuration values
pub fn validate_config(config: &Config) -> Result<()> {
    if config.history_limit == 0 {
        return Err(Error::ConfigValidationFailed {
            field: "history_limit".to_string(),
            reason: "History limit must be greater than 0".to_string(),
        });
    }

    if config.history_limit > MAX_HISTORY_LIMIT {
        return Err(Error::ConfigValidationFailed {
            field: "history_limit".to_string(),
            reason: format!("History limit cannot exceed {}", MAX_HISTORY_LIMIT),
        });
    }

    if !LOG_LEVELS.contains(&config.log_level.as_str()) {
        return Err(Error::ConfigValidationFailed {
            field: "log_level".to_string(),
            reason: format!("Expected one of: {}", LOG_LEVELS.join(", ")),
        });
    }

    if let Some(size) = config.settings.font_size {
        if !(6..=96).contains(&size) {
            return Err(Error::ConfigValidationFailed {
                field: "settings.font_size".to_string(),
                reason: "Font size must be between 6 and 96".to_string(),
            });
        }
    }

    if config
        .settings
        .prompt
        .as_deref()
        .is_some_and(|prompt| prompt.contains('\n'))
    {
        return Err(Error::ConfigValidationFailed {
            field: "settings.prompt".to_string(),
            reason: "Prompt cannot contain a newline".to_string(),
        });
    }

    Ok(())
}
