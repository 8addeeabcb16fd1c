//! Error types and Result aliases for webtty

use std::path::PathBuf;

/// Result type alias for webtty operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for webtty
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // === Command errors ===
    /// First token has no matching command table entry
    #[error("Command not found: {command}")]
    CommandNotFound { command: String },

    /// Command resolved with a non-zero exit status
    #[error("Exit {code}")]
    NonZeroExit { code: i32 },

    /// Command returned an error or panicked
    #[error("{message}")]
    InvocationFailed {
        message: String,
        /// Cause chain, one entry per underlying error
        stack: Option<String>,
    },

    /// A stream formatter rejected the text being written
    #[error("Stream format failed: {reason}")]
    FormatFailed { reason: String },

    // === Settings errors ===
    /// Value kind does not match the setting it is assigned to
    #[error("Setting '{setting}' expects a {expected} value")]
    SettingTypeMismatch {
        setting: &'static str,
        expected: &'static str,
    },

    /// Setting name not recognised
    #[error("Unknown setting: '{name}'")]
    UnknownSetting { name: String },

    // === Configuration errors ===
    /// Failed to load configuration file
    #[error("Failed to load config from '{}': {reason}", path.display())]
    ConfigLoadFailed { path: PathBuf, reason: String },

    /// Failed to save configuration file
    #[error("Failed to save config to '{}': {reason}", path.display())]
    ConfigSaveFailed { path: PathBuf, reason: String },

    /// Configuration validation failed
    #[error("Configuration validation failed for '{field}': {reason}")]
    ConfigValidationFailed { field: String, reason: String },

    /// Failed to serialize configuration
    #[error("Failed to serialize config as {format}: {reason}")]
    ConfigSerializationFailed { format: String, reason: String },

    /// Failed to parse configuration
    #[error("Failed to parse {format} config: {reason}")]
    ConfigParseFailed { format: String, reason: String },

    // === I/O and serialization errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Generic errors (use sparingly)
    #[error("Error: {0}")]
    Other(String),
}

impl Error {
    /// Build an invocation failure from an `anyhow` error, keeping its cause chain
    pub fn from_invocation(err: &anyhow::Error) -> Self {
        let causes: Vec<String> = err.chain().skip(1).map(|cause| cause.to_string()).collect();
        let stack = if causes.is_empty() {
            None
        } else {
            Some(
                causes
                    .iter()
                    .map(|cause| format!("    Caused by: {}", cause))
                    .collect::<Vec<_>>()
                    .join("\n"),
            )
        };

        Error::InvocationFailed {
            message: err.to_string(),
            stack,
        }
    }

    /// Whether this error was produced by a command invocation rather than the session
    pub fn is_command_level(&self) -> bool {
        matches!(
            self,
            Error::CommandNotFound { .. }
                | Error::NonZeroExit { .. }
                | Error::InvocationFailed { .. }
                | Error::FormatFailed { .. }
        )
    }
}

impl From<String> for Error {
    fn from(err: String) -> Self {
        Error::Other(err)
    }
}

impl From<&str> for Error {
    fn from(err: &str) -> Self {
        Error::Other(err.to_string())
    }
}
