//! webtty - an embeddable line-oriented command shell front-end
//!
//! This library provides the session core of a small terminal-like surface:
//! the user types a line, it is echoed, tokenized and dispatched to a named
//! command, and whatever the command writes comes back as color-annotated
//! markup.
//!
//! ## Features
//!
//! - **Shell-like tokenizing:** whitespace splitting with quotes and backslash escapes
//! - **Buffered streams:** line-buffered stdout/stderr with an optional formatter
//! - **ANSI Colors:** SGR escape codes translated to `<span class="cN">` markup
//! - **Sync and async commands:** both awaited the same way, errors and panics contained
//! - **Settings:** explicit values layered over configurable defaults
//! - **Configuration:** TOML or JSON configuration files
//!
//! ## Module Organization
//!
//! - [`terminal`] - The [`Terminal`] session, tokenizer, streams and key handling
//! - [`commands`] - Command table and the [`Command`] trait
//! - [`ansi`] - Escape code translation and color class helpers
//! - [`ui`] - The [`Renderer`] boundary and a headless [`MarkupRenderer`]
//! - [`config`] - Configuration loading and the settings layer
//! - [`history`] - Echoed command history
//! - [`mod@error`] - Error types and Result aliases
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use webtty::{CommandTable, MarkupRenderer, Terminal};
//!
//! # async fn demo() {
//! let commands = CommandTable::new().with_fn("hello", |io, _argv| {
//!     io.println("\x1b[32mhello\x1b[0m")?;
//!     Ok(0)
//! });
//!
//! let terminal = Terminal::new(commands);
//! let renderer = Arc::new(MarkupRenderer::new());
//! terminal.render(renderer.clone());
//! terminal.submit("hello").await;
//! println!("{}", renderer.to_html());
//! # }
//! ```

#![allow(unexpected_cfgs)]

#[macro_use]
extern crate tracing;

pub mod ansi;
pub mod commands;
pub mod config;
pub mod error;
pub mod history;
pub mod terminal;
pub mod ui;

// Re-exports for core functionality
pub use commands::{Command, CommandIo, CommandTable, FnCommand};
pub use config::loader::ConfigLoader;
pub use config::{Config, Setting, SettingValue, Settings};
pub use error::{Error, Result};
pub use terminal::{SessionState, SubmitOutcome, Terminal};
pub use ui::{DisplayKind, MarkupRenderer, Renderer};

/// The current version of webtty from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The crate name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Load configuration from the default locations
///
/// Searches `$WEBTTY_CONFIG`, `./webtty.toml` and the user config directory.
/// Broken files are skipped with a warning; with nothing usable found the
/// built-in defaults are returned.
///
/// # Errors
///
/// Only fails if the resulting configuration does not validate.
pub fn init() -> Result<Config> {
    info!("Initializing {} v{}", NAME, VERSION);
    ConfigLoader::load()
}

/// Load configuration from an explicit file
///
/// Unlike [`init`] a missing or malformed file is an error.
pub fn init_with_config(config_path: &std::path::Path) -> Result<Config> {
    info!(
        "Initializing {} v{} with config: {}",
        NAME,
        VERSION,
        config_path.display()
    );
    ConfigLoader::load_from_path(config_path)
}

/// Get default configuration
///
/// # Examples
///
/// ```
/// use webtty::default_config;
///
/// let config = default_config();
/// assert_eq!(config.history_limit, 1000);
/// ```
pub fn default_config() -> Config {
    Config::default()
}

/// Human-readable explanation of a startup failure
pub fn handle_startup_error(error: &Error) -> String {
    match error {
        Error::ConfigLoadFailed { path, reason } => format!(
            "Configuration Error: Failed to load config from '{}': {}\n\nTry:\n• Check the file path\n• Remove --config to use the defaults",
            path.display(),
            reason
        ),
        Error::ConfigParseFailed { format, reason } => format!(
            "Configuration Error: Failed to parse {} config: {}\n\nTry:\n• Check configuration file syntax",
            format, reason
        ),
        Error::ConfigValidationFailed { field, reason } => format!(
            "Configuration Error: Validation failed for '{}': {}\n\nTry:\n• Check configuration value",
            field, reason
        ),
        _ => format!("Unexpected Error: {}", error),
    }
}
