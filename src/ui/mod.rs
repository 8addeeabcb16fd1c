//! Rendering boundary
//!
//! The session never touches a document tree. Everything visible goes
//! through the [`Renderer`] trait: echoed commands, flushed output, the
//! input lock and focus, and settings changes. [`MarkupRenderer`] is a
//! headless implementation that keeps the translated markup in memory.

pub mod markup;

pub use markup::{DisplayEntry, MarkupRenderer};

use crate::config::Settings;
use serde::{Deserialize, Serialize};

/// What a displayed chunk represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayKind {
    /// Echo of a submitted command line
    Command,
    /// A flushed chunk of command or session output
    Output,
}

/// Surface a session renders onto
///
/// Implementations are shared between the session and the flush callbacks
/// of its streams, so every method takes `&self`.
pub trait Renderer: Send + Sync {
    /// Take over the surface for the session `session_id`, replacing prior content
    fn attach(&self, session_id: &str);

    /// Release the surface and drop any listeners installed by `attach`
    fn detach(&self);

    /// Show a chunk of text; color escapes are still embedded
    fn display(&self, text: &str, kind: DisplayKind);

    /// Allow or forbid editing of the input line
    fn set_input_enabled(&self, enabled: bool);

    /// Move focus to the input line
    fn focus_input(&self);

    /// Re-apply settings after a change
    fn apply_settings(&self, settings: &Settings);
}
