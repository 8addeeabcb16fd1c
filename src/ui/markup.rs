//! Headless markup renderer
//!
//! Records what a session displays as translated span markup. Useful for
//! embedding (serialize the entries and hand them to a page) and for tests.

use super::{DisplayKind, Renderer};
use crate::ansi;
use crate::config::Settings;
use crate::error::Result;
use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One displayed chunk, already translated to markup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayEntry {
    pub kind: DisplayKind,
    pub markup: String,
}

#[derive(Debug)]
struct MarkupState {
    /// Scope class of the attached session
    scope: Option<String>,
    entries: Vec<DisplayEntry>,
    input_enabled: bool,
    focus_count: usize,
    attach_count: usize,
    /// Color class rules, installed on first attach
    stylesheet: Option<String>,
    /// Last settings pushed through `apply_settings`
    settings: Option<Settings>,
}

impl Default for MarkupState {
    fn default() -> Self {
        Self {
            scope: None,
            entries: Vec::new(),
            input_enabled: true,
            focus_count: 0,
            attach_count: 0,
            stylesheet: None,
            settings: None,
        }
    }
}

/// In-memory renderer producing span markup
#[derive(Debug, Default)]
pub struct MarkupRenderer {
    state: Mutex<MarkupState>,
}

impl MarkupRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MarkupState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Everything displayed since the last attach
    pub fn entries(&self) -> Vec<DisplayEntry> {
        self.state().entries.clone()
    }

    /// Markup of output entries only
    pub fn output(&self) -> Vec<String> {
        self.state()
            .entries
            .iter()
            .filter(|entry| entry.kind == DisplayKind::Output)
            .map(|entry| entry.markup.clone())
            .collect()
    }

    pub fn is_attached(&self) -> bool {
        self.state().scope.is_some()
    }

    pub fn input_enabled(&self) -> bool {
        self.state().input_enabled
    }

    /// How many times focus was moved to the input
    pub fn focus_count(&self) -> usize {
        self.state().focus_count
    }

    pub fn attach_count(&self) -> usize {
        self.state().attach_count
    }

    pub fn stylesheet(&self) -> Option<String> {
        self.state().stylesheet.clone()
    }

    pub fn applied_settings(&self) -> Option<Settings> {
        self.state().settings.clone()
    }

    /// Render the whole surface as one markup fragment
    pub fn to_html(&self) -> String {
        let state = self.state();
        let scope = state.scope.as_deref().unwrap_or_default();
        let body: String = state
            .entries
            .iter()
            .map(|entry| match entry.kind {
                DisplayKind::Command => format!(r#"<span class="cmd">{}</span>"#, entry.markup),
                DisplayKind::Output => format!("<span>{}</span>", entry.markup),
            })
            .collect();
        format!(r#"<div class="tty {}">{}</div>"#, scope, body)
    }

    /// Serialize the displayed entries as JSON for a host page
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.state().entries)?)
    }
}

impl Renderer for MarkupRenderer {
    fn attach(&self, session_id: &str) {
        let mut state = self.state();
        state.scope = Some(session_id.to_string());
        state.entries.clear();
        state.input_enabled = true;
        state.attach_count += 1;
        if state.stylesheet.is_none() {
            state.stylesheet = Some(ansi::stylesheet("tty"));
        }
    }

    fn detach(&self) {
        let mut state = self.state();
        state.scope = None;
        state.entries.clear();
    }

    fn display(&self, text: &str, kind: DisplayKind) {
        if text.is_empty() {
            return;
        }
        let markup = ansi::translate(text);
        self.state().entries.push(DisplayEntry { kind, markup });
    }

    fn set_input_enabled(&self, enabled: bool) {
        self.state().input_enabled = enabled;
    }

    fn focus_input(&self) {
        self.state().focus_count += 1;
    }

    fn apply_settings(&self, settings: &Settings) {
        self.state().settings = Some(settings.clone());
    }
}
