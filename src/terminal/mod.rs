//! Terminal Session
//!
//! The [`Terminal`] ties the pieces together: it owns the input stream, the
//! stdout/stderr output streams, the command table, the settings and the
//! input lock, and drives the `Idle -> Executing -> Idle` cycle for every
//! submitted line.
//!
//! ## Submitting a line
//!
//! 1. Blank lines are dropped.
//! 2. The line is echoed to the renderer as a command and recorded in history.
//! 3. The line is tokenized; no tokens means nothing to run.
//! 4. Unknown commands get a red `Command not found` on stderr.
//! 5. Otherwise input is locked and the command is awaited. Whatever the
//!    result, input is unlocked, focus restored and both output streams
//!    flushed afterwards.
//!
//! Only one command runs at a time. While one is in flight, further
//! submits are ignored.

pub mod input;
pub mod state;
pub mod stream;
pub mod tokenizer;

// Re-exports for convenience
pub use input::{classify, InputAction, KeyCode, KeyEvent};
pub use state::{SessionState, SubmitOutcome};
pub use stream::{FlushCallback, Formatter, InputStream, OutputStream, Readable, Writable};
pub use tokenizer::{join, quote, tokenize};

use crate::commands::{Command, CommandIo, CommandTable};
use crate::config::{Config, Setting, SettingValue, Settings, SettingsStore};
use crate::error::{Error, Result};
use crate::history::CommandHistory;
use crate::ui::{DisplayKind, Renderer};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

/// Slot holding the renderer currently attached to a session
type RendererSlot = Arc<RwLock<Option<Arc<dyn Renderer>>>>;

/// SGR code used for the "command not found" message
const NOT_FOUND_COLOR: &str = "\x1b[31m";

/// A command shell session bound to one rendering surface
pub struct Terminal {
    /// Unique id, also the renderer's scope class
    id: String,
    commands: CommandTable,
    stdin: Arc<InputStream>,
    stdout: Arc<OutputStream>,
    stderr: Arc<OutputStream>,
    settings: RwLock<SettingsStore>,
    history: Mutex<CommandHistory>,
    state: Mutex<SessionState>,
    renderer: RendererSlot,
}

impl Terminal {
    /// Create a session with the built-in settings defaults
    pub fn new(commands: CommandTable) -> Self {
        Self::with_config(commands, &Config::default())
    }

    /// Create a session using the default settings layer and history limit of `config`
    pub fn with_config(commands: CommandTable, config: &Config) -> Self {
        let id = format!("tty-{}", uuid::Uuid::new_v4().simple());
        let renderer: RendererSlot = Arc::new(RwLock::new(None));

        let stdout = Arc::new(OutputStream::new());
        let stderr = Arc::new(OutputStream::new());
        stdout.set_on_flush(forward_to(&renderer));
        stderr.set_on_flush(forward_to(&renderer));

        info!("Created session {} with {} commands", id, commands.len());

        Self {
            id,
            commands,
            stdin: Arc::new(InputStream::new()),
            stdout,
            stderr,
            settings: RwLock::new(SettingsStore::with_defaults(config.settings_defaults())),
            history: Mutex::new(CommandHistory::with_limit(config.history_limit)),
            state: Mutex::new(SessionState::Idle),
            renderer,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    pub fn stdin(&self) -> &Arc<InputStream> {
        &self.stdin
    }

    pub fn stdout(&self) -> &Arc<OutputStream> {
        &self.stdout
    }

    pub fn stderr(&self) -> &Arc<OutputStream> {
        &self.stderr
    }

    /// Current execution state
    pub fn state(&self) -> SessionState {
        *lock(&self.state)
    }

    /// Echoed command lines, oldest first
    pub fn history(&self) -> Vec<String> {
        lock(&self.history).lines()
    }

    /// Attach the session to `renderer`.
    ///
    /// A previously attached renderer is detached first, so rendering twice
    /// never leaves two sets of listeners behind.
    pub fn render(&self, renderer: Arc<dyn Renderer>) {
        let previous = {
            let mut slot = self.renderer.write().unwrap_or_else(PoisonError::into_inner);
            slot.replace(Arc::clone(&renderer))
        };

        if let Some(previous) = previous {
            debug!("Session {} detaching previous renderer", self.id);
            previous.detach();
        }

        renderer.attach(&self.id);
        renderer.set_input_enabled(self.state().is_idle());
        self.dirty();
    }

    /// Detach from the current renderer, if any
    pub fn teardown(&self) {
        let previous = self
            .renderer
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(previous) = previous {
            info!("Session {} torn down", self.id);
            previous.detach();
        }
    }

    /// Resolve a setting: explicit value, else default, else `None`
    pub fn get(&self, setting: Setting) -> Option<SettingValue> {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(setting)
    }

    /// Set a setting, re-applying settings to the renderer if it changed
    pub fn set(&self, setting: Setting, value: SettingValue) -> Result<()> {
        let changed = self
            .settings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set(setting, value)?;

        if changed {
            debug!("Session {} setting '{}' changed", self.id, setting);
            self.dirty();
        }
        Ok(())
    }

    /// All settings, resolved through the default layer
    pub fn settings(&self) -> Settings {
        self.settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .resolved()
    }

    /// Handle a key press on the input line holding `line`
    pub async fn handle_key(&self, event: KeyEvent, line: &str) -> Option<SubmitOutcome> {
        match classify(event) {
            InputAction::Submit => Some(self.submit(line).await),
            InputAction::Suppress => {
                trace!("Completion requested but not implemented");
                None
            }
            InputAction::InsertNewline | InputAction::PassThrough => None,
        }
    }

    /// A click on the surface focuses the input unless text is selected
    pub fn handle_click(&self, has_selection: bool) {
        if has_selection {
            return;
        }
        if let Some(renderer) = self.current_renderer() {
            renderer.focus_input();
        }
    }

    /// Submit a raw input line
    pub async fn submit(&self, line: &str) -> SubmitOutcome {
        // Check and transition under one lock so racing submits cannot both get through
        if !lock(&self.state).begin() {
            debug!("Session {} busy, ignoring input", self.id);
            return SubmitOutcome::Ignored;
        }

        let (name, command, argv) = match self.resolve(line) {
            Ok(resolved) => resolved,
            Err(outcome) => {
                lock(&self.state).finish();
                return outcome;
            }
        };

        self.lock_input();
        debug!("Session {} running {} {}", self.id, name, join(&argv));

        let io = self.bind_io();
        let invocation = AssertUnwindSafe(async {
            // Sync and async commands both resolve on a later scheduling turn
            tokio::task::yield_now().await;
            command.run(&io, &argv).await
        })
        .catch_unwind()
        .await;

        let outcome = match invocation {
            Ok(Ok(0)) => SubmitOutcome::Completed(0),
            Ok(Ok(code)) => {
                self.write_stderr(&Error::NonZeroExit { code }.to_string());
                SubmitOutcome::Completed(code)
            }
            Ok(Err(err)) => {
                warn!("Command '{}' failed: {:#}", name, err);
                self.report_failure(Error::from_invocation(&err))
            }
            Err(payload) => {
                error!("Command '{}' panicked", name);
                self.report_failure(Error::InvocationFailed {
                    message: panic_message(payload.as_ref()),
                    stack: None,
                })
            }
        };

        self.finish_execution();
        outcome
    }

    /// Echo `line` and look up its command; `Err` carries the outcome when nothing runs
    fn resolve(
        &self,
        line: &str,
    ) -> std::result::Result<(String, Arc<dyn Command>, Vec<String>), SubmitOutcome> {
        let line = line.trim();
        if line.is_empty() {
            return Err(SubmitOutcome::Blank);
        }

        self.echo(line);

        let mut tokens = tokenize(line);
        if tokens.is_empty() {
            return Err(SubmitOutcome::Blank);
        }
        let name = tokens.remove(0);

        match self.commands.get(&name) {
            Some(command) => Ok((name, command, tokens)),
            None => {
                let message = Error::CommandNotFound {
                    command: name.clone(),
                };
                self.write_stderr(&format!("{}{}\n", NOT_FOUND_COLOR, message));
                Err(SubmitOutcome::NotFound(name))
            }
        }
    }

    fn echo(&self, line: &str) {
        lock(&self.history).push(line);
        if let Some(renderer) = self.current_renderer() {
            renderer.display(line, DisplayKind::Command);
        }
    }

    fn bind_io(&self) -> CommandIo {
        CommandIo {
            stdin: self.stdin.clone(),
            stdout: self.stdout.clone(),
            stderr: self.stderr.clone(),
        }
    }

    fn lock_input(&self) {
        if let Some(renderer) = self.current_renderer() {
            renderer.set_input_enabled(false);
        }
    }

    fn finish_execution(&self) {
        lock(&self.state).finish();
        if let Some(renderer) = self.current_renderer() {
            renderer.set_input_enabled(true);
            renderer.focus_input();
        }
        self.stdout.flush();
        self.stderr.flush();
    }

    /// Buffer the failure on stderr; the final flush emits it after any pending stdout
    fn report_failure(&self, failure: Error) -> SubmitOutcome {
        let message = failure.to_string();
        self.write_stderr(&message);
        if let Error::InvocationFailed {
            stack: Some(stack), ..
        } = &failure
        {
            self.write_stderr(&format!("\n{}", stack));
        }
        SubmitOutcome::Failed(message)
    }

    fn write_stderr(&self, text: &str) {
        if let Err(e) = self.stderr.write(text) {
            warn!("Session {} could not write to stderr: {}", self.id, e);
        }
    }

    /// Push the resolved settings to the renderer; no-op when not rendered
    fn dirty(&self) {
        if let Some(renderer) = self.current_renderer() {
            renderer.apply_settings(&self.settings());
        }
    }

    fn current_renderer(&self) -> Option<Arc<dyn Renderer>> {
        self.renderer
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl std::fmt::Debug for Terminal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Terminal")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("commands", &self.commands)
            .finish_non_exhaustive()
    }
}

/// Flush callback that displays each chunk on whichever renderer is attached
fn forward_to(slot: &RendererSlot) -> impl Fn(&str) + Send + Sync + 'static {
    let slot = Arc::clone(slot);
    move |text: &str| {
        let renderer = slot.read().unwrap_or_else(PoisonError::into_inner).clone();
        if let Some(renderer) = renderer {
            renderer.display(text, DisplayKind::Output);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "command panicked".to_string()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
