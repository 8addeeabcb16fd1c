//! Session execution state
//!
//! A session is either waiting for input or running exactly one command.

use std::fmt;

/// Execution state of a terminal session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Input is editable and the next line may be submitted
    #[default]
    Idle,
    /// A command is in flight and input is locked
    Executing,
}

impl SessionState {
    pub fn is_idle(self) -> bool {
        matches!(self, SessionState::Idle)
    }

    pub fn is_executing(self) -> bool {
        matches!(self, SessionState::Executing)
    }

    /// Move `Idle -> Executing`; returns `false` if a command is already running
    pub fn begin(&mut self) -> bool {
        match self {
            SessionState::Idle => {
                *self = SessionState::Executing;
                true
            }
            SessionState::Executing => false,
        }
    }

    /// Move back to `Idle`
    pub fn finish(&mut self) {
        *self = SessionState::Idle;
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => f.write_str("idle"),
            SessionState::Executing => f.write_str("executing"),
        }
    }
}

/// What happened to a submitted line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A command was already running; the line was not accepted
    Ignored,
    /// Blank line, or a line that tokenized to nothing
    Blank,
    /// No command registered under the first token
    NotFound(String),
    /// The command resolved with this exit status
    Completed(i32),
    /// The command returned an error or panicked; carries the message
    Failed(String),
}

impl SubmitOutcome {
    /// Whether a command actually ran
    pub fn ran(&self) -> bool {
        matches!(self, SubmitOutcome::Completed(_) | SubmitOutcome::Failed(_))
    }
}
