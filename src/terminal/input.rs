//! Keyboard Input Handling
//!
//! Decides what a key press on the input line means. Only three keys are
//! special: Enter submits, Shift+Enter inserts a newline, and Tab is
//! swallowed since completion is not implemented.

/// Keys the input line distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Enter,
    Tab,
    /// Any other key, carried through untouched
    Other,
}

/// A key press forwarded by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub shift: bool,
}

impl KeyEvent {
    pub fn new(code: KeyCode) -> Self {
        Self { code, shift: false }
    }

    pub fn with_shift(code: KeyCode) -> Self {
        Self { code, shift: true }
    }
}

/// What the session does with a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Submit the current line
    Submit,
    /// Let the surface insert a line break; nothing is submitted
    InsertNewline,
    /// Swallow the key (default handling prevented)
    Suppress,
    /// Leave the key to the surface
    PassThrough,
}

impl InputAction {
    /// Whether the renderer should cancel the surface's default handling
    pub fn prevents_default(self) -> bool {
        matches!(self, InputAction::Submit | InputAction::Suppress)
    }
}

/// Classify a key press
pub fn classify(event: KeyEvent) -> InputAction {
    match event.code {
        KeyCode::Enter if event.shift => InputAction::InsertNewline,
        KeyCode::Enter => InputAction::Submit,
        // Completion is not implemented; the key is still swallowed
        KeyCode::Tab => InputAction::Suppress,
        KeyCode::Other => InputAction::PassThrough,
    }
}
