//! Command table
//!
//! Maps command names to invocable units. A command receives its arguments
//! (the tokens after the command name) and a [`CommandIo`] with the
//! session's streams bound for that one invocation, and resolves to an exit
//! status where `0` means success.
//!
//! Synchronous commands are plain closures wrapped in [`FnCommand`]; the
//! session awaits both kinds the same way.

use crate::terminal::stream::{Readable, Writable};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Streams bound onto a command for one invocation
#[derive(Clone)]
pub struct CommandIo {
    pub stdin: Arc<dyn Readable>,
    pub stdout: Arc<dyn Writable>,
    pub stderr: Arc<dyn Writable>,
}

impl CommandIo {
    /// Write `text` followed by a newline to stdout
    pub fn println(&self, text: &str) -> crate::Result<usize> {
        self.stdout.write(&format!("{}\n", text))
    }

    /// Write `text` followed by a newline to stderr
    pub fn eprintln(&self, text: &str) -> crate::Result<usize> {
        self.stderr.write(&format!("{}\n", text))
    }
}

impl fmt::Debug for CommandIo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandIo").finish_non_exhaustive()
    }
}

/// An invocable entry in the command table
#[async_trait]
pub trait Command: Send + Sync {
    /// Run with the given arguments, resolving to an exit status
    ///
    /// # Errors
    ///
    /// Any error is reported on the session's stderr; it never reaches the
    /// caller of `submit`.
    async fn run(&self, io: &CommandIo, argv: &[String]) -> anyhow::Result<i32>;
}

/// Adapter turning a synchronous closure into a [`Command`]
pub struct FnCommand<F> {
    func: F,
}

impl<F> FnCommand<F>
where
    F: Fn(&CommandIo, &[String]) -> anyhow::Result<i32> + Send + Sync,
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

#[async_trait]
impl<F> Command for FnCommand<F>
where
    F: Fn(&CommandIo, &[String]) -> anyhow::Result<i32> + Send + Sync,
{
    async fn run(&self, io: &CommandIo, argv: &[String]) -> anyhow::Result<i32> {
        (self.func)(io, argv)
    }
}

/// Name to command mapping consulted by the session
#[derive(Clone, Default)]
pub struct CommandTable {
    commands: HashMap<String, Arc<dyn Command>>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `command` under `name`, replacing any previous entry
    pub fn register(&mut self, name: impl Into<String>, command: Arc<dyn Command>) -> &mut Self {
        let name = name.into();
        if self.commands.insert(name.clone(), command).is_some() {
            debug!("Replaced command '{}'", name);
        }
        self
    }

    /// Register a synchronous closure under `name`
    pub fn register_fn<F>(&mut self, name: impl Into<String>, func: F) -> &mut Self
    where
        F: Fn(&CommandIo, &[String]) -> anyhow::Result<i32> + Send + Sync + 'static,
    {
        self.register(name, Arc::new(FnCommand::new(func)))
    }

    /// Builder-style [`register`](Self::register)
    pub fn with(mut self, name: impl Into<String>, command: Arc<dyn Command>) -> Self {
        self.register(name, command);
        self
    }

    /// Builder-style [`register_fn`](Self::register_fn)
    pub fn with_fn<F>(mut self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&CommandIo, &[String]) -> anyhow::Result<i32> + Send + Sync + 'static,
    {
        self.register_fn(name, func);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands.remove(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl fmt::Debug for CommandTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandTable")
            .field("commands", &self.names())
            .finish()
    }
}
