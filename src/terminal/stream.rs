//! Command I/O Streams
//!
//! Line-buffered output streams and the (stub) input stream bound onto a
//! command for the duration of one invocation.
//!
//! An [`OutputStream`] collects written fragments and hands the joined text
//! to its on-flush callback whenever a write ends with a newline, or when
//! [`Writable::flush`] is called explicitly.

use crate::error::Result;
use async_trait::async_trait;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Text transform applied to every write before it is buffered
pub type Formatter = Arc<dyn Fn(&str) -> Result<String> + Send + Sync>;

/// Receiver of each flushed chunk
pub type FlushCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Source of interactive input for a command
#[async_trait]
pub trait Readable: Send + Sync {
    /// Read the next chunk of input
    async fn read(&self) -> String;
}

/// Sink for command output
pub trait Writable: Send + Sync {
    /// Buffer `text`, returning the number of characters accepted
    ///
    /// # Errors
    ///
    /// Only fails when the stream's formatter fails; the error is returned
    /// to the caller untouched.
    fn write(&self, text: &str) -> Result<usize>;

    /// Emit everything buffered since the last flush
    fn flush(&self);
}

/// Input stream handed to commands.
///
/// Interactive input is not wired up yet: every read resolves immediately
/// with an empty string.
#[derive(Debug, Default)]
pub struct InputStream;

impl InputStream {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Readable for InputStream {
    async fn read(&self) -> String {
        String::new()
    }
}

/// Line-buffered output stream
#[derive(Default)]
pub struct OutputStream {
    /// Fragments written since the last flush
    buffer: Mutex<Vec<String>>,
    /// Optional transform applied before buffering
    format: Mutex<Option<Formatter>>,
    /// Called once per non-empty flush
    on_flush: Mutex<Option<FlushCallback>>,
}

impl fmt::Debug for OutputStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputStream")
            .field("pending", &lock(&self.buffer).len())
            .field("has_format", &lock(&self.format).is_some())
            .field("has_on_flush", &lock(&self.on_flush).is_some())
            .finish()
    }
}

impl OutputStream {
    /// Create a stream with no formatter and no flush callback
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stream that reports flushes to `callback`
    pub fn with_on_flush<F>(callback: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let stream = Self::new();
        stream.set_on_flush(callback);
        stream
    }

    /// Install the flush callback, replacing any previous one
    pub fn set_on_flush<F>(&self, callback: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        *lock(&self.on_flush) = Some(Arc::new(callback));
    }

    /// Remove the flush callback; later flushes drop their text
    pub fn clear_on_flush(&self) {
        *lock(&self.on_flush) = None;
    }

    /// Install a formatter applied to every subsequent write
    pub fn set_format<F>(&self, format: F)
    where
        F: Fn(&str) -> Result<String> + Send + Sync + 'static,
    {
        *lock(&self.format) = Some(Arc::new(format));
    }

    /// Remove the formatter
    pub fn clear_format(&self) {
        *lock(&self.format) = None;
    }

    /// Number of fragments waiting for a flush
    pub fn pending_fragments(&self) -> usize {
        lock(&self.buffer).len()
    }

    /// Whether anything is waiting for a flush
    pub fn has_pending(&self) -> bool {
        lock(&self.buffer).iter().any(|fragment| !fragment.is_empty())
    }
}

impl Writable for OutputStream {
    fn write(&self, text: &str) -> Result<usize> {
        let accepted = text.chars().count();

        // Clone the formatter out so a re-entrant write from it cannot deadlock
        let format = lock(&self.format).clone();
        let text = match format {
            Some(format) => format(text)?,
            None => text.to_string(),
        };

        let ends_line = text.ends_with('\n');
        lock(&self.buffer).push(text);

        if ends_line {
            self.flush();
        }

        Ok(accepted)
    }

    fn flush(&self) {
        let text = {
            let mut buffer = lock(&self.buffer);
            let fragments = std::mem::take(&mut *buffer);
            fragments.concat()
        };

        if text.is_empty() {
            return;
        }

        let on_flush = lock(&self.on_flush).clone();
        match on_flush {
            Some(callback) => callback(&text),
            None => trace!("Dropping {} flushed bytes, no flush callback", text.len()),
        }
    }
}

/// Lock a stream mutex, recovering the data if a callback panicked mid-write
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
