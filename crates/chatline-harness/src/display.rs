//! Recording display sink.

#![allow(clippy::disallowed_types, reason = "Synchronous locking operations only")]

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chatline_app::DisplaySink;

/// Display sink that records every shown line.
///
/// Clones share the same transcript, so a test keeps one clone while the
/// session owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
    lines: Arc<Mutex<Vec<String>>>,
}

impl RecordingDisplay {
    /// Create an empty display.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All lines shown so far.
    pub fn lines(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Number of lines shown so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if nothing has been shown.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Most recent line. `None` if nothing has been shown.
    pub fn last(&self) -> Option<String> {
        self.lock().last().cloned()
    }

    /// Take the recorded lines, leaving the transcript empty.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lock())
    }

    /// Lines joined with newlines, for snapshot assertions.
    pub fn transcript(&self) -> String {
        self.lock().join("\n")
    }
}

impl DisplaySink for RecordingDisplay {
    fn show(&mut self, text: &str) {
        self.lock().push(text.to_owned());
    }
}
