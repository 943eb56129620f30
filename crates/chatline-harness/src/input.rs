//! Scripted input sources.

use std::{collections::VecDeque, io};

use chatline_app::LineSource;
use tokio::sync::mpsc;

/// Input that yields a fixed list of lines, then end of input.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
}

impl ScriptedInput {
    /// Create input from lines, yielded in order.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { lines: lines.into_iter().map(Into::into).collect() }
    }

    /// Lines not yet consumed.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineSource for ScriptedInput {
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}

/// Input fed line by line from a channel.
///
/// Pending until the test sends a line; dropping the sender ends input.
#[derive(Debug)]
pub struct ChannelInput {
    lines: mpsc::UnboundedReceiver<String>,
}

impl ChannelInput {
    /// Create the input and the sender that feeds it.
    pub fn pair() -> (mpsc::UnboundedSender<String>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self { lines: rx })
    }
}

impl LineSource for ChannelInput {
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.lines.recv().await)
    }
}
