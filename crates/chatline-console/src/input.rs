//! Standard input on a dedicated thread.
//!
//! A blocking stdin read cannot be cancelled. Reading on tokio's blocking
//! pool would keep the runtime, and so the process, alive after the session
//! terminates until the user presses Enter. A plain OS thread is not joined
//! on exit, so returning from `main` ends the process immediately.

use std::{
    io::{self, BufRead},
    thread,
};

use chatline_app::LineSource;
use tokio::sync::mpsc;

/// Lines read by a background thread and handed over through a channel.
#[derive(Debug)]
pub struct ThreadedLines {
    lines: mpsc::UnboundedReceiver<io::Result<String>>,
}

impl ThreadedLines {
    /// Read process standard input.
    pub fn stdin() -> io::Result<Self> {
        Self::spawn(io::BufReader::new(io::stdin()))
    }

    /// Read `reader` line by line on a new thread.
    ///
    /// The thread stops at end of input, after the first read error, or once
    /// this value is dropped and the next line arrives.
    pub fn spawn<R>(reader: R) -> io::Result<Self>
    where
        R: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        thread::Builder::new().name("chatline-stdin".into()).spawn(move || {
            for line in reader.lines() {
                let failed = line.is_err();
                if tx.send(line).is_err() || failed {
                    break;
                }
            }
        })?;
        Ok(Self { lines: rx })
    }
}

impl LineSource for ThreadedLines {
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        self.lines.recv().await.transpose()
    }
}
