//! Console display sink.

use std::io::{self, Write};

use chatline_app::DisplaySink;

/// Writes each shown string as one line to a writer.
///
/// Output is fire-and-forget: a write error is logged and dropped, since the
/// session has no way to act on a broken terminal.
#[derive(Debug)]
pub struct ConsoleDisplay<W> {
    out: W,
}

impl ConsoleDisplay<io::Stdout> {
    /// Display writing to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleDisplay<W> {
    /// Display writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Release the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> DisplaySink for ConsoleDisplay<W> {
    fn show(&mut self, text: &str) {
        let result = writeln!(self.out, "{text}").and_then(|()| self.out.flush());
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to write to display");
        }
    }
}
