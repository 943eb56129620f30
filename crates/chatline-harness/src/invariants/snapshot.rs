//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture what the session did to its collaborators at a point in
//! time. Invariants compare the snapshots taken around one session step
//! rather than reading live state.

use chatline_app::{Command, Endpoint, Signal};

use crate::{RecordingDisplay, SimHandle};

/// Observable session state at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Connection target.
    pub endpoint: Endpoint,
    /// Connection open flag.
    pub open: bool,
    /// Lines successfully sent so far.
    pub sent: usize,
    /// Lines shown so far.
    pub shown: usize,
    /// Close calls that found the connection open.
    pub close_calls: usize,
}

impl SessionSnapshot {
    /// Capture the current state of a simulated connection and display.
    pub fn capture(connection: &SimHandle, display: &RecordingDisplay) -> Self {
        Self {
            endpoint: connection.endpoint(),
            open: connection.is_open(),
            sent: connection.sent().len(),
            shown: display.len(),
            close_calls: connection.close_calls(),
        }
    }
}

/// One user line processed by the session.
#[derive(Debug, Clone)]
pub struct Step {
    /// Line as typed.
    pub input: String,
    /// State before the line was processed.
    pub before: SessionSnapshot,
    /// State after the line was processed.
    pub after: SessionSnapshot,
    /// Signal returned. `None` if the command failed locally.
    pub signal: Option<Signal>,
}

impl Step {
    /// Whether the input was a local command.
    pub fn is_command(&self) -> bool {
        Command::is_command(&self.input)
    }
}
