//! Console error types.

use std::io;

use chatline_app::{RuntimeError, SessionError};
use thiserror::Error;

/// Reasons the console client exits unsuccessfully.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Initial connection could not be opened.
    #[error("startup connection failed: {0}")]
    Setup(#[source] SessionError),

    /// Standard input reader could not be started.
    #[error("failed to start input reader: {0}")]
    Input(#[source] io::Error),

    /// Event loop stopped on an input failure.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
