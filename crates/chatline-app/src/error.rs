//! Error types.
//!
//! Three layers, matching who can act on them:
//!
//! - [`ConnectionError`]: transport failures reported by a [`crate::Connection`]
//! - [`SessionError`]: command-local failures. The session keeps running; the
//!   error text is what the user sees.
//! - [`RuntimeError`]: failures that stop the [`crate::Runtime`] loop itself

use std::{io, time::Duration};

use thiserror::Error;

use crate::Endpoint;

/// Connection errors.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// Operation needs an open connection.
    #[error("not connected")]
    NotConnected,

    /// Operation needs a closed connection.
    #[error("already connected")]
    AlreadyConnected,

    /// Endpoint did not accept the connection in time.
    #[error("timed out connecting to {endpoint} after {after:?}")]
    Timeout {
        /// Endpoint that was being connected to.
        endpoint: Endpoint,
        /// Configured connect timeout.
        after: Duration,
    },

    /// Socket I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Peer violated the line protocol.
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Command-local session errors.
///
/// The `Display` text is the message shown to the user.
#[derive(Debug, Error)]
pub enum SessionError {
    /// `#setport` argument is not a usable TCP port.
    #[error("Invalid port: {value}")]
    InvalidPort {
        /// Raw argument as typed.
        value: String,
    },

    /// `#login` could not open the connection.
    #[error("Could not connect to {endpoint}: {source}")]
    Open {
        /// Endpoint that was being connected to.
        endpoint: Endpoint,
        /// Underlying transport error.
        #[source]
        source: ConnectionError,
    },

    /// `#logoff` could not close the connection cleanly.
    #[error("Error while closing the connection.")]
    Close(#[source] ConnectionError),
}

/// Runtime errors.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Reading user input failed.
    #[error("input error: {0}")]
    Input(#[from] io::Error),
}
