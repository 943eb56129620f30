//! Connection capability.
//!
//! The [`Connection`] trait decouples the session from the transport. Each
//! implementation owns the link to one [`Endpoint`] and reports what happens
//! on it asynchronously through a [`Listener`] registered at construction.
//!
//! # Implementations
//!
//! - **TCP**: newline-delimited text over a TCP stream (`chatline-client`)
//! - **Simulation**: in-memory connection for tests (`chatline-harness`)

use std::{fmt, future::Future};

use tokio::sync::mpsc;

use crate::ConnectionError;

/// Address of the chat server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    /// Host name or IP address.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl Endpoint {
    /// Create an endpoint.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self { host: host.into(), port }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Notification from a connection's background reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// Line received from the server.
    Message(String),
    /// Connection closed, whether locally or remotely initiated.
    Closed,
    /// Transport failed outside the client's control.
    Failed(String),
}

/// Listener registered with a connection.
///
/// Unbounded so the background reader never blocks on a busy session.
pub type Listener = mpsc::UnboundedSender<ConnectionEvent>;

/// Stream connection to the chat server.
///
/// Inbound traffic and lifecycle changes are not returned from these methods;
/// they arrive as [`ConnectionEvent`]s on the registered [`Listener`].
pub trait Connection: Send {
    /// Open the connection to the current endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if already open, or if the endpoint cannot be reached
    /// within the implementation's timeout.
    fn open(&mut self) -> impl Future<Output = Result<(), ConnectionError>> + Send;

    /// Close the connection.
    ///
    /// The connection is considered closed afterwards even when an error is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns an error if not open, or if the transport fails to shut down
    /// cleanly.
    fn close(&mut self) -> impl Future<Output = Result<(), ConnectionError>> + Send;

    /// Send one line to the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection is closed or the write fails.
    fn send(&mut self, line: &str) -> impl Future<Output = Result<(), ConnectionError>> + Send;

    /// Check if the connection is open.
    fn is_open(&self) -> bool;

    /// Current target endpoint.
    fn endpoint(&self) -> &Endpoint;

    /// Change the target host. Callers only do this while closed.
    fn set_host(&mut self, host: String);

    /// Change the target port. Callers only do this while closed.
    fn set_port(&mut self, port: u16);
}
