//! Simulated connection implementing the [`Connection`] trait.
//!
//! `SimConnection` behaves like the TCP connection as far as the session can
//! observe: same error variants, same `Closed` notification on a local close.
//! A cloneable [`SimHandle`] shares its state so tests can inject server
//! traffic and failures and inspect what the session did.

#![allow(clippy::disallowed_types, reason = "Synchronous locking operations only")]

use std::{
    io,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use chatline_app::{Connection, ConnectionError, ConnectionEvent, Endpoint, Listener};

/// Shared state between the connection and its handles.
#[derive(Debug)]
struct SharedState {
    endpoint: Endpoint,
    open: bool,
    sent: Vec<String>,
    opened: Vec<Endpoint>,
    close_calls: usize,
    refuse_open: Option<String>,
    fail_sends: bool,
    fail_close: bool,
}

/// In-memory connection for deterministic testing.
pub struct SimConnection {
    /// Owned copy of the endpoint, mirrored into the shared state.
    endpoint: Endpoint,
    state: Arc<Mutex<SharedState>>,
    listener: Listener,
}

impl SimConnection {
    /// Create a closed connection targeting `endpoint`.
    pub fn new(endpoint: Endpoint, listener: Listener) -> Self {
        let state = SharedState {
            endpoint: endpoint.clone(),
            open: false,
            sent: Vec::new(),
            opened: Vec::new(),
            close_calls: 0,
            refuse_open: None,
            fail_sends: false,
            fail_close: false,
        };
        Self { endpoint, state: Arc::new(Mutex::new(state)), listener }
    }

    /// Create a connection that is already open, as after a startup connect.
    pub fn open_to(endpoint: Endpoint, listener: Listener) -> Self {
        let connection = Self::new(endpoint.clone(), listener);
        {
            let mut state = connection.lock();
            state.open = true;
            state.opened.push(endpoint);
        }
        connection
    }

    /// Handle sharing this connection's state.
    pub fn handle(&self) -> SimHandle {
        SimHandle { state: Arc::clone(&self.state), listener: self.listener.clone() }
    }

    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, event: ConnectionEvent) {
        // Receiver may be gone when the session is driven directly.
        let _ = self.listener.send(event);
    }
}

impl Connection for SimConnection {
    async fn open(&mut self) -> Result<(), ConnectionError> {
        let mut state = self.lock();
        if state.open {
            return Err(ConnectionError::AlreadyConnected);
        }
        if let Some(reason) = state.refuse_open.take() {
            return Err(ConnectionError::Io(io::Error::new(io::ErrorKind::ConnectionRefused, reason)));
        }

        state.open = true;
        state.opened.push(self.endpoint.clone());
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ConnectionError> {
        let fail_close = {
            let mut state = self.lock();
            if !state.open {
                return Err(ConnectionError::NotConnected);
            }
            state.open = false;
            state.close_calls += 1;
            state.fail_close
        };

        self.notify(ConnectionEvent::Closed);
        if fail_close {
            return Err(ConnectionError::Io(io::Error::other("simulated shutdown failure")));
        }
        Ok(())
    }

    async fn send(&mut self, line: &str) -> Result<(), ConnectionError> {
        let mut state = self.lock();
        if !state.open {
            return Err(ConnectionError::NotConnected);
        }
        if state.fail_sends {
            return Err(ConnectionError::Io(io::Error::new(io::ErrorKind::BrokenPipe, "simulated")));
        }

        state.sent.push(line.to_owned());
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.lock().open
    }

    fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    fn set_host(&mut self, host: String) {
        self.lock().endpoint.host.clone_from(&host);
        self.endpoint.host = host;
    }

    fn set_port(&mut self, port: u16) {
        self.lock().endpoint.port = port;
        self.endpoint.port = port;
    }
}

/// Test handle onto a [`SimConnection`].
///
/// Injects server-side events into the listener channel and exposes what the
/// session did to the connection.
#[derive(Clone)]
pub struct SimHandle {
    state: Arc<Mutex<SharedState>>,
    listener: Listener,
}

impl SimHandle {
    fn lock(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Push a server line, as the background reader would.
    pub fn inject_message(&self, line: impl Into<String>) {
        let _ = self.listener.send(ConnectionEvent::Message(line.into()));
    }

    /// Simulate the server dropping the link: `Failed` then `Closed`.
    pub fn inject_failure(&self, reason: impl Into<String>) {
        self.lock().open = false;
        let _ = self.listener.send(ConnectionEvent::Failed(reason.into()));
        let _ = self.listener.send(ConnectionEvent::Closed);
    }

    /// Push a bare `Closed` notification without changing state.
    pub fn inject_closed(&self) {
        let _ = self.listener.send(ConnectionEvent::Closed);
    }

    /// Make the next `open` fail with `reason`.
    pub fn refuse_next_open(&self, reason: impl Into<String>) {
        self.lock().refuse_open = Some(reason.into());
    }

    /// Make every subsequent `send` fail.
    pub fn fail_sends(&self, fail: bool) {
        self.lock().fail_sends = fail;
    }

    /// Make every subsequent `close` report an error after closing.
    pub fn fail_close(&self, fail: bool) {
        self.lock().fail_close = fail;
    }

    /// Lines the session sent, in order.
    pub fn sent(&self) -> Vec<String> {
        self.lock().sent.clone()
    }

    /// Endpoints successfully opened, in order.
    pub fn opened(&self) -> Vec<Endpoint> {
        self.lock().opened.clone()
    }

    /// Number of `close` calls that found the connection open.
    pub fn close_calls(&self) -> usize {
        self.lock().close_calls
    }

    /// Check if the connection is open.
    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    /// Current endpoint.
    pub fn endpoint(&self) -> Endpoint {
        self.lock().endpoint.clone()
    }
}
