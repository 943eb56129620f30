//! Session state machine.
//!
//! This module defines the [`Session`], which owns the connection lifecycle
//! policy of the client: which local commands are accepted in which
//! connection state, what the user sees, and when the client must stop.
//!
//! The session never halts the process. Every entry point returns a
//! [`Signal`], and the host program decides what [`Signal::Terminate`]
//! means.
//!
//! # Responsibilities
//!
//! - Forwards server lines to the display verbatim.
//! - Sends payload lines; a failed send is fatal.
//! - Executes [`Command`]s against the connection state.
//! - Reacts to connection closure and failure notifications.
//!
//! # Invariants
//!
//! - The endpoint is only changed while the connection is closed.
//! - A successful send produces no display output.
//! - After [`Signal::Terminate`] the connection is no longer open, unless
//!   closing it failed (which is reported to the display).

use crate::{Command, Connection, ConnectionEvent, DisplaySink, SessionError};

const SEND_FAILED: &str = "Could not send message to server. Terminating client.";
const CLOSE_FAILED: &str = "Error while closing the connection.";
const SERVER_DOWN: &str = "The server is down.";
const CONNECTION_CLOSED: &str = "Connection closed.";

/// Outcome of a session call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Signal {
    /// Keep processing events.
    Continue,
    /// The client must stop. Raised exactly once, by [`Session::quit`].
    Terminate,
}

impl Signal {
    /// Check if this is [`Signal::Terminate`].
    pub fn is_terminate(self) -> bool {
        self == Self::Terminate
    }
}

/// Client session.
///
/// Owns the connection and the display sink for the lifetime of the client.
/// All state mutation goes through `&mut self`, so callers serialize user
/// input and connection events simply by owning the session on one task.
#[derive(Debug)]
pub struct Session<C, D> {
    connection: C,
    display: D,
}

impl<C, D> Session<C, D>
where
    C: Connection,
    D: DisplaySink,
{
    /// Create a session around a connection and a display sink.
    ///
    /// The connection is used in whatever state it is in; see
    /// [`Session::connect`] for opening it at startup.
    pub fn new(connection: C, display: D) -> Self {
        Self { connection, display }
    }

    /// Open the connection without announcing it.
    ///
    /// Used at startup, before any user input has been read.
    pub async fn connect(&mut self) -> Result<(), SessionError> {
        self.open().await
    }

    /// Handle a line pushed by the server.
    pub fn on_server_message(&mut self, payload: &str) -> Signal {
        self.display.show(payload);
        Signal::Continue
    }

    /// Handle a line typed by the user.
    ///
    /// Lines starting with `#` are executed as commands; everything else is
    /// sent to the server unchanged. A failed send terminates the client.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] when a command fails locally. The session
    /// remains usable; pass the error to [`Session::report`].
    pub async fn on_user_input(&mut self, line: &str) -> Result<Signal, SessionError> {
        if Command::is_command(line) {
            return self.execute(Command::parse(line)).await;
        }

        match self.connection.send(line).await {
            Ok(()) => Ok(Signal::Continue),
            Err(e) => {
                tracing::warn!(error = %e, "send failed");
                self.display.show(SEND_FAILED);
                Ok(self.quit().await)
            },
        }
    }

    /// Execute a parsed command.
    pub async fn execute(&mut self, command: Command) -> Result<Signal, SessionError> {
        tracing::debug!(?command, "executing command");

        match command {
            Command::Quit => return Ok(self.quit().await),
            Command::Logoff => self.logoff().await?,
            Command::SetHost(host) => self.set_host(host),
            Command::SetPort(value) => self.set_port(&value)?,
            Command::Login => self.login().await?,
            Command::GetHost => {
                let text = format!("Host: {}", self.connection.endpoint().host);
                self.display.show(&text);
            },
            Command::GetPort => {
                let text = format!("Port: {}", self.connection.endpoint().port);
                self.display.show(&text);
            },
            Command::Invalid => self.display.show("Invalid command."),
        }

        Ok(Signal::Continue)
    }

    /// Terminate the client.
    ///
    /// Closes the connection if it is open. A close failure is shown but
    /// does not prevent termination.
    pub async fn quit(&mut self) -> Signal {
        if self.connection.is_open()
            && let Err(e) = self.connection.close().await
        {
            tracing::warn!(error = %e, "close on quit failed");
            self.display.show(CLOSE_FAILED);
        }

        tracing::info!("session terminating");
        Signal::Terminate
    }

    /// Handle the connection reporting that it closed.
    pub fn on_closed(&mut self) -> Signal {
        self.display.show(CONNECTION_CLOSED);
        Signal::Continue
    }

    /// Handle the connection failing outside the client's control.
    ///
    /// Fatal: the client terminates without attempting to reconnect.
    pub async fn on_failure(&mut self, reason: &str) -> Signal {
        tracing::error!(%reason, endpoint = %self.connection.endpoint(), "connection failed");
        self.display.show(SERVER_DOWN);
        self.quit().await
    }

    /// Dispatch a notification from the connection's listener channel.
    pub async fn on_connection_event(&mut self, event: ConnectionEvent) -> Signal {
        match event {
            ConnectionEvent::Message(line) => self.on_server_message(&line),
            ConnectionEvent::Closed => self.on_closed(),
            ConnectionEvent::Failed(reason) => self.on_failure(&reason).await,
        }
    }

    /// Show a command-local error to the user.
    pub fn report(&mut self, error: &SessionError) {
        self.display.show(&error.to_string());
    }

    /// The connection.
    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// The display sink.
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Mutable access to the display sink, for host-level messages.
    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Release the connection and display sink.
    pub fn into_parts(self) -> (C, D) {
        (self.connection, self.display)
    }

    async fn logoff(&mut self) -> Result<(), SessionError> {
        if !self.connection.is_open() {
            self.display.show("Already disconnected.");
            return Ok(());
        }

        self.connection.close().await.map_err(SessionError::Close)?;
        self.display.show("Logged off.");
        Ok(())
    }

    fn set_host(&mut self, host: String) {
        if self.connection.is_open() {
            self.display.show("Cannot set host while connected.");
            return;
        }

        self.connection.set_host(host);
        let text = format!("Host set to {}", self.connection.endpoint().host);
        self.display.show(&text);
    }

    fn set_port(&mut self, value: &str) -> Result<(), SessionError> {
        if self.connection.is_open() {
            self.display.show("Cannot set port while connected.");
            return Ok(());
        }

        let port = parse_port(value)?;
        self.connection.set_port(port);
        let text = format!("Port set to {}", self.connection.endpoint().port);
        self.display.show(&text);
        Ok(())
    }

    async fn login(&mut self) -> Result<(), SessionError> {
        if self.connection.is_open() {
            self.display.show("Already connected.");
            return Ok(());
        }

        self.open().await?;
        self.display.show("Logged in.");
        Ok(())
    }

    async fn open(&mut self) -> Result<(), SessionError> {
        self.connection.open().await.map_err(|source| SessionError::Open {
            endpoint: self.connection.endpoint().clone(),
            source,
        })?;

        tracing::info!(endpoint = %self.connection.endpoint(), "connection opened");
        Ok(())
    }
}

/// Parse a `#setport` argument. Port 0 cannot be connected to.
fn parse_port(value: &str) -> Result<u16, SessionError> {
    match value.parse::<u16>() {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(SessionError::InvalidPort { value: value.to_owned() }),
    }
}
