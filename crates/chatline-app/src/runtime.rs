//! Generic runtime for the client session.
//!
//! The Runtime drives the client event loop, coordinating between:
//! - [`LineSource`]: lines typed by the user
//! - the [`Listener`](crate::Listener) channel: lines and lifecycle events
//!   pushed by the connection's background reader
//! - [`Session`]: the state machine both sources feed into
//!
//! Both sources are multiplexed with `tokio::select!` on a single task, so
//! the session is never mutated concurrently.

use tokio::sync::mpsc;

use crate::{Connection, ConnectionEvent, DisplaySink, LineSource, RuntimeError, Session, Signal};

/// Single-task event loop around a [`Session`].
///
/// # Type Parameters
///
/// - `C`: connection implementation
/// - `D`: display sink implementation
pub struct Runtime<C, D> {
    session: Session<C, D>,
    events: mpsc::UnboundedReceiver<ConnectionEvent>,
}

impl<C, D> Runtime<C, D>
where
    C: Connection,
    D: DisplaySink,
{
    /// Create a runtime.
    ///
    /// `events` is the receiving end of the listener the session's
    /// connection was constructed with.
    pub fn new(session: Session<C, D>, events: mpsc::UnboundedReceiver<ConnectionEvent>) -> Self {
        Self { session, events }
    }

    /// Run until the session terminates.
    ///
    /// Connection events take priority over user input, so a server failure
    /// is acted on before any further line is sent. End of input is treated
    /// as `#quit`.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails. The connection is closed
    /// first.
    pub async fn run<I: LineSource>(&mut self, mut input: I) -> Result<(), RuntimeError> {
        loop {
            let signal = tokio::select! {
                biased;

                Some(event) = self.events.recv() => {
                    self.session.on_connection_event(event).await
                }

                line = input.next_line() => match line {
                    Ok(Some(line)) => self.handle_line(&line).await,
                    Ok(None) => {
                        tracing::info!("input closed");
                        self.session.quit().await
                    },
                    Err(e) => {
                        tracing::error!(error = %e, "failed to read input");
                        let _ = self.session.quit().await;
                        return Err(RuntimeError::Input(e));
                    },
                },
            };

            if signal.is_terminate() {
                return Ok(());
            }
        }
    }

    /// Feed one user line to the session, reporting command-local errors.
    async fn handle_line(&mut self, line: &str) -> Signal {
        match self.session.on_user_input(line).await {
            Ok(signal) => signal,
            Err(e) => {
                tracing::debug!(error = %e, "command failed");
                self.session.report(&e);
                Signal::Continue
            },
        }
    }

    /// Get a reference to the session.
    pub fn session(&self) -> &Session<C, D> {
        &self.session
    }

    /// Get a mutable reference to the session.
    pub fn session_mut(&mut self) -> &mut Session<C, D> {
        &mut self.session
    }

    /// Release the session.
    pub fn into_session(self) -> Session<C, D> {
        self.session
    }
}
