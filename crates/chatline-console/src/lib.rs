//! Console front end for Chatline.
//!
//! Wires standard input, standard output and a [`TcpConnection`] to the
//! session runtime from `chatline-app`. Standard input is read on its own
//! thread (see [`ThreadedLines`]) so a server failure can end the process
//! while a read is still pending. The binary in `main.rs` only parses
//! arguments, installs logging and calls [`run`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod args;
pub mod display;
mod error;
pub mod input;

pub use args::Args;
use chatline_app::{DisplaySink, LineSource, Runtime, Session};
use chatline_client::TcpConnection;
pub use display::ConsoleDisplay;
pub use error::ConsoleError;
pub use input::ThreadedLines;
use tokio::sync::mpsc;

/// Shown when the connection cannot be opened at startup.
pub const SETUP_FAILED: &str = "Error: Can't setup connection! Terminating client.";

/// Run the client on the process's standard streams.
pub async fn run(args: Args) -> Result<(), ConsoleError> {
    let input = ThreadedLines::stdin().map_err(ConsoleError::Input)?;
    run_with(&args, input, ConsoleDisplay::stdout()).await
}

/// Run the client with the given input source and display.
///
/// Unless `--no-connect` was given, the connection is opened before any
/// input is read. Failing to open it is fatal.
pub async fn run_with<I, D>(args: &Args, input: I, display: D) -> Result<(), ConsoleError>
where
    I: LineSource,
    D: DisplaySink,
{
    let (listener, events) = mpsc::unbounded_channel();
    let connection = TcpConnection::new(args.endpoint(), args.connection_config(), listener);
    let mut session = Session::new(connection, display);

    if !args.no_connect
        && let Err(e) = session.connect().await
    {
        tracing::error!(error = %e, "startup connection failed");
        session.display_mut().show(SETUP_FAILED);
        return Err(ConsoleError::Setup(e));
    }

    tracing::info!(endpoint = %args.endpoint(), connected = !args.no_connect, "client started");
    Runtime::new(session, events).run(input).await?;
    Ok(())
}
