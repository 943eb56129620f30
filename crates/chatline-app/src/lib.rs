//! Application core for Chatline
//!
//! The client-side session state machine and a generic runtime that drives
//! it. Nothing in this crate performs I/O directly: the network link, the
//! display and the input source are capabilities supplied by the host
//! program, which lets the same session code run against a real TCP
//! connection or a simulated one.
//!
//! # Components
//!
//! - [`Session`]: connection lifecycle policy and local command execution
//! - [`Command`]: the `#`-prefixed command grammar
//! - [`Connection`]: capability trait for the stream connection
//! - [`DisplaySink`]: capability trait for user-visible output
//! - [`LineSource`]: capability trait for user input lines
//! - [`Runtime`]: single-task event loop feeding input and connection events
//!   into the session

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod command;
mod connection;
mod display;
mod error;
mod input;
mod runtime;
mod session;

pub use command::{COMMAND_PREFIX, Command};
pub use connection::{Connection, ConnectionEvent, Endpoint, Listener};
pub use display::DisplaySink;
pub use error::{ConnectionError, RuntimeError, SessionError};
pub use input::LineSource;
pub use runtime::Runtime;
pub use session::{Session, Signal};
