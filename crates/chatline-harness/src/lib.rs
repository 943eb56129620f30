//! Deterministic simulation harness for Chatline session testing.
//!
//! In-memory implementations of the [`chatline_app::Connection`],
//! [`chatline_app::DisplaySink`] and [`chatline_app::LineSource`]
//! capabilities, so the real [`chatline_app::Session`] and
//! [`chatline_app::Runtime`] run without sockets or a terminal.
//!
//! # Invariant Testing
//!
//! The `invariants` module checks behavioral properties of every session
//! step rather than specific scenarios. Use
//! [`InvariantRegistry::standard()`] for the common session invariants.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod display;
pub mod input;
pub mod invariants;
pub mod sim_connection;

pub use display::RecordingDisplay;
pub use input::{ChannelInput, ScriptedInput};
pub use invariants::{
    ClosedAfterTerminate, CommandsStayLocal, EndpointFrozenWhileOpen, Invariant, InvariantRegistry,
    InvariantResult, NoCloseWhileClosed, NoLocalEcho, SessionSnapshot, Step, Violation,
};
pub use sim_connection::{SimConnection, SimHandle};
