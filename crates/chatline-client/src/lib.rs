//! TCP transport for the Chatline client.
//!
//! Implements the [`chatline_app::Connection`] capability over a plain TCP
//! stream carrying newline-delimited UTF-8 text. Session policy stays in
//! `chatline-app`; this crate only moves lines.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod transport;

pub use transport::{ConnectionConfig, TcpConnection};
