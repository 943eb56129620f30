//! Chatline console client.
//!
//! # Usage
//!
//! ```bash
//! # Connect to a local server on the default port
//! chatline
//!
//! # Start disconnected, then use #sethost/#setport/#login
//! chatline --no-connect
//!
//! # Verbose logs go to stderr, chat output stays on stdout
//! chatline --host chat.example.org --port 6000 --log-level debug
//! ```

use std::process::ExitCode;

use chatline_console::{Args, run};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "client exited with error");
            ExitCode::FAILURE
        },
    }
}
