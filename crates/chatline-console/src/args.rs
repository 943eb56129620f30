//! Command-line arguments.

use std::time::Duration;

use chatline_app::Endpoint;
use chatline_client::ConnectionConfig;
use clap::Parser;

/// Line-oriented chat client
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "chatline")]
#[command(about = "Terminal chat client speaking newline-delimited text over TCP")]
#[command(version)]
pub struct Args {
    /// Chat server host name or address
    #[arg(long, default_value = "localhost")]
    pub host: String,

    /// Chat server TCP port
    #[arg(short, long, default_value_t = 5555, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: u16,

    /// Seconds to wait for the server to accept a connection
    #[arg(long, default_value_t = 10)]
    pub connect_timeout: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Start disconnected instead of connecting at startup
    #[arg(long)]
    pub no_connect: bool,
}

impl Args {
    /// Initial server endpoint.
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.host.clone(), self.port)
    }

    /// Transport configuration derived from the flags.
    pub fn connection_config(&self) -> ConnectionConfig {
        ConnectionConfig {
            connect_timeout: Duration::from_secs(self.connect_timeout),
            ..ConnectionConfig::default()
        }
    }
}
