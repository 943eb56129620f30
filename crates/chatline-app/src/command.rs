//! Local command grammar.
//!
//! Lines starting with [`COMMAND_PREFIX`] are interpreted by the client and
//! never reach the server. [`Command::parse`] turns one such line into a
//! [`Command`] for the [`crate::Session`] to execute.

/// Marks a user line as a local command.
pub const COMMAND_PREFIX: char = '#';

/// A locally interpreted command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Terminate the client.
    Quit,
    /// Close the connection but keep the client running.
    Logoff,
    /// Change the target host. Only accepted while disconnected.
    SetHost(String),
    /// Change the target port. Only accepted while disconnected.
    ///
    /// Holds the raw argument: it is parsed on execution so that the
    /// connected-state check wins over a malformed value.
    SetPort(String),
    /// Open the connection.
    Login,
    /// Show the current host.
    GetHost,
    /// Show the current port.
    GetPort,
    /// Unknown keyword or malformed arguments.
    Invalid,
}

impl Command {
    /// Parse one user line.
    ///
    /// Matching is case-sensitive on the trimmed line. `#sethost` and
    /// `#setport` need a space after the keyword followed by a value; the
    /// value is trimmed.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        match line {
            "#quit" => Self::Quit,
            "#logoff" => Self::Logoff,
            "#login" => Self::Login,
            "#gethost" => Self::GetHost,
            "#getport" => Self::GetPort,
            _ => {
                if let Some(host) = argument(line, "#sethost") {
                    Self::SetHost(host.to_owned())
                } else if let Some(port) = argument(line, "#setport") {
                    Self::SetPort(port.to_owned())
                } else {
                    Self::Invalid
                }
            },
        }
    }

    /// Whether `line` is a command rather than a payload for the server.
    ///
    /// Checked on the raw line: leading whitespace makes it a payload.
    pub fn is_command(line: &str) -> bool {
        line.starts_with(COMMAND_PREFIX)
    }
}

/// Value following `keyword` and a single space, if non-empty.
fn argument<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let value = line.strip_prefix(keyword)?.strip_prefix(' ')?.trim();
    (!value.is_empty()).then_some(value)
}
