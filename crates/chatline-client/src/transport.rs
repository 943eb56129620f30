//! Line-oriented TCP connection.
//!
//! [`TcpConnection`] is a thin layer over a [`TcpStream`]: the write half is
//! held by the connection, the read half is moved into a background task
//! that forwards every received line to the registered listener.
//!
//! # Reader lifecycle
//!
//! The reader ends on EOF, on a read error or on an overlong line. It then
//! pushes `Failed(reason)` followed by `Closed`. A local [`close`] aborts the
//! reader first, so a deliberate logoff only ever produces `Closed`.
//!
//! [`close`]: chatline_app::Connection::close

use std::time::Duration;

use chatline_app::{Connection, ConnectionError, ConnectionEvent, Endpoint, Listener};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader},
    net::{TcpStream, tcp::OwnedWriteHalf},
    task::JoinHandle,
};

/// Transport tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// How long `open` waits for the TCP handshake.
    pub connect_timeout: Duration,
    /// Longest inbound line accepted, in bytes, excluding the terminator.
    pub max_line_length: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self { connect_timeout: Duration::from_secs(10), max_line_length: 64 * 1024 }
    }
}

/// An established link.
struct Link {
    writer: OwnedWriteHalf,
    reader: JoinHandle<()>,
}

impl Link {
    fn is_live(&self) -> bool {
        !self.reader.is_finished()
    }
}

impl Drop for Link {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

/// Newline-delimited TCP connection to a chat server.
pub struct TcpConnection {
    endpoint: Endpoint,
    config: ConnectionConfig,
    listener: Listener,
    link: Option<Link>,
}

impl TcpConnection {
    /// Create a closed connection. Nothing is dialed until `open`.
    pub fn new(endpoint: Endpoint, config: ConnectionConfig, listener: Listener) -> Self {
        Self { endpoint, config, listener, link: None }
    }

    /// Transport configuration.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Live link, if any. A link whose reader has stopped is not live.
    fn live_link(&mut self) -> Option<&mut Link> {
        self.link.as_mut().filter(|link| link.is_live())
    }
}

impl Connection for TcpConnection {
    async fn open(&mut self) -> Result<(), ConnectionError> {
        if self.is_open() {
            return Err(ConnectionError::AlreadyConnected);
        }
        // Stale link left behind by a remote failure
        self.link = None;

        let endpoint = &self.endpoint;
        let timeout = self.config.connect_timeout;
        let connect = TcpStream::connect((endpoint.host.as_str(), endpoint.port));
        let stream = tokio::time::timeout(timeout, connect)
            .await
            .map_err(|_| ConnectionError::Timeout { endpoint: endpoint.clone(), after: timeout })??;
        stream.set_nodelay(true)?;

        let (read, writer) = stream.into_split();
        let reader = tokio::spawn(read_lines(
            BufReader::new(read),
            self.listener.clone(),
            self.config.max_line_length,
        ));

        tracing::info!(endpoint = %self.endpoint, "tcp connection established");
        self.link = Some(Link { writer, reader });
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ConnectionError> {
        let mut link = match self.link.take() {
            Some(link) if link.is_live() => link,
            _ => return Err(ConnectionError::NotConnected),
        };

        link.reader.abort();
        let result = link.writer.shutdown().await;
        drop(link);

        let _ = self.listener.send(ConnectionEvent::Closed);
        tracing::info!(endpoint = %self.endpoint, "tcp connection closed");

        result.map_err(|e| {
            tracing::warn!(error = %e, "shutdown failed");
            ConnectionError::Io(e)
        })
    }

    async fn send(&mut self, line: &str) -> Result<(), ConnectionError> {
        let Some(link) = self.live_link() else {
            return Err(ConnectionError::NotConnected);
        };

        let result = write_line(&mut link.writer, line).await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, endpoint = %self.endpoint, "send failed, dropping link");
            self.link = None;
        }
        result
    }

    fn is_open(&self) -> bool {
        self.link.as_ref().is_some_and(Link::is_live)
    }

    fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    fn set_host(&mut self, host: String) {
        self.endpoint.host = host;
    }

    fn set_port(&mut self, port: u16) {
        self.endpoint.port = port;
    }
}

/// Write one line and its terminator.
async fn write_line(writer: &mut OwnedWriteHalf, line: &str) -> Result<(), ConnectionError> {
    let mut frame = String::with_capacity(line.len() + 1);
    frame.push_str(line);
    frame.push('\n');

    writer.write_all(frame.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

/// Forward lines to the listener until the stream ends.
async fn read_lines<R>(mut reader: R, listener: Listener, max_line_length: usize)
where
    R: AsyncBufRead + Unpin,
{
    let reason = loop {
        match read_line(&mut reader, max_line_length).await {
            Ok(Some(line)) => {
                if listener.send(ConnectionEvent::Message(line)).is_err() {
                    tracing::debug!("listener gone, stopping reader");
                    return;
                }
            },
            Ok(None) => break "connection closed by server".to_string(),
            Err(e) => break e.to_string(),
        }
    };

    tracing::info!(%reason, "reader stopped");
    let _ = listener.send(ConnectionEvent::Failed(reason));
    let _ = listener.send(ConnectionEvent::Closed);
}

/// Read one line without its terminator, or `None` at EOF.
///
/// Accepts `\n` and `\r\n`. A final line without terminator is still
/// delivered. Invalid UTF-8 is replaced rather than rejected.
async fn read_line<R>(reader: &mut R, max_line_length: usize) -> Result<Option<String>, ConnectionError>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let limit = u64::try_from(max_line_length).unwrap_or(u64::MAX).saturating_add(1);
    let n = (&mut *reader).take(limit).read_until(b'\n', &mut buf).await?;
    if n == 0 {
        return Ok(None);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    } else if buf.len() > max_line_length {
        return Err(ConnectionError::Protocol(format!(
            "line exceeds {max_line_length} bytes"
        )));
    }

    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}
