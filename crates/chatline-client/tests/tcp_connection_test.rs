//! TCP connection tests against a loopback server.

use std::time::{Duration, Instant};

use chatline_app::{Connection, ConnectionError, ConnectionEvent, Endpoint};
use chatline_client::{ConnectionConfig, TcpConnection};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::{TcpListener, TcpSocket, TcpStream},
    sync::mpsc,
    time::timeout,
};

const WAIT: Duration = Duration::from_secs(5);

async fn loopback() -> (TcpListener, Endpoint) {
    let server = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = server.local_addr().unwrap().port();
    (server, Endpoint::new("127.0.0.1", port))
}

fn connection(
    endpoint: Endpoint,
    config: ConnectionConfig,
) -> (TcpConnection, mpsc::UnboundedReceiver<ConnectionEvent>) {
    let (listener, events) = mpsc::unbounded_channel();
    (TcpConnection::new(endpoint, config, listener), events)
}

async fn next_event(events: &mut mpsc::UnboundedReceiver<ConnectionEvent>) -> ConnectionEvent {
    timeout(WAIT, events.recv()).await.unwrap().unwrap()
}

async fn accept(server: &TcpListener) -> TcpStream {
    timeout(WAIT, server.accept()).await.unwrap().unwrap().0
}

/// The reader task finishes shortly after pushing its last event.
async fn wait_until_closed(connection: &TcpConnection) {
    timeout(WAIT, async {
        while connection.is_open() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn sent_lines_arrive_newline_terminated() {
    let (server, endpoint) = loopback().await;
    let (mut connection, _events) = connection(endpoint, ConnectionConfig::default());

    connection.open().await.unwrap();
    let peer = accept(&server).await;
    connection.send("hello world").await.unwrap();
    connection.send("").await.unwrap();

    let mut lines = BufReader::new(peer).lines();
    assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("hello world"));
    assert_eq!(lines.next_line().await.unwrap().as_deref(), Some(""));
}

#[tokio::test]
async fn server_lines_become_message_events() {
    let (server, endpoint) = loopback().await;
    let (mut connection, mut events) = connection(endpoint, ConnectionConfig::default());

    connection.open().await.unwrap();
    let mut peer = accept(&server).await;
    peer.write_all(b"SERVER MSG> hi\r\nsecond\n").await.unwrap();

    assert_eq!(next_event(&mut events).await, ConnectionEvent::Message("SERVER MSG> hi".into()));
    assert_eq!(next_event(&mut events).await, ConnectionEvent::Message("second".into()));
    assert!(connection.is_open());
}

#[tokio::test]
async fn server_disconnect_reports_failure_then_closed() {
    let (server, endpoint) = loopback().await;
    let (mut connection, mut events) = connection(endpoint, ConnectionConfig::default());

    connection.open().await.unwrap();
    drop(accept(&server).await);

    assert!(matches!(next_event(&mut events).await, ConnectionEvent::Failed(_)));
    assert_eq!(next_event(&mut events).await, ConnectionEvent::Closed);
    wait_until_closed(&connection).await;
    assert!(matches!(connection.send("late").await, Err(ConnectionError::NotConnected)));
}

#[tokio::test]
async fn local_close_only_reports_closed() {
    let (server, endpoint) = loopback().await;
    let (mut connection, mut events) = connection(endpoint, ConnectionConfig::default());

    connection.open().await.unwrap();
    let peer = accept(&server).await;
    connection.close().await.unwrap();

    assert_eq!(next_event(&mut events).await, ConnectionEvent::Closed);
    assert!(!connection.is_open());

    // Peer sees EOF, and no failure follows the deliberate close
    let mut lines = BufReader::new(peer).lines();
    assert_eq!(lines.next_line().await.unwrap(), None);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn io_after_close_is_rejected() {
    let (server, endpoint) = loopback().await;
    let (mut connection, _events) = connection(endpoint, ConnectionConfig::default());

    connection.open().await.unwrap();
    let _peer = accept(&server).await;
    connection.close().await.unwrap();

    assert!(matches!(connection.send("hi").await, Err(ConnectionError::NotConnected)));
    assert!(matches!(connection.close().await, Err(ConnectionError::NotConnected)));
}

#[tokio::test]
async fn open_twice_is_rejected() {
    let (server, endpoint) = loopback().await;
    let (mut connection, _events) = connection(endpoint, ConnectionConfig::default());

    connection.open().await.unwrap();
    let _peer = accept(&server).await;

    assert!(matches!(connection.open().await, Err(ConnectionError::AlreadyConnected)));
}

#[tokio::test]
async fn refused_connect_is_an_error() {
    let (server, endpoint) = loopback().await;
    drop(server);
    let (mut connection, _events) = connection(endpoint, ConnectionConfig::default());

    let result = connection.open().await;

    assert!(matches!(result, Err(ConnectionError::Io(_))));
    assert!(!connection.is_open());
}

#[tokio::test]
async fn reopen_after_logoff_uses_new_port() {
    let (first, endpoint) = loopback().await;
    let (second, other) = loopback().await;
    let (mut connection, _events) = connection(endpoint, ConnectionConfig::default());

    connection.open().await.unwrap();
    let _peer = accept(&first).await;
    connection.close().await.unwrap();

    connection.set_port(other.port);
    connection.open().await.unwrap();
    let peer = accept(&second).await;
    connection.send("again").await.unwrap();

    let mut lines = BufReader::new(peer).lines();
    assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("again"));
}

#[tokio::test]
async fn overlong_line_fails_the_connection() {
    let (server, endpoint) = loopback().await;
    let config = ConnectionConfig { max_line_length: 8, ..ConnectionConfig::default() };
    let (mut connection, mut events) = connection(endpoint, config);

    connection.open().await.unwrap();
    let mut peer = accept(&server).await;
    peer.write_all(b"short\nthis line is far too long\n").await.unwrap();

    assert_eq!(next_event(&mut events).await, ConnectionEvent::Message("short".into()));
    match next_event(&mut events).await {
        ConnectionEvent::Failed(reason) => assert!(reason.contains("exceeds"), "{reason}"),
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(next_event(&mut events).await, ConnectionEvent::Closed);
}

#[tokio::test]
async fn open_times_out_when_server_never_answers() {
    // Never-accepting listener: once its backlog is full, new SYNs go unanswered
    let socket = TcpSocket::new_v4().unwrap();
    socket.bind("127.0.0.1:0".parse().unwrap()).unwrap();
    let server = socket.listen(1).unwrap();
    let endpoint = Endpoint::new("127.0.0.1", server.local_addr().unwrap().port());
    let connect_timeout = Duration::from_millis(50);
    let config = ConnectionConfig { connect_timeout, ..ConnectionConfig::default() };

    let mut backlog = Vec::new();
    for _ in 0..64 {
        let (mut connection, events) = connection(endpoint.clone(), config.clone());
        let started = Instant::now();
        match connection.open().await {
            Ok(()) => backlog.push((connection, events)),
            Err(ConnectionError::Timeout { endpoint: target, after }) => {
                assert!(started.elapsed() < WAIT);
                assert_eq!(target, endpoint);
                assert_eq!(after, connect_timeout);
                assert!(!connection.is_open());
                return;
            },
            Err(other) => panic!("expected a timeout, got {other}"),
        }
    }
    panic!("{} connections accepted without a timeout", backlog.len());
}
