//! End-to-end tests for the console wiring against a loopback server.

use std::time::Duration;

use chatline_console::{Args, ConsoleDisplay, ConsoleError, SETUP_FAILED, run_with};
use chatline_harness::{RecordingDisplay, ScriptedInput};
use clap::Parser;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    net::TcpListener,
    time::timeout,
};

const WAIT: Duration = Duration::from_secs(5);

fn args(extra: &[&str]) -> Args {
    Args::try_parse_from(["chatline", "--host", "127.0.0.1"].iter().chain(extra)).unwrap()
}

#[tokio::test]
async fn unreachable_server_at_startup_is_fatal() {
    let server = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = server.local_addr().unwrap().port().to_string();
    drop(server);
    let display = RecordingDisplay::new();
    let mut input = ScriptedInput::new(["hello"]);

    let result = run_with(&args(&["--port", &port]), &mut input, display.clone()).await;

    assert!(matches!(result, Err(ConsoleError::Setup(_))));
    assert_eq!(display.lines(), vec![SETUP_FAILED]);
    assert_eq!(input.remaining(), 1);
}

#[tokio::test]
async fn no_connect_starts_disconnected() {
    let display = RecordingDisplay::new();
    let input = ScriptedInput::new(["#getport", "#setport 6000", "#logoff", "#quit"]);

    run_with(&args(&["--port", "4000", "--no-connect"]), input, display.clone()).await.unwrap();

    assert_eq!(display.lines(), vec!["Port: 4000", "Port set to 6000", "Already disconnected."]);
}

#[tokio::test]
async fn lines_typed_reach_server() {
    let server = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = server.local_addr().unwrap().port().to_string();
    let peer = tokio::spawn(async move {
        let (stream, _) = server.accept().await.unwrap();
        let mut lines = BufReader::new(stream).lines();
        let mut received = Vec::new();
        while let Some(line) = lines.next_line().await.unwrap() {
            received.push(line);
        }
        received
    });

    let input = ScriptedInput::new(["hello", "#gethost", "bye"]);
    let mut out = ConsoleDisplay::new(Vec::new());
    run_with(&args(&["--port", &port]), input, &mut out).await.unwrap();

    let received = timeout(WAIT, peer).await.unwrap().unwrap();
    assert_eq!(received, vec!["hello", "bye"]);
    let shown = String::from_utf8(out.into_inner()).unwrap();
    insta::assert_snapshot!(shown.trim_end(), @"Host: 127.0.0.1");
}
