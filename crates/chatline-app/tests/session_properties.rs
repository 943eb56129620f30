//! Property-based tests for Session invariants.
//!
//! Random input sequences are fed to a session backed by a simulated
//! connection. After every line the standard invariant registry checks the
//! observable state change, so properties hold across all execution paths
//! rather than hand-picked scenarios.

use chatline_app::{Endpoint, Session, Signal};
use chatline_harness::{
    InvariantRegistry, RecordingDisplay, SessionSnapshot, SimConnection, SimHandle, Step,
};
use proptest::prelude::*;
use tokio::sync::mpsc;

/// One user line: a command, a near-miss command, or a payload.
fn line() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("#quit".to_string()),
        Just("#logoff".to_string()),
        Just("#login".to_string()),
        Just("#gethost".to_string()),
        Just("#getport".to_string()),
        "[a-z]{1,8}".prop_map(|host| format!("#sethost {host}")),
        (0u32..70_000).prop_map(|port| format!("#setport {port}")),
        "[a-z ]{0,6}".prop_map(|arg| format!("#setport {arg}")),
        "#[a-zA-Z]{0,8}",
        "[^#\r\n][^\r\n]{0,20}",
    ]
}

fn session(open: bool) -> (Session<SimConnection, RecordingDisplay>, SimHandle, RecordingDisplay) {
    let (listener, _events) = mpsc::unbounded_channel();
    let endpoint = Endpoint::new("localhost", 5555);
    let connection = if open {
        SimConnection::open_to(endpoint, listener)
    } else {
        SimConnection::new(endpoint, listener)
    };
    let handle = connection.handle();
    let display = RecordingDisplay::new();
    (Session::new(connection, display.clone()), handle, display)
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("build runtime")
        .block_on(future)
}

proptest! {
    #[test]
    fn invariants_hold_for_any_input(
        start_open in any::<bool>(),
        lines in prop::collection::vec(line(), 1..40),
    ) {
        let (mut session, handle, display) = session(start_open);
        let registry = InvariantRegistry::standard();

        let violations = block_on(async {
            for input in lines {
                let before = SessionSnapshot::capture(&handle, &display);
                let signal = session.on_user_input(&input).await.ok();
                let after = SessionSnapshot::capture(&handle, &display);

                let step = Step { input, before, after, signal };
                if let Err(violations) = registry.check_all(&step) {
                    return violations;
                }
                if signal.is_some_and(Signal::is_terminate) {
                    break;
                }
            }
            Vec::new()
        });

        prop_assert!(violations.is_empty(), "violations: {violations:?}");
    }

    #[test]
    fn getters_report_last_accepted_values(
        hosts in prop::collection::vec("[a-z]{1,8}", 1..5),
        ports in prop::collection::vec(1u16.., 1..5),
    ) {
        let (mut session, _handle, display) = session(false);

        block_on(async {
            for host in &hosts {
                let _ = session.on_user_input(&format!("#sethost {host}")).await;
            }
            for port in &ports {
                let _ = session.on_user_input(&format!("#setport {port}")).await;
            }
            let _ = session.on_user_input("#gethost").await;
            let _ = session.on_user_input("#getport").await;
        });

        let lines = display.lines();
        let n = lines.len();
        prop_assert_eq!(&lines[n - 2], &format!("Host: {}", hosts[hosts.len() - 1]));
        prop_assert_eq!(&lines[n - 1], &format!("Port: {}", ports[ports.len() - 1]));
    }

    #[test]
    fn payloads_reach_server_unchanged(payload in "[^#\r\n][^\r\n]{0,40}") {
        let (mut session, handle, display) = session(true);

        let signal = block_on(session.on_user_input(&payload));

        prop_assert!(matches!(signal, Ok(Signal::Continue)));
        prop_assert_eq!(handle.sent(), vec![payload]);
        prop_assert!(display.is_empty());
    }
}
