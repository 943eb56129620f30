//! Standard invariant checks.
//!
//! These invariants capture behavioral properties that must always hold.
//! They verify WHAT must be true, not specific test scenarios.

use super::{Invariant, InvariantResult, Step, Violation};

/// Endpoint must not change while the connection is open.
///
/// Changing host or port mid-session would silently redirect traffic to a
/// different peer.
pub struct EndpointFrozenWhileOpen;

impl Invariant for EndpointFrozenWhileOpen {
    fn name(&self) -> &'static str {
        "EndpointFrozenWhileOpen"
    }

    fn check(&self, step: &Step) -> InvariantResult {
        if step.before.open && step.after.endpoint != step.before.endpoint {
            return Err(Violation {
                invariant: self.name(),
                message: format!(
                    "{:?} changed endpoint {} -> {} while open",
                    step.input, step.before.endpoint, step.after.endpoint
                ),
            });
        }
        Ok(())
    }
}

/// A payload that was sent must not be echoed locally.
pub struct NoLocalEcho;

impl Invariant for NoLocalEcho {
    fn name(&self) -> &'static str {
        "NoLocalEcho"
    }

    fn check(&self, step: &Step) -> InvariantResult {
        let delivered = step.after.sent > step.before.sent;
        if !step.is_command() && delivered && step.after.shown != step.before.shown {
            return Err(Violation {
                invariant: self.name(),
                message: format!("payload {:?} produced display output", step.input),
            });
        }
        Ok(())
    }
}

/// Commands never reach the server; a payload is sent at most once.
pub struct CommandsStayLocal;

impl Invariant for CommandsStayLocal {
    fn name(&self) -> &'static str {
        "CommandsStayLocal"
    }

    fn check(&self, step: &Step) -> InvariantResult {
        let sends = step.after.sent.saturating_sub(step.before.sent);
        let allowed = usize::from(!step.is_command());
        if sends > allowed {
            return Err(Violation {
                invariant: self.name(),
                message: format!("{:?} caused {sends} sends, at most {allowed} allowed", step.input),
            });
        }
        Ok(())
    }
}

/// Termination leaves the connection closed.
pub struct ClosedAfterTerminate;

impl Invariant for ClosedAfterTerminate {
    fn name(&self) -> &'static str {
        "ClosedAfterTerminate"
    }

    fn check(&self, step: &Step) -> InvariantResult {
        let terminated = step.signal.is_some_and(|signal| signal.is_terminate());
        if terminated && step.after.open {
            return Err(Violation {
                invariant: self.name(),
                message: format!("{:?} terminated with the connection still open", step.input),
            });
        }
        Ok(())
    }
}

/// A connection that is already closed is never closed again.
///
/// `#logoff` and `#quit` on a closed connection only report; they must not
/// reach the transport.
pub struct NoCloseWhileClosed;

impl Invariant for NoCloseWhileClosed {
    fn name(&self) -> &'static str {
        "NoCloseWhileClosed"
    }

    fn check(&self, step: &Step) -> InvariantResult {
        if !step.before.open && step.after.close_calls > step.before.close_calls {
            return Err(Violation {
                invariant: self.name(),
                message: format!("{:?} closed a connection that was not open", step.input),
            });
        }
        Ok(())
    }
}
