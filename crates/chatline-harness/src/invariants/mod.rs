//! Invariant checking for session testing.
//!
//! Invariants are properties that must hold for every step the session
//! takes, whatever the input. Unlike example-based tests that check specific
//! scenarios, invariants verify behavioral properties across all execution
//! paths.
//!
//! # Architecture
//!
//! A test captures a [`SessionSnapshot`] before and after feeding one line
//! to the session, bundles them into a [`Step`], and runs the registered
//! [`Invariant`] checks against it.
//!
//! # Usage
//!
//! ```ignore
//! let registry = InvariantRegistry::standard();
//! let before = SessionSnapshot::capture(&handle, &display);
//! let signal = session.on_user_input(&line).await.ok();
//! let after = SessionSnapshot::capture(&handle, &display);
//! registry.check_all(&Step { input: line, before, after, signal })?;
//! ```

mod checks;
mod snapshot;

use std::fmt;

pub use checks::{
    ClosedAfterTerminate, CommandsStayLocal, EndpointFrozenWhileOpen, NoCloseWhileClosed,
    NoLocalEcho,
};
pub use snapshot::{SessionSnapshot, Step};

/// Outcome of checking one invariant against one step.
pub type InvariantResult = Result<(), Violation>;

/// A broken invariant and what the step did to break it.
#[derive(Debug, Clone)]
pub struct Violation {
    /// Name of the violated invariant.
    pub invariant: &'static str,
    /// What the step did.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// A property of every session step.
pub trait Invariant: Send + Sync {
    /// Name used in violations.
    fn name(&self) -> &'static str;

    /// Check one step.
    fn check(&self, step: &Step) -> InvariantResult;
}

/// Set of invariants checked together after each step.
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl InvariantRegistry {
    /// Registry holding every session invariant:
    /// - [`EndpointFrozenWhileOpen`]: host/port only change while closed
    /// - [`NoLocalEcho`]: sent payloads are not displayed
    /// - [`CommandsStayLocal`]: commands are never sent
    /// - [`ClosedAfterTerminate`]: termination closes the connection
    /// - [`NoCloseWhileClosed`]: a closed connection is never closed again
    pub fn standard() -> Self {
        Self {
            invariants: vec![
                Box::new(EndpointFrozenWhileOpen),
                Box::new(NoLocalEcho),
                Box::new(CommandsStayLocal),
                Box::new(ClosedAfterTerminate),
                Box::new(NoCloseWhileClosed),
            ],
        }
    }

    /// Check every invariant, collecting all violations.
    pub fn check_all(&self, step: &Step) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> =
            self.invariants.iter().filter_map(|invariant| invariant.check(step).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }
}
