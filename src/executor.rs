// SPDX-License-Identifier: MIT
//! Bounded-attempt step executor.
//!
//! Every concrete workflow step — opening the device, clearing a slot,
//! inserting an item, activating, taking a portal — has the same shape:
//! try an action against the world, then poll for the expected state
//! change. Only the action/postcondition pair differs. [`run_step`] is that
//! shape, once.
//!
//! Each attempt invokes the async action; an immediate typed failure code
//! ends the attempt early, otherwise the postcondition is polled at
//! `poll_interval` until it holds or `timeout` elapses. When the attempt
//! budget runs out the failure is reported to the host's error channel and
//! [`StepOutcome::Exhausted`] is returned — the caller ends its tick, the
//! process keeps running.
//!
//! All waiting yields to the scheduler via tokio timers; nothing here ever
//! blocks the host thread, and every wait carries a timeout.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::host::ErrorSink;

// ─── Spec ────────────────────────────────────────────────────────────────────

/// Timing and budget parameters for one step.
#[derive(Debug, Clone)]
pub struct StepSpec {
    /// Step name for logs and fatal reports.
    pub name: String,
    /// Interval between postcondition polls.
    ///
    /// Default: 200 ms
    pub poll_interval: Duration,
    /// Budget for observing the postcondition after a successful action.
    ///
    /// Default: 3 s
    pub timeout: Duration,
    /// Total attempts, including the first.
    ///
    /// Default: 3
    pub max_attempts: u32,
    /// Pause between attempts.
    ///
    /// Default: 500 ms
    pub retry_delay: Duration,
}

impl StepSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            poll_interval: Duration::from_millis(200),
            timeout: Duration::from_secs(3),
            max_attempts: 3,
            retry_delay: Duration::from_millis(500),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Spec suitable for unit tests — microscopic waits, no real delays.
    pub fn instant(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            poll_interval: Duration::from_millis(1),
            timeout: Duration::from_millis(10),
            max_attempts: 3,
            retry_delay: Duration::from_millis(1),
        }
    }
}

/// How a step ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Action succeeded and the postcondition was observed.
    Success,
    /// The attempt budget ran out. Already reported to the error channel.
    Exhausted,
}

impl StepOutcome {
    pub fn is_success(&self) -> bool {
        *self == StepOutcome::Success
    }
}

// ─── Execution ───────────────────────────────────────────────────────────────

/// Poll `condition` every `poll_interval` until it holds or `timeout`
/// elapses. Returns whether the condition was observed.
pub async fn wait_for<P>(mut condition: P, poll_interval: Duration, timeout: Duration) -> bool
where
    P: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(poll_interval).await;
    }
}

/// Run one workflow step to completion or exhaustion.
///
/// `action` drives the world and reports an immediate typed failure, if
/// any; `postcondition` observes whether the world reached the expected
/// state. The postcondition is re-created per poll from current host
/// snapshots, so it must be cheap.
///
/// # Panics
/// Panics if `spec.max_attempts` is 0 (the step would never run).
pub async fn run_step<A, Fut, P, E>(
    spec: &StepSpec,
    errors: &dyn ErrorSink,
    mut action: A,
    mut postcondition: P,
) -> StepOutcome
where
    A: FnMut() -> Fut,
    Fut: Future<Output = Result<(), E>>,
    P: FnMut() -> bool,
    E: std::fmt::Display,
{
    assert!(spec.max_attempts > 0, "StepSpec.max_attempts must be at least 1");

    for attempt in 1..=spec.max_attempts {
        match action().await {
            Err(code) => {
                warn!(
                    step = %spec.name,
                    attempt,
                    max = spec.max_attempts,
                    code = %code,
                    "action failed immediately"
                );
            }
            Ok(()) => {
                if wait_for(&mut postcondition, spec.poll_interval, spec.timeout).await {
                    if attempt > 1 {
                        debug!(step = %spec.name, attempt, "step succeeded after retry");
                    }
                    return StepOutcome::Success;
                }
                warn!(
                    step = %spec.name,
                    attempt,
                    max = spec.max_attempts,
                    timeout_ms = spec.timeout.as_millis(),
                    "postcondition not observed within timeout"
                );
            }
        }

        if attempt < spec.max_attempts {
            tokio::time::sleep(spec.retry_delay).await;
        }
    }

    errors.report_fatal(&spec.name, "attempt budget exhausted");
    StepOutcome::Exhausted
}
