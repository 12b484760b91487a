// SPDX-License-Identifier: MIT
//! Task registry and tick poller.
//!
//! Tasks are registered once, in priority order, and polled every host
//! tick. Each task's entry point answers whether it consumed the tick; the
//! first `true` ends the cycle, so at most one task does work per tick. A
//! task that declines must leave all shared state untouched — gating
//! checks read, never write.
//!
//! Events are different: every task sees every event, whatever the
//! individual handlers answer.

use async_trait::async_trait;
use tracing::{debug, trace};

use crate::events::{BotEvent, MessageOutcome};
use crate::host::Host;
use crate::workflow::WorkflowContext;

/// A cooperatively scheduled unit of bot behavior.
#[async_trait]
pub trait Task: Send {
    /// Unique task name, for logs and host display.
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str {
        ""
    }

    fn author(&self) -> &'static str {
        "maprunner"
    }

    fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    /// Attempt to do work this tick. Returns whether the tick was
    /// consumed. Implementations must not mutate `ctx` on a declined
    /// tick.
    async fn run(&mut self, host: &Host, ctx: &mut WorkflowContext) -> bool;

    /// React to a host event.
    fn message(&mut self, _event: &BotEvent, _ctx: &mut WorkflowContext) -> MessageOutcome {
        MessageOutcome::Unprocessed
    }

    /// Called once when the plugin starts.
    fn start(&mut self) {}

    /// Called once when the plugin stops.
    fn stop(&mut self) {}
}

/// Fixed priority-ordered set of tasks.
pub struct TaskRegistry {
    tasks: Vec<Box<dyn Task>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Append a task. Registration order is priority order.
    pub fn register(&mut self, task: Box<dyn Task>) {
        debug!(task = task.name(), position = self.tasks.len(), "task registered");
        self.tasks.push(task);
    }

    pub fn task_names(&self) -> Vec<&'static str> {
        self.tasks.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Run one tick: poll tasks in priority order, stop at the first that
    /// consumes it. Returns the name of the consuming task, if any.
    pub async fn tick(&mut self, host: &Host, ctx: &mut WorkflowContext) -> Option<&'static str> {
        for task in &mut self.tasks {
            if task.run(host, ctx).await {
                trace!(task = task.name(), "tick consumed");
                return Some(task.name());
            }
        }
        None
    }

    /// Deliver an event to every task. Returns how many handlers
    /// processed it.
    pub fn dispatch(&mut self, event: &BotEvent, ctx: &mut WorkflowContext) -> usize {
        let mut processed = 0;
        for task in &mut self.tasks {
            if task.message(event, ctx) == MessageOutcome::Processed {
                processed += 1;
            }
        }
        trace!(?event, processed, "event dispatched");
        processed
    }

    pub fn start_all(&mut self) {
        for task in &mut self.tasks {
            task.start();
        }
    }

    pub fn stop_all(&mut self) {
        for task in &mut self.tasks {
            task.stop();
        }
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}
