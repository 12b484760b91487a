//! maprunner — map-device workflow orchestration for bot-runtime plugins.
//!
//! The host owns the game world and drives the plugin through its tick
//! loop; this crate owns the decision-making: which task runs this tick,
//! how a step retries, how consumable requirements are resolved and
//! gathered. See [`host`] for the contracts a runtime adapter implements
//! and [`MapRunner`] for the entry point.

pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod executor;
pub mod host;
pub mod plan;
pub mod registry;
pub mod retrieval;
pub mod signals;
pub mod tasks;
pub mod workflow;

pub use config::BotConfig;
pub use events::{BotEvent, MessageOutcome};
pub use executor::{run_step, wait_for, StepOutcome, StepSpec};
pub use host::Host;
pub use plan::{resolve_quantities, ItemRequirement, Plan};
pub use registry::{Task, TaskRegistry};
pub use retrieval::{deficits, gather, GatherReport};
pub use signals::{Signal, SignalBus};
pub use workflow::{WorkflowContext, WorkflowState};

use std::sync::Arc;

use tracing::{debug, info};

use tasks::{FetchConsumablesTask, OpenDeviceTask};

/// The plugin root: owns the task registry and the per-instance workflow
/// context, and translates host callbacks into registry calls.
///
/// The host drives three entry points: [`tick`](Self::tick) once per
/// scheduler round, [`handle_event`](Self::handle_event) for every inbound
/// event, and [`start`](Self::start)/[`stop`](Self::stop) around the
/// plugin lifecycle.
pub struct MapRunner {
    host: Host,
    config: Arc<BotConfig>,
    registry: TaskRegistry,
    ctx: WorkflowContext,
}

impl MapRunner {
    /// Build the plugin with its fixed task set, highest priority first.
    pub fn new(host: Host, config: BotConfig) -> Self {
        let config = Arc::new(config);
        let mut registry = TaskRegistry::new();
        registry.register(Box::new(FetchConsumablesTask::new(Arc::clone(&config))));
        registry.register(Box::new(OpenDeviceTask::new(Arc::clone(&config))));

        Self {
            host,
            config,
            registry,
            ctx: WorkflowContext::new(),
        }
    }

    pub fn start(&mut self) {
        info!(tasks = ?self.registry.task_names(), "maprunner started");
        self.registry.start_all();
    }

    pub fn stop(&mut self) {
        self.registry.stop_all();
        info!("maprunner stopped");
    }

    /// One scheduler round. Returns the name of the task that consumed the
    /// tick, if any did.
    pub async fn tick(&mut self) -> Option<&'static str> {
        self.registry.tick(&self.host, &mut self.ctx).await
    }

    /// Feed an inbound host event through the lifecycle rules, then fan it
    /// out to every task.
    pub fn handle_event(&mut self, event: &BotEvent) {
        match event {
            BotEvent::AreaChanged => {
                // Any area change aborts whatever was in flight.
                self.ctx.begin_instance();
                if self.host.world.is_hideout_area() {
                    self.ctx.signals.set(Signal::DeviceRunPending);
                    debug!(instance = %self.ctx.instance_id, "map-capable area — device run armed");
                }
            }
            BotEvent::NewMapEntered => {
                let entered = self.ctx.signals.incr("maps-entered");
                info!(entered, "new map entered");
            }
            BotEvent::Reset(_) => {}
        }
        self.registry.dispatch(event, &mut self.ctx);
    }

    /// Read access to the current workflow instance.
    pub fn context(&self) -> &WorkflowContext {
        &self.ctx
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }
}
