//! Concrete workflow tasks, in scheduling priority order:
//!
//! 1. [`FetchConsumablesTask`] — pull missing consumables from storage
//!    before the device run starts.
//! 2. [`OpenDeviceTask`] — the device workflow itself: open, clear, load,
//!    activate, take the portal.

mod fetch_consumables;
mod open_device;

pub use fetch_consumables::FetchConsumablesTask;
pub use open_device::OpenDeviceTask;
