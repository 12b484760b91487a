//! Inbound host events.
//!
//! The bot runtime delivers these to the plugin, which fans each one out to
//! every registered task's message handler. A handler answers with
//! [`MessageOutcome`] so the host can tell which tasks reacted; delivery is
//! unconditional either way.

/// An event fired by the host runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotEvent {
    /// The player transitioned to a different area. Aborts any in-flight
    /// workflow instance; entering a map-capable area starts a fresh one.
    AreaChanged,
    /// The player stepped into a freshly opened map. Terminal for the
    /// current workflow instance.
    NewMapEntered,
    /// A named reset signal from another plugin or the host UI.
    Reset(String),
}

impl BotEvent {
    /// Convenience constructor for custom reset identifiers.
    pub fn reset(id: impl Into<String>) -> Self {
        Self::Reset(id.into())
    }
}

/// What a task's message handler did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    Processed,
    Unprocessed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_constructor_wraps_id() {
        assert_eq!(
            BotEvent::reset("consumables"),
            BotEvent::Reset("consumables".to_string())
        );
    }
}
