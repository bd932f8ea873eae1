use serde::{Deserialize, Serialize};

use crate::api::BindingPhase;

/// Read-only state snapshot passed to observer hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingContext {
    pub phase: BindingPhase,
    pub generation: u64,
    pub updates_applied: u64,
}

/// Event stream exposed to observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindingEvent {
    Attached { channel: String },
    Reconstructed { generation: u64 },
    SeriesUpdated { generation: u64 },
    PayloadDropped { reason: String },
    ConfigRejected { reason: String },
    Detached,
}

/// Hook interface for host-side instrumentation (error banners, metrics,
/// test recorders).
pub trait BindingObserver {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: &BindingEvent, context: BindingContext);
}
