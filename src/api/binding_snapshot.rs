use serde::{Deserialize, Serialize};

use crate::channel::UpdateChannel;
use crate::render::ChartEngine;

use super::{BindingPhase, BindingStats, ChartBinding};

/// Serializable view of a binding for diagnostics and host debugging panels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingSnapshot {
    pub phase: BindingPhase,
    pub element_id: Option<String>,
    pub channel_name: Option<String>,
    pub generation: u64,
    pub has_live_handle: bool,
    pub subscribed: bool,
    pub stats: BindingStats,
}

impl<E: ChartEngine, C: UpdateChannel> ChartBinding<E, C> {
    #[must_use]
    pub fn snapshot(&self) -> BindingSnapshot {
        let core = self.core.borrow();
        BindingSnapshot {
            phase: core.phase,
            element_id: core.element_id.clone(),
            channel_name: core.channel_name.clone(),
            generation: core.generation,
            has_live_handle: core.handle.is_some(),
            subscribed: self.subscription.is_some(),
            stats: core.stats,
        }
    }
}
