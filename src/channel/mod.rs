//! Update channel contract and the in-process hub.

mod local_hub;

pub use local_hub::LocalChannelHub;

use serde::{Deserialize, Serialize};

use crate::core::UpdatePayload;
use crate::error::ChartResult;

/// Callback invoked once per delivered payload, in delivery order.
pub type PayloadCallback = Box<dyn FnMut(UpdatePayload)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub u64);

/// Named pub/sub transport delivering payloads to subscribers.
pub trait UpdateChannel {
    fn subscribe(&mut self, channel: &str, callback: PayloadCallback)
    -> ChartResult<SubscriptionId>;

    /// Cancels a subscription. Returns `true` when it was active.
    ///
    /// No payload may reach the callback after this returns.
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;
}
