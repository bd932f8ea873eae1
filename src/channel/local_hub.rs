use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use smallvec::SmallVec;
use tracing::{trace, warn};

use crate::core::UpdatePayload;
use crate::error::{ChartError, ChartResult};

use super::{PayloadCallback, SubscriptionId, UpdateChannel};

type SharedCallback = Rc<RefCell<PayloadCallback>>;

struct HubSubscription {
    channel: String,
    callback: SharedCallback,
}

#[derive(Default)]
struct HubState {
    next_id: u64,
    subscriptions: BTreeMap<SubscriptionId, HubSubscription>,
}

/// Single-threaded pub/sub hub.
///
/// Clones share one subscription table, so the host can keep a handle for
/// publishing while bindings hold their own for subscribing.
#[derive(Clone, Default)]
pub struct LocalChannelHub {
    state: Rc<RefCell<HubState>>,
}

impl LocalChannelHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `payload` to every subscriber of `channel` in subscription
    /// order. Returns the number of callbacks invoked.
    pub fn publish(&self, channel: &str, payload: UpdatePayload) -> usize {
        // Snapshot targets so callbacks may subscribe/unsubscribe while we deliver.
        let targets: SmallVec<[(SubscriptionId, SharedCallback); 4]> = self
            .state
            .borrow()
            .subscriptions
            .iter()
            .filter(|(_, entry)| entry.channel == channel)
            .map(|(id, entry)| (*id, Rc::clone(&entry.callback)))
            .collect();

        let mut delivered = 0;
        for (id, callback) in targets {
            if !self.state.borrow().subscriptions.contains_key(&id) {
                trace!(channel, subscription = id.0, "skip cancelled subscription");
                continue;
            }
            let Ok(mut callback) = callback.try_borrow_mut() else {
                warn!(
                    channel,
                    subscription = id.0,
                    "dropping re-entrant delivery to a running callback"
                );
                continue;
            };
            (*callback)(payload.clone());
            delivered += 1;
        }
        trace!(channel, delivered, "published payload");
        delivered
    }

    #[must_use]
    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.state
            .borrow()
            .subscriptions
            .values()
            .filter(|entry| entry.channel == channel)
            .count()
    }

    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.state.borrow().subscriptions.len()
    }
}

impl UpdateChannel for LocalChannelHub {
    fn subscribe(
        &mut self,
        channel: &str,
        callback: PayloadCallback,
    ) -> ChartResult<SubscriptionId> {
        if channel.is_empty() {
            return Err(ChartError::InvalidData(
                "channel name must not be empty".to_owned(),
            ));
        }
        let mut state = self.state.borrow_mut();
        state.next_id = state.next_id.saturating_add(1);
        let id = SubscriptionId(state.next_id);
        state.subscriptions.insert(
            id,
            HubSubscription {
                channel: channel.to_owned(),
                callback: Rc::new(RefCell::new(callback)),
            },
        );
        trace!(channel, subscription = id.0, "subscribed");
        Ok(id)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.state.borrow_mut().subscriptions.remove(&id).is_some()
    }
}
