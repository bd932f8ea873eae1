use std::cell::RefCell;
use std::rc::Rc;

use crate::channel::{SubscriptionId, UpdateChannel};
use crate::error::ChartResult;
use crate::render::ChartEngine;

use super::{BindingCore, BindingOptions, BindingPhase, BindingStats};

/// Lifecycle controller binding one chart instance to one host element.
///
/// The host framework drives it through `on_attach`,
/// `on_structural_update` and `on_detach`; the update channel drives
/// `on_data_event` through the subscription established at attach time.
pub struct ChartBinding<E: ChartEngine, C: UpdateChannel> {
    pub(super) engine: E,
    pub(super) channel: C,
    pub(super) options: BindingOptions,
    pub(super) core: Rc<RefCell<BindingCore<E::Handle>>>,
    pub(super) subscription: Option<SubscriptionId>,
}

impl<E: ChartEngine, C: UpdateChannel> ChartBinding<E, C> {
    pub fn new(engine: E, channel: C, options: BindingOptions) -> ChartResult<Self> {
        options.validate()?;
        let core = BindingCore::new(options.payload_field.clone());
        Ok(Self {
            engine,
            channel,
            options,
            core: Rc::new(RefCell::new(core)),
            subscription: None,
        })
    }

    #[must_use]
    pub fn phase(&self) -> BindingPhase {
        self.core.borrow().phase
    }

    /// Number of handles installed so far; identifies the live one.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.core.borrow().generation
    }

    #[must_use]
    pub fn has_live_handle(&self) -> bool {
        self.core.borrow().handle.is_some()
    }

    #[must_use]
    pub fn element_id(&self) -> Option<String> {
        self.core.borrow().element_id.clone()
    }

    #[must_use]
    pub fn channel_name(&self) -> Option<String> {
        self.core.borrow().channel_name.clone()
    }

    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    #[must_use]
    pub fn stats(&self) -> BindingStats {
        self.core.borrow().stats
    }

    #[must_use]
    pub fn options(&self) -> &BindingOptions {
        &self.options
    }

    #[must_use]
    pub fn engine(&self) -> &E {
        &self.engine
    }
}

impl<E: ChartEngine, C: UpdateChannel> Drop for ChartBinding<E, C> {
    fn drop(&mut self) {
        if self.phase() != BindingPhase::Detached {
            self.on_detach();
        }
    }
}
