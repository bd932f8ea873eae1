use std::rc::Rc;

use tracing::{debug, warn};

use crate::channel::UpdateChannel;
use crate::core::{ChartConfig, ConfigSlot, ConfigSlotState, HostElement, extract_config};
use crate::error::{ChartError, ChartResult};
use crate::extensions::BindingEvent;
use crate::render::ChartEngine;

use super::data_controller::data_event_callback;
use super::{BindingPhase, ChartBinding};

impl<E: ChartEngine, C: UpdateChannel> ChartBinding<E, C> {
    /// Binds to `element`: consumes its config attribute, constructs and
    /// renders the chart, then subscribes to the element's update channel.
    ///
    /// Any failure leaves no live handle and no subscription, and writes the
    /// error into the element's error attribute.
    pub fn on_attach<H: HostElement + ?Sized>(&mut self, element: &mut H) -> ChartResult<()> {
        let phase = self.phase();
        if phase != BindingPhase::Unattached {
            return Err(ChartError::InvalidLifecycle {
                operation: "attach",
                phase: phase.as_str(),
            });
        }
        let result = self.attach(element);
        self.report_outcome(element, &result);
        result
    }

    /// Rebuilds the chart from the element's fresh config.
    ///
    /// The old handle is destroyed before the new one is constructed. An
    /// update with no pending config keeps the live chart untouched, and so
    /// does a malformed config. An engine failure leaves the binding
    /// `Faulted` until the next successful update.
    pub fn on_structural_update<H: HostElement + ?Sized>(
        &mut self,
        element: &mut H,
    ) -> ChartResult<()> {
        let phase = self.phase();
        if !matches!(phase, BindingPhase::Live | BindingPhase::Faulted) {
            return Err(ChartError::InvalidLifecycle {
                operation: "update",
                phase: phase.as_str(),
            });
        }
        let result = self.reconstruct(element);
        self.report_outcome(element, &result);
        result
    }

    /// Cancels the subscription and destroys the live handle. Idempotent.
    pub fn on_detach(&mut self) {
        if let Some(id) = self.subscription.take() {
            if !self.channel.unsubscribe(id) {
                debug!(subscription = id.0, "subscription was already cancelled");
            }
        }

        let mut core = self.core.borrow_mut();
        if core.phase == BindingPhase::Detached {
            return;
        }
        let retired = core.retire_handle();
        core.phase = BindingPhase::Detached;
        core.emit(BindingEvent::Detached);
        debug!(
            element_id = ?core.element_id,
            retired,
            "detached chart binding"
        );
    }

    fn attach<H: HostElement + ?Sized>(&mut self, element: &mut H) -> ChartResult<()> {
        let element_id = element.id().to_owned();
        let channel_name = self.options.channel_naming.channel_name(&element_id)?;
        let config = self.take_config(element)?;

        {
            let mut core = self.core.borrow_mut();
            let handle = core.construct_handle(&mut self.engine, &element_id, config)?;
            core.install_handle(handle);
            core.element_id = Some(element_id);
            core.channel_name = Some(channel_name.clone());
        }

        // The core must not be borrowed here: transports may deliver
        // synchronously from inside `subscribe`.
        let callback = data_event_callback(Rc::downgrade(&self.core));
        let subscribed = self.channel.subscribe(&channel_name, callback);
        let mut core = self.core.borrow_mut();
        let subscription = match subscribed {
            Ok(id) => id,
            Err(err) => {
                core.abandon_attach();
                return Err(err);
            }
        };

        self.subscription = Some(subscription);
        core.phase = BindingPhase::Live;
        debug!(
            channel = %channel_name,
            subscription = subscription.0,
            "attached chart binding"
        );
        core.emit(BindingEvent::Attached {
            channel: channel_name,
        });
        Ok(())
    }

    fn reconstruct<H: HostElement + ?Sized>(&mut self, element: &mut H) -> ChartResult<()> {
        let element_id = self.core.borrow().element_id.clone().unwrap_or_default();
        if element.id() != element_id {
            return Err(ChartError::ElementMismatch {
                expected: element_id,
                actual: element.id().to_owned(),
            });
        }
        let slot = ConfigSlot::new(element, &self.options.config_attribute);
        if slot.state() == ConfigSlotState::Consumed && self.phase() == BindingPhase::Live {
            debug!(%element_id, "no pending config; keeping current chart");
            return Ok(());
        }
        let config = self.take_config(element)?;

        let mut core = self.core.borrow_mut();
        core.retire_handle();
        match core.construct_handle(&mut self.engine, &element_id, config) {
            Ok(handle) => {
                core.install_handle(handle);
                core.phase = BindingPhase::Live;
                let generation = core.generation;
                core.emit(BindingEvent::Reconstructed { generation });
                Ok(())
            }
            Err(err) => {
                core.phase = BindingPhase::Faulted;
                Err(err)
            }
        }
    }

    fn take_config<H: HostElement + ?Sized>(&self, element: &mut H) -> ChartResult<ChartConfig> {
        extract_config(element, &self.options.config_attribute).inspect_err(|err| {
            let mut core = self.core.borrow_mut();
            core.stats.config_failures += 1;
            core.emit(BindingEvent::ConfigRejected {
                reason: err.to_string(),
            });
        })
    }

    fn report_outcome<H: HostElement + ?Sized>(&self, element: &mut H, result: &ChartResult<()>) {
        let attribute = self.options.error_attribute.as_str();
        match result {
            Ok(()) => {
                element.remove_attribute(attribute);
            }
            Err(err) => {
                warn!(
                    element_id = element.id(),
                    error = %err,
                    "chart bind cycle failed"
                );
                // A mismatched element is not the one this binding owns.
                if !matches!(err, ChartError::ElementMismatch { .. }) {
                    element.set_attribute(attribute, err.to_string());
                }
            }
        }
    }
}
