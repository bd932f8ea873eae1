use std::cell::RefCell;
use std::rc::Weak;

use tracing::{trace, warn};

use crate::channel::{PayloadCallback, UpdateChannel};
use crate::core::UpdatePayload;
use crate::error::{ChartError, ChartResult};
use crate::extensions::BindingEvent;
use crate::render::{ChartEngine, EngineHandle};

use super::{BindingCore, ChartBinding};

impl<E: ChartEngine, C: UpdateChannel> ChartBinding<E, C> {
    /// Forwards the payload's series data to the currently live handle.
    ///
    /// Errors are logged and counted as dropped payloads; they never affect
    /// the subscription or the live handle.
    pub fn on_data_event(&self, payload: UpdatePayload) -> ChartResult<()> {
        self.core.borrow_mut().apply_payload(payload)
    }
}

impl<H: EngineHandle> BindingCore<H> {
    pub(super) fn apply_payload(&mut self, payload: UpdatePayload) -> ChartResult<()> {
        let result = self.forward_payload(payload);
        if let Err(err) = &result {
            self.stats.payloads_dropped += 1;
            warn!(
                channel = ?self.channel_name,
                phase = %self.phase,
                error = %err,
                "dropping chart update"
            );
            self.emit(BindingEvent::PayloadDropped {
                reason: err.to_string(),
            });
        }
        result
    }

    fn forward_payload(&mut self, payload: UpdatePayload) -> ChartResult<()> {
        let Some(handle) = self.handle.as_mut() else {
            return Err(ChartError::NoLiveHandle);
        };
        let data = self.payload_field.extract(payload)?;
        handle.update_series(data)?;

        self.stats.updates_applied += 1;
        let generation = self.generation;
        trace!(generation, "applied series update");
        self.emit(BindingEvent::SeriesUpdated { generation });
        Ok(())
    }
}

/// Subscription callback for a binding.
///
/// It only holds a weak reference, so payloads delivered after the binding
/// is gone are ignored instead of reaching a dead handle.
pub(super) fn data_event_callback<H: EngineHandle + 'static>(
    core: Weak<RefCell<BindingCore<H>>>,
) -> PayloadCallback {
    Box::new(move |payload: UpdatePayload| {
        let Some(shared) = core.upgrade() else {
            trace!("binding is gone; ignoring payload");
            return;
        };
        let Ok(mut binding) = shared.try_borrow_mut() else {
            warn!("binding is busy; dropping re-entrant payload");
            return;
        };
        // Failures are already logged and counted by `apply_payload`.
        let _ = binding.apply_payload(payload);
    })
}
