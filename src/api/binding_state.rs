use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{ChartConfig, PayloadField};
use crate::error::{ChartError, ChartResult};
use crate::extensions::{BindingContext, BindingEvent, BindingObserver};
use crate::render::{ChartEngine, EngineHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindingPhase {
    /// Created but not attached yet, or the attach attempt failed.
    Unattached,
    /// Subscribed with exactly one live handle.
    Live,
    /// Subscribed, but the last reconstruction failed and no handle is live.
    Faulted,
    /// Torn down. Terminal.
    Detached,
}

impl BindingPhase {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unattached => "unattached",
            Self::Live => "live",
            Self::Faulted => "faulted",
            Self::Detached => "detached",
        }
    }
}

impl fmt::Display for BindingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifetime counters for one binding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingStats {
    pub constructed: u64,
    pub destroyed: u64,
    pub updates_applied: u64,
    pub payloads_dropped: u64,
    pub config_failures: u64,
}

/// State shared between the binding and its subscription callback.
pub(super) struct BindingCore<H: EngineHandle> {
    pub(super) phase: BindingPhase,
    pub(super) element_id: Option<String>,
    pub(super) channel_name: Option<String>,
    pub(super) handle: Option<H>,
    pub(super) generation: u64,
    pub(super) stats: BindingStats,
    pub(super) payload_field: PayloadField,
    pub(super) observers: Vec<Box<dyn BindingObserver>>,
}

impl<H: EngineHandle> BindingCore<H> {
    #[must_use]
    pub(super) fn new(payload_field: PayloadField) -> Self {
        Self {
            phase: BindingPhase::Unattached,
            element_id: None,
            channel_name: None,
            handle: None,
            generation: 0,
            stats: BindingStats::default(),
            payload_field,
            observers: Vec::new(),
        }
    }

    #[must_use]
    pub(super) fn context(&self) -> BindingContext {
        BindingContext {
            phase: self.phase,
            generation: self.generation,
            updates_applied: self.stats.updates_applied,
        }
    }

    pub(super) fn emit(&mut self, event: BindingEvent) {
        let context = self.context();
        for observer in &mut self.observers {
            observer.on_event(&event, context);
        }
    }

    /// Constructs and renders a handle. A handle whose first render fails is
    /// destroyed before the error is returned.
    pub(super) fn construct_handle<E>(
        &mut self,
        engine: &mut E,
        element_id: &str,
        config: ChartConfig,
    ) -> ChartResult<H>
    where
        E: ChartEngine<Handle = H>,
    {
        let chart_type = config.chart_type().map(str::to_owned);
        let mut handle = match engine.construct(element_id, config) {
            Ok(handle) => handle,
            Err(err) => return Err(self.reject_config(err)),
        };
        self.stats.constructed += 1;

        if let Err(err) = handle.render() {
            handle.destroy();
            self.stats.destroyed += 1;
            return Err(self.reject_config(err));
        }
        debug!(element_id, chart_type = ?chart_type, "constructed chart handle");
        Ok(handle)
    }

    fn reject_config(&mut self, err: ChartError) -> ChartError {
        self.stats.config_failures += 1;
        self.emit(BindingEvent::ConfigRejected {
            reason: err.to_string(),
        });
        err
    }

    /// Undoes a handle installed by an attach whose subscription failed.
    pub(super) fn abandon_attach(&mut self) {
        if self.retire_handle() {
            self.generation -= 1;
        }
        self.element_id = None;
        self.channel_name = None;
        self.phase = BindingPhase::Unattached;
    }

    /// Installs a freshly built handle. The previous one must be retired.
    pub(super) fn install_handle(&mut self, handle: H) {
        debug_assert!(self.handle.is_none(), "previous handle still live");
        self.generation += 1;
        self.handle = Some(handle);
    }

    /// Destroys the live handle, if any. Returns `true` when one was retired.
    pub(super) fn retire_handle(&mut self) -> bool {
        let Some(mut handle) = self.handle.take() else {
            return false;
        };
        handle.destroy();
        self.stats.destroyed += 1;
        debug!(generation = self.generation, "retired chart handle");
        true
    }
}
