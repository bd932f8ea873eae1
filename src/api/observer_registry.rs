use crate::channel::UpdateChannel;
use crate::error::{ChartError, ChartResult};
use crate::extensions::BindingObserver;
use crate::render::ChartEngine;

use super::ChartBinding;

impl<E: ChartEngine, C: UpdateChannel> ChartBinding<E, C> {
    /// Registers an observer with unique identifier.
    pub fn register_observer(&mut self, observer: Box<dyn BindingObserver>) -> ChartResult<()> {
        let observer_id = observer.id().to_owned();
        if observer_id.is_empty() {
            return Err(ChartError::InvalidData(
                "observer id must not be empty".to_owned(),
            ));
        }
        let mut core = self.core.borrow_mut();
        if core.observers.iter().any(|entry| entry.id() == observer_id) {
            return Err(ChartError::InvalidData(format!(
                "observer with id `{observer_id}` is already registered"
            )));
        }
        core.observers.push(observer);
        Ok(())
    }

    /// Unregisters an observer by id. Returns `true` when removed.
    pub fn unregister_observer(&mut self, observer_id: &str) -> bool {
        let mut core = self.core.borrow_mut();
        let position = core
            .observers
            .iter()
            .position(|entry| entry.id() == observer_id);
        match position {
            Some(position) => {
                core.observers.remove(position);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.core.borrow().observers.len()
    }

    #[must_use]
    pub fn has_observer(&self, observer_id: &str) -> bool {
        self.core
            .borrow()
            .observers
            .iter()
            .any(|observer| observer.id() == observer_id)
    }
}
