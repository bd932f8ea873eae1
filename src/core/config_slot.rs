use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{ChartError, ChartResult};

use super::{ChartConfig, HostElement};

/// Attribute read by default when extracting chart configuration.
pub const DEFAULT_CONFIG_ATTRIBUTE: &str = "data-chart";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSlotState {
    /// The host wrote a config blob that has not been read yet.
    Pending,
    /// No blob is waiting; the last one (if any) was already taken.
    Consumed,
}

/// One-shot config slot backed by a single element attribute.
///
/// The host writes the slot on every structural render; `take` reads and
/// clears it in one step, so a blob is never observed twice.
pub struct ConfigSlot<'a, E: HostElement + ?Sized> {
    element: &'a mut E,
    attribute: &'a str,
}

impl<'a, E: HostElement + ?Sized> ConfigSlot<'a, E> {
    #[must_use]
    pub fn new(element: &'a mut E, attribute: &'a str) -> Self {
        Self { element, attribute }
    }

    #[must_use]
    pub fn state(&self) -> ConfigSlotState {
        if self.element.attribute(self.attribute).is_some() {
            ConfigSlotState::Pending
        } else {
            ConfigSlotState::Consumed
        }
    }

    /// Removes the attribute and deserializes it.
    ///
    /// The slot is `Consumed` afterwards even when parsing fails.
    pub fn take(self) -> ChartResult<ChartConfig> {
        let Self { element, attribute } = self;
        let raw = element
            .remove_attribute(attribute)
            .ok_or_else(|| ChartError::MalformedConfig {
                attribute: attribute.to_owned(),
                reason: "attribute is missing".to_owned(),
            })?;
        trace!(attribute, bytes = raw.len(), "consumed config slot");
        serde_json::from_str(&raw).map_err(|e| ChartError::MalformedConfig {
            attribute: attribute.to_owned(),
            reason: e.to_string(),
        })
    }
}

/// Reads, clears and deserializes the config attribute of `element`.
pub fn extract_config<E: HostElement + ?Sized>(
    element: &mut E,
    attribute: &str,
) -> ChartResult<ChartConfig> {
    ConfigSlot::new(element, attribute).take()
}
