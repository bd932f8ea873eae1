pub mod channel_naming;
pub mod config_slot;
pub mod element;
pub mod payload;
pub mod types;

pub use channel_naming::{ChannelNaming, DEFAULT_CHANNEL_NAMESPACE, LEGACY_CHANNEL_NAME};
pub use config_slot::{ConfigSlot, ConfigSlotState, DEFAULT_CONFIG_ATTRIBUTE, extract_config};
pub use element::{Element, HostElement};
pub use payload::{DEFAULT_PAYLOAD_FIELD, LEGACY_PAYLOAD_FIELD, PayloadField};
pub use types::{ChartConfig, SeriesData, UpdatePayload};
