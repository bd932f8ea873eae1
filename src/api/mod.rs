mod binding;
mod binding_options;
mod binding_snapshot;
mod binding_state;
mod data_controller;
mod lifecycle_controller;
mod observer_registry;

pub use binding::ChartBinding;
pub use binding_options::{BindingOptions, DEFAULT_ERROR_ATTRIBUTE};
pub use binding_snapshot::BindingSnapshot;
pub use binding_state::{BindingPhase, BindingStats};

use binding_state::BindingCore;
