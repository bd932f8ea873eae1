//! Observer hooks for binding lifecycle events.
//!
//! Observers only read state; they cannot mutate the binding or its handle.

mod observers;

pub use observers::{BindingContext, BindingEvent, BindingObserver};
