//! chart-hook: element-bound lifecycle adapter for charting engines.
//!
//! A [`ChartBinding`] owns one chart instance for one host element. It
//! consumes the element's serialized config, rebuilds the chart on
//! structural re-renders, and forwards series updates pushed over a
//! per-element update channel to whichever handle is live.

pub mod api;
pub mod channel;
pub mod core;
pub mod error;
pub mod extensions;
pub mod render;
pub mod telemetry;

pub use api::{BindingOptions, BindingPhase, ChartBinding};
pub use error::{ChartError, ChartResult};
