mod null_engine;

pub use null_engine::{EngineCall, NullChartHandle, NullEngine};

use crate::core::{ChartConfig, SeriesData};
use crate::error::ChartResult;

/// Factory side of the charting engine contract.
///
/// Implementations turn a config into a live, mutable chart drawn into the
/// element identified by `element_id`.
pub trait ChartEngine {
    type Handle: EngineHandle + 'static;

    fn construct(&mut self, element_id: &str, config: ChartConfig) -> ChartResult<Self::Handle>;
}

/// One live chart instance.
pub trait EngineHandle {
    fn render(&mut self) -> ChartResult<()>;

    /// Replaces series data in place without touching the chart config.
    fn update_series(&mut self, data: SeriesData) -> ChartResult<()>;

    /// Releases the chart and its drawing surface. Must be idempotent.
    fn destroy(&mut self);
}
