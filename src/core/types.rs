use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ChartError, ChartResult};

/// Engine-defined chart configuration (type, series, axes, options).
///
/// The binding never inspects or mutates it beyond deserialization; the
/// value is moved into the engine wholesale on every (re)construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartConfig(Value);

impl ChartConfig {
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map(Self)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse chart config: {e}")))
    }

    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Chart type from either a top-level `type` key or a nested `chart.type`.
    #[must_use]
    pub fn chart_type(&self) -> Option<&str> {
        self.0
            .get("type")
            .or_else(|| self.0.get("chart").and_then(|chart| chart.get("type")))
            .and_then(Value::as_str)
    }

    #[must_use]
    pub fn series(&self) -> Option<&Value> {
        self.0.get("series")
    }
}

impl From<Value> for ChartConfig {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Replacement series data forwarded unchanged to `EngineHandle::update_series`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesData(Value);

impl SeriesData {
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for SeriesData {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// One message delivered by an update channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpdatePayload(Value);

impl UpdatePayload {
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map(Self)
            .map_err(|e| ChartError::MalformedPayload(format!("failed to parse payload: {e}")))
    }

    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for UpdatePayload {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
