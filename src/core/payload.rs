use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ChartError, ChartResult};

use super::{SeriesData, UpdatePayload};

pub const DEFAULT_PAYLOAD_FIELD: &str = "data";
/// Field carrying series data in single-chart views.
pub const LEGACY_PAYLOAD_FIELD: &str = "value";

/// Name of the payload field holding replacement series data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PayloadField(String);

impl Default for PayloadField {
    fn default() -> Self {
        Self(DEFAULT_PAYLOAD_FIELD.to_owned())
    }
}

impl PayloadField {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn legacy() -> Self {
        Self(LEGACY_PAYLOAD_FIELD.to_owned())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Moves the configured field out of `payload`.
    ///
    /// Non-object payloads and missing or `null` fields are rejected.
    pub fn extract(&self, payload: UpdatePayload) -> ChartResult<SeriesData> {
        let Value::Object(mut fields) = payload.into_value() else {
            return Err(ChartError::MalformedPayload(
                "payload must be a JSON object".to_owned(),
            ));
        };
        match fields.remove(&self.0) {
            Some(Value::Null) | None => Err(ChartError::MalformedPayload(format!(
                "payload field `{}` is missing",
                self.0
            ))),
            Some(value) => Ok(SeriesData::new(value)),
        }
    }
}
