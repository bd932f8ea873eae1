use serde::{Deserialize, Serialize};

use crate::core::{ChannelNaming, DEFAULT_CONFIG_ATTRIBUTE, PayloadField};
use crate::error::{ChartError, ChartResult};

pub const DEFAULT_ERROR_ATTRIBUTE: &str = "data-chart-error";

/// Per-binding configuration.
///
/// Serializable so hosts can ship binding setup next to their markup
/// instead of hard-coding it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingOptions {
    /// Attribute holding the serialized chart config.
    #[serde(default = "default_config_attribute")]
    pub config_attribute: String,
    /// Attribute receiving the error message when a bind cycle fails.
    #[serde(default = "default_error_attribute")]
    pub error_attribute: String,
    #[serde(default)]
    pub channel_naming: ChannelNaming,
    #[serde(default)]
    pub payload_field: PayloadField,
}

impl Default for BindingOptions {
    fn default() -> Self {
        Self {
            config_attribute: default_config_attribute(),
            error_attribute: default_error_attribute(),
            channel_naming: ChannelNaming::default(),
            payload_field: PayloadField::default(),
        }
    }
}

impl BindingOptions {
    /// Single-chart setup: one shared `chart-data` event carrying `value`.
    #[must_use]
    pub fn legacy() -> Self {
        Self {
            channel_naming: ChannelNaming::legacy(),
            payload_field: PayloadField::legacy(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_config_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.config_attribute = attribute.into();
        self
    }

    #[must_use]
    pub fn with_error_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.error_attribute = attribute.into();
        self
    }

    #[must_use]
    pub fn with_channel_naming(mut self, naming: ChannelNaming) -> Self {
        self.channel_naming = naming;
        self
    }

    #[must_use]
    pub fn with_payload_field(mut self, field: PayloadField) -> Self {
        self.payload_field = field;
        self
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let options: Self = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidOptions(format!("failed to parse binding options: {e}"))
        })?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.config_attribute.is_empty() || self.error_attribute.is_empty() {
            return Err(ChartError::InvalidOptions(
                "config and error attribute names must not be empty".to_owned(),
            ));
        }
        if self.config_attribute == self.error_attribute {
            return Err(ChartError::InvalidOptions(format!(
                "config and error attributes must differ (both `{}`)",
                self.config_attribute
            )));
        }
        if self.payload_field.name().is_empty() {
            return Err(ChartError::InvalidOptions(
                "payload field must not be empty".to_owned(),
            ));
        }
        self.channel_naming.validate()
    }
}

fn default_config_attribute() -> String {
    DEFAULT_CONFIG_ATTRIBUTE.to_owned()
}

fn default_error_attribute() -> String {
    DEFAULT_ERROR_ATTRIBUTE.to_owned()
}

#[cfg(test)]
mod tests {
    use super::BindingOptions;
    use crate::core::{ChannelNaming, PayloadField};
    use crate::error::ChartError;

    #[test]
    fn missing_json_fields_fall_back_to_defaults() {
        let options =
            BindingOptions::from_json_str(r#"{"payload_field":"points"}"#).expect("options");
        assert_eq!(options.config_attribute, "data-chart");
        assert_eq!(options.error_attribute, "data-chart-error");
        assert_eq!(options.channel_naming, ChannelNaming::default());
        assert_eq!(options.payload_field, PayloadField::new("points"));
    }

    #[test]
    fn colliding_attributes_are_rejected() {
        let options = BindingOptions::default().with_error_attribute("data-chart");
        assert!(matches!(
            options.validate(),
            Err(ChartError::InvalidOptions(_))
        ));
    }

    #[test]
    fn empty_namespace_is_rejected_from_json() {
        let err = BindingOptions::from_json_str(
            r#"{"channel_naming":{"policy":"per_element","namespace":""}}"#,
        )
        .expect_err("must fail");
        assert!(matches!(err, ChartError::InvalidOptions(_)));
    }
}
