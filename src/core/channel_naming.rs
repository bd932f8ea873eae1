use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

pub const DEFAULT_CHANNEL_NAMESPACE: &str = "charts";
/// Shared event name used by single-chart views.
pub const LEGACY_CHANNEL_NAME: &str = "chart-data";

/// Policy deriving the update channel a binding subscribes to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum ChannelNaming {
    /// Every binding listens on the same name; only one chart per view can be
    /// addressed unambiguously.
    Fixed { name: String },
    /// `"<namespace>:<element_id>"`, isolated per element.
    PerElement { namespace: String },
}

impl Default for ChannelNaming {
    fn default() -> Self {
        Self::PerElement {
            namespace: DEFAULT_CHANNEL_NAMESPACE.to_owned(),
        }
    }
}

impl ChannelNaming {
    #[must_use]
    pub fn per_element(namespace: impl Into<String>) -> Self {
        Self::PerElement {
            namespace: namespace.into(),
        }
    }

    #[must_use]
    pub fn fixed(name: impl Into<String>) -> Self {
        Self::Fixed { name: name.into() }
    }

    #[must_use]
    pub fn legacy() -> Self {
        Self::fixed(LEGACY_CHANNEL_NAME)
    }

    pub fn channel_name(&self, element_id: &str) -> ChartResult<String> {
        match self {
            Self::Fixed { name } => Ok(name.clone()),
            Self::PerElement { namespace } => {
                if element_id.is_empty() {
                    return Err(ChartError::MissingElementId);
                }
                Ok(format!("{namespace}:{element_id}"))
            }
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        match self {
            Self::Fixed { name } if name.is_empty() => Err(ChartError::InvalidOptions(
                "fixed channel name must not be empty".to_owned(),
            )),
            Self::PerElement { namespace } if namespace.is_empty() => Err(
                ChartError::InvalidOptions("channel namespace must not be empty".to_owned()),
            ),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ChannelNaming;
    use crate::error::ChartError;

    #[test]
    fn per_element_names_are_namespaced() {
        let naming = ChannelNaming::default();
        assert_eq!(
            naming.channel_name("chart-1").expect("name"),
            "charts:chart-1"
        );
        assert_eq!(
            naming.channel_name("").expect_err("anonymous element"),
            ChartError::MissingElementId
        );
    }

    #[test]
    fn fixed_name_ignores_identity() {
        let naming = ChannelNaming::legacy();
        assert_eq!(naming.channel_name("a").expect("name"), "chart-data");
        assert_eq!(naming.channel_name("").expect("name"), "chart-data");
    }

    #[test]
    fn naming_policy_parses_from_tagged_json() {
        let naming: ChannelNaming =
            serde_json::from_str(r#"{"policy":"per_element","namespace":"metrics"}"#)
                .expect("parse");
        assert_eq!(naming, ChannelNaming::per_element("metrics"));
    }
}
