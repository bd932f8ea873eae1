use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChartError {
    #[error("malformed chart config in `{attribute}`: {reason}")]
    MalformedConfig { attribute: String, reason: String },

    #[error("chart engine rejected config: {0}")]
    EngineConstruction(String),

    #[error("chart engine update failed: {0}")]
    EngineUpdate(String),

    #[error("malformed update payload: {0}")]
    MalformedPayload(String),

    #[error("no live chart handle to receive update")]
    NoLiveHandle,

    #[error("element has no identity to derive a channel name from")]
    MissingElementId,

    #[error("element identity changed: expected `{expected}`, got `{actual}`")]
    ElementMismatch { expected: String, actual: String },

    #[error("cannot {operation} a binding in phase {phase}")]
    InvalidLifecycle {
        operation: &'static str,
        phase: &'static str,
    },

    #[error("invalid binding options: {0}")]
    InvalidOptions(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
