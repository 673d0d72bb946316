/// Convenience result type used across the crate.
pub type RevealResult<T> = Result<T, RevealError>;

/// Top-level error taxonomy used by orchestration APIs.
///
/// Only [`RevealError::Validation`] and [`RevealError::Serde`] ever reach a caller of the
/// public API. Capability and subscriber failures are recovered where they happen and only
/// show up in logs.
#[derive(thiserror::Error, Debug)]
pub enum RevealError {
    /// Invalid caller-provided configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// A host primitive (scroll events, visibility detection) is unavailable.
    #[error("missing capability: {0}")]
    MissingCapability(String),

    /// A registered callback reported a failure.
    #[error("subscriber fault: {0}")]
    Subscriber(String),

    /// Errors when serializing or deserializing page configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RevealError {
    /// Build a [`RevealError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RevealError::MissingCapability`] value.
    pub fn missing_capability(msg: impl Into<String>) -> Self {
        Self::MissingCapability(msg.into())
    }

    /// Build a [`RevealError::Subscriber`] value.
    pub fn subscriber(msg: impl Into<String>) -> Self {
        Self::Subscriber(msg.into())
    }

    /// Build a [`RevealError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for RevealError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
