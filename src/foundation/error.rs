/// Convenience result type used across keyline.
pub type KeylineResult<T> = Result<T, KeylineError>;

/// Top-level error taxonomy used by loader, scheduler and compositor APIs.
#[derive(thiserror::Error, Debug)]
pub enum KeylineError {
    /// Structural problem found while loading a document (dangling resource reference,
    /// degenerate animation, unparsable attribute, ...). No scene is produced.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// Path keyframes whose element structure differs, so they cannot be interpolated.
    #[error("incompatible path: {0}")]
    IncompatiblePath(String),

    /// A shape attribute references a resource id that is not present in the scene.
    #[error("unresolved resource: {0}")]
    UnresolvedResource(String),

    /// A frame was requested for a time earlier than the player's clock.
    #[error("clock regression: requested {requested}s but clock is at {now}s")]
    ClockRegression {
        /// Current clock time in seconds.
        now: f64,
        /// Requested frame time in seconds.
        requested: f64,
    },

    /// Errors while evaluating a frame that are not covered by a more specific variant.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KeylineError {
    /// Build a [`KeylineError::MalformedDocument`] value.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedDocument(msg.into())
    }

    /// Build a [`KeylineError::IncompatiblePath`] value.
    pub fn incompatible_path(msg: impl Into<String>) -> Self {
        Self::IncompatiblePath(msg.into())
    }

    /// Build a [`KeylineError::UnresolvedResource`] value.
    pub fn unresolved(msg: impl Into<String>) -> Self {
        Self::UnresolvedResource(msg.into())
    }

    /// Build a [`KeylineError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`KeylineError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
