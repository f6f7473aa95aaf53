/// Convenience result type used across plait.
pub type PlaitResult<T> = Result<T, PlaitError>;

/// Top-level error taxonomy used by tree and path APIs.
///
/// Structural edge cases (empty sequences, absent values, malformed addresses) are recovered
/// locally and never show up here; only genuine data-shape contradictions are reported.
#[derive(thiserror::Error, Debug)]
pub enum PlaitError {
    /// Element-wise operation over operands of incompatible shape.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// The transient parent handle was requested before a traversal set it.
    #[error("no parent: {0}")]
    NoParent(String),

    /// A strict copy met a payload that cannot be duplicated.
    #[error("not duplicable: {0}")]
    NotDuplicable(String),

    /// A chain left the node world and its result is not a node.
    #[error("escaped chain: {0}")]
    Escaped(String),

    /// Errors when serializing or deserializing metadata.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlaitError {
    /// Build a [`PlaitError::ShapeMismatch`] value.
    pub fn shape_mismatch(msg: impl Into<String>) -> Self {
        Self::ShapeMismatch(msg.into())
    }

    /// Build a [`PlaitError::NoParent`] value.
    pub fn no_parent(msg: impl Into<String>) -> Self {
        Self::NoParent(msg.into())
    }

    /// Build a [`PlaitError::NotDuplicable`] value.
    pub fn not_duplicable(msg: impl Into<String>) -> Self {
        Self::NotDuplicable(msg.into())
    }

    /// Build a [`PlaitError::Escaped`] value.
    pub fn escaped(msg: impl Into<String>) -> Self {
        Self::Escaped(msg.into())
    }

    /// Build a [`PlaitError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for PlaitError {
    fn from(value: serde_json::Error) -> Self {
        Self::serde(value.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
