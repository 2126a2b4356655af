/// Convenience result type used across mockpress.
pub type MockpressResult<T> = Result<T, MockpressError>;

/// Top-level error taxonomy used by the geometry, compositing, store and job APIs.
#[derive(thiserror::Error, Debug)]
pub enum MockpressError {
    /// Malformed input rejected before any state change.
    #[error("validation error: {0}")]
    Validation(String),

    /// A referenced mockup, design, job, task or file does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Image bytes could not be decoded or encoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// An image decoded to zero width or height.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// The persistence handle refused the operation (closed, inconsistent state).
    #[error("store error: {0}")]
    Store(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MockpressError {
    /// Build a [`MockpressError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MockpressError::NotFound`] value.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Build a [`MockpressError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`MockpressError::InvalidDimensions`] value.
    pub fn invalid_dimensions(msg: impl Into<String>) -> Self {
        Self::InvalidDimensions(msg.into())
    }

    /// Build a [`MockpressError::Store`] value.
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Build a [`MockpressError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` for errors caused by the caller's input rather than by the environment.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// `true` when a referenced entity or file is missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<serde_json::Error> for MockpressError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
