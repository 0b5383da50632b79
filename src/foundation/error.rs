/// Convenience result type used across coif.
pub type CoifResult<T> = Result<T, CoifError>;

/// Top-level error taxonomy used by engine APIs.
///
/// A detection miss is never an error; it is reported through
/// [`CompositeResult::face_detected`](crate::CompositeResult).
#[derive(thiserror::Error, Debug)]
pub enum CoifError {
    /// Invalid caller-provided data (session ids, config values, asset paths).
    #[error("validation error: {0}")]
    Validation(String),

    /// The incoming frame could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// A hairstyle asset is missing or could not be prepared.
    #[error("asset error: {0}")]
    Asset(String),

    /// The landmark detector failed or broke its output contract.
    #[error("detection error: {0}")]
    Detection(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoifError {
    /// Build a [`CoifError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CoifError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`CoifError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`CoifError::Detection`] value.
    pub fn detection(msg: impl Into<String>) -> Self {
        Self::Detection(msg.into())
    }

    /// Build a [`CoifError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether this error was caused by a missing or broken hairstyle asset.
    pub fn is_asset(&self) -> bool {
        matches!(self, Self::Asset(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
