use thiserror::Error;

/// Result type for mapping operations
pub type Result<T> = std::result::Result<T, MappingError>;

/// Errors that can occur while mutating a mapping table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// A supplied key contains a separator reserved for another namespace
    #[error("invalid key `{key}`: {reason}")]
    KeyFormat { key: String, reason: String },
}

impl MappingError {
    /// Create a key format error
    pub fn key_format(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::KeyFormat {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
