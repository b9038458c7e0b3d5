//! Error types for record storage.

use thiserror::Error;

/// Failure while reading or writing a record bucket.
///
/// Reads that feed the aggregate snapshot never surface these; they are
/// logged and the bucket is defaulted instead. Writes propagate them.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Bucket payload could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend-specific failure
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_cause() {
        let err: StoreError = serde_json::from_str::<Vec<u8>>("{").unwrap_err().into();
        assert!(err.to_string().starts_with("Serialization error:"));

        let err = StoreError::Backend("disk full".to_string());
        assert_eq!(err.to_string(), "Store backend error: disk full");
    }
}
