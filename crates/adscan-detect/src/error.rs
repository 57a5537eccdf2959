//! Error types for the detection engine.

use thiserror::Error;

/// Errors that can occur during ad segment detection.
#[derive(Debug, Error)]
pub enum DetectError {
    /// The video could not be opened or read. Fatal for the run.
    #[error("video source error: {0}")]
    Source(#[from] adscan_media::MediaError),

    /// Loading a classifier model failed.
    #[error("failed to load model '{name}': {reason}")]
    ModelLoadFailed { name: String, reason: String },

    /// A single frame inference failed. Aborts the whole scoring run
    /// rather than silently skewing scene scores.
    #[error("frame classification failed: {0}")]
    ClassificationFailed(String),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The scoring worker pool could not be built.
    #[error("failed to build worker pool: {0}")]
    WorkerPool(String),

    /// The run was cancelled through its cancel token.
    #[error("analysis cancelled")]
    Cancelled,

    /// ONNX Runtime error.
    #[cfg(feature = "onnx")]
    #[error("ONNX Runtime error: {0}")]
    Onnx(#[from] ort::Error),
}

/// Result type alias for detection operations.
pub type DetectResult<T> = std::result::Result<T, DetectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_failure() {
        let err = DetectError::InvalidConfig("sample interval must be positive, got 0".into());
        assert!(err.to_string().starts_with("invalid configuration:"));

        let err = DetectError::WorkerPool("no threads".into());
        assert!(err.to_string().starts_with("failed to build worker pool:"));
    }
}
