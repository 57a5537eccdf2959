//! Error types for video access.

use thiserror::Error;

/// Errors that can occur while opening or reading video.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The file could not be opened or probed. Fatal for the whole
    /// analysis — there is nothing to segment or score.
    #[error("video source unavailable: {0}")]
    SourceUnavailable(String),

    /// Seeking to a timestamp failed.
    #[error("seek to {timestamp:.3}s failed: {reason}")]
    Seek { timestamp: f64, reason: String },

    /// A frame could not be decoded. Mid-scene this is treated like
    /// end-of-stream by callers, not as a fatal error.
    #[error("decode failed: {0}")]
    Decode(String),

    /// IO error talking to the decode subprocess.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for media operations.
pub type MediaResult<T> = std::result::Result<T, MediaError>;
