//! The video access seam the detection engine is written against.
//!
//! Scoring runs one task per scene on a worker pool, and concurrent
//! seeking on a shared decode handle produces racing reads. The factory
//! exists so each worker can open its own independent handle; the trait
//! exists so tests can drive the engine with synthetic sources.

use crate::error::MediaResult;
use adscan_core::{FrameBuffer, FrameRate};

/// A decoded frame with its presentation timestamp.
pub struct DecodedFrame {
    /// Frame pixels (packed 4-byte format).
    pub buffer: FrameBuffer,
    /// Presentation timestamp in seconds.
    pub pts: f64,
}

/// Random-access frame reader over one independent decode handle.
///
/// `seek` positions the reader; the next `read_frame` returns the frame
/// nearest that timestamp. Without an intervening seek, `read_frame`
/// advances sequentially. `Ok(None)` signals end-of-stream.
pub trait VideoSource: Send {
    /// Position the reader at the given timestamp in seconds.
    fn seek(&mut self, seconds: f64) -> MediaResult<()>;

    /// Decode the next frame, or `None` at end-of-stream.
    fn read_frame(&mut self) -> MediaResult<Option<DecodedFrame>>;

    /// Total duration in seconds.
    fn duration(&self) -> f64;

    /// Native frame rate.
    fn frame_rate(&self) -> FrameRate;
}

/// Opens independent [`VideoSource`] handles over the same underlying
/// media. Shared read-only across worker threads.
pub trait SourceFactory: Send + Sync {
    /// Open a fresh decode handle.
    fn open(&self) -> MediaResult<Box<dyn VideoSource>>;
}
