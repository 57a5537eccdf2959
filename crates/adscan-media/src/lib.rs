//! AdScan Media - Video access for the ad segment detector
//!
//! Provides the decode seam the detection engine works against:
//! - [`VideoSource`] / [`SourceFactory`] traits (random-access frame reads)
//! - [`FfmpegSource`], an FFmpeg-subprocess implementation
//! - [`MediaProbe`] for duration/frame-rate metadata
//!
//! Every scoring worker opens its own source through a factory; decode
//! handles are never shared between threads.

pub mod error;
pub mod ffmpeg;
pub mod probe;
pub mod source;

pub use error::{MediaError, MediaResult};
pub use ffmpeg::{FfmpegSource, FfmpegSourceFactory};
pub use probe::MediaProbe;
pub use source::{DecodedFrame, SourceFactory, VideoSource};
