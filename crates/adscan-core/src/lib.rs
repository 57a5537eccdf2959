//! AdScan Core - Foundation types for ad segment detection
//!
//! This crate provides the fundamental types used throughout AdScan:
//! - Time representation (RationalTime, FrameRate, TimeRange)
//! - Frame buffers and pixel formats

pub mod frame;
pub mod time;

pub use frame::{FrameBuffer, FramePlane, PixelFormat};
pub use time::{FrameRate, RationalTime, TimeRange};
