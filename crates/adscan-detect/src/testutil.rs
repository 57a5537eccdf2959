//! Synthetic video sources and stub classifiers for unit tests.

use crate::classify::{FrameClassifier, Label};
use crate::error::{DetectError, DetectResult};
use adscan_core::{FrameBuffer, FrameRate, PixelFormat};
use adscan_media::{DecodedFrame, MediaResult, SourceFactory, VideoSource};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const FRAME_W: u32 = 64;
const FRAME_H: u32 = 64;

/// Piecewise-constant color video: a list of `(duration_secs, rgb)`
/// segments rendered as solid frames at a fixed rate.
pub struct SyntheticSource {
    fps: f64,
    /// Cumulative end time and color of each segment.
    segments: Vec<(f64, [u8; 3])>,
    duration: f64,
    next_frame: u64,
}

impl SyntheticSource {
    pub fn new(fps: f64, segments: &[(f64, [u8; 3])]) -> Self {
        let mut cumulative = Vec::with_capacity(segments.len());
        let mut end = 0.0;
        for &(len, color) in segments {
            end += len;
            cumulative.push((end, color));
        }
        Self {
            fps,
            segments: cumulative,
            duration: end,
            next_frame: 0,
        }
    }

    fn color_at(&self, t: f64) -> [u8; 3] {
        for &(end, color) in &self.segments {
            if t < end {
                return color;
            }
        }
        self.segments.last().map(|&(_, c)| c).unwrap_or([0, 0, 0])
    }
}

impl VideoSource for SyntheticSource {
    fn seek(&mut self, seconds: f64) -> MediaResult<()> {
        self.next_frame = (seconds * self.fps).round() as u64;
        Ok(())
    }

    fn read_frame(&mut self) -> MediaResult<Option<DecodedFrame>> {
        let pts = self.next_frame as f64 / self.fps;
        if pts >= self.duration {
            return Ok(None);
        }
        self.next_frame += 1;
        let buffer = FrameBuffer::solid(FRAME_W, FRAME_H, PixelFormat::Rgba8, self.color_at(pts));
        Ok(Some(DecodedFrame { buffer, pts }))
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn frame_rate(&self) -> FrameRate {
        FrameRate::from_fps_f64(self.fps)
    }
}

/// Factory producing independent [`SyntheticSource`] handles.
pub struct SyntheticFactory {
    fps: f64,
    segments: Vec<(f64, [u8; 3])>,
    opens: AtomicUsize,
}

impl SyntheticFactory {
    pub fn new(fps: f64, segments: &[(f64, [u8; 3])]) -> Self {
        Self {
            fps,
            segments: segments.to_vec(),
            opens: AtomicUsize::new(0),
        }
    }

    /// How many handles have been opened.
    pub fn open_count(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

impl SourceFactory for SyntheticFactory {
    fn open(&self) -> MediaResult<Box<dyn VideoSource>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(SyntheticSource::new(self.fps, &self.segments)))
    }
}

/// Classifier driven by a closure over the frame.
pub struct StubClassifier<F>(pub F);

impl<F> FrameClassifier for StubClassifier<F>
where
    F: Fn(&FrameBuffer) -> Label + Send + Sync,
{
    fn classify(&self, frame: &FrameBuffer) -> DetectResult<Label> {
        Ok((self.0)(frame))
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// Classifier that calls frames ads when their red channel dominates.
/// Pairs with [`SyntheticSource`]: render ad segments in red.
pub fn red_is_ad() -> Arc<dyn FrameClassifier> {
    Arc::new(StubClassifier(|frame: &FrameBuffer| {
        let [r, g, b] = frame.pixel_rgb(0, 0);
        if r > g && r > b {
            Label::Ad
        } else {
            Label::Content
        }
    }))
}

/// Classifier that fails on every frame.
pub struct FailingClassifier;

impl FrameClassifier for FailingClassifier {
    fn classify(&self, _frame: &FrameBuffer) -> DetectResult<Label> {
        Err(DetectError::ClassificationFailed("synthetic failure".into()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Classifier that counts invocations and always answers `Content`.
pub struct CountingClassifier(pub AtomicUsize);

impl CountingClassifier {
    pub fn new() -> Self {
        Self(AtomicUsize::new(0))
    }

    pub fn calls(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl FrameClassifier for CountingClassifier {
    fn classify(&self, _frame: &FrameBuffer) -> DetectResult<Label> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(Label::Content)
    }

    fn name(&self) -> &str {
        "counting"
    }
}
