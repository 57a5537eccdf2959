//! Scene segmentation by frame-to-frame pixel differencing.
//!
//! Splits a video into contiguous scenes at hard content changes.
//! Works on decoded frames directly — no model needed. The downstream
//! scorer treats each scene as one unit, so boundaries here decide the
//! granularity of the whole analysis.

use crate::error::DetectResult;
use adscan_core::{FrameBuffer, TimeRange};
use adscan_media::VideoSource;
use tracing::{debug, info, warn};

/// Configuration for scene segmentation.
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    /// Content-change score threshold on a 0–100 scale (default: 65.0).
    /// A frame pair scoring at or above this starts a new scene.
    pub change_threshold: f64,
    /// Minimum number of frames between detected cuts (default: 15).
    pub min_scene_frames: u64,
    /// Pixel sampling step for the difference metric. `None` picks a
    /// step from the frame width so roughly 256 columns are sampled.
    pub sample_step: Option<u32>,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            change_threshold: 65.0,
            min_scene_frames: 15,
            sample_step: None,
        }
    }
}

/// Splits video into scenes at content changes.
#[derive(Debug, Clone, Default)]
pub struct SceneSegmenter {
    config: SegmenterConfig,
}

impl SceneSegmenter {
    /// Create a segmenter with the given configuration.
    pub fn new(config: SegmenterConfig) -> Self {
        Self { config }
    }

    /// Read the source start to end and return its scenes in order.
    ///
    /// The returned ranges tile `[0, duration)` exactly: consecutive
    /// ranges share a boundary and the last range closes at the
    /// source's reported duration. A source with no decodable frames
    /// yields no scenes; footage with no cuts yields a single scene.
    pub fn segment(&self, source: &mut dyn VideoSource) -> DetectResult<Vec<TimeRange>> {
        let duration = source.duration();
        source.seek(0.0)?;

        let mut boundaries: Vec<f64> = Vec::new();
        let mut prev: Option<FrameBuffer> = None;
        let mut frame_index: u64 = 0;
        // Seeded at frame 0 so the minimum-length rule also covers the
        // opening scene, not just the gaps between cuts.
        let mut last_cut_frame: i64 = 0;

        loop {
            let decoded = match source.read_frame() {
                Ok(Some(d)) => d,
                Ok(None) => break,
                Err(adscan_media::MediaError::Decode(reason)) => {
                    warn!(frame = frame_index, %reason, "Decode failed, ending segmentation early");
                    break;
                }
                Err(e) => return Err(e.into()),
            };

            if let Some(prev_frame) = &prev {
                let step = self.config.sample_step.unwrap_or_else(|| {
                    (decoded.buffer.width / 256).max(1)
                });
                if let Some(score) = change_score(prev_frame, &decoded.buffer, step) {
                    let since_cut = frame_index as i64 - last_cut_frame;
                    if score >= self.config.change_threshold
                        && since_cut >= self.config.min_scene_frames as i64
                    {
                        debug!(
                            frame = frame_index,
                            timestamp = decoded.pts,
                            score,
                            "Scene boundary detected"
                        );
                        boundaries.push(decoded.pts);
                        last_cut_frame = frame_index as i64;
                    }
                } else {
                    warn!(
                        frame = frame_index,
                        "Skipping frame pair: dimension mismatch or empty"
                    );
                }
            }

            prev = Some(decoded.buffer);
            frame_index += 1;
        }

        if frame_index == 0 {
            info!("No decodable frames, nothing to segment");
            return Ok(Vec::new());
        }

        let scenes = boundaries_to_ranges(&boundaries, duration);
        info!(
            scenes = scenes.len(),
            frames = frame_index,
            "Segmentation complete"
        );
        Ok(scenes)
    }
}

/// Turn cut timestamps into scene ranges tiling `[0, duration)`.
fn boundaries_to_ranges(boundaries: &[f64], duration: f64) -> Vec<TimeRange> {
    let mut ranges = Vec::with_capacity(boundaries.len() + 1);
    let mut start = 0.0;
    for &cut in boundaries {
        // Guards against a cut reported at or past the container's
        // stated duration (sloppy muxes do this on the last frame).
        if cut <= start || cut >= duration {
            continue;
        }
        ranges.push(TimeRange::from_seconds(start, cut));
        start = cut;
    }
    if duration > start {
        ranges.push(TimeRange::from_seconds(start, duration));
    }
    ranges
}

/// Content-change score between two frames on a 0–100 scale.
///
/// Mean absolute difference of the RGB channels over a pixel grid
/// subsampled by `step`, scaled so identical frames score 0 and a
/// black-to-white cut scores 100. `None` if the frames cannot be
/// compared.
pub fn change_score(a: &FrameBuffer, b: &FrameBuffer, step: u32) -> Option<f64> {
    if a.width != b.width || a.height != b.height {
        return None;
    }
    let w = a.width as usize;
    let h = a.height as usize;
    if w == 0 || h == 0 {
        return Some(0.0);
    }
    let step = step.max(1) as usize;

    let (aro, ago, abo) = a.format.rgb_offsets();
    let (bro, bgo, bbo) = b.format.rgb_offsets();
    let a_plane = a.primary_plane();
    let b_plane = b.primary_plane();

    let mut total_diff: f64 = 0.0;
    let mut compared: usize = 0;

    let mut y = 0;
    while y < h {
        let a_row = a_plane.row(y as u32);
        let b_row = b_plane.row(y as u32);
        let mut x = 0;
        while x < w {
            let base = x * 4;
            for (ao, bo) in [(aro, bro), (ago, bgo), (abo, bbo)] {
                let va = a_row[base + ao] as f64;
                let vb = b_row[base + bo] as f64;
                total_diff += (va - vb).abs();
            }
            compared += 1;
            x += step;
        }
        y += step;
    }

    if compared == 0 {
        return Some(0.0);
    }
    Some(total_diff / (compared as f64 * 3.0) * 100.0 / 255.0)
}
