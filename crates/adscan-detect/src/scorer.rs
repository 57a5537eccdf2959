//! Scene ad-likelihood scoring.
//!
//! Samples frames at a fixed interval across one scene, classifies
//! each, and reduces the labels to a 0–100 ad score. Two reductions are
//! supported: a plain ad-frame percentage and a time-weighted variant
//! that counts samples near the scene's end more heavily (ad breaks
//! tend to run to the cut, so late evidence is the stronger signal).

use crate::cancel::CancelToken;
use crate::classify::FrameClassifier;
use crate::error::{DetectError, DetectResult};
use adscan_core::TimeRange;
use adscan_media::{MediaError, VideoSource};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

/// How sampled labels reduce to a scene score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScoreMode {
    /// Percentage of sampled frames labelled Ad.
    #[default]
    Unweighted,
    /// Samples weighted by their position in the scene; a sample at the
    /// scene start carries zero weight, one at the end full weight.
    TimeWeighted,
}

/// Scoring parameters.
#[derive(Debug, Clone)]
pub struct ScoreOptions {
    /// Seconds between samples (default: 0.5).
    pub sample_interval: f64,
    /// Reduction mode.
    pub mode: ScoreMode,
}

impl Default for ScoreOptions {
    fn default() -> Self {
        Self {
            sample_interval: 0.5,
            mode: ScoreMode::default(),
        }
    }
}

/// Score one scene on a 0–100 scale.
///
/// Samples at `start, start + interval, ...` through the scene end
/// inclusive. A scene that yields no samples (seek past end-of-stream,
/// or decode dying on the first sample) scores 0.0 rather than erroring
/// — missing footage is not evidence of an ad. Classifier failures do
/// abort: a half-classified scene would skew the decision stage.
pub fn score_scene(
    source: &mut dyn VideoSource,
    classifier: &dyn FrameClassifier,
    range: TimeRange,
    opts: &ScoreOptions,
    cancel: &CancelToken,
) -> DetectResult<f64> {
    // A zero, negative, or NaN interval would never advance the sample
    // clock past the scene end.
    if opts.sample_interval <= 0.0 || opts.sample_interval.is_nan() {
        return Err(DetectError::InvalidConfig(format!(
            "sample interval must be positive, got {}",
            opts.sample_interval
        )));
    }

    let start = range.start.to_seconds_f64();
    let end = range.end.to_seconds_f64();
    let scene_len = end - start;

    let mut ad_weight = 0.0_f64;
    let mut total_weight = 0.0_f64;
    let mut samples = 0_u64;

    let mut i = 0_u64;
    loop {
        let t = start + i as f64 * opts.sample_interval;
        if t > end + 1e-9 {
            break;
        }
        i += 1;

        if cancel.is_cancelled() {
            return Err(DetectError::Cancelled);
        }

        source.seek(t)?;
        let decoded = match source.read_frame() {
            Ok(Some(d)) => d,
            Ok(None) => break,
            Err(MediaError::Decode(reason)) => {
                warn!(timestamp = t, %reason, "Decode failed mid-scene, scoring what we have");
                break;
            }
            Err(e) => return Err(e.into()),
        };

        let label = classifier.classify(&decoded.buffer)?;
        let weight = match opts.mode {
            ScoreMode::Unweighted => 1.0,
            ScoreMode::TimeWeighted => {
                if scene_len > 0.0 {
                    (t - start) / scene_len
                } else {
                    0.0
                }
            }
        };

        trace!(timestamp = t, ?label, weight, "Sampled frame");
        total_weight += weight;
        if label.is_ad() {
            ad_weight += weight;
        }
        samples += 1;
    }

    if samples == 0 || total_weight == 0.0 {
        return Ok(0.0);
    }
    Ok(ad_weight / total_weight * 100.0)
}
