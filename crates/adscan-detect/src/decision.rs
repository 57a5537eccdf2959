//! Hysteresis decision rule turning scene scores into ad verdicts.
//!
//! Ad breaks run across several consecutive scenes, and the middle of a
//! break often scores lower than its edges (sponsor cards, quiet
//! product shots). The rule therefore lowers the threshold for any
//! scene whose immediate neighbor clears the base threshold, pulling
//! weak interior scenes into the break instead of leaving holes.

use adscan_core::TimeRange;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Decision thresholds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DecisionParams {
    /// Score a scene must reach to count as an ad on its own
    /// (default: 12.5).
    pub base_threshold: f64,
    /// Amount subtracted from the threshold for scenes adjacent to a
    /// scene at or above the base threshold (default: 10.0).
    pub boost: f64,
}

impl Default for DecisionParams {
    fn default() -> Self {
        Self {
            base_threshold: 12.5,
            boost: 10.0,
        }
    }
}

/// Classify each scene as ad/not-ad from its score and its neighbors'.
///
/// `scores` must be aligned with the original scene order. Neighbor
/// checks use the raw scores against the base threshold, not the
/// neighbors' final verdicts, so the pass is single and order-stable:
/// the verdict for scene `i` depends only on `s[i-1], s[i], s[i+1]`.
pub fn classify_scenes(scores: &[f64], params: &DecisionParams) -> Vec<bool> {
    let last = scores.len().saturating_sub(1);
    scores
        .iter()
        .enumerate()
        .map(|(i, &score)| {
            let prev_ad = i > 0 && scores[i - 1] >= params.base_threshold;
            let next_ad = i < last && scores[i + 1] >= params.base_threshold;
            let isolated = !prev_ad && !next_ad;
            let effective = if isolated {
                params.base_threshold
            } else {
                params.base_threshold - params.boost
            };
            let is_ad = score >= effective;
            debug!(
                scene = i,
                score, effective, is_ad, "Scene verdict"
            );
            is_ad
        })
        .collect()
}

/// Apply the decision rule to a scored scene list and return the ad
/// ranges in scene order. Scenes missing from the score map count as
/// scoring 0.0.
pub fn select_ad_ranges(
    scenes: &[TimeRange],
    scores: &HashMap<TimeRange, f64>,
    params: &DecisionParams,
) -> Vec<TimeRange> {
    let ordered: Vec<f64> = scenes
        .iter()
        .map(|scene| scores.get(scene).copied().unwrap_or(0.0))
        .collect();
    classify_scenes(&ordered, params)
        .into_iter()
        .zip(scenes.iter())
        .filter_map(|(is_ad, &scene)| is_ad.then_some(scene))
        .collect()
}
