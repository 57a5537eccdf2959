//! End-to-end detection pipeline.
//!
//! Segment → score in parallel → decide. Synchronous by design; callers
//! that want it off their thread wrap it themselves and cancel through
//! the token.

use crate::cancel::CancelToken;
use crate::classify::FrameClassifier;
use crate::decision::{select_ad_ranges, DecisionParams};
use crate::error::DetectResult;
use crate::parallel::ParallelSceneProcessor;
use crate::scorer::ScoreOptions;
use crate::segment::{SceneSegmenter, SegmenterConfig};
use adscan_core::TimeRange;
use adscan_media::SourceFactory;
use serde::Serialize;
use std::collections::HashMap;
use tracing::info;

/// Full configuration for a detection run.
#[derive(Debug, Clone, Default)]
pub struct DetectConfig {
    /// Scene segmentation parameters.
    pub segmenter: SegmenterConfig,
    /// Scene scoring parameters.
    pub score: ScoreOptions,
    /// Decision thresholds.
    pub decision: DecisionParams,
    /// Worker count override; `None` sizes the pool from the CPU count.
    pub threads: Option<usize>,
}

/// One row of the per-scene score table.
#[derive(Debug, Clone, Serialize)]
pub struct SceneScoreRow {
    /// Scene start in seconds.
    pub start: f64,
    /// Scene end in seconds.
    pub end: f64,
    /// Ad score on a 0–100 scale.
    pub score: f64,
    /// Final verdict for this scene.
    pub is_ad: bool,
}

/// Result of a detection run.
#[derive(Debug, Clone)]
pub struct AdReport {
    /// Scenes in order, tiling the video duration.
    pub scenes: Vec<TimeRange>,
    /// Ad score per scene.
    pub scores: HashMap<TimeRange, f64>,
    /// Scenes judged to be advertisement, in scene order.
    pub ad_ranges: Vec<TimeRange>,
}

impl AdReport {
    /// Per-scene rows in scene order, for logging or serialization.
    pub fn score_rows(&self) -> Vec<SceneScoreRow> {
        self.scenes
            .iter()
            .map(|scene| SceneScoreRow {
                start: scene.start.to_seconds_f64(),
                end: scene.end.to_seconds_f64(),
                score: self.scores.get(scene).copied().unwrap_or(0.0),
                is_ad: self.ad_ranges.contains(scene),
            })
            .collect()
    }

    /// Total seconds of detected advertisement.
    pub fn total_ad_seconds(&self) -> f64 {
        self.ad_ranges.iter().map(|r| r.duration_secs()).sum()
    }
}

/// Run the full detection pipeline over one video.
pub fn detect_ad_segments(
    factory: &dyn SourceFactory,
    classifier: &dyn FrameClassifier,
    config: &DetectConfig,
    cancel: &CancelToken,
) -> DetectResult<AdReport> {
    let mut source = factory.open()?;
    let scenes = SceneSegmenter::new(config.segmenter.clone()).segment(source.as_mut())?;
    drop(source);

    if cancel.is_cancelled() {
        return Err(crate::error::DetectError::Cancelled);
    }

    let processor = match config.threads {
        Some(n) => ParallelSceneProcessor::with_threads(n)?,
        None => ParallelSceneProcessor::new()?,
    };
    let scores = processor.score_scenes(factory, classifier, &scenes, &config.score, cancel)?;
    let ad_ranges = select_ad_ranges(&scenes, &scores, &config.decision);

    info!(
        scenes = scenes.len(),
        ad_scenes = ad_ranges.len(),
        "Detection complete"
    );
    Ok(AdReport {
        scenes,
        scores,
        ad_ranges,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{red_is_ad, SyntheticFactory};

    // Consecutive colors must differ by well over the 65.0 change
    // threshold for the segmenter to cut between them. The ad color is
    // red-dominant so `red_is_ad` labels it.
    const AD: [u8; 3] = [255, 200, 0];
    const CONTENT_A: [u8; 3] = [0, 0, 255];
    const CONTENT_B: [u8; 3] = [0, 255, 255];

    #[test]
    fn test_end_to_end_finds_ad_break() {
        // Content, then an ad break, then content. The content scenes
        // are long enough that the single boundary sample bleeding in
        // from the ad scene stays under even the boosted threshold.
        let factory = SyntheticFactory::new(
            30.0,
            &[(30.0, CONTENT_A), (8.0, AD), (30.0, CONTENT_B)],
        );
        let report = detect_ad_segments(
            &factory,
            red_is_ad().as_ref(),
            &DetectConfig::default(),
            &CancelToken::new(),
        )
        .unwrap();

        assert_eq!(report.scenes.len(), 3);
        assert_eq!(report.ad_ranges.len(), 1);
        let ad = report.ad_ranges[0];
        assert!((ad.start.to_seconds_f64() - 30.0).abs() < 0.1);
        assert!((ad.end.to_seconds_f64() - 38.0).abs() < 0.1);
        assert!((report.total_ad_seconds() - 8.0).abs() < 0.2);
    }

    #[test]
    fn test_all_content_reports_nothing() {
        let factory = SyntheticFactory::new(30.0, &[(12.0, CONTENT_A)]);
        let report = detect_ad_segments(
            &factory,
            red_is_ad().as_ref(),
            &DetectConfig::default(),
            &CancelToken::new(),
        )
        .unwrap();

        assert_eq!(report.scenes.len(), 1);
        assert!(report.ad_ranges.is_empty());
        assert_eq!(report.total_ad_seconds(), 0.0);
    }

    #[test]
    fn test_score_rows_align_with_scenes() {
        let factory = SyntheticFactory::new(30.0, &[(6.0, AD), (6.0, CONTENT_A)]);
        let report = detect_ad_segments(
            &factory,
            red_is_ad().as_ref(),
            &DetectConfig::default(),
            &CancelToken::new(),
        )
        .unwrap();

        let rows = report.score_rows();
        assert_eq!(rows.len(), report.scenes.len());
        for (row, scene) in rows.iter().zip(&report.scenes) {
            assert_eq!(row.start, scene.start.to_seconds_f64());
            assert_eq!(row.end, scene.end.to_seconds_f64());
        }
        assert!(rows[0].is_ad);
        assert!(rows[0].score > rows[1].score);
    }

    #[test]
    fn test_cancelled_before_scoring() {
        let factory = SyntheticFactory::new(30.0, &[(5.0, CONTENT_A)]);
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = detect_ad_segments(
            &factory,
            red_is_ad().as_ref(),
            &DetectConfig::default(),
            &cancel,
        )
        .unwrap_err();
        assert!(matches!(err, crate::error::DetectError::Cancelled));
    }

    #[test]
    fn test_empty_video_empty_report() {
        let factory = SyntheticFactory::new(30.0, &[]);
        let report = detect_ad_segments(
            &factory,
            red_is_ad().as_ref(),
            &DetectConfig::default(),
            &CancelToken::new(),
        )
        .unwrap();
        assert!(report.scenes.is_empty());
        assert!(report.ad_ranges.is_empty());
    }
}
