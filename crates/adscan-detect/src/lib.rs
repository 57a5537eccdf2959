//! AdScan Detect - Ad segment detection engine
//!
//! Finds advertisement segments in recorded video:
//! - [`SceneSegmenter`]: split the video into scenes at content changes
//! - [`FrameClassifier`]: binary ad/content label per decoded frame
//! - [`score_scene`]: sample and classify a scene into a 0–100 ad score
//! - [`ParallelSceneProcessor`]: score all scenes on a bounded pool
//! - [`classify_scenes`]: hysteresis rule turning scores into verdicts
//! - [`detect_ad_segments`]: the full pipeline in one call
//!
//! The ONNX-backed classifier is behind the `onnx` feature; everything
//! else (segmentation, scoring, decision) is pure computation.

pub mod cancel;
pub mod classify;
pub mod decision;
pub mod error;
pub mod parallel;
pub mod pipeline;
pub mod preprocess;
pub mod registry;
pub mod scorer;
pub mod segment;
pub mod session;
#[cfg(test)]
pub mod testutil;

pub use cancel::CancelToken;
pub use classify::{FrameClassifier, Label};
pub use decision::{classify_scenes, select_ad_ranges, DecisionParams};
pub use error::{DetectError, DetectResult};
pub use parallel::ParallelSceneProcessor;
pub use pipeline::{detect_ad_segments, AdReport, DetectConfig, SceneScoreRow};
pub use registry::ModelRegistry;
pub use scorer::{score_scene, ScoreMode, ScoreOptions};
pub use segment::{SceneSegmenter, SegmenterConfig};

#[cfg(feature = "onnx")]
pub use classify::OnnxFrameClassifier;
