//! Bounded parallel scene scoring.
//!
//! Each scene is scored as one task on a rayon pool. Decode handles are
//! never shared: every task opens its own through the factory, so seeks
//! from different workers cannot interleave. The pool is capped at four
//! threads regardless of core count; each worker holds an ffmpeg
//! subprocess, and decode bandwidth runs out before the CPU does.

use crate::cancel::CancelToken;
use crate::classify::FrameClassifier;
use crate::error::{DetectError, DetectResult};
use crate::scorer::{score_scene, ScoreOptions};
use adscan_core::TimeRange;
use adscan_media::SourceFactory;
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::{debug, info};

/// Maximum worker threads for scene scoring.
const MAX_WORKERS: usize = 4;

/// Scores scenes concurrently on a bounded worker pool.
pub struct ParallelSceneProcessor {
    pool: rayon::ThreadPool,
}

impl ParallelSceneProcessor {
    /// Create a processor sized to `min(cpu_count, 4)` workers.
    pub fn new() -> DetectResult<Self> {
        Self::with_threads(num_cpus::get().min(MAX_WORKERS).max(1))
    }

    /// Create a processor with an explicit worker count.
    pub fn with_threads(threads: usize) -> DetectResult<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .thread_name(|i| format!("adscan-score-{i}"))
            .build()
            .map_err(|e| DetectError::WorkerPool(e.to_string()))?;
        debug!(threads = pool.current_num_threads(), "Scoring pool ready");
        Ok(Self { pool })
    }

    /// Number of worker threads in the pool.
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Score every scene and return the per-scene score map.
    ///
    /// Fail-fast: the first task error aborts the run and is returned;
    /// a partial score map is never produced. Scene order does not
    /// affect the result — the map is keyed by range.
    pub fn score_scenes(
        &self,
        factory: &dyn SourceFactory,
        classifier: &dyn FrameClassifier,
        scenes: &[TimeRange],
        opts: &ScoreOptions,
        cancel: &CancelToken,
    ) -> DetectResult<HashMap<TimeRange, f64>> {
        info!(
            scenes = scenes.len(),
            threads = self.threads(),
            model = classifier.name(),
            "Scoring scenes"
        );

        let scores: DetectResult<HashMap<TimeRange, f64>> = self.pool.install(|| {
            scenes
                .par_iter()
                .map(|&scene| {
                    if cancel.is_cancelled() {
                        return Err(DetectError::Cancelled);
                    }
                    let mut source = factory.open()?;
                    let score = score_scene(source.as_mut(), classifier, scene, opts, cancel)?;
                    debug!(%scene, score, "Scene scored");
                    Ok((scene, score))
                })
                .collect()
        });
        scores
    }
}
