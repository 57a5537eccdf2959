//! Classifier model registry.
//!
//! Keeps loaded classifiers keyed by name so repeated runs against the
//! same model reuse one session instead of re-reading the weights.

use crate::classify::FrameClassifier;
use crate::error::DetectResult;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Registry of loaded frame classifiers, keyed by model name.
#[derive(Default)]
pub struct ModelRegistry {
    models: Mutex<HashMap<String, Arc<dyn FrameClassifier>>>,
}

impl ModelRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a classifier under a name, replacing any previous entry.
    pub fn insert(&self, name: impl Into<String>, classifier: Arc<dyn FrameClassifier>) {
        self.models.lock().insert(name.into(), classifier);
    }

    /// Look up a classifier by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn FrameClassifier>> {
        self.models.lock().get(name).cloned()
    }

    /// Fetch a classifier, loading it through `load` on first use. The
    /// loader runs at most once per name; later calls hit the cache.
    pub fn get_or_load<F>(&self, name: &str, load: F) -> DetectResult<Arc<dyn FrameClassifier>>
    where
        F: FnOnce() -> DetectResult<Arc<dyn FrameClassifier>>,
    {
        let mut models = self.models.lock();
        if let Some(existing) = models.get(name) {
            debug!(model = name, "Classifier already loaded, reusing");
            return Ok(existing.clone());
        }
        let classifier = load()?;
        models.insert(name.to_string(), classifier.clone());
        Ok(classifier)
    }

    /// Names of all loaded models.
    pub fn loaded(&self) -> Vec<String> {
        self.models.lock().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Label;
    use adscan_core::FrameBuffer;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedClassifier(Label);

    impl FrameClassifier for FixedClassifier {
        fn classify(&self, _frame: &FrameBuffer) -> DetectResult<Label> {
            Ok(self.0)
        }
        fn name(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    fn test_get_missing_is_none() {
        let registry = ModelRegistry::new();
        assert!(registry.get("nope").is_none());
    }

    #[test]
    fn test_get_or_load_loads_once() {
        let registry = ModelRegistry::new();
        let loads = AtomicUsize::new(0);

        for _ in 0..3 {
            let loaded = registry
                .get_or_load("ad-detector", || {
                    loads.fetch_add(1, Ordering::SeqCst);
                    Ok(Arc::new(FixedClassifier(Label::Ad)) as Arc<dyn FrameClassifier>)
                })
                .unwrap();
            let frame = FrameBuffer::solid(8, 8, adscan_core::PixelFormat::Rgba8, [0, 0, 0]);
            assert_eq!(loaded.classify(&frame).unwrap(), Label::Ad);
        }

        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert_eq!(registry.loaded(), vec!["ad-detector".to_string()]);
    }

    #[test]
    fn test_load_failure_not_cached() {
        let registry = ModelRegistry::new();
        let result = registry.get_or_load("bad", || {
            Err(crate::error::DetectError::ModelLoadFailed {
                name: "bad".into(),
                reason: "missing file".into(),
            })
        });
        assert!(result.is_err());
        assert!(registry.get("bad").is_none());
    }
}
