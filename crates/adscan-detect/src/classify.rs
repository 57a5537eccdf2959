//! Per-frame binary ad/content classification.
//!
//! The engine only ever asks one question of a frame: ad or content.
//! [`FrameClassifier`] is the seam; the ONNX-backed implementation is
//! gated behind the `onnx` feature so the rest of the engine builds and
//! tests without a runtime library installed.

use crate::error::DetectResult;
use adscan_core::FrameBuffer;
use serde::{Deserialize, Serialize};

/// Class index the model assigns to advertisement frames.
pub const AD_CLASS_INDEX: usize = 0;

/// What a frame was classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    /// Advertisement frame.
    Ad,
    /// Program content frame.
    Content,
}

impl Label {
    /// Map a model output class index to a label (index 0 is Ad).
    pub fn from_class_index(index: usize) -> Self {
        if index == AD_CLASS_INDEX {
            Self::Ad
        } else {
            Self::Content
        }
    }

    /// Whether this label counts toward a scene's ad score.
    pub fn is_ad(self) -> bool {
        matches!(self, Self::Ad)
    }
}

/// Index of the largest logit. Ties resolve to the earliest index, so a
/// degenerate all-equal output still yields a deterministic label.
pub fn argmax(logits: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in logits.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// A binary ad/content frame classifier.
///
/// Implementations must be safe to call from multiple worker threads at
/// once; one instance is shared across the whole scoring pool.
pub trait FrameClassifier: Send + Sync {
    /// Classify a single decoded frame.
    fn classify(&self, frame: &FrameBuffer) -> DetectResult<Label>;

    /// Human-readable model name for logs and reports.
    fn name(&self) -> &str;
}

/// ONNX-backed classifier: preprocess to a normalized 224x224 NCHW
/// tensor, run the session, argmax over the output logits.
#[cfg(feature = "onnx")]
pub struct OnnxFrameClassifier {
    session: crate::session::OnnxSession,
    input_name: String,
}

#[cfg(feature = "onnx")]
impl OnnxFrameClassifier {
    /// Load a classifier from an ONNX model file. `name` keys the model
    /// in logs and in the registry.
    pub fn load(model_path: &std::path::Path, name: &str) -> DetectResult<Self> {
        let session = crate::session::OnnxSession::load(model_path, name)?;
        Ok(Self {
            session,
            input_name: "input".to_string(),
        })
    }

    /// Override the graph input name (defaults to `"input"`).
    pub fn with_input_name(mut self, input_name: impl Into<String>) -> Self {
        self.input_name = input_name.into();
        self
    }
}

#[cfg(feature = "onnx")]
impl FrameClassifier for OnnxFrameClassifier {
    fn classify(&self, frame: &FrameBuffer) -> DetectResult<Label> {
        use crate::error::DetectError;
        use crate::preprocess::{frame_to_model_tensor, CLASSIFIER_INPUT_SIZE};

        let size = CLASSIFIER_INPUT_SIZE;
        let data = frame_to_model_tensor(frame);
        let tensor = ndarray::Array::from_shape_vec(ndarray::IxDyn(&[1, 3, size, size]), data)
            .map_err(|e| DetectError::ClassificationFailed(e.to_string()))?;

        let tensor = ort::value::TensorRef::from_array_view(tensor.view())?;
        let inputs = ort::inputs![self.input_name.as_str() => tensor];
        let mut session = self.session.inner();
        let outputs = session.run(inputs)?;
        let (_, logits) = outputs[0].try_extract_tensor::<f32>()?;

        let flat: Vec<f32> = logits.iter().copied().collect();
        let index = argmax(&flat).ok_or_else(|| {
            DetectError::ClassificationFailed("model produced an empty output tensor".into())
        })?;
        Ok(Label::from_class_index(index))
    }

    fn name(&self) -> &str {
        self.session.model_name()
    }
}
