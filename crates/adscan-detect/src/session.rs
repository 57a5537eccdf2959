//! ONNX Runtime session wrapper.
//!
//! Provides a thin wrapper around `ort::Session` with proper error handling.
//! Gated behind the `onnx` feature flag.

#[cfg(feature = "onnx")]
use crate::error::{DetectError, DetectResult};
#[cfg(feature = "onnx")]
use std::path::Path;
#[cfg(feature = "onnx")]
use tracing::info;

/// A loaded ONNX model session.
#[cfg(feature = "onnx")]
pub struct OnnxSession {
    // ort 2.0.0-rc `Session::run` takes `&mut self`; the mutex lets the
    // session be shared behind `&self` as the classifier trait requires.
    session: parking_lot::Mutex<ort::session::Session>,
    model_name: String,
}

#[cfg(feature = "onnx")]
impl OnnxSession {
    /// Load an ONNX model from a file path.
    pub fn load(model_path: &Path, model_name: &str) -> DetectResult<Self> {
        info!(model = model_name, path = %model_path.display(), "Loading ONNX session");

        let session = ort::session::Session::builder()
            .and_then(|b| {
                b.with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)
            })
            .and_then(|b| b.commit_from_file(model_path))
            .map_err(|e| DetectError::ModelLoadFailed {
                name: model_name.to_string(),
                reason: e.to_string(),
            })?;

        info!(model = model_name, "ONNX session loaded successfully");
        Ok(Self {
            session: parking_lot::Mutex::new(session),
            model_name: model_name.to_string(),
        })
    }

    /// Get a reference to the inner ort::Session.
    pub fn inner(&self) -> parking_lot::MutexGuard<'_, ort::session::Session> {
        self.session.lock()
    }

    /// Name this session was loaded under.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}
