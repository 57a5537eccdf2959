//! Media file probing to get metadata without a full decode.
//!
//! Spawns ffmpeg against the input with no output file and parses the
//! metadata events it logs while inspecting the input. ffmpeg exits
//! complaining about the missing output; the stream info has already
//! been emitted by then.

use crate::error::{MediaError, MediaResult};
use adscan_core::FrameRate;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, StreamTypeSpecificData};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Information about a video file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaProbe {
    /// File path
    pub path: String,
    /// Duration in seconds
    pub duration_secs: f64,
    /// Frame rate of the primary video stream
    pub frame_rate: FrameRate,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Source pixel format name as reported by ffmpeg
    pub pix_fmt: String,
}

impl MediaProbe {
    /// Probe a video file.
    ///
    /// Fails with [`MediaError::SourceUnavailable`] when the file does
    /// not exist, cannot be parsed, or carries no video stream.
    pub fn probe<P: AsRef<Path>>(path: P) -> MediaResult<Self> {
        let path = path.as_ref();
        let path_str = path.to_string_lossy().to_string();

        if !path.exists() {
            return Err(MediaError::SourceUnavailable(format!(
                "file not found: {path_str}"
            )));
        }

        let mut child = FfmpegCommand::new()
            .input(&path_str)
            .spawn()
            .map_err(|e| MediaError::SourceUnavailable(format!("failed to spawn ffmpeg: {e}")))?;

        let mut duration: Option<f64> = None;
        let mut video: Option<(u32, u32, f32, String)> = None;

        let events = child
            .iter()
            .map_err(|e| MediaError::SourceUnavailable(e.to_string()))?;
        for event in events {
            match event {
                FfmpegEvent::ParsedInput(input) => {
                    if let Some(d) = input.duration {
                        duration = Some(d);
                    }
                }
                FfmpegEvent::ParsedInputStream(stream) => {
                    if video.is_none() {
                        if let StreamTypeSpecificData::Video(v) = &stream.type_specific_data {
                            video = Some((v.width, v.height, v.fps, v.pix_fmt.clone()));
                        }
                    }
                }
                _ => {}
            }
        }
        let _ = child.wait();

        let (width, height, fps, pix_fmt) = video.ok_or_else(|| {
            MediaError::SourceUnavailable(format!("no video stream in {path_str}"))
        })?;
        let duration_secs = duration.ok_or_else(|| {
            MediaError::SourceUnavailable(format!("could not determine duration of {path_str}"))
        })?;

        debug!(
            path = %path_str,
            duration_secs,
            fps,
            width,
            height,
            "Probed video file"
        );

        Ok(Self {
            path: path_str,
            duration_secs,
            frame_rate: FrameRate::from_fps_f64(fps as f64),
            width,
            height,
            pix_fmt,
        })
    }
}
