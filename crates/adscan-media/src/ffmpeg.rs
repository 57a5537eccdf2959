//! FFmpeg-backed video source.
//!
//! Decodes through an ffmpeg subprocess writing raw RGBA frames to a
//! pipe. Each seek tears down the child and spawns a fresh one with an
//! `-ss` input offset, so every [`FfmpegSource`] is an independent
//! decode handle by construction — the worker pool can hold one per
//! scene without sharing state.

use crate::error::{MediaError, MediaResult};
use crate::probe::MediaProbe;
use crate::source::{DecodedFrame, SourceFactory, VideoSource};
use adscan_core::{FrameBuffer, FrameRate, PixelFormat};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};
use tracing::debug;

/// A video source decoding via an ffmpeg subprocess.
#[derive(Debug)]
pub struct FfmpegSource {
    path: PathBuf,
    duration: f64,
    frame_rate: FrameRate,
    width: u32,
    height: u32,
    /// Running decode child and its stdout, if spawned.
    child: Option<(Child, ChildStdout)>,
    /// Timestamp the current child was started at.
    clock_base: f64,
    /// Frames read from the current child.
    frames_read: u64,
}

impl FfmpegSource {
    /// Open a video file. Probes metadata up front; the decode child is
    /// spawned lazily on the first read.
    pub fn open<P: AsRef<Path>>(path: P) -> MediaResult<Self> {
        let probe = MediaProbe::probe(&path)?;
        Ok(Self::from_probe(path.as_ref().to_path_buf(), &probe))
    }

    /// Build a source from already-probed metadata (avoids re-probing
    /// when a factory opens many handles over the same file).
    fn from_probe(path: PathBuf, probe: &MediaProbe) -> Self {
        Self {
            path,
            duration: probe.duration_secs,
            frame_rate: probe.frame_rate,
            width: probe.width,
            height: probe.height,
            child: None,
            clock_base: 0.0,
            frames_read: 0,
        }
    }

    /// Bytes per decoded RGBA frame.
    fn frame_bytes(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }

    fn kill_child(&mut self) {
        if let Some((mut child, stdout)) = self.child.take() {
            drop(stdout);
            let _ = child.kill();
            let _ = child.wait();
        }
    }

    fn spawn_child(&mut self) -> MediaResult<()> {
        let mut cmd = Command::new("ffmpeg");
        cmd.args(["-hide_banner", "-loglevel", "error", "-nostdin"]);
        if self.clock_base > 0.0 {
            cmd.args(["-ss", &format!("{:.6}", self.clock_base)]);
        }
        cmd.arg("-i")
            .arg(&self.path)
            .args(["-f", "rawvideo", "-pix_fmt", "rgba", "pipe:1"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());

        let mut child = cmd
            .spawn()
            .map_err(|e| MediaError::SourceUnavailable(format!("failed to spawn ffmpeg: {e}")))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| MediaError::Decode("failed to open ffmpeg stdout".into()))?;

        debug!(path = %self.path.display(), offset = self.clock_base, "Spawned decode child");
        self.child = Some((child, stdout));
        self.frames_read = 0;
        Ok(())
    }

    /// Read exactly one packed frame from the pipe. `Ok(None)` when the
    /// child has closed the pipe (end of stream).
    fn read_packed(&mut self) -> MediaResult<Option<Vec<u8>>> {
        let frame_bytes = self.frame_bytes();
        let (_, stdout) = self
            .child
            .as_mut()
            .ok_or_else(|| MediaError::Decode("decode child not running".into()))?;

        let mut buf = vec![0u8; frame_bytes];
        let mut filled = 0;
        while filled < frame_bytes {
            match stdout.read(&mut buf[filled..]) {
                Ok(0) => {
                    // Pipe closed mid-frame counts as end of stream too;
                    // a truncated tail frame is not worth classifying.
                    return Ok(None);
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(MediaError::Decode(e.to_string())),
            }
        }
        Ok(Some(buf))
    }
}

impl VideoSource for FfmpegSource {
    fn seek(&mut self, seconds: f64) -> MediaResult<()> {
        if seconds < 0.0 || !seconds.is_finite() {
            return Err(MediaError::Seek {
                timestamp: seconds,
                reason: "timestamp must be finite and non-negative".into(),
            });
        }
        self.kill_child();
        self.clock_base = seconds;
        Ok(())
    }

    fn read_frame(&mut self) -> MediaResult<Option<DecodedFrame>> {
        if self.child.is_none() {
            if self.clock_base >= self.duration {
                return Ok(None);
            }
            self.spawn_child()?;
        }

        let Some(packed) = self.read_packed()? else {
            self.kill_child();
            return Ok(None);
        };

        let buffer = FrameBuffer::from_packed(self.width, self.height, PixelFormat::Rgba8, &packed)
            .ok_or_else(|| MediaError::Decode("unexpected frame size from pipe".into()))?;

        let pts = self.clock_base + self.frames_read as f64 / self.frame_rate.to_fps_f64();
        self.frames_read += 1;

        Ok(Some(DecodedFrame { buffer, pts }))
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn frame_rate(&self) -> FrameRate {
        self.frame_rate
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        self.kill_child();
    }
}

/// Opens independent [`FfmpegSource`] handles over one file.
///
/// Probes once at construction; opening a handle is then cheap, which
/// matters because the scene processor opens one per scene.
#[derive(Debug)]
pub struct FfmpegSourceFactory {
    path: PathBuf,
    probe: MediaProbe,
}

impl FfmpegSourceFactory {
    /// Probe the file and build a factory for it.
    pub fn new<P: AsRef<Path>>(path: P) -> MediaResult<Self> {
        let probe = MediaProbe::probe(&path)?;
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            probe,
        })
    }

    /// Metadata of the underlying file.
    pub fn probe(&self) -> &MediaProbe {
        &self.probe
    }
}

impl SourceFactory for FfmpegSourceFactory {
    fn open(&self) -> MediaResult<Box<dyn VideoSource>> {
        Ok(Box::new(FfmpegSource::from_probe(
            self.path.clone(),
            &self.probe,
        )))
    }
}
