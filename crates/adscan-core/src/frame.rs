//! Frame buffer types for decoded video frames in CPU memory.
//!
//! Frames are transient in AdScan: decoded, measured or classified,
//! then dropped. Only packed 4-byte formats are carried because that is
//! what the decode pipe produces and what the analysis stages consume.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Pixel format enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PixelFormat {
    /// 8-bit RGBA (32 bits per pixel)
    #[default]
    Rgba8,
    /// 8-bit BGRA (32 bits per pixel) — capture pipelines that hand
    /// over OpenCV-style BGR-ordered frames land here.
    Bgra8,
}

impl PixelFormat {
    /// Bytes per pixel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgba8 | Self::Bgra8 => 4,
        }
    }

    /// Byte offsets of the (R, G, B) channels within one pixel.
    pub fn rgb_offsets(self) -> (usize, usize, usize) {
        match self {
            Self::Rgba8 => (0, 1, 2),
            Self::Bgra8 => (2, 1, 0),
        }
    }
}

/// A plane of pixel data with stride information.
#[derive(Debug, Clone)]
pub struct FramePlane {
    /// Raw pixel data
    pub data: Vec<u8>,
    /// Bytes per row (may include padding)
    pub stride: usize,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    bytes_per_pixel: usize,
}

impl FramePlane {
    /// Create a new frame plane with the given dimensions.
    pub fn new(width: u32, height: u32, bytes_per_pixel: usize) -> Self {
        // Align stride to 64 bytes for SIMD-friendly access
        let min_stride = (width as usize) * bytes_per_pixel;
        let stride = (min_stride + 63) & !63;
        let data = vec![0u8; stride * height as usize];
        Self {
            data,
            stride,
            width,
            height,
            bytes_per_pixel,
        }
    }

    /// Get a row of pixel data, without the stride padding.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        let end = start + (self.width as usize * self.bytes_per_pixel);
        &self.data[start..end]
    }

    /// Get a mutable row of pixel data, without the stride padding.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = y as usize * self.stride;
        let end = start + (self.width as usize * self.bytes_per_pixel);
        &mut self.data[start..end]
    }
}

/// A video frame in CPU memory.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    /// Pixel format
    pub format: PixelFormat,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Pixel data planes
    pub planes: SmallVec<[FramePlane; 3]>,
}

impl FrameBuffer {
    /// Create a new zeroed frame buffer with the given dimensions and format.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        let planes = smallvec::smallvec![FramePlane::new(
            width,
            height,
            format.bytes_per_pixel()
        )];
        Self {
            format,
            width,
            height,
            planes,
        }
    }

    /// Build a frame from tightly packed pixel bytes (no row padding),
    /// as produced by a rawvideo decode pipe. `data` must hold exactly
    /// `width * height * bytes_per_pixel` bytes.
    pub fn from_packed(width: u32, height: u32, format: PixelFormat, data: &[u8]) -> Option<Self> {
        let bpp = format.bytes_per_pixel();
        let row_bytes = width as usize * bpp;
        if data.len() != row_bytes * height as usize {
            return None;
        }

        let mut frame = Self::new(width, height, format);
        let plane = frame.primary_plane_mut();
        for y in 0..height {
            let src = &data[y as usize * row_bytes..(y as usize + 1) * row_bytes];
            plane.row_mut(y).copy_from_slice(src);
        }
        Some(frame)
    }

    /// Create a solid-color frame. Used for synthetic footage in tests
    /// and tooling.
    pub fn solid(width: u32, height: u32, format: PixelFormat, rgb: [u8; 3]) -> Self {
        let (ro, go, bo) = format.rgb_offsets();
        let mut frame = Self::new(width, height, format);
        let plane = frame.primary_plane_mut();
        for y in 0..height {
            let row = plane.row_mut(y);
            for x in 0..width as usize {
                let base = x * 4;
                if base + 3 < row.len() {
                    row[base + ro] = rgb[0];
                    row[base + go] = rgb[1];
                    row[base + bo] = rgb[2];
                    row[base + 3] = 255;
                }
            }
        }
        frame
    }

    /// Get the primary plane (plane 0).
    #[inline]
    pub fn primary_plane(&self) -> &FramePlane {
        &self.planes[0]
    }

    /// Get the primary plane mutably.
    #[inline]
    pub fn primary_plane_mut(&mut self) -> &mut FramePlane {
        &mut self.planes[0]
    }

    /// Read the (R, G, B) values of a single pixel, honoring the
    /// buffer's channel order.
    #[inline]
    pub fn pixel_rgb(&self, x: u32, y: u32) -> [u8; 3] {
        let (ro, go, bo) = self.format.rgb_offsets();
        let row = self.primary_plane().row(y);
        let base = x as usize * 4;
        [row[base + ro], row[base + go], row[base + bo]]
    }
}
