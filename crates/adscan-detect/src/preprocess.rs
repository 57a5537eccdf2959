//! Frame preprocessing for the ad/content classifier.
//!
//! Converts a decoded frame into the flat NCHW f32 tensor the model
//! expects: bilinear resize to 224x224, channel reorder to RGB, scale
//! to `[0, 1]`, then per-channel ImageNet normalization.

use adscan_core::FrameBuffer;

/// Classifier input is square, 224x224.
pub const CLASSIFIER_INPUT_SIZE: usize = 224;

/// ImageNet per-channel mean (RGB).
pub const NORM_MEAN: [f32; 3] = [0.485, 0.456, 0.406];

/// ImageNet per-channel standard deviation (RGB).
pub const NORM_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Bilinear-resize a frame's RGB content into a packed RGB buffer of
/// `size` x `size` pixels. Alpha is discarded; source channel order is
/// handled per the frame's pixel format.
fn resize_rgb_bilinear(frame: &FrameBuffer, size: usize) -> Vec<u8> {
    let w = frame.width as usize;
    let h = frame.height as usize;
    let (ro, go, bo) = frame.format.rgb_offsets();
    let plane = frame.primary_plane();

    let mut output = vec![0u8; size * size * 3];
    if w == 0 || h == 0 {
        return output;
    }

    for oy in 0..size {
        // Map output pixel to source coordinates
        let sy = (oy as f32) * (h as f32) / (size as f32);
        let y0 = (sy.floor() as usize).min(h - 1);
        let y1 = (y0 + 1).min(h - 1);
        let fy = sy - sy.floor();

        let row0 = plane.row(y0 as u32);
        let row1 = plane.row(y1 as u32);

        for ox in 0..size {
            let sx = (ox as f32) * (w as f32) / (size as f32);
            let x0 = (sx.floor() as usize).min(w - 1);
            let x1 = (x0 + 1).min(w - 1);
            let fx = sx - sx.floor();

            let out_idx = (oy * size + ox) * 3;
            for (c, off) in [ro, go, bo].into_iter().enumerate() {
                let v00 = row0[x0 * 4 + off] as f32;
                let v10 = row0[x1 * 4 + off] as f32;
                let v01 = row1[x0 * 4 + off] as f32;
                let v11 = row1[x1 * 4 + off] as f32;

                let top = v00 * (1.0 - fx) + v10 * fx;
                let bottom = v01 * (1.0 - fx) + v11 * fx;
                let val = top * (1.0 - fy) + bottom * fy;

                output[out_idx + c] = val.clamp(0.0, 255.0) as u8;
            }
        }
    }

    output
}

/// Convert a frame to the classifier's input tensor as a flat NCHW
/// vec: shape `[1, 3, 224, 224]`, RGB order, normalized.
pub fn frame_to_model_tensor(frame: &FrameBuffer) -> Vec<f32> {
    let size = CLASSIFIER_INPUT_SIZE;
    let rgb = resize_rgb_bilinear(frame, size);

    let plane_size = size * size;
    let mut tensor = vec![0.0_f32; 3 * plane_size];
    for pixel in 0..plane_size {
        for c in 0..3 {
            let v = rgb[pixel * 3 + c] as f32 / 255.0;
            tensor[c * plane_size + pixel] = (v - NORM_MEAN[c]) / NORM_STD[c];
        }
    }
    tensor
}

#[cfg(test)]
mod tests {
    use super::*;
    use adscan_core::PixelFormat;

    #[test]
    fn test_tensor_dimensions() {
        let frame = FrameBuffer::solid(640, 360, PixelFormat::Rgba8, [10, 20, 30]);
        let tensor = frame_to_model_tensor(&frame);
        assert_eq!(tensor.len(), 3 * 224 * 224);
    }

    #[test]
    fn test_solid_frame_normalizes_uniformly() {
        let frame = FrameBuffer::solid(64, 64, PixelFormat::Rgba8, [255, 0, 128]);
        let tensor = frame_to_model_tensor(&frame);
        let plane = 224 * 224;

        let expect_r = (1.0 - NORM_MEAN[0]) / NORM_STD[0];
        let expect_g = (0.0 - NORM_MEAN[1]) / NORM_STD[1];
        let expect_b = (128.0 / 255.0 - NORM_MEAN[2]) / NORM_STD[2];

        assert!((tensor[0] - expect_r).abs() < 1e-2);
        assert!((tensor[plane] - expect_g).abs() < 1e-2);
        assert!((tensor[2 * plane] - expect_b).abs() < 1e-2);
        // Solid input: every position in a channel plane matches
        assert!((tensor[plane - 1] - expect_r).abs() < 1e-2);
    }

    #[test]
    fn test_bgra_source_lands_in_rgb_order() {
        // Same visual color in both byte layouts must produce the same tensor.
        let rgba = FrameBuffer::solid(32, 32, PixelFormat::Rgba8, [200, 100, 50]);
        let bgra = FrameBuffer::solid(32, 32, PixelFormat::Bgra8, [200, 100, 50]);
        let ta = frame_to_model_tensor(&rgba);
        let tb = frame_to_model_tensor(&bgra);
        for (a, b) in ta.iter().zip(tb.iter()) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_resize_preserves_solid_color() {
        let frame = FrameBuffer::solid(17, 9, PixelFormat::Rgba8, [40, 80, 120]);
        let rgb = resize_rgb_bilinear(&frame, 8);
        for px in rgb.chunks_exact(3) {
            assert_eq!(px, &[40, 80, 120]);
        }
    }
}
