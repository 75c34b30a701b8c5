//! Frame capture: colour buffer readback, row reordering and JPEG encoding

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

use crate::render::{Rasterizer, RenderError};

/// Default encoder quality (0-100)
pub const DEFAULT_JPEG_QUALITY: u8 = 70;

const CHANNELS: usize = 3;

/// Capture pipeline errors. Always recoverable: the caller skips the frame.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Readback failed: {0}")]
    Readback(#[from] RenderError),

    #[error("Readback returned {actual} bytes, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("JPEG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Reads finished views back and compresses them
#[derive(Debug, Clone, Copy)]
pub struct FrameCapture {
    quality: u8,
}

impl Default for FrameCapture {
    fn default() -> Self {
        Self::new(DEFAULT_JPEG_QUALITY)
    }
}

impl FrameCapture {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Read the current view out of `raster` and encode it top row first
    pub fn capture<R: Rasterizer + ?Sized>(&self, raster: &R) -> Result<Bytes, CaptureError> {
        let width = raster.width();
        let height = raster.height();
        let raw = raster.read_pixels()?;

        let expected = width as usize * height as usize * CHANNELS;
        if raw.len() != expected {
            return Err(CaptureError::SizeMismatch {
                expected,
                actual: raw.len(),
            });
        }

        let rows = flip_rows(&raw, width as usize * CHANNELS);
        self.encode(&rows, width, height)
    }

    /// Compress a top-down RGB8 buffer
    pub fn encode(&self, rgb: &[u8], width: u32, height: u32) -> Result<Bytes, CaptureError> {
        let mut out = Vec::with_capacity(rgb.len() / 8);
        JpegEncoder::new_with_quality(&mut out, self.quality).encode(
            rgb,
            width,
            height,
            ExtendedColorType::Rgb8,
        )?;
        Ok(Bytes::from(out))
    }
}

/// Reverse row order: row i of the output is row (height - 1 - i) of `raw`
pub fn flip_rows(raw: &[u8], stride: usize) -> Vec<u8> {
    let mut flipped = Vec::with_capacity(raw.len());
    for row in raw.chunks_exact(stride).rev() {
        flipped.extend_from_slice(row);
    }
    flipped
}
