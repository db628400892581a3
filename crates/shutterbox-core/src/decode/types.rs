//! Core types for the decode pipeline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for decode operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The resource could not be opened for reading.
    #[error("resource not found: {0}")]
    ResourceNotFound(PathBuf),

    /// The underlying codec rejected the bytes.
    #[error("decode failed: {0}")]
    DecodeFailed(String),

    /// A requested target dimension was zero.
    #[error("invalid target dimensions: {width}x{height}")]
    InvalidTarget { width: u32, height: u32 },

    /// I/O error while reading the resource.
    #[error("i/o error: {0}")]
    Io(String),
}

/// True pixel dimensions of a source image, read from the header without
/// materializing pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Caller constraint on decoded memory size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecodeBudget {
    /// Decode at full resolution.
    Unbounded,
    /// Keep the decoded pixel count at or near this ceiling.
    MaxPixelCount(u32),
    /// Approximate bound: the decode lands on a multiple-of-sample-size
    /// rendition near `width`x`height`, not necessarily within it. See
    /// [`decode_approx_dimensions`](super::decode_approx_dimensions).
    ApproxDimensions {
        base_sample_size: u32,
        width: u32,
        height: u32,
    },
}

/// Filter type for resize operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// An owned, decoded RGB pixel buffer.
///
/// Rasters move through the pipeline by value: every transform consumes its
/// input and returns a new buffer, so a superseded raster is released the
/// moment its successor exists. Nothing in the pipeline aliases two copies
/// of the same frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGB data in row-major order, 3 bytes per pixel.
    pub pixels: Vec<u8>,
}

impl Raster {
    /// Create a raster from raw parts. The buffer length must be
    /// `width * height * 3`.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * 3,
            "pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Wrap an `image::RgbImage`, taking ownership of its buffer.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Convert into an `image::RgbImage`, consuming the raster.
    ///
    /// Returns `None` only if the buffer length does not match the
    /// dimensions, which cannot happen for rasters built by this crate.
    pub fn into_rgb_image(self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels)
    }

    pub fn dimensions(&self) -> ImageDimensions {
        ImageDimensions::new(self.width, self.height)
    }

    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}
