//! JPEG encoding.
//!
//! Serializes a raster to a compressed byte stream at a caller-chosen
//! quality. Encoding is separate from persistence so the pipeline can fail
//! the cheap in-memory step before any file is touched.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;
use thiserror::Error;

use crate::decode::Raster;

/// Errors that can occur during JPEG encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match the raster's dimensions.
    #[error("invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying compressor rejected the image.
    #[error("jpeg encoding failed: {0}")]
    EncodingFailed(String),
}

/// A compressed image, tagged with the quality it was written at.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    /// JPEG byte stream, SOI through EOI.
    pub bytes: Vec<u8>,
    /// Quality the encoder ran at, after clamping.
    pub quality: u8,
}

/// Encode a raster as JPEG.
///
/// `quality` runs 0..=100; values outside the encoder's 1..=100 range are
/// clamped. Around 90 suits archival output, 60-80 is fine for display
/// copies.
///
/// # Errors
///
/// Returns [`EncodeError::InvalidDimensions`] for an empty raster,
/// [`EncodeError::InvalidPixelData`] for a malformed buffer, and
/// [`EncodeError::EncodingFailed`] when the compressor reports failure.
pub fn encode_jpeg(raster: &Raster, quality: u8) -> Result<EncodedImage, EncodeError> {
    if raster.width == 0 || raster.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: raster.width,
            height: raster.height,
        });
    }

    let expected = raster.width as usize * raster.height as usize * 3;
    if raster.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: raster.pixels.len(),
        });
    }

    let quality = quality.clamp(1, 100);

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .write_image(
            &raster.pixels,
            raster.width,
            raster.height,
            ExtendedColorType::Rgb8,
        )
        .map_err(|err| EncodeError::EncodingFailed(err.to_string()))?;

    Ok(EncodedImage {
        bytes: buffer.into_inner(),
        quality,
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::testkit::gradient_raster;
    use proptest::prelude::*;

    proptest! {
        /// Valid rasters encode to well-formed JPEG streams at any quality.
        #[test]
        fn prop_valid_raster_encodes(
            width in 1u32..=50,
            height in 1u32..=50,
            quality in 0u8..=255,
        ) {
            let encoded = encode_jpeg(&gradient_raster(width, height), quality).unwrap();

            prop_assert_eq!(&encoded.bytes[0..2], &[0xFF, 0xD8]);
            let len = encoded.bytes.len();
            prop_assert!(len >= 4);
            prop_assert_eq!(&encoded.bytes[len - 2..], &[0xFF, 0xD9]);
            prop_assert!((1..=100).contains(&encoded.quality));
        }

        /// Encoding is deterministic.
        #[test]
        fn prop_encode_deterministic(
            width in 1u32..=20,
            height in 1u32..=20,
            quality in 1u8..=100,
        ) {
            let raster = gradient_raster(width, height);
            let first = encode_jpeg(&raster, quality).unwrap();
            let second = encode_jpeg(&raster, quality).unwrap();
            prop_assert_eq!(first.bytes, second.bytes);
        }

        /// A buffer of the wrong length never encodes.
        #[test]
        fn prop_wrong_buffer_length_is_error(
            width in 1u32..=20,
            height in 1u32..=20,
            delta in prop::sample::select(vec![-3i64, 3, 6]),
        ) {
            let expected = width as i64 * height as i64 * 3;
            let actual = (expected + delta).max(0) as usize;
            prop_assume!(actual != expected as usize);

            let raster = Raster {
                width,
                height,
                pixels: vec![128u8; actual],
            };
            prop_assert!(
                matches!(
                    encode_jpeg(&raster, 90),
                    Err(EncodeError::InvalidPixelData { .. })
                ),
                "expected InvalidPixelData error"
            );
        }
    }
}
