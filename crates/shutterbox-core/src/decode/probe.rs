//! Header-only dimension probing.

use image::ImageReader;

use super::{DecodeError, ImageDimensions};
use crate::resource::ImageResource;

/// Read the true pixel dimensions of `resource` without allocating a pixel
/// buffer.
///
/// This is the measurement pass of the two-pass bounded decode: only the
/// image header is parsed.
///
/// # Errors
///
/// Returns [`DecodeError::ResourceNotFound`] if the resource cannot be
/// opened and [`DecodeError::DecodeFailed`] if the header is not a
/// recognizable image.
pub fn probe_dimensions(resource: &ImageResource) -> Result<ImageDimensions, DecodeError> {
    let reader = resource.open()?;
    let (width, height) = ImageReader::new(reader)
        .with_guessed_format()
        .map_err(|err| DecodeError::Io(err.to_string()))?
        .into_dimensions()
        .map_err(|err| DecodeError::DecodeFailed(err.to_string()))?;
    Ok(ImageDimensions::new(width, height))
}
