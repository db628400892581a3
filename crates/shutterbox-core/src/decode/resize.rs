//! Raster resizing.
//!
//! Every function consumes its input raster and returns a freshly allocated
//! one; the superseded buffer is gone by the time the caller sees the
//! result.

use super::{DecodeError, FilterType, Raster};

/// Resize a raster to exact dimensions.
///
/// Width and height scale independently; nothing here enforces the aspect
/// ratio, so callers wanting an undistorted result must pass a
/// ratio-consistent target.
///
/// # Errors
///
/// Returns [`DecodeError::InvalidTarget`] if either dimension is zero.
pub fn resize(
    raster: Raster,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<Raster, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidTarget { width, height });
    }

    // Fast path: nothing to do
    if raster.width == width && raster.height == height {
        return Ok(raster);
    }

    let rgb = raster
        .into_rgb_image()
        .ok_or_else(|| DecodeError::DecodeFailed("pixel buffer length mismatch".to_string()))?;
    let resized = image::imageops::resize(&rgb, width, height, filter.to_image_filter());
    Ok(Raster::from_rgb_image(resized))
}

/// Scale a raster so that its aspect-dominant side becomes `edge`.
///
/// Landscape rasters get `edge` as their width, portrait and square rasters
/// get it as their height; the other side follows the aspect ratio with
/// truncating arithmetic. Small rasters are scaled up.
pub fn scale_to_max_edge(
    raster: Raster,
    edge: u32,
    filter: FilterType,
) -> Result<Raster, DecodeError> {
    let ratio = raster.width as f32 / raster.height as f32;
    let (width, height) = if ratio > 1.0 {
        (edge, (edge as f32 / ratio) as u32)
    } else {
        ((edge as f32 * ratio) as u32, edge)
    };
    resize(raster, width, height, filter)
}

/// Scale a raster so that its aspect-minor side becomes `edge`.
///
/// The counterpart of [`scale_to_max_edge`]: landscape rasters get `edge`
/// as their height, portrait and square rasters as their width.
pub fn scale_to_min_edge(
    raster: Raster,
    edge: u32,
    filter: FilterType,
) -> Result<Raster, DecodeError> {
    let ratio = raster.width as f32 / raster.height as f32;
    let (width, height) = if ratio > 1.0 {
        ((edge as f32 * ratio) as u32, edge)
    } else {
        (edge, (edge as f32 / ratio) as u32)
    };
    resize(raster, width, height, filter)
}
