//! High-level load, correct, and save operations.
//!
//! One call per user action: decode under a budget, bake in the recorded
//! orientation, and optionally re-encode and persist the result. Each
//! operation runs synchronously and takes its configuration explicitly;
//! nothing in here reads shared state.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::correct::{correct_orientation, UprightRaster};
use crate::decode::{
    decode_approx_dimensions, decode_full, decode_within_pixel_budget, DecodeError, Raster,
};
use crate::encode::encode_jpeg;
use crate::resource::ImageResource;
use crate::store::{write_atomic, PersistError, StoreConfig};

/// Error type for whole-pipeline operations.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// Decode `resource` at full resolution and bake in its recorded
/// orientation.
///
/// # Errors
///
/// Surfaces [`DecodeError::ResourceNotFound`] and
/// [`DecodeError::DecodeFailed`]; an unreadable orientation tag is not an
/// error (the raster passes through unrotated, see
/// [`UprightRaster::reading`]).
pub fn load_upright(resource: &ImageResource) -> Result<UprightRaster, DecodeError> {
    let raster = decode_full(resource)?;
    Ok(correct_orientation(raster, resource))
}

/// Decode `resource` within `max_pixels` and bake in its recorded
/// orientation.
///
/// Follows the budgeted decode's absorbing contract: any failure comes back
/// as `None`, already logged.
pub fn load_upright_bounded(
    resource: &ImageResource,
    max_pixels: u32,
) -> Option<UprightRaster> {
    let raster = decode_within_pixel_budget(resource, max_pixels)?;
    Some(correct_orientation(raster, resource))
}

/// Decode `resource` near the requested dimensions (approximate contract)
/// and bake in its recorded orientation.
pub fn load_upright_approx(
    resource: &ImageResource,
    base_sample_size: u32,
    width: u32,
    height: u32,
) -> Result<UprightRaster, DecodeError> {
    let raster = decode_approx_dimensions(resource, base_sample_size, width, height)?;
    Ok(correct_orientation(raster, resource))
}

/// Encode `raster` as JPEG at `quality` and write it to `dest` atomically.
///
/// Encoding happens fully in memory before the destination is touched, and
/// the write itself goes through a temp-and-rename, so no failure mode
/// leaves a partial file behind.
pub fn encode_and_write(raster: &Raster, dest: &Path, quality: u8) -> Result<(), PersistError> {
    let encoded = encode_jpeg(raster, quality)?;
    write_atomic(dest, &encoded.bytes)
}

/// Persist an already-corrected raster under the configured root.
///
/// Returns the path written, `<root>/img_<unix_millis>.jpg`.
pub fn save_raster(
    upright: &UprightRaster,
    quality: u8,
    config: &StoreConfig,
) -> Result<PathBuf, PersistError> {
    let dest = config.destination_image_path()?;
    encode_and_write(upright.as_raster(), &dest, quality)?;
    log::debug!(
        "saved {}x{} image to {}",
        upright.width(),
        upright.height(),
        dest.display()
    );
    Ok(dest)
}

/// Load `resource`, correct its orientation, and persist it as JPEG under
/// the configured root.
///
/// The stored pixels sit upright and the written file carries no
/// orientation tag, so nothing downstream can re-apply a stale rotation.
/// A missing resource fails before any directory or file is created.
pub fn save_upright(
    resource: &ImageResource,
    quality: u8,
    config: &StoreConfig,
) -> Result<PathBuf, PipelineError> {
    let upright = load_upright(resource)?;
    Ok(save_raster(&upright, quality, config)?)
}

/// Re-encode a path resource upright, in place, at `quality`.
///
/// Mirrors the save-over-source flow: the rewritten file has the rotation
/// baked into its pixels instead of a tag. Both the pixels and the
/// orientation are read before the destination is replaced, and the
/// replacement itself is atomic.
///
/// # Errors
///
/// In-memory resources have no destination path and fail with
/// [`DecodeError::Io`].
pub fn resave_upright(resource: &ImageResource, quality: u8) -> Result<(), PipelineError> {
    let Some(path) = resource.path() else {
        return Err(DecodeError::Io("in-memory resource has no destination path".to_string()).into());
    };
    let dest = path.to_path_buf();
    let upright = load_upright(resource)?;
    encode_and_write(upright.as_raster(), &dest, quality).map_err(PipelineError::Persist)
}
