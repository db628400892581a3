//! Shutterbox core - bounded-memory image loading with orientation-correct
//! save.
//!
//! Given a re-openable handle to an image of unknown dimensions, this crate
//! produces a decoded raster that stays within a caller-chosen pixel
//! budget, rotates it to match the orientation the camera recorded, and can
//! re-encode and persist it without leaving a stale orientation tag or a
//! partially-written file behind.
//!
//! # Data flow
//!
//! ```text
//! ImageResource -> metadata (orientation)  \
//!               -> decode (budgeted raster) -> correct -> encode -> store
//! ```
//!
//! The metadata probe and the pixel decode read the resource independently;
//! [`correct_orientation`] merges them into an [`UprightRaster`] whose
//! pixels already sit upright. Rasters move by value through every
//! transform, so a superseded buffer is released the moment its successor
//! exists.

pub mod correct;
pub mod decode;
pub mod encode;
pub mod metadata;
pub mod pipeline;
pub mod resource;
pub mod store;
pub mod transform;

#[cfg(test)]
pub(crate) mod testkit;

pub use correct::{correct_orientation, UprightRaster};
pub use decode::{
    decode_approx_dimensions, decode_fit_edge, decode_full, decode_with_budget,
    decode_within_pixel_budget, probe_dimensions, resize, scale_to_max_edge, scale_to_min_edge,
    DecodeBudget, DecodeError, FilterType, ImageDimensions, Raster, DEFAULT_DISPLAY_EDGE,
};
pub use encode::{encode_jpeg, EncodeError, EncodedImage};
pub use metadata::{read_orientation, MetadataSource, Orientation, OrientationReading};
pub use pipeline::{
    encode_and_write, load_upright, load_upright_approx, load_upright_bounded, resave_upright,
    save_raster, save_upright, PipelineError,
};
pub use resource::{ImageResource, ResourceReader};
pub use store::{copy_file, unique_image_name, write_atomic, PersistError, StoreConfig};
pub use transform::{compute_rotated_bounds, resize_then_rotate, rotate};
