//! Bounded image decoding.
//!
//! This module provides functionality for:
//! - Measuring source dimensions without materializing pixel data
//! - Decoding under a caller-supplied pixel budget (two-pass
//!   measure-then-subsample)
//! - Approximate dimension-bounded and display-sized decodes
//! - Exact and aspect-driven resizing of decoded rasters
//!
//! # Decode strategy
//!
//! Budgeted decodes run in two passes. The first pass reads only the header
//! to learn the source dimensions; the second decodes at a subsample factor
//! chosen so the raster lands at or near the budget. Subsampling during the
//! decode pass is cheap, and the one precise resize happens on the
//! already-reduced buffer.
//!
//! # Examples
//!
//! ```ignore
//! use shutterbox_core::decode::{decode_within_pixel_budget, probe_dimensions};
//! use shutterbox_core::resource::ImageResource;
//!
//! let resource = ImageResource::from_path("photo.jpg");
//! let dims = probe_dimensions(&resource)?;
//! println!("source is {}x{}", dims.width, dims.height);
//!
//! // Roughly 600x600 worth of pixels, whatever the source size
//! let raster = decode_within_pixel_budget(&resource, 360_000);
//! ```

mod bounded;
mod probe;
mod resize;
mod types;

pub use bounded::{
    decode_approx_dimensions, decode_fit_edge, decode_full, decode_with_budget,
    decode_within_pixel_budget, DEFAULT_DISPLAY_EDGE,
};
pub use probe::probe_dimensions;
pub use resize::{resize, scale_to_max_edge, scale_to_min_edge};
pub use types::{DecodeBudget, DecodeError, FilterType, ImageDimensions, Raster};
