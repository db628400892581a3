//! Geometric raster transforms.
//!
//! Rotation lives here; exact and aspect-driven resizing lives in
//! [`crate::decode`] next to the decode pipeline that uses it. All
//! transforms consume their input raster and return a new one.
//!
//! # Coordinate system
//!
//! - Rotation angles are in degrees, positive = clockwise
//! - Origin is the top-left corner, y points down
//! - Rotated output is re-framed to the rotated bounding box

mod rotation;

pub use rotation::{compute_rotated_bounds, resize_then_rotate, rotate};

pub(crate) use rotation::rotate_quarter;
