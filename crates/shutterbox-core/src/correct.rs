//! Orientation correction.
//!
//! Merges the metadata probe with the rotation transform: a freshly decoded
//! raster goes in, a raster whose pixels already sit upright comes out. The
//! corrected raster is its own type so a second correction pass, which
//! would re-read the resource's now-stale orientation tag and rotate again,
//! cannot be written by accident.

use crate::decode::Raster;
use crate::metadata::{read_orientation, MetadataSource, OrientationReading};
use crate::resource::ImageResource;
use crate::transform::rotate_quarter;

/// A raster whose stored pixels reflect the true upright orientation.
///
/// Carries the [`OrientationReading`] it was derived from, so callers can
/// tell a tagged-normal image from one whose metadata could not be read.
#[derive(Debug, Clone)]
pub struct UprightRaster {
    raster: Raster,
    reading: OrientationReading,
}

impl UprightRaster {
    pub fn width(&self) -> u32 {
        self.raster.width
    }

    pub fn height(&self) -> u32 {
        self.raster.height
    }

    /// The orientation probe this correction was based on.
    pub fn reading(&self) -> OrientationReading {
        self.reading
    }

    /// True if the orientation came from an unreadable metadata probe and
    /// the raster was passed through unrotated.
    pub fn metadata_was_unreadable(&self) -> bool {
        self.reading.source == MetadataSource::Unreadable
    }

    pub fn as_raster(&self) -> &Raster {
        &self.raster
    }

    /// Unwrap the pixel buffer, discarding the correction provenance.
    ///
    /// The result is indistinguishable from a raw decode. Do not feed it
    /// back through [`correct_orientation`] for the same resource: the tag
    /// would be applied a second time.
    pub fn into_raster(self) -> Raster {
        self.raster
    }
}

/// Bake the orientation recorded in `resource` into `raster`.
///
/// The metadata read is fail-open: when the tag cannot be read the raster
/// passes through unrotated, and the outcome is visible in the returned
/// wrapper's [`reading`](UprightRaster::reading).
///
/// Must be called exactly once per fresh decode. Correcting two fresh
/// decodes of the same resource yields identical results; correcting the
/// *output* of a correction is prevented by the type.
pub fn correct_orientation(raster: Raster, resource: &ImageResource) -> UprightRaster {
    let reading = read_orientation(resource);
    let turns = reading.orientation.degrees() / 90;
    let raster = rotate_quarter(raster, turns);
    UprightRaster { raster, reading }
}
