//! EXIF orientation extraction.
//!
//! Reads the orientation tag a camera records at capture time, without ever
//! touching pixel data. The read is fail-open: a resource with unreadable
//! metadata yields [`Orientation::Normal`] instead of an error, so a save is
//! never failed over a missing tag. The [`OrientationReading`] carries the
//! provenance of the value, which keeps the absorbed failure observable to
//! callers and tests.

use exif::{In, Reader, Tag};
use serde::{Deserialize, Serialize};

use crate::resource::ImageResource;

/// Physical rotation needed to display an image upright as captured.
///
/// Only the four rotation cases are modeled. Mirrored EXIF variants
/// (codes 2, 4, 5 and 7) fall back to `Normal`; flipped captures come out
/// un-mirrored. This is a known gap inherited from the pipeline's contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    /// Already upright.
    #[default]
    Normal,
    /// Needs a 90 degree clockwise turn.
    Rotate90,
    /// Needs a half turn.
    Rotate180,
    /// Needs a 270 degree clockwise turn.
    Rotate270,
}

impl Orientation {
    /// Map a raw EXIF orientation code. Codes 3, 6 and 8 are the rotation
    /// cases; everything else, including the mirrored variants, maps to
    /// `Normal`.
    pub fn from_exif_code(code: u32) -> Self {
        match code {
            3 => Orientation::Rotate180,
            6 => Orientation::Rotate90,
            8 => Orientation::Rotate270,
            _ => Orientation::Normal,
        }
    }

    /// Clockwise degrees to apply when baking the correction in.
    pub fn degrees(self) -> u32 {
        match self {
            Orientation::Normal => 0,
            Orientation::Rotate90 => 90,
            Orientation::Rotate180 => 180,
            Orientation::Rotate270 => 270,
        }
    }

    /// True if correcting this orientation swaps width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Orientation::Rotate90 | Orientation::Rotate270)
    }
}

/// Where an orientation value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetadataSource {
    /// An orientation tag was present and parsed.
    Tag,
    /// The metadata parsed cleanly but carried no orientation tag.
    Missing,
    /// The resource could not be opened, or its metadata was corrupt.
    Unreadable,
}

/// Outcome of an orientation probe.
///
/// Never an error: the `source` field distinguishes "tagged normal" from
/// "nothing to read" from "read failed", all of which decode as `Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrientationReading {
    pub orientation: Orientation,
    pub source: MetadataSource,
}

impl OrientationReading {
    fn tagged(orientation: Orientation) -> Self {
        Self {
            orientation,
            source: MetadataSource::Tag,
        }
    }

    fn missing() -> Self {
        Self {
            orientation: Orientation::Normal,
            source: MetadataSource::Missing,
        }
    }

    fn unreadable() -> Self {
        Self {
            orientation: Orientation::Normal,
            source: MetadataSource::Unreadable,
        }
    }
}

/// Read the recorded orientation of `resource` without decoding pixels.
pub fn read_orientation(resource: &ImageResource) -> OrientationReading {
    let mut reader = match resource.open() {
        Ok(reader) => reader,
        Err(err) => {
            log::warn!("orientation probe could not open resource: {err}");
            return OrientationReading::unreadable();
        }
    };

    match Reader::new().read_from_container(&mut reader) {
        Ok(exif) => {
            match exif
                .get_field(Tag::Orientation, In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
            {
                Some(code) => OrientationReading::tagged(Orientation::from_exif_code(code)),
                None => OrientationReading::missing(),
            }
        }
        // A container with no metadata segment at all is ordinary
        Err(exif::Error::NotFound(_)) => OrientationReading::missing(),
        Err(err) => {
            log::warn!("orientation probe failed: {err}");
            OrientationReading::unreadable()
        }
    }
}
