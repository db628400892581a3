//! Shared fixtures for unit tests.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::decode::Raster;
use crate::encode::encode_jpeg;

/// Route log records from exercised fail-open paths to test output.
pub(crate) fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A gradient raster: red follows x, green follows y, blue is constant.
pub(crate) fn gradient_raster(width: u32, height: u32) -> Raster {
    let mut pixels = Vec::with_capacity(width as usize * height as usize * 3);
    for y in 0..height {
        for x in 0..width {
            pixels.push(((x * 255) / width.max(1)) as u8);
            pixels.push(((y * 255) / height.max(1)) as u8);
            pixels.push(128);
        }
    }
    Raster::new(width, height, pixels)
}

/// JPEG-encode a raster at quality 90.
pub(crate) fn jpeg_bytes(raster: &Raster) -> Vec<u8> {
    encode_jpeg(raster, 90).unwrap().bytes
}

/// Splice a minimal EXIF APP1 segment carrying `orientation_code` into a
/// JPEG stream, right after the SOI marker.
///
/// The segment is a little-endian TIFF block with a single IFD0 entry, the
/// orientation SHORT.
pub(crate) fn with_exif_orientation(jpeg: &[u8], orientation_code: u16) -> Vec<u8> {
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8], "not a JPEG stream");

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II*\0");
    tiff.extend_from_slice(&8u32.to_le_bytes()); // IFD0 offset
    tiff.extend_from_slice(&1u16.to_le_bytes()); // entry count
    tiff.extend_from_slice(&0x0112u16.to_le_bytes()); // Orientation tag
    tiff.extend_from_slice(&3u16.to_le_bytes()); // SHORT
    tiff.extend_from_slice(&1u32.to_le_bytes()); // value count
    tiff.extend_from_slice(&orientation_code.to_le_bytes());
    tiff.extend_from_slice(&[0, 0]); // value field padding
    tiff.extend_from_slice(&0u32.to_le_bytes()); // no next IFD

    let payload_len = 2 + 6 + tiff.len(); // length field + "Exif\0\0" + TIFF

    let mut out = Vec::with_capacity(jpeg.len() + payload_len + 2);
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&(payload_len as u16).to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(&tiff);
    out.extend_from_slice(&jpeg[2..]);
    out
}

/// A directory under the system temp root, removed on drop.
pub(crate) struct TempDir {
    path: PathBuf,
}

static NEXT_TEMP_ID: AtomicU64 = AtomicU64::new(0);

impl TempDir {
    pub(crate) fn new(tag: &str) -> Self {
        let id = NEXT_TEMP_ID.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "shutterbox-test-{}-{tag}-{id}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&path);
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    pub(crate) fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}
