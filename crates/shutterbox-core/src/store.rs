//! Destination roots and atomic file writes.
//!
//! Persisted images land as `img_<unix_millis>.jpg` under a configured root
//! directory. The root has a primary and a fallback candidate; the primary
//! wins whenever its directory tree is available. Configuration is a plain
//! value passed into each call, never process-wide state.
//!
//! Writes are atomic: bytes go to a sibling temp file first and are renamed
//! into place only on success, so a failed write never leaves a partial
//! destination that looks complete.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encode::EncodeError;

/// Errors that can occur while persisting an image.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The compression step failed before anything was written.
    #[error("encode failed: {0}")]
    Encode(#[from] EncodeError),

    /// The destination could not be created or written.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

/// Destination roots for persisted images.
///
/// Constructed once by the application setup layer and passed by reference
/// into each pipeline invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Preferred root, used whenever it is available.
    pub primary_root: PathBuf,
    /// Root used when the primary cannot be created.
    pub fallback_root: PathBuf,
}

impl StoreConfig {
    pub fn new(primary_root: impl Into<PathBuf>, fallback_root: impl Into<PathBuf>) -> Self {
        Self {
            primary_root: primary_root.into(),
            fallback_root: fallback_root.into(),
        }
    }

    /// Select the destination root and create its directory tree.
    ///
    /// The primary root wins when `create_dir_all` succeeds on it; the
    /// fallback is only tried after, and its failure is the caller's error.
    pub fn select_root(&self) -> Result<PathBuf, PersistError> {
        if fs::create_dir_all(&self.primary_root).is_ok() {
            return Ok(self.primary_root.clone());
        }
        log::warn!(
            "primary root {} unavailable, using fallback {}",
            self.primary_root.display(),
            self.fallback_root.display()
        );
        fs::create_dir_all(&self.fallback_root)?;
        Ok(self.fallback_root.clone())
    }

    /// Full destination path for a newly persisted image.
    pub fn destination_image_path(&self) -> Result<PathBuf, PersistError> {
        Ok(self.select_root()?.join(unique_image_name()))
    }
}

/// File name for a newly persisted image: `img_<unix_millis>.jpg`.
pub fn unique_image_name() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or(0);
    format!("img_{millis}.jpg")
}

/// Write `bytes` to `dest` atomically.
///
/// The data lands in a sibling `.tmp` file which is renamed over `dest`
/// only after a successful write. On any failure the temp file is removed;
/// an existing `dest` is left exactly as it was.
pub fn write_atomic(dest: &Path, bytes: &[u8]) -> Result<(), PersistError> {
    let tmp = temp_sibling(dest);
    match fs::write(&tmp, bytes) {
        Ok(()) => {}
        Err(err) => {
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }
    }
    if let Err(err) = fs::rename(&tmp, dest) {
        let _ = fs::remove_file(&tmp);
        return Err(err.into());
    }
    Ok(())
}

// The temp file stays in the destination directory so the final rename
// never crosses a filesystem boundary.
fn temp_sibling(dest: &Path) -> PathBuf {
    let mut name: OsString = dest
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("image"));
    name.push(".tmp");
    dest.with_file_name(name)
}

/// Copy `src` to `dst` through the atomic write path.
///
/// A missing source surfaces as the underlying not-found I/O error; `dst`
/// is untouched in that case.
pub fn copy_file(src: &Path, dst: &Path) -> Result<(), PersistError> {
    let bytes = fs::read(src)?;
    write_atomic(dst, &bytes)
}
