//! Re-openable handles to source image bytes.
//!
//! The pipeline reads a resource more than once per operation: once for the
//! metadata probe, once for the dimension measurement, and once for the
//! pixel decode. A resource is therefore a handle that can produce a fresh
//! reader on demand, never a single-use stream.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::decode::DecodeError;

/// An opaque, re-openable handle to source image bytes.
///
/// Outlives the whole pipeline invocation; every stage that needs the bytes
/// calls [`ImageResource::open`] for its own reader.
#[derive(Debug, Clone)]
pub enum ImageResource {
    /// An image file on the local filesystem.
    Path(PathBuf),
    /// An image already held in memory.
    Memory(Vec<u8>),
}

impl ImageResource {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        ImageResource::Path(path.into())
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        ImageResource::Memory(bytes)
    }

    /// Open a fresh reader over the resource.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::ResourceNotFound`] if a path resource does not
    /// exist, and [`DecodeError::Io`] for any other open failure.
    pub fn open(&self) -> Result<ResourceReader<'_>, DecodeError> {
        match self {
            ImageResource::Path(path) => {
                let file = File::open(path).map_err(|err| match err.kind() {
                    io::ErrorKind::NotFound => DecodeError::ResourceNotFound(path.clone()),
                    _ => DecodeError::Io(err.to_string()),
                })?;
                Ok(ResourceReader::File(BufReader::new(file)))
            }
            ImageResource::Memory(bytes) => {
                Ok(ResourceReader::Memory(Cursor::new(bytes.as_slice())))
            }
        }
    }

    /// The filesystem path behind this resource, when it has one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ImageResource::Path(path) => Some(path),
            ImageResource::Memory(_) => None,
        }
    }
}

/// A reader over an opened [`ImageResource`].
///
/// Implements the buffered, seekable interface that both the image reader
/// and the EXIF parser require.
pub enum ResourceReader<'a> {
    File(BufReader<File>),
    Memory(Cursor<&'a [u8]>),
}

impl Read for ResourceReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            ResourceReader::File(reader) => reader.read(buf),
            ResourceReader::Memory(cursor) => cursor.read(buf),
        }
    }
}

impl BufRead for ResourceReader<'_> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            ResourceReader::File(reader) => reader.fill_buf(),
            ResourceReader::Memory(cursor) => cursor.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            ResourceReader::File(reader) => reader.consume(amt),
            ResourceReader::Memory(cursor) => cursor.consume(amt),
        }
    }
}

impl Seek for ResourceReader<'_> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            ResourceReader::File(reader) => reader.seek(pos),
            ResourceReader::Memory(cursor) => cursor.seek(pos),
        }
    }
}
