//! Image encoding.
//!
//! JPEG is the only output format; decode-side format guessing is wider,
//! but everything the pipeline persists goes out as JPEG at a caller-chosen
//! quality.
//!
//! # Examples
//!
//! ```ignore
//! use shutterbox_core::encode::encode_jpeg;
//!
//! let encoded = encode_jpeg(&raster, 90)?;
//! println!("compressed to {} bytes", encoded.bytes.len());
//! ```

mod jpeg;

pub use jpeg::{encode_jpeg, EncodeError, EncodedImage};
