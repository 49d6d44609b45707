//! Image dimension probe
//!
//! Only the image header is parsed; pixel data is never decoded.

use crate::error::{DatasetError, DatasetResult};
use image::ImageReader;
use std::io::Cursor;

/// Return `(width, height)` of an encoded image.
pub fn probe_dimensions(bytes: &[u8]) -> DatasetResult<(u32, u32)> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    if reader.format().is_none() {
        return Err(DatasetError::decode("<memory>", "unrecognized image format"));
    }
    reader
        .into_dimensions()
        .map_err(|e| DatasetError::decode("<memory>", e.to_string()))
}
