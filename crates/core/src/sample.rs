//! Sample record
//!
//! A sample is the unit the writer archives: an immutable encoded image,
//! its class label and a small metadata mapping, all named by one key.

use crate::error::ShardResult;
use serde::{Deserialize, Serialize};

/// Entry extensions written for every sample
pub mod extensions {
    /// Encoded image payload
    pub const IMAGE: &str = "jpg";
    /// Decimal class label
    pub const CLASS: &str = "cls";
    /// JSON metadata mapping
    pub const METADATA: &str = "json";

    /// All extensions in the order they are written
    pub const ALL: [&str; 3] = [IMAGE, CLASS, METADATA];
}

/// Image dimensions stored alongside each payload
///
/// Serializes as `{"height":H,"width":W}`; field order is part of the
/// canonical encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleMetadata {
    /// Height in pixels
    pub height: u32,
    /// Width in pixels
    pub width: u32,
}

impl SampleMetadata {
    /// Build metadata from a `(width, height)` probe result.
    pub fn from_dimensions((width, height): (u32, u32)) -> Self {
        Self { height, width }
    }

    /// Canonical JSON encoding.
    pub fn to_json_bytes(&self) -> ShardResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// One keyed unit of data to be archived
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    /// Run-unique key
    pub key: String,
    /// Encoded image bytes, stored verbatim
    pub payload: Vec<u8>,
    /// Class id
    pub label: u32,
    /// Side data
    pub metadata: SampleMetadata,
}

impl Sample {
    /// Create a sample
    pub fn new(
        key: impl Into<String>,
        payload: Vec<u8>,
        label: u32,
        metadata: SampleMetadata,
    ) -> Self {
        Self {
            key: key.into(),
            payload,
            label,
            metadata,
        }
    }

    /// Label rendered as decimal text.
    pub fn label_bytes(&self) -> Vec<u8> {
        self.label.to_string().into_bytes()
    }

    /// Tar entry name for one of this sample's extensions.
    pub fn entry_name(&self, extension: &str) -> String {
        format!("{}.{}", self.key, extension)
    }
}
