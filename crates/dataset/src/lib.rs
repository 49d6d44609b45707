//! Dataset source for tarshard
//!
//! Enumerates directory-of-classes image datasets, reads image bytes,
//! probes image dimensions and produces shuffled visiting orders.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
pub mod folder;
pub mod probe;
pub mod shuffle;
pub mod source;

pub use error::{DatasetError, DatasetResult};
pub use folder::{has_image_extension, ImageFolder, IMAGE_EXTENSIONS};
pub use probe::probe_dimensions;
pub use shuffle::shuffled_indices;
pub use source::{DatasetEntry, SampleSource};
