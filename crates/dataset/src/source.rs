//! Sample source abstraction
//!
//! The converter only needs indexed access to `(file, label)` entries and
//! their bytes; `ImageFolder` provides it from disk, tests provide it from
//! memory.

use crate::error::DatasetResult;
use std::path::PathBuf;

/// One enumerated dataset entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetEntry {
    /// File holding the encoded image
    pub path: PathBuf,
    /// Class id
    pub label: u32,
}

/// Indexed access to a split's entries
pub trait SampleSource {
    /// Name of the split being enumerated
    fn split(&self) -> &str;

    /// Number of entries
    fn len(&self) -> usize;

    /// Whether the source has no entries
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entry at `index`, in enumeration order
    fn entry(&self, index: usize) -> Option<&DatasetEntry>;

    /// Raw bytes of an entry
    fn read(&self, entry: &DatasetEntry) -> DatasetResult<Vec<u8>>;

    /// Check every entry's label against the class table
    fn verify_labels(&self) -> DatasetResult<()>;
}
