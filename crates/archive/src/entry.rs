//! Tar entry encoding for samples
//!
//! Each sample becomes three contiguous tar entries, `<key>.jpg`,
//! `<key>.cls` and `<key>.json`, always appended together. Headers carry
//! a zero mtime and fixed mode so identical inputs produce identical shards.

use std::io::Write;
use tar::{Builder, EntryType, Header};
use tarshard_core::{extensions, Sample, ShardError, ShardResult};

/// A sample rendered into its entry payloads, ready to append.
#[derive(Debug)]
pub struct EncodedSample<'a> {
    sample: &'a Sample,
    class: Vec<u8>,
    metadata: Vec<u8>,
}

impl<'a> EncodedSample<'a> {
    /// Render the label and metadata side files.
    pub fn new(sample: &'a Sample) -> ShardResult<Self> {
        Ok(Self {
            sample,
            class: sample.label_bytes(),
            metadata: sample.metadata.to_json_bytes()?,
        })
    }

    /// Bytes charged against the shard budget.
    ///
    /// Counts entry payloads only; tar headers and padding are not tracked.
    pub fn byte_count(&self) -> u64 {
        (self.sample.payload.len() + self.class.len() + self.metadata.len()) as u64
    }

    /// Entries in write order.
    pub fn entries(&self) -> [(&'static str, &[u8]); 3] {
        [
            (extensions::IMAGE, self.sample.payload.as_slice()),
            (extensions::CLASS, self.class.as_slice()),
            (extensions::METADATA, self.metadata.as_slice()),
        ]
    }

    /// Append all entries of the sample to `builder`.
    pub fn append_to<W: Write>(&self, builder: &mut Builder<W>) -> ShardResult<()> {
        for (extension, data) in self.entries() {
            let name = self.sample.entry_name(extension);
            append_file(builder, &name, data)?;
        }
        Ok(())
    }
}

/// Append one regular file entry to the archive.
fn append_file<W: Write>(builder: &mut Builder<W>, name: &str, data: &[u8]) -> ShardResult<()> {
    let mut header = Header::new_gnu();
    header.set_entry_type(EntryType::Regular);
    header.set_size(data.len() as u64);
    header.set_mode(0o444);
    header.set_mtime(0);

    // append_data writes a GNU long-name record when `name` exceeds 100 bytes
    builder
        .append_data(&mut header, name, data)
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::InvalidInput | std::io::ErrorKind::InvalidData => {
                ShardError::archive(format!("append '{}': {}", name, e))
            }
            _ => ShardError::Io(e),
        })
}
