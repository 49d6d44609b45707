//! Directory-of-classes image datasets
//!
//! Layout: `<root>/<split>/<class>/**/<image>`. Classes are the sorted
//! names of the split's subdirectories and a class's label is its
//! position in that order. Within a directory, files come first in sorted
//! order, then subdirectories are walked the same way; only known image
//! extensions are kept.

use crate::error::{DatasetError, DatasetResult};
use crate::source::{DatasetEntry, SampleSource};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Image file extensions accepted by the enumerator (lowercase)
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "ppm", "bmp", "pgm", "tif", "tiff", "webp",
];

/// One split of a directory-of-classes dataset
#[derive(Debug, Clone)]
pub struct ImageFolder {
    split: String,
    dir: PathBuf,
    classes: Vec<String>,
    entries: Vec<DatasetEntry>,
}

impl ImageFolder {
    /// Enumerate `root/split`.
    pub fn open(root: &Path, split: &str) -> DatasetResult<Self> {
        let dir = root.join(split);
        if !dir.is_dir() {
            return Err(DatasetError::SplitNotFound(dir.display().to_string()));
        }

        let mut classes = Vec::new();
        for path in sorted_children(&dir)?.into_iter().filter(|p| p.is_dir()) {
            match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => classes.push(name.to_string()),
                None => return Err(DatasetError::NonUtf8Class(path.display().to_string())),
            }
        }

        let mut entries = Vec::new();
        for (label, class) in classes.iter().enumerate() {
            let before = entries.len();
            collect_images(&dir.join(class), label as u32, &mut entries)?;
            debug!(target: "tarshard::dataset", class = %class, label, images = entries.len() - before, "Enumerated class");
        }

        if entries.is_empty() {
            return Err(DatasetError::EmptySplit(dir.display().to_string()));
        }

        info!(
            target: "tarshard::dataset",
            split,
            classes = classes.len(),
            images = entries.len(),
            "Enumerated split"
        );
        Ok(Self {
            split: split.to_string(),
            dir,
            classes,
            entries,
        })
    }

    /// Class names, indexed by label.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// All entries in enumeration order.
    pub fn entries(&self) -> &[DatasetEntry] {
        &self.entries
    }

    /// The split directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SampleSource for ImageFolder {
    fn split(&self) -> &str {
        &self.split
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn entry(&self, index: usize) -> Option<&DatasetEntry> {
        self.entries.get(index)
    }

    fn read(&self, entry: &DatasetEntry) -> DatasetResult<Vec<u8>> {
        fs::read(&entry.path).map_err(|e| DatasetError::read(&entry.path, e))
    }

    fn verify_labels(&self) -> DatasetResult<()> {
        for entry in &self.entries {
            let class = self.classes.get(entry.label as usize).ok_or_else(|| {
                DatasetError::LabelOutOfRange {
                    path: entry.path.display().to_string(),
                    label: entry.label,
                    classes: self.classes.len(),
                }
            })?;
            if !entry.path.starts_with(self.dir.join(class)) {
                return Err(DatasetError::LabelMismatch {
                    path: entry.path.display().to_string(),
                    label: entry.label,
                });
            }
        }
        Ok(())
    }
}

/// Whether `path` has an accepted image extension.
pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn sorted_children(dir: &Path) -> DatasetResult<Vec<PathBuf>> {
    let mut children = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| DatasetError::read(dir, e))? {
        children.push(entry?.path());
    }
    children.sort();
    Ok(children)
}

fn collect_images(dir: &Path, label: u32, out: &mut Vec<DatasetEntry>) -> DatasetResult<()> {
    let (subdirs, files): (Vec<PathBuf>, Vec<PathBuf>) =
        sorted_children(dir)?.into_iter().partition(|p| p.is_dir());
    for path in files {
        if path.is_file() && has_image_extension(&path) {
            out.push(DatasetEntry { path, label });
        }
    }
    for subdir in subdirs {
        collect_images(&subdir, label, out)?;
    }
    Ok(())
}
