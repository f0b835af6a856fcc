// ============================================================
// Layer 4 — Index File Parser
// ============================================================
// Each split is described by a plain text manifest, one sample
// per line:
//
//   /images/seq_1/frame_000.png /labels/seq_1/frame_000.png
//   /images/seq_1/frame_001.png /labels/seq_1/frame_001.png
//
// The line number (ignoring blank lines) is the sample index.
// A line with only an image path is accepted and yields an
// entry without a label; the loader then falls back to zeros
// or to a weak label.
//
// Reference: Rust Book §8 (Strings), §9 (Error Handling)

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Result;

use crate::domain::error::IndexError;
use crate::domain::sample::IndexEntry;
use crate::domain::split::Split;
use crate::domain::traits::IndexSource;

/// Default directory holding the per-split index files.
pub const DEFAULT_SPLIT_DIR: &str = "dataloaders/robust_split";

/// A split's manifest on disk.
#[derive(Debug, Clone)]
pub struct IndexFile {
    path: PathBuf,
}

impl IndexFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Locate the manifest for `split` inside `split_dir`.
    pub fn for_split(split_dir: impl AsRef<Path>, split: Split, n_labeled_examples: usize) -> Self {
        Self::new(split_dir.as_ref().join(split.index_file_name(n_labeled_examples)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl IndexSource for IndexFile {
    fn entries(&self) -> Result<Vec<IndexEntry>> {
        let text = fs::read_to_string(&self.path).map_err(|source| IndexError::Io {
            path: self.path.clone(),
            source,
        })?;

        let entries = parse_index(&text, &self.path)?;
        tracing::debug!(
            "Parsed {} entries from '{}'",
            entries.len(),
            self.path.display()
        );
        Ok(entries)
    }
}

/// Parse manifest text. `path` is only used in error messages.
pub fn parse_index(text: &str, path: &Path) -> Result<Vec<IndexEntry>, IndexError> {
    let mut entries = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim_end();
        let mut fields = line.split_whitespace();

        let Some(image) = fields.next() else {
            continue;
        };
        let label = fields.next().map(str::to_string);

        if fields.next().is_some() {
            return Err(IndexError::MalformedLine {
                path: path.to_path_buf(),
                line_no: i + 1,
                line: line.to_string(),
            });
        }

        entries.push(IndexEntry::new(image, label));
    }

    Ok(entries)
}
