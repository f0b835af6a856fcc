// ============================================================
// Layer 3 — Domain Errors
// ============================================================
// Conditions a caller may want to match on get a typed error.
// Everything above the data layer wraps these in anyhow::Error
// with extra context.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SplitError {
    #[error("invalid split name '{0}' (expected val, train_supervised or train_unsupervised)")]
    Unknown(String),
}

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("cannot read index file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed index line {line_no} in {path}: '{line}'")]
    MalformedLine {
        path: PathBuf,
        line_no: usize,
        line: String,
    },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("sample index {index} out of range (dataset has {len} samples)")]
    OutOfRange { index: usize, len: usize },
    #[error("image decode error at {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("weak labels requested but no weak label directory configured")]
    MissingWeakLabelDir,
    #[error("{} listed image(s) missing or unreadable: {}", .paths.len(), list_paths(.paths))]
    UnreadableImages { paths: Vec<PathBuf> },
}

/// First few paths, comma separated.
fn list_paths(paths: &[PathBuf]) -> String {
    const SHOWN: usize = 5;
    let mut out = paths
        .iter()
        .take(SHOWN)
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    if paths.len() > SHOWN {
        out.push_str(&format!(" (+{} more)", paths.len() - SHOWN));
    }
    out
}
