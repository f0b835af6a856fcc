// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The data layer implements these; the application layer only
// talks to the traits.
//
//   IndexSource   ← IndexFile (a split's .txt manifest)
//   SampleSource  ← SampleLoader (decode + resize from disk)
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::sample::{IndexEntry, SegSample};

// ─── IndexSource ──────────────────────────────────────────────────────────────
/// Anything that can list the samples of a split.
pub trait IndexSource {
    /// All entries in sample-index order.
    fn entries(&self) -> Result<Vec<IndexEntry>>;
}

// ─── SampleSource ─────────────────────────────────────────────────────────────
/// Anything that can produce a loaded sample by index.
pub trait SampleSource {
    fn sample_count(&self) -> usize;

    /// Load the sample at `index`.
    fn load_sample(&self, index: usize) -> Result<SegSample>;
}
