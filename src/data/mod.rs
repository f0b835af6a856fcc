// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between a split's index file and a tensor batch.
//
//   split_dir/{n}_{split}.txt
//       │
//       ▼
//   IndexFile         → parses (image, label) rows
//       │
//       ▼
//   SampleLoader      → resolves paths, swaps in weak labels,
//       │               decodes, falls back to zero masks
//       ▼
//   Preprocessor      → fixed (500, 334[, 3]) resize
//       │
//       ▼
//   SegDataset        → implements Burn's Dataset trait
//       │               (optionally a seeded val carve-out)
//       ▼
//   SegBatcher        → normalizes and stacks into tensors
//       │
//       ▼
//   DataLoader        → batching, shuffling, worker threads
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Parses a split's index file
pub mod index;

/// Decodes images/labels and resizes them to the target shape
pub mod preprocessor;

/// Resolves paths and loads one (image, label, id) sample
pub mod sample_loader;

/// Implements Burn's Dataset trait over a split
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Seeded train/validation index split
pub mod splitter;
