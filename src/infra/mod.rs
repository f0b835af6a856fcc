// ============================================================
// Layer 5 — Infrastructure Layer
// ============================================================
// Cross-cutting helpers used by several layers:
//
//   palette.rs       — VOC color palette; colorizes label maps
//                      and maps color-encoded masks back to
//                      class ids
//
//   config_store.rs  — RunConfig persistence as JSON
//
//   metrics.rs       — Per-batch statistics written to CSV
//                      while iterating a split
//
// Reference: Rust Book §7 (Modules)

/// PASCAL VOC palette and label colorization
pub mod palette;

/// RunConfig saving and loading
pub mod config_store;

/// Batch statistics CSV logger
pub mod metrics;
