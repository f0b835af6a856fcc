// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the data layer for a specific goal. No pixel
// math here and no printing (that's Layer 1).
//
//   config.rs            — RunConfig = DatasetConfig + LoaderConfig
//   robust_loader.rs     — dataset constants + Burn DataLoaders
//   inspect_use_case.rs  — path/label availability of a split
//   preview_use_case.rs  — load and describe one sample
//   iterate_use_case.rs  — one pass over a split, batch stats

/// Run configuration shared by every command
pub mod config;

/// Composition of the data layer with Burn's DataLoader
pub mod robust_loader;

/// Split inspection workflow
pub mod inspect_use_case;

/// Single-sample preview workflow
pub mod preview_use_case;

/// Full-pass iteration workflow
pub mod iterate_use_case;
