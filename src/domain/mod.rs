// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types that describe the dataset: which split we
// are reading, what one manifest row looks like, and what a
// loaded sample looks like.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain structs, enums, traits and error types
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

/// Named dataset partitions and their index file names
pub mod split;

/// Manifest rows, loaded samples and the fixed target shape
pub mod sample;

/// Core abstractions that the data layer implements
pub mod traits;

/// Typed errors for split parsing, index parsing and loading
pub mod error;
