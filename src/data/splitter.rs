// ============================================================
// Layer 4 — Validation Carve-Out
// ============================================================
// Optionally holds back part of a split as a validation set.
//
//   1. indices 0..n are shuffled with a seeded RNG
//   2. the first floor(n * val_fraction) become validation
//   3. the rest stay in training
//
// The seed defaults to 0, so the carve-out is identical across
// runs and machines. A fraction of 0 disables it.
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom.
//
// Reference: rand crate documentation (StdRng, SeedableRng)

use anyhow::{bail, Result};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Seed used when the caller does not supply one.
pub const DEFAULT_SPLIT_SEED: u64 = 0;

/// Shuffle `0..n` and split it into `(train, val)` index lists.
pub fn split_indices(n: usize, val_fraction: f64, seed: u64) -> Result<(Vec<usize>, Vec<usize>)> {
    if !(0.0..1.0).contains(&val_fraction) {
        bail!("validation fraction must be in [0, 1), got {val_fraction}");
    }

    let mut indices: Vec<usize> = (0..n).collect();
    if val_fraction == 0.0 {
        return Ok((indices, Vec::new()));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let split_at = ((n as f64) * val_fraction).floor() as usize;
    let train = indices.split_off(split_at);

    tracing::debug!(
        "Carved out {} validation samples, {} remain for training",
        indices.len(),
        train.len()
    );

    Ok((train, indices))
}
