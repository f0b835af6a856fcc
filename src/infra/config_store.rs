// ============================================================
// Layer 5 — Config Store
// ============================================================
// Saves and restores a RunConfig as pretty-printed JSON.
//
// Typical layout next to an experiment:
//   runs/
//     robust_200.json   ← dataset + loader parameters
//     batches.csv       ← per-batch statistics (metrics.rs)
//
// Fields missing from a file take their defaults, so a config
// may list only what differs from them.
//
// Reference: serde_json crate documentation
//            Rust Book §9 (Error Handling)

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::application::config::RunConfig;

pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `cfg`, creating parent directories as needed.
    pub fn save(&self, cfg: &RunConfig) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create '{}'", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Cannot write config to '{}'", self.path.display()))?;

        tracing::debug!("Saved run config to '{}'", self.path.display());
        Ok(())
    }

    pub fn load(&self) -> Result<RunConfig> {
        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read config from '{}'", self.path.display()))?;

        serde_json::from_str(&json)
            .with_context(|| format!("Invalid config file '{}'", self.path.display()))
    }
}
