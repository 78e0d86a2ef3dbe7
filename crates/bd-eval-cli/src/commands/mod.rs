//! Subcommand implementations.

pub mod bd;
pub mod import;
pub mod table;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use bd_eval::{RdDataset, SourceRegistry};
use tracing::info;

/// Load and merge every input file.
pub fn load_dataset(inputs: &[PathBuf]) -> Result<RdDataset> {
    let registry = SourceRegistry::default();
    let mut dataset = RdDataset::default();

    for path in inputs {
        let loaded = registry
            .load(path)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        info!(path = %path.display(), points = loaded.len(), "loaded");
        dataset.extend(loaded);
    }

    if dataset.is_empty() {
        bail!("No RD points found in input");
    }
    Ok(dataset)
}
