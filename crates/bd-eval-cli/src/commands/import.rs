//! CSV import command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use bd_eval::import::{CsvImporter, CsvSchema, DEFAULT_CONFIG};
use tracing::info;

pub fn run(
    input: PathBuf,
    output: Option<PathBuf>,
    sequence_col: Option<String>,
    config_col: Option<String>,
    rate_col: Option<String>,
) -> Result<()> {
    info!(path = %input.display(), "importing");

    let mut schema = CsvSchema::builder();
    if let Some(col) = sequence_col {
        schema = schema.sequence_column(col);
    }
    if let Some(col) = config_col {
        schema = schema.config_column(col);
    }
    if let Some(col) = rate_col {
        schema = schema.rate_column(col);
    }

    let default_config = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(DEFAULT_CONFIG)
        .to_string();

    let dataset = CsvImporter::new(schema.build())
        .import_with_default_config(&input, &default_config)
        .with_context(|| format!("Failed to import CSV from {}", input.display()))?;

    println!("Imported {} points", dataset.len());

    println!("Sequences: {}", dataset.sequences().len());
    println!("Configurations:");
    for config in dataset.configs() {
        let count = dataset.points.iter().filter(|p| p.config == config).count();
        println!("  {}: {}", config, count);
    }
    println!("Metrics: {}", dataset.metrics().join(", "));

    if let Some(output_path) = output {
        let json = serde_json::to_string_pretty(&dataset)?;
        std::fs::write(&output_path, json)
            .with_context(|| format!("Failed to write to {}", output_path.display()))?;
        println!("Saved to: {}", output_path.display());
    }

    Ok(())
}
