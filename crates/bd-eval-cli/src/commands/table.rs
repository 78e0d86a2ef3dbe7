//! Anchor table command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use bd_eval::{BdMode, BdTable, Interpolation, TableConfig};
use tracing::warn;

use crate::TableFormat;

pub struct TableArgs {
    pub input: Vec<PathBuf>,
    pub anchor: String,
    pub metric: String,
    pub mode: BdMode,
    pub interpolation: Interpolation,
    pub format: TableFormat,
    pub output: Option<PathBuf>,
    pub summary: bool,
}

pub fn run(args: TableArgs) -> Result<()> {
    let dataset = super::load_dataset(&args.input)?;

    let config = TableConfig::builder(&args.anchor)
        .metric(&args.metric)
        .mode(args.mode)
        .interpolation(args.interpolation)
        .build();

    let table = BdTable::compute(&dataset, &config).with_context(|| {
        format!(
            "Anchor '{}' not found; available: {}",
            args.anchor,
            dataset.configs().join(", ")
        )
    })?;

    if table.failed_count() > 0 {
        warn!(failed = table.failed_count(), "some cells could not be computed");
    }

    let rendered = render(&table, args.format)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
            println!("Saved to: {}", path.display());
        }
        None => print!("{}", rendered),
    }

    if args.summary {
        print_summary(&table);
    }

    Ok(())
}

fn render(table: &BdTable, format: TableFormat) -> Result<String> {
    Ok(match format {
        TableFormat::Text => table.to_text(),
        TableFormat::Latex => table.to_latex(),
        TableFormat::Json => serde_json::to_string_pretty(table)? + "\n",
        TableFormat::Csv => {
            let mut buf = Vec::new();
            table.write_csv(&mut buf)?;
            String::from_utf8(buf).context("CSV output is not UTF-8")?
        }
    })
}

fn print_summary(table: &BdTable) {
    println!();
    println!("Summary by configuration ({}):", table.config.mode.unit());
    println!("{:-<72}", "");
    println!(
        "{:<20} {:>6} {:>10} {:>10} {:>10} {:>10}",
        "Config", "Cells", "Mean", "Median", "Min", "Max"
    );
    println!("{:-<72}", "");

    for (config, summary) in table.summaries() {
        match summary {
            Some(s) => println!(
                "{:<20} {:>6} {:>10.3} {:>10.3} {:>10.3} {:>10.3}",
                config, s.count, s.mean, s.median, s.min, s.max
            ),
            None => println!("{:<20} {:>6} {:>10}", config, 0, "N/A"),
        }
    }
}
