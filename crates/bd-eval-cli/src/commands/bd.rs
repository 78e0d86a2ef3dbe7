//! Single BD value command.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use bd_eval::{BdMode, BdOptions, Interpolation, compute_bd_detailed};
use tracing::debug;

pub struct BdArgs {
    pub input: Vec<PathBuf>,
    pub sequence: Option<String>,
    pub anchor: String,
    pub test: String,
    pub metric: String,
    pub mode: BdMode,
    pub interpolation: Interpolation,
    pub json: bool,
}

pub fn run(args: BdArgs) -> Result<()> {
    let dataset = super::load_dataset(&args.input)?;

    let sequence = match args.sequence {
        Some(s) => s,
        None => match dataset.sequences().as_slice() {
            [only] => (*only).to_string(),
            many => bail!(
                "Data has {} sequences; pick one with --sequence ({})",
                many.len(),
                many.join(", ")
            ),
        },
    };
    debug!(%sequence, anchor = %args.anchor, test = %args.test, "computing BD");

    let anchor = dataset
        .curve(&sequence, &args.anchor, &args.metric)
        .with_context(|| format!("Anchor curve '{}' on '{}'", args.anchor, sequence))?;
    let test = dataset
        .curve(&sequence, &args.test, &args.metric)
        .with_context(|| format!("Test curve '{}' on '{}'", args.test, sequence))?;

    let options = BdOptions::new(args.mode, args.interpolation);
    let report = compute_bd_detailed(&anchor, &test, &options)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let label = match args.mode {
        BdMode::RateSaving => "BD-rate",
        BdMode::QualityDifference => "BD-quality",
    };
    println!(
        "{} of '{}' vs '{}' on '{}' ({}, {}): {:+.4} {}",
        label,
        args.test,
        args.anchor,
        sequence,
        args.metric,
        args.interpolation,
        report.value,
        args.mode.unit()
    );
    println!(
        "Integration interval: [{:.4}, {:.4}]",
        report.interval.low, report.interval.high
    );

    Ok(())
}
