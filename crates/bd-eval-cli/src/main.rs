//! bd-eval CLI - Bjontegaard-Delta comparison tool

use std::path::PathBuf;

use bd_eval::{BdMode, Interpolation};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod commands;

/// Compare rate-distortion curves with the Bjontegaard-Delta metric.
#[derive(Parser)]
#[command(name = "bd-eval")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute one BD value between two configurations
    Bd {
        /// Input files (CSV or JSON); configs without a column take the file stem
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Sequence to compare (optional when the data has only one)
        #[arg(short, long)]
        sequence: Option<String>,

        /// Reference configuration (curve 1)
        #[arg(long)]
        anchor: String,

        /// Configuration measured against the anchor (curve 2)
        #[arg(long)]
        test: String,

        /// Quality metric column
        #[arg(long, default_value = "psnr")]
        metric: String,

        /// BD mode: rate (BD-rate %) or quality (BD-PSNR dB)
        #[arg(long, default_value = "rate")]
        mode: BdMode,

        /// Interpolation: cubic or pchip
        #[arg(long, default_value = "cubic")]
        interp: Interpolation,

        /// Print the full report (interval, fitted curves) as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compute BD values of every configuration against an anchor
    Table {
        /// Input files (CSV or JSON)
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Reference configuration
        #[arg(long)]
        anchor: String,

        /// Quality metric column
        #[arg(long, default_value = "psnr")]
        metric: String,

        /// BD mode: rate or quality
        #[arg(long, default_value = "rate")]
        mode: BdMode,

        /// Interpolation: cubic or pchip
        #[arg(long, default_value = "cubic")]
        interp: Interpolation,

        /// Output format
        #[arg(long, value_enum, default_value_t = TableFormat::Text)]
        format: TableFormat,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print per-configuration summary statistics
        #[arg(long)]
        summary: bool,
    },

    /// Convert a CSV table of RD measurements to a JSON dataset
    Import {
        /// Input CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Output JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Sequence column name
        #[arg(long)]
        sequence_col: Option<String>,

        /// Configuration column name
        #[arg(long)]
        config_col: Option<String>,

        /// Rate column name
        #[arg(long)]
        rate_col: Option<String>,
    },
}

/// Table output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TableFormat {
    /// Aligned plain text
    Text,
    /// LaTeX tabular
    Latex,
    /// Long-format CSV
    Csv,
    /// JSON
    Json,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Bd {
            input,
            sequence,
            anchor,
            test,
            metric,
            mode,
            interp,
            json,
        } => commands::bd::run(commands::bd::BdArgs {
            input,
            sequence,
            anchor,
            test,
            metric,
            mode,
            interpolation: interp,
            json,
        }),
        Commands::Table {
            input,
            anchor,
            metric,
            mode,
            interp,
            format,
            output,
            summary,
        } => commands::table::run(commands::table::TableArgs {
            input,
            anchor,
            metric,
            mode,
            interpolation: interp,
            format,
            output,
            summary,
        }),
        Commands::Import {
            input,
            output,
            sequence_col,
            config_col,
            rate_col,
        } => commands::import::run(input, output, sequence_col, config_col, rate_col),
    }
}
