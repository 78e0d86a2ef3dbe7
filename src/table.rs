//! Anchor-versus-configuration BD tables.
//!
//! A table holds one BD value per (sequence, configuration) cell, each computed
//! against the anchor configuration on the same sequence. Cells are
//! independent: a cell that cannot be computed is recorded as failed and
//! rendered as `N/A` while the rest of the table proceeds.

use std::fmt::Write as _;
use std::io::Write;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::bd::{BdMode, Interpolation, compute_bd};
use crate::dataset::RdDataset;
use crate::error::{Error, Result};
use crate::stats::{Summary, mean};

/// Metric used when none is configured.
pub const DEFAULT_METRIC: &str = "psnr";

/// What to compute for a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    /// Reference configuration (curve 1 of every cell).
    pub anchor: String,
    /// Quality metric name.
    pub metric: String,
    /// BD mode.
    pub mode: BdMode,
    /// Fitting strategy.
    pub interpolation: Interpolation,
}

impl TableConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder(anchor: impl Into<String>) -> TableConfigBuilder {
        TableConfigBuilder {
            anchor: anchor.into(),
            metric: None,
            mode: None,
            interpolation: None,
        }
    }
}

/// Builder for [`TableConfig`].
#[derive(Debug)]
pub struct TableConfigBuilder {
    anchor: String,
    metric: Option<String>,
    mode: Option<BdMode>,
    interpolation: Option<Interpolation>,
}

impl TableConfigBuilder {
    /// Set the quality metric.
    #[must_use]
    pub fn metric(mut self, metric: impl Into<String>) -> Self {
        self.metric = Some(metric.into());
        self
    }

    /// Set the BD mode.
    #[must_use]
    pub fn mode(mut self, mode: BdMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Set the fitting strategy.
    #[must_use]
    pub fn interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = Some(interpolation);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> TableConfig {
        TableConfig {
            anchor: self.anchor,
            metric: self
                .metric
                .unwrap_or_else(|| DEFAULT_METRIC.to_string())
                .to_lowercase(),
            mode: self.mode.unwrap_or_default(),
            interpolation: self.interpolation.unwrap_or_default(),
        }
    }
}

/// Outcome of one cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BdCell {
    /// Computed value.
    Value {
        /// BD figure.
        value: f64,
    },
    /// Computation failed for this pair.
    Failed {
        /// Error message.
        reason: String,
    },
}

impl BdCell {
    /// The value, if computed.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Value { value } => Some(*value),
            Self::Failed { .. } => None,
        }
    }

    /// Cell text with `precision` decimals, or `N/A`.
    #[must_use]
    pub fn display(&self, precision: usize) -> String {
        match self {
            Self::Value { value } => format!("{:.*}", precision, value),
            Self::Failed { .. } => "N/A".to_string(),
        }
    }
}

impl From<Result<f64>> for BdCell {
    fn from(result: Result<f64>) -> Self {
        match result {
            Ok(value) if value.is_finite() => Self::Value { value },
            Ok(value) => Self::Failed {
                reason: format!("non-finite result {}", value),
            },
            Err(e) => Self::Failed {
                reason: e.to_string(),
            },
        }
    }
}

/// One sequence row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BdRow {
    /// Sequence name.
    pub sequence: String,
    /// One cell per entry of [`BdTable::configs`].
    pub cells: Vec<BdCell>,
}

/// BD values of every configuration against the anchor, per sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BdTable {
    /// What was computed.
    pub config: TableConfig,
    /// Column configurations (anchor excluded), sorted.
    pub configs: Vec<String>,
    /// Rows, sorted by sequence.
    pub rows: Vec<BdRow>,
    /// When the table was computed.
    pub generated_at: DateTime<Utc>,
}

impl BdTable {
    /// Compute the table for every sequence in `dataset`.
    ///
    /// Fails only if the anchor is not present at all; per-cell failures are
    /// recorded in the cells.
    pub fn compute(dataset: &RdDataset, config: &TableConfig) -> Result<Self> {
        if !dataset.has_config(&config.anchor) {
            return Err(Error::UnknownConfig(config.anchor.clone()));
        }

        let configs: Vec<String> = dataset
            .configs()
            .into_iter()
            .filter(|c| *c != config.anchor)
            .map(String::from)
            .collect();
        let sequences = dataset.sequences();

        debug!(
            anchor = %config.anchor,
            sequences = sequences.len(),
            configs = configs.len(),
            mode = %config.mode,
            interpolation = %config.interpolation,
            "computing BD table"
        );

        let rows = sequences
            .par_iter()
            .map(|sequence| {
                let cells = configs
                    .par_iter()
                    .map(|test| compute_cell(dataset, config, sequence, test))
                    .collect();
                BdRow {
                    sequence: (*sequence).to_string(),
                    cells,
                }
            })
            .collect();

        Ok(Self {
            config: config.clone(),
            configs,
            rows,
            generated_at: Utc::now(),
        })
    }

    /// Mean of the successful cells of each column; `None` if all failed.
    #[must_use]
    pub fn averages(&self) -> Vec<Option<f64>> {
        (0..self.configs.len())
            .map(|col| {
                let values = self.column_values(col);
                (!values.is_empty()).then(|| mean(&values))
            })
            .collect()
    }

    /// Summary statistics of each column's successful cells.
    #[must_use]
    pub fn summaries(&self) -> Vec<(String, Option<Summary>)> {
        self.configs
            .iter()
            .enumerate()
            .map(|(col, name)| (name.clone(), Summary::compute(&self.column_values(col))))
            .collect()
    }

    /// Number of failed cells.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|r| &r.cells)
            .filter(|c| c.value().is_none())
            .count()
    }

    fn column_values(&self, col: usize) -> Vec<f64> {
        self.rows
            .iter()
            .filter_map(|r| r.cells.get(col).and_then(BdCell::value))
            .collect()
    }

    fn precision(&self) -> usize {
        match self.config.mode {
            BdMode::RateSaving => 2,
            BdMode::QualityDifference => 3,
        }
    }

    /// Plain-text table for terminals.
    #[must_use]
    pub fn to_text(&self) -> String {
        let precision = self.precision();
        let seq_width = self
            .rows
            .iter()
            .map(|r| r.sequence.len())
            .chain(std::iter::once("Average".len()))
            .max()
            .unwrap_or(8)
            + 2;
        let col_width = self.configs.iter().map(String::len).max().unwrap_or(0).max(10) + 2;

        let mut out = String::new();
        let _ = writeln!(
            out,
            "BD-{} ({}) vs anchor '{}', metric {}, {}",
            match self.config.mode {
                BdMode::RateSaving => "rate",
                BdMode::QualityDifference => "quality",
            },
            self.config.mode.unit(),
            self.config.anchor,
            self.config.metric,
            self.config.interpolation
        );
        let _ = write!(out, "{:<seq_width$}", "Sequence");
        for c in &self.configs {
            let _ = write!(out, "{:>col_width$}", c);
        }
        out.push('\n');
        let _ = writeln!(out, "{:-<1$}", "", seq_width + col_width * self.configs.len());

        for row in &self.rows {
            let _ = write!(out, "{:<seq_width$}", row.sequence);
            for cell in &row.cells {
                let _ = write!(out, "{:>col_width$}", cell.display(precision));
            }
            out.push('\n');
        }

        let _ = writeln!(out, "{:-<1$}", "", seq_width + col_width * self.configs.len());
        let _ = write!(out, "{:<seq_width$}", "Average");
        for avg in self.averages() {
            let text = avg.map_or_else(|| "N/A".to_string(), |v| format!("{:.*}", precision, v));
            let _ = write!(out, "{:>col_width$}", text);
        }
        out.push('\n');
        out
    }

    /// LaTeX `tabular` using `booktabs` rules.
    #[must_use]
    pub fn to_latex(&self) -> String {
        let precision = self.precision();
        let mut out = String::new();
        let _ = writeln!(out, "\\begin{{tabular}}{{l{}}}", "r".repeat(self.configs.len()));
        out.push_str("\\toprule\n");
        out.push_str("Sequence");
        for c in &self.configs {
            let _ = write!(out, " & {}", latex_escape(c));
        }
        out.push_str(" \\\\\n\\midrule\n");

        for row in &self.rows {
            out.push_str(&latex_escape(&row.sequence));
            for cell in &row.cells {
                let _ = write!(out, " & {}", cell.display(precision));
            }
            out.push_str(" \\\\\n");
        }

        out.push_str("\\midrule\nAverage");
        for avg in self.averages() {
            let text = avg.map_or_else(|| "N/A".to_string(), |v| format!("{:.*}", precision, v));
            let _ = write!(out, " & {}", text);
        }
        out.push_str(" \\\\\n\\bottomrule\n\\end{tabular}\n");
        out
    }

    /// Long-format CSV: `sequence,config,value,error`.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["sequence", "config", "value", "error"])?;
        for row in &self.rows {
            for (config, cell) in self.configs.iter().zip(&row.cells) {
                match cell {
                    BdCell::Value { value } => {
                        csv.write_record([&row.sequence, config, &value.to_string(), ""])?;
                    }
                    BdCell::Failed { reason } => {
                        csv.write_record([&row.sequence, config, "", reason])?;
                    }
                }
            }
        }
        csv.flush()?;
        Ok(())
    }
}

fn compute_cell(dataset: &RdDataset, config: &TableConfig, sequence: &str, test: &str) -> BdCell {
    let result = dataset
        .curve(sequence, &config.anchor, &config.metric)
        .and_then(|anchor| {
            let curve = dataset.curve(sequence, test, &config.metric)?;
            compute_bd(&anchor, &curve, config.mode, config.interpolation)
        });

    if let Err(e) = &result {
        warn!(sequence, config = %test, error = %e, "BD cell failed");
    }
    BdCell::from(result)
}

fn latex_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '_' | '&' | '%' | '$' | '#' | '{' | '}' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}
