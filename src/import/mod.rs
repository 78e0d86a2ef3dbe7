//! CSV import of rate-distortion measurements.
//!
//! The importer accepts summary tables exported from encoder test harnesses:
//! one row per encode, with a sequence name, a configuration name, an
//! optional QP, a rate, and any number of quality metric columns.
//!
//! ## Column Detection
//!
//! Identifier columns are matched case-insensitively, first by the name set in
//! the [`CsvSchema`], then by a list of common aliases. Every other column
//! whose cell parses as a number becomes a metric named after its lower-cased
//! header, so `Y-PSNR`, `psnr_yuv`, and `SSIM` all come through unchanged.
//!
//! ## Example
//!
//! ```rust,ignore
//! use bd_eval::import::{CsvImporter, CsvSchema};
//!
//! let schema = CsvSchema::builder()
//!     .sequence_column("clip")
//!     .config_column("encoder")
//!     .rate_column("kbps")
//!     .build();
//!
//! let dataset = CsvImporter::new(schema).import("results.csv")?;
//! ```

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::dataset::{RdDataset, RdPoint};
use crate::error::{Error, Result};

/// Configuration name used when a file has no config column.
pub const DEFAULT_CONFIG: &str = "default";

const SEQUENCE_ALIASES: &[&str] = &["sequence", "seq", "video", "clip", "image", "file", "name"];
const CONFIG_ALIASES: &[&str] = &["config", "configuration", "codec", "encoder", "setting"];
const QP_ALIASES: &[&str] = &["qp", "quality", "crf", "q"];
const RATE_ALIASES: &[&str] = &["rate", "bitrate", "kbps", "bits", "bpp", "size"];

/// Schema for CSV import.
#[derive(Debug, Clone, Default)]
pub struct CsvSchema {
    /// Column name for the sequence identifier.
    pub sequence_column: Option<String>,
    /// Column name for the configuration name.
    pub config_column: Option<String>,
    /// Column name for the QP.
    pub qp_column: Option<String>,
    /// Column name for the rate.
    pub rate_column: Option<String>,
}

impl CsvSchema {
    /// Create a schema builder.
    #[must_use]
    pub fn builder() -> CsvSchemaBuilder {
        CsvSchemaBuilder::default()
    }

    /// Create a schema that auto-detects columns from common names.
    #[must_use]
    pub fn auto_detect() -> Self {
        Self::default()
    }

    /// Try to find a column index by name (case-insensitive, with aliases).
    fn find_column(headers: &[&str], primary: Option<&str>, aliases: &[&str]) -> Option<usize> {
        if let Some(name) = primary {
            if let Some(idx) = find_header_index(headers, name) {
                return Some(idx);
            }
        }
        aliases.iter().find_map(|alias| find_header_index(headers, alias))
    }
}

/// Builder for CSV schema.
#[derive(Debug, Default)]
pub struct CsvSchemaBuilder {
    schema: CsvSchema,
}

impl CsvSchemaBuilder {
    /// Set the sequence column name.
    #[must_use]
    pub fn sequence_column(mut self, name: impl Into<String>) -> Self {
        self.schema.sequence_column = Some(name.into());
        self
    }

    /// Set the configuration column name.
    #[must_use]
    pub fn config_column(mut self, name: impl Into<String>) -> Self {
        self.schema.config_column = Some(name.into());
        self
    }

    /// Set the QP column name.
    #[must_use]
    pub fn qp_column(mut self, name: impl Into<String>) -> Self {
        self.schema.qp_column = Some(name.into());
        self
    }

    /// Set the rate column name.
    #[must_use]
    pub fn rate_column(mut self, name: impl Into<String>) -> Self {
        self.schema.rate_column = Some(name.into());
        self
    }

    /// Build the schema.
    #[must_use]
    pub fn build(self) -> CsvSchema {
        self.schema
    }
}

/// Resolved column positions for one file.
struct Columns {
    sequence: usize,
    config: Option<usize>,
    qp: Option<usize>,
    rate: usize,
    metrics: Vec<(usize, String)>,
}

/// CSV importer for RD tables.
pub struct CsvImporter {
    schema: CsvSchema,
}

impl CsvImporter {
    /// Create a new importer with the given schema.
    #[must_use]
    pub fn new(schema: CsvSchema) -> Self {
        Self { schema }
    }

    /// Create an importer that auto-detects columns.
    #[must_use]
    pub fn auto_detect() -> Self {
        Self::new(CsvSchema::auto_detect())
    }

    /// Import a CSV file. Rows without a config column get [`DEFAULT_CONFIG`].
    pub fn import(&self, path: impl AsRef<Path>) -> Result<RdDataset> {
        self.import_with_default_config(path, DEFAULT_CONFIG)
    }

    /// Import a CSV file, naming the configuration `default_config` when the
    /// file has no config column (typically the file stem).
    pub fn import_with_default_config(
        &self,
        path: impl AsRef<Path>,
        default_config: &str,
    ) -> Result<RdDataset> {
        let path = path.as_ref();
        debug!(path = %path.display(), "importing CSV");
        let file = std::fs::File::open(path)?;
        self.import_reader(file, default_config)
    }

    /// Import CSV data from any reader.
    pub fn import_reader<R: Read>(&self, reader: R, default_config: &str) -> Result<RdDataset> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
        let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();
        let columns = self.resolve_columns(&header_refs)?;

        let mut points = Vec::new();
        for (line_num, record) in reader.records().enumerate() {
            let line = line_num + 2; // 1-based, after the header
            let record = record.map_err(|e| Error::CsvImport {
                line,
                reason: e.to_string(),
            })?;

            let sequence = record.get(columns.sequence).unwrap_or("");
            if sequence.is_empty() {
                continue;
            }
            let Some(rate) = record.get(columns.rate).and_then(|s| s.parse::<f64>().ok()) else {
                debug!(line, "skipping row without a numeric rate");
                continue;
            };

            let config = columns
                .config
                .and_then(|i| record.get(i))
                .filter(|s| !s.is_empty())
                .unwrap_or(default_config);

            let qp = match columns.qp.and_then(|i| record.get(i)) {
                None | Some("") => None,
                Some(s) => Some(s.parse::<f64>().map_err(|e| Error::CsvImport {
                    line,
                    reason: format!("invalid QP '{}': {}", s, e),
                })?),
            };

            let metrics: BTreeMap<String, f64> = columns
                .metrics
                .iter()
                .filter_map(|(i, name)| {
                    let value = record.get(*i)?.parse::<f64>().ok()?;
                    Some((name.clone(), value))
                })
                .collect();

            points.push(RdPoint {
                sequence: sequence.to_string(),
                config: config.to_string(),
                qp,
                rate,
                metrics,
            });
        }

        debug!(points = points.len(), "CSV import finished");
        Ok(RdDataset::new(points))
    }

    fn resolve_columns(&self, headers: &[&str]) -> Result<Columns> {
        let sequence = CsvSchema::find_column(
            headers,
            self.schema.sequence_column.as_deref(),
            SEQUENCE_ALIASES,
        )
        .ok_or_else(|| Error::CsvImport {
            line: 0,
            reason: "Could not find sequence column".to_string(),
        })?;

        let rate = CsvSchema::find_column(headers, self.schema.rate_column.as_deref(), RATE_ALIASES)
            .ok_or_else(|| Error::CsvImport {
                line: 0,
                reason: "Could not find rate/bitrate column".to_string(),
            })?;

        let config =
            CsvSchema::find_column(headers, self.schema.config_column.as_deref(), CONFIG_ALIASES);
        let qp = CsvSchema::find_column(headers, self.schema.qp_column.as_deref(), QP_ALIASES);

        let taken = [Some(sequence), Some(rate), config, qp];
        let metrics = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| !taken.contains(&Some(*i)))
            .map(|(i, h)| (i, h.to_lowercase()))
            .collect();

        Ok(Columns {
            sequence,
            config,
            qp,
            rate,
            metrics,
        })
    }
}

/// Find a header index by name (case-insensitive).
fn find_header_index(headers: &[&str], name: &str) -> Option<usize> {
    let name_lower = name.to_lowercase();
    headers.iter().position(|h| h.to_lowercase() == name_lower)
}
