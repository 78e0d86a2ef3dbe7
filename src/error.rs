//! Error types for bd-eval operations.

use thiserror::Error;

/// Result type alias for bd-eval operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading RD data or computing BD metrics.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Curve input cannot be fitted: too few points, non-positive rate,
    /// duplicate independent values, or an unrecognized mode/interpolation token.
    #[error("Invalid curve: {reason}")]
    InvalidCurve {
        /// Why the curve was rejected.
        reason: String,
    },

    /// The two curves share no common range on the integration axis.
    #[error("Curves do not overlap: low {low} >= high {high}")]
    NoOverlap {
        /// Larger of the two domain minima.
        low: f64,
        /// Smaller of the two domain maxima.
        high: f64,
    },

    /// The requested configuration does not exist in the dataset.
    #[error("Unknown configuration: {0}")]
    UnknownConfig(String),

    /// No points exist for a sequence/configuration pair.
    #[error("No curve for sequence {sequence:?}, config {config:?}")]
    MissingCurve {
        /// Sequence name.
        sequence: String,
        /// Configuration name.
        config: String,
    },

    /// Error importing CSV data.
    #[error("CSV import error at line {line}: {reason}")]
    CsvImport {
        /// Line number where the error occurred.
        line: usize,
        /// Reason for the failure.
        reason: String,
    },

    /// No registered data source understands the input.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// I/O error wrapper.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidCurve {
            reason: reason.into(),
        }
    }
}
