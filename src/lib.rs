//! # bd-eval
//!
//! Bjontegaard-Delta comparison of rate-distortion curves.
//!
//! The core is [`compute_bd`]: given two curves of `(rate, quality)` points it
//! reports either the average bitrate change at equal quality (BD-rate, in
//! percent) or the average quality change at equal rate (BD-PSNR, in the
//! quality metric's unit). Around it sit loaders for RD tables and a batch
//! [`BdTable`] comparing every configuration against an anchor.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bd_eval::{BdMode, Interpolation, SourceRegistry, TableConfig, BdTable};
//!
//! let dataset = SourceRegistry::default().load("results.csv")?;
//! let config = TableConfig::builder("anchor")
//!     .metric("psnr_y")
//!     .mode(BdMode::RateSaving)
//!     .interpolation(Interpolation::MonotoneCubic)
//!     .build();
//!
//! let table = BdTable::compute(&dataset, &config)?;
//! println!("{}", table.to_text());
//! ```
//!
//! ## Modules
//!
//! - [`bd`]: BD engine (modes, options, detailed reports)
//! - [`curve`]: Validated RD curves
//! - [`interpolation`]: Curve fitting and quadrature
//! - [`dataset`]: Sequence/config-tagged measurements
//! - [`import`]: CSV import
//! - [`source`]: Format detection and loading
//! - [`table`]: Anchor-vs-configuration tables
//! - [`stats`]: Descriptive statistics
//! - [`error`]: Error types for the library

pub mod bd;
pub mod curve;
pub mod dataset;
pub mod error;
pub mod import;
pub mod interpolation;
pub mod source;
pub mod stats;
pub mod table;

// Re-export commonly used types
pub use bd::{BdMode, BdOptions, BdReport, Interval, compute_bd, compute_bd_detailed};
pub use curve::{RdCurve, RdSample};
pub use dataset::{RdDataset, RdPoint};
pub use error::{Error, Result};
pub use import::{CsvImporter, CsvSchema};
pub use interpolation::{FittedCurve, Interpolation};
pub use source::{RdSource, SourceRegistry};
pub use stats::Summary;
pub use table::{BdCell, BdTable, TableConfig};
