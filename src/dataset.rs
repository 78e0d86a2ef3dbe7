//! Tagged RD measurements grouped by sequence and configuration.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::curve::{RdCurve, RdSample};
use crate::error::{Error, Result};

/// One measured operating point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RdPoint {
    /// Test sequence (video clip) name.
    pub sequence: String,

    /// Encoder configuration name.
    pub config: String,

    /// Quantization parameter, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qp: Option<f64>,

    /// Bitrate.
    pub rate: f64,

    /// Quality metrics by lower-case name (e.g. `psnr_y`, `ssim`).
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
}

impl RdPoint {
    /// Create a point without metrics.
    #[must_use]
    pub fn new(sequence: impl Into<String>, config: impl Into<String>, rate: f64) -> Self {
        Self {
            sequence: sequence.into(),
            config: config.into(),
            qp: None,
            rate,
            metrics: BTreeMap::new(),
        }
    }

    /// Set the QP.
    #[must_use]
    pub fn with_qp(mut self, qp: f64) -> Self {
        self.qp = Some(qp);
        self
    }

    /// Add a metric value.
    #[must_use]
    pub fn with_metric(mut self, name: &str, value: f64) -> Self {
        self.metrics.insert(name.to_lowercase(), value);
        self
    }
}

/// A collection of RD points from one or more sources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RdDataset {
    /// All points, in load order.
    pub points: Vec<RdPoint>,
}

impl RdDataset {
    /// Wrap a list of points.
    #[must_use]
    pub fn new(points: Vec<RdPoint>) -> Self {
        Self { points }
    }

    /// Append another dataset.
    pub fn extend(&mut self, other: RdDataset) {
        self.points.extend(other.points);
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the dataset has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sorted unique sequence names.
    #[must_use]
    pub fn sequences(&self) -> Vec<&str> {
        unique(self.points.iter().map(|p| p.sequence.as_str()))
    }

    /// Sorted unique configuration names.
    #[must_use]
    pub fn configs(&self) -> Vec<&str> {
        unique(self.points.iter().map(|p| p.config.as_str()))
    }

    /// Sorted unique metric names.
    #[must_use]
    pub fn metrics(&self) -> Vec<&str> {
        unique(self.points.iter().flat_map(|p| p.metrics.keys().map(String::as_str)))
    }

    /// Whether any point belongs to `config`.
    #[must_use]
    pub fn has_config(&self, config: &str) -> bool {
        self.points.iter().any(|p| p.config == config)
    }

    /// Points of one sequence/config pair, ordered by QP when every point has
    /// one, otherwise by rate.
    #[must_use]
    pub fn points_for(&self, sequence: &str, config: &str) -> Vec<&RdPoint> {
        let mut points: Vec<&RdPoint> = self
            .points
            .iter()
            .filter(|p| p.sequence == sequence && p.config == config)
            .collect();

        if points.iter().all(|p| p.qp.is_some()) {
            points.sort_by(|a, b| a.qp.unwrap_or_default().total_cmp(&b.qp.unwrap_or_default()));
        } else {
            points.sort_by(|a, b| a.rate.total_cmp(&b.rate));
        }
        points
    }

    /// Build the RD curve for one sequence/config pair using `metric` as quality.
    ///
    /// Points lacking the metric are skipped.
    pub fn curve(&self, sequence: &str, config: &str, metric: &str) -> Result<RdCurve> {
        let points = self.points_for(sequence, config);
        if points.is_empty() {
            return Err(Error::MissingCurve {
                sequence: sequence.to_string(),
                config: config.to_string(),
            });
        }

        let metric = metric.to_lowercase();
        let samples: Vec<RdSample> = points
            .iter()
            .filter_map(|p| p.metrics.get(&metric).map(|q| RdSample::new(p.rate, *q)))
            .collect();

        if samples.is_empty() {
            return Err(Error::invalid(format!(
                "no '{}' values for sequence {:?}, config {:?}",
                metric, sequence, config
            )));
        }
        RdCurve::new(samples)
    }
}

impl FromIterator<RdPoint> for RdDataset {
    fn from_iter<I: IntoIterator<Item = RdPoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

fn unique<'a>(names: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    names.collect::<BTreeSet<_>>().into_iter().collect()
}
