//! Data-source registry.
//!
//! Each [`RdSource`] declares whether it understands a file and, if so,
//! parses it into an [`RdDataset`]. [`SourceRegistry::load`] asks the
//! registered sources in order and uses the first that accepts the input.

use std::path::Path;

use tracing::debug;

use crate::dataset::{RdDataset, RdPoint};
use crate::error::{Error, Result};
use crate::import::{CsvImporter, CsvSchema};

/// A parser for one input format.
pub trait RdSource: Send + Sync {
    /// Short format name for messages.
    fn name(&self) -> &'static str;

    /// Whether this source can parse `bytes` read from `path`.
    fn can_parse(&self, path: &Path, bytes: &[u8]) -> bool;

    /// Parse the input. `path` is used for naming defaults only.
    fn parse(&self, path: &Path, bytes: &[u8]) -> Result<RdDataset>;
}

/// Serialized [`RdDataset`] (or bare point array) as JSON.
#[derive(Debug, Default)]
pub struct JsonSource;

impl RdSource for JsonSource {
    fn name(&self) -> &'static str {
        "json"
    }

    fn can_parse(&self, path: &Path, bytes: &[u8]) -> bool {
        has_extension(path, "json")
            || matches!(first_non_space(bytes), Some(b'[' | b'{'))
    }

    fn parse(&self, _path: &Path, bytes: &[u8]) -> Result<RdDataset> {
        if first_non_space(bytes) == Some(b'[') {
            let points: Vec<RdPoint> = serde_json::from_slice(bytes)?;
            return Ok(RdDataset::new(points));
        }
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Comma-separated RD table.
#[derive(Debug, Default)]
pub struct CsvSource {
    schema: CsvSchema,
}

impl CsvSource {
    /// Source using an explicit schema.
    #[must_use]
    pub fn new(schema: CsvSchema) -> Self {
        Self { schema }
    }
}

impl RdSource for CsvSource {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn can_parse(&self, path: &Path, bytes: &[u8]) -> bool {
        if has_extension(path, "csv") {
            return true;
        }
        let header = bytes.split(|&b| b == b'\n').next().unwrap_or_default();
        header.contains(&b',') && !matches!(first_non_space(bytes), Some(b'[' | b'{'))
    }

    fn parse(&self, path: &Path, bytes: &[u8]) -> Result<RdDataset> {
        let default_config = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(crate::import::DEFAULT_CONFIG);
        CsvImporter::new(self.schema.clone()).import_reader(bytes, default_config)
    }
}

/// Ordered list of sources; first match wins.
pub struct SourceRegistry {
    sources: Vec<Box<dyn RdSource>>,
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self {
            sources: vec![Box::new(JsonSource), Box::new(CsvSource::default())],
        }
    }
}

impl SourceRegistry {
    /// Registry with no sources.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Append a source; it is consulted after the existing ones.
    #[must_use]
    pub fn with_source(mut self, source: Box<dyn RdSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Names of registered sources, in lookup order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// First source that accepts the input.
    #[must_use]
    pub fn find(&self, path: &Path, bytes: &[u8]) -> Option<&dyn RdSource> {
        self.sources
            .iter()
            .find(|s| s.can_parse(path, bytes))
            .map(|s| s.as_ref())
    }

    /// Parse in-memory input.
    pub fn parse(&self, path: &Path, bytes: &[u8]) -> Result<RdDataset> {
        let source = self
            .find(path, bytes)
            .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))?;
        debug!(path = %path.display(), source = source.name(), "parsing RD data");
        source.parse(path, bytes)
    }

    /// Read and parse a file.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<RdDataset> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        self.parse(path, &bytes)
    }

    /// Load several files into one dataset.
    pub fn load_all<P: AsRef<Path>>(&self, paths: &[P]) -> Result<RdDataset> {
        let mut dataset = RdDataset::default();
        for path in paths {
            dataset.extend(self.load(path)?);
        }
        Ok(dataset)
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

fn first_non_space(bytes: &[u8]) -> Option<u8> {
    bytes.iter().copied().find(|b| !b.is_ascii_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "sequence,qp,rate,psnr\nbus,22,1000,40\nbus,27,500,37\n";

    #[test]
    fn test_default_order() {
        assert_eq!(SourceRegistry::default().names(), vec!["json", "csv"]);
    }

    #[test]
    fn test_detects_csv_by_content() {
        let registry = SourceRegistry::default();
        let path = Path::new("results.txt");
        let source = registry.find(path, CSV.as_bytes()).unwrap();
        assert_eq!(source.name(), "csv");

        let ds = registry.parse(path, CSV.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        // No config column: the file stem names the configuration.
        assert_eq!(ds.configs(), vec!["results"]);
    }

    #[test]
    fn test_detects_json() {
        let ds = RdDataset::new(vec![RdPoint::new("bus", "x264", 1000.0).with_metric("psnr", 40.0)]);
        let json = serde_json::to_vec(&ds).unwrap();

        let registry = SourceRegistry::default();
        let path = Path::new("session.rd");
        assert_eq!(registry.find(path, &json).unwrap().name(), "json");
        assert_eq!(registry.parse(path, &json).unwrap(), ds);

        let bare = serde_json::to_vec(&ds.points).unwrap();
        assert_eq!(registry.parse(path, &bare).unwrap(), ds);
    }

    #[test]
    fn test_unsupported() {
        let registry = SourceRegistry::default();
        let err = registry.parse(Path::new("log.txt"), b"encoded 300 frames").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));

        let err = SourceRegistry::empty().parse(Path::new("a.csv"), CSV.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn test_load_all_files() {
        let dir = tempfile::tempdir().unwrap();
        let anchor = dir.path().join("anchor.csv");
        let test = dir.path().join("test.csv");
        std::fs::write(&anchor, CSV).unwrap();
        std::fs::write(&test, CSV).unwrap();

        let ds = SourceRegistry::default().load_all(&[anchor, test]).unwrap();
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.configs(), vec!["anchor", "test"]);
    }
}
