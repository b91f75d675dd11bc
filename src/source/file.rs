//! File-based data source.
//!
//! Reads a captured metrics payload from a JSON file. Useful for
//! offline work and for replaying payloads saved from a console API.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::data::MetricsData;
use crate::error::FetchError;

use super::{MetricsPayload, MetricsQuery, MetricsSource};

/// A data source that reads a metrics payload from a JSON file.
///
/// The query's time window is ignored: the file already scopes the
/// data. The metric-name filter still applies, so the same query works
/// against file and REST sources alike.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    description: String,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self { path, description }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl MetricsSource for FileSource {
    async fn fetch_metrics(&self, query: &MetricsQuery) -> Result<MetricsData, FetchError> {
        let content = fs::read_to_string(&self.path).await?;
        let payload: MetricsPayload = serde_json::from_str(&content)?;

        let mut data = MetricsData::from_payload(payload);
        data.retain_metrics(&query.metrics);
        Ok(data)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ServiceTarget, TimeWindow};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_json() -> &'static str {
        r#"{
            "series": [
                { "name": "request_count", "datapoints": [[15.0, 5.0], [20.0, 6.0]] },
                { "name": "request_errors", "datapoints": [[15.0, 1.0]] }
            ]
        }"#
    }

    fn query(metrics: &[&str]) -> MetricsQuery {
        MetricsQuery {
            target: ServiceTarget::new("bookinfo", "reviews"),
            metrics: metrics.iter().map(|m| m.to_string()).collect(),
            window: TimeWindow::new(0, None),
        }
    }

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/metrics.json");
        assert_eq!(source.path(), Path::new("/tmp/metrics.json"));
        assert_eq!(source.description(), "file: /tmp/metrics.json");
    }

    #[tokio::test]
    async fn test_file_source_reads_payload() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let source = FileSource::new(file.path());
        let data = source.fetch_metrics(&query(&[])).await.unwrap();

        assert_eq!(data.series.len(), 2);
        assert_eq!(data.series[0].name, "request_count");
        assert_eq!(data.series[0].samples[0].at, 15_000);
    }

    #[tokio::test]
    async fn test_file_source_applies_metric_filter() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let source = FileSource::new(file.path());
        let data = source.fetch_metrics(&query(&["request_errors"])).await.unwrap();

        assert_eq!(data.series.len(), 1);
        assert_eq!(data.series[0].name, "request_errors");
    }

    #[tokio::test]
    async fn test_file_source_missing_file() {
        let source = FileSource::new("/nonexistent/path/metrics.json");
        let err = source.fetch_metrics(&query(&[])).await.unwrap_err();
        assert!(matches!(err, FetchError::Io(_)));
    }

    #[tokio::test]
    async fn test_file_source_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let source = FileSource::new(file.path());
        let err = source.fetch_metrics(&query(&[])).await.unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }
}
