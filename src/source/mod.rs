//! Data source abstraction for telemetry backends.
//!
//! This module provides trait-based access to mesh telemetry from
//! different backends: a console REST API for live queries, or a local
//! JSON file for captured payloads and offline work.

mod file;
mod http;
mod payload;

pub use file::FileSource;
pub use http::{HttpSource, HttpSourceBuilder};
pub use payload::{
    MetricsPayload, RawDatapoint, RawHistogram, RawSeries, RawSpan, SpansPayload,
};

use std::fmt::Debug;

use async_trait::async_trait;

use crate::data::{MetricsData, ServiceTarget, SpanRecord, TimeWindow};
use crate::error::FetchError;

/// What to ask a metrics source for.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsQuery {
    pub target: ServiceTarget,
    /// Metric names to include; empty means all.
    pub metrics: Vec<String>,
    pub window: TimeWindow,
}

/// Trait for fetching metric series from a telemetry backend.
///
/// Implementations decode their backend's wire format and hand back
/// data already converted to internal millisecond units.
#[async_trait]
pub trait MetricsSource: Send + Sync + Debug {
    /// Fetch series and histograms for a query.
    async fn fetch_metrics(&self, query: &MetricsQuery) -> Result<MetricsData, FetchError>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for log lines and CLI output.
    fn description(&self) -> &str;
}

/// Trait for fetching trace spans for one service over a time window.
#[async_trait]
pub trait SpanSource: Send + Sync + Debug {
    /// Fetch the spans of `target` that started inside `window`.
    async fn fetch_spans(
        &self,
        target: &ServiceTarget,
        window: TimeWindow,
    ) -> Result<Vec<SpanRecord>, FetchError>;
}
