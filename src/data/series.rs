//! Core telemetry model shared by the aligner, the chart adapters and
//! the data sources.
//!
//! Timestamps are carried as `i64` milliseconds since the Unix epoch
//! everywhere inside the crate. Backends that speak fractional seconds
//! are converted at the ingestion boundary, see
//! [`Sample::from_epoch_seconds`].

use std::collections::BTreeMap;
use std::fmt;

use crate::source::MetricsPayload;

/// A single datapoint: a timestamp in epoch milliseconds and a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Epoch milliseconds.
    pub at: i64,
    pub value: f64,
}

impl Sample {
    pub fn new(at: i64, value: f64) -> Self {
        Self { at, value }
    }

    /// Build a sample from a backend timestamp in fractional epoch
    /// seconds, rounding to the nearest millisecond.
    pub fn from_epoch_seconds(seconds: f64, value: f64) -> Self {
        Self {
            at: (seconds * 1000.0).round() as i64,
            value,
        }
    }
}

/// A named metric series.
///
/// Samples are expected in ascending timestamp order, the way metric
/// backends return them. Nothing here re-checks that ordering; callers
/// that hand-build series out of order get unspecified alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub samples: Vec<Sample>,
}

impl Series {
    pub fn new(name: impl Into<String>, samples: Vec<Sample>) -> Self {
        Self {
            name: name.into(),
            samples,
        }
    }
}

/// Histogram stat families for one metric, keyed by stat label
/// ("avg", "0.5", "0.99", ...). BTreeMap keeps chart column order
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Histogram {
    pub stats: BTreeMap<String, Vec<Sample>>,
}

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A query window in epoch milliseconds, inclusive on both ends.
///
/// `to: None` means "up to now" and leaves the upper bound to the
/// backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub from: i64,
    pub to: Option<i64>,
}

impl TimeWindow {
    pub fn new(from: i64, to: Option<i64>) -> Self {
        Self { from, to }
    }

    /// Build a window from backend-style fractional epoch seconds.
    pub fn from_epoch_seconds(from: f64, to: Option<f64>) -> Self {
        Self {
            from: (from * 1000.0).round() as i64,
            to: to.map(|t| (t * 1000.0).round() as i64),
        }
    }

    /// Whether a millisecond timestamp falls inside the window.
    /// Both bounds are inclusive.
    pub fn contains(&self, at: i64) -> bool {
        at >= self.from && self.to.map_or(true, |to| at <= to)
    }

    /// The window in fractional epoch seconds, for backends that take
    /// second-resolution query parameters.
    pub fn as_epoch_seconds(&self) -> (f64, Option<f64>) {
        (
            self.from as f64 / 1000.0,
            self.to.map(|t| t as f64 / 1000.0),
        )
    }
}

/// Identifies the workload a query is about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceTarget {
    pub namespace: String,
    pub service: String,
}

impl ServiceTarget {
    pub fn new(namespace: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            service: service.into(),
        }
    }
}

impl fmt::Display for ServiceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.service)
    }
}

/// Everything a metrics query produced, converted to internal units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricsData {
    pub series: Vec<Series>,
    /// Histograms keyed by metric name.
    pub histograms: BTreeMap<String, Histogram>,
}

impl MetricsData {
    /// Convert a wire payload into processed metrics data.
    ///
    /// This is the primary conversion method used by all data sources.
    /// Sample order is taken as delivered by the backend.
    pub fn from_payload(payload: MetricsPayload) -> Self {
        let series = payload
            .series
            .into_iter()
            .map(|raw| {
                Series::new(
                    raw.name,
                    raw.datapoints
                        .iter()
                        .map(|d| Sample::from_epoch_seconds(d.0, d.1))
                        .collect(),
                )
            })
            .collect();

        let histograms = payload
            .histograms
            .into_iter()
            .map(|(metric, stats)| {
                let mut histogram = Histogram::new();
                for (stat, datapoints) in stats {
                    let samples = datapoints
                        .iter()
                        .map(|d| Sample::from_epoch_seconds(d.0, d.1))
                        .collect();
                    histogram.stats.insert(stat, samples);
                }
                (metric, histogram)
            })
            .collect();

        Self { series, histograms }
    }

    /// Keep only the named metrics. An empty name list keeps everything.
    pub fn retain_metrics(&mut self, names: &[String]) {
        if names.is_empty() {
            return;
        }
        self.series.retain(|s| names.contains(&s.name));
        self.histograms.retain(|metric, _| names.contains(metric));
    }
}
