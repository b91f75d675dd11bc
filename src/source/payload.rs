//! Wire types for telemetry backend responses.
//!
//! These match the JSON shape served by the mesh console REST API.
//! Timestamps on the wire are fractional seconds since the Unix epoch;
//! conversion to the crate's millisecond units happens in the `data`
//! module, not here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One `(timestamp, value)` pair as served by the backend:
/// `[seconds_since_epoch, value]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawDatapoint(pub f64, pub f64);

/// One named series of datapoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSeries {
    pub name: String,
    #[serde(default)]
    pub datapoints: Vec<RawDatapoint>,
}

/// Stat families of one histogram metric, keyed by stat label
/// ("avg", "0.5", "0.99", ...).
pub type RawHistogram = BTreeMap<String, Vec<RawDatapoint>>;

/// Response body of the metrics endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsPayload {
    /// Plain counter/gauge series.
    #[serde(default)]
    pub series: Vec<RawSeries>,
    /// Histogram metrics, keyed by metric name.
    #[serde(default)]
    pub histograms: BTreeMap<String, RawHistogram>,
}

/// One trace span as served by the spans endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSpan {
    pub trace_id: String,
    pub operation: String,
    /// Start instant in fractional epoch seconds.
    pub started_at: f64,
    pub duration_ms: f64,
    #[serde(default)]
    pub error: bool,
}

/// Response body of the spans endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpansPayload {
    #[serde(default)]
    pub spans: Vec<RawSpan>,
}
