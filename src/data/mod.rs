//! Data models and processing for mesh telemetry.
//!
//! This module handles the transformation of raw telemetry payloads
//! into chart-ready structures: a shared time axis across series, and
//! column sets a chart consumer can load directly.
//!
//! ## Submodules
//!
//! - [`series`]: Core model ([`Series`], [`MetricsData`], [`TimeWindow`])
//! - [`align`]: Shared-axis alignment ([`AlignedFrame`])
//! - [`columns`]: Column-oriented chart payloads ([`ChartColumns`])
//! - [`spans`]: Span overlay model ([`SpanRecord`], [`Overlay`])
//!
//! ## Data Flow
//!
//! ```text
//! MetricsPayload (raw JSON)
//!        │
//!        ▼
//! MetricsData::from_payload()
//!        │
//!        ▼
//! AlignedFrame::from_series()   (shared axis, NaN gaps)
//!        │
//!        ▼
//! ChartColumns::from_frame()    (x column + one column per series)
//! ```

pub mod align;
pub mod columns;
pub mod series;
pub mod spans;

pub use align::{compare_timestamps, AlignedFrame, AlignedSeries, TIMESTAMP_TOLERANCE_MS};
pub use columns::{ChartColumns, ValueColumn, X_LABEL};
pub use series::{Histogram, MetricsData, Sample, Series, ServiceTarget, TimeWindow};
pub use spans::{Overlay, OverlayPoint, SpanRecord};
