//! # meshwatch
//!
//! Chart-data preparation for service-mesh telemetry.
//!
//! This crate turns raw metric and trace payloads from a mesh console
//! API into structures a chart can load directly: independently-scraped
//! series are aligned onto one shared time axis with explicit gap
//! markers, reshaped into column sets, and optionally decorated with an
//! incrementally-fetched span overlay.
//!
//! ## Architecture
//!
//! The crate is organized into four main modules:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  ┌──────────┐     ┌───────────────┐     ┌─────────────────┐  │
//! │  │  source  │────▶│     data      │────▶│  ChartColumns   │  │
//! │  │ (fetch)  │     │ (align/shape) │     │ Overlay (JSON)  │  │
//! │  └────┬─────┘     └───────────────┘     └─────────────────┘  │
//! │       │                  ▲                                   │
//! │       │            ┌─────┴─────┐                             │
//! │       └───────────▶│  overlay  │◀── watch::Receiver          │
//! │   HttpSource |     │ (spans)   │                             │
//! │   FileSource       └───────────┘                             │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: Data source abstraction ([`MetricsSource`] and
//!   [`SpanSource`] traits) with a REST implementation for console APIs
//!   and a file implementation for captured payloads
//! - **[`data`]**: Alignment and reshaping - merges series onto a
//!   shared axis ([`AlignedFrame`]), builds chart column sets
//!   ([`ChartColumns`]), converts wire units
//! - **[`overlay`]**: Incremental span fetching ([`SpanOverlay`]) with
//!   delta requests and watch-channel delivery
//! - **[`settings`]**: Layered connection settings (defaults, file,
//!   environment)
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Export chart columns from a captured payload
//! meshwatch --file metrics.json
//!
//! # Query a console API for one service
//! meshwatch --endpoint http://localhost:20001 --namespace bookinfo --service reviews
//! ```
//!
//! ### Aligning series
//!
//! ```
//! use meshwatch::data::{ChartColumns, Sample, Series};
//!
//! let requests = Series::new(
//!     "requests",
//!     vec![Sample::from_epoch_seconds(15.0, 5.0), Sample::from_epoch_seconds(20.0, 6.0)],
//! );
//! let errors = Series::new("errors", vec![Sample::from_epoch_seconds(20.5, 1.0)]);
//!
//! let columns = ChartColumns::from_series(&[requests, errors]);
//! println!("{}", columns.to_json());
//! ```
//!
//! ### Fetching a span overlay
//!
//! ```no_run
//! use meshwatch::data::{ServiceTarget, TimeWindow};
//! use meshwatch::overlay::SpanOverlay;
//! use meshwatch::source::HttpSource;
//!
//! # tokio_test::block_on(async {
//! let source = Box::new(HttpSource::builder().build());
//! let target = ServiceTarget::new("bookinfo", "reviews");
//! let (mut overlay, mut rx) = SpanOverlay::create(source, target);
//!
//! overlay.fetch(TimeWindow::new(1_700_000_000_000, None)).await.unwrap();
//! println!("{} spans", rx.borrow_and_update().points.len());
//! # });
//! ```

pub mod data;
pub mod error;
pub mod overlay;
pub mod settings;
pub mod source;

// Re-export main types for convenience
pub use data::{
    AlignedFrame, AlignedSeries, ChartColumns, Histogram, MetricsData, Overlay, Sample, Series,
    ServiceTarget, SpanRecord, TimeWindow,
};
pub use error::FetchError;
pub use overlay::SpanOverlay;
pub use settings::Settings;
pub use source::{FileSource, HttpSource, MetricsQuery, MetricsSource, SpanSource};
