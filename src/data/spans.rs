//! Span overlay model: trace spans rendered atop a metric chart.

use serde::Serialize;

use crate::source::RawSpan;

/// One trace span scoped to a service, in internal units.
#[derive(Debug, Clone, PartialEq)]
pub struct SpanRecord {
    pub trace_id: String,
    pub operation: String,
    /// Start instant in epoch milliseconds.
    pub started_at: i64,
    pub duration_ms: f64,
    pub error: bool,
}

impl SpanRecord {
    /// Convert a wire span, rounding its fractional-second start time
    /// to the nearest millisecond.
    pub fn from_raw(raw: RawSpan) -> Self {
        Self {
            trace_id: raw.trace_id,
            operation: raw.operation,
            started_at: (raw.started_at * 1000.0).round() as i64,
            duration_ms: raw.duration_ms,
            error: raw.error,
        }
    }
}

/// One chart point derived from a span.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayPoint {
    pub at: i64,
    pub duration_ms: f64,
    pub error: bool,
    pub trace_id: String,
    pub operation: String,
}

/// Chart-ready view over a span buffer, rebuilt wholesale after every
/// successful fetch.
///
/// Points follow the buffer's order; nothing here re-sorts them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Overlay {
    pub name: String,
    pub points: Vec<OverlayPoint>,
}

impl Overlay {
    pub fn from_spans(name: impl Into<String>, spans: &[SpanRecord]) -> Self {
        Self {
            name: name.into(),
            points: spans
                .iter()
                .map(|s| OverlayPoint {
                    at: s.started_at,
                    duration_ms: s.duration_ms,
                    error: s.error,
                    trace_id: s.trace_id.clone(),
                    operation: s.operation.clone(),
                })
                .collect(),
        }
    }

    /// Number of points flagged as errored.
    pub fn error_count(&self) -> usize {
        self.points.iter().filter(|p| p.error).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::RawSpan;

    fn span(trace_id: &str, started_at: i64, error: bool) -> SpanRecord {
        SpanRecord {
            trace_id: trace_id.into(),
            operation: "GET /reviews".into(),
            started_at,
            duration_ms: 12.5,
            error,
        }
    }

    #[test]
    fn from_raw_scales_seconds_to_millis() {
        let record = SpanRecord::from_raw(RawSpan {
            trace_id: "abc123".into(),
            operation: "GET /ratings".into(),
            started_at: 1700.25,
            duration_ms: 8.0,
            error: false,
        });
        assert_eq!(record.started_at, 1_700_250);
        assert_eq!(record.duration_ms, 8.0);
    }

    #[test]
    fn overlay_preserves_span_order() {
        let spans = vec![
            span("b", 20_000, false),
            span("a", 10_000, true),
            span("c", 30_000, false),
        ];
        let overlay = Overlay::from_spans("bookinfo/reviews", &spans);

        let order: Vec<&str> = overlay.points.iter().map(|p| p.trace_id.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
        assert_eq!(overlay.error_count(), 1);
    }
}
