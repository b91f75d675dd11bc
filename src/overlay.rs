//! Incremental span overlay fetching.
//!
//! A metrics chart can carry an overlay of individual trace spans.
//! Spans for a busy service are expensive to re-download on every
//! refresh, so the overlay keeps a buffer of what it already holds,
//! prunes it to each new window, and asks the backend only for data
//! newer than anything buffered. Consumers watch a channel that gets a
//! freshly rebuilt [`Overlay`] after every successful fetch.

use tokio::sync::watch;
use tracing::warn;

use crate::data::{Overlay, ServiceTarget, SpanRecord, TimeWindow};
use crate::error::FetchError;
use crate::source::SpanSource;

/// Callback invoked with the first error of each failure streak.
pub type ErrorHandler = Box<dyn FnMut(&FetchError) + Send>;

/// Incrementally-fetched span overlay for one service.
///
/// An instance lives as long as one chart view. Its buffer holds every
/// span fetched so far for the current window; [`SpanOverlay::fetch`]
/// extends it with just the missing delta.
pub struct SpanOverlay {
    source: Box<dyn SpanSource>,
    target: ServiceTarget,
    buffer: Vec<SpanRecord>,
    last_fetch_failed: bool,
    changes: watch::Sender<Overlay>,
    on_error: ErrorHandler,
}

impl SpanOverlay {
    /// Create an overlay for a target, plus the receiver consumers
    /// watch for rebuilt views.
    ///
    /// The receiver starts out holding an empty overlay. Fetch errors
    /// are logged by default; see [`SpanOverlay::on_fetch_error`].
    pub fn create(
        source: Box<dyn SpanSource>,
        target: ServiceTarget,
    ) -> (Self, watch::Receiver<Overlay>) {
        let (tx, rx) = watch::channel(Overlay::default());
        let log_target = target.clone();
        let overlay = Self {
            source,
            target,
            buffer: Vec::new(),
            last_fetch_failed: false,
            changes: tx,
            on_error: Box::new(move |err| warn!("span fetch failed for {}: {}", log_target, err)),
        };
        (overlay, rx)
    }

    /// Replace the default error report (a log line) with a custom
    /// handler. The handler fires once per failure streak, not on every
    /// failed fetch.
    pub fn on_fetch_error<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&FetchError) + Send + 'static,
    {
        self.on_error = Box::new(handler);
        self
    }

    /// Fetch spans for a window, reusing everything already buffered.
    ///
    /// Buffered spans outside the window are discarded first. If any
    /// remain, only data strictly newer than the newest of them is
    /// requested; the response is appended to the buffer in arrival
    /// order (never re-sorted) and the rebuilt overlay is published to
    /// the watch channel.
    ///
    /// Every failure is returned to the caller, but only the first of a
    /// consecutive streak reaches the error handler; the streak resets
    /// on success.
    ///
    /// Taking `&mut self` serializes fetches per overlay, so a second
    /// call cannot start until the first resolves and responses never
    /// apply out of order.
    pub async fn fetch(&mut self, window: TimeWindow) -> Result<(), FetchError> {
        self.buffer.retain(|span| window.contains(span.started_at));

        let effective_from = match self.buffer.iter().map(|s| s.started_at).max() {
            Some(newest) => newest + 1,
            None => window.from,
        };
        let delta = TimeWindow::new(effective_from, window.to);

        match self.source.fetch_spans(&self.target, delta).await {
            Ok(spans) => {
                self.buffer.extend(spans);
                self.last_fetch_failed = false;
                self.changes
                    .send_replace(Overlay::from_spans(self.target.to_string(), &self.buffer));
                Ok(())
            }
            Err(err) => {
                if !self.last_fetch_failed {
                    (self.on_error)(&err);
                }
                self.last_fetch_failed = true;
                Err(err)
            }
        }
    }

    /// The spans currently buffered, in append order.
    pub fn buffered(&self) -> &[SpanRecord] {
        &self.buffer
    }

    /// Whether the most recent fetch failed.
    pub fn last_fetch_failed(&self) -> bool {
        self.last_fetch_failed
    }

    pub fn target(&self) -> &ServiceTarget {
        &self.target
    }
}
