//! REST source backed by a mesh console telemetry API.
//!
//! Queries the console's namespace/service endpoints for metric series
//! and trace spans. Window bounds are sent as fractional epoch seconds,
//! the unit the API speaks; responses are converted to internal
//! millisecond units before they leave this module.
//!
//! ## Example
//!
//! ```rust,no_run
//! use meshwatch::data::{ServiceTarget, TimeWindow};
//! use meshwatch::source::{HttpSource, MetricsQuery, MetricsSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = HttpSource::builder()
//!         .endpoint("http://mesh-console.local:20001")
//!         .token("s3cr3t")
//!         .build();
//!
//!     let query = MetricsQuery {
//!         target: ServiceTarget::new("bookinfo", "reviews"),
//!         metrics: vec!["request_count".to_string()],
//!         window: TimeWindow::new(1_700_000_000_000, None),
//!     };
//!
//!     let data = source.fetch_metrics(&query).await?;
//!     println!("got {} series", data.series.len());
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::data::{MetricsData, ServiceTarget, SpanRecord, TimeWindow};
use crate::error::FetchError;

use super::{MetricsPayload, MetricsQuery, MetricsSource, SpanSource, SpansPayload};

/// REST source for a mesh console API.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    endpoint: String,
    token: Option<String>,
    description: String,
}

impl HttpSource {
    /// Create a new builder for configuring the source.
    pub fn builder() -> HttpSourceBuilder {
        HttpSourceBuilder::default()
    }

    /// Returns the configured API base URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn metrics_url(&self, target: &ServiceTarget) -> String {
        format!(
            "{}/api/namespaces/{}/services/{}/metrics",
            self.endpoint,
            urlencoded(&target.namespace),
            urlencoded(&target.service)
        )
    }

    fn spans_url(&self, target: &ServiceTarget) -> String {
        format!(
            "{}/api/namespaces/{}/services/{}/spans",
            self.endpoint,
            urlencoded(&target.namespace),
            urlencoded(&target.service)
        )
    }

    /// Window bounds as query parameters, in the API's second units.
    fn window_params(window: TimeWindow) -> Vec<(&'static str, String)> {
        let (from, to) = window.as_epoch_seconds();
        let mut params = vec![("from", from.to_string())];
        if let Some(to) = to {
            params.push(("to", to.to_string()));
        }
        params
    }

    async fn get_json<T>(&self, url: &str, params: &[(&str, String)]) -> Result<T, FetchError>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut request = self.client.get(url).query(params);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(FetchError::Auth("Invalid or expired token".to_string()));
        }

        if !response.status().is_success() {
            return Err(FetchError::Http(format!(
                "API returned status {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| FetchError::Parse(e.to_string()))
    }
}

#[async_trait]
impl MetricsSource for HttpSource {
    async fn fetch_metrics(&self, query: &MetricsQuery) -> Result<MetricsData, FetchError> {
        let mut params = Self::window_params(query.window);
        for metric in &query.metrics {
            params.push(("metric", metric.clone()));
        }

        let payload: MetricsPayload =
            self.get_json(&self.metrics_url(&query.target), &params).await?;
        Ok(MetricsData::from_payload(payload))
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[async_trait]
impl SpanSource for HttpSource {
    async fn fetch_spans(
        &self,
        target: &ServiceTarget,
        window: TimeWindow,
    ) -> Result<Vec<SpanRecord>, FetchError> {
        let params = Self::window_params(window);
        let payload: SpansPayload = self.get_json(&self.spans_url(target), &params).await?;
        Ok(payload.spans.into_iter().map(SpanRecord::from_raw).collect())
    }
}

/// Builder for HttpSource.
#[derive(Debug, Default)]
pub struct HttpSourceBuilder {
    endpoint: Option<String>,
    token: Option<String>,
    timeout: Option<Duration>,
}

impl HttpSourceBuilder {
    /// Set the console API base URL (e.g., "http://localhost:20001").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the bearer token sent with every request.
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the source.
    pub fn build(self) -> HttpSource {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        let endpoint = self
            .endpoint
            .unwrap_or_else(|| "http://localhost:20001".to_string());
        let description = format!("endpoint: {}", endpoint);

        HttpSource {
            client,
            endpoint,
            token: self.token,
            description,
        }
    }
}

// URL encode a string for use in paths
fn urlencoded(s: &str) -> String {
    s.replace('/', "%2F")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let source = HttpSource::builder().build();
        assert_eq!(source.endpoint, "http://localhost:20001");
        assert!(source.token.is_none());
        assert_eq!(source.description(), "endpoint: http://localhost:20001");
    }

    #[test]
    fn test_builder_custom() {
        let source = HttpSource::builder()
            .endpoint("http://mesh-console.local:20001")
            .token("s3cr3t")
            .timeout(Duration::from_secs(3))
            .build();

        assert_eq!(source.endpoint(), "http://mesh-console.local:20001");
        assert_eq!(source.token.as_deref(), Some("s3cr3t"));
    }

    #[test]
    fn test_urls_include_namespace_and_service() {
        let source = HttpSource::builder().build();
        let target = ServiceTarget::new("bookinfo", "reviews");

        assert_eq!(
            source.metrics_url(&target),
            "http://localhost:20001/api/namespaces/bookinfo/services/reviews/metrics"
        );
        assert_eq!(
            source.spans_url(&target),
            "http://localhost:20001/api/namespaces/bookinfo/services/reviews/spans"
        );
    }

    #[test]
    fn test_window_params_in_seconds() {
        let params = HttpSource::window_params(TimeWindow::new(15_000, Some(30_500)));
        assert_eq!(
            params,
            vec![("from", "15".to_string()), ("to", "30.5".to_string())]
        );

        let open = HttpSource::window_params(TimeWindow::new(15_000, None));
        assert_eq!(open, vec![("from", "15".to_string())]);
    }

    #[test]
    fn test_urlencoded() {
        assert_eq!(urlencoded("team/a"), "team%2Fa");
        assert_eq!(urlencoded("simple"), "simple");
    }
}
