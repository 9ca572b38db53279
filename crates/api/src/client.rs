use std::time::Duration;

use reqwest::{
    Client, Response,
    header::{CONNECTION, HeaderMap, HeaderValue},
};

use crate::{AnalyticsSnapshot, ApiError, DateFilter, Span, TraceSummary};

/// Cap on how much of an error body is carried into an [`ApiError`].
const ERROR_BODY_LIMIT: usize = 512;

/// HTTP client over the trace store, sharing one connection pool across
/// every call.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

fn default_http_client_builder(request_timeout: Duration) -> reqwest::ClientBuilder {
    let mut headers = HeaderMap::new();
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

    Client::builder()
        .timeout(request_timeout)
        .pool_idle_timeout(Some(Duration::from_secs(5)))
        .tcp_nodelay(true)
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .default_headers(headers)
}

impl ApiClient {
    pub fn new(base_url: &str, request_timeout: Duration) -> crate::Result<Self> {
        let client = default_http_client_builder(request_timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET /traces: the current trace list, newest first.
    pub async fn list_traces(&self) -> crate::Result<Vec<TraceSummary>> {
        let response = self.client.get(format!("{}/traces", self.base_url)).send().await?;
        let response = check_status(response).await?;

        Ok(response.json().await?)
    }

    /// GET /traces/{id}: every span recorded for one trace.
    pub async fn trace_spans(&self, trace_id: &str) -> crate::Result<Vec<Span>> {
        let response = self
            .client
            .get(format!("{}/traces/{trace_id}", self.base_url))
            .send()
            .await?;
        let response = check_status(response).await?;

        Ok(response.json().await?)
    }

    /// GET /analytics/dashboard: the aggregate view, optionally restricted
    /// to a date range. An empty filter sends no query string at all.
    pub async fn dashboard_analytics(&self, filter: &DateFilter) -> crate::Result<AnalyticsSnapshot> {
        let mut request = self.client.get(format!("{}/analytics/dashboard", self.base_url));

        if !filter.is_empty() {
            request = request.query(&filter.query_params());
        }

        let response = check_status(request.send().await?).await?;

        Ok(response.json().await?)
    }

    /// DELETE /traces/{id}.
    pub async fn delete_trace(&self, trace_id: &str) -> crate::Result<()> {
        log::debug!("deleting trace {trace_id}");

        let response = self
            .client
            .delete(format!("{}/traces/{trace_id}", self.base_url))
            .send()
            .await?;
        check_status(response).await?;

        Ok(())
    }

    /// DELETE /analytics/reset: drop every aggregated metric.
    pub async fn reset_metrics(&self) -> crate::Result<()> {
        log::debug!("resetting analytics metrics");

        let response = self
            .client
            .delete(format!("{}/analytics/reset", self.base_url))
            .send()
            .await?;
        check_status(response).await?;

        Ok(())
    }

    /// DELETE /traces/reset: drop every trace and every metric.
    pub async fn reset_all(&self) -> crate::Result<()> {
        log::debug!("resetting all trace data");

        let response = self
            .client
            .delete(format!("{}/traces/reset", self.base_url))
            .send()
            .await?;
        check_status(response).await?;

        Ok(())
    }
}

/// Turn a non-2xx response into an [`ApiError::Api`] carrying a bounded
/// slice of the body for the activity feed.
async fn check_status(response: Response) -> crate::Result<Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message: String = body.trim().chars().take(ERROR_BODY_LIMIT).collect();

    Err(ApiError::Api {
        status: status.as_u16(),
        message,
    })
}
