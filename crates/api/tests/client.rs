use std::time::Duration;

use api::{ApiClient, ApiError, DateFilter, SpanKind, SpanStatus};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn lists_traces() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/traces"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "trace_id": "t1",
                "name": "research_agent",
                "start_time": "2024-01-15T10:30:00",
                "status": "SUCCESS"
            },
            {
                "trace_id": "t2",
                "name": "research_agent",
                "start_time": "2024-01-15T10:29:00",
                "status": "FAILURE"
            }
        ])))
        .mount(&server)
        .await;

    let traces = client(&server).list_traces().await.unwrap();

    assert_eq!(traces.len(), 2);
    assert_eq!(traces[0].trace_id, "t1");
    assert_eq!(traces[1].status, SpanStatus::Failure);
}

#[tokio::test]
async fn fetches_spans_for_one_trace() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/traces/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "span_id": "s1",
                "parent_span_id": null,
                "name": "agent_run",
                "type": "generic",
                "status": "SUCCESS",
                "start_time": 100.0,
                "end_time": 104.0,
                "duration": 4.0
            },
            {
                "span_id": "s2",
                "parent_span_id": "s1",
                "name": "completion",
                "type": "llm",
                "status": "SUCCESS",
                "start_time": 100.5,
                "duration": 3.0,
                "meta": {"usage": {"total_tokens": 1200}}
            }
        ])))
        .mount(&server)
        .await;

    let spans = client(&server).trace_spans("t1").await.unwrap();

    assert_eq!(spans.len(), 2);
    assert_eq!(spans[0].parent_span_id, None);
    assert_eq!(spans[1].parent_span_id.as_deref(), Some("s1"));
    assert_eq!(spans[1].kind, SpanKind::Llm);
}

#[tokio::test]
async fn analytics_without_filter_sends_no_query_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/analytics/dashboard"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error_rate": 12.5,
            "latency_by_type": [{"type": "llm", "avg": 1.2, "p95": 3.4}],
            "daily_trend": [{"date": "2024-01-15", "tokens": 50000}]
        })))
        .mount(&server)
        .await;

    let snapshot = client(&server)
        .dashboard_analytics(&DateFilter::default())
        .await
        .unwrap();

    assert_eq!(snapshot.error_rate, 12.5);
    assert_eq!(snapshot.latency_by_type[0].kind, SpanKind::Llm);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn analytics_with_filter_sends_exactly_both_bounds() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/analytics/dashboard"))
        .and(query_param("start", "2024-01-01"))
        .and(query_param("end", "2024-01-31"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error_rate": 0.0,
            "latency_by_type": [],
            "daily_trend": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let filter = DateFilter {
        start: Some("2024-01-01".to_string()),
        end: Some("2024-01-31".to_string()),
    };

    client(&server).dashboard_analytics(&filter).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("start=2024-01-01&end=2024-01-31"));
}

#[tokio::test]
async fn delete_trace_hits_the_trace_resource() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/traces/t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "deleted",
            "id": "t1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).delete_trace("t1").await.unwrap();
}

#[tokio::test]
async fn reset_metrics_twice_succeeds_both_times() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/analytics/reset"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "metrics_cleared"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = client(&server);
    client.reset_metrics().await.unwrap();
    client.reset_metrics().await.unwrap();
}

#[tokio::test]
async fn non_success_status_maps_to_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/traces/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("trace not found"))
        .mount(&server)
        .await;

    let error = client(&server).trace_spans("missing").await.unwrap_err();

    match error {
        ApiError::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "trace not found");
        }
        ApiError::Transport(error) => unreachable!("expected an API error, got {error}"),
    }
}

#[tokio::test]
async fn unreachable_store_maps_to_transport_error() {
    // Nothing listens on this port; reqwest fails at the connection level.
    let client = ApiClient::new("http://127.0.0.1:9", Duration::from_millis(250)).unwrap();

    let error = client.list_traces().await.unwrap_err();
    assert!(matches!(error, ApiError::Transport(_)));
}
