use std::fmt;

use serde::Deserialize;
use serde_json::Value;

/// One row of the trace list. The store derives these from the root span
/// of each trace and returns them newest-first.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TraceSummary {
    pub trace_id: String,
    pub name: String,
    /// ISO-8601 datetime string as produced by the store.
    pub start_time: String,
    pub status: SpanStatus,
}

/// Terminal status of a span (and, through the root span, of a trace).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpanStatus {
    Success,
    Failure,
}

impl SpanStatus {
    pub fn is_failure(self) -> bool {
        matches!(self, SpanStatus::Failure)
    }
}

impl fmt::Display for SpanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpanStatus::Success => f.write_str("SUCCESS"),
            SpanStatus::Failure => f.write_str("FAILURE"),
        }
    }
}

/// Kind of work a span recorded. The set is open: anything the store sends
/// beyond the well-known kinds is carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum SpanKind {
    Llm,
    Db,
    VectorDb,
    Other(String),
}

impl Default for SpanKind {
    fn default() -> Self {
        SpanKind::Other("generic".to_string())
    }
}

impl From<String> for SpanKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "llm" => SpanKind::Llm,
            "db" => SpanKind::Db,
            "vector_db" => SpanKind::VectorDb,
            _ => SpanKind::Other(value),
        }
    }
}

impl fmt::Display for SpanKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpanKind::Llm => f.write_str("llm"),
            SpanKind::Db => f.write_str("db"),
            SpanKind::VectorDb => f.write_str("vector_db"),
            SpanKind::Other(label) => f.write_str(label),
        }
    }
}

/// One recorded unit of work within a trace.
///
/// A missing `parent_span_id` marks a root span. A present one is expected
/// to reference another span of the same trace, but the client never
/// validates that: a dangling reference only means one graph edge fails to
/// render.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Span {
    pub span_id: String,
    #[serde(default)]
    pub parent_span_id: Option<String>,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: SpanKind,
    pub status: SpanStatus,
    /// Start of the span in epoch seconds.
    #[serde(default)]
    pub start_time: f64,
    /// End of the span in epoch seconds, when it completed.
    #[serde(default)]
    pub end_time: Option<f64>,
    /// Wall-clock duration in seconds, when the store computed one.
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub meta: Option<Value>,
    #[serde(default)]
    pub inputs: Option<Value>,
    #[serde(default)]
    pub outputs: Option<Value>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl Span {
    /// Duration in seconds, falling back to the time bounds when the store
    /// did not send an explicit value.
    pub fn duration_seconds(&self) -> f64 {
        if let Some(duration) = self.duration {
            return duration.max(0.0);
        }

        match self.end_time {
            Some(end) => (end - self.start_time).max(0.0),
            None => 0.0,
        }
    }

    /// Point in time the span is considered finished, in epoch seconds.
    /// An unfinished span contributes its start time.
    pub fn end_seconds(&self) -> f64 {
        self.end_time.unwrap_or(self.start_time)
    }
}

/// Server-computed aggregate view over some or all traces.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AnalyticsSnapshot {
    /// Percentage of failed spans.
    #[serde(default)]
    pub error_rate: f64,
    #[serde(default)]
    pub latency_by_type: Vec<TypeLatency>,
    #[serde(default)]
    pub daily_trend: Vec<DailyTokens>,
}

/// Average and p95 latency for one span kind, in seconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TypeLatency {
    #[serde(rename = "type")]
    pub kind: SpanKind,
    pub avg: f64,
    pub p95: f64,
}

/// Token volume for a single day.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailyTokens {
    /// ISO date, no time component.
    pub date: String,
    pub tokens: u64,
}

/// Optional date range restricting the analytics snapshot.
///
/// Held as plain ISO date strings because that is exactly what the store
/// expects on the wire; no client-side interpretation happens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateFilter {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl DateFilter {
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Query parameters in wire order. An unset bound contributes nothing,
    /// so an empty filter encodes to no query string at all.
    pub fn query_params(&self) -> Vec<(&'static str, &str)> {
        let mut params = Vec::new();

        if let Some(start) = self.start.as_deref() {
            params.push(("start", start));
        }

        if let Some(end) = self.end.as_deref() {
            params.push(("end", end));
        }

        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_kind_keeps_unknown_labels() {
        assert_eq!(SpanKind::from("llm".to_string()), SpanKind::Llm);
        assert_eq!(SpanKind::from("vector_db".to_string()), SpanKind::VectorDb);
        assert_eq!(
            SpanKind::from("tool_call".to_string()),
            SpanKind::Other("tool_call".to_string())
        );
    }

    #[test]
    fn span_deserializes_with_sparse_fields() {
        let span: Span = serde_json::from_value(serde_json::json!({
            "span_id": "s1",
            "parent_span_id": null,
            "name": "agent_run",
            "type": "llm",
            "status": "SUCCESS",
            "start_time": 100.0,
            "duration": 2.5,
            "meta": {"usage": {"total_tokens": 420}},
            "inputs": {"prompt": "hi"},
            "outputs": null
        }))
        .unwrap();

        assert_eq!(span.kind, SpanKind::Llm);
        assert_eq!(span.parent_span_id, None);
        assert_eq!(span.duration_seconds(), 2.5);
        // No end_time on the wire: the span ends where it starts.
        assert_eq!(span.end_seconds(), 100.0);
    }

    #[test]
    fn duration_falls_back_to_bounds() {
        let span: Span = serde_json::from_value(serde_json::json!({
            "span_id": "s2",
            "name": "db_lookup",
            "type": "db",
            "status": "FAILURE",
            "start_time": 10.0,
            "end_time": 12.0
        }))
        .unwrap();

        assert_eq!(span.duration_seconds(), 2.0);
        assert_eq!(span.end_seconds(), 12.0);
    }

    #[test]
    fn empty_filter_has_no_params() {
        assert!(DateFilter::default().query_params().is_empty());
    }

    #[test]
    fn full_filter_encodes_both_bounds_in_order() {
        let filter = DateFilter {
            start: Some("2024-01-01".to_string()),
            end: Some("2024-01-31".to_string()),
        };

        assert_eq!(
            filter.query_params(),
            vec![("start", "2024-01-01"), ("end", "2024-01-31")]
        );
    }

    #[test]
    fn half_open_filter_encodes_one_bound() {
        let filter = DateFilter {
            start: None,
            end: Some("2024-01-31".to_string()),
        };

        assert_eq!(filter.query_params(), vec![("end", "2024-01-31")]);
    }
}
