use std::collections::VecDeque;

use api::{AnalyticsSnapshot, DateFilter, Span, TraceSummary};
use log::Level;

use crate::{
    graph::{self, IndexLayout, SpanGraph},
    waterfall::{self, WaterfallRow},
};

/// Cap on the activity feed so a long session cannot grow without bound
/// while still showing a meaningful history.
pub(crate) const MAX_ACTIVITY_LINES: usize = 200;

/// Client-side cache of the trace store, mutated only through the named
/// transitions below. Everything here is replaceable server truth; losing
/// it costs one refresh.
#[derive(Default, Debug)]
pub(crate) struct App {
    pub(crate) traces: Vec<TraceSummary>,
    pub(crate) analytics: AnalyticsSnapshot,
    pub(crate) filter: DateFilter,
    pub(crate) detail: Option<TraceDetail>,
    pub(crate) activity: VecDeque<ActivityEntry>,
    pub(crate) last_sync: Option<String>,
    pub(crate) consecutive_failures: u32,
    has_initialized: bool,
}

impl App {
    /// Replace the cached trace list wholesale.
    pub(crate) fn apply_traces(&mut self, traces: Vec<TraceSummary>) {
        self.traces = traces;
    }

    /// Replace the cached analytics snapshot wholesale.
    pub(crate) fn apply_analytics(&mut self, analytics: AnalyticsSnapshot) {
        self.analytics = analytics;
    }

    /// Store the span list of a freshly loaded trace together with its
    /// derived waterfall and graph projections.
    pub(crate) fn apply_detail(&mut self, trace_id: String, spans: Vec<Span>) {
        self.detail = Some(TraceDetail::project(trace_id, spans));
    }

    /// Drop a trace from the local cache ahead of server confirmation.
    /// Detail state referencing the trace goes with it so nothing dangling
    /// is left to render.
    pub(crate) fn remove_trace(&mut self, trace_id: &str) {
        self.traces.retain(|trace| trace.trace_id != trace_id);

        if self
            .detail
            .as_ref()
            .is_some_and(|detail| detail.trace_id == trace_id)
        {
            self.detail = None;
        }
    }

    pub(crate) fn set_filter(&mut self, filter: DateFilter) {
        self.filter = filter;
    }

    /// Record a completed refresh round. Any successful round clears the
    /// failure streak.
    pub(crate) fn mark_sync_success(&mut self, timestamp: String) {
        self.last_sync = Some(timestamp);
        self.consecutive_failures = 0;
        self.has_initialized = true;
    }

    /// Record a refresh round where at least one request failed. Cached
    /// data stays as it was.
    pub(crate) fn mark_sync_failure(&mut self) {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.has_initialized = true;
    }

    /// Append an entry to the bounded activity feed.
    pub(crate) fn push_activity(&mut self, timestamp: String, level: Level, message: String) {
        if self.activity.len() == MAX_ACTIVITY_LINES {
            self.activity.pop_front();
        }

        self.activity.push_back(ActivityEntry {
            timestamp,
            level,
            message,
        });
    }

    /// Whether at least one refresh round has completed, successfully or
    /// not. The UI keeps its loading placeholder up until then.
    pub(crate) fn has_initialized(&self) -> bool {
        self.has_initialized
    }
}

/// A loaded trace: its raw spans plus both render projections.
#[derive(Debug)]
pub(crate) struct TraceDetail {
    pub(crate) trace_id: String,
    pub(crate) spans: Vec<Span>,
    pub(crate) waterfall: Vec<WaterfallRow>,
    pub(crate) graph: SpanGraph,
}

impl TraceDetail {
    pub(crate) fn project(trace_id: String, spans: Vec<Span>) -> Self {
        let waterfall = waterfall::project(&spans);
        let graph = graph::project(&spans, &IndexLayout::default());

        Self {
            trace_id,
            spans,
            waterfall,
            graph,
        }
    }
}

/// One line of the activity feed.
#[derive(Debug)]
pub(crate) struct ActivityEntry {
    pub(crate) timestamp: String,
    pub(crate) level: Level,
    pub(crate) message: String,
}

#[cfg(test)]
mod tests {
    use api::SpanStatus;

    use super::*;

    fn summary(trace_id: &str) -> TraceSummary {
        serde_json::from_value(serde_json::json!({
            "trace_id": trace_id,
            "name": "agent",
            "start_time": "2024-01-15T10:30:00",
            "status": "SUCCESS",
        }))
        .unwrap()
    }

    fn spans() -> Vec<Span> {
        serde_json::from_value(serde_json::json!([
            {
                "span_id": "s1",
                "name": "root",
                "type": "generic",
                "status": "SUCCESS",
                "start_time": 0.0,
                "duration": 10.0,
            },
            {
                "span_id": "s2",
                "parent_span_id": "s1",
                "name": "llm_call",
                "type": "llm",
                "status": "FAILURE",
                "start_time": 2.0,
                "duration": 3.0,
            }
        ]))
        .unwrap()
    }

    #[test]
    fn deleting_the_loaded_trace_clears_detail_state() {
        let mut app = App::default();
        app.apply_traces(vec![summary("t1"), summary("t2"), summary("t3")]);
        app.apply_detail("t2".to_string(), spans());

        app.remove_trace("t2");

        assert_eq!(app.traces.len(), 2);
        assert!(app.traces.iter().all(|trace| trace.trace_id != "t2"));
        assert!(app.detail.is_none());
    }

    #[test]
    fn deleting_another_trace_keeps_detail_state() {
        let mut app = App::default();
        app.apply_traces(vec![summary("t1"), summary("t2")]);
        app.apply_detail("t1".to_string(), spans());

        app.remove_trace("t2");

        assert_eq!(app.traces.len(), 1);
        assert!(app.detail.is_some());
    }

    #[test]
    fn detail_projections_are_derived_on_load() {
        let mut app = App::default();
        app.apply_detail("t1".to_string(), spans());

        let detail = app.detail.as_ref().unwrap();
        assert_eq!(detail.waterfall.len(), 2);
        assert_eq!(detail.graph.edges.len(), 1);
        assert_eq!(detail.graph.edges[0].child_status, SpanStatus::Failure);
    }

    #[test]
    fn sync_failures_accumulate_until_a_success() {
        let mut app = App::default();
        assert!(!app.has_initialized());

        app.mark_sync_failure();
        app.mark_sync_failure();
        assert_eq!(app.consecutive_failures, 2);
        assert!(app.has_initialized());

        app.mark_sync_success("10:30:00".to_string());
        assert_eq!(app.consecutive_failures, 0);
        assert_eq!(app.last_sync.as_deref(), Some("10:30:00"));
    }

    #[test]
    fn activity_feed_is_bounded() {
        let mut app = App::default();

        for i in 0..(MAX_ACTIVITY_LINES + 25) {
            app.push_activity("10:30:00".to_string(), Level::Info, format!("event {i}"));
        }

        assert_eq!(app.activity.len(), MAX_ACTIVITY_LINES);
        assert_eq!(app.activity.front().unwrap().message, "event 25");
    }
}
