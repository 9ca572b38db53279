use std::sync::Arc;

use api::{SpanKind, SpanStatus};
use ratatui::{text::Line, widgets::Row};

use crate::graph::SpanGraph;

/// High-level readiness and sync health for the status bar and the loading
/// placeholder.
#[derive(Clone, Debug, Default)]
pub(crate) struct UiStatus {
    pub(crate) epoch: u64,
    pub(crate) has_initialized: bool,
    pub(crate) last_sync: Option<String>,
    pub(crate) consecutive_failures: u32,
    pub(crate) filter_label: String,
}

/// Render-ready trace list.
#[derive(Clone, Debug, Default)]
pub(crate) struct TracesSnapshot {
    pub(crate) epoch: u64,
    pub(crate) traces: Arc<Vec<TraceRowSnapshot>>,
}

/// One row of the trace list plus the identity needed for commands.
#[derive(Clone, Debug)]
pub(crate) struct TraceRowSnapshot {
    pub(crate) trace_id: String,
    pub(crate) name: String,
    pub(crate) list_line: Line<'static>,
}

/// Detail panes for the currently loaded trace, if any.
#[derive(Clone, Debug, Default)]
pub(crate) struct DetailSnapshot {
    pub(crate) epoch: u64,
    pub(crate) detail: Option<Arc<TraceDetailSnapshot>>,
}

/// Pre-rendered pieces for one loaded trace.
#[derive(Clone, Debug)]
pub(crate) struct TraceDetailSnapshot {
    pub(crate) trace_id: String,
    pub(crate) summary: Arc<Vec<Line<'static>>>,
    pub(crate) waterfall: Arc<Vec<WaterfallRowSnapshot>>,
    pub(crate) attributes: Arc<Vec<SpanAttributesSnapshot>>,
    pub(crate) graph: Arc<SpanGraph>,
}

/// Minimal information needed to draw one waterfall bar.
#[derive(Clone, Debug)]
pub(crate) struct WaterfallRowSnapshot {
    pub(crate) span_id: String,
    pub(crate) name: String,
    pub(crate) kind: SpanKind,
    pub(crate) status: SpanStatus,
    pub(crate) left_percent: f64,
    pub(crate) width_percent: f64,
    pub(crate) duration_label: String,
}

/// Attribute table precomputed for a span.
#[derive(Clone, Debug)]
pub(crate) struct SpanAttributesSnapshot {
    pub(crate) span_id: String,
    pub(crate) rows: Arc<Vec<Row<'static>>>,
}

/// Render-ready analytics tab content.
#[derive(Clone, Debug, Default)]
pub(crate) struct AnalyticsViewSnapshot {
    pub(crate) epoch: u64,
    pub(crate) error_rate: f64,
    pub(crate) filter_label: String,
    pub(crate) latency_rows: Arc<Vec<TypeLatencyRow>>,
    pub(crate) trend: TrendSnapshot,
}

/// Latency aggregate for one span kind, pre-formatted for the table.
#[derive(Clone, Debug)]
pub(crate) struct TypeLatencyRow {
    pub(crate) kind: SpanKind,
    pub(crate) avg_label: String,
    pub(crate) p95_label: String,
}

/// Daily token series for the trend chart.
#[derive(Clone, Debug, Default)]
pub(crate) struct TrendSnapshot {
    pub(crate) points: Arc<Vec<(f64, f64)>>,
    pub(crate) first_date: String,
    pub(crate) last_date: String,
    pub(crate) total_tokens: u64,
    pub(crate) y_max: f64,
}

/// Render-ready activity feed lines.
#[derive(Clone, Debug, Default)]
pub(crate) struct ActivitySnapshot {
    pub(crate) epoch: u64,
    pub(crate) lines: Arc<Vec<Line<'static>>>,
}
