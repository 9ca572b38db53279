use std::sync::Arc;

use api::{ApiClient, Span, SpanStatus, TraceSummary};
use log::Level;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span as TextSpan},
    widgets::{Cell, Row},
};
use time::OffsetDateTime;
use tokio::{
    sync::{mpsc, watch},
    time::MissedTickBehavior,
};
use tokio_util::sync::CancellationToken;

use crate::{
    app::{App, TraceDetail},
    command::Command,
    filter, ui,
};

/// Longest JSON payload rendered into a span attribute cell.
const ATTRIBUTE_VALUE_LIMIT: usize = 160;

/// Tracks epoch counters and dirty flags for each UI channel.
#[derive(Default)]
struct UiState {
    status: ChannelState,
    traces: ChannelState,
    detail: ChannelState,
    analytics: ChannelState,
    activity: ChannelState,
}

#[derive(Default)]
struct ChannelState {
    epoch: u64,
    dirty: bool,
}

impl ChannelState {
    fn next_epoch(&mut self) -> u64 {
        self.epoch = self.epoch.saturating_add(1);
        self.epoch
    }
}

/// Owns the client-side cache and every request against the trace store.
///
/// The orchestrator refreshes the trace list and analytics on a fixed
/// cadence, reacts to commands from the input loop, and publishes
/// render-ready snapshots over watch channels. Because every request is
/// awaited inline on this single task, responses can never be applied out
/// of order.
pub(crate) struct Orchestrator {
    pub(crate) client: ApiClient,
    pub(crate) poll_interval: std::time::Duration,
    pub(crate) commands: mpsc::UnboundedReceiver<Command>,
    pub(crate) status_tx: watch::Sender<ui::UiStatus>,
    pub(crate) traces_tx: watch::Sender<ui::TracesSnapshot>,
    pub(crate) detail_tx: watch::Sender<ui::DetailSnapshot>,
    pub(crate) analytics_tx: watch::Sender<ui::AnalyticsViewSnapshot>,
    pub(crate) activity_tx: watch::Sender<ui::ActivitySnapshot>,
    pub(crate) shutdown: CancellationToken,
}

impl Orchestrator {
    pub(crate) async fn run(mut self) {
        let mut app = App::default();
        let mut ui_state = UiState::default();
        ui_state.status.dirty = true;

        self.refresh(&mut app, &mut ui_state).await;
        self.send_ui_updates(&app, &mut ui_state);

        let mut tick = tokio::time::interval(self.poll_interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The startup refresh above already happened; push the first tick a
        // full period out.
        tick.reset();

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = tick.tick() => {
                    self.refresh(&mut app, &mut ui_state).await;
                }
                command = self.commands.recv() => {
                    let Some(command) = command else { break };

                    if self.handle_command(&mut app, &mut ui_state, command).await {
                        // Filter changes and manual refreshes restart the
                        // cadence; the old timer is replaced, never stacked.
                        tick.reset();
                    }
                }
            }

            self.send_ui_updates(&app, &mut ui_state);
        }
    }

    /// Handle one command. Returns `true` when the poll cadence should
    /// restart because a refresh just ran.
    async fn handle_command(&mut self, app: &mut App, ui_state: &mut UiState, command: Command) -> bool {
        match command {
            Command::Refresh => {
                self.refresh(app, ui_state).await;
                true
            }
            Command::SetFilter(new_filter) => {
                if app.filter != new_filter {
                    let label = filter::describe(&new_filter);
                    app.set_filter(new_filter);
                    app.push_activity(now_timestamp(), Level::Info, format!("analytics filter set to {label}"));
                    ui_state.activity.dirty = true;
                }

                self.refresh(app, ui_state).await;
                true
            }
            Command::SelectTrace(trace_id) => {
                self.load_detail(app, ui_state, trace_id).await;
                false
            }
            Command::DeleteTrace(trace_id) => {
                self.delete_trace(app, ui_state, trace_id).await;
                true
            }
            Command::ResetMetrics => {
                self.run_reset(app, ui_state, false).await;
                true
            }
            Command::ResetAll => {
                self.run_reset(app, ui_state, true).await;
                true
            }
        }
    }

    /// Re-fetch the trace list and analytics concurrently.
    ///
    /// Each leg replaces its cached value on success; a failed leg leaves
    /// the previous value in place so the dashboard keeps showing the last
    /// known state of the store.
    async fn refresh(&mut self, app: &mut App, ui_state: &mut UiState) {
        let current_filter = app.filter.clone();

        let (traces, analytics) = tokio::join!(
            self.client.list_traces(),
            self.client.dashboard_analytics(&current_filter),
        );

        let mut failed = false;

        match traces {
            Ok(traces) => {
                app.apply_traces(traces);
                ui_state.traces.dirty = true;
            }
            Err(error) => {
                failed = true;
                log::warn!("trace list refresh failed: {error}");
                app.push_activity(now_timestamp(), Level::Warn, format!("trace list refresh failed: {error}"));
                ui_state.activity.dirty = true;
            }
        }

        match analytics {
            Ok(analytics) => {
                app.apply_analytics(analytics);
                ui_state.analytics.dirty = true;
            }
            Err(error) => {
                failed = true;
                log::warn!("analytics refresh failed: {error}");
                app.push_activity(now_timestamp(), Level::Warn, format!("analytics refresh failed: {error}"));
                ui_state.activity.dirty = true;
            }
        }

        if failed {
            app.mark_sync_failure();
        } else {
            app.mark_sync_success(now_timestamp());
        }

        ui_state.status.dirty = true;
    }

    /// Fetch the spans of one trace and project them. On failure the
    /// previously loaded detail stays on screen.
    async fn load_detail(&mut self, app: &mut App, ui_state: &mut UiState, trace_id: String) {
        match self.client.trace_spans(&trace_id).await {
            Ok(spans) => {
                app.push_activity(
                    now_timestamp(),
                    Level::Info,
                    format!("loaded {} spans for trace {trace_id}", spans.len()),
                );
                app.apply_detail(trace_id, spans);
                ui_state.detail.dirty = true;
            }
            Err(error) => {
                log::warn!("loading trace {trace_id} failed: {error}");
                app.push_activity(
                    now_timestamp(),
                    Level::Warn,
                    format!("loading trace {trace_id} failed: {error}"),
                );
            }
        }

        ui_state.activity.dirty = true;
    }

    /// Delete one trace: drop it from the local cache immediately, issue
    /// the request, then reconcile with a full refresh. A failed request is
    /// not rolled back; the refresh brings the trace back instead.
    async fn delete_trace(&mut self, app: &mut App, ui_state: &mut UiState, trace_id: String) {
        app.remove_trace(&trace_id);
        ui_state.traces.dirty = true;
        ui_state.detail.dirty = true;

        match self.client.delete_trace(&trace_id).await {
            Ok(()) => {
                app.push_activity(now_timestamp(), Level::Info, format!("deleted trace {trace_id}"));
            }
            Err(error) => {
                log::warn!("deleting trace {trace_id} failed: {error}");
                app.push_activity(
                    now_timestamp(),
                    Level::Warn,
                    format!("deleting trace {trace_id} failed: {error}"),
                );
            }
        }

        ui_state.activity.dirty = true;
        self.refresh(app, ui_state).await;
    }

    /// Run one of the reset commands, then refresh. Unlike delete there is
    /// no optimistic mutation: the refreshed server state is the only
    /// outcome.
    async fn run_reset(&mut self, app: &mut App, ui_state: &mut UiState, everything: bool) {
        let (result, what) = if everything {
            (self.client.reset_all().await, "all trace data")
        } else {
            (self.client.reset_metrics().await, "analytics metrics")
        };

        match result {
            Ok(()) => {
                app.push_activity(now_timestamp(), Level::Info, format!("reset {what}"));
            }
            Err(error) => {
                log::warn!("resetting {what} failed: {error}");
                app.push_activity(now_timestamp(), Level::Warn, format!("resetting {what} failed: {error}"));
            }
        }

        ui_state.activity.dirty = true;
        self.refresh(app, ui_state).await;
    }

    /// Publish every dirty snapshot and clear its flag.
    fn send_ui_updates(&mut self, app: &App, ui_state: &mut UiState) {
        if ui_state.status.dirty {
            let epoch = ui_state.status.next_epoch();
            let _ = self.status_tx.send(build_status_snapshot(app, epoch));
            ui_state.status.dirty = false;
        }

        if ui_state.traces.dirty {
            let epoch = ui_state.traces.next_epoch();
            let _ = self.traces_tx.send(build_traces_snapshot(app, epoch));
            ui_state.traces.dirty = false;
        }

        if ui_state.detail.dirty {
            let epoch = ui_state.detail.next_epoch();
            let _ = self.detail_tx.send(build_detail_snapshot(app, epoch));
            ui_state.detail.dirty = false;
        }

        if ui_state.analytics.dirty {
            let epoch = ui_state.analytics.next_epoch();
            let _ = self.analytics_tx.send(build_analytics_snapshot(app, epoch));
            ui_state.analytics.dirty = false;
        }

        if ui_state.activity.dirty {
            let epoch = ui_state.activity.next_epoch();
            let _ = self.activity_tx.send(build_activity_snapshot(app, epoch));
            ui_state.activity.dirty = false;
        }
    }
}

fn build_status_snapshot(app: &App, epoch: u64) -> ui::UiStatus {
    ui::UiStatus {
        epoch,
        has_initialized: app.has_initialized(),
        last_sync: app.last_sync.clone(),
        consecutive_failures: app.consecutive_failures,
        filter_label: filter::describe(&app.filter),
    }
}

fn build_traces_snapshot(app: &App, epoch: u64) -> ui::TracesSnapshot {
    let traces = app.traces.iter().map(build_trace_row).collect();

    ui::TracesSnapshot {
        epoch,
        traces: Arc::new(traces),
    }
}

/// Format one trace list row: start time, status, name, shortened id.
fn build_trace_row(trace: &TraceSummary) -> ui::TraceRowSnapshot {
    let timestamp = clock_part(&trace.start_time);
    let short_id = trace.trace_id.get(..8).unwrap_or(&trace.trace_id);

    let status_style = if trace.status.is_failure() {
        Style::default().fg(ui::FAILURE_COLOR).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(ui::SUCCESS_COLOR)
    };

    let cells = vec![
        TextSpan::styled(format!("[{timestamp}]"), Style::default().fg(ui::TIMESTAMP_COLOR)),
        TextSpan::raw(" "),
        TextSpan::styled(format!("{:<7}", trace.status.to_string()), status_style),
        TextSpan::raw(" "),
        TextSpan::styled(
            trace.name.clone(),
            Style::default().fg(ui::TEXT_PRIMARY).add_modifier(Modifier::BOLD),
        ),
        TextSpan::styled(format!("  {short_id}"), Style::default().fg(ui::TEXT_MUTED)),
    ];

    ui::TraceRowSnapshot {
        trace_id: trace.trace_id.clone(),
        name: trace.name.clone(),
        list_line: Line::from(cells),
    }
}

fn build_detail_snapshot(app: &App, epoch: u64) -> ui::DetailSnapshot {
    let detail = app.detail.as_ref().map(|detail| Arc::new(build_trace_detail(detail)));

    ui::DetailSnapshot { epoch, detail }
}

fn build_trace_detail(detail: &TraceDetail) -> ui::TraceDetailSnapshot {
    let waterfall = detail
        .waterfall
        .iter()
        .map(|row| ui::WaterfallRowSnapshot {
            span_id: row.span_id.clone(),
            name: row.name.clone(),
            kind: row.kind.clone(),
            status: row.status,
            left_percent: row.left_percent,
            width_percent: row.width_percent,
            duration_label: format_duration_seconds(row.duration_seconds),
        })
        .collect();

    let attributes = detail
        .spans
        .iter()
        .map(|span| ui::SpanAttributesSnapshot {
            span_id: span.span_id.clone(),
            rows: Arc::new(build_attribute_rows(span)),
        })
        .collect();

    ui::TraceDetailSnapshot {
        trace_id: detail.trace_id.clone(),
        summary: Arc::new(build_summary_lines(detail)),
        waterfall: Arc::new(waterfall),
        attributes: Arc::new(attributes),
        graph: Arc::new(detail.graph.clone()),
    }
}

fn build_summary_lines(detail: &TraceDetail) -> Vec<Line<'static>> {
    let span_count = detail.spans.len();
    let failures = detail
        .spans
        .iter()
        .filter(|span| span.status == SpanStatus::Failure)
        .count();

    let start = detail
        .spans
        .iter()
        .map(|span| span.start_time)
        .fold(f64::INFINITY, f64::min);
    let end = detail
        .spans
        .iter()
        .map(Span::end_seconds)
        .fold(f64::NEG_INFINITY, f64::max);
    let total = if span_count > 0 { (end - start).max(0.0) } else { 0.0 };

    vec![
        Line::from(format!("Trace {}", detail.trace_id)),
        Line::from(format!(
            "{span_count} spans • {failures} failed • total {}",
            format_duration_seconds(total)
        )),
    ]
}

/// Attribute table rows for one span: identity, timing, then payloads.
fn build_attribute_rows(span: &Span) -> Vec<Row<'static>> {
    let mut rows = Vec::new();

    rows.push(attribute_row("Name", span.name.clone()));
    rows.push(attribute_row("Span ID", span.span_id.clone()));

    if let Some(parent) = &span.parent_span_id {
        rows.push(attribute_row("Parent ID", parent.clone()));
    }

    rows.push(attribute_row("Type", span.kind.to_string()));
    rows.push(attribute_row("Status", span.status.to_string()));
    rows.push(attribute_row("Duration", format_duration_seconds(span.duration_seconds())));

    if let Some(error) = &span.error_message {
        rows.push(attribute_row("Error", error.clone()));
    }

    if let Some(inputs) = &span.inputs {
        rows.push(attribute_row("Inputs", compact_json(inputs)));
    }

    if let Some(outputs) = &span.outputs {
        rows.push(attribute_row("Outputs", compact_json(outputs)));
    }

    if let Some(meta) = &span.meta {
        rows.push(attribute_row("Meta", compact_json(meta)));
    }

    rows
}

fn attribute_row<K, V>(key: K, value: V) -> Row<'static>
where
    K: Into<String>,
    V: Into<String>,
{
    let key_cell = Cell::from(key.into()).style(Style::default().fg(ui::TEXT_ACCENT));
    let value_cell = Cell::from(value.into()).style(Style::default().fg(ui::TEXT_PRIMARY));

    Row::new(vec![key_cell, value_cell])
}

fn build_analytics_snapshot(app: &App, epoch: u64) -> ui::AnalyticsViewSnapshot {
    let latency_rows = app
        .analytics
        .latency_by_type
        .iter()
        .map(|row| ui::TypeLatencyRow {
            kind: row.kind.clone(),
            avg_label: format_latency_seconds(row.avg),
            p95_label: format_latency_seconds(row.p95),
        })
        .collect();

    let trend = &app.analytics.daily_trend;
    let points: Vec<(f64, f64)> = trend
        .iter()
        .enumerate()
        .map(|(index, day)| (index as f64, day.tokens as f64))
        .collect();
    let y_max = points.iter().map(|(_, tokens)| *tokens).fold(0.0_f64, f64::max);
    let total_tokens = trend.iter().map(|day| day.tokens).sum();

    ui::AnalyticsViewSnapshot {
        epoch,
        error_rate: app.analytics.error_rate,
        filter_label: filter::describe(&app.filter),
        latency_rows: Arc::new(latency_rows),
        trend: ui::TrendSnapshot {
            points: Arc::new(points),
            first_date: trend.first().map(|day| day.date.clone()).unwrap_or_default(),
            last_date: trend.last().map(|day| day.date.clone()).unwrap_or_default(),
            total_tokens,
            y_max,
        },
    }
}

fn build_activity_snapshot(app: &App, epoch: u64) -> ui::ActivitySnapshot {
    let lines: Vec<_> = app.activity.iter().map(|entry| entry.to_line()).collect();

    ui::ActivitySnapshot {
        epoch,
        lines: Arc::new(lines),
    }
}

/// Wall-clock timestamp for activity entries and the sync indicator.
fn now_timestamp() -> String {
    const FALLBACK: &str = "--:--:--";

    OffsetDateTime::now_utc()
        .format(ui::TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| FALLBACK.to_string())
}

/// Pull the HH:MM:SS part out of an ISO datetime string without parsing
/// the whole thing; the store's format is stable.
fn clock_part(iso_datetime: &str) -> &str {
    iso_datetime
        .split_once('T')
        .map(|(_, clock)| clock.get(..8).unwrap_or(clock))
        .unwrap_or(iso_datetime)
}

/// Compact a duration in seconds into a human-readable label.
fn format_duration_seconds(seconds: f64) -> String {
    if seconds >= 1.0 {
        format!("{seconds:.2}s")
    } else if seconds >= 0.001 {
        format!("{:.1}ms", seconds * 1_000.0)
    } else if seconds > 0.0 {
        format!("{:.0}us", seconds * 1_000_000.0)
    } else {
        "0ms".to_string()
    }
}

/// Latency labels for the analytics table, server values are in seconds.
fn format_latency_seconds(seconds: f64) -> String {
    if seconds >= 1.0 {
        format!("{seconds:.2} s")
    } else {
        format!("{:.0} ms", seconds * 1_000.0)
    }
}

/// Render a JSON payload on a single bounded line.
fn compact_json(value: &serde_json::Value) -> String {
    let rendered = value.to_string();

    if rendered.chars().count() <= ATTRIBUTE_VALUE_LIMIT {
        return rendered;
    }

    let mut truncated: String = rendered.chars().take(ATTRIBUTE_VALUE_LIMIT).collect();
    truncated.push('…');
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_part_extracts_the_time_component() {
        assert_eq!(clock_part("2024-01-15T10:30:00.123456"), "10:30:00");
        assert_eq!(clock_part("2024-01-15T10:30:00"), "10:30:00");
        assert_eq!(clock_part("not-a-timestamp"), "not-a-timestamp");
    }

    #[test]
    fn duration_labels_pick_sensible_units() {
        assert_eq!(format_duration_seconds(2.5), "2.50s");
        assert_eq!(format_duration_seconds(0.25), "250.0ms");
        assert_eq!(format_duration_seconds(0.000_5), "500us");
        assert_eq!(format_duration_seconds(0.0), "0ms");
    }

    #[test]
    fn latency_labels_switch_units_at_one_second() {
        assert_eq!(format_latency_seconds(1.234), "1.23 s");
        assert_eq!(format_latency_seconds(0.042), "42 ms");
    }

    #[test]
    fn long_json_payloads_are_truncated() {
        let value = serde_json::json!({"text": "x".repeat(400)});
        let rendered = compact_json(&value);

        assert!(rendered.chars().count() <= ATTRIBUTE_VALUE_LIMIT + 1);
        assert!(rendered.ends_with('…'));
    }
}
