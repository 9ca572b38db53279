//! Rendering layer for the Tracelens dashboard.
//!
//! The top-level `Ui` type owns shared chrome (tab strip, status bar,
//! overlays) and delegates each tab to its dedicated module so traces,
//! graph, analytics, and activity concerns stay isolated while sharing one
//! visual theme.

use api::{SpanKind, SpanStatus};
use ratatui::{
    Frame,
    prelude::{Alignment, Color, Constraint, Direction, Layout, Line, Margin, Modifier, Rect, Style},
    text::Span as TextSpan,
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
};

mod activity;
mod analytics;
mod graph;
mod snapshots;
mod traces;

pub(crate) use snapshots::*;

use crate::filter::FilterPreset;

use self::{activity::ActivityView, analytics::AnalyticsView, graph::GraphView, traces::TracesView};

pub(crate) const PANEL_BACKGROUND: Color = Color::Rgb(10, 12, 16);
pub(crate) const PANEL_BORDER_DIM: Color = Color::Rgb(60, 68, 82);
pub(crate) const PANEL_BORDER_ACTIVE: Color = Color::Rgb(120, 180, 235);
pub(crate) const TEXT_PRIMARY: Color = Color::Rgb(214, 220, 232);
pub(crate) const TEXT_MUTED: Color = Color::Rgb(140, 148, 164);
pub(crate) const TEXT_ACCENT: Color = Color::Rgb(170, 200, 245);
pub(crate) const SELECTION_BG: Color = Color::Rgb(36, 42, 56);
pub(crate) const SELECTION_FG: Color = Color::Rgb(255, 205, 95);
pub(crate) const TIMESTAMP_COLOR: Color = Color::Rgb(120, 130, 155);
pub(crate) const SUCCESS_COLOR: Color = Color::Rgb(120, 210, 160);
pub(crate) const FAILURE_COLOR: Color = Color::Rgb(240, 100, 130);

const KIND_LLM_COLOR: Color = Color::Rgb(255, 180, 90);
const KIND_DB_COLOR: Color = Color::Rgb(100, 200, 240);
const KIND_VECTOR_DB_COLOR: Color = Color::Rgb(190, 140, 250);
const KIND_GENERIC_COLOR: Color = Color::Rgb(200, 205, 220);

pub(crate) const TIMESTAMP_FORMAT: &[time::format_description::FormatItem<'static>] =
    time::macros::format_description!("[hour]:[minute]:[second]");

/// Color for anything span-shaped: a failed span always renders in the
/// failure color, otherwise the span kind decides.
pub(crate) fn span_color(status: SpanStatus, kind: &SpanKind) -> Color {
    if status.is_failure() {
        return FAILURE_COLOR;
    }

    match kind {
        SpanKind::Llm => KIND_LLM_COLOR,
        SpanKind::Db => KIND_DB_COLOR,
        SpanKind::VectorDb => KIND_VECTOR_DB_COLOR,
        SpanKind::Other(_) => KIND_GENERIC_COLOR,
    }
}

/// Tabs across the top of the UI.
#[derive(Copy, Default, Clone, Eq, PartialEq)]
pub(crate) enum Tab {
    #[default]
    Traces,
    Graph,
    Analytics,
    Activity,
}

impl Tab {
    pub(crate) const ALL: [Tab; 4] = [Tab::Traces, Tab::Graph, Tab::Analytics, Tab::Activity];

    pub(crate) fn index(self) -> usize {
        match self {
            Tab::Traces => 0,
            Tab::Graph => 1,
            Tab::Analytics => 2,
            Tab::Activity => 3,
        }
    }

    pub(crate) fn title(self) -> &'static str {
        match self {
            Tab::Traces => "Traces [1]",
            Tab::Graph => "Graph [2]",
            Tab::Analytics => "Analytics [3]",
            Tab::Activity => "Activity [4]",
        }
    }
}

/// A destructive command waiting for the user's confirmation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum PendingAction {
    DeleteTrace { trace_id: String, name: String },
    ResetMetrics,
    ResetAll,
}

#[derive(Clone, Default, PartialEq, Eq)]
enum Overlay {
    #[default]
    Hidden,
    ExitPrompt,
    Confirm(PendingAction),
}

/// Overall state holder and rendering façade for the terminal UI.
pub(crate) struct Ui {
    active_tab: Tab,
    tab_hitboxes: [Rect; Tab::ALL.len()],
    app_title: String,
    traces: TracesView,
    graph: GraphView,
    analytics: AnalyticsView,
    activity: ActivityView,
    status: UiStatus,
    traces_snapshot: TracesSnapshot,
    detail_snapshot: DetailSnapshot,
    analytics_snapshot: AnalyticsViewSnapshot,
    activity_snapshot: ActivitySnapshot,
    overlay: Overlay,
    filter_preset: FilterPreset,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            active_tab: Tab::default(),
            tab_hitboxes: [Rect::default(); Tab::ALL.len()],
            app_title: "Tracelens".to_string(),
            traces: TracesView::default(),
            graph: GraphView,
            analytics: AnalyticsView,
            activity: ActivityView,
            status: UiStatus::default(),
            traces_snapshot: TracesSnapshot::default(),
            detail_snapshot: DetailSnapshot::default(),
            analytics_snapshot: AnalyticsViewSnapshot::default(),
            activity_snapshot: ActivitySnapshot::default(),
            overlay: Overlay::Hidden,
            filter_preset: FilterPreset::default(),
        }
    }
}

impl Ui {
    /// Draw the current frame by delegating to the active tab.
    pub(crate) fn render(&mut self, frame: &mut Frame<'_>) {
        let size = frame.area();

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(1), Constraint::Length(1)])
            .split(size);

        self.render_tabs(frame, layout[0]);

        if self.status.has_initialized {
            match self.active_tab {
                Tab::Traces => self
                    .traces
                    .render(&self.traces_snapshot, &self.detail_snapshot, frame, layout[1]),
                Tab::Graph => self.graph.render(&self.detail_snapshot, frame, layout[1]),
                Tab::Analytics => self.analytics.render(&self.analytics_snapshot, frame, layout[1]),
                Tab::Activity => self.activity.render(&self.activity_snapshot, frame, layout[1]),
            }
        } else {
            self.render_loading(frame, layout[1]);
        }

        self.render_status_bar(frame, layout[2]);

        match &self.overlay {
            Overlay::ExitPrompt => render_popup(
                frame,
                size,
                "Confirm exit",
                vec![
                    Line::from("Quit the dashboard?"),
                    Line::from("Press y to confirm, n to stay"),
                ],
            ),
            Overlay::Confirm(action) => {
                let (title, lines) = confirm_copy(action);
                render_popup(frame, size, title, lines);
            }
            Overlay::Hidden => {}
        }
    }

    /// Update the application version displayed in the chrome.
    pub(crate) fn set_version(&mut self, version: &str) {
        let trimmed = version.trim();
        self.app_title = format!("Tracelens {trimmed}");
    }

    pub(crate) fn set_active_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    /// Advance focus within the active tab; only the traces tab has
    /// focusable sub-sections.
    pub(crate) fn focus_next_section(&mut self) {
        if self.active_tab == Tab::Traces {
            self.traces.focus_next_section();
        }
    }

    pub(crate) fn focus_previous_section(&mut self) {
        if self.active_tab == Tab::Traces {
            self.traces.focus_previous_section();
        }
    }

    pub(crate) fn handle_vertical_navigation(&mut self, delta: isize) {
        if self.active_tab == Tab::Traces {
            self.traces
                .handle_vertical_navigation(&self.traces_snapshot, &self.detail_snapshot, delta);
        }
    }

    /// Dispatch mouse clicks to either the global tab strip or the active
    /// tab.
    pub(crate) fn handle_mouse_click(&mut self, column: u16, row: u16) -> bool {
        if self.overlay != Overlay::Hidden {
            return false;
        }

        if self.try_handle_tab_click(column, row) {
            return true;
        }

        if self.active_tab == Tab::Traces {
            self.traces
                .handle_mouse_click(&self.traces_snapshot, &self.detail_snapshot, column, row);
            return true;
        }

        false
    }

    /// The trace under the cursor in the list pane, for load and delete
    /// commands.
    pub(crate) fn highlighted_trace(&self) -> Option<(String, String)> {
        self.traces
            .highlighted(&self.traces_snapshot)
            .map(|row| (row.trace_id.clone(), row.name.clone()))
    }

    /// Move to the next filter preset and return it.
    pub(crate) fn advance_filter_preset(&mut self) -> FilterPreset {
        self.filter_preset = self.filter_preset.next();
        self.filter_preset
    }

    pub(crate) fn update_status(&mut self, status: &UiStatus) -> bool {
        if status.epoch > self.status.epoch {
            self.status = status.clone();
            true
        } else {
            false
        }
    }

    pub(crate) fn update_traces(&mut self, snapshot: &TracesSnapshot) -> bool {
        if snapshot.epoch > self.traces_snapshot.epoch {
            self.traces_snapshot = snapshot.clone();
            self.traces.on_traces_changed(&self.traces_snapshot);
            true
        } else {
            false
        }
    }

    pub(crate) fn update_detail(&mut self, snapshot: &DetailSnapshot) -> bool {
        if snapshot.epoch > self.detail_snapshot.epoch {
            self.detail_snapshot = snapshot.clone();
            self.traces.on_detail_changed(&self.detail_snapshot);
            true
        } else {
            false
        }
    }

    pub(crate) fn update_analytics(&mut self, snapshot: &AnalyticsViewSnapshot) -> bool {
        if snapshot.epoch > self.analytics_snapshot.epoch {
            self.analytics_snapshot = snapshot.clone();
            true
        } else {
            false
        }
    }

    pub(crate) fn update_activity(&mut self, snapshot: &ActivitySnapshot) -> bool {
        if snapshot.epoch > self.activity_snapshot.epoch {
            self.activity_snapshot = snapshot.clone();
            true
        } else {
            false
        }
    }

    pub(crate) fn exit_prompt_visible(&self) -> bool {
        self.overlay == Overlay::ExitPrompt
    }

    pub(crate) fn confirm_visible(&self) -> bool {
        matches!(self.overlay, Overlay::Confirm(_))
    }

    pub(crate) fn show_exit_prompt(&mut self) -> bool {
        if self.overlay == Overlay::ExitPrompt {
            false
        } else {
            self.overlay = Overlay::ExitPrompt;
            true
        }
    }

    pub(crate) fn hide_overlay(&mut self) -> bool {
        if self.overlay == Overlay::Hidden {
            false
        } else {
            self.overlay = Overlay::Hidden;
            true
        }
    }

    pub(crate) fn show_confirm(&mut self, action: PendingAction) -> bool {
        let overlay = Overlay::Confirm(action);
        if self.overlay == overlay {
            false
        } else {
            self.overlay = overlay;
            true
        }
    }

    /// Consume the pending confirmation, if one is on screen.
    pub(crate) fn take_pending_action(&mut self) -> Option<PendingAction> {
        match std::mem::replace(&mut self.overlay, Overlay::Hidden) {
            Overlay::Confirm(action) => Some(action),
            other => {
                self.overlay = other;
                None
            }
        }
    }

    /// Draw the title bar and tab headers.
    fn render_tabs(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let titles = Tab::ALL.iter().map(|tab| Line::from(tab.title())).collect::<Vec<_>>();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(PANEL_BORDER_ACTIVE))
            .title(self.app_title.as_str())
            .style(Style::default().bg(PANEL_BACKGROUND));

        let tabs = Tabs::new(titles.clone())
            .block(block)
            .highlight_style(
                Style::default()
                    .fg(SELECTION_FG)
                    .bg(PANEL_BACKGROUND)
                    .add_modifier(Modifier::BOLD),
            )
            .style(Style::default().fg(TEXT_MUTED).bg(PANEL_BACKGROUND))
            .select(self.active_tab.index());

        frame.render_widget(tabs, area);
        self.tab_hitboxes = compute_tab_hitboxes(area, &titles);
    }

    /// Placeholder shown until the first refresh round has completed.
    fn render_loading(&self, frame: &mut Frame<'_>, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(PANEL_BORDER_DIM))
            .style(Style::default().bg(PANEL_BACKGROUND));

        let paragraph = Paragraph::new("Connecting to the trace store…")
            .alignment(Alignment::Center)
            .style(Style::default().fg(TEXT_PRIMARY).bg(PANEL_BACKGROUND))
            .block(block);

        frame.render_widget(paragraph, area);
    }

    /// One-line footer: key hints on the left, filter and sync state on the
    /// right-hand side of the same line.
    fn render_status_bar(&self, frame: &mut Frame<'_>, area: Rect) {
        let mut spans = vec![
            TextSpan::styled(
                " q quit │ enter load │ d delete │ f filter │ r refresh │ m reset metrics │ X reset all ",
                Style::default().fg(TEXT_MUTED),
            ),
            TextSpan::styled("│ filter: ", Style::default().fg(TEXT_MUTED)),
            TextSpan::styled(self.status.filter_label.clone(), Style::default().fg(TEXT_ACCENT)),
            TextSpan::styled(" │ sync: ", Style::default().fg(TEXT_MUTED)),
        ];

        if self.status.consecutive_failures > 0 {
            spans.push(TextSpan::styled(
                format!("stale ({} failed)", self.status.consecutive_failures),
                Style::default().fg(FAILURE_COLOR).add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(TextSpan::styled("live", Style::default().fg(SUCCESS_COLOR)));
        }

        if let Some(last_sync) = &self.status.last_sync {
            spans.push(TextSpan::styled(
                format!(" (last {last_sync})"),
                Style::default().fg(TIMESTAMP_COLOR),
            ));
        }

        let bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(PANEL_BACKGROUND));
        frame.render_widget(bar, area);
    }

    /// Switch tabs in response to a mouse click on the tab strip.
    fn try_handle_tab_click(&mut self, column: u16, row: u16) -> bool {
        for (idx, rect) in self.tab_hitboxes.iter().enumerate() {
            if rect.is_empty() || !contains_point(*rect, column, row) {
                continue;
            }

            let new_tab = Tab::ALL[idx];
            if new_tab != self.active_tab {
                self.set_active_tab(new_tab);
                return true;
            }
            return false;
        }

        false
    }
}

/// Overlay copy for each destructive action.
fn confirm_copy(action: &PendingAction) -> (&'static str, Vec<Line<'static>>) {
    match action {
        PendingAction::DeleteTrace { trace_id, name } => {
            let short_id = trace_id.get(..8).unwrap_or(trace_id);
            (
                "Delete trace",
                vec![
                    Line::from(format!("Delete trace '{name}' ({short_id})?")),
                    Line::from("The store removes it permanently."),
                    Line::from("Press y to confirm, n to cancel"),
                ],
            )
        }
        PendingAction::ResetMetrics => (
            "Reset metrics",
            vec![
                Line::from("Clear every aggregated metric?"),
                Line::from("Traces themselves are kept."),
                Line::from("Press y to confirm, n to cancel"),
            ],
        ),
        PendingAction::ResetAll => (
            "Reset all data",
            vec![
                Line::from("Delete every trace and every metric?"),
                Line::from("This cannot be undone."),
                Line::from("Press y to confirm, n to cancel"),
            ],
        ),
    }
}

/// Centered modal box used by the exit prompt and command confirmations.
fn render_popup(frame: &mut Frame<'_>, area: Rect, title: &str, text: Vec<Line<'static>>) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let width = if area.width >= 20 { area.width.min(56) } else { area.width };
    let height = if area.height >= 5 { area.height.min(7) } else { area.height };

    if width == 0 || height == 0 {
        return;
    }

    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;
    let popup = Rect::new(popup_x, popup_y, width, height);

    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(PANEL_BORDER_ACTIVE))
        .title(title.to_string())
        .title_alignment(Alignment::Center)
        .style(Style::default().bg(PANEL_BACKGROUND));

    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(TEXT_PRIMARY).bg(PANEL_BACKGROUND))
        .block(block);

    frame.render_widget(paragraph, popup);
}

pub(super) fn contains_point(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.x + area.width && row >= area.y && row < area.y + area.height
}

/// Approximate the horizontal extent of every tab title the way the Tabs
/// widget lays them out: one space of padding either side, one divider
/// column in between.
fn compute_tab_hitboxes(area: Rect, titles: &[Line<'_>]) -> [Rect; Tab::ALL.len()] {
    let mut hitboxes = [Rect::default(); Tab::ALL.len()];

    let inner = area.inner(Margin::new(1, 1));
    if inner.width == 0 || inner.height == 0 {
        return hitboxes;
    }

    let right_edge = inner.x.saturating_add(inner.width);
    let mut cursor_x = inner.x;

    for (idx, title) in titles.iter().enumerate().take(hitboxes.len()) {
        if cursor_x >= right_edge {
            break;
        }

        let tab_start = cursor_x;
        let remaining = usize::from(right_edge - cursor_x);
        let cell_width = (title.width() + 2).min(remaining);

        cursor_x = cursor_x.saturating_add(u16::try_from(cell_width).unwrap_or(u16::MAX));

        if cell_width > 0 {
            hitboxes[idx] = Rect::new(
                tab_start,
                inner.y,
                u16::try_from(cell_width).unwrap_or(u16::MAX),
                inner.height,
            );
        }

        // Divider between adjacent tabs.
        if idx + 1 < titles.len() {
            cursor_x = cursor_x.saturating_add(1).min(right_edge);
        }
    }

    hitboxes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_status_overrides_kind_colors() {
        for kind in [
            SpanKind::Llm,
            SpanKind::Db,
            SpanKind::VectorDb,
            SpanKind::Other("tool".to_string()),
        ] {
            assert_eq!(span_color(SpanStatus::Failure, &kind), FAILURE_COLOR);
        }
    }

    #[test]
    fn successful_spans_are_colored_by_kind() {
        assert_eq!(span_color(SpanStatus::Success, &SpanKind::Llm), KIND_LLM_COLOR);
        assert_eq!(span_color(SpanStatus::Success, &SpanKind::Db), KIND_DB_COLOR);
        assert_eq!(span_color(SpanStatus::Success, &SpanKind::VectorDb), KIND_VECTOR_DB_COLOR);
        assert_ne!(
            span_color(SpanStatus::Success, &SpanKind::Other("tool".to_string())),
            FAILURE_COLOR
        );
    }

    #[test]
    fn pending_action_is_consumed_exactly_once() {
        let mut ui = Ui::default();

        ui.show_confirm(PendingAction::ResetMetrics);
        assert!(ui.confirm_visible());

        assert_eq!(ui.take_pending_action(), Some(PendingAction::ResetMetrics));
        assert!(!ui.confirm_visible());
        assert_eq!(ui.take_pending_action(), None);
    }

    #[test]
    fn exit_prompt_is_not_a_pending_action() {
        let mut ui = Ui::default();

        ui.show_exit_prompt();
        assert_eq!(ui.take_pending_action(), None);
        assert!(ui.exit_prompt_visible());
    }
}
