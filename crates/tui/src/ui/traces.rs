use std::sync::Arc;

use ratatui::{
    Frame,
    prelude::{Alignment, Constraint, Direction, Layout, Modifier, Rect, Style},
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, TableState, Wrap},
};

use crate::ui::snapshots::{DetailSnapshot, TraceDetailSnapshot, TraceRowSnapshot, TracesSnapshot};

use super::{
    PANEL_BACKGROUND, PANEL_BORDER_ACTIVE, PANEL_BORDER_DIM, SELECTION_BG, SELECTION_FG, TEXT_ACCENT, TEXT_MUTED,
    TEXT_PRIMARY, contains_point, span_color,
};

/// Rendering controller for the traces tab: the trace list on the left,
/// the loaded trace's summary, waterfall, and span attributes on the
/// right.
#[derive(Default)]
pub(crate) struct TracesView {
    focus: DetailFocus,
    list_inner: Option<Rect>,
    list_state: ListState,
    timeline_inner: Option<Rect>,
    timeline_state: TableState,
    current_span_ids: Vec<String>,
    selected_span: Option<String>,
}

impl TracesView {
    pub(crate) fn render(
        &mut self,
        traces: &TracesSnapshot,
        detail: &DetailSnapshot,
        frame: &mut Frame<'_>,
        area: Rect,
    ) {
        let title = format!("Traces • {}", traces.traces.len());
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_style(Style::default().fg(TEXT_ACCENT))
            .border_style(Style::default().fg(PANEL_BORDER_DIM))
            .style(Style::default().bg(PANEL_BACKGROUND));
        frame.render_widget(block.clone(), area);

        let inner = block.inner(area);
        if inner.width < 4 || inner.height < 4 {
            return;
        }

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(inner);

        self.render_trace_list(traces, frame, columns[0]);
        self.render_trace_detail(detail, frame, columns[1]);
    }

    /// Clamp the list selection when the trace set changes underneath it.
    pub(crate) fn on_traces_changed(&mut self, snapshot: &TracesSnapshot) {
        if snapshot.traces.is_empty() {
            self.list_state.select(None);
            return;
        }

        let last = snapshot.traces.len() - 1;
        let target = match self.list_state.selected() {
            Some(index) => index.min(last),
            None => 0,
        };

        self.list_state.select(Some(target));
        self.ensure_list_selection_visible();
    }

    /// Rebuild the timeline selection when a different trace gets loaded.
    pub(crate) fn on_detail_changed(&mut self, snapshot: &DetailSnapshot) {
        let Some(detail) = &snapshot.detail else {
            self.timeline_state.select(None);
            self.current_span_ids.clear();
            self.selected_span = None;
            return;
        };

        self.current_span_ids = detail.waterfall.iter().map(|row| row.span_id.clone()).collect();

        let index = self
            .selected_span
            .as_ref()
            .and_then(|span_id| self.current_span_ids.iter().position(|id| id == span_id))
            .unwrap_or(0);

        if self.current_span_ids.is_empty() {
            self.timeline_state.select(None);
            self.selected_span = None;
        } else {
            self.timeline_state.select(Some(index));
            self.selected_span = self.current_span_ids.get(index).cloned();
        }
    }

    pub(crate) fn focus_next_section(&mut self) {
        self.focus = self.focus.next();
    }

    pub(crate) fn focus_previous_section(&mut self) {
        self.focus = self.focus.previous();
    }

    pub(crate) fn handle_vertical_navigation(
        &mut self,
        traces: &TracesSnapshot,
        detail: &DetailSnapshot,
        delta: isize,
    ) {
        match self.focus {
            DetailFocus::TraceList => self.move_list_selection(traces, delta),
            DetailFocus::Timeline => self.move_timeline_selection(detail, delta),
            DetailFocus::Attributes => {}
        }
    }

    pub(crate) fn handle_mouse_click(
        &mut self,
        traces: &TracesSnapshot,
        detail: &DetailSnapshot,
        column: u16,
        row: u16,
    ) {
        if self.handle_timeline_click(detail, column, row) {
            return;
        }
        let _ = self.handle_list_click(traces, column, row);
    }

    /// The trace row currently under the cursor.
    pub(crate) fn highlighted<'a>(&self, snapshot: &'a TracesSnapshot) -> Option<&'a TraceRowSnapshot> {
        let index = self.list_state.selected()?;
        snapshot.traces.get(index)
    }

    fn render_trace_list(&mut self, snapshot: &TracesSnapshot, frame: &mut Frame<'_>, area: Rect) {
        let mut block = Block::default()
            .title("History")
            .borders(Borders::ALL)
            .title_style(Style::default().fg(TEXT_ACCENT))
            .style(Style::default().bg(PANEL_BACKGROUND))
            .border_style(Style::default().fg(PANEL_BORDER_DIM));
        if self.focus == DetailFocus::TraceList {
            block = block.border_style(Style::default().fg(PANEL_BORDER_ACTIVE));
        }

        let inner = block.inner(area);
        self.list_inner = Some(inner);

        if snapshot.traces.is_empty() {
            let placeholder = Paragraph::new("No traces recorded yet")
                .alignment(Alignment::Center)
                .style(Style::default().fg(TEXT_MUTED).bg(PANEL_BACKGROUND))
                .block(block);
            frame.render_widget(placeholder, area);
            return;
        }

        if self.list_state.selected().is_none() {
            self.list_state.select(Some(0));
        }

        self.ensure_list_selection_visible();

        let items: Vec<ListItem<'static>> = snapshot
            .traces
            .iter()
            .map(|trace| ListItem::new(trace.list_line.clone()))
            .collect();

        let list = List::new(items)
            .block(block)
            .style(Style::default().fg(TEXT_PRIMARY).bg(PANEL_BACKGROUND))
            .highlight_style(self.list_highlight_style())
            .highlight_symbol("> ");

        frame.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_trace_detail(&mut self, snapshot: &DetailSnapshot, frame: &mut Frame<'_>, area: Rect) {
        let block = Block::default()
            .title("Trace detail")
            .borders(Borders::ALL)
            .title_style(Style::default().fg(TEXT_ACCENT))
            .border_style(Style::default().fg(PANEL_BORDER_DIM))
            .style(Style::default().bg(PANEL_BACKGROUND));

        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);
        if inner.width < 4 || inner.height < 6 {
            return;
        }

        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Min(4)])
            .split(inner);

        let Some(detail) = &snapshot.detail else {
            let summary = Paragraph::new("Press Enter on a trace to load it")
                .alignment(Alignment::Center)
                .style(Style::default().fg(TEXT_MUTED).bg(PANEL_BACKGROUND))
                .block(Block::default().style(Style::default().bg(PANEL_BACKGROUND)));
            frame.render_widget(summary, sections[0]);

            self.render_waterfall_placeholder(frame, sections[1], "The waterfall appears once a trace is loaded");
            self.render_attributes_placeholder(frame, sections[2], "Span attributes appear once a trace is loaded");
            return;
        };

        let summary = Paragraph::new(detail.summary.as_ref().clone())
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(TEXT_PRIMARY).bg(PANEL_BACKGROUND))
            .block(Block::default().style(Style::default().bg(PANEL_BACKGROUND)));
        frame.render_widget(summary, sections[0]);

        self.render_waterfall(detail, frame, sections[1]);

        match self.attribute_rows(detail) {
            Some(rows) => {
                let mut attr_block = self.attributes_block();
                if sections[2].height < 3 {
                    attr_block = attr_block.title("Attributes (too small)");
                    frame.render_widget(attr_block, sections[2]);
                    return;
                }

                let table = Table::new(rows.as_ref().clone(), [Constraint::Length(12), Constraint::Min(10)])
                    .column_spacing(1)
                    .style(Style::default().fg(TEXT_PRIMARY).bg(PANEL_BACKGROUND))
                    .block(attr_block);
                frame.render_widget(table, sections[2]);
            }
            None => {
                self.render_attributes_placeholder(frame, sections[2], "Select a span to view attributes");
            }
        }
    }

    fn render_waterfall(&mut self, detail: &TraceDetailSnapshot, frame: &mut Frame<'_>, area: Rect) {
        let mut block = Block::default()
            .title("Waterfall")
            .borders(Borders::ALL)
            .title_style(Style::default().fg(TEXT_ACCENT))
            .border_style(Style::default().fg(PANEL_BORDER_DIM))
            .style(Style::default().bg(PANEL_BACKGROUND));
        if self.focus == DetailFocus::Timeline {
            block = block.border_style(Style::default().fg(PANEL_BORDER_ACTIVE));
        }

        let inner = block.inner(area);
        self.timeline_inner = Some(inner);

        if inner.height < 3 {
            let placeholder = Paragraph::new("Waterfall area too small")
                .alignment(Alignment::Center)
                .style(Style::default().fg(TEXT_MUTED).bg(PANEL_BACKGROUND))
                .block(block);
            frame.render_widget(placeholder, area);
            return;
        }

        if detail.waterfall.is_empty() {
            let placeholder = Paragraph::new("This trace has no spans")
                .alignment(Alignment::Center)
                .style(Style::default().fg(TEXT_MUTED).bg(PANEL_BACKGROUND))
                .block(block);
            frame.render_widget(placeholder, area);
            return;
        }

        let available = inner.width as usize;
        let bar_width = (available / 2).clamp(10, 80);

        let rows: Vec<Row<'static>> = detail
            .waterfall
            .iter()
            .map(|span| {
                let bar = build_waterfall_bar(span.left_percent, span.width_percent, bar_width);
                let style = Style::default().fg(span_color(span.status, &span.kind));

                Row::new(vec![
                    Cell::from(span.name.clone()),
                    Cell::from(bar),
                    Cell::from(span.duration_label.clone()),
                ])
                .style(style)
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Percentage(35),
                Constraint::Percentage(50),
                Constraint::Percentage(15),
            ],
        )
        .column_spacing(1)
        .style(Style::default().fg(TEXT_PRIMARY).bg(PANEL_BACKGROUND))
        .block(block)
        .highlight_symbol("> ")
        .row_highlight_style(self.timeline_highlight_style());

        frame.render_stateful_widget(table, area, &mut self.timeline_state);
    }

    fn attributes_block(&self) -> Block<'static> {
        let mut block = Block::default()
            .title("Attributes")
            .borders(Borders::ALL)
            .title_style(Style::default().fg(TEXT_ACCENT))
            .border_style(Style::default().fg(PANEL_BORDER_DIM))
            .style(Style::default().bg(PANEL_BACKGROUND));
        if self.focus == DetailFocus::Attributes {
            block = block.border_style(Style::default().fg(PANEL_BORDER_ACTIVE));
        }
        block
    }

    fn render_waterfall_placeholder(&mut self, frame: &mut Frame<'_>, area: Rect, message: &str) {
        let mut block = Block::default()
            .title("Waterfall")
            .borders(Borders::ALL)
            .title_style(Style::default().fg(TEXT_ACCENT))
            .border_style(Style::default().fg(PANEL_BORDER_DIM))
            .style(Style::default().bg(PANEL_BACKGROUND));
        if self.focus == DetailFocus::Timeline {
            block = block.border_style(Style::default().fg(PANEL_BORDER_ACTIVE));
        }

        let inner = block.inner(area);
        self.timeline_inner = Some(inner);

        let placeholder = Paragraph::new(message.to_string())
            .alignment(Alignment::Center)
            .style(Style::default().fg(TEXT_MUTED).bg(PANEL_BACKGROUND))
            .block(block);
        frame.render_widget(placeholder, area);
    }

    fn render_attributes_placeholder(&self, frame: &mut Frame<'_>, area: Rect, message: &str) {
        let placeholder = Paragraph::new(message.to_string())
            .alignment(Alignment::Center)
            .style(Style::default().fg(TEXT_MUTED).bg(PANEL_BACKGROUND))
            .block(self.attributes_block());
        frame.render_widget(placeholder, area);
    }

    fn list_highlight_style(&self) -> Style {
        if self.focus == DetailFocus::TraceList {
            Style::default()
                .fg(SELECTION_FG)
                .bg(SELECTION_BG)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_ACCENT).bg(SELECTION_BG)
        }
    }

    fn timeline_highlight_style(&self) -> Style {
        if self.focus == DetailFocus::Timeline {
            Style::default()
                .fg(SELECTION_FG)
                .bg(SELECTION_BG)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_ACCENT).bg(SELECTION_BG)
        }
    }

    /// The attribute rows of the selected span, if one is selected.
    fn attribute_rows(&self, detail: &TraceDetailSnapshot) -> Option<Arc<Vec<Row<'static>>>> {
        let span_id = self.selected_span.as_ref()?;
        detail
            .attributes
            .iter()
            .find(|entry| &entry.span_id == span_id)
            .map(|entry| entry.rows.clone())
    }

    fn move_list_selection(&mut self, snapshot: &TracesSnapshot, delta: isize) {
        if snapshot.traces.is_empty() {
            self.list_state.select(None);
            return;
        }

        let len = snapshot.traces.len() as isize;
        let current = self.list_state.selected().map(|idx| idx as isize).unwrap_or(0);
        let new_index = (current + delta).clamp(0, len - 1) as usize;
        self.list_state.select(Some(new_index));
        self.ensure_list_selection_visible();
    }

    fn move_timeline_selection(&mut self, detail: &DetailSnapshot, delta: isize) {
        if detail.detail.is_none() || self.current_span_ids.is_empty() {
            self.timeline_state.select(None);
            self.selected_span = None;
            return;
        }

        let len = self.current_span_ids.len() as isize;
        let current = self.timeline_state.selected().map(|idx| idx as isize).unwrap_or(0);
        let new_index = (current + delta).clamp(0, len - 1) as usize;
        self.timeline_state.select(Some(new_index));
        self.selected_span = self.current_span_ids.get(new_index).cloned();
        self.ensure_timeline_selection_visible();
    }

    fn ensure_list_selection_visible(&mut self) {
        let Some(inner) = self.list_inner else {
            return;
        };

        let visible_rows = inner.height as usize;
        if visible_rows == 0 {
            return;
        }

        let Some(selected) = self.list_state.selected() else {
            return;
        };

        let offset = self.list_state.offset();
        if selected < offset {
            *self.list_state.offset_mut() = selected;
        } else if selected >= offset + visible_rows {
            *self.list_state.offset_mut() = selected + 1 - visible_rows;
        }
    }

    fn ensure_timeline_selection_visible(&mut self) {
        let Some(inner) = self.timeline_inner else {
            return;
        };

        let visible_rows = inner.height as usize;
        if visible_rows == 0 {
            return;
        }

        let Some(selected) = self.timeline_state.selected() else {
            return;
        };

        let offset = self.timeline_state.offset();
        if selected < offset {
            *self.timeline_state.offset_mut() = selected;
        } else if selected >= offset + visible_rows {
            *self.timeline_state.offset_mut() = selected + 1 - visible_rows;
        }
    }

    fn handle_list_click(&mut self, snapshot: &TracesSnapshot, column: u16, row: u16) -> bool {
        let Some(inner) = self.list_inner else {
            return false;
        };

        if !contains_point(inner, column, row) {
            return false;
        }

        let offset = self.list_state.offset();
        let index = offset + row.saturating_sub(inner.y) as usize;

        if index < snapshot.traces.len() {
            self.list_state.select(Some(index));
            self.ensure_list_selection_visible();
            self.focus = DetailFocus::TraceList;
        }

        true
    }

    fn handle_timeline_click(&mut self, detail: &DetailSnapshot, column: u16, row: u16) -> bool {
        let Some(inner) = self.timeline_inner else {
            return false;
        };

        if !contains_point(inner, column, row) {
            return false;
        }

        if detail.detail.is_none() || self.current_span_ids.is_empty() {
            return true;
        }

        let offset = self.timeline_state.offset();
        let index = offset + row.saturating_sub(inner.y) as usize;

        if index < self.current_span_ids.len() {
            self.timeline_state.select(Some(index));
            self.selected_span = self.current_span_ids.get(index).cloned();
            self.ensure_timeline_selection_visible();
            self.focus = DetailFocus::Timeline;
        }

        true
    }
}

/// Subsections within the traces tab that can receive keyboard focus.
#[derive(Copy, Default, Clone, Eq, PartialEq)]
enum DetailFocus {
    #[default]
    TraceList,
    Timeline,
    Attributes,
}

impl DetailFocus {
    fn next(self) -> Self {
        match self {
            DetailFocus::TraceList => DetailFocus::Timeline,
            DetailFocus::Timeline => DetailFocus::Attributes,
            DetailFocus::Attributes => DetailFocus::TraceList,
        }
    }

    fn previous(self) -> Self {
        match self {
            DetailFocus::TraceList => DetailFocus::Attributes,
            DetailFocus::Timeline => DetailFocus::TraceList,
            DetailFocus::Attributes => DetailFocus::Timeline,
        }
    }
}

/// Draw one waterfall bar: the percentages come straight from the
/// projection, this only maps them onto terminal cells. A bar always
/// occupies at least one cell so the visibility floor survives rounding.
fn build_waterfall_bar(left_percent: f64, width_percent: f64, width: usize) -> String {
    if width == 0 {
        return String::new();
    }

    let mut start = ((left_percent / 100.0) * width as f64).floor() as usize;
    if start >= width {
        start = width - 1;
    }

    let length = (((width_percent / 100.0) * width as f64).ceil() as usize).max(1);
    let end = (start + length).min(width);

    let mut bar = vec![' '; width];
    for cell in bar.iter_mut().take(end).skip(start) {
        *cell = '█';
    }

    bar.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_width_bar_fills_every_cell() {
        assert_eq!(build_waterfall_bar(0.0, 100.0, 10), "██████████");
    }

    #[test]
    fn floor_width_bar_still_shows_one_cell() {
        let bar = build_waterfall_bar(50.0, 0.5, 10);
        assert_eq!(bar.chars().filter(|c| *c == '█').count(), 1);
        assert_eq!(bar.chars().position(|c| c == '█'), Some(5));
    }

    #[test]
    fn bar_never_overflows_the_requested_width() {
        let bar = build_waterfall_bar(95.0, 50.0, 20);
        assert_eq!(bar.chars().count(), 20);
    }
}
