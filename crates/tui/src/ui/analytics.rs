mod latency_table;
mod palette;
mod trend_chart;

use ratatui::{
    Frame,
    prelude::{Alignment, Constraint, Direction, Layout, Line, Modifier, Rect, Style},
    widgets::{Block, Borders, Paragraph},
};

use crate::ui::snapshots::AnalyticsViewSnapshot;

use self::{
    latency_table::LatencyTableRenderer,
    palette::{PaletteBundle, StatPalette},
    trend_chart::TrendChartRenderer,
};

use super::PANEL_BACKGROUND;

/// Rendering helper for the analytics tab: error rate, latency by span
/// kind, and the daily token trend, all for the active date filter.
#[derive(Default)]
pub(crate) struct AnalyticsView;

impl AnalyticsView {
    pub(crate) fn render(&self, snapshot: &AnalyticsViewSnapshot, frame: &mut Frame<'_>, area: Rect) {
        frame.render_widget(Block::default().style(Style::default().bg(PANEL_BACKGROUND)), area);

        let palettes = PaletteBundle::default();

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(area);

        let upper_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(layout[0]);

        render_error_rate(snapshot, palettes.stat, frame, upper_layout[0]);

        let latency_table = LatencyTableRenderer::new(&snapshot.latency_rows, palettes.latency);
        latency_table.render(frame, upper_layout[1]);

        let trend_chart = TrendChartRenderer::new(&snapshot.trend, palettes.trend);
        trend_chart.render(frame, layout[1]);
    }
}

/// Big error-rate figure with the filter it was computed over.
fn render_error_rate(snapshot: &AnalyticsViewSnapshot, palette: &StatPalette, frame: &mut Frame<'_>, area: Rect) {
    let value_color = if snapshot.error_rate >= 10.0 {
        palette.bad
    } else if snapshot.error_rate >= 1.0 {
        palette.warn
    } else {
        palette.ok
    };

    let lines = vec![
        Line::from(""),
        Line::styled(
            format!("{:.2} %", snapshot.error_rate),
            Style::default().fg(value_color).add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::styled("span error rate", Style::default().fg(palette.label)),
        Line::styled(
            format!("({})", snapshot.filter_label),
            Style::default().fg(palette.label),
        ),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().bg(PANEL_BACKGROUND))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border))
                .title("Error Rate")
                .title_style(Style::default().fg(palette.title))
                .style(Style::default().bg(PANEL_BACKGROUND)),
        );

    frame.render_widget(paragraph, area);
}
