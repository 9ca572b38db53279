use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use crate::ui::{PANEL_BACKGROUND, TEXT_MUTED, TEXT_PRIMARY, snapshots::TypeLatencyRow};

use super::palette::LatencyPalette;

/// Table of average and p95 latency per span kind, as computed by the
/// store for the active date range.
pub(crate) struct LatencyTableRenderer<'a> {
    rows: &'a [TypeLatencyRow],
    palette: &'a LatencyPalette,
}

impl<'a> LatencyTableRenderer<'a> {
    pub(crate) fn new(rows: &'a [TypeLatencyRow], palette: &'a LatencyPalette) -> Self {
        Self { rows, palette }
    }

    pub(crate) fn render(self, frame: &mut Frame<'_>, area: Rect) {
        if self.rows.is_empty() {
            self.render_placeholder(frame, area);
            return;
        }

        let table = self.build_table();
        frame.render_widget(table, area);
    }

    fn render_placeholder(&self, frame: &mut Frame<'_>, area: Rect) {
        let placeholder = Paragraph::new("No latency data in range")
            .block(self.base_block())
            .alignment(Alignment::Center)
            .style(Style::default().fg(TEXT_MUTED).bg(PANEL_BACKGROUND));

        frame.render_widget(placeholder, area);
    }

    fn build_table(&'a self) -> Table<'a> {
        let header = Row::new(vec!["Type", "Avg", "P95"]).style(
            Style::default()
                .fg(self.palette.title)
                .add_modifier(Modifier::BOLD)
                .bg(PANEL_BACKGROUND),
        );

        let rows = self.rows.iter().map(|row| {
            Row::new(vec![
                Cell::from(row.kind.to_string()).style(Style::default().fg(self.palette.label)),
                Cell::from(row.avg_label.clone()).style(Style::default().fg(self.palette.label)),
                Cell::from(row.p95_label.clone()).style(Style::default().fg(self.palette.label)),
            ])
        });

        Table::new(
            rows,
            [
                Constraint::Percentage(40),
                Constraint::Percentage(30),
                Constraint::Percentage(30),
            ],
        )
        .column_spacing(1)
        .header(header)
        .block(self.base_block())
        .style(Style::default().fg(TEXT_PRIMARY).bg(PANEL_BACKGROUND))
    }

    fn base_block(&self) -> Block<'static> {
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.palette.border))
            .title("Latency by Type")
            .title_style(Style::default().fg(self.palette.title))
            .style(Style::default().bg(PANEL_BACKGROUND))
    }
}
