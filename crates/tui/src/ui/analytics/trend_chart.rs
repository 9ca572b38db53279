use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Style,
    symbols,
    text::Line,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
};

use crate::ui::{PANEL_BACKGROUND, TEXT_MUTED, snapshots::TrendSnapshot};

use super::palette::TrendPalette;

/// Daily token volume over the filtered range, one point per day.
pub(crate) struct TrendChartRenderer<'a> {
    snapshot: &'a TrendSnapshot,
    palette: &'a TrendPalette,
}

impl<'a> TrendChartRenderer<'a> {
    pub(crate) fn new(snapshot: &'a TrendSnapshot, palette: &'a TrendPalette) -> Self {
        Self { snapshot, palette }
    }

    pub(crate) fn render(self, frame: &mut Frame<'_>, area: Rect) {
        if self.snapshot.points.is_empty() {
            self.render_empty_chart(frame, area);
            return;
        }

        let chart = self.build_chart();
        frame.render_widget(chart, area);
    }

    fn render_empty_chart(&self, frame: &mut Frame<'_>, area: Rect) {
        let placeholder = Paragraph::new("No token activity in range")
            .alignment(Alignment::Center)
            .style(Style::default().fg(TEXT_MUTED).bg(PANEL_BACKGROUND))
            .block(self.base_block().title("Daily Tokens  (no samples)"));

        frame.render_widget(placeholder, area);
    }

    fn build_chart(&'a self) -> Chart<'a> {
        let y_max = (self.snapshot.y_max * 1.15).max(1.0);
        let x_max = (self.snapshot.points.len().saturating_sub(1) as f64).max(1.0);

        let x_labels = vec![
            Line::from(self.snapshot.first_date.clone()),
            Line::from(""),
            Line::from(self.snapshot.last_date.clone()),
        ];

        let y_labels = make_count_labels(y_max);

        let title = format!("Daily Tokens  (Σ {})", format_count(self.snapshot.total_tokens));

        let datasets = vec![
            Dataset::default()
                .name("Tokens")
                .marker(symbols::Marker::Braille)
                .style(Style::default().fg(self.palette.series))
                .graph_type(GraphType::Line)
                .data(&self.snapshot.points),
        ];

        Chart::new(datasets)
            .block(self.base_block().title(title))
            .x_axis(
                Axis::default()
                    .bounds([0.0, x_max])
                    .labels(x_labels)
                    .style(Style::default().fg(self.palette.axis)),
            )
            .y_axis(
                Axis::default()
                    .bounds([0.0, y_max])
                    .labels(y_labels)
                    .style(Style::default().fg(self.palette.axis)),
            )
    }

    fn base_block(&self) -> Block<'static> {
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.palette.border))
            .title_style(Style::default().fg(self.palette.title))
            .style(Style::default().bg(PANEL_BACKGROUND))
    }
}

/// Generate Y-axis labels for the token count chart.
fn make_count_labels(max: f64) -> Vec<Line<'static>> {
    let mid = (max / 2.0).round() as u64;
    let max_value = max.round() as u64;
    vec![
        Line::from("0"),
        Line::from(format_count(mid)),
        Line::from(format_count(max_value)),
    ]
}

/// Pretty-print large counts using unit suffixes.
pub(crate) fn format_count(value: u64) -> String {
    match value {
        0..=999 => value.to_string(),
        1_000..=999_999 => format!("{:.1}k", value as f64 / 1_000.0),
        1_000_000..=999_999_999 => format!("{:.1}M", value as f64 / 1_000_000.0),
        _ => format!("{:.1}B", value as f64 / 1_000_000_000.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_use_unit_suffixes() {
        assert_eq!(format_count(950), "950");
        assert_eq!(format_count(1_200), "1.2k");
        assert_eq!(format_count(3_400_000), "3.4M");
    }
}
