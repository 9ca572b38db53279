use ratatui::{
    Frame,
    prelude::{Line, Rect, Style},
    style::Color,
    widgets::{Block, Borders, Paragraph},
};

use crate::{app::ActivityEntry, ui::snapshots::ActivitySnapshot};

use super::{PANEL_BACKGROUND, PANEL_BORDER_DIM, TEXT_ACCENT, TEXT_MUTED, TEXT_PRIMARY, TIMESTAMP_COLOR};

const ACTIVITY_WARN_COLOR: Color = Color::Rgb(255, 205, 95);
const ACTIVITY_ERROR_COLOR: Color = Color::Rgb(240, 100, 130);
const ACTIVITY_INFO_COLOR: Color = Color::Rgb(100, 200, 240);

/// Rendering helper for the activity tab: the client-side feed of sync
/// rounds, commands, and their failures.
#[derive(Default)]
pub(crate) struct ActivityView;

impl ActivityView {
    pub(crate) fn render(&self, snapshot: &ActivitySnapshot, frame: &mut Frame<'_>, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(PANEL_BORDER_DIM))
            .title("Activity")
            .title_style(Style::default().fg(TEXT_ACCENT))
            .style(Style::default().bg(PANEL_BACKGROUND));

        if area.height <= 2 {
            frame.render_widget(block, area);
            return;
        }

        let visible = (area.height as usize).saturating_sub(2);
        let mut lines = snapshot.lines.as_ref().clone();

        // Newest entries sit at the end of the feed; drop from the front so
        // the latest lines stay on screen.
        if lines.len() > visible {
            lines.drain(..lines.len() - visible);
        }

        if lines.is_empty() {
            lines.push(Line::styled("Nothing has happened yet", Style::default().fg(TEXT_MUTED)));
        }

        let paragraph = Paragraph::new(lines)
            .style(Style::default().fg(TEXT_PRIMARY).bg(PANEL_BACKGROUND))
            .block(block);

        frame.render_widget(paragraph, area);
    }
}

impl ActivityEntry {
    /// Convert an activity entry into a colored line ready for display.
    pub(crate) fn to_line(&self) -> Line<'static> {
        use ratatui::prelude::Span;

        let mut spans = Vec::with_capacity(5);

        spans.push(Span::styled(
            self.timestamp.clone(),
            Style::default().fg(TIMESTAMP_COLOR),
        ));

        spans.push(Span::raw("  "));

        spans.push(Span::styled(
            format!("{:>5}", self.level.to_string()),
            self.level_style(),
        ));

        spans.push(Span::raw("  "));
        spans.push(Span::styled(self.message.clone(), Style::default().fg(TEXT_PRIMARY)));

        Line::from(spans)
    }

    fn level_style(&self) -> Style {
        match self.level {
            log::Level::Error => Style::default()
                .fg(ACTIVITY_ERROR_COLOR)
                .add_modifier(ratatui::prelude::Modifier::BOLD),
            log::Level::Warn => Style::default()
                .fg(ACTIVITY_WARN_COLOR)
                .add_modifier(ratatui::prelude::Modifier::BOLD),
            log::Level::Info => Style::default().fg(ACTIVITY_INFO_COLOR),
            log::Level::Debug | log::Level::Trace => Style::default().fg(TEXT_MUTED),
        }
    }
}
