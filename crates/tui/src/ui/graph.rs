use ratatui::{
    Frame,
    prelude::{Alignment, Line, Rect, Style},
    widgets::{
        Block, Borders, Paragraph,
        canvas::{Canvas, Line as CanvasLine},
    },
};

use crate::ui::snapshots::DetailSnapshot;

use super::{FAILURE_COLOR, PANEL_BACKGROUND, PANEL_BORDER_DIM, TEXT_ACCENT, TEXT_MUTED, span_color};

/// Rendering helper for the span dependency graph of the loaded trace.
///
/// Positions come from the projection layer; this module only maps them
/// onto a canvas. Edges whose parent never made it into the node set are
/// skipped here, which is all that happens for a dangling reference.
#[derive(Default)]
pub(crate) struct GraphView;

impl GraphView {
    pub(crate) fn render(&self, snapshot: &DetailSnapshot, frame: &mut Frame<'_>, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Span graph")
            .title_style(Style::default().fg(TEXT_ACCENT))
            .border_style(Style::default().fg(PANEL_BORDER_DIM))
            .style(Style::default().bg(PANEL_BACKGROUND));

        let Some(detail) = &snapshot.detail else {
            let placeholder = Paragraph::new("Load a trace on the Traces tab to see its span graph")
                .alignment(Alignment::Center)
                .style(Style::default().fg(TEXT_MUTED).bg(PANEL_BACKGROUND))
                .block(block);
            frame.render_widget(placeholder, area);
            return;
        };

        let graph = detail.graph.clone();

        if graph.nodes.is_empty() {
            let placeholder = Paragraph::new("This trace has no spans")
                .alignment(Alignment::Center)
                .style(Style::default().fg(TEXT_MUTED).bg(PANEL_BACKGROUND))
                .block(block.title(format!("Span graph • {}", detail.trace_id)));
            frame.render_widget(placeholder, area);
            return;
        }

        let max_x = graph.nodes.iter().map(|node| node.x).fold(0.0_f64, f64::max);
        let max_y = graph.nodes.iter().map(|node| node.y).fold(0.0_f64, f64::max);

        // Leave room to the right of the widest column for node labels.
        let x_bound = max_x + 60.0;
        let row_pad = 12.0;

        let canvas = Canvas::default()
            .block(block.title(format!("Span graph • {}", detail.trace_id)))
            .background_color(PANEL_BACKGROUND)
            .x_bounds([0.0, x_bound])
            .y_bounds([-(max_y + row_pad), row_pad])
            .paint(move |ctx| {
                for edge in &graph.edges {
                    let (Some(parent), Some(child)) = (graph.node(&edge.parent), graph.node(&edge.child)) else {
                        continue;
                    };

                    let color = if edge.child_status.is_failure() {
                        FAILURE_COLOR
                    } else {
                        PANEL_BORDER_DIM
                    };

                    ctx.draw(&CanvasLine {
                        x1: parent.x,
                        y1: -parent.y,
                        x2: child.x,
                        y2: -child.y,
                        color,
                    });
                }

                ctx.layer();

                for node in &graph.nodes {
                    let style = Style::default().fg(span_color(node.status, &node.kind));
                    let label = format!("● {} ({})", node.label, node.kind);
                    ctx.print(node.x, -node.y, Line::styled(label, style));
                }
            });

        frame.render_widget(canvas, area);
    }
}
