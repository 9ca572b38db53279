use api::{Span, SpanKind, SpanStatus};

/// Placement strategy for graph nodes.
///
/// The projection itself never positions anything; it asks the layout so a
/// real algorithm can replace the index-based placeholder without touching
/// any fetching or projection code.
pub(crate) trait GraphLayout {
    fn position(&self, index: usize, has_parent: bool) -> (f64, f64);
}

/// The placeholder layout: roots sit in a left column, children in a right
/// column, and every span drops one row per list index.
#[derive(Debug, Clone, Copy)]
pub(crate) struct IndexLayout {
    pub(crate) root_column: f64,
    pub(crate) child_column: f64,
    pub(crate) row_height: f64,
}

impl Default for IndexLayout {
    fn default() -> Self {
        Self {
            root_column: 10.0,
            child_column: 70.0,
            row_height: 12.0,
        }
    }
}

impl GraphLayout for IndexLayout {
    fn position(&self, index: usize, has_parent: bool) -> (f64, f64) {
        let column = if has_parent { self.child_column } else { self.root_column };
        (column, index as f64 * self.row_height)
    }
}

/// One visual node per span.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GraphNode {
    pub(crate) span_id: String,
    pub(crate) label: String,
    pub(crate) kind: SpanKind,
    pub(crate) status: SpanStatus,
    pub(crate) x: f64,
    pub(crate) y: f64,
}

/// One directed parent→child edge per span that references a parent.
///
/// The referenced parent is not required to exist in the node set; a
/// dangling edge is simply skipped by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GraphEdge {
    pub(crate) parent: String,
    pub(crate) child: String,
    pub(crate) child_status: SpanStatus,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct SpanGraph {
    pub(crate) nodes: Vec<GraphNode>,
    pub(crate) edges: Vec<GraphEdge>,
}

impl SpanGraph {
    pub(crate) fn node(&self, span_id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.span_id == span_id)
    }
}

/// Project a flat span list into nodes and edges for the graph view.
pub(crate) fn project(spans: &[Span], layout: &dyn GraphLayout) -> SpanGraph {
    let mut nodes = Vec::with_capacity(spans.len());
    let mut edges = Vec::new();

    for (index, span) in spans.iter().enumerate() {
        let (x, y) = layout.position(index, span.parent_span_id.is_some());

        nodes.push(GraphNode {
            span_id: span.span_id.clone(),
            label: span.name.clone(),
            kind: span.kind.clone(),
            status: span.status,
            x,
            y,
        });

        if let Some(parent) = &span.parent_span_id {
            edges.push(GraphEdge {
                parent: parent.clone(),
                child: span.span_id.clone(),
                child_status: span.status,
            });
        }
    }

    SpanGraph { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(span_id: &str, parent: Option<&str>, start: f64, duration: f64) -> Span {
        serde_json::from_value(serde_json::json!({
            "span_id": span_id,
            "parent_span_id": parent,
            "name": span_id,
            "type": "generic",
            "status": "SUCCESS",
            "start_time": start,
            "duration": duration,
        }))
        .unwrap()
    }

    #[test]
    fn parent_child_pair_produces_exactly_one_edge() {
        let spans = vec![span("a", None, 0.0, 10.0), span("b", Some("a"), 10.0, 5.0)];

        let graph = project(&spans, &IndexLayout::default());

        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(
            graph.edges,
            vec![GraphEdge {
                parent: "a".to_string(),
                child: "b".to_string(),
                child_status: SpanStatus::Success,
            }]
        );
    }

    #[test]
    fn dangling_parent_emits_an_edge_without_a_node() {
        let spans = vec![span("orphan", Some("gone"), 0.0, 1.0)];

        let graph = project(&spans, &IndexLayout::default());

        assert_eq!(graph.edges.len(), 1);
        assert!(graph.node("gone").is_none());
        assert!(graph.node("orphan").is_some());
    }

    #[test]
    fn index_layout_offsets_children_and_descends_by_index() {
        let layout = IndexLayout {
            root_column: 10.0,
            child_column: 70.0,
            row_height: 12.0,
        };

        let spans = vec![
            span("root", None, 0.0, 3.0),
            span("child_a", Some("root"), 1.0, 1.0),
            span("child_b", Some("root"), 2.0, 1.0),
        ];

        let graph = project(&spans, &layout);

        assert_eq!((graph.nodes[0].x, graph.nodes[0].y), (10.0, 0.0));
        assert_eq!((graph.nodes[1].x, graph.nodes[1].y), (70.0, 12.0));
        assert_eq!((graph.nodes[2].x, graph.nodes[2].y), (70.0, 24.0));
    }
}
