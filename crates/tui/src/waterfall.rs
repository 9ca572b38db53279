use api::{Span, SpanKind, SpanStatus};

/// Visibility floor for a bar, in percent of the trace width. Keeps
/// zero-duration and sub-resolution spans on screen.
pub(crate) const MIN_WIDTH_PERCENT: f64 = 0.5;

/// One horizontal bar of the waterfall, positioned in percent of the full
/// trace duration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WaterfallRow {
    pub(crate) span_id: String,
    pub(crate) name: String,
    pub(crate) kind: SpanKind,
    pub(crate) status: SpanStatus,
    pub(crate) left_percent: f64,
    pub(crate) width_percent: f64,
    pub(crate) duration_seconds: f64,
}

/// Project a flat span set into waterfall rows sorted by start time.
///
/// Bounds are the earliest start and the latest end over the whole set; an
/// unfinished span contributes its start time as its end. When every span
/// collapses onto a single instant there is no duration to divide by, so
/// all bars render full-width at offset zero instead of producing NaN.
pub(crate) fn project(spans: &[Span]) -> Vec<WaterfallRow> {
    if spans.is_empty() {
        return Vec::new();
    }

    let start = spans.iter().map(|span| span.start_time).fold(f64::INFINITY, f64::min);
    let end = spans.iter().map(Span::end_seconds).fold(f64::NEG_INFINITY, f64::max);
    let total = end - start;

    let mut ordered: Vec<&Span> = spans.iter().collect();
    // Stable sort: spans sharing a start time keep their wire order.
    ordered.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

    ordered
        .into_iter()
        .map(|span| {
            let duration = span.duration_seconds();

            let (left_percent, width_percent) = if total > 0.0 {
                let left = (span.start_time - start) / total * 100.0;
                let width = (duration / total * 100.0).max(MIN_WIDTH_PERCENT);
                (left, width)
            } else {
                (0.0, 100.0)
            };

            WaterfallRow {
                span_id: span.span_id.clone(),
                name: span.name.clone(),
                kind: span.kind.clone(),
                status: span.status,
                left_percent,
                width_percent,
                duration_seconds: duration,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(span_id: &str, start: f64, duration: Option<f64>) -> Span {
        serde_json::from_value(serde_json::json!({
            "span_id": span_id,
            "name": span_id,
            "type": "generic",
            "status": "SUCCESS",
            "start_time": start,
            "duration": duration,
        }))
        .unwrap()
    }

    #[test]
    fn bars_stay_within_bounds_with_visible_minimum() {
        let spans = vec![
            span("a", 0.0, Some(10.0)),
            span("b", 4.0, Some(0.0)),
            span("c", 9.5, Some(0.5)),
            span("d", 2.0, None),
        ];

        let rows = project(&spans);

        for row in &rows {
            assert!(
                (0.0..=100.0).contains(&row.left_percent),
                "left_percent out of range for {}: {}",
                row.span_id,
                row.left_percent
            );
            assert!(
                row.width_percent >= MIN_WIDTH_PERCENT,
                "width below floor for {}: {}",
                row.span_id,
                row.width_percent
            );
        }
    }

    #[test]
    fn rows_are_sorted_by_start_time_with_stable_ties() {
        let spans = vec![
            span("late", 8.0, Some(1.0)),
            span("tie_first", 2.0, Some(1.0)),
            span("tie_second", 2.0, Some(1.0)),
            span("early", 0.0, Some(1.0)),
        ];

        let rows = project(&spans);
        let order: Vec<&str> = rows.iter().map(|row| row.span_id.as_str()).collect();

        assert_eq!(order, vec!["early", "tie_first", "tie_second", "late"]);

        for pair in rows.windows(2) {
            assert!(pair[0].left_percent <= pair[1].left_percent);
        }
    }

    #[test]
    fn simultaneous_spans_yield_a_defined_layout() {
        let spans = vec![span("a", 5.0, Some(0.0)), span("b", 5.0, Some(0.0))];

        let rows = project(&spans);

        for row in &rows {
            assert!(row.left_percent.is_finite());
            assert!(row.width_percent.is_finite());
            assert_eq!(row.left_percent, 0.0);
            assert_eq!(row.width_percent, 100.0);
        }
    }

    #[test]
    fn zero_duration_span_keeps_the_floor_width() {
        let spans = vec![span("long", 0.0, Some(100.0)), span("blip", 50.0, Some(0.0))];

        let rows = project(&spans);
        let blip = rows.iter().find(|row| row.span_id == "blip").unwrap();

        assert_eq!(blip.left_percent, 50.0);
        assert_eq!(blip.width_percent, MIN_WIDTH_PERCENT);
    }

    #[test]
    fn missing_duration_falls_back_to_time_bounds() {
        let finished: Span = serde_json::from_value(serde_json::json!({
            "span_id": "s",
            "name": "s",
            "type": "db",
            "status": "SUCCESS",
            "start_time": 0.0,
            "end_time": 4.0,
        }))
        .unwrap();

        let rows = project(&[finished, span("tail", 4.0, Some(4.0))]);

        assert_eq!(rows[0].width_percent, 50.0);
        assert_eq!(rows[0].duration_seconds, 4.0);
    }

    #[test]
    fn empty_input_projects_to_nothing() {
        assert!(project(&[]).is_empty());
    }
}
