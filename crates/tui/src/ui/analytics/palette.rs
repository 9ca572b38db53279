use ratatui::style::Color;

/// Aggregates palette references for the analytics tab.
#[derive(Clone, Copy)]
pub(crate) struct PaletteBundle {
    pub(crate) stat: &'static StatPalette,
    pub(crate) latency: &'static LatencyPalette,
    pub(crate) trend: &'static TrendPalette,
}

impl PaletteBundle {
    pub(crate) fn new() -> Self {
        Self {
            stat: &STAT_PALETTE,
            latency: &LATENCY_PALETTE,
            trend: &TREND_PALETTE,
        }
    }
}

impl Default for PaletteBundle {
    fn default() -> Self {
        Self::new()
    }
}

/// Colors for the error-rate stat panel.
pub(crate) struct StatPalette {
    pub(crate) border: Color,
    pub(crate) title: Color,
    pub(crate) label: Color,
    pub(crate) ok: Color,
    pub(crate) warn: Color,
    pub(crate) bad: Color,
}

/// Colors for the latency-by-kind table.
pub(crate) struct LatencyPalette {
    pub(crate) border: Color,
    pub(crate) title: Color,
    pub(crate) label: Color,
}

/// Colors for the daily token trend chart.
pub(crate) struct TrendPalette {
    pub(crate) border: Color,
    pub(crate) title: Color,
    pub(crate) axis: Color,
    pub(crate) series: Color,
}

pub(crate) const STAT_PALETTE: StatPalette = StatPalette {
    border: Color::Rgb(150, 95, 110),
    title: Color::Rgb(245, 185, 200),
    label: Color::Rgb(140, 148, 164),
    ok: Color::Rgb(120, 210, 160),
    warn: Color::Rgb(255, 205, 95),
    bad: Color::Rgb(240, 100, 130),
};

pub(crate) const LATENCY_PALETTE: LatencyPalette = LatencyPalette {
    border: Color::Rgb(85, 130, 160),
    title: Color::Rgb(165, 215, 245),
    label: Color::Rgb(214, 220, 232),
};

pub(crate) const TREND_PALETTE: TrendPalette = TrendPalette {
    border: Color::Rgb(110, 95, 160),
    title: Color::Rgb(200, 180, 250),
    axis: Color::Rgb(130, 115, 165),
    series: Color::Rgb(165, 115, 250),
};
