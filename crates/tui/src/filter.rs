use api::DateFilter;
use time::{Date, Duration, OffsetDateTime, format_description::FormatItem, macros::format_description};

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Quick date ranges cycled with the filter key. The analytics endpoint
/// takes plain ISO dates, so each preset materializes into a [`DateFilter`]
/// relative to today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum FilterPreset {
    #[default]
    All,
    Today,
    LastSevenDays,
    LastThirtyDays,
}

impl FilterPreset {
    pub(crate) fn next(self) -> Self {
        match self {
            FilterPreset::All => FilterPreset::Today,
            FilterPreset::Today => FilterPreset::LastSevenDays,
            FilterPreset::LastSevenDays => FilterPreset::LastThirtyDays,
            FilterPreset::LastThirtyDays => FilterPreset::All,
        }
    }

    pub(crate) fn to_filter(self) -> DateFilter {
        self.range_from(OffsetDateTime::now_utc().date())
    }

    pub(crate) fn range_from(self, today: Date) -> DateFilter {
        let days_back = match self {
            FilterPreset::All => return DateFilter::default(),
            FilterPreset::Today => 0,
            FilterPreset::LastSevenDays => 7,
            FilterPreset::LastThirtyDays => 30,
        };

        let start = today.checked_sub(Duration::days(days_back)).unwrap_or(today);

        DateFilter {
            start: Some(format_date(start)),
            end: Some(format_date(today)),
        }
    }
}

/// Short human label for whatever filter is active, preset or not.
pub(crate) fn describe(filter: &DateFilter) -> String {
    match (filter.start.as_deref(), filter.end.as_deref()) {
        (None, None) => "all time".to_string(),
        (Some(start), Some(end)) if start == end => start.to_string(),
        (Some(start), Some(end)) => format!("{start} to {end}"),
        (Some(start), None) => format!("from {start}"),
        (None, Some(end)) => format!("until {end}"),
    }
}

fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT).unwrap_or_else(|_| date.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn presets_cycle_back_to_all() {
        let mut preset = FilterPreset::All;
        for _ in 0..4 {
            preset = preset.next();
        }
        assert_eq!(preset, FilterPreset::All);
    }

    #[test]
    fn all_time_is_an_empty_filter() {
        assert!(FilterPreset::All.range_from(date!(2024 - 01 - 31)).is_empty());
    }

    #[test]
    fn today_pins_both_bounds_to_today() {
        let filter = FilterPreset::Today.range_from(date!(2024 - 01 - 31));

        assert_eq!(filter.start.as_deref(), Some("2024-01-31"));
        assert_eq!(filter.end.as_deref(), Some("2024-01-31"));
    }

    #[test]
    fn seven_day_window_crosses_month_boundaries() {
        let filter = FilterPreset::LastSevenDays.range_from(date!(2024 - 03 - 03));

        assert_eq!(filter.start.as_deref(), Some("2024-02-25"));
        assert_eq!(filter.end.as_deref(), Some("2024-03-03"));
    }

    #[test]
    fn describes_ranges_compactly() {
        assert_eq!(describe(&DateFilter::default()), "all time");

        let range = DateFilter {
            start: Some("2024-01-01".to_string()),
            end: Some("2024-01-31".to_string()),
        };
        assert_eq!(describe(&range), "2024-01-01 to 2024-01-31");

        let single = DateFilter {
            start: Some("2024-01-31".to_string()),
            end: Some("2024-01-31".to_string()),
        };
        assert_eq!(describe(&single), "2024-01-31");
    }
}
