use chrono::{DateTime, NaiveDate, Utc};

/// Placeholder shown when a trip has no dates at all.
pub const EMPTY_DATE_RANGE: &str = "—";

/// Locale-stable trip date format, e.g. `Tue 02 Dec 2025`.
const TRIP_DATE_FORMAT: &str = "%a %d %b %Y";

/// Source of "now" for anything that stamps or checks expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Parses a `YYYY-MM-DD` calendar date. Anything else is `None`.
pub fn parse_ymd(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Formats a trip's date range for display.
///
/// Inputs are `YYYY-MM-DD` strings; unparseable values count as missing.
pub fn format_date_range(start: Option<&str>, end: Option<&str>) -> String {
    let start = start.and_then(parse_ymd);
    let end = end.and_then(parse_ymd);
    let fmt = |d: NaiveDate| d.format(TRIP_DATE_FORMAT).to_string();

    match (start, end) {
        (Some(s), Some(e)) => format!("{} → {}", fmt(s), fmt(e)),
        (Some(s), None) => fmt(s),
        (None, Some(e)) => fmt(e),
        (None, None) => EMPTY_DATE_RANGE.to_string(),
    }
}
