// Date utility functions

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse an event timestamp in local time.
///
/// Accepts RFC 3339 (converted to local time), ISO-like naive timestamps
/// with a `T` or a space separator, and bare dates (midnight).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// Sunday on or before `date`
pub fn week_start_sunday(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

/// Saturday on or after `date`
pub fn week_end_saturday(date: NaiveDate) -> NaiveDate {
    date + Duration::days(6 - date.weekday().num_days_from_sunday() as i64)
}

/// Full Sunday-first weeks covering the month that contains `date`.
///
/// The first week holds the 1st of the month, the last week holds its
/// last day; leading and trailing days come from the adjacent months.
pub fn month_weeks(date: NaiveDate) -> Vec<[NaiveDate; 7]> {
    let start = week_start_sunday(first_of_month(date));
    let end = week_end_saturday(last_of_month(date));

    let mut weeks = Vec::with_capacity(6);
    let mut cursor = start;
    while cursor <= end {
        let week_start = cursor;
        weeks.push(std::array::from_fn(|i| week_start + Duration::days(i as i64)));
        cursor += Duration::days(7);
    }
    weeks
}

/// `Jan 05, 2026 (Mon)`
pub fn format_list_date(dt: &NaiveDateTime) -> String {
    dt.format("%b %d, %Y (%a)").to_string()
}

/// `09:30 AM`
pub fn format_list_time(dt: &NaiveDateTime) -> String {
    dt.format("%I:%M %p").to_string()
}
