//! Publish-date parsing and display formatting.
//!
//! Frontmatter dates are plain `YYYY-MM-DD` strings. They are parsed to
//! **12:00 UTC** on that calendar day so that shifting into any display zone
//! between UTC-12 and UTC+11 keeps the same calendar date. A date at
//! midnight UTC would show as the previous day for a reader west of
//! Greenwich.
//!
//! Validation is deliberately shallow: the month must be 1-12 and the day
//! 1-31, but the day is not checked against the month. `2021-02-31` is
//! accepted and rolls over arithmetically to 2021-03-03.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

/// Zone every date is displayed in, whatever the reader's locale.
pub const DEFAULT_TIME_ZONE: Tz = chrono_tz::Europe::Istanbul;

const MONTHS_TR: [&str; 12] = [
    "Ocak", "Şubat", "Mart", "Nisan", "Mayıs", "Haziran", "Temmuz", "Ağustos", "Eylül", "Ekim",
    "Kasım", "Aralık",
];

const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Parse a string starting with `YYYY-MM-DD` into noon UTC of that day.
///
/// Anything after the first ten characters is ignored, so full ISO
/// timestamps (`2024-06-01T08:30:00Z`) parse to the same instant as the bare
/// date. Returns `None` when the prefix does not match or a component is out
/// of range.
pub fn parse_publish_date(input: &str) -> Option<DateTime<Utc>> {
    let bytes = input.as_bytes();
    if bytes.len() < 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let year = parse_digits(&bytes[0..4])? as i32;
    let month = parse_digits(&bytes[5..7])?;
    let day = parse_digits(&bytes[8..10])?;

    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }

    // Start from the first of the month and add days so that
    // out-of-month days roll over instead of failing.
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let date = first.checked_add_signed(Duration::days(i64::from(day) - 1))?;
    let noon = date.and_hms_opt(12, 0, 0)?;
    Some(Utc.from_utc_datetime(&noon))
}

/// Parse a fixed-width run of ASCII digits. Signs and spaces are rejected.
fn parse_digits(digits: &[u8]) -> Option<u32> {
    digits.iter().try_fold(0u32, |acc, &b| {
        b.is_ascii_digit().then(|| acc * 10 + u32::from(b - b'0'))
    })
}

/// Sort key for an optional frontmatter date, in seconds since the epoch.
///
/// Missing and unparsable dates sort as the epoch itself, i.e. as the
/// oldest possible entry.
pub fn sort_timestamp(date: Option<&str>) -> i64 {
    date.and_then(parse_publish_date)
        .map(|d| d.timestamp())
        .unwrap_or(0)
}

/// Whether a locale tag selects Turkish formatting: any tag starting with
/// `tr`, case-insensitively (`tr`, `tr-TR`, `tr_CY`, `trv`).
pub fn is_turkish_locale(locale: &str) -> bool {
    locale.to_ascii_lowercase().starts_with("tr")
}

/// Format a date as `day month-name year` for the given locale.
///
/// Turkish locales render `1 Haziran 2024`; every other locale falls back to
/// US English, `June 1, 2024`. The calendar day is taken in `zone`, not in
/// the caller's locale.
pub fn format_date(date: DateTime<Utc>, locale: &str, zone: Tz) -> String {
    let local = date.with_timezone(&zone);
    let month_index = local.month0() as usize;
    if is_turkish_locale(locale) {
        format!("{} {} {}", local.day(), MONTHS_TR[month_index], local.year())
    } else {
        format!("{} {}, {}", MONTHS_EN[month_index], local.day(), local.year())
    }
}

/// Parse and format a frontmatter date in one step.
pub fn format_publish_date(input: &str, locale: &str, zone: Tz) -> Option<String> {
    parse_publish_date(input).map(|d| format_date(d, locale, zone))
}
