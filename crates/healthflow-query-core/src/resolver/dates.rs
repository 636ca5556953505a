//! Appointment date-range extraction.
//!
//! Explicit ranges ("from jan 1 to jan 15", "2024-01-01 to 2024-01-31",
//! "01/01/2024 to 01/31/2024") win over relative phrases ("next week").
//! Relative phrases are anchored to a caller-supplied reference date.

use std::sync::LazyLock;

use chrono::{Datelike, Days, Months, NaiveDate};
use regex::Regex;

/// Inclusive date bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }
}

static FROM_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"from\s+(.+)$").expect("Invalid date regex"));
static APPOINTMENTS_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+appointments.*$").expect("Invalid date regex"));
static SLASH_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2}/\d{1,2}/\d{4})\s*(?:to|-|–)\s*(\d{1,2}/\d{1,2}/\d{4})")
        .expect("Invalid date regex")
});
static ISO_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{4}-\d{1,2}-\d{1,2})\s*(?:to|–)\s*(\d{4}-\d{1,2}-\d{1,2})")
        .expect("Invalid date regex")
});
static MONTH_DAY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z]+)\s+(\d{1,2})(?:,?\s+(\d{4}))?$").expect("Invalid date regex")
});
static DAY_MONTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})\s+([a-z]+)(?:\s+(\d{4}))?$").expect("Invalid date regex")
});
static SLASH_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})/(\d{1,2})(?:/(\d{4}))?$").expect("Invalid date regex")
});
static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").expect("Invalid date regex"));

static THIS_WEEK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"this week|week of").expect("Invalid date regex"));
static NEXT_WEEK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"next week").expect("Invalid date regex"));
static NEXT_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"next month").expect("Invalid date regex"));
static THIS_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"this month|month of").expect("Invalid date regex"));
static SEVEN_DAYS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b7 days?\b").expect("Invalid date regex"));
static THIRTY_DAYS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b30 days?\b").expect("Invalid date regex"));

/// Extract a date range from normalized text.
pub fn extract_date_range(text: &str, today: NaiveDate) -> Option<DateRange> {
    explicit_range(text, today.year()).or_else(|| relative_range(text, today))
}

/// Ranges spelled out by the user.
fn explicit_range(text: &str, default_year: i32) -> Option<DateRange> {
    if let Some(range) = from_to_range(text, default_year) {
        return Some(range);
    }

    if let Some(caps) = SLASH_RANGE.captures(text) {
        let start = parse_flexible_date(&caps[1], default_year);
        let end = parse_flexible_date(&caps[2], default_year);
        if let (Some(start), Some(end)) = (start, end) {
            return Some(DateRange::new(start, end));
        }
    }

    let caps = ISO_RANGE.captures(text)?;
    let start = parse_flexible_date(&caps[1], default_year)?;
    let end = parse_flexible_date(&caps[2], default_year)?;
    Some(DateRange::new(start, end))
}

/// "from <date> to <date> [appointments...]"
fn from_to_range(text: &str, default_year: i32) -> Option<DateRange> {
    let mut parts = text.split(" to ");
    let (before, after) = (parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let start_str = FROM_PREFIX.captures(before)?.get(1)?.as_str().trim();
    let end_str = APPOINTMENTS_SUFFIX.replace(after, "");

    let start = parse_flexible_date(start_str, default_year)?;
    let end = parse_flexible_date(end_str.trim(), default_year)?;
    Some(DateRange::new(start, end))
}

/// Parse "jan 5", "january 5 2024", "5 jan", "1/5", "1/5/2024" or "2024-01-05".
///
/// Dates without a year take `default_year`. Impossible calendar dates
/// (e.g. "feb 30") yield `None`.
pub fn parse_flexible_date(text: &str, default_year: i32) -> Option<NaiveDate> {
    let text = text.trim();

    if let Some(caps) = MONTH_DAY.captures(text) {
        let month = month_number(&caps[1])?;
        let day = caps[2].parse().ok()?;
        let year = year_or(caps.get(3).map(|m| m.as_str()), default_year)?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = DAY_MONTH.captures(text) {
        let day = caps[1].parse().ok()?;
        let month = month_number(&caps[2])?;
        let year = year_or(caps.get(3).map(|m| m.as_str()), default_year)?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Some(caps) = SLASH_DATE.captures(text) {
        let month = caps[1].parse().ok()?;
        let day = caps[2].parse().ok()?;
        let year = year_or(caps.get(3).map(|m| m.as_str()), default_year)?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    let caps = ISO_DATE.captures(text)?;
    NaiveDate::from_ymd_opt(caps[1].parse().ok()?, caps[2].parse().ok()?, caps[3].parse().ok()?)
}

fn year_or(year: Option<&str>, default_year: i32) -> Option<i32> {
    match year {
        Some(y) => y.parse().ok(),
        None => Some(default_year),
    }
}

fn month_number(name: &str) -> Option<u32> {
    let month = match name {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sep" | "sept" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Ranges relative to `today`. Weeks start on Sunday.
fn relative_range(text: &str, today: NaiveDate) -> Option<DateRange> {
    let days_since_sunday = u64::from(today.weekday().num_days_from_sunday());

    if THIS_WEEK.is_match(text) {
        let start = today.checked_sub_days(Days::new(days_since_sunday))?;
        return Some(DateRange::new(start, start.checked_add_days(Days::new(6))?));
    }
    if NEXT_WEEK.is_match(text) {
        let start = today.checked_add_days(Days::new(7 - days_since_sunday))?;
        return Some(DateRange::new(start, start.checked_add_days(Days::new(6))?));
    }
    if NEXT_MONTH.is_match(text) {
        let start = first_of_month(today)?.checked_add_months(Months::new(1))?;
        return Some(DateRange::new(start, last_of_month(start)?));
    }
    if THIS_MONTH.is_match(text) {
        let start = first_of_month(today)?;
        return Some(DateRange::new(start, last_of_month(start)?));
    }
    if SEVEN_DAYS.is_match(text) {
        return Some(DateRange::new(today, today.checked_add_days(Days::new(7))?));
    }
    if THIRTY_DAYS.is_match(text) {
        return Some(DateRange::new(today, today.checked_add_days(Days::new(30))?));
    }
    None
}

fn first_of_month(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)
}

fn last_of_month(first: NaiveDate) -> Option<NaiveDate> {
    first
        .checked_add_months(Months::new(1))?
        .checked_sub_days(Days::new(1))
}
