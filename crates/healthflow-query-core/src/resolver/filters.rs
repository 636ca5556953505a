//! Filter extraction: structured query parameters pulled out of free text.
//!
//! Runs on the normalized query regardless of which intent matched. Each
//! category is independent; inside a category the first matching rule wins.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::models::{FilterKey, Filters};

use super::dates::extract_date_range;

/// One keyword rule inside a categorical filter.
struct ValueRule {
    regex: Regex,
    value: &'static str,
}

/// A categorical filter: rules in priority order.
struct CategoryRule {
    key: FilterKey,
    rules: Vec<ValueRule>,
}

fn value(regex_str: &str, value: &'static str) -> ValueRule {
    ValueRule {
        regex: Regex::new(regex_str).expect("Invalid filter regex pattern"),
        value,
    }
}

static CATEGORY_RULES: LazyLock<Vec<CategoryRule>> = LazyLock::new(|| {
    vec![
        CategoryRule {
            key: FilterKey::Status,
            rules: vec![
                value(r"\b(?:critical|alert|urgent)\b", "Critical"),
                value(r"\b(?:inactive|discharged)\b", "Inactive"),
                value(r"\b(?:active|ongoing)\b", "Active"),
            ],
        },
        CategoryRule {
            key: FilterKey::HivStatus,
            rules: vec![
                value(r"\bnegative\b|\bhiv\s*-|\buninfected\b", "Negative"),
                value(r"\bpositive\b|\bhiv\s*\+|\bconfirmed\b", "Positive"),
            ],
        },
        CategoryRule {
            key: FilterKey::Condition,
            rules: vec![
                value(r"\bcancer", "Cancer"),
                value(r"\btuberculosis\b|\btb\b", "TB"),
                value(r"\bdiabet|\bt2dm\b|\bdm\b|\btype 2\b", "Diabetes"),
                value(r"\bhypertension\b|\bhigh blood pressure\b|\bhbp\b", "Hypertension"),
                value(r"\bhiv\b|\baids\b", "HIV"),
            ],
        },
        CategoryRule {
            key: FilterKey::ViralLoadStatus,
            rules: vec![
                value(r"\bundetectable\b", "Undetectable"),
                value(r"\bdetectable\b", "Detectable"),
            ],
        },
        CategoryRule {
            key: FilterKey::Gender,
            rules: vec![
                value(r"\b(?:female|women|girls)\b", "F"),
                value(r"\b(?:male|men|boys)\b", "M"),
            ],
        },
        CategoryRule {
            key: FilterKey::AppointmentMissed,
            rules: vec![value(r"\b(?:missed|overdue|past)\b", "true")],
        },
    ]
});

static PATIENT_NO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bpatients?\s*(?:no\.?|number|#)?\s*([a-z]*\d{3,})(?:\s|$)")
        .expect("Invalid filter regex pattern")
});

static MIN_AGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:age|aged|over|above|older than)\s*(\d+)").expect("Invalid filter regex pattern")
});

static PROVIDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:doctor|dr\.?|nurse|provider|staff|clinician)\s+([a-z]+)")
        .expect("Invalid filter regex pattern")
});

/// Words that follow a role title but are not names.
const NOT_A_NAME: &[&str] = &[
    "a", "an", "and", "at", "for", "in", "next", "on", "the", "this", "to", "visits", "with",
];

/// Extract every recognised filter from normalized text.
///
/// `today` anchors relative date phrases. The result only ever contains
/// keys from [`FilterKey`].
pub fn extract_filters(text: &str, today: NaiveDate) -> Filters {
    let mut filters = Filters::new();

    if let Some(patient_no) = extract_patient_no(text) {
        filters.insert(FilterKey::PatientNo, patient_no);
    }

    for category in CATEGORY_RULES.iter() {
        if let Some(rule) = category.rules.iter().find(|r| r.regex.is_match(text)) {
            filters.insert(category.key, rule.value.to_string());
        }
    }

    if let Some(min_age) = extract_min_age(text) {
        filters.insert(FilterKey::MinAge, min_age.to_string());
    }

    if let Some(provider) = extract_provider(text) {
        filters.insert(FilterKey::ProviderName, provider);
    }

    if let Some(range) = extract_date_range(text, today) {
        filters.insert(FilterKey::StartDate, range.start.to_string());
        filters.insert(FilterKey::EndDate, range.end.to_string());
    }

    filters
}

/// Patient number following "patient"; bare numbers become `PAT` + 4 digits.
fn extract_patient_no(text: &str) -> Option<String> {
    let id = PATIENT_NO.captures(text)?.get(1)?.as_str();
    if id.chars().all(|c| c.is_ascii_digit()) {
        Some(format!("PAT{:0>4}", id))
    } else {
        Some(id.to_uppercase())
    }
}

/// Minimum age; a number too large to parse leaves the filter unset.
fn extract_min_age(text: &str) -> Option<u32> {
    MIN_AGE.captures(text)?.get(1)?.as_str().parse().ok()
}

fn extract_provider(text: &str) -> Option<String> {
    let name = PROVIDER.captures(text)?.get(1)?.as_str();
    if NOT_A_NAME.contains(&name) {
        return None;
    }

    let mut chars = name.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().chain(chars).collect())
}
