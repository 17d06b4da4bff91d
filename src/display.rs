//! Formatting helpers for terminal output.

use chrono::{DateTime, Local, Utc};
use std::fmt;

/// Rough size of a meal, used to tag calorie figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalorieLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl CalorieLevel {
    pub fn from_calories(calories: f64) -> Self {
        if calories < 200.0 {
            CalorieLevel::Low
        } else if calories < 400.0 {
            CalorieLevel::Moderate
        } else if calories < 600.0 {
            CalorieLevel::High
        } else {
            CalorieLevel::VeryHigh
        }
    }
}

impl fmt::Display for CalorieLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalorieLevel::Low => write!(f, "low"),
            CalorieLevel::Moderate => write!(f, "moderate"),
            CalorieLevel::High => write!(f, "high"),
            CalorieLevel::VeryHigh => write!(f, "very high"),
        }
    }
}

/// Integer with thousands separators: `12345` -> `"12,345"`.
pub fn format_number(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Calories rounded to a whole number: `1234.6` -> `"1,235 cal"`.
pub fn format_calories(calories: f64) -> String {
    format!("{} cal", format_number(calories.round() as i64))
}

/// Short local date: `"Jan 5, 2025"`.
pub fn format_date(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%b %-d, %Y")
        .to_string()
}

/// Relative age of `timestamp` as seen at `now`.
///
/// Falls back to the date once the record is 30 days old.
pub fn time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - timestamp).num_seconds();

    if seconds < 60 {
        "just now".to_string()
    } else if seconds < 3_600 {
        format!("{}m ago", seconds / 60)
    } else if seconds < 86_400 {
        format!("{}h ago", seconds / 3_600)
    } else if seconds < 2_592_000 {
        format!("{}d ago", seconds / 86_400)
    } else {
        format_date(timestamp)
    }
}
