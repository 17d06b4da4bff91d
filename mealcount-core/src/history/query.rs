//! Read-only queries and aggregations over a slice of meal records.
//!
//! Records are expected most-recent-first, which is the order the history
//! keeps them in; "first seen" below refers to that order.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use std::collections::{BTreeMap, HashMap};

use crate::models::{DailyCalories, MealRecord, MealStats};

/// Number of days kept in the per-day rollup of [`compute_stats`].
pub const DAILY_ROLLUP_DAYS: usize = 7;

pub fn compute_stats(records: &[MealRecord]) -> MealStats {
    if records.is_empty() {
        return MealStats::default();
    }

    let total_meals = records.len();
    let total_calories: f64 = records.iter().map(|r| r.total_calories).sum();

    MealStats {
        total_meals,
        total_calories,
        average_calories_per_meal: total_calories / total_meals as f64,
        most_popular_dish: most_popular_dish(records),
        calories_by_day: calories_by_day(records, DAILY_ROLLUP_DAYS),
    }
}

/// Dish with the most records.
///
/// On equal counts the dish seen first wins. Empty string for no records.
pub fn most_popular_dish(records: &[MealRecord]) -> String {
    let mut best: Option<(&str, usize)> = None;
    for (name, count) in meal_count_by_dish(records) {
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((name, count));
        }
    }
    best.map(|(name, _)| name.to_string()).unwrap_or_default()
}

/// Calories summed per local calendar day, newest day first, at most
/// `limit` days.
pub fn calories_by_day(records: &[MealRecord], limit: usize) -> Vec<DailyCalories> {
    let mut days: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for record in records {
        *days.entry(record.local_date()).or_insert(0.0) += record.total_calories;
    }

    days.into_iter()
        .rev()
        .take(limit)
        .map(|(date, calories)| DailyCalories { date, calories })
        .collect()
}

/// Records whose timestamp lies in `[start, end]`.
pub fn in_range<'a>(
    records: &'a [MealRecord],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<&'a MealRecord> {
    records
        .iter()
        .filter(|r| r.timestamp >= start && r.timestamp <= end)
        .collect()
}

/// Case-insensitive substring match on the dish name.
pub fn search<'a>(records: &'a [MealRecord], query: &str) -> Vec<&'a MealRecord> {
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|r| r.dish_name.to_lowercase().contains(&needle))
        .collect()
}

/// Distinct dish names in first-seen order.
pub fn unique_dishes(records: &[MealRecord]) -> Vec<&str> {
    group_by_dish(records, (), |_, _| ())
        .into_iter()
        .map(|(name, _)| name)
        .collect()
}

pub fn meal_count_by_dish(records: &[MealRecord]) -> Vec<(&str, usize)> {
    group_by_dish(records, 0, |count, _| count + 1)
}

pub fn total_calories_by_dish(records: &[MealRecord]) -> Vec<(&str, f64)> {
    group_by_dish(records, 0.0, |sum, r| sum + r.total_calories)
}

fn group_by_dish<T, F>(records: &[MealRecord], init: T, mut fold: F) -> Vec<(&str, T)>
where
    T: Copy,
    F: FnMut(T, &MealRecord) -> T,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, T)> = Vec::new();

    for record in records {
        let slot = *index.entry(record.dish_name.as_str()).or_insert_with(|| {
            groups.push((record.dish_name.as_str(), init));
            groups.len() - 1
        });
        groups[slot].1 = fold(groups[slot].1, record);
    }

    groups
}

/// Local midnight at the start of `date`, in UTC.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}

/// Instants spanning the local days `first..=last`.
pub fn days_span(first: NaiveDate, last: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let end = match last.succ_opt() {
        Some(next) => start_of_day(next) - Duration::nanoseconds(1),
        None => DateTime::<Utc>::MAX_UTC,
    };
    (start_of_day(first), end)
}

/// Sunday through Saturday of the week containing `date`.
pub fn week_of(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date - Duration::days(date.weekday().num_days_from_sunday() as i64);
    (first, first + Duration::days(6))
}

/// First and last day of the calendar month containing `date`.
pub fn month_of(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let next_month = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };
    let last = next_month.and_then(|d| d.pred_opt()).unwrap_or(date);
    (first, last)
}
