use chrono::{DateTime, Local, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::calorie::CalorieResponse;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 9;

/// A meal record is one logged calorie calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealRecord {
    pub id: String,
    pub dish_name: String,
    pub servings: f64,
    pub calories_per_serving: f64,
    pub total_calories: f64,
    pub timestamp: DateTime<Utc>,
    pub source: String,
}

impl MealRecord {
    /// Creates a record from lookup figures, stamping a fresh id and the
    /// current time.
    ///
    /// `total_calories` is taken as `calories_per_serving * servings` when
    /// the supplied total disagrees with it.
    pub fn new(entry: CalorieResponse) -> Self {
        let total_calories = if entry.is_consistent() {
            entry.total_calories
        } else {
            tracing::warn!(
                dish = %entry.dish_name,
                reported = entry.total_calories,
                expected = entry.expected_total(),
                "total calories disagree with per-serving figure, using product"
            );
            entry.expected_total()
        };

        Self {
            id: generate_record_id(),
            dish_name: entry.dish_name,
            servings: entry.servings,
            calories_per_serving: entry.calories_per_serving,
            total_calories,
            timestamp: Utc::now(),
            source: entry.source,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Calendar date of the record in the local time zone.
    pub fn local_date(&self) -> NaiveDate {
        self.timestamp.with_timezone(&Local).date_naive()
    }
}

impl fmt::Display for MealRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.dish_name)?;
        writeln!(f, "{}", "=".repeat(30))?;
        writeln!(f, "Servings: {}", self.servings)?;
        writeln!(f, "Calories per serving: {}", self.calories_per_serving)?;
        writeln!(f, "Total calories: {}", self.total_calories)?;
        writeln!(f, "Source: {}", self.source)?;
        write!(
            f,
            "Recorded: {}",
            self.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        )
    }
}

/// Generates `<unix millis>-<9 base-36 chars>`.
pub fn generate_record_id() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("{}-{}", Utc::now().timestamp_millis(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    fn salmon() -> CalorieResponse {
        CalorieResponse {
            dish_name: "Salmon Fillet".to_string(),
            servings: 1.5,
            calories_per_serving: 280.0,
            total_calories: 420.0,
            source: "USDA".to_string(),
        }
    }

    #[test]
    fn test_new_record() {
        let before = Utc::now();
        let record = MealRecord::new(salmon());

        assert_eq!(record.dish_name, "Salmon Fillet");
        assert_eq!(record.total_calories, 420.0);
        assert_eq!(record.source, "USDA");
        assert!(record.timestamp >= before);
        assert!(!record.id.is_empty());
    }

    #[test]
    fn test_new_record_normalises_inconsistent_total() {
        let mut entry = salmon();
        entry.total_calories = 999.0;

        let record = MealRecord::new(entry);
        assert_eq!(record.total_calories, 420.0);
    }

    #[test]
    fn test_id_format() {
        let id = generate_record_id();
        let (millis, suffix) = id.split_once('-').unwrap();

        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(suffix.len(), ID_SUFFIX_LEN);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<String> = (0..500).map(|_| generate_record_id()).collect();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn test_local_date() {
        let local = Local.with_ymd_and_hms(2025, 3, 9, 23, 30, 0).unwrap();
        let record = MealRecord::new(salmon()).with_timestamp(local.with_timezone(&Utc));

        assert_eq!(
            record.local_date(),
            NaiveDate::from_ymd_opt(2025, 3, 9).unwrap()
        );
    }

    #[test]
    fn test_json_roundtrip_uses_snake_case() {
        let record = MealRecord::new(salmon()).with_id("1700000000000-abc123xyz");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["dish_name"], "Salmon Fillet");
        assert_eq!(json["calories_per_serving"], 280.0);

        let parsed: MealRecord = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_parses_browser_timestamp() {
        let json = r#"{
            "id": "1700000000000-abc123xyz",
            "dish_name": "Pancakes",
            "servings": 2,
            "calories_per_serving": 227,
            "total_calories": 454,
            "timestamp": "2024-11-14T22:13:20.000Z",
            "source": "api"
        }"#;

        let record: MealRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.servings, 2.0);
        assert_eq!(
            record.timestamp,
            Utc.with_ymd_and_hms(2024, 11, 14, 22, 13, 20).unwrap()
        );
    }

    #[test]
    fn test_display() {
        let output = format!("{}", MealRecord::new(salmon()));
        assert!(output.contains("Salmon Fillet"));
        assert!(output.contains("Total calories: 420"));
        assert!(output.contains("Source: USDA"));
    }
}
