//! Goal entries and their lifecycle states.
//!
//! Progress is numeric (`measurableTarget` / `measurableProgress`). Goals
//! written before numeric tracking carry a free-text `measurable` field; those
//! are migrated when read, so the rest of the crate only sees one shape.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::lenient;
use crate::records::Record;
use crate::store::Bucket;
use crate::time::Timestamp;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
}

/// Case-insensitive; anything but "completed" reads as active.
impl<'de> Deserialize<'de> for GoalStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = lenient::text(deserializer)?;
        Ok(if raw.trim().eq_ignore_ascii_case("completed") {
            GoalStatus::Completed
        } else {
            GoalStatus::Active
        })
    }
}

/// Display bucket derived from status and target date; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GoalTriage {
    Active,
    Completed,
    NotAchieved,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "GoalWire")]
pub struct GoalEntry {
    pub id: String,
    pub title: String,
    pub measurable_unit: String,
    pub measurable_target: f64,
    pub measurable_progress: f64,
    pub achievable: String,
    pub relevant: String,
    /// Snapshot of the values exercise at creation; not a live reference.
    pub relevant_values: Vec<String>,
    #[serde(serialize_with = "opt_day")]
    pub target_date: Option<NaiveDate>,
    pub status: GoalStatus,
    pub created_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reflection: Option<String>,
}

impl GoalEntry {
    pub fn new(id: impl Into<String>, title: impl Into<String>, created_at: Timestamp) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            measurable_unit: String::new(),
            measurable_target: 1.0,
            measurable_progress: 0.0,
            achievable: String::new(),
            relevant: String::new(),
            relevant_values: Vec::new(),
            target_date: None,
            status: GoalStatus::Active,
            created_at,
            reflection: None,
        }
    }

    pub fn with_measure(mut self, unit: impl Into<String>, target: f64) -> Self {
        self.measurable_unit = unit.into();
        self.measurable_target = target.max(0.0);
        self
    }

    pub fn with_target_date(mut self, day: NaiveDate) -> Self {
        self.target_date = Some(day);
        self
    }

    pub fn with_values(mut self, values: Vec<String>) -> Self {
        self.relevant_values = values;
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == GoalStatus::Completed
    }

    /// Fraction of the target reached, clamped to 0..=1.
    pub fn progress_ratio(&self) -> f64 {
        if self.measurable_target <= 0.0 {
            return if self.is_completed() { 1.0 } else { 0.0 };
        }
        (self.measurable_progress / self.measurable_target).clamp(0.0, 1.0)
    }

    pub fn triage(&self, today: NaiveDate) -> GoalTriage {
        if self.is_completed() {
            return GoalTriage::Completed;
        }
        match self.target_date {
            Some(day) if day < today => GoalTriage::NotAchieved,
            _ => GoalTriage::Active,
        }
    }
}

impl Record for GoalEntry {
    const BUCKET: Bucket = Bucket::Goals;

    fn timestamp(&self) -> Timestamp {
        self.created_at
    }
}

/// Every shape a stored goal has had.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoalWire {
    #[serde(default, deserialize_with = "lenient::text")]
    id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    title: String,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    measurable: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    measurable_unit: String,
    #[serde(default)]
    measurable_target: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient::number")]
    measurable_progress: f64,
    #[serde(default, deserialize_with = "lenient::text")]
    achievable: String,
    #[serde(default, deserialize_with = "lenient::text")]
    relevant: String,
    #[serde(default, deserialize_with = "lenient::list")]
    relevant_values: Vec<String>,
    #[serde(default, deserialize_with = "lenient::opt_date")]
    target_date: Option<NaiveDate>,
    #[serde(default)]
    status: GoalStatus,
    #[serde(default, alias = "date")]
    created_at: Option<Timestamp>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    reflection: Option<String>,
}

impl TryFrom<GoalWire> for GoalEntry {
    type Error = String;

    fn try_from(w: GoalWire) -> Result<Self, Self::Error> {
        let created_at = w
            .created_at
            .ok_or_else(|| format!("goal '{}' has no createdAt", w.id))?;

        let numeric_target = w.measurable_target.as_ref().and_then(|v| match v {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(lenient::parse_amount(s)),
            _ => None,
        });

        let (unit, target, progress) = match (numeric_target, w.measurable) {
            (Some(target), _) => (w.measurable_unit, target.max(0.0), w.measurable_progress.max(0.0)),
            // legacy free-text measure: a single done/not-done step
            (None, Some(text)) => {
                let done = if w.status == GoalStatus::Completed { 1.0 } else { 0.0 };
                (text, 1.0, done)
            }
            (None, None) => (w.measurable_unit, 1.0, w.measurable_progress.max(0.0)),
        };

        Ok(GoalEntry {
            id: w.id,
            title: w.title,
            measurable_unit: unit,
            measurable_target: target,
            measurable_progress: progress,
            achievable: w.achievable,
            relevant: w.relevant,
            relevant_values: w.relevant_values,
            target_date: w.target_date,
            status: w.status,
            created_at,
            reflection: w.reflection,
        })
    }
}

/// `YYYY-MM-DD` or empty string, as written by date inputs.
fn opt_day<S: serde::Serializer>(day: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
    match day {
        Some(d) => s.serialize_str(&d.format("%Y-%m-%d").to_string()),
        None => s.serialize_str(""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_numeric_goal_round_trips() {
        let g = GoalEntry::new("g1", "Walk daily", Timestamp::parse("2024-02-01").unwrap())
            .with_measure("walks", 30.0)
            .with_target_date(day(2024, 3, 1));
        let json = serde_json::to_string(&g).unwrap();
        assert!(json.contains("\"measurableTarget\":30.0"));
        assert!(json.contains("\"targetDate\":\"2024-03-01\""));

        let back: GoalEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, g);
    }

    #[test]
    fn test_legacy_measurable_is_migrated() {
        let json = r#"{"id":"1700000000000","title":"Call mom","measurable":"call once a week",
            "status":"completed","targetDate":"","createdAt":"2023-11-14T22:13:20.000Z"}"#;
        let g: GoalEntry = serde_json::from_str(json).unwrap();
        assert_eq!(g.measurable_unit, "call once a week");
        assert_eq!(g.measurable_target, 1.0);
        assert_eq!(g.measurable_progress, 1.0);
        assert_eq!(g.target_date, None);
        assert!(g.is_completed());
    }

    #[test]
    fn test_status_is_case_insensitive() {
        let json = r#"{"id":"old","title":"Quit","status":"Completed","createdAt":"2024-01-01T00:00:00Z",
            "relevantValues":"Health"}"#;
        let g: GoalEntry = serde_json::from_str(json).unwrap();
        assert!(g.is_completed());
        assert_eq!(g.relevant_values, vec!["Health"]);

        for raw in [r#""ACTIVE""#, r#""paused""#, "null", "3"] {
            assert_eq!(serde_json::from_str::<GoalStatus>(raw).unwrap(), GoalStatus::Active);
        }
        assert_eq!(serde_json::to_string(&GoalStatus::Completed).unwrap(), r#""completed""#);
    }

    #[test]
    fn test_goal_without_created_at_is_rejected() {
        assert!(serde_json::from_str::<GoalEntry>(r#"{"id":"x","title":"t"}"#).is_err());
    }

    #[test]
    fn test_triage_buckets() {
        let today = day(2024, 6, 10);
        let mut g = GoalEntry::new("g", "t", Timestamp::parse("2024-06-01").unwrap());
        assert_eq!(g.triage(today), GoalTriage::Active);

        g.target_date = Some(day(2024, 6, 9));
        assert_eq!(g.triage(today), GoalTriage::NotAchieved);

        g.target_date = Some(today);
        assert_eq!(g.triage(today), GoalTriage::Active);

        g.status = GoalStatus::Completed;
        g.target_date = Some(day(2024, 1, 1));
        assert_eq!(g.triage(today), GoalTriage::Completed);
    }

    #[test]
    fn test_progress_ratio_clamps() {
        let mut g = GoalEntry::new("g", "t", Timestamp::parse("2024-06-01").unwrap()).with_measure("km", 10.0);
        g.measurable_progress = 4.0;
        assert_eq!(g.progress_ratio(), 0.4);
        g.measurable_progress = 14.0;
        assert_eq!(g.progress_ratio(), 1.0);
    }
}
