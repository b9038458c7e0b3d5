//! Per-tool record types, as stored in their buckets.
//!
//! Field names are the persisted contract (camelCase JSON). Every optional or
//! form-entered field is defaulted so older or partial records still load.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::lenient;
use crate::store::Bucket;
use crate::time::Timestamp;

/// A timestamped entry living in a list-shaped bucket.
pub trait Record: Serialize + DeserializeOwned {
    const BUCKET: Bucket;

    /// The instant that represents this record in feeds and streaks.
    fn timestamp(&self) -> Timestamp;
}

macro_rules! dated_record {
    ($ty:ty, $bucket:expr) => {
        impl Record for $ty {
            const BUCKET: Bucket = $bucket;

            fn timestamp(&self) -> Timestamp {
                self.date
            }
        }
    };
}

// ============================================================================
// Journal
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub date: Timestamp,
    #[serde(default)]
    pub data: JournalData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JournalData {
    #[serde(default, deserialize_with = "lenient::text")]
    pub feeling: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub substance: String,
    #[serde(default, deserialize_with = "lenient::opt_text", skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub amount: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub unit: String,
    /// Free text as typed; see [`JournalEntry::cost_amount`].
    #[serde(default, deserialize_with = "lenient::opt_text", skip_serializing_if = "Option::is_none")]
    pub cost: Option<String>,
}

impl JournalEntry {
    pub fn new(date: Timestamp, feeling: impl Into<String>) -> Self {
        Self {
            date,
            data: JournalData {
                feeling: feeling.into(),
                ..JournalData::default()
            },
        }
    }

    pub fn with_substance(mut self, substance: impl Into<String>, amount: impl Into<String>, unit: impl Into<String>) -> Self {
        self.data.substance = substance.into();
        self.data.amount = amount.into();
        self.data.unit = unit.into();
        self
    }

    pub fn with_place(mut self, place: impl Into<String>) -> Self {
        self.data.place = Some(place.into()).filter(|p: &String| !p.trim().is_empty());
        self
    }

    pub fn with_cost(mut self, cost: impl Into<String>) -> Self {
        self.data.cost = Some(cost.into());
        self
    }

    /// Money figure of this entry; missing or non-numeric cost counts as 0.
    pub fn cost_amount(&self) -> f64 {
        self.data.cost.as_deref().map(lenient::parse_amount).unwrap_or(0.0)
    }
}

dated_record!(JournalEntry, Bucket::Journal);

// ============================================================================
// Cravings
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CravingEntry {
    pub date: Timestamp,
    /// 0-10 scale.
    #[serde(default, deserialize_with = "lenient::count")]
    pub intensity: u32,
    #[serde(default, deserialize_with = "lenient::opt_text", skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_text", skip_serializing_if = "Option::is_none")]
    pub coping_mechanism: Option<String>,
}

impl CravingEntry {
    pub fn new(date: Timestamp, intensity: u32) -> Self {
        Self {
            date,
            intensity: intensity.min(10),
            trigger: None,
            coping_mechanism: None,
        }
    }

    pub fn with_trigger(mut self, trigger: impl Into<String>) -> Self {
        self.trigger = Some(trigger.into());
        self
    }

    pub fn with_coping(mut self, coping: impl Into<String>) -> Self {
        self.coping_mechanism = Some(coping.into());
        self
    }
}

dated_record!(CravingEntry, Bucket::Cravings);

// ============================================================================
// Exercises
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreathingEntry {
    pub date: Timestamp,
    /// e.g. "box", "4-7-8"
    #[serde(default, deserialize_with = "lenient::opt_text", skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

dated_record!(BreathingEntry, Bucket::Breathing);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundingEntry {
    pub date: Timestamp,
}

dated_record!(GroundingEntry, Bucket::Grounding);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GratitudeEntry {
    pub date: Timestamp,
    #[serde(default)]
    pub items: Vec<String>,
}

impl GratitudeEntry {
    /// Items with actual content.
    pub fn filled_items(&self) -> usize {
        self.items.iter().filter(|i| !i.trim().is_empty()).count()
    }
}

dated_record!(GratitudeEntry, Bucket::Gratitude);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThoughtDiaryEntry {
    pub date: Timestamp,
    #[serde(default)]
    pub data: ThoughtRecord,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThoughtRecord {
    #[serde(deserialize_with = "lenient::text")]
    pub situation: String,
    #[serde(deserialize_with = "lenient::text")]
    pub automatic_thought: String,
    #[serde(deserialize_with = "lenient::text")]
    pub emotion: String,
    /// Cognitive distortions the user tagged on the thought.
    pub distortions: Vec<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub evidence_for: String,
    #[serde(deserialize_with = "lenient::text")]
    pub evidence_against: String,
    #[serde(deserialize_with = "lenient::text")]
    pub balanced_thought: String,
}

dated_record!(ThoughtDiaryEntry, Bucket::ThoughtDiary);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeditationEntry {
    pub date: Timestamp,
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    /// Seconds.
    #[serde(default, deserialize_with = "lenient::count")]
    pub duration: u32,
}

dated_record!(MeditationEntry, Bucket::Meditation);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuesEntry {
    pub date: Timestamp,
    #[serde(default)]
    pub top5: Vec<String>,
}

dated_record!(ValuesEntry, Bucket::Values);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OppositeActionEntry {
    pub date: Timestamp,
    #[serde(default, deserialize_with = "lenient::text")]
    pub emotion: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub action_urge: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub opposite_action: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub commitment: String,
}

dated_record!(OppositeActionEntry, Bucket::OppositeAction);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemSolvingEntry {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: String,
    pub date: Timestamp,
    #[serde(default, deserialize_with = "lenient::text")]
    pub problem_definition: String,
    #[serde(default)]
    pub solutions: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub chosen_solution: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub action_plan: String,
    /// "open", "in-progress" or "solved"; older records use free text.
    #[serde(default, deserialize_with = "lenient::text")]
    pub status: String,
}

impl ProblemSolvingEntry {
    pub fn is_solved(&self) -> bool {
        matches!(
            self.status.trim().to_lowercase().as_str(),
            "solved" | "resolved" | "completed" | "done"
        )
    }
}

dated_record!(ProblemSolvingEntry, Bucket::ProblemSolving);

// ============================================================================
// Screeners
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    #[serde(default, deserialize_with = "lenient::count")]
    pub score: u32,
    pub date: Timestamp,
}

dated_record!(AuditEntry, Bucket::Audit);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdhdEntry {
    #[serde(default, deserialize_with = "lenient::count")]
    pub score: u32,
    pub date: Timestamp,
    #[serde(default)]
    pub answers: Vec<u8>,
}

dated_record!(AdhdEntry, Bucket::Adhd);

// ============================================================================
// Profile
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    #[serde(deserialize_with = "lenient::text")]
    pub username: String,
    #[serde(deserialize_with = "lenient::text")]
    pub gender: String,
    #[serde(deserialize_with = "lenient::text")]
    pub dob: String,
    #[serde(deserialize_with = "lenient::text")]
    pub emergency_contact_name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub emergency_contact_phone: String,
    #[serde(deserialize_with = "lenient::opt_text", skip_serializing_if = "Option::is_none")]
    pub emergency_contact_email: Option<String>,
}

impl UserProfile {
    /// All required fields filled in (email is optional).
    pub fn is_complete(&self) -> bool {
        [
            &self.username,
            &self.gender,
            &self.dob,
            &self.emergency_contact_name,
            &self.emergency_contact_phone,
        ]
        .iter()
        .all(|f| !f.trim().is_empty())
    }
}
