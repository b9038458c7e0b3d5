//! Aggregate state: every bucket read into one closed, defaulted struct.
//!
//! Rule predicates only ever see this type. Each field is populated even when
//! its bucket is missing or corrupt, so predicates never have to guard against
//! absent data.

use chrono_tz::Tz;

use crate::goals::GoalEntry;
use crate::notifier::{UnlockedSet, load_unlocked};
use crate::plans::{PlanDocument, RelapsePreventionPlan, SafetyPlan};
use crate::records::*;
use crate::store::{Bucket, RecordStore, load_document, load_list, load_records};
use crate::time::Timestamp;
use crate::tool::Tool;

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateState {
    /// Display timezone for day and hour rules.
    pub timezone: Tz,

    pub journal: Vec<JournalEntry>,
    pub cravings: Vec<CravingEntry>,
    pub breathing: Vec<BreathingEntry>,
    pub grounding: Vec<GroundingEntry>,
    pub gratitude: Vec<GratitudeEntry>,
    pub thought_diary: Vec<ThoughtDiaryEntry>,
    pub meditation: Vec<MeditationEntry>,
    pub values: Vec<ValuesEntry>,
    pub audit: Vec<AuditEntry>,
    pub adhd: Vec<AdhdEntry>,
    pub opposite_action: Vec<OppositeActionEntry>,
    pub problem_solving: Vec<ProblemSolvingEntry>,
    pub goals: Vec<GoalEntry>,

    /// `Some` exactly when the stored object has at least one key.
    pub safety_plan: Option<SafetyPlan>,
    pub relapse_plan: Option<RelapsePreventionPlan>,

    pub profile: UserProfile,
    pub logins: Vec<Timestamp>,
    pub events: Vec<String>,

    /// The persisted set as of the start of this pass.
    pub unlocked_achievements: UnlockedSet,
}

impl Default for AggregateState {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            journal: Vec::new(),
            cravings: Vec::new(),
            breathing: Vec::new(),
            grounding: Vec::new(),
            gratitude: Vec::new(),
            thought_diary: Vec::new(),
            meditation: Vec::new(),
            values: Vec::new(),
            audit: Vec::new(),
            adhd: Vec::new(),
            opposite_action: Vec::new(),
            problem_solving: Vec::new(),
            goals: Vec::new(),
            safety_plan: None,
            relapse_plan: None,
            profile: UserProfile::default(),
            logins: Vec::new(),
            events: Vec::new(),
            unlocked_achievements: UnlockedSet::new(),
        }
    }
}

impl AggregateState {
    /// Read every bucket. Never fails; bad buckets fall back to defaults.
    pub fn build<S: RecordStore + ?Sized>(store: &S, timezone: Tz) -> Self {
        Self {
            timezone,
            journal: load_records(store),
            cravings: load_records(store),
            breathing: load_records(store),
            grounding: load_records(store),
            gratitude: load_records(store),
            thought_diary: load_records(store),
            meditation: load_records(store),
            values: load_records(store),
            audit: load_records(store),
            adhd: load_records(store),
            opposite_action: load_records(store),
            problem_solving: load_records(store),
            goals: load_records(store),
            safety_plan: load_document(store, SafetyPlan::BUCKET),
            relapse_plan: load_document(store, RelapsePreventionPlan::BUCKET),
            profile: load_document(store, Bucket::UserProfile).unwrap_or_default(),
            logins: load_list(store, Bucket::LoginHistory),
            events: load_list(store, Bucket::EventHistory),
            unlocked_achievements: load_unlocked(store),
        }
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    /// Whether a tool has any data: entries for list tools, a saved object for plans.
    pub fn uses(&self, tool: Tool) -> bool {
        match tool {
            Tool::Journal => !self.journal.is_empty(),
            Tool::Cravings => !self.cravings.is_empty(),
            Tool::Breathing => !self.breathing.is_empty(),
            Tool::Grounding => !self.grounding.is_empty(),
            Tool::Gratitude => !self.gratitude.is_empty(),
            Tool::ThoughtDiary => !self.thought_diary.is_empty(),
            Tool::Meditation => !self.meditation.is_empty(),
            Tool::Values => !self.values.is_empty(),
            Tool::Audit => !self.audit.is_empty(),
            Tool::Adhd => !self.adhd.is_empty(),
            Tool::OppositeAction => !self.opposite_action.is_empty(),
            Tool::ProblemSolving => !self.problem_solving.is_empty(),
            Tool::Goals => !self.goals.is_empty(),
            Tool::SafetyPlan => self.safety_plan.is_some(),
            Tool::RelapsePlan => self.relapse_plan.is_some(),
        }
    }

    pub fn tools_used(&self) -> usize {
        Tool::ALL.iter().filter(|t| self.uses(**t)).count()
    }

    pub fn has_event(&self, name: &str) -> bool {
        self.events.iter().any(|e| e == name)
    }

    /// Sum of parsed journal costs.
    pub fn total_cost(&self) -> f64 {
        self.journal.iter().map(JournalEntry::cost_amount).sum()
    }

    pub fn completed_goals(&self) -> usize {
        self.goals.iter().filter(|g| g.is_completed()).count()
    }

    pub fn safety_plan_sections(&self) -> usize {
        self.safety_plan.as_ref().map_or(0, PlanDocument::filled_sections)
    }

    pub fn relapse_plan_sections(&self) -> usize {
        self.relapse_plan.as_ref().map_or(0, PlanDocument::filled_sections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, prepend_record};

    #[test]
    fn test_empty_store_builds_default_state() {
        let state = AggregateState::build(&MemoryStore::new(), Tz::UTC);
        assert_eq!(state, AggregateState::default());
        assert_eq!(state.tools_used(), 0);
    }

    #[test]
    fn test_corrupt_bucket_does_not_affect_others() {
        let mut store = MemoryStore::new()
            .with_raw(Bucket::Journal, "<<garbage>>")
            .with_raw(Bucket::EventHistory, r#"["share_safety_plan", 7]"#);
        prepend_record(&mut store, &CravingEntry::new(Timestamp::parse("2024-01-02").unwrap(), 4)).unwrap();

        let state = AggregateState::build(&store, Tz::UTC);
        assert!(state.journal.is_empty());
        assert_eq!(state.cravings.len(), 1);
        assert!(state.has_event("share_safety_plan"));
        assert_eq!(state.events.len(), 1);
    }

    #[test]
    fn test_plan_use_means_saved_object() {
        let store = MemoryStore::new().with_raw(Bucket::SafetyPlan, r#"{"warningSigns":[""]}"#);
        let state = AggregateState::build(&store, Tz::UTC);
        assert!(state.uses(Tool::SafetyPlan));
        assert_eq!(state.safety_plan_sections(), 0);
        assert!(!state.uses(Tool::RelapsePlan));
    }

    #[test]
    fn test_plan_with_odd_section_shapes_still_counts() {
        let store = MemoryStore::new()
            .with_raw(Bucket::SafetyPlan, r#"{"warningSigns":"not sleeping","reasonsForLiving":"my kids"}"#)
            .with_raw(Bucket::RelapsePreventionPlan, r#"{"triggers":{"unexpected":true}}"#);
        let state = AggregateState::build(&store, Tz::UTC);
        assert!(state.uses(Tool::SafetyPlan));
        assert_eq!(state.safety_plan_sections(), 2);
        assert!(state.uses(Tool::RelapsePlan));
        assert_eq!(state.relapse_plan_sections(), 0);
    }

    #[test]
    fn test_total_cost_skips_non_numeric() {
        let ts = Timestamp::parse("2024-01-01").unwrap();
        let state = AggregateState {
            journal: ["20", "30.5", "abc", ""]
                .into_iter()
                .map(|c| JournalEntry::new(ts, "Calm").with_cost(c))
                .collect(),
            ..AggregateState::default()
        };
        assert_eq!(state.total_cost(), 50.5);
    }
}
