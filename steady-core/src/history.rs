//! Unified journey feed across all list-shaped tools.
//!
//! Each tool registers a [`ToolFeed`]: a pure projection from the snapshot to
//! `(timestamp, description)` pairs. The aggregator attaches tool metadata,
//! merges every feed and sorts newest-first. Plans, the profile, logins,
//! events and the unlocked set never appear in the feed.

use chrono_tz::Tz;
use serde::Serialize;

use crate::goals::GoalEntry;
use crate::records::*;
use crate::snapshot::AggregateState;
use crate::store::RecordStore;
use crate::time::Timestamp;
use crate::tool::Tool;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedHistoryItem {
    pub date: Timestamp,
    pub tool: Tool,
    pub title: &'static str,
    pub icon: &'static str,
    pub description: String,
    pub navigate_target: &'static str,
}

/// Human-readable one-liner for a record in the feed.
pub trait Describe {
    fn describe(&self) -> String;
}

impl Describe for JournalEntry {
    fn describe(&self) -> String {
        let feeling = or_unspecified(&self.data.feeling);
        if self.data.substance.trim().is_empty() {
            format!("Logged feeling: {feeling}")
        } else {
            format!("Logged feeling: {feeling} ({})", self.data.substance.trim())
        }
    }
}

impl Describe for CravingEntry {
    fn describe(&self) -> String {
        match &self.trigger {
            Some(trigger) => format!("Craving at intensity {}/10 (trigger: {trigger})", self.intensity),
            None => format!("Craving at intensity {}/10", self.intensity),
        }
    }
}

impl Describe for BreathingEntry {
    fn describe(&self) -> String {
        match &self.pattern {
            Some(pattern) => format!("Completed a {pattern} breathing exercise"),
            None => "Completed a breathing exercise".to_string(),
        }
    }
}

impl Describe for GroundingEntry {
    fn describe(&self) -> String {
        "Completed a 5-4-3-2-1 grounding exercise".to_string()
    }
}

impl Describe for GratitudeEntry {
    fn describe(&self) -> String {
        match self.filled_items() {
            1 => "Listed 1 thing to be grateful for".to_string(),
            n => format!("Listed {n} things to be grateful for"),
        }
    }
}

impl Describe for ThoughtDiaryEntry {
    fn describe(&self) -> String {
        format!("Challenged a thought about: {}", or_unspecified(&self.data.situation))
    }
}

impl Describe for MeditationEntry {
    fn describe(&self) -> String {
        let minutes = self.duration.div_ceil(60);
        format!("Meditated for {minutes} min: {}", or_unspecified(&self.title))
    }
}

impl Describe for ValuesEntry {
    fn describe(&self) -> String {
        if self.top5.is_empty() {
            "Sorted personal values".to_string()
        } else {
            format!("Top values: {}", self.top5.join(", "))
        }
    }
}

impl Describe for AuditEntry {
    fn describe(&self) -> String {
        format!("Completed with a score of {}", self.score)
    }
}

impl Describe for AdhdEntry {
    fn describe(&self) -> String {
        format!("Completed with a score of {}", self.score)
    }
}

impl Describe for OppositeActionEntry {
    fn describe(&self) -> String {
        format!(
            "Felt {}, chose to {}",
            or_unspecified(&self.emotion).to_lowercase(),
            or_unspecified(&self.opposite_action)
        )
    }
}

impl Describe for ProblemSolvingEntry {
    fn describe(&self) -> String {
        let problem = or_unspecified(&self.problem_definition);
        if self.is_solved() {
            format!("Solved: {problem}")
        } else {
            format!("Worked on: {problem}")
        }
    }
}

impl Describe for GoalEntry {
    fn describe(&self) -> String {
        if self.is_completed() {
            format!("Completed goal: {}", self.title)
        } else {
            format!("Set a goal: {}", self.title)
        }
    }
}

fn or_unspecified(s: &str) -> &str {
    match s.trim() {
        "" => "unspecified",
        t => t,
    }
}

// ============================================================================
// Feed registry
// ============================================================================

pub type Projection = fn(&AggregateState) -> Vec<(Timestamp, String)>;

/// How one tool contributes to the feed.
#[derive(Clone, Copy)]
pub struct ToolFeed {
    pub tool: Tool,
    pub project: Projection,
}

fn project<R: Record + Describe>(records: &[R]) -> Vec<(Timestamp, String)> {
    records.iter().map(|r| (r.timestamp(), r.describe())).collect()
}

/// One feed per list-shaped tool, in menu order.
pub fn feed_registry() -> [ToolFeed; 13] {
    [
        ToolFeed { tool: Tool::Journal, project: |s| project(&s.journal) },
        ToolFeed { tool: Tool::Cravings, project: |s| project(&s.cravings) },
        ToolFeed { tool: Tool::Breathing, project: |s| project(&s.breathing) },
        ToolFeed { tool: Tool::Grounding, project: |s| project(&s.grounding) },
        ToolFeed { tool: Tool::Gratitude, project: |s| project(&s.gratitude) },
        ToolFeed { tool: Tool::ThoughtDiary, project: |s| project(&s.thought_diary) },
        ToolFeed { tool: Tool::Meditation, project: |s| project(&s.meditation) },
        ToolFeed { tool: Tool::Values, project: |s| project(&s.values) },
        ToolFeed { tool: Tool::Audit, project: |s| project(&s.audit) },
        ToolFeed { tool: Tool::Adhd, project: |s| project(&s.adhd) },
        ToolFeed { tool: Tool::OppositeAction, project: |s| project(&s.opposite_action) },
        ToolFeed { tool: Tool::ProblemSolving, project: |s| project(&s.problem_solving) },
        ToolFeed { tool: Tool::Goals, project: |s| project(&s.goals) },
    ]
}

/// Merged feed, newest first. Equal timestamps keep registry order.
pub fn build_unified_history(state: &AggregateState) -> Vec<UnifiedHistoryItem> {
    let mut items: Vec<UnifiedHistoryItem> = feed_registry()
        .iter()
        .flat_map(|feed| {
            (feed.project)(state)
                .into_iter()
                .map(move |(date, description)| UnifiedHistoryItem {
                    date,
                    tool: feed.tool,
                    title: feed.tool.title(),
                    icon: feed.tool.icon(),
                    description,
                    navigate_target: feed.tool.route(),
                })
        })
        .collect();

    items.sort_by(|a, b| b.date.cmp(&a.date));
    items
}

/// Read the store and build the feed.
pub fn unified_history_from_store<S: RecordStore + ?Sized>(store: &S, tz: Tz) -> Vec<UnifiedHistoryItem> {
    build_unified_history(&AggregateState::build(store, tz))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Bucket, MemoryStore};

    #[test]
    fn test_descriptions() {
        let ts = Timestamp::parse("2024-01-01").unwrap();
        assert_eq!(JournalEntry::new(ts, "Joyful").describe(), "Logged feeling: Joyful");
        assert_eq!(
            CravingEntry::new(ts, 7).with_trigger("payday").describe(),
            "Craving at intensity 7/10 (trigger: payday)"
        );
        assert_eq!(AuditEntry { score: 9, date: ts }.describe(), "Completed with a score of 9");
        assert_eq!(
            MeditationEntry {
                date: ts,
                title: "Body scan".into(),
                duration: 610
            }
            .describe(),
            "Meditated for 11 min: Body scan"
        );
        assert_eq!(JournalEntry::new(ts, "").describe(), "Logged feeling: unspecified");
    }

    #[test]
    fn test_feed_covers_every_list_tool() {
        let feeds = feed_registry();
        for tool in Tool::ALL {
            assert_eq!(feeds.iter().any(|f| f.tool == tool), !tool.is_plan(), "{tool:?}");
        }
    }

    #[test]
    fn test_plans_and_events_are_excluded() {
        let store = MemoryStore::new()
            .with_raw(Bucket::SafetyPlan, r#"{"warningSigns":["isolating"]}"#)
            .with_raw(Bucket::EventHistory, r#"["share_safety_plan"]"#)
            .with_raw(Bucket::LoginHistory, r#"["2024-01-01T00:00:00Z"]"#);
        assert!(unified_history_from_store(&store, Tz::UTC).is_empty());
    }

    #[test]
    fn test_goals_are_dated_by_creation() {
        let store = MemoryStore::new().with_raw(
            Bucket::Goals,
            r#"[{"id":"g","title":"Run 5k","status":"completed","createdAt":"2024-02-03T10:00:00Z","targetDate":""}]"#,
        );
        let feed = unified_history_from_store(&store, Tz::UTC);
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].description, "Completed goal: Run 5k");
        assert_eq!(feed[0].navigate_target, "/goals");
        assert_eq!(feed[0].date, Timestamp::parse("2024-02-03T10:00:00Z").unwrap());
    }
}
