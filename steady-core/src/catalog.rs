//! The built-in achievement catalog.
//!
//! Rules are grouped by category and listed in gallery order. Simple count
//! thresholds are inline closures; anything that needs more than one line of
//! logic is a named function below the table.

use crate::moods::{MoodGroup, mood_coverage};
use crate::plans::PlanDocument;
use crate::rules::{Category, RuleDefinition};
use crate::snapshot::AggregateState;
use crate::streaks::has_daily_streak;
use crate::tool::Tool;

use Category::*;

pub fn builtin_rules() -> Vec<RuleDefinition> {
    vec![
        // ====================================================================
        // Journal
        // ====================================================================
        RuleDefinition::new("journal_1", Journal, "📓", "First Entry", "Write your first journal entry.", |s| {
            !s.journal.is_empty()
        }),
        RuleDefinition::new("journal_10", Journal, "📝", "Getting Into It", "Write 10 journal entries.", |s| {
            s.journal.len() >= 10
        }),
        RuleDefinition::new("journal_50", Journal, "📚", "Storyteller", "Write 50 journal entries.", |s| {
            s.journal.len() >= 50
        }),
        RuleDefinition::new("journal_100", Journal, "🏛️", "Chronicler", "Write 100 journal entries.", |s| {
            s.journal.len() >= 100
        }),
        RuleDefinition::new("journal_streak_7", Journal, "🔥", "One Week Strong", "Journal 7 days in a row.", |s| {
            journal_streak(s, 7)
        }),
        RuleDefinition::new("journal_streak_30", Journal, "🌋", "Month of Reflection", "Journal 30 days in a row.", |s| {
            journal_streak(s, 30)
        }),
        RuleDefinition::new(
            "mood_spectrum",
            Journal,
            "🌈",
            "Mood Spectrum",
            "Log a feeling from every part of the feelings wheel.",
            mood_spectrum,
        ),
        RuleDefinition::new("night_owl", Journal, "🦉", "Night Owl", "Write a journal entry between midnight and 4am.", |s| {
            journal_in_hours(s, 0, 3)
        }),
        RuleDefinition::new("early_bird", Journal, "🐦", "Early Bird", "Write a journal entry between 5am and 8am.", |s| {
            journal_in_hours(s, 5, 7)
        }),
        RuleDefinition::new("journal_place_10", Journal, "📍", "Know Your Places", "Note where you were in 10 entries.", |s| {
            s.journal.iter().filter(|e| e.data.place.is_some()).count() >= 10
        }),
        // ====================================================================
        // Cravings
        // ====================================================================
        RuleDefinition::new("craving_1", Cravings, "🌊", "Riding the Wave", "Log your first craving.", |s| {
            !s.cravings.is_empty()
        }),
        RuleDefinition::new("craving_10", Cravings, "🏄", "Wave Watcher", "Log 10 cravings.", |s| s.cravings.len() >= 10),
        RuleDefinition::new("craving_50", Cravings, "⚓", "Steady Anchor", "Log 50 cravings.", |s| s.cravings.len() >= 50),
        RuleDefinition::new("craving_triggers_10", Cravings, "🔍", "Trigger Detective", "Name the trigger on 10 cravings.", |s| {
            s.cravings.iter().filter(|c| c.trigger.is_some()).count() >= 10
        }),
        RuleDefinition::new("craving_coping_5", Cravings, "🛠️", "Toolbox", "Record how you coped with 5 cravings.", |s| {
            s.cravings.iter().filter(|c| c.coping_mechanism.is_some()).count() >= 5
        }),
        // ====================================================================
        // Mindfulness
        // ====================================================================
        RuleDefinition::new("breathing_1", Mindfulness, "🌬️", "Deep Breath", "Complete a breathing exercise.", |s| {
            !s.breathing.is_empty()
        }),
        RuleDefinition::new("breathing_10", Mindfulness, "🎐", "Breath Master", "Complete 10 breathing exercises.", |s| {
            s.breathing.len() >= 10
        }),
        RuleDefinition::new("grounding_1", Mindfulness, "🌳", "Grounded", "Complete a grounding exercise.", |s| {
            !s.grounding.is_empty()
        }),
        RuleDefinition::new("grounding_10", Mindfulness, "🪨", "Rooted", "Complete 10 grounding exercises.", |s| {
            s.grounding.len() >= 10
        }),
        RuleDefinition::new("meditation_1", Mindfulness, "🧘", "First Sit", "Finish a meditation.", |s| {
            !s.meditation.is_empty()
        }),
        RuleDefinition::new("meditation_10", Mindfulness, "🪷", "Regular Sitter", "Finish 10 meditations.", |s| {
            s.meditation.len() >= 10
        }),
        RuleDefinition::new(
            "meditation_60_minutes",
            Mindfulness,
            "⏳",
            "Hour of Stillness",
            "Meditate for 60 minutes in total.",
            |s| s.meditation.iter().map(|m| u64::from(m.duration)).sum::<u64>() >= 3600,
        ),
        RuleDefinition::new("gratitude_1", Mindfulness, "🙏", "Thankful", "Write your first gratitude list.", |s| {
            !s.gratitude.is_empty()
        }),
        RuleDefinition::new("gratitude_7", Mindfulness, "🌻", "Attitude of Gratitude", "Write 7 gratitude lists.", |s| {
            s.gratitude.len() >= 7
        }),
        RuleDefinition::new("gratitude_items_50", Mindfulness, "💐", "Counting Blessings", "List 50 things you are grateful for.", |s| {
            s.gratitude.iter().map(|g| g.filled_items()).sum::<usize>() >= 50
        }),
        // ====================================================================
        // Insight
        // ====================================================================
        RuleDefinition::new("thought_diary_1", Insight, "💭", "Thought Catcher", "Complete a thought diary entry.", |s| {
            !s.thought_diary.is_empty()
        }),
        RuleDefinition::new("thought_diary_10", Insight, "🧠", "Reframer", "Complete 10 thought diary entries.", |s| {
            s.thought_diary.len() >= 10
        }),
        RuleDefinition::new(
            "learn_distortions",
            Insight,
            "🔎",
            "Know Your Distortions",
            "Read about cognitive distortions.",
            |s| s.has_event("visited_cognitive_distortions"),
        ),
        RuleDefinition::new("values_1", Insight, "🧭", "True North", "Sort your values.", |s| !s.values.is_empty()),
        RuleDefinition::new("opposite_action_1", Insight, "🔄", "Turn Around", "Practice opposite action.", |s| {
            !s.opposite_action.is_empty()
        }),
        RuleDefinition::new("opposite_action_5", Insight, "🤸", "Against the Current", "Practice opposite action 5 times.", |s| {
            s.opposite_action.len() >= 5
        }),
        RuleDefinition::new("problem_solving_1", Insight, "🧩", "Problem Solver", "Work through a problem.", |s| {
            !s.problem_solving.is_empty()
        }),
        RuleDefinition::new("problem_solved_1", Insight, "✅", "Solved It", "Mark a problem as solved.", |s| {
            s.problem_solving.iter().any(|p| p.is_solved())
        }),
        RuleDefinition::new("audit_1", Insight, "📋", "Honest Look", "Complete the AUDIT screener.", |s| !s.audit.is_empty()),
        RuleDefinition::new("adhd_1", Insight, "⚡", "Know Your Mind", "Complete the ADHD screener.", |s| !s.adhd.is_empty()),
        RuleDefinition::new(
            "audit_improved",
            Insight,
            "📉",
            "Moving Down",
            "Score lower on the AUDIT than your first time.",
            audit_improved,
        ),
        // ====================================================================
        // Planning
        // ====================================================================
        RuleDefinition::new("tool_safety_plan_started", Planning, "🛟", "Safety First", "Start your safety plan.", |s| {
            s.safety_plan_sections() > 0
        }),
        RuleDefinition::new("tool_safety_plan_full", Planning, "🏰", "Safety Net", "Fill in every section of your safety plan.", |s| {
            s.safety_plan.as_ref().is_some_and(|p| p.is_complete())
        }),
        RuleDefinition::new("tool_relapse_plan_started", Planning, "🛡️", "Planning Ahead", "Start your relapse prevention plan.", |s| {
            s.relapse_plan_sections() > 0
        }),
        RuleDefinition::new(
            "tool_relapse_plan_full",
            Planning,
            "🗺️",
            "Battle Ready",
            "Fill in every section of your relapse prevention plan.",
            |s| s.relapse_plan.as_ref().is_some_and(|p| p.is_complete()),
        ),
        RuleDefinition::new("share_safety_plan", Planning, "🤝", "Not Alone", "Share your safety plan with someone.", |s| {
            s.has_event("share_safety_plan")
        }),
        RuleDefinition::new("goal_1", Planning, "🎯", "Aim", "Set your first goal.", |s| !s.goals.is_empty()),
        RuleDefinition::new("goal_completed_1", Planning, "🏁", "Goal Getter", "Complete a goal.", |s| s.completed_goals() >= 1),
        RuleDefinition::new("goal_completed_5", Planning, "🏆", "Unstoppable", "Complete 5 goals.", |s| s.completed_goals() >= 5),
        RuleDefinition::new("goal_values_aligned", Planning, "💎", "Living My Values", "Set a goal linked to your values.", |s| {
            s.goals.iter().any(|g| !g.relevant_values.is_empty())
        }),
        RuleDefinition::new("goal_reflection", Planning, "🪞", "Looking Back", "Reflect on a goal.", |s| {
            s.goals
                .iter()
                .any(|g| g.reflection.as_deref().is_some_and(|r| !r.trim().is_empty()))
        }),
        // ====================================================================
        // Engagement
        // ====================================================================
        RuleDefinition::new("tool_first_use", Engagement, "✨", "First Step", "Use any tool for the first time.", |s| {
            s.tools_used() >= 1
        }),
        RuleDefinition::new("tool_explorer_3", Engagement, "🧳", "Explorer", "Use 3 different tools.", |s| s.tools_used() >= 3),
        RuleDefinition::new("tool_all", Engagement, "🌟", "Full Toolkit", "Use every tool at least once.", |s| {
            s.tools_used() == Tool::ALL.len()
        }),
        RuleDefinition::new("full_house", Engagement, "🏠", "Full House", "Log a journal entry, a craving and a goal.", |s| {
            !s.journal.is_empty() && !s.cravings.is_empty() && !s.goals.is_empty()
        }),
        RuleDefinition::new("profile_complete", Engagement, "🪪", "That's Me", "Complete your profile.", |s| {
            s.profile.is_complete()
        }),
        RuleDefinition::new("login_7", Engagement, "🚪", "Regular", "Log in 7 times.", |s| s.logins.len() >= 7),
        RuleDefinition::new("login_30", Engagement, "🏡", "Part of the Routine", "Log in 30 times.", |s| s.logins.len() >= 30),
        RuleDefinition::new("login_streak_7", Engagement, "📆", "Showing Up", "Log in 7 days in a row.", |s| {
            has_daily_streak(s.logins.iter().copied(), s.timezone, 7)
        }),
        RuleDefinition::new("achievements_25", Engagement, "🥈", "Collector", "Unlock 25 achievements.", |s| {
            s.unlocked_achievements.len() >= 25
        }),
        RuleDefinition::new("achievements_40", Engagement, "🥇", "Completionist", "Unlock 40 achievements.", |s| {
            s.unlocked_achievements.len() >= 40
        }),
        // ====================================================================
        // Financial
        // ====================================================================
        RuleDefinition::new("financial_100", Financial, "💵", "Saved $100", "Track $100 not spent.", |s| s.total_cost() >= 100.0),
        RuleDefinition::new("financial_500", Financial, "💰", "Saved $500", "Track $500 not spent.", |s| s.total_cost() >= 500.0),
        RuleDefinition::new("financial_1000", Financial, "🏦", "Saved $1,000", "Track $1,000 not spent.", |s| {
            s.total_cost() >= 1000.0
        }),
        RuleDefinition::new("financial_5000", Financial, "👑", "Saved $5,000", "Track $5,000 not spent.", |s| {
            s.total_cost() >= 5000.0
        }),
    ]
}

fn journal_streak(s: &AggregateState, days: usize) -> bool {
    has_daily_streak(s.journal.iter().map(|e| e.date), s.timezone, days)
}

fn mood_spectrum(s: &AggregateState) -> bool {
    mood_coverage(s.journal.iter().map(|e| e.data.feeling.as_str())).len() == MoodGroup::ALL.len()
}

/// Any journal entry with a local hour in `first..=last`.
fn journal_in_hours(s: &AggregateState, first: u32, last: u32) -> bool {
    s.journal
        .iter()
        .any(|e| (first..=last).contains(&e.date.local_hour(s.timezone)))
}

/// Latest AUDIT score is below the earliest one.
fn audit_improved(s: &AggregateState) -> bool {
    let first = s.audit.iter().min_by_key(|a| a.date);
    let latest = s.audit.iter().max_by_key(|a| a.date);
    match (first, latest) {
        (Some(first), Some(latest)) if s.audit.len() >= 2 => latest.score < first.score,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{AuditEntry, JournalEntry};
    use crate::time::Timestamp;
    use std::collections::HashSet;

    fn rule(id: &str) -> RuleDefinition {
        builtin_rules().into_iter().find(|r| r.id == id).unwrap()
    }

    fn entry(ts: &str, feeling: &str) -> JournalEntry {
        JournalEntry::new(Timestamp::parse(ts).unwrap(), feeling)
    }

    #[test]
    fn test_catalog_ids_are_unique() {
        let rules = builtin_rules();
        let ids: HashSet<&str> = rules.iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), rules.len());
        assert!(rules.len() >= 50);
    }

    #[test]
    fn test_every_rule_is_false_on_empty_state() {
        let empty = AggregateState::default();
        for r in builtin_rules() {
            assert!(!(r.predicate)(&empty), "{} unlocked on empty state", r.id);
        }
    }

    #[test]
    fn test_night_owl_and_early_bird_windows() {
        let owl = rule("night_owl").predicate;
        let bird = rule("early_bird").predicate;

        let at = |ts: &str| AggregateState {
            journal: vec![entry(ts, "Calm")],
            ..AggregateState::default()
        };
        assert!(owl(&at("2024-01-01T03:59:00Z")));
        assert!(!owl(&at("2024-01-01T04:00:00Z")));
        assert!(bird(&at("2024-01-01T05:00:00Z")));
        assert!(!bird(&at("2024-01-01T08:00:00Z")));

        // 02:00 UTC is 20:00 the previous evening in Chicago
        let chicago = at("2024-01-01T02:00:00Z").with_timezone(chrono_tz::America::Chicago);
        assert!(!owl(&chicago));
    }

    #[test]
    fn test_mood_spectrum_needs_all_six_groups() {
        let feelings = ["Joyful", "proud", "calm", "sad", "angry"];
        let mut state = AggregateState {
            journal: feelings.iter().map(|f| entry("2024-01-01", f)).collect(),
            ..AggregateState::default()
        };
        assert!(!mood_spectrum(&state));
        state.journal.push(entry("2024-01-02", "Anxious"));
        assert!(mood_spectrum(&state));
    }

    #[test]
    fn test_audit_improved_compares_oldest_and_newest() {
        let audit = |score, ts: &str| AuditEntry {
            score,
            date: Timestamp::parse(ts).unwrap(),
        };
        let mut state = AggregateState {
            audit: vec![audit(12, "2024-03-01")],
            ..AggregateState::default()
        };
        assert!(!audit_improved(&state));

        // stored newest-first
        state.audit.insert(0, audit(9, "2024-04-01"));
        assert!(audit_improved(&state));

        state.audit.insert(0, audit(14, "2024-05-01"));
        assert!(!audit_improved(&state));
    }

    #[test]
    fn test_achievement_count_rules_read_unlocked_set() {
        let r = rule("achievements_25").predicate;
        let mut state = AggregateState::default();
        state.unlocked_achievements = (0..24).map(|i| format!("r{i}")).collect();
        assert!(!r(&state));
        state.unlocked_achievements.insert("r24".into());
        assert!(r(&state));
    }
}
