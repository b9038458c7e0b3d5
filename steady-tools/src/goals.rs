//! Goal lifecycle on top of the tracker: create, log progress, reflect, delete.
//!
//! Goals are the one list bucket edited in place. Edits work on the raw stored
//! entries and touch only the goal being changed, so entries this build cannot
//! read are written back untouched.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde_json::Value;
use steady_core::store::{load_raw_list, load_records, save_list};
use steady_core::{Bucket, GoalEntry, GoalStatus, GoalTriage, RecordStore, Timestamp, Tracker, ValuesEntry};
use tracing::info;

use crate::new_id;

/// SMART fields entered when setting a goal.
#[derive(Debug, Clone, Default)]
pub struct GoalDraft {
    pub title: String,
    pub measurable_unit: String,
    pub measurable_target: f64,
    pub achievable: String,
    pub relevant: String,
    pub target_date: Option<NaiveDate>,
}

impl GoalDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            measurable_target: 1.0,
            ..Self::default()
        }
    }

    pub fn with_measure(mut self, unit: impl Into<String>, target: f64) -> Self {
        self.measurable_unit = unit.into();
        self.measurable_target = target;
        self
    }

    pub fn with_target_date(mut self, day: NaiveDate) -> Self {
        self.target_date = Some(day);
        self
    }

    pub fn with_reasons(mut self, achievable: impl Into<String>, relevant: impl Into<String>) -> Self {
        self.achievable = achievable.into();
        self.relevant = relevant.into();
        self
    }
}

pub fn list_goals<S: RecordStore>(tracker: &Tracker<S>) -> Vec<GoalEntry> {
    load_records(tracker.store())
}

/// Top values from the most recent values exercise, if any.
pub fn latest_values<S: RecordStore>(tracker: &Tracker<S>) -> Vec<String> {
    load_records::<ValuesEntry, _>(tracker.store())
        .into_iter()
        .max_by_key(|v| v.date)
        .map(|v| v.top5)
        .unwrap_or_default()
}

pub fn create_goal<S: RecordStore>(tracker: &mut Tracker<S>, draft: GoalDraft, now: Timestamp) -> Result<GoalEntry> {
    let title = draft.title.trim();
    if title.is_empty() {
        bail!("goal title cannot be empty");
    }
    if !draft.measurable_target.is_finite() || draft.measurable_target <= 0.0 {
        bail!("goal target must be a positive number, got {}", draft.measurable_target);
    }

    let mut goal = GoalEntry::new(new_id(), title, now)
        .with_measure(draft.measurable_unit, draft.measurable_target)
        .with_values(latest_values(tracker));
    goal.achievable = draft.achievable;
    goal.relevant = draft.relevant;
    goal.target_date = draft.target_date;

    tracker.append(&goal).context("failed to save goals")?;
    info!(id = %goal.id, title = %goal.title, "goal created");
    Ok(goal)
}

/// Raw goal entries plus the position and parsed form of goal `id`.
fn find_goal<S: RecordStore>(tracker: &Tracker<S>, id: &str) -> Result<(Vec<Value>, usize, GoalEntry)> {
    let raw = load_raw_list(tracker.store(), Bucket::Goals);
    let (pos, goal) = raw
        .iter()
        .enumerate()
        .find_map(|(i, v)| {
            serde_json::from_value::<GoalEntry>(v.clone())
                .ok()
                .filter(|g| g.id == id)
                .map(|g| (i, g))
        })
        .with_context(|| format!("no goal with id '{id}'"))?;
    Ok((raw, pos, goal))
}

fn write_goals<S: RecordStore>(tracker: &mut Tracker<S>, raw: &[Value]) -> Result<()> {
    tracker
        .mutate(|store| save_list(store, Bucket::Goals, raw))
        .context("failed to save goals")
}

fn update_goal<S: RecordStore>(
    tracker: &mut Tracker<S>,
    id: &str,
    f: impl FnOnce(&mut GoalEntry) -> Result<()>,
) -> Result<GoalEntry> {
    let (mut raw, pos, mut goal) = find_goal(tracker, id)?;
    f(&mut goal)?;
    raw[pos] = serde_json::to_value(&goal)?;
    write_goals(tracker, &raw)?;
    Ok(goal)
}

/// Add progress. Progress only increases; reaching the target completes the goal.
pub fn log_progress<S: RecordStore>(tracker: &mut Tracker<S>, id: &str, amount: f64) -> Result<GoalEntry> {
    if !amount.is_finite() || amount <= 0.0 {
        bail!("progress must be a positive number, got {amount}");
    }
    update_goal(tracker, id, |goal| {
        if goal.is_completed() {
            bail!("goal '{}' is already completed", goal.title);
        }
        goal.measurable_progress += amount;
        if goal.measurable_progress >= goal.measurable_target {
            goal.measurable_progress = goal.measurable_target;
            goal.status = GoalStatus::Completed;
            info!(id = %goal.id, "goal completed");
        }
        Ok(())
    })
}

pub fn set_reflection<S: RecordStore>(tracker: &mut Tracker<S>, id: &str, text: &str) -> Result<GoalEntry> {
    let text = text.trim();
    update_goal(tracker, id, |goal| {
        goal.reflection = (!text.is_empty()).then(|| text.to_string());
        Ok(())
    })
}

pub fn delete_goal<S: RecordStore>(tracker: &mut Tracker<S>, id: &str) -> Result<GoalEntry> {
    let (mut raw, pos, removed) = find_goal(tracker, id)?;
    raw.remove(pos);
    write_goals(tracker, &raw)?;
    info!(id = %removed.id, "goal deleted");
    Ok(removed)
}

/// Goals split into display buckets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriagedGoals {
    pub active: Vec<GoalEntry>,
    pub completed: Vec<GoalEntry>,
    pub not_achieved: Vec<GoalEntry>,
}

pub fn triage(goals: Vec<GoalEntry>, today: NaiveDate) -> TriagedGoals {
    let mut out = TriagedGoals::default();
    for goal in goals {
        match goal.triage(today) {
            GoalTriage::Active => out.active.push(goal),
            GoalTriage::Completed => out.completed.push(goal),
            GoalTriage::NotAchieved => out.not_achieved.push(goal),
        }
    }
    out
}
