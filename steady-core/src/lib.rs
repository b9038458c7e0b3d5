//! steady-core: record storage, the achievement engine and the journey feed

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod goals;
pub mod history;
pub mod lenient;
pub mod moods;
pub mod notifier;
pub mod plans;
pub mod records;
pub mod rules;
pub mod signals;
pub mod snapshot;
pub mod store;
pub mod streaks;
pub mod time;
pub mod tool;
pub mod tracker;

pub use config::EngineConfig;
pub use engine::{AchievementEngine, PassOutcome};
pub use error::{StoreError, StoreResult};
pub use evaluator::evaluate;
pub use goals::{GoalEntry, GoalStatus, GoalTriage};
pub use history::{Describe, ToolFeed, UnifiedHistoryItem, build_unified_history, feed_registry, unified_history_from_store};
pub use moods::{MoodGroup, mood_group};
pub use notifier::{Toast, UnlockNotifier, UnlockedSet, load_unlocked};
pub use plans::{Contact, PlanDocument, RelapsePreventionPlan, SafetyPlan, Section};
pub use records::{
    AdhdEntry, AuditEntry, BreathingEntry, CravingEntry, GratitudeEntry, GroundingEntry, JournalData,
    JournalEntry, MeditationEntry, OppositeActionEntry, ProblemSolvingEntry, Record, ThoughtDiaryEntry,
    ThoughtRecord, UserProfile, ValuesEntry,
};
pub use rules::{Category, Gallery, GalleryEntry, Predicate, RuleDefinition, RuleRegistry};
pub use signals::{ChangeSignal, ChangeSignalBus, DrainReport, SignalEmitter};
pub use snapshot::AggregateState;
pub use store::{Bucket, MemoryStore, RecordStore};
pub use streaks::{STREAK_SLACK_HOURS, has_daily_streak, longest_daily_run};
pub use time::Timestamp;
pub use tool::Tool;
pub use tracker::{ToastObserver, Tracker};
