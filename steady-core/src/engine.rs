//! The achievement pipeline: snapshot, evaluate, commit.

use chrono_tz::Tz;
use tracing::info;

use crate::error::StoreResult;
use crate::evaluator::evaluate;
use crate::notifier::{Toast, UnlockNotifier, load_unlocked};
use crate::rules::{Gallery, RuleRegistry};
use crate::snapshot::AggregateState;
use crate::store::RecordStore;

/// Result of one evaluation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassOutcome {
    /// Rule IDs unlocked by this pass, in registry order.
    pub unlocked: Vec<&'static str>,
}

impl PassOutcome {
    pub fn is_empty(&self) -> bool {
        self.unlocked.is_empty()
    }
}

pub struct AchievementEngine {
    registry: RuleRegistry,
    notifier: UnlockNotifier,
    timezone: Tz,
}

impl AchievementEngine {
    pub fn new(registry: RuleRegistry, timezone: Tz) -> Self {
        Self {
            registry,
            notifier: UnlockNotifier::new(),
            timezone,
        }
    }

    /// Run one full pass against the current store contents.
    ///
    /// Predicates see the unlocked set as it was persisted before the pass.
    pub fn run<S: RecordStore + ?Sized>(&mut self, store: &mut S) -> StoreResult<PassOutcome> {
        let state = AggregateState::build(store, self.timezone);
        let newly = evaluate(&self.registry, &state, &state.unlocked_achievements);
        if newly.is_empty() {
            return Ok(PassOutcome::default());
        }

        self.notifier.commit(store, &self.registry, &newly)?;
        info!(count = newly.len(), ids = ?newly, "achievements unlocked");
        Ok(PassOutcome { unlocked: newly })
    }

    pub fn next_toast(&mut self) -> Option<Toast> {
        self.notifier.next_toast()
    }

    pub fn pending_toasts(&self) -> usize {
        self.notifier.pending()
    }

    /// Drop queued toasts (e.g. after a reset).
    pub fn clear_toasts(&mut self) {
        self.notifier.clear();
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn gallery<S: RecordStore + ?Sized>(&self, store: &S) -> Gallery {
        self.registry.gallery(&load_unlocked(store))
    }
}
