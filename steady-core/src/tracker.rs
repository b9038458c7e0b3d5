//! Composition root: one store, the achievement engine, the change-signal bus
//! and any toast observers.
//!
//! Every mutation entry point writes first and fires a change signal only once
//! the write succeeded. Call [`Tracker::dispatch`] to drain the queued signals.

use std::collections::VecDeque;

use serde::Serialize;
use tracing::debug;

use crate::config::EngineConfig;
use crate::engine::AchievementEngine;
use crate::error::StoreResult;
use crate::history::{UnifiedHistoryItem, build_unified_history};
use crate::notifier::Toast;
use crate::plans::PlanDocument;
use crate::records::{Record, UserProfile};
use crate::rules::{Gallery, RuleRegistry};
use crate::signals::{ChangeSignalBus, DrainReport, SignalEmitter};
use crate::snapshot::AggregateState;
use crate::store::{Bucket, RecordStore, prepend, prepend_record, save_document};
use crate::time::Timestamp;

/// Reacts to unlocks during a drain.
///
/// Observers may write to the store; they must fire through the emitter when
/// they do, which queues another pass.
pub trait ToastObserver<S: RecordStore> {
    fn on_unlock(&mut self, toast: &Toast, store: &mut S, signals: &mut SignalEmitter<'_>) -> StoreResult<()>;
}

pub struct Tracker<S: RecordStore> {
    store: S,
    engine: AchievementEngine,
    bus: ChangeSignalBus,
    observers: Vec<Box<dyn ToastObserver<S>>>,
    toasts: VecDeque<Toast>,
}

impl<S: RecordStore> Tracker<S> {
    pub fn new(store: S, config: &EngineConfig) -> Self {
        Self::with_registry(store, RuleRegistry::builtin(), config)
    }

    pub fn with_registry(store: S, registry: RuleRegistry, config: &EngineConfig) -> Self {
        Self {
            store,
            engine: AchievementEngine::new(registry, config.timezone),
            bus: ChangeSignalBus::new(config.max_passes_per_drain),
            observers: Vec::new(),
            toasts: VecDeque::new(),
        }
    }

    pub fn subscribe(&mut self, observer: impl ToastObserver<S> + 'static) {
        self.observers.push(Box::new(observer));
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Add a record to its tool's history (newest first).
    pub fn append<R: Record>(&mut self, record: &R) -> StoreResult<()> {
        prepend_record(&mut self.store, record)?;
        self.bus.fire();
        Ok(())
    }

    /// Replace a plan document.
    pub fn save_plan<P: PlanDocument + Serialize>(&mut self, plan: &P) -> StoreResult<()> {
        save_document(&mut self.store, P::BUCKET, plan)?;
        self.bus.fire();
        Ok(())
    }

    pub fn save_profile(&mut self, profile: &UserProfile) -> StoreResult<()> {
        save_document(&mut self.store, Bucket::UserProfile, profile)?;
        self.bus.fire();
        Ok(())
    }

    /// Append an opaque event name such as `share_safety_plan`.
    pub fn record_event(&mut self, name: &str) -> StoreResult<()> {
        prepend(&mut self.store, Bucket::EventHistory, &name)?;
        self.bus.fire();
        Ok(())
    }

    pub fn record_login(&mut self, at: Timestamp) -> StoreResult<()> {
        prepend(&mut self.store, Bucket::LoginHistory, &at)?;
        self.bus.fire();
        Ok(())
    }

    /// Arbitrary write, followed by a change signal if it succeeds.
    pub fn mutate(&mut self, f: impl FnOnce(&mut S) -> StoreResult<()>) -> StoreResult<()> {
        f(&mut self.store)?;
        self.bus.fire();
        Ok(())
    }

    /// Wipe every bucket. Does not fire: there is nothing left to unlock.
    pub fn reset(&mut self) -> StoreResult<()> {
        self.store.clear_all()?;
        self.engine.clear_toasts();
        self.toasts.clear();
        debug!("store reset");
        Ok(())
    }

    // ========================================================================
    // Signal handling
    // ========================================================================

    /// Drain queued change signals, one evaluation pass each.
    ///
    /// Toasts unlocked along the way are queued for [`Tracker::next_toast`]
    /// before observers see them, so an observer error never loses one. A pass that unlocks something fires a
    /// follow-up signal, since the unlocked set is itself stored state.
    pub fn dispatch(&mut self) -> StoreResult<DrainReport> {
        let Self {
            store,
            engine,
            bus,
            observers,
            toasts,
        } = self;

        bus.drain(|emitter| {
            let outcome = engine.run(store)?;
            if outcome.is_empty() {
                return Ok(());
            }
            emitter.fire();

            let first_new = toasts.len();
            while let Some(toast) = engine.next_toast() {
                toasts.push_back(toast);
            }
            for toast in toasts.range(first_new..) {
                for observer in observers.iter_mut() {
                    observer.on_unlock(toast, store, emitter)?;
                }
            }
            Ok(())
        })
    }

    /// Oldest undisplayed toast.
    pub fn next_toast(&mut self) -> Option<Toast> {
        self.toasts.pop_front()
    }

    pub fn pending_toasts(&self) -> usize {
        self.toasts.len()
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn snapshot(&self) -> AggregateState {
        AggregateState::build(&self.store, self.engine.timezone())
    }

    pub fn history(&self) -> Vec<UnifiedHistoryItem> {
        build_unified_history(&self.snapshot())
    }

    pub fn gallery(&self) -> Gallery {
        self.engine.gallery(&self.store)
    }
}
