//! Unlock persistence and the toast queue.

use std::collections::{BTreeSet, VecDeque};

use serde::Serialize;

use crate::error::StoreResult;
use crate::rules::RuleRegistry;
use crate::store::{Bucket, RecordStore, load_list, save_list};

/// Persisted rule IDs. Only ever grows; stored as a sorted array.
pub type UnlockedSet = BTreeSet<String>;

/// Read the persisted unlocked set; corrupt data reads as empty.
pub fn load_unlocked<S: RecordStore + ?Sized>(store: &S) -> UnlockedSet {
    load_list::<String, S>(store, Bucket::UnlockedAchievements)
        .into_iter()
        .collect()
}

/// One unlock notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub id: String,
    pub title: String,
    pub icon: String,
}

#[derive(Debug, Default)]
pub struct UnlockNotifier {
    queue: VecDeque<Toast>,
}

impl UnlockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union `newly` into the persisted set, then queue a toast per added ID.
    ///
    /// Nothing is queued unless the write succeeds. IDs already present in the
    /// store are not announced again.
    pub fn commit<S: RecordStore + ?Sized>(
        &mut self,
        store: &mut S,
        registry: &RuleRegistry,
        newly: &[&str],
    ) -> StoreResult<UnlockedSet> {
        let mut unlocked = load_unlocked(store);
        let added: Vec<&str> = newly
            .iter()
            .copied()
            .filter(|id| unlocked.insert(id.to_string()))
            .collect();

        if added.is_empty() {
            return Ok(unlocked);
        }

        let ids: Vec<&String> = unlocked.iter().collect();
        save_list(store, Bucket::UnlockedAchievements, &ids)?;

        for id in added {
            let toast = match registry.get(id) {
                Some(rule) => Toast {
                    id: rule.id.to_string(),
                    title: rule.title.to_string(),
                    icon: rule.icon.to_string(),
                },
                None => Toast {
                    id: id.to_string(),
                    title: id.to_string(),
                    icon: "🏅".to_string(),
                },
            };
            self.queue.push_back(toast);
        }
        Ok(unlocked)
    }

    pub fn next_toast(&mut self) -> Option<Toast> {
        self.queue.pop_front()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::MemoryStore;

    #[test]
    fn test_commit_is_monotonic_and_deduplicated() {
        let reg = RuleRegistry::builtin();
        let mut store = MemoryStore::new().with_raw(Bucket::UnlockedAchievements, r#"["legacy_rule","journal_1"]"#);
        let mut n = UnlockNotifier::new();

        let set = n.commit(&mut store, &reg, &["journal_1", "craving_1"]).unwrap();
        assert!(set.contains("legacy_rule"));
        assert_eq!(set.len(), 3);

        assert_eq!(n.pending(), 1);
        let toast = n.next_toast().unwrap();
        assert_eq!(toast.id, "craving_1");
        assert_eq!(toast.title, "Riding the Wave");

        let raw = store.read(Bucket::UnlockedAchievements).unwrap().unwrap();
        assert_eq!(raw, r#"["craving_1","journal_1","legacy_rule"]"#);
    }

    struct ReadOnly(MemoryStore);

    impl RecordStore for ReadOnly {
        fn read(&self, bucket: Bucket) -> StoreResult<Option<String>> {
            self.0.read(bucket)
        }

        fn write(&mut self, _: Bucket, _: &str) -> StoreResult<()> {
            Err(StoreError::Backend("read-only".into()))
        }

        fn remove(&mut self, _: Bucket) -> StoreResult<()> {
            Err(StoreError::Backend("read-only".into()))
        }
    }

    #[test]
    fn test_failed_write_queues_nothing() {
        let mut store = ReadOnly(MemoryStore::new());
        let mut n = UnlockNotifier::new();
        assert!(n.commit(&mut store, &RuleRegistry::builtin(), &["journal_1"]).is_err());
        assert_eq!(n.pending(), 0);
    }
}
