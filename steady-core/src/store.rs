//! Record storage abstraction.
//!
//! Every tool persists into one named bucket holding a JSON value: an array of
//! entries, or a single object for plans and the profile. The [`RecordStore`]
//! trait only moves raw JSON text per bucket; the typed helpers in this module
//! do the (de)serialization and decide how to recover from bad data.
//!
//! Loading is forgiving: a missing or corrupt bucket becomes its default, and a
//! malformed entry inside an otherwise valid array is dropped on its own.
//! Both cases are logged and never returned as errors.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::error::StoreResult;
use crate::records::Record;

/// Named persistent bucket. Keys are the storage contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bucket {
    Journal,
    Cravings,
    Breathing,
    Grounding,
    Gratitude,
    ThoughtDiary,
    Meditation,
    Values,
    Audit,
    Adhd,
    OppositeAction,
    ProblemSolving,
    Goals,
    SafetyPlan,
    RelapsePreventionPlan,
    UserProfile,
    LoginHistory,
    EventHistory,
    UnlockedAchievements,
}

impl Bucket {
    pub const ALL: [Bucket; 19] = [
        Bucket::Journal,
        Bucket::Cravings,
        Bucket::Breathing,
        Bucket::Grounding,
        Bucket::Gratitude,
        Bucket::ThoughtDiary,
        Bucket::Meditation,
        Bucket::Values,
        Bucket::Audit,
        Bucket::Adhd,
        Bucket::OppositeAction,
        Bucket::ProblemSolving,
        Bucket::Goals,
        Bucket::SafetyPlan,
        Bucket::RelapsePreventionPlan,
        Bucket::UserProfile,
        Bucket::LoginHistory,
        Bucket::EventHistory,
        Bucket::UnlockedAchievements,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Bucket::Journal => "journalHistory",
            Bucket::Cravings => "cravingsHistory",
            Bucket::Breathing => "breathingHistory",
            Bucket::Grounding => "groundingHistory",
            Bucket::Gratitude => "gratitudeHistory",
            Bucket::ThoughtDiary => "thoughtDiaryHistory",
            Bucket::Meditation => "meditationHistory",
            Bucket::Values => "valuesHistory",
            Bucket::Audit => "auditHistory",
            Bucket::Adhd => "adhdHistory",
            Bucket::OppositeAction => "oppositeActionHistory",
            Bucket::ProblemSolving => "problemSolvingHistory",
            Bucket::Goals => "goals",
            Bucket::SafetyPlan => "safetyPlan",
            Bucket::RelapsePreventionPlan => "relapsePreventionPlan",
            Bucket::UserProfile => "userProfile",
            Bucket::LoginHistory => "loginHistory",
            Bucket::EventHistory => "eventHistory",
            Bucket::UnlockedAchievements => "unlockedAchievements",
        }
    }

    pub fn from_key(key: &str) -> Option<Bucket> {
        Bucket::ALL.into_iter().find(|b| b.key() == key)
    }

    /// Single-object buckets (everything else is an array).
    pub fn is_document(&self) -> bool {
        matches!(
            self,
            Bucket::SafetyPlan | Bucket::RelapsePreventionPlan | Bucket::UserProfile
        )
    }
}

/// Raw key-value access to bucket payloads.
///
/// `write` replaces the whole bucket. Implementations must make a completed
/// `write` visible to the next `read`.
pub trait RecordStore {
    /// Raw JSON for a bucket, or `None` if it was never written.
    fn read(&self, bucket: Bucket) -> StoreResult<Option<String>>;

    fn write(&mut self, bucket: Bucket, json: &str) -> StoreResult<()>;

    fn remove(&mut self, bucket: Bucket) -> StoreResult<()>;

    /// Full account reset.
    fn clear_all(&mut self) -> StoreResult<()> {
        for bucket in Bucket::ALL {
            self.remove(bucket)?;
        }
        Ok(())
    }
}

/// In-memory store for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    buckets: HashMap<Bucket, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a bucket with raw text (may be deliberately malformed).
    pub fn with_raw(mut self, bucket: Bucket, raw: impl Into<String>) -> Self {
        self.buckets.insert(bucket, raw.into());
        self
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn read(&self, bucket: Bucket) -> StoreResult<Option<String>> {
        Ok(self.buckets.get(&bucket).cloned())
    }

    fn write(&mut self, bucket: Bucket, json: &str) -> StoreResult<()> {
        self.buckets.insert(bucket, json.to_string());
        Ok(())
    }

    fn remove(&mut self, bucket: Bucket) -> StoreResult<()> {
        self.buckets.remove(&bucket);
        Ok(())
    }
}

// ============================================================================
// Typed helpers
// ============================================================================

/// Parsed JSON of a bucket, or `None` when absent, unreadable or corrupt.
fn read_value<S: RecordStore + ?Sized>(store: &S, bucket: Bucket) -> Option<Value> {
    let raw = match store.read(bucket) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(bucket = bucket.key(), error = %e, "bucket unreadable, using default");
            return None;
        }
    };
    if raw.trim().is_empty() {
        return None;
    }
    match serde_json::from_str(&raw) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(bucket = bucket.key(), error = %e, "bucket is not valid JSON, using default");
            None
        }
    }
}

/// Load an array bucket; malformed entries are skipped individually.
pub fn load_list<T: DeserializeOwned, S: RecordStore + ?Sized>(store: &S, bucket: Bucket) -> Vec<T> {
    let items = match read_value(store, bucket) {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => return Vec::new(),
        Some(_) => {
            warn!(bucket = bucket.key(), "bucket is not an array, using default");
            return Vec::new();
        }
    };

    let total = items.len();
    let out: Vec<T> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();
    if out.len() < total {
        warn!(
            bucket = bucket.key(),
            skipped = total - out.len(),
            "dropped malformed entries"
        );
    }
    out
}

/// Load the entries of a record type from its bucket.
pub fn load_records<R: Record, S: RecordStore + ?Sized>(store: &S) -> Vec<R> {
    load_list(store, R::BUCKET)
}

/// Load an object bucket.
///
/// `None` stands for the "empty object": absent, corrupt, not an object, or
/// `{}`. An object with at least one key is always `Some`, falling back to
/// `T::default()` if it cannot be read as `T`.
pub fn load_document<T: DeserializeOwned + Default, S: RecordStore + ?Sized>(store: &S, bucket: Bucket) -> Option<T> {
    match read_value(store, bucket)? {
        Value::Object(map) if map.is_empty() => None,
        value @ Value::Object(_) => match serde_json::from_value(value) {
            Ok(doc) => Some(doc),
            Err(e) => {
                warn!(bucket = bucket.key(), error = %e, "document has wrong shape, using default");
                Some(T::default())
            }
        },
        _ => {
            warn!(bucket = bucket.key(), "bucket is not an object, using default");
            None
        }
    }
}

/// Set one key of an object bucket, leaving every other key as stored.
///
/// A bucket that is absent or not an object starts from `{}`.
pub fn set_document_field<T: Serialize, S: RecordStore + ?Sized>(
    store: &mut S,
    bucket: Bucket,
    key: &str,
    value: &T,
) -> StoreResult<()> {
    let mut map = match read_value(store, bucket) {
        Some(Value::Object(map)) => map,
        _ => serde_json::Map::new(),
    };
    map.insert(key.to_string(), serde_json::to_value(value)?);
    let json = serde_json::to_string(&map)?;
    store.write(bucket, &json)
}

/// Raw entries of an array bucket, parseable or not.
///
/// For read-modify-write of lists whose unparseable entries must survive.
pub fn load_raw_list<S: RecordStore + ?Sized>(store: &S, bucket: Bucket) -> Vec<Value> {
    match read_value(store, bucket) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

/// Replace an array bucket.
pub fn save_list<T: Serialize, S: RecordStore + ?Sized>(store: &mut S, bucket: Bucket, items: &[T]) -> StoreResult<()> {
    let json = serde_json::to_string(items)?;
    store.write(bucket, &json)
}

/// Replace an object bucket.
pub fn save_document<T: Serialize, S: RecordStore + ?Sized>(store: &mut S, bucket: Bucket, doc: &T) -> StoreResult<()> {
    let json = serde_json::to_string(doc)?;
    store.write(bucket, &json)
}

/// Prepend one value to an array bucket (newest first).
///
/// Works on raw JSON so entries this build cannot parse are kept as they are.
/// A corrupt bucket is replaced by a fresh array holding only the new value.
pub fn prepend<T: Serialize, S: RecordStore + ?Sized>(store: &mut S, bucket: Bucket, item: &T) -> StoreResult<()> {
    let mut items = load_raw_list(store, bucket);
    items.insert(0, serde_json::to_value(item)?);
    let json = serde_json::to_string(&items)?;
    store.write(bucket, &json)
}

/// Prepend a typed record to its bucket.
pub fn prepend_record<R: Record, S: RecordStore + ?Sized>(store: &mut S, record: &R) -> StoreResult<()> {
    prepend(store, R::BUCKET, record)
}
