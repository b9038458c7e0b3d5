//! On-disk state under `~/.steady` (or `$STEADY_HOME`).
//!
//! Buckets live in `data/<bucketKey>.json`, one file per bucket.

use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use steady_core::{Bucket, RecordStore, StoreResult};

pub fn steady_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("STEADY_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".steady"))
}

pub fn ensure_steady_home() -> Result<PathBuf> {
    let dir = steady_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn data_dir() -> Result<PathBuf> {
    let dir = ensure_steady_home()?.join("data");
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// File-per-bucket [`RecordStore`].
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, bucket: Bucket) -> PathBuf {
        self.root.join(format!("{}.json", bucket.key()))
    }
}

impl RecordStore for FileStore {
    fn read(&self, bucket: Bucket) -> StoreResult<Option<String>> {
        match fs::read_to_string(self.path(bucket)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write to a sibling temp file, then rename over the bucket file.
    fn write(&mut self, bucket: Bucket, json: &str) -> StoreResult<()> {
        let path = self.path(bucket);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, bucket: Bucket) -> StoreResult<()> {
        match fs::remove_file(self.path(bucket)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use steady_core::store::{load_records, prepend_record};
    use steady_core::{CravingEntry, Timestamp};

    #[test]
    fn test_missing_bucket_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.read(Bucket::Journal).unwrap(), None);
    }

    #[test]
    fn test_write_read_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path().join("data")).unwrap();

        let entry = CravingEntry::new(Timestamp::parse("2024-01-02T08:00:00Z").unwrap(), 5);
        prepend_record(&mut store, &entry).unwrap();
        assert!(dir.path().join("data/cravingsHistory.json").exists());
        assert_eq!(load_records::<CravingEntry, _>(&store), vec![entry]);

        store.clear_all().unwrap();
        assert_eq!(store.read(Bucket::Cravings).unwrap(), None);
        assert!(!dir.path().join("data/cravingsHistory.json.tmp").exists());
    }
}
