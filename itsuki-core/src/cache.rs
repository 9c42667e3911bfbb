//! Client-side plan mirror persisted to a local storage slot.
//!
//! The cache holds the traveller's working stop list independently of the
//! server copy: mutations apply locally first and survive restarts via a
//! JSON file named after the historical `travel-plan-storage` slot. The
//! two copies are not transactionally linked; the server side is
//! last-write-wins with no conflict resolution.

use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::{MAX_PLAN_ITEMS, PlanItem};

/// File name of the persistent slot.
pub const STORAGE_SLOT: &str = "travel-plan-storage.json";

/// Errors raised by [`PlanCache`] operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Reading or writing the storage slot failed.
    #[error("failed to access plan storage at {path}: {source}")]
    Io {
        /// Location of the storage slot on disk.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The storage slot held unparseable JSON.
    #[error("failed to decode plan storage at {path}: {source}")]
    Decode {
        /// Location of the storage slot on disk.
        path: PathBuf,
        /// JSON decoding failure.
        #[source]
        source: serde_json::Error,
    },
    /// Encoding the item list failed.
    #[error("failed to encode plan storage: {0}")]
    Encode(#[from] serde_json::Error),
    /// The cache already holds [`MAX_PLAN_ITEMS`] items.
    #[error("the plan already holds the maximum of {MAX_PLAN_ITEMS} items")]
    Full,
}

/// The traveller's local, persistent stop list.
///
/// # Examples
/// ```
/// use itsuki_core::{PlanCache, PlanItem};
///
/// let dir = tempfile::tempdir().unwrap();
/// let mut cache = PlanCache::open(dir.path()).unwrap();
/// assert!(cache.add(PlanItem::new("a")).unwrap());
/// assert!(!cache.add(PlanItem::new("a")).unwrap()); // duplicate suppressed
///
/// let reopened = PlanCache::open(dir.path()).unwrap();
/// assert_eq!(reopened.items().len(), 1);
/// ```
#[derive(Debug)]
pub struct PlanCache {
    path: PathBuf,
    items: Vec<PlanItem>,
}

impl PlanCache {
    /// Open the cache under `dir`, loading the slot file when present.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, CacheError> {
        let path = dir.as_ref().join(STORAGE_SLOT);
        let items = match fs::read_to_string(&path) {
            Ok(payload) => serde_json::from_str(&payload).map_err(|source| CacheError::Decode {
                path: path.clone(),
                source,
            })?,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(source) => {
                return Err(CacheError::Io {
                    path: path.clone(),
                    source,
                });
            }
        };
        Ok(Self { path, items })
    }

    /// The current stop list, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[PlanItem] {
        &self.items
    }

    /// Append a stop, suppressing duplicates by id.
    ///
    /// Returns `false` when a stop with the same id is already planned;
    /// the cache is unchanged in that case. Fails with
    /// [`CacheError::Full`] at the item cap.
    pub fn add(&mut self, item: PlanItem) -> Result<bool, CacheError> {
        if self.items.iter().any(|planned| planned.id == item.id) {
            return Ok(false);
        }
        if self.items.len() >= MAX_PLAN_ITEMS {
            return Err(CacheError::Full);
        }
        self.items.push(item);
        self.persist()?;
        Ok(true)
    }

    /// Remove the stop with `id`, returning whether anything was removed.
    pub fn remove(&mut self, id: &str) -> Result<bool, CacheError> {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        if self.items.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Drop every planned stop.
    pub fn clear(&mut self) -> Result<(), CacheError> {
        self.items.clear();
        self.persist()
    }

    fn persist(&self) -> Result<(), CacheError> {
        let payload = serde_json::to_string(&self.items)?;
        fs::write(&self.path, payload).map_err(|source| CacheError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    fn opens_empty_when_slot_is_absent() {
        let dir = TempDir::new().expect("create temp dir");
        let cache = PlanCache::open(dir.path()).expect("open");
        assert!(cache.items().is_empty());
    }

    #[rstest]
    fn items_survive_reopen() {
        let dir = TempDir::new().expect("create temp dir");
        {
            let mut cache = PlanCache::open(dir.path()).expect("open");
            cache.add(PlanItem::new("a")).expect("add");
            cache.add(PlanItem::new("b")).expect("add");
        }
        let cache = PlanCache::open(dir.path()).expect("reopen");
        let ids: Vec<&str> = cache.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[rstest]
    fn duplicate_add_is_suppressed_without_error() {
        let dir = TempDir::new().expect("create temp dir");
        let mut cache = PlanCache::open(dir.path()).expect("open");
        assert!(cache.add(PlanItem::new("a")).expect("add"));
        assert!(!cache.add(PlanItem::new("a")).expect("add"));
        assert_eq!(cache.items().len(), 1);
    }

    #[rstest]
    fn add_fails_at_the_cap() {
        let dir = TempDir::new().expect("create temp dir");
        let mut cache = PlanCache::open(dir.path()).expect("open");
        for index in 0..MAX_PLAN_ITEMS {
            cache.add(PlanItem::new(index.to_string())).expect("add");
        }
        let overflow = cache.add(PlanItem::new("one-too-many"));
        assert!(matches!(overflow, Err(CacheError::Full)));
    }

    #[rstest]
    fn remove_and_clear_persist() {
        let dir = TempDir::new().expect("create temp dir");
        let mut cache = PlanCache::open(dir.path()).expect("open");
        cache.add(PlanItem::new("a")).expect("add");
        cache.add(PlanItem::new("b")).expect("add");

        assert!(cache.remove("a").expect("remove"));
        assert!(!cache.remove("ghost").expect("remove"));
        cache.clear().expect("clear");

        let reopened = PlanCache::open(dir.path()).expect("reopen");
        assert!(reopened.items().is_empty());
    }

    #[rstest]
    fn corrupt_slot_reports_decode_error() {
        let dir = TempDir::new().expect("create temp dir");
        std::fs::write(dir.path().join(STORAGE_SLOT), b"not json").expect("write");
        let error = PlanCache::open(dir.path()).expect_err("corrupt slot");
        assert!(matches!(error, CacheError::Decode { .. }));
    }
}
