use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::StorageError;

/// String key-value storage backing persisted timeline state.
///
/// `keys` reports entries oldest-write first; quota pruning relies on it.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// In-process store with an optional byte quota.
///
/// Used headless and in tests; `unavailable()` models storage that refuses
/// every access, such as private browsing modes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: IndexMap<String, String>,
    quota_bytes: Option<usize>,
    unavailable: bool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose keys and values together may not exceed `quota_bytes`.
    #[must_use]
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn set_available(&mut self, available: bool) {
        self.unavailable = !available;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn used_bytes(&self) -> usize {
        self.entries
            .iter()
            .map(|(key, value)| key.len() + value.len())
            .sum()
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable(
                "memory store disabled".to_owned(),
            ));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check_available()?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_available()?;
        if let Some(quota) = self.quota_bytes {
            let existing = self
                .entries
                .get(key)
                .map_or(0, |previous| key.len() + previous.len());
            let used = self.used_bytes() - existing;
            let needed = key.len() + value.len();
            if used + needed > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_owned(),
                    needed,
                    available: quota.saturating_sub(used),
                });
            }
        }
        // Rewrites move the key to the newest position.
        self.entries.shift_remove(key);
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.check_available()?;
        self.entries.shift_remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        self.check_available()?;
        Ok(self.entries.keys().cloned().collect())
    }
}

/// Removes all but the `retain_recent` newest keys containing `marker`.
///
/// `protected` is never removed. Returns the number of keys deleted.
pub fn prune_stale_keys<S: KeyValueStore + ?Sized>(
    store: &mut S,
    marker: &str,
    protected: &str,
    retain_recent: usize,
) -> Result<usize, StorageError> {
    let candidates: Vec<String> = store
        .keys()?
        .into_iter()
        .filter(|key| key.contains(marker) && key != protected)
        .collect();
    let stale = candidates.len().saturating_sub(retain_recent);
    for key in &candidates[..stale] {
        store.remove(key)?;
    }
    if stale > 0 {
        debug!(removed = stale, marker, "pruned stale storage keys");
    }
    Ok(stale)
}

/// How a persisted write ended. Failures are absorbed, never raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// First attempt hit the quota; succeeded after pruning `pruned` keys.
    WrittenAfterPrune { pruned: usize },
    Dropped(StorageError),
}

impl WriteOutcome {
    #[must_use]
    pub fn is_written(&self) -> bool {
        !matches!(self, Self::Dropped(_))
    }
}

/// Writes `value`, pruning once and retrying once on a quota failure.
pub fn write_with_quota_recovery<S: KeyValueStore + ?Sized>(
    store: &mut S,
    key: &str,
    value: &str,
    marker: &str,
    retain_recent: usize,
) -> WriteOutcome {
    let err = match store.set(key, value) {
        Ok(()) => return WriteOutcome::Written,
        Err(err) => err,
    };
    warn!(key, error = %err, "persisted write failed");
    if !err.is_quota_exceeded() {
        return WriteOutcome::Dropped(err);
    }

    let pruned = match prune_stale_keys(store, marker, key, retain_recent) {
        Ok(pruned) => pruned,
        Err(prune_err) => {
            warn!(key, error = %prune_err, "storage pruning failed");
            0
        }
    };
    match store.set(key, value) {
        Ok(()) => WriteOutcome::WrittenAfterPrune { pruned },
        Err(retry_err) => {
            warn!(key, error = %retry_err, "persisted write failed after pruning, giving up");
            WriteOutcome::Dropped(retry_err)
        }
    }
}
