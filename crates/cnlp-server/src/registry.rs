use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use cnlp_dict::{CountDictionary, LemmaDictionary};
use dashmap::DashMap;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

/// Live dictionaries addressed by opaque numeric handles.
///
/// Handles are never reused; a dictionary is freed once it has been removed
/// and the last in-flight request holding it has finished.
#[derive(Debug)]
pub struct Registry {
    dictionaries: DashMap<u64, DictionaryEntry>,
    next_handle: AtomicU64,
}

#[derive(Debug, Clone)]
pub enum DictionaryEntry {
    Lemma(Arc<LemmaDictionary>),
    Count(Arc<CountDictionary>),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DictionaryKind {
    Lemma,
    Count,
}

impl fmt::Display for DictionaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DictionaryKind::Lemma => "lemma",
            DictionaryKind::Count => "count",
        })
    }
}

impl DictionaryEntry {
    pub fn kind(&self) -> DictionaryKind {
        match self {
            DictionaryEntry::Lemma(_) => DictionaryKind::Lemma,
            DictionaryEntry::Count(_) => DictionaryKind::Count,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            DictionaryEntry::Lemma(dict) => dict.len(),
            DictionaryEntry::Count(dict) => dict.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown dictionary handle {0}")]
    UnknownHandle(u64),
    #[error("dictionary {handle} is a {actual} dictionary, expected a {expected} dictionary")]
    WrongKind {
        handle: u64,
        expected: DictionaryKind,
        actual: DictionaryKind,
    },
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            dictionaries: DashMap::new(),
            next_handle: AtomicU64::new(1),
        }
    }

    pub fn insert(&self, entry: DictionaryEntry) -> u64 {
        let handle = self.next_handle.fetch_add(1, Ordering::Relaxed);
        info!(
            "registered {} dictionary with {} entries as handle {handle}",
            entry.kind(),
            entry.len()
        );
        self.dictionaries.insert(handle, entry);
        handle
    }

    pub fn insert_lemma(&self, dict: LemmaDictionary) -> u64 {
        self.insert(DictionaryEntry::Lemma(Arc::new(dict)))
    }

    pub fn insert_count(&self, dict: CountDictionary) -> u64 {
        self.insert(DictionaryEntry::Count(Arc::new(dict)))
    }

    pub fn get(&self, handle: u64) -> Result<DictionaryEntry, RegistryError> {
        self.dictionaries
            .get(&handle)
            .map(|entry| entry.value().clone())
            .ok_or(RegistryError::UnknownHandle(handle))
    }

    pub fn lemma(&self, handle: u64) -> Result<Arc<LemmaDictionary>, RegistryError> {
        match self.get(handle)? {
            DictionaryEntry::Lemma(dict) => Ok(dict),
            other => Err(RegistryError::WrongKind {
                handle,
                expected: DictionaryKind::Lemma,
                actual: other.kind(),
            }),
        }
    }

    pub fn count(&self, handle: u64) -> Result<Arc<CountDictionary>, RegistryError> {
        match self.get(handle)? {
            DictionaryEntry::Count(dict) => Ok(dict),
            other => Err(RegistryError::WrongKind {
                handle,
                expected: DictionaryKind::Count,
                actual: other.kind(),
            }),
        }
    }

    /// Unregister a dictionary, returning it if the handle was live.
    pub fn remove(&self, handle: u64) -> Option<DictionaryEntry> {
        let removed = self.dictionaries.remove(&handle).map(|(_, entry)| entry);
        if let Some(entry) = &removed {
            info!("dropped {} dictionary handle {handle}", entry.kind());
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.dictionaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dictionaries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts() -> CountDictionary {
        CountDictionary::build([("de", 1), ("het", 2)]).unwrap()
    }

    #[test]
    fn hands_out_fresh_handles() {
        let registry = Registry::new();
        let a = registry.insert_count(counts());
        let b = registry.insert_count(counts());
        assert_ne!(a, b);
        assert!(registry.remove(a).is_some());
        let c = registry.insert_count(counts());
        assert_ne!(c, a);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn checks_dictionary_kind() {
        let registry = Registry::new();
        let handle = registry.insert_count(counts());
        assert_eq!(registry.count(handle).unwrap().get("het"), Some(&2));
        let err = registry.lemma(handle).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::WrongKind {
                expected: DictionaryKind::Lemma,
                actual: DictionaryKind::Count,
                ..
            }
        ));
    }

    #[test]
    fn removed_handles_are_unknown() {
        let registry = Registry::new();
        let handle = registry.insert_count(counts());
        let held = registry.count(handle).unwrap();
        registry.remove(handle);
        assert!(matches!(
            registry.count(handle),
            Err(RegistryError::UnknownHandle(h)) if h == handle
        ));
        assert!(registry.remove(handle).is_none());
        // outstanding references stay usable until dropped
        assert_eq!(held.get("de"), Some(&1));
        assert!(registry.is_empty());
    }
}
