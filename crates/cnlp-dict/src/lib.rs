//! Build-once, read-many dictionaries keyed by strings.
//!
//! A [`Dictionary`] is filled from a finite sequence of `(key, value)` pairs and
//! never changes afterwards. Two flavours are used throughout the workspace:
//! [`LemmaDictionary`] maps `word` or `word/POS` keys to a lemma, and
//! [`CountDictionary`] maps vocabulary entries to the integer id they are
//! counted under.
//!
//! The table reserves room for one and a half times the number of pairs up
//! front. When a key occurs more than once the first value is kept and later
//! ones are dropped.
//!
//! # Example
//! ```rust
//! use cnlp_dict::CountDictionary;
//!
//! # fn main() -> Result<(), cnlp_dict::DictError> {
//! let dict = CountDictionary::build([("kat", 3), ("kater", 3), ("kat", 9)])?;
//! assert_eq!(dict.get("kat"), Some(&3));
//! assert_eq!(dict.duplicates(), 1);
//! # Ok(()) }
//! ```
//!
//! Pair files can be read with [`load_lemma_dictionary`] and
//! [`load_count_dictionary`], either memory-mapped or into an owned buffer.

use std::collections::HashMap;
use std::collections::TryReserveError;
use std::collections::hash_map::Entry;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

mod loader;

pub use loader::{
    LoadMode, load_count_dictionary, load_lemma_dictionary, parse_count_pairs, parse_lemma_pairs,
};

/// Dictionary from `word` or `word/POS` to its lemma.
pub type LemmaDictionary = Dictionary<String>;

/// Dictionary from a vocabulary entry to the id it is counted under.
pub type CountDictionary = Dictionary<i64>;

#[derive(Debug, Error)]
pub enum DictError {
    /// Malformed pair or pair file.
    #[error("{0}")]
    InputShape(String),
    #[error("cannot allocate a table for {requested} entries")]
    Allocation {
        requested: usize,
        #[source]
        source: TryReserveError,
    },
    #[error("hash table full: all {capacity} slots are in use")]
    HashCapacity { capacity: usize },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DictError {
    pub(crate) fn shape(msg: impl Into<String>) -> Self {
        DictError::InputShape(msg.into())
    }
}

/// Immutable string-keyed table built from a sequence of pairs.
#[derive(Debug, Clone)]
pub struct Dictionary<V> {
    table: HashMap<Box<str>, V>,
    capacity: usize,
    duplicates: usize,
}

impl<V> Dictionary<V> {
    /// Build a dictionary, keeping the first value seen for every key.
    ///
    /// Fails with [`DictError::InputShape`] on an empty key, with
    /// [`DictError::Allocation`] if the table cannot be reserved and with
    /// [`DictError::HashCapacity`] if more distinct keys arrive than were
    /// reserved for.
    pub fn build<I, K>(pairs: I) -> Result<Self, DictError>
    where
        I: IntoIterator<Item = (K, V)>,
        I::IntoIter: ExactSizeIterator,
        K: Into<String>,
    {
        let pairs = pairs.into_iter();
        let n = pairs.len();
        let capacity = n * 3 / 2;

        let mut table: HashMap<Box<str>, V> = HashMap::new();
        table
            .try_reserve(capacity)
            .map_err(|source| DictError::Allocation {
                requested: capacity,
                source,
            })?;

        let mut duplicates = 0usize;
        for (idx, (key, value)) in pairs.enumerate() {
            let key: String = key.into();
            if key.is_empty() {
                return Err(DictError::shape(format!("entry {idx}: key is empty")));
            }
            let filled = table.len();
            match table.entry(key.into_boxed_str()) {
                Entry::Occupied(existing) => {
                    debug!("ignoring duplicate key {:?}", existing.key());
                    duplicates += 1;
                }
                Entry::Vacant(slot) => {
                    if filled >= capacity {
                        return Err(DictError::HashCapacity { capacity });
                    }
                    slot.insert(value);
                }
            }
        }

        debug!(
            "built dictionary with {} entries ({} duplicates ignored)",
            table.len(),
            duplicates
        );
        Ok(Self {
            table,
            capacity,
            duplicates,
        })
    }

    /// Exact-match lookup.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.table.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.table.contains_key(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Slots reserved at build time (`1.5 ×` the number of input pairs).
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// How many input pairs were dropped because their key was already present.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.table.iter().map(|(k, v)| (k.as_ref(), v))
    }
}
