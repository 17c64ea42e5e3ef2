//! Dictionary-backed token counting.
//!
//! Text is split on spaces and newlines; each token is optionally projected
//! through a [`TransformMode`] and looked up in a [`CountDictionary`]. Tokens
//! missing from the dictionary are ignored, which makes the dictionary double
//! as vocabulary and stop-word filter. Tokens a transform cannot parse are
//! skipped.
//!
//! Ownership of the text decides whether lowercasing copies it:
//! [`count`] borrows and lowercases a private copy, [`count_in_place`] takes
//! the buffer exclusively and lowercases it where it stands.

use std::collections::BTreeMap;
use std::collections::btree_map;

use cnlp_dict::CountDictionary;
use cnlp_types::TransformMode;
use tracing::{debug, trace};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CountOptions {
    /// ASCII-lowercase the text before splitting.
    pub lowercase: bool,
    pub transform: TransformMode,
}

/// Occurrence counts keyed by dictionary id.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FrequencyMap {
    counts: BTreeMap<i64, u64>,
}

impl FrequencyMap {
    fn record(&mut self, id: i64) {
        *self.counts.entry(id).or_insert(0) += 1;
    }

    pub fn get(&self, id: i64) -> Option<u64> {
        self.counts.get(&id).copied()
    }

    /// Number of distinct ids.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Entries in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, u64)> + '_ {
        self.counts.iter().map(|(id, n)| (*id, *n))
    }

    pub fn into_inner(self) -> BTreeMap<i64, u64> {
        self.counts
    }
}

impl IntoIterator for FrequencyMap {
    type Item = (i64, u64);
    type IntoIter = btree_map::IntoIter<i64, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.into_iter()
    }
}

impl FromIterator<(i64, u64)> for FrequencyMap {
    fn from_iter<I: IntoIterator<Item = (i64, u64)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

/// Lazy, restartable sequence of the non-empty pieces between spaces and newlines.
#[derive(Clone, Debug)]
pub struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let start = self.rest.trim_start_matches(is_delimiter);
        if start.is_empty() {
            self.rest = start;
            return None;
        }
        let end = start.find(is_delimiter).unwrap_or(start.len());
        let (token, rest) = start.split_at(end);
        self.rest = rest;
        Some(token)
    }
}

pub fn tokens(text: &str) -> Tokens<'_> {
    Tokens { rest: text }
}

fn is_delimiter(c: char) -> bool {
    c == ' ' || c == '\n'
}

/// Count `text` without touching the caller's buffer.
pub fn count(text: &str, dict: &CountDictionary, options: CountOptions) -> FrequencyMap {
    if options.lowercase {
        let lowered = text.to_ascii_lowercase();
        count_tokens(tokens(&lowered), dict, options.transform)
    } else {
        count_tokens(tokens(text), dict, options.transform)
    }
}

/// Count `text`, lowercasing the buffer itself when asked to.
pub fn count_in_place(
    text: &mut String,
    dict: &CountDictionary,
    options: CountOptions,
) -> FrequencyMap {
    if options.lowercase {
        text.make_ascii_lowercase();
    }
    count_tokens(tokens(text), dict, options.transform)
}

/// Count with an explicit choice between working on a copy and reusing `text`.
///
/// With `duplicate_text` unset and lowercasing requested, `text` is left
/// lowercased afterwards.
pub fn count_with(
    text: &mut String,
    duplicate_text: bool,
    dict: &CountDictionary,
    options: CountOptions,
) -> FrequencyMap {
    if duplicate_text {
        count(text, dict, options)
    } else {
        count_in_place(text, dict, options)
    }
}

/// Project and look up already split tokens.
pub fn count_tokens<'a, I>(tokens: I, dict: &CountDictionary, transform: TransformMode) -> FrequencyMap
where
    I: IntoIterator<Item = &'a str>,
{
    let mut freq = FrequencyMap::default();
    let (mut seen, mut skipped, mut matched) = (0usize, 0usize, 0usize);

    for token in tokens {
        seen += 1;
        let key = match transform.apply(token) {
            Ok(key) => key,
            Err(err) => {
                debug!("skipping token {token:?}: {err}");
                skipped += 1;
                continue;
            }
        };
        if let Some(&id) = dict.get(&key) {
            freq.record(id);
            matched += 1;
        }
    }

    trace!(seen, skipped, matched, %transform, "counted tokens");
    freq
}
