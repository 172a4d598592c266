// SPDX-License-Identifier: MIT OR Apache-2.0
//! Case-insensitive multi-valued string dictionary.
//!
//! [`IHashMultimap`] stores `(key, value)` entries under the folded form of
//! the key while keeping the original spelling of every stored key. Entries
//! with equivalent keys coexist; lookups and removals match them all.
//!
//! ```
//! use pion_ihash::IHashMultimap;
//!
//! let mut headers = IHashMultimap::new();
//! headers.insert("Content-Type", "text/html");
//! let found = headers.find("CONTENT-TYPE");
//! assert_eq!(found[0].key(), "Content-Type");
//! assert_eq!(found[0].value(), "text/html");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod fold;

pub use fold::CaseFold;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::collections::HashMap;
use std::collections::hash_map::{self, RandomState};
use std::fmt;
use std::hash::BuildHasher;
use std::iter::Flatten;
use tracing::debug;

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// A stored key/value pair; the key keeps its original casing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    key: String,
    value: String,
}

impl Entry {
    /// The key as it was inserted.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The stored value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Split into `(key, value)`.
    pub fn into_parts(self) -> (String, String) {
        (self.key, self.value)
    }
}

impl From<Entry> for (String, String) {
    fn from(entry: Entry) -> Self {
        entry.into_parts()
    }
}

// ---------------------------------------------------------------------------
// IHashMultimap
// ---------------------------------------------------------------------------

/// Hash-based multimap from string keys to string values with
/// case-insensitive keys.
///
/// Entries are grouped in buckets keyed by the folded key. Within a bucket,
/// entries keep their insertion order; the order of buckets is unspecified.
#[derive(Clone)]
pub struct IHashMultimap<S = RandomState> {
    fold: CaseFold,
    buckets: HashMap<String, Vec<Entry>, S>,
    len: usize,
}

impl IHashMultimap {
    /// Create an empty map with ASCII folding.
    pub fn new() -> Self {
        Self::with_fold(CaseFold::default())
    }

    /// Create an empty map with the given fold rule.
    pub fn with_fold(fold: CaseFold) -> Self {
        Self::with_fold_and_hasher(fold, RandomState::new())
    }

    /// Create an empty map with room for `capacity` distinct keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fold: CaseFold::default(),
            buckets: HashMap::with_capacity(capacity),
            len: 0,
        }
    }
}

impl Default for IHashMultimap {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: BuildHasher> IHashMultimap<S> {
    /// Create an empty map using `hasher` for the folded keys.
    pub fn with_fold_and_hasher(fold: CaseFold, hasher: S) -> Self {
        Self {
            fold,
            buckets: HashMap::with_hasher(hasher),
            len: 0,
        }
    }

    /// The fold rule keys are compared with.
    pub fn fold(&self) -> CaseFold {
        self.fold
    }

    /// Total number of entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Add an entry. Existing entries with an equivalent key are kept.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let folded = self.fold.fold(&key).into_owned();
        self.buckets.entry(folded).or_default().push(Entry {
            key,
            value: value.into(),
        });
        self.len += 1;
    }

    /// All entries whose key is equivalent to `key`, in insertion order.
    pub fn find(&self, key: &str) -> &[Entry] {
        match self.buckets.get(&*self.fold.fold(key)) {
            Some(bucket) => bucket,
            None => &[],
        }
    }

    /// The value of the first entry whose key is equivalent to `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.find(key).first().map(Entry::value)
    }

    /// Returns `true` if any entry's key is equivalent to `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        !self.find(key).is_empty()
    }

    /// Number of entries whose key is equivalent to `key`.
    pub fn count(&self, key: &str) -> usize {
        self.find(key).len()
    }

    /// Remove every entry whose key is equivalent to `key`.
    ///
    /// Returns the number of entries removed.
    pub fn erase(&mut self, key: &str) -> usize {
        let removed = self
            .buckets
            .remove(&*self.fold.fold(key))
            .map_or(0, |bucket| bucket.len());
        self.len -= removed;
        if removed > 0 {
            debug!(target: "pion.ihash", key, removed, "erased entries");
        }
        removed
    }

    /// Remove the first entry whose key is equivalent to `key` and whose
    /// value equals `value`.
    pub fn remove_value(&mut self, key: &str, value: &str) -> Option<Entry> {
        let folded = self.fold.fold(key);
        let bucket = self.buckets.get_mut(&*folded)?;
        let index = bucket.iter().position(|e| e.value == value)?;
        let entry = bucket.remove(index);
        if bucket.is_empty() {
            self.buckets.remove(&*folded);
        }
        self.len -= 1;
        Some(entry)
    }

    /// Keep only the entries for which `keep` returns `true`.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str, &str) -> bool,
    {
        self.buckets.retain(|_, bucket| {
            bucket.retain(|e| keep(&e.key, &e.value));
            !bucket.is_empty()
        });
        self.len = self.buckets.values().map(Vec::len).sum();
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.len = 0;
    }

    /// Iterate over all entries.
    pub fn iter(&self) -> Iter<'_> {
        self.buckets.values().flatten()
    }
}

/// Borrowing iterator over the entries of an [`IHashMultimap`].
pub type Iter<'a> = Flatten<hash_map::Values<'a, String, Vec<Entry>>>;

/// Owning iterator over the entries of an [`IHashMultimap`].
pub type IntoIter = Flatten<hash_map::IntoValues<String, Vec<Entry>>>;

impl<'a, S: BuildHasher> IntoIterator for &'a IHashMultimap<S> {
    type Item = &'a Entry;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S> IntoIterator for IHashMultimap<S> {
    type Item = Entry;
    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.buckets.into_values().flatten()
    }
}

impl<K, V, S> Extend<(K, V)> for IHashMultimap<S>
where
    K: Into<String>,
    V: Into<String>,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for IHashMultimap<S>
where
    K: Into<String>,
    V: Into<String>,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_fold_and_hasher(CaseFold::default(), S::default());
        map.extend(iter);
        map
    }
}

impl<S: BuildHasher> fmt::Debug for IHashMultimap<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|e| (e.key(), e.value())))
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Serialization support
// ---------------------------------------------------------------------------

/// Serialized shape of a map.
///
/// ASCII-folded maps are a plain sequence of `[key, value]` pairs. Any other
/// rule is written as `{ "fold": ..., "entries": [...] }` so that it
/// survives a round-trip.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum Repr {
    Pairs(Vec<(String, String)>),
    Folded {
        fold: CaseFold,
        entries: Vec<(String, String)>,
    },
}

struct Pairs<'a, S>(&'a IHashMultimap<S>);

impl<S: BuildHasher> Serialize for Pairs<'_, S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        serializer.collect_seq(self.0.iter().map(|e| (e.key(), e.value())))
    }
}

impl<S: BuildHasher> Serialize for IHashMultimap<S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        if self.fold == CaseFold::Ascii {
            return Pairs(self).serialize(serializer);
        }
        let mut state = serializer.serialize_struct("IHashMultimap", 2)?;
        state.serialize_field("fold", &self.fold)?;
        state.serialize_field("entries", &Pairs(self))?;
        state.end()
    }
}

impl<'de, S: BuildHasher + Default> Deserialize<'de> for IHashMultimap<S> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (fold, entries) = match Repr::deserialize(deserializer)? {
            Repr::Pairs(entries) => (CaseFold::Ascii, entries),
            Repr::Folded { fold, entries } => (fold, entries),
        };
        let mut map = Self::with_fold_and_hasher(fold, S::default());
        map.extend(entries);
        Ok(map)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(Entry::key).collect()
    }

    #[test]
    fn find_ignores_case_and_keeps_original_key() {
        let mut map = IHashMultimap::new();
        map.insert("Content-Type", "text/html");
        let found = map.find("CONTENT-TYPE");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].key(), "Content-Type");
        assert_eq!(found[0].value(), "text/html");
    }

    #[test]
    fn equivalent_keys_coexist() {
        let mut map = IHashMultimap::new();
        map.insert("X", "1");
        map.insert("x", "2");
        assert_eq!(map.len(), 2);
        assert_eq!(keys(map.find("X")), ["X", "x"]);
        assert_eq!(map.count("x"), 2);
    }

    #[test]
    fn erase_removes_every_casing() {
        let mut map = IHashMultimap::new();
        map.insert("X", "1");
        map.insert("x", "2");
        map.insert("Y", "3");
        assert_eq!(map.erase("x"), 2);
        assert!(map.find("X").is_empty());
        assert_eq!(map.len(), 1);
        assert_eq!(map.erase("x"), 0);
    }

    #[test]
    fn find_missing_is_empty() {
        let map = IHashMultimap::new();
        assert!(map.find("Host").is_empty());
        assert_eq!(map.get("Host"), None);
        assert!(!map.contains_key("Host"));
    }

    #[test]
    fn get_returns_first_inserted() {
        let mut map = IHashMultimap::new();
        map.insert("Set-Cookie", "a=1");
        map.insert("set-cookie", "b=2");
        assert_eq!(map.get("SET-COOKIE"), Some("a=1"));
    }

    #[test]
    fn remove_value_removes_one_entry() {
        let mut map = IHashMultimap::new();
        map.insert("Accept", "text/html");
        map.insert("ACCEPT", "application/json");
        let removed = map.remove_value("accept", "application/json").unwrap();
        assert_eq!(removed.key(), "ACCEPT");
        assert_eq!(map.len(), 1);
        assert_eq!(map.remove_value("accept", "image/png"), None);
        assert!(map.remove_value("accept", "text/html").is_some());
        assert!(map.is_empty());
        assert!(!map.contains_key("accept"));
    }

    #[test]
    fn retain_filters_entries() {
        let mut map: IHashMultimap = [("A", "1"), ("a", "2"), ("B", "3")].into_iter().collect();
        map.retain(|_, v| v != "2");
        assert_eq!(map.len(), 2);
        assert_eq!(keys(map.find("a")), ["A"]);
        map.retain(|k, _| k != "B");
        assert!(!map.contains_key("b"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn clear_empties_the_map() {
        let mut map: IHashMultimap = [("A", "1"), ("B", "2")].into_iter().collect();
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.iter().count(), 0);
    }

    #[test]
    fn unicode_fold_matches_expansions() {
        let mut map = IHashMultimap::with_fold(CaseFold::Unicode);
        map.insert("Straße", "x");
        assert_eq!(map.get("STRASSE"), Some("x"));

        let mut ascii = IHashMultimap::new();
        ascii.insert("Straße", "x");
        assert_eq!(ascii.get("STRASSE"), None);
        assert_eq!(ascii.get("STRAßE"), Some("x"));
    }

    #[test]
    fn iteration_yields_every_entry() {
        let map: IHashMultimap = [("A", "1"), ("a", "2"), ("B", "3")].into_iter().collect();
        let mut pairs: Vec<(String, String)> = map.into_iter().map(Into::into).collect();
        pairs.sort();
        assert_eq!(
            pairs,
            [
                ("A".to_string(), "1".to_string()),
                ("B".to_string(), "3".to_string()),
                ("a".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn debug_lists_pairs() {
        let mut map = IHashMultimap::new();
        map.insert("Host", "example.com");
        assert_eq!(format!("{map:?}"), r#"[("Host", "example.com")]"#);
    }
}
