// Dweve Rowgraph - Result-set graph builder
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Lookup and group tables shared by the reducers and joiners.
//!
//! - [`Lookup`] maps a key to the first instance seen with it and remembers
//!   insertion order, so folding a fan-out row stream keeps parents in the
//!   order their keys first appeared.
//! - [`GroupTable`] groups a fully drained child sequence by foreign key,
//!   keeping each group in input order.

use indexmap::map::Entry;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::hash::Hash;

/// First-seen ordered lookup table.
///
/// Once a key is registered it keeps pointing at the same instance; later
/// candidates for an equal key are dropped.
///
/// # Examples
///
/// ```
/// use rowgraph_core::Lookup;
///
/// let mut lookup = Lookup::new();
/// let (first, inserted) = lookup.resolve("P1", vec!["a"]);
/// assert!(inserted);
/// first.push("b");
///
/// let (again, inserted) = lookup.resolve("P1", vec!["ignored"]);
/// assert!(!inserted);
/// assert_eq!(again, &vec!["a", "b"]);
/// ```
#[derive(Debug, Clone)]
pub struct Lookup<K, V> {
    entries: IndexMap<K, V>,
}

impl<K, V> Default for Lookup<K, V> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<K: Hash + Eq, V> Lookup<K, V> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table with room for `capacity` keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Return the canonical instance for `key`, registering `candidate` when
    /// the key is new. The flag is `true` if the candidate was registered.
    pub fn resolve(&mut self, key: K, candidate: V) -> (&mut V, bool) {
        self.resolve_with(key, || candidate)
    }

    /// Like [`resolve`](Self::resolve), building the candidate only when the
    /// key is new.
    pub fn resolve_with<F>(&mut self, key: K, make: F) -> (&mut V, bool)
    where
        F: FnOnce() -> V,
    {
        match self.entries.entry(key) {
            Entry::Occupied(entry) => (entry.into_mut(), false),
            Entry::Vacant(entry) => (entry.insert(make()), true),
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the registered keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }

    /// Iterate over the canonical instances in first-seen order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values()
    }

    /// Consume the table, yielding the canonical instances in first-seen order.
    pub fn into_values(self) -> Vec<V> {
        self.entries.into_values().collect()
    }
}

/// Children grouped by the foreign key pointing at their parent.
///
/// Built in one pass over a drained child sequence before any splicing.
/// A group can be claimed by any number of parents sharing its key; the table
/// records which groups were claimed so unmatched children can be reported.
///
/// # Examples
///
/// ```
/// use rowgraph_core::GroupTable;
///
/// let files = vec![("P1", "F1"), ("P2", "F3"), ("P1", "F2")];
/// let mut groups = GroupTable::build(files, |f| f.0);
///
/// assert_eq!(groups.claim(&"P1"), Some(&[("P1", "F1"), ("P1", "F2")][..]));
/// assert_eq!(groups.claim(&"P1").map(<[_]>::len), Some(2));
/// assert_eq!(groups.unmatched_groups(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct GroupTable<K, V> {
    groups: HashMap<K, Group<V>>,
    members: usize,
}

#[derive(Debug, Clone)]
struct Group<V> {
    members: Vec<V>,
    claimed: bool,
}

impl<K: Hash + Eq, V> GroupTable<K, V> {
    /// Group `items` by `key_of`, preserving input order within each group.
    pub fn build<I, F>(items: I, mut key_of: F) -> Self
    where
        I: IntoIterator<Item = V>,
        F: FnMut(&V) -> K,
    {
        let mut groups: HashMap<K, Group<V>> = HashMap::new();
        let mut members = 0;
        for item in items {
            groups
                .entry(key_of(&item))
                .or_insert_with(|| Group {
                    members: Vec::new(),
                    claimed: false,
                })
                .members
                .push(item);
            members += 1;
        }
        Self { groups, members }
    }

    /// Borrow the group for `key` without marking it claimed.
    pub fn get(&self, key: &K) -> Option<&[V]> {
        self.groups.get(key).map(|group| group.members.as_slice())
    }

    /// Borrow the group for `key` and mark it claimed.
    pub fn claim(&mut self, key: &K) -> Option<&[V]> {
        self.groups.get_mut(key).map(|group| {
            group.claimed = true;
            group.members.as_slice()
        })
    }

    /// Number of items the table was built from.
    pub fn member_count(&self) -> usize {
        self.members
    }

    /// Number of distinct keys.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of groups no parent has claimed.
    pub fn unmatched_groups(&self) -> usize {
        self.groups.values().filter(|group| !group.claimed).count()
    }
}
