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

//! Join-row reduction.
//!
//! A SQL join repeats the parent columns once per child row. The reducers
//! here fold such a stream back into one node per distinct parent key, with
//! the children of every repeated row attached to that node.
//!
//! Two depths are supported, each with two addressing modes:
//!
//! | Depth | Parent keys | Foreign keys |
//! |-------|-------------|--------------|
//! | first → second | [`reduce_by_parent_key`] | [`reduce_by_child_key`] |
//! | first → second → third | [`reduce_nested_by_parent_keys`] | [`reduce_nested_by_child_keys`] |
//!
//! The parent-key variants read the key off the parent entity; the
//! foreign-key variants read it off the child's back-reference. Both produce
//! the same graph whenever the two keys agree row by row.
//!
//! # Examples
//!
//! ```
//! use rowgraph_core::reduce_by_parent_key;
//!
//! #[derive(Debug, PartialEq)]
//! struct Pack { id: &'static str, files: Option<Vec<&'static str>> }
//!
//! let rows = vec![
//!     (Pack { id: "P1", files: None }, "F1"),
//!     (Pack { id: "P1", files: None }, "F2"),
//!     (Pack { id: "P2", files: None }, "F3"),
//! ];
//!
//! let packs = reduce_by_parent_key(
//!     rows,
//!     |p| p.id,
//!     |p, f| p.files.get_or_insert_with(Vec::new).push(f),
//! );
//!
//! assert_eq!(packs, vec![
//!     Pack { id: "P1", files: Some(vec!["F1", "F2"]) },
//!     Pack { id: "P2", files: Some(vec!["F3"]) },
//! ]);
//! ```

use crate::lookup::Lookup;
use std::hash::Hash;
use tracing::{debug, trace};

/// Accumulator folding (parent, child) rows into deduplicated parents.
///
/// The first parent seen for a key becomes canonical; parents of later rows
/// with an equal key are dropped and their child is attached to the
/// canonical instance instead.
#[derive(Debug)]
pub struct ParentLookup<K, P> {
    parents: Lookup<K, P>,
    rows: usize,
}

impl<K, P> Default for ParentLookup<K, P> {
    fn default() -> Self {
        Self {
            parents: Lookup::default(),
            rows: 0,
        }
    }
}

impl<K: Hash + Eq, P> ParentLookup<K, P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one row, returning the canonical parent for `key`.
    pub fn push<C, A>(&mut self, key: K, parent: P, child: C, attach_child: A) -> &mut P
    where
        A: FnOnce(&mut P, C),
    {
        self.rows += 1;
        let (canonical, inserted) = self.parents.resolve(key, parent);
        if inserted {
            trace!(row = self.rows, "registered parent");
        }
        attach_child(canonical, child);
        canonical
    }

    /// Rows folded so far.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Distinct parents seen so far.
    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Finish the fold, yielding parents in first-seen order.
    pub fn finish(self) -> Vec<P> {
        debug!(
            rows = self.rows,
            parents = self.parents.len(),
            "reduced join rows"
        );
        self.parents.into_values()
    }
}

#[derive(Debug)]
struct Branch<K2, F, S> {
    first: F,
    seconds: Lookup<K2, S>,
}

/// Accumulator folding (first, second, third) rows into a two-level graph.
///
/// Seconds are deduplicated within their first, keyed by value at both
/// levels. Every row appends its third to the canonical second right away;
/// each distinct second is attached to its first exactly once, in first-seen
/// order, when the fold finishes. By then its thirds are all in place.
#[derive(Debug)]
pub struct NestedLookup<K1, K2, F, S> {
    firsts: Lookup<K1, Branch<K2, F, S>>,
    rows: usize,
}

impl<K1, K2, F, S> Default for NestedLookup<K1, K2, F, S> {
    fn default() -> Self {
        Self {
            firsts: Lookup::default(),
            rows: 0,
        }
    }
}

impl<K1: Hash + Eq, K2: Hash + Eq, F, S> NestedLookup<K1, K2, F, S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one row, returning the canonical first for `first_key`.
    pub fn push<T, A>(
        &mut self,
        first_key: K1,
        second_key: K2,
        first: F,
        second: S,
        third: T,
        attach_third: A,
    ) -> &mut F
    where
        A: FnOnce(&mut S, T),
    {
        self.rows += 1;
        let rows = self.rows;

        let (branch, inserted) = self.firsts.resolve_with(first_key, || Branch {
            first,
            seconds: Lookup::new(),
        });
        if inserted {
            trace!(row = rows, "registered first-level entity");
        }

        let (canonical, inserted) = branch.seconds.resolve(second_key, second);
        if inserted {
            trace!(row = rows, "registered second-level entity");
        }
        attach_third(canonical, third);

        &mut branch.first
    }

    /// Rows folded so far.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Distinct firsts seen so far.
    pub fn len(&self) -> usize {
        self.firsts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.firsts.is_empty()
    }

    /// Finish the fold: attach each distinct second to its first and yield
    /// the firsts in first-seen order.
    pub fn finish<A>(self, mut attach_second: A) -> Vec<F>
    where
        A: FnMut(&mut F, S),
    {
        let mut seconds = 0;
        let mut firsts = Vec::with_capacity(self.firsts.len());

        for branch in self.firsts.into_values() {
            let Branch { mut first, seconds: children } = branch;
            for second in children.into_values() {
                attach_second(&mut first, second);
                seconds += 1;
            }
            firsts.push(first);
        }

        debug!(
            rows = self.rows,
            firsts = firsts.len(),
            seconds,
            "reduced nested join rows"
        );
        firsts
    }
}

/// Reduce (parent, child) rows, deduplicating parents by their own key.
///
/// Parents are returned in the order their key first appears; each one
/// carries the children of every row that shared its key, in row order.
pub fn reduce_by_parent_key<P, C, K, I, KP, A>(rows: I, mut parent_key: KP, mut attach_child: A) -> Vec<P>
where
    I: IntoIterator<Item = (P, C)>,
    K: Hash + Eq,
    KP: FnMut(&P) -> K,
    A: FnMut(&mut P, C),
{
    let mut lookup = ParentLookup::new();
    for (parent, child) in rows {
        let key = parent_key(&parent);
        lookup.push(key, parent, child, &mut attach_child);
    }
    lookup.finish()
}

/// Reduce (parent, child) rows, deduplicating parents by the child's
/// foreign key.
///
/// Use this when the parent exposes no key accessor but the child carries a
/// back-reference to it.
pub fn reduce_by_child_key<P, C, K, I, A, KC>(rows: I, mut attach_child: A, mut child_key: KC) -> Vec<P>
where
    I: IntoIterator<Item = (P, C)>,
    K: Hash + Eq,
    A: FnMut(&mut P, C),
    KC: FnMut(&C) -> K,
{
    let mut lookup = ParentLookup::new();
    for (parent, child) in rows {
        let key = child_key(&child);
        lookup.push(key, parent, child, &mut attach_child);
    }
    lookup.finish()
}

/// Reduce (first, second, third) rows, keying each level by its own key.
///
/// A second repeated across rows is attached to its first once and collects
/// the thirds of all those rows.
///
/// `attach_third` runs as rows arrive; `attach_second` runs only after every
/// row has been folded, once per second, in first-seen order.
pub fn reduce_nested_by_parent_keys<F, S, T, K1, K2, I, KF, AS, KS, AT>(
    rows: I,
    mut first_key: KF,
    attach_second: AS,
    mut second_key: KS,
    mut attach_third: AT,
) -> Vec<F>
where
    I: IntoIterator<Item = (F, S, T)>,
    K1: Hash + Eq,
    K2: Hash + Eq,
    KF: FnMut(&F) -> K1,
    AS: FnMut(&mut F, S),
    KS: FnMut(&S) -> K2,
    AT: FnMut(&mut S, T),
{
    let mut lookup = NestedLookup::new();
    for (first, second, third) in rows {
        let k1 = first_key(&first);
        let k2 = second_key(&second);
        lookup.push(k1, k2, first, second, third, &mut attach_third);
    }
    lookup.finish(attach_second)
}

/// Reduce (first, second, third) rows, keying the first level by the
/// second's foreign key and the second level by the third's foreign key.
///
/// As with [`reduce_nested_by_parent_keys`], `attach_second` runs only after
/// every row has been folded.
pub fn reduce_nested_by_child_keys<F, S, T, K1, K2, I, AS, KS, AT, KT>(
    rows: I,
    attach_second: AS,
    mut second_parent_key: KS,
    mut attach_third: AT,
    mut third_parent_key: KT,
) -> Vec<F>
where
    I: IntoIterator<Item = (F, S, T)>,
    K1: Hash + Eq,
    K2: Hash + Eq,
    AS: FnMut(&mut F, S),
    KS: FnMut(&S) -> K1,
    AT: FnMut(&mut S, T),
    KT: FnMut(&T) -> K2,
{
    let mut lookup = NestedLookup::new();
    for (first, second, third) in rows {
        let k1 = second_parent_key(&second);
        let k2 = third_parent_key(&third);
        lookup.push(k1, k2, first, second, third, &mut attach_third);
    }
    lookup.finish(attach_second)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Pack {
        id: u32,
        label: &'static str,
        files: Option<Vec<File>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct File {
        pack_id: u32,
        name: &'static str,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Registry {
        id: u32,
        packs: Option<Vec<Pack>>,
    }

    fn pack(id: u32, label: &'static str) -> Pack {
        Pack {
            id,
            label,
            files: None,
        }
    }

    fn file(pack_id: u32, name: &'static str) -> File {
        File { pack_id, name }
    }

    fn attach_file(pack: &mut Pack, file: File) {
        pack.files.get_or_insert_with(Vec::new).push(file);
    }

    fn attach_pack(registry: &mut Registry, pack: Pack) {
        registry.packs.get_or_insert_with(Vec::new).push(pack);
    }

    fn fan_out_rows() -> Vec<(Pack, File)> {
        vec![
            (pack(1, "a"), file(1, "F1")),
            (pack(1, "a"), file(1, "F2")),
            (pack(2, "b"), file(2, "F3")),
        ]
    }

    #[test]
    fn test_parent_key_collapses_fan_out() {
        let packs = reduce_by_parent_key(fan_out_rows(), |p| p.id, attach_file);

        assert_eq!(packs.len(), 2);
        assert_eq!(packs[0].id, 1);
        assert_eq!(
            packs[0].files,
            Some(vec![file(1, "F1"), file(1, "F2")])
        );
        assert_eq!(packs[1].id, 2);
        assert_eq!(packs[1].files, Some(vec![file(2, "F3")]));
    }

    #[test]
    fn test_child_key_matches_parent_key() {
        let by_parent = reduce_by_parent_key(fan_out_rows(), |p| p.id, attach_file);
        let by_child = reduce_by_child_key(fan_out_rows(), attach_file, |f| f.pack_id);
        assert_eq!(by_parent, by_child);
    }

    #[test]
    fn test_first_seen_parent_instance_is_kept() {
        // Later rows with an equal key but different parent columns are dropped.
        let rows = vec![
            (pack(7, "original"), file(7, "F1")),
            (pack(7, "duplicate"), file(7, "F2")),
        ];
        let packs = reduce_by_parent_key(rows, |p| p.id, attach_file);
        assert_eq!(packs.len(), 1);
        assert_eq!(packs[0].label, "original");
        assert_eq!(packs[0].files.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_order_is_first_appearance_not_key_order() {
        let rows = vec![
            (pack(3, "c"), file(3, "F1")),
            (pack(1, "a"), file(1, "F2")),
            (pack(3, "c"), file(3, "F3")),
            (pack(2, "b"), file(2, "F4")),
            (pack(1, "a"), file(1, "F5")),
        ];
        let packs = reduce_by_parent_key(rows, |p| p.id, attach_file);
        let ids: Vec<u32> = packs.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_empty_stream_yields_empty_graph() {
        let packs = reduce_by_parent_key(Vec::<(Pack, File)>::new(), |p| p.id, attach_file);
        assert!(packs.is_empty());
    }

    #[test]
    fn test_push_returns_canonical_parent() {
        let mut lookup = ParentLookup::new();
        lookup.push(1, pack(1, "first"), file(1, "F1"), attach_file);
        let canonical = lookup.push(1, pack(1, "second"), file(1, "F2"), attach_file);
        assert_eq!(canonical.label, "first");
        assert_eq!(canonical.files.as_ref().map(Vec::len), Some(2));
        assert_eq!(lookup.rows(), 2);
        assert_eq!(lookup.len(), 1);
    }

    fn nested_rows() -> Vec<(Registry, Pack, File)> {
        let registry = |id| Registry { id, packs: None };
        vec![
            (registry(10), pack(1, "a"), file(1, "F1")),
            (registry(10), pack(1, "a"), file(1, "F2")),
            (registry(10), pack(2, "b"), file(2, "F3")),
            (registry(20), pack(3, "c"), file(3, "F4")),
            (registry(10), pack(1, "a"), file(1, "F5")),
        ]
    }

    #[test]
    fn test_nested_attaches_second_once() {
        let registries = reduce_nested_by_parent_keys(
            nested_rows(),
            |r| r.id,
            attach_pack,
            |p| p.id,
            attach_file,
        );

        assert_eq!(registries.len(), 2);
        let packs = registries[0].packs.as_ref().unwrap();
        assert_eq!(packs.len(), 2);
        assert_eq!(packs[0].id, 1);
        assert_eq!(
            packs[0].files,
            Some(vec![file(1, "F1"), file(1, "F2"), file(1, "F5")])
        );
        assert_eq!(packs[1].files, Some(vec![file(2, "F3")]));

        let packs = registries[1].packs.as_ref().unwrap();
        assert_eq!(packs.len(), 1);
        assert_eq!(packs[0].id, 3);
    }

    #[test]
    fn test_nested_child_keys_match_parent_keys() {
        #[derive(Debug, Clone, PartialEq)]
        struct Keyed {
            registry_id: u32,
            pack: Pack,
        }

        let by_parent = reduce_nested_by_parent_keys(
            nested_rows(),
            |r| r.id,
            attach_pack,
            |p| p.id,
            attach_file,
        );

        // Foreign keys live on the children: the pack row carries its registry
        // id, the file row its pack id.
        let keyed: Vec<_> = nested_rows()
            .into_iter()
            .map(|(r, p, f)| {
                let registry_id = r.id;
                (r, Keyed { registry_id, pack: p }, f)
            })
            .collect();
        let by_child = reduce_nested_by_child_keys(
            keyed,
            |r: &mut Registry, k: Keyed| attach_pack(r, k.pack),
            |k| k.registry_id,
            |k, f| attach_file(&mut k.pack, f),
            |f| f.pack_id,
        );

        assert_eq!(by_parent, by_child);
    }

    #[test]
    fn test_nested_seconds_are_scoped_per_first() {
        // The same pack id under two registries yields two distinct packs.
        let rows = vec![
            (Registry { id: 1, packs: None }, pack(5, "x"), file(5, "F1")),
            (Registry { id: 2, packs: None }, pack(5, "y"), file(5, "F2")),
        ];
        let registries =
            reduce_nested_by_parent_keys(rows, |r| r.id, attach_pack, |p| p.id, attach_file);

        assert_eq!(registries.len(), 2);
        assert_eq!(registries[0].packs.as_ref().unwrap()[0].label, "x");
        assert_eq!(registries[1].packs.as_ref().unwrap()[0].label, "y");
    }

    #[test]
    fn test_nested_grandchildren_complete_when_second_attached() {
        let mut observed = Vec::new();
        reduce_nested_by_parent_keys(
            nested_rows(),
            |r| r.id,
            |r: &mut Registry, p: Pack| {
                observed.push((p.id, p.files.as_ref().map_or(0, Vec::len)));
                attach_pack(r, p);
            },
            |p| p.id,
            attach_file,
        );
        assert_eq!(observed, vec![(1, 3), (2, 1), (3, 1)]);
    }

    #[test]
    fn test_nested_lookup_counts() {
        let mut lookup = NestedLookup::new();
        for (r, p, f) in nested_rows() {
            let (k1, k2) = (r.id, p.id);
            lookup.push(k1, k2, r, p, f, attach_file);
        }
        assert_eq!(lookup.rows(), 5);
        assert_eq!(lookup.len(), 2);
        assert!(!lookup.is_empty());
        assert_eq!(lookup.finish(attach_pack).len(), 2);
    }

    #[test]
    fn test_seconds_attached_after_last_row() {
        use std::cell::Cell;

        let consumed = Cell::new(0);
        let rows = vec![
            (Registry { id: 1, packs: None }, pack(1, "a"), file(1, "F1")),
            (Registry { id: 1, packs: None }, pack(2, "b"), file(2, "F2")),
            (Registry { id: 1, packs: None }, pack(1, "a"), file(1, "F3")),
        ];
        let total = rows.len();
        let rows = rows.into_iter().inspect(|_| consumed.set(consumed.get() + 1));

        let mut seen_at = Vec::new();
        let registries = reduce_nested_by_parent_keys(
            rows,
            |r| r.id,
            |r: &mut Registry, p: Pack| {
                seen_at.push((p.id, consumed.get(), p.files.as_ref().map_or(0, Vec::len)));
                attach_pack(r, p);
            },
            |p| p.id,
            attach_file,
        );

        assert_eq!(seen_at, vec![(1, total, 2), (2, total, 1)]);
        assert_eq!(registries[0].packs.as_ref().map(Vec::len), Some(2));
    }
}
