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

//! Multi-result joining.
//!
//! When each entity level arrives as its own complete result set, no row
//! fan-out needs collapsing. Instead the child levels are grouped by their
//! foreign keys up front and spliced into their parents in one walk over the
//! top level.
//!
//! Every parent whose key matches a group receives its own copy of that group,
//! so parents sharing a key each get the full set of children. A parent
//! without a matching group is left untouched: its child collection is
//! neither created nor cleared.

use crate::lookup::GroupTable;
use std::hash::Hash;
use tracing::debug;

/// Splice `seconds` into `firsts`, grouped by their foreign key.
///
/// `firsts` defines the output order. Each first whose key has a group
/// receives a copy of the whole group, in the order the seconds arrived.
///
/// # Examples
///
/// ```
/// use rowgraph_core::join_children;
///
/// #[derive(Debug, PartialEq)]
/// struct Pack { id: u32, files: Option<Vec<(u32, &'static str)>> }
///
/// let packs = vec![Pack { id: 1, files: None }, Pack { id: 2, files: None }];
/// let files = vec![(1, "F1"), (1, "F2")];
///
/// let packs = join_children(packs, files, |p| p.id, |p, fs| p.files = Some(fs), |f| f.0);
///
/// assert_eq!(packs[0].files, Some(vec![(1, "F1"), (1, "F2")]));
/// assert_eq!(packs[1].files, None);
/// ```
pub fn join_children<F, S, K, IF, IS, KF, A, KS>(
    firsts: IF,
    seconds: IS,
    mut first_key: KF,
    mut attach_children: A,
    second_parent_key: KS,
) -> Vec<F>
where
    IF: IntoIterator<Item = F>,
    IS: IntoIterator<Item = S>,
    S: Clone,
    K: Hash + Eq,
    KF: FnMut(&F) -> K,
    A: FnMut(&mut F, Vec<S>),
    KS: FnMut(&S) -> K,
{
    let mut firsts: Vec<F> = firsts.into_iter().collect();
    let mut groups = GroupTable::build(seconds, second_parent_key);

    for first in firsts.iter_mut() {
        if let Some(children) = groups.claim(&first_key(&*first)) {
            attach_children(first, children.to_vec());
        }
    }

    debug!(
        firsts = firsts.len(),
        seconds = groups.member_count(),
        unmatched_groups = groups.unmatched_groups(),
        "joined result sets"
    );
    firsts
}

/// Splice two child levels into `firsts`.
///
/// Seconds are grouped by their foreign key to the first level, thirds by
/// their foreign key to the second level. For every first with a group, each
/// second in the group receives its thirds before the group is attached to
/// the first, so `attach_seconds` always sees complete grandchildren.
///
/// Thirds are grouped by their second-level key alone: seconds sharing a key
/// under different firsts each receive the same thirds.
#[allow(clippy::too_many_arguments)]
pub fn join_nested_children<F, S, T, K1, K2, IF, IS, IT, KF, AS, KSP, KS, AT, KTP>(
    firsts: IF,
    seconds: IS,
    thirds: IT,
    mut first_key: KF,
    mut attach_seconds: AS,
    second_parent_key: KSP,
    mut second_key: KS,
    mut attach_thirds: AT,
    third_parent_key: KTP,
) -> Vec<F>
where
    IF: IntoIterator<Item = F>,
    IS: IntoIterator<Item = S>,
    IT: IntoIterator<Item = T>,
    S: Clone,
    T: Clone,
    K1: Hash + Eq,
    K2: Hash + Eq,
    KF: FnMut(&F) -> K1,
    AS: FnMut(&mut F, Vec<S>),
    KSP: FnMut(&S) -> K1,
    KS: FnMut(&S) -> K2,
    AT: FnMut(&mut S, Vec<T>),
    KTP: FnMut(&T) -> K2,
{
    let mut firsts: Vec<F> = firsts.into_iter().collect();
    let mut second_groups = GroupTable::build(seconds, second_parent_key);
    let mut third_groups = GroupTable::build(thirds, third_parent_key);

    for first in firsts.iter_mut() {
        let Some(group) = second_groups.claim(&first_key(&*first)) else {
            continue;
        };
        let mut group = group.to_vec();
        for second in group.iter_mut() {
            if let Some(children) = third_groups.claim(&second_key(&*second)) {
                attach_thirds(second, children.to_vec());
            }
        }
        attach_seconds(first, group);
    }

    debug!(
        firsts = firsts.len(),
        seconds = second_groups.member_count(),
        thirds = third_groups.member_count(),
        unmatched_second_groups = second_groups.unmatched_groups(),
        unmatched_third_groups = third_groups.unmatched_groups(),
        "joined nested result sets"
    );
    firsts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Registry {
        id: &'static str,
        packs: Option<Vec<Pack>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Pack {
        id: &'static str,
        registry_id: &'static str,
        files: Option<Vec<File>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct File {
        id: &'static str,
        pack_id: &'static str,
    }

    fn registry(id: &'static str) -> Registry {
        Registry { id, packs: None }
    }

    fn pack(id: &'static str, registry_id: &'static str) -> Pack {
        Pack {
            id,
            registry_id,
            files: None,
        }
    }

    fn file(id: &'static str, pack_id: &'static str) -> File {
        File { id, pack_id }
    }

    fn set_files(pack: &mut Pack, files: Vec<File>) {
        pack.files = Some(files);
    }

    fn set_packs(registry: &mut Registry, packs: Vec<Pack>) {
        registry.packs = Some(packs);
    }

    #[test]
    fn test_join_children_groups_by_foreign_key() {
        let packs = vec![pack("P1", "R1"), pack("P2", "R1")];
        let files = vec![file("F1", "P1"), file("F3", "P2"), file("F2", "P1")];

        let packs = join_children(packs, files, |p| p.id, set_files, |f| f.pack_id);

        assert_eq!(packs[0].files, Some(vec![file("F1", "P1"), file("F2", "P1")]));
        assert_eq!(packs[1].files, Some(vec![file("F3", "P2")]));
    }

    #[test]
    fn test_join_children_keeps_first_order() {
        let packs = vec![pack("P3", "R1"), pack("P1", "R1"), pack("P2", "R1")];
        let packs = join_children(packs, Vec::<File>::new(), |p| p.id, set_files, |f| f.pack_id);
        let ids: Vec<_> = packs.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["P3", "P1", "P2"]);
    }

    #[test]
    fn test_missing_group_leaves_children_untouched() {
        let mut preset = pack("P2", "R1");
        preset.files = Some(Vec::new());
        let packs = vec![pack("P1", "R1"), preset];

        let packs = join_children(
            packs,
            vec![file("F9", "P404")],
            |p| p.id,
            set_files,
            |f| f.pack_id,
        );

        assert_eq!(packs[0].files, None);
        assert_eq!(packs[1].files, Some(Vec::new()));
    }

    #[test]
    fn test_duplicate_first_keys_each_receive_group() {
        let packs = vec![pack("P1", "R1"), pack("P1", "R2")];
        let packs = join_children(
            packs,
            vec![file("F1", "P1"), file("F2", "P1")],
            |p| p.id,
            set_files,
            |f| f.pack_id,
        );
        let expected = Some(vec![file("F1", "P1"), file("F2", "P1")]);
        assert_eq!(packs[0].files, expected);
        assert_eq!(packs[1].files, expected);
    }

    #[test]
    fn test_shared_second_key_under_two_firsts() {
        let registries = join_nested_children(
            vec![registry("R1"), registry("R2")],
            vec![pack("P5", "R1"), pack("P5", "R2")],
            vec![file("F1", "P5"), file("F2", "P5")],
            |r| r.id,
            set_packs,
            |p| p.registry_id,
            |p| p.id,
            set_files,
            |f| f.pack_id,
        );

        let expected = Some(vec![file("F1", "P5"), file("F2", "P5")]);
        for (registry, owner) in registries.iter().zip(["R1", "R2"]) {
            let packs = registry.packs.as_ref().unwrap();
            assert_eq!(packs.len(), 1);
            assert_eq!(packs[0].registry_id, owner);
            assert_eq!(packs[0].files, expected);
        }
    }

    #[test]
    fn test_join_nested_children() {
        let registries = vec![registry("R1"), registry("R2"), registry("R3")];
        let packs = vec![pack("P1", "R1"), pack("P2", "R2"), pack("P3", "R1")];
        let files = vec![file("F1", "P1"), file("F2", "P3"), file("F3", "P1")];

        let registries = join_nested_children(
            registries,
            packs,
            files,
            |r| r.id,
            set_packs,
            |p| p.registry_id,
            |p| p.id,
            set_files,
            |f| f.pack_id,
        );

        let r1 = registries[0].packs.as_ref().unwrap();
        assert_eq!(r1.len(), 2);
        assert_eq!(r1[0].id, "P1");
        assert_eq!(r1[0].files, Some(vec![file("F1", "P1"), file("F3", "P1")]));
        assert_eq!(r1[1].id, "P3");
        assert_eq!(r1[1].files, Some(vec![file("F2", "P3")]));

        // P2 has no files: its collection stays unset.
        let r2 = registries[1].packs.as_ref().unwrap();
        assert_eq!(r2[0].files, None);

        assert_eq!(registries[2].packs, None);
    }

    #[test]
    fn test_thirds_attached_before_seconds() {
        let mut observed = Vec::new();
        join_nested_children(
            vec![registry("R1")],
            vec![pack("P1", "R1"), pack("P2", "R1")],
            vec![file("F1", "P2"), file("F2", "P1"), file("F3", "P2")],
            |r| r.id,
            |r: &mut Registry, packs: Vec<Pack>| {
                for p in &packs {
                    observed.push((p.id, p.files.as_ref().map_or(0, Vec::len)));
                }
                r.packs = Some(packs);
            },
            |p| p.registry_id,
            |p| p.id,
            set_files,
            |f| f.pack_id,
        );
        assert_eq!(observed, vec![("P1", 1), ("P2", 2)]);
    }

    #[test]
    fn test_orphan_seconds_are_dropped() {
        let registries = join_nested_children(
            vec![registry("R1")],
            vec![pack("P1", "R1"), pack("P9", "R404")],
            vec![file("F1", "P9")],
            |r| r.id,
            set_packs,
            |p| p.registry_id,
            |p| p.id,
            set_files,
            |f| f.pack_id,
        );
        let packs = registries[0].packs.as_ref().unwrap();
        assert_eq!(packs.len(), 1);
        assert_eq!(packs[0].id, "P1");
        assert_eq!(packs[0].files, None);
    }
}
