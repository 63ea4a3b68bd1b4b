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

//! Graph building driven by a row source or result cursor.
//!
//! These are the reducers and joiners wired to their collaborators: the
//! `query_*` operations fold the rows a [`RowSource`] delivers, the `read_*`
//! operations drain a [`ResultCursor`] level by level. Errors raised by the
//! collaborator are returned as-is.

use crate::join::{join_children, join_nested_children};
use crate::reduce::{NestedLookup, ParentLookup};
use crate::source::{ResultCursor, RowSource};
use crate::split::SplitOn;
use serde::de::DeserializeOwned;
use std::hash::Hash;

/// Query (parent, child) rows and deduplicate parents by their own key.
pub fn query_by_parent_key<Src, P, C, K, KP, A>(
    source: &mut Src,
    split_on: &SplitOn,
    mut parent_key: KP,
    mut attach_child: A,
) -> Result<Vec<P>, Src::Error>
where
    Src: RowSource,
    P: DeserializeOwned,
    C: DeserializeOwned,
    K: Hash + Eq,
    KP: FnMut(&P) -> K,
    A: FnMut(&mut P, C),
{
    let mut lookup = ParentLookup::new();
    source.visit_pairs(split_on, |parent: P, child: C| {
        let key = parent_key(&parent);
        lookup.push(key, parent, child, &mut attach_child);
    })?;
    Ok(lookup.finish())
}

/// Query (parent, child) rows and deduplicate parents by the child's
/// foreign key.
pub fn query_by_child_key<Src, P, C, K, A, KC>(
    source: &mut Src,
    split_on: &SplitOn,
    mut attach_child: A,
    mut child_key: KC,
) -> Result<Vec<P>, Src::Error>
where
    Src: RowSource,
    P: DeserializeOwned,
    C: DeserializeOwned,
    K: Hash + Eq,
    A: FnMut(&mut P, C),
    KC: FnMut(&C) -> K,
{
    let mut lookup = ParentLookup::new();
    source.visit_pairs(split_on, |parent: P, child: C| {
        let key = child_key(&child);
        lookup.push(key, parent, child, &mut attach_child);
    })?;
    Ok(lookup.finish())
}

/// Query (first, second, third) rows, keying each level by its own key.
///
/// `attach_second` runs after the source has delivered its last row.
pub fn query_nested_by_parent_keys<Src, F, S, T, K1, K2, KF, AS, KS, AT>(
    source: &mut Src,
    split_on: &SplitOn,
    mut first_key: KF,
    attach_second: AS,
    mut second_key: KS,
    mut attach_third: AT,
) -> Result<Vec<F>, Src::Error>
where
    Src: RowSource,
    F: DeserializeOwned,
    S: DeserializeOwned,
    T: DeserializeOwned,
    K1: Hash + Eq,
    K2: Hash + Eq,
    KF: FnMut(&F) -> K1,
    AS: FnMut(&mut F, S),
    KS: FnMut(&S) -> K2,
    AT: FnMut(&mut S, T),
{
    let mut lookup = NestedLookup::new();
    source.visit_triples(split_on, |first: F, second: S, third: T| {
        let k1 = first_key(&first);
        let k2 = second_key(&second);
        lookup.push(k1, k2, first, second, third, &mut attach_third);
    })?;
    Ok(lookup.finish(attach_second))
}

/// Query (first, second, third) rows, keying the first level by the second's
/// foreign key and the second level by the third's foreign key.
///
/// `attach_second` runs after the source has delivered its last row.
pub fn query_nested_by_child_keys<Src, F, S, T, K1, K2, AS, KS, AT, KT>(
    source: &mut Src,
    split_on: &SplitOn,
    attach_second: AS,
    mut second_parent_key: KS,
    mut attach_third: AT,
    mut third_parent_key: KT,
) -> Result<Vec<F>, Src::Error>
where
    Src: RowSource,
    F: DeserializeOwned,
    S: DeserializeOwned,
    T: DeserializeOwned,
    K1: Hash + Eq,
    K2: Hash + Eq,
    AS: FnMut(&mut F, S),
    KS: FnMut(&S) -> K1,
    AT: FnMut(&mut S, T),
    KT: FnMut(&T) -> K2,
{
    let mut lookup = NestedLookup::new();
    source.visit_triples(split_on, |first: F, second: S, third: T| {
        let k1 = second_parent_key(&second);
        let k2 = third_parent_key(&third);
        lookup.push(k1, k2, first, second, third, &mut attach_third);
    })?;
    Ok(lookup.finish(attach_second))
}

/// Read two result sets and splice the second into the first.
///
/// The first set defines the output order; see [`join_children`].
pub fn read_children<Cur, F, S, K, KF, A, KS>(
    cursor: &mut Cur,
    first_key: KF,
    attach_children: A,
    second_parent_key: KS,
) -> Result<Vec<F>, Cur::Error>
where
    Cur: ResultCursor,
    F: DeserializeOwned,
    S: DeserializeOwned + Clone,
    K: Hash + Eq,
    KF: FnMut(&F) -> K,
    A: FnMut(&mut F, Vec<S>),
    KS: FnMut(&S) -> K,
{
    let firsts = cursor.read::<F>()?;
    let seconds = cursor.read::<S>()?;
    Ok(join_children(
        firsts,
        seconds,
        first_key,
        attach_children,
        second_parent_key,
    ))
}

/// Read three result sets and splice them into a two-level graph.
///
/// See [`join_nested_children`] for the attachment order.
#[allow(clippy::too_many_arguments)]
pub fn read_nested_children<Cur, F, S, T, K1, K2, KF, AS, KSP, KS, AT, KTP>(
    cursor: &mut Cur,
    first_key: KF,
    attach_seconds: AS,
    second_parent_key: KSP,
    second_key: KS,
    attach_thirds: AT,
    third_parent_key: KTP,
) -> Result<Vec<F>, Cur::Error>
where
    Cur: ResultCursor,
    F: DeserializeOwned,
    S: DeserializeOwned + Clone,
    T: DeserializeOwned + Clone,
    K1: Hash + Eq,
    K2: Hash + Eq,
    KF: FnMut(&F) -> K1,
    AS: FnMut(&mut F, Vec<S>),
    KSP: FnMut(&S) -> K1,
    KS: FnMut(&S) -> K2,
    AT: FnMut(&mut S, Vec<T>),
    KTP: FnMut(&T) -> K2,
{
    let firsts = cursor.read::<F>()?;
    let seconds = cursor.read::<S>()?;
    let thirds = cursor.read::<T>()?;
    Ok(join_nested_children(
        firsts,
        seconds,
        thirds,
        first_key,
        attach_seconds,
        second_parent_key,
        second_key,
        attach_thirds,
        third_parent_key,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;
    use serde::Deserialize;
    use serde_json::{json, Value};
    use std::collections::VecDeque;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Pack {
        id: u32,
        #[serde(default)]
        files: Option<Vec<File>>,
    }

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct File {
        pack_id: u32,
        name: String,
    }

    /// Rows already split into one JSON object per entity.
    struct SplitRows {
        rows: Vec<Vec<Value>>,
        fail_after: Option<usize>,
    }

    impl SplitRows {
        fn entity<T: DeserializeOwned>(row: usize, entity: usize, value: &Value) -> Result<T, GraphError> {
            serde_json::from_value(value.clone()).map_err(|e| GraphError::Materialize {
                row,
                entity,
                message: e.to_string(),
            })
        }

        fn check(&self, delivered: usize) -> Result<(), GraphError> {
            match self.fail_after {
                Some(limit) if delivered == limit => Err(GraphError::Materialize {
                    row: delivered + 1,
                    entity: 0,
                    message: "connection reset".to_string(),
                }),
                _ => Ok(()),
            }
        }
    }

    impl RowSource for SplitRows {
        type Error = GraphError;

        fn visit_pairs<A, B, F>(&mut self, _split_on: &SplitOn, mut combine: F) -> Result<usize, GraphError>
        where
            A: DeserializeOwned,
            B: DeserializeOwned,
            F: FnMut(A, B),
        {
            for (index, row) in self.rows.iter().enumerate() {
                self.check(index)?;
                let a = Self::entity(index + 1, 0, &row[0])?;
                let b = Self::entity(index + 1, 1, &row[1])?;
                combine(a, b);
            }
            Ok(self.rows.len())
        }

        fn visit_triples<A, B, C, F>(
            &mut self,
            _split_on: &SplitOn,
            mut combine: F,
        ) -> Result<usize, GraphError>
        where
            A: DeserializeOwned,
            B: DeserializeOwned,
            C: DeserializeOwned,
            F: FnMut(A, B, C),
        {
            for (index, row) in self.rows.iter().enumerate() {
                self.check(index)?;
                let a = Self::entity(index + 1, 0, &row[0])?;
                let b = Self::entity(index + 1, 1, &row[1])?;
                let c = Self::entity(index + 1, 2, &row[2])?;
                combine(a, b, c);
            }
            Ok(self.rows.len())
        }
    }

    struct Sets(VecDeque<Value>, usize);

    impl ResultCursor for Sets {
        type Error = GraphError;

        fn read<T: DeserializeOwned>(&mut self) -> Result<Vec<T>, GraphError> {
            let set = self.0.pop_front().ok_or(GraphError::NotEnoughResults {
                requested: self.1 - self.0.len() + 1,
                available: self.1,
            })?;
            serde_json::from_value(set).map_err(|e| GraphError::Materialize {
                row: 0,
                entity: 0,
                message: e.to_string(),
            })
        }
    }

    fn sets(values: Vec<Value>) -> Sets {
        let total = values.len();
        Sets(values.into(), total)
    }

    fn attach_file(pack: &mut Pack, file: File) {
        pack.files.get_or_insert_with(Vec::new).push(file);
    }

    fn pack_rows(fail_after: Option<usize>) -> SplitRows {
        SplitRows {
            rows: vec![
                vec![json!({"id": 1}), json!({"pack_id": 1, "name": "F1"})],
                vec![json!({"id": 1}), json!({"pack_id": 1, "name": "F2"})],
                vec![json!({"id": 2}), json!({"pack_id": 2, "name": "F3"})],
            ],
            fail_after,
        }
    }

    #[test]
    fn test_query_by_parent_key() {
        let packs: Vec<Pack> =
            query_by_parent_key(&mut pack_rows(None), &SplitOn::default(), |p: &Pack| p.id, attach_file)
                .unwrap();
        assert_eq!(packs.len(), 2);
        assert_eq!(packs[0].files.as_ref().map(Vec::len), Some(2));
        assert_eq!(packs[1].files.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_query_by_child_key_matches_parent_key() {
        let by_parent: Vec<Pack> =
            query_by_parent_key(&mut pack_rows(None), &SplitOn::default(), |p: &Pack| p.id, attach_file)
                .unwrap();
        let by_child: Vec<Pack> =
            query_by_child_key(&mut pack_rows(None), &SplitOn::default(), attach_file, |f: &File| f.pack_id)
                .unwrap();
        assert_eq!(by_parent, by_child);
    }

    #[test]
    fn test_source_error_propagates_unmodified() {
        let err = query_by_parent_key(
            &mut pack_rows(Some(2)),
            &SplitOn::default(),
            |p: &Pack| p.id,
            attach_file,
        )
        .unwrap_err();
        assert_eq!(
            err,
            GraphError::Materialize {
                row: 3,
                entity: 0,
                message: "connection reset".to_string(),
            }
        );
    }

    #[test]
    fn test_query_nested_by_parent_keys() {
        #[derive(Debug, PartialEq, Deserialize)]
        struct Registry {
            id: u32,
            #[serde(default)]
            packs: Option<Vec<Pack>>,
        }

        let mut rows = SplitRows {
            rows: vec![
                vec![json!({"id": 9}), json!({"id": 1}), json!({"pack_id": 1, "name": "F1"})],
                vec![json!({"id": 9}), json!({"id": 1}), json!({"pack_id": 1, "name": "F2"})],
                vec![json!({"id": 9}), json!({"id": 2}), json!({"pack_id": 2, "name": "F3"})],
            ],
            fail_after: None,
        };

        let registries: Vec<Registry> = query_nested_by_parent_keys(
            &mut rows,
            &SplitOn::default(),
            |r: &Registry| r.id,
            |r: &mut Registry, p: Pack| r.packs.get_or_insert_with(Vec::new).push(p),
            |p: &Pack| p.id,
            attach_file,
        )
        .unwrap();

        assert_eq!(registries.len(), 1);
        let packs = registries[0].packs.as_ref().unwrap();
        assert_eq!(packs.len(), 2);
        assert_eq!(packs[0].files.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_read_children() {
        let mut cursor = sets(vec![
            json!([{"id": 1}, {"id": 2}, {"id": 3}]),
            json!([
                {"pack_id": 2, "name": "F1"},
                {"pack_id": 1, "name": "F2"},
                {"pack_id": 2, "name": "F3"}
            ]),
        ]);

        let packs: Vec<Pack> = read_children(
            &mut cursor,
            |p: &Pack| p.id,
            |p: &mut Pack, files: Vec<File>| p.files = Some(files),
            |f: &File| f.pack_id,
        )
        .unwrap();

        assert_eq!(packs.len(), 3);
        assert_eq!(packs[0].files.as_ref().map(Vec::len), Some(1));
        let names: Vec<_> = packs[1]
            .files
            .as_ref()
            .unwrap()
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["F1", "F3"]);
        assert_eq!(packs[2].files, None);
    }

    #[test]
    fn test_read_children_not_enough_results() {
        let mut cursor = sets(vec![json!([{"id": 1}])]);
        let err = read_children(
            &mut cursor,
            |p: &Pack| p.id,
            |p: &mut Pack, files: Vec<File>| p.files = Some(files),
            |f: &File| f.pack_id,
        )
        .unwrap_err();
        assert_eq!(
            err,
            GraphError::NotEnoughResults {
                requested: 2,
                available: 1,
            }
        );
    }
}
