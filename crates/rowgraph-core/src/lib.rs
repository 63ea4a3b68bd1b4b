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

//! Core reducers and joiners for building entity graphs from query results.
//!
//! A relational query returns rows; an application wants an object graph. This
//! crate supplies the two folds between them:
//!
//! - **Join-row reduction** ([`reduce`], [`query`]): one result set of
//!   flattened rows, where each row carries a parent entity beside one of its
//!   children. Rows are collapsed so each distinct parent appears once with all
//!   of its children attached in row order.
//! - **Multi-result joining** ([`join`], [`query`]): one result set per entity
//!   level. Child levels are grouped by foreign key and spliced into their
//!   parents.
//!
//! Both support two levels (parent → children) and three levels
//! (first → seconds → thirds). Keys are always extracted values supplied by
//! the caller, never entity identity, so keying on the parent or on the
//! child's foreign key gives the same graph.
//!
//! Row delivery and materialisation belong to the collaborators described in
//! [`source`]: a [`RowSource`] splits joined rows at [`SplitOn`] boundaries, a
//! [`ResultCursor`] drains one result set at a time.
//!
//! # Example
//!
//! ```
//! use rowgraph_core::reduce_by_parent_key;
//!
//! #[derive(Debug)]
//! struct Pack { id: &'static str, files: Option<Vec<&'static str>> }
//!
//! let rows = vec![
//!     (Pack { id: "BBFDX", files: None }, "F1"),
//!     (Pack { id: "BBFDX", files: None }, "F2"),
//! ];
//!
//! let packs = reduce_by_parent_key(rows, |p| p.id, |p, f| {
//!     p.files.get_or_insert_with(Vec::new).push(f)
//! });
//!
//! assert_eq!(packs.len(), 1);
//! assert_eq!(packs[0].files, Some(vec!["F1", "F2"]));
//! ```

mod error;
pub mod join;
mod lookup;
pub mod query;
pub mod reduce;
pub mod source;
mod split;

pub use error::{GraphError, Result};
pub use join::{join_children, join_nested_children};
pub use lookup::{GroupTable, Lookup};
pub use query::{
    query_by_child_key, query_by_parent_key, query_nested_by_child_keys,
    query_nested_by_parent_keys, read_children, read_nested_children,
};
pub use reduce::{
    reduce_by_child_key, reduce_by_parent_key, reduce_nested_by_child_keys,
    reduce_nested_by_parent_keys, NestedLookup, ParentLookup,
};
pub use source::{ResultCursor, RowSource};
pub use split::{SplitOn, DEFAULT_SPLIT_ON};
