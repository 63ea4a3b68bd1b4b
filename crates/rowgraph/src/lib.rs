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

//! # Rowgraph - Result-set graph builder
//!
//! Rowgraph turns relational query results into nested entity graphs. It
//! covers the two shapes a query can return:
//!
//! - one joined result set, where each row repeats its parents beside a child;
//! - several result sets, one per entity level, linked by foreign keys.
//!
//! ## Quick Start
//!
//! ```rust
//! use rowgraph::{join_children, reduce_by_parent_key};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Pack { id: u32, files: Option<Vec<&'static str>> }
//!
//! // One joined result set.
//! let rows = vec![
//!     (Pack { id: 1, files: None }, "F1"),
//!     (Pack { id: 2, files: None }, "F2"),
//!     (Pack { id: 1, files: None }, "F3"),
//! ];
//! let reduced = reduce_by_parent_key(rows, |p| p.id, |p, f| {
//!     p.files.get_or_insert_with(Vec::new).push(f)
//! });
//!
//! // The same data as two result sets.
//! let packs = vec![Pack { id: 1, files: None }, Pack { id: 2, files: None }];
//! let files = vec![(1, "F1"), (2, "F2"), (1, "F3")];
//! let joined = join_children(
//!     packs,
//!     files,
//!     |p| p.id,
//!     |p, fs| p.files = Some(fs.into_iter().map(|(_, f)| f).collect()),
//!     |f| f.0,
//! );
//!
//! assert_eq!(reduced, joined);
//! ```
//!
//! ## Modules
//!
//! - [`prelude`]: the traits and types most callers need
//!
//! ### Optional Row Sources (feature-gated)
//!
//! - `csv`: CSV row sources and result cursors (feature = "csv")

pub use rowgraph_core::{
    // Join-row reduction
    reduce_by_child_key,
    reduce_by_parent_key,
    reduce_nested_by_child_keys,
    reduce_nested_by_parent_keys,
    // Multi-result joining
    join_children,
    join_nested_children,
    // Source-driven operations
    query_by_child_key,
    query_by_parent_key,
    query_nested_by_child_keys,
    query_nested_by_parent_keys,
    read_children,
    read_nested_children,
    // Accumulators
    GroupTable,
    Lookup,
    NestedLookup,
    ParentLookup,
    // Collaborators
    ResultCursor,
    RowSource,
    SplitOn,
    DEFAULT_SPLIT_ON,
    // Errors
    GraphError,
    Result,
};

pub mod prelude {
    //! Commonly used traits and types
    pub use rowgraph_core::{GraphError, ResultCursor, RowSource, SplitOn};
}

/// CSV row sources (requires `csv` feature)
#[cfg(feature = "csv")]
pub mod csv {
    pub use rowgraph_csv::{
        CsvError, CsvResultSets, CsvRows, CsvSourceConfig, Result as CsvResult, DEFAULT_MAX_ROWS,
    };
}

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse a split specification such as `"REGISTRY_ID,PACK_ID"`.
///
/// # Examples
///
/// ```rust
/// let split = rowgraph::split_on("REGISTRY_ID,PACK_ID").unwrap();
/// assert_eq!(split.columns().len(), 2);
/// ```
#[inline]
pub fn split_on(spec: &str) -> Result<SplitOn> {
    SplitOn::parse(spec)
}
