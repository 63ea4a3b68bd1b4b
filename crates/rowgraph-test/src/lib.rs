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

//! Shared test fixtures and in-memory row sources for rowgraph.
//!
//! This crate provides a canonical registry → pack → file dataset, the
//! collaborators that deliver it to the graph builder, and an order-insensitive
//! comparison for the graphs built from it.
//!
//! # Quick Start
//!
//! ```rust
//! use rowgraph_core::{query_by_child_key, SplitOn};
//! use rowgraph_test::{packs_equivalent, Dataset, FileEntry, Pack, PACK_FILE_SPLIT};
//!
//! let dataset = Dataset::sample();
//! let mut table = dataset.pack_file_table();
//!
//! let packs: Vec<Pack> = query_by_child_key(
//!     &mut table,
//!     &SplitOn::parse(PACK_FILE_SPLIT).unwrap(),
//!     Pack::attach_file,
//!     FileEntry::pack_key,
//! )
//! .unwrap();
//!
//! assert_eq!(packs_equivalent(&dataset.expected_packs(), &packs), Ok(()));
//! ```

/// Registry, pack and file fixtures.
pub mod fixtures;

/// `serde_json`-backed row sources.
pub mod sources;

/// Graph comparison ignoring collection order.
pub mod equivalence;

pub use equivalence::{files_equivalent, packs_equivalent, registries_equivalent};
pub use fixtures::*;
pub use sources::{JsonResultSets, JsonRows};
