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

//! CSV row sources and result cursors for rowgraph.
//!
//! This crate lets CSV text stand in for a query result when building entity
//! graphs with `rowgraph-core`.
//!
//! # Features
//!
//! - **Joined rows**: [`CsvRows`] is a [`RowSource`](rowgraph_core::RowSource)
//!   that splits each record into entities at `SplitOn` columns
//! - **Multiple results**: [`CsvResultSets`] is a
//!   [`ResultCursor`](rowgraph_core::ResultCursor) over one CSV input per level
//! - **Configurable**: custom delimiters, whitespace trimming and a row limit
//! - **Error handling**: failures carry the record and entity they occurred at
//!
//! # Examples
//!
//! ## Reducing joined rows
//!
//! ```
//! use rowgraph_core::{query_by_child_key, SplitOn};
//! use rowgraph_csv::CsvRows;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Pack {
//!     #[serde(rename = "ID")]
//!     id: String,
//!     #[serde(skip)]
//!     files: Option<Vec<File>>,
//! }
//!
//! #[derive(Deserialize)]
//! struct File {
//!     #[serde(rename = "PACK_ID")]
//!     pack_id: String,
//!     #[serde(rename = "ID")]
//!     id: String,
//! }
//!
//! let csv_data = "ID,PACK_ID,ID\nBBFDX,BBFDX,F1\nBBFDY,BBFDY,F2\nBBFDX,BBFDX,F3\n";
//!
//! let packs: Vec<Pack> = query_by_child_key(
//!     &mut CsvRows::from_text(csv_data),
//!     &SplitOn::parse("PACK_ID").unwrap(),
//!     |p: &mut Pack, f| p.files.get_or_insert_with(Vec::new).push(f),
//!     |f: &File| f.pack_id.clone(),
//! )
//! .unwrap();
//!
//! assert_eq!(packs.len(), 2);
//! assert_eq!(packs[0].files.as_ref().unwrap()[1].id, "F3");
//! ```
//!
//! ## Joining result sets
//!
//! ```
//! use rowgraph_core::read_children;
//! use rowgraph_csv::CsvResultSets;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Pack {
//!     #[serde(rename = "ID")]
//!     id: String,
//!     #[serde(skip)]
//!     files: Vec<File>,
//! }
//!
//! #[derive(Clone, Deserialize)]
//! struct File {
//!     #[serde(rename = "PACK_ID")]
//!     pack_id: String,
//! }
//!
//! let mut sets = CsvResultSets::from_texts(&["ID\nBBFDX\n", "PACK_ID\nBBFDX\nBBFDX\n"]);
//! let packs: Vec<Pack> = read_children(
//!     &mut sets,
//!     |p: &Pack| p.id.clone(),
//!     |p: &mut Pack, files| p.files = files,
//!     |f: &File| f.pack_id.clone(),
//! )
//! .unwrap();
//!
//! assert_eq!(packs[0].files.len(), 2);
//! ```

mod error;
mod result_sets;
mod rows;

pub use error::{CsvError, Result};
pub use result_sets::CsvResultSets;
pub use rows::{CsvRows, CsvSourceConfig, DEFAULT_MAX_ROWS};
