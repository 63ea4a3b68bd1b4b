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

//! Registry → pack → file entities.
//!
//! Field names serialize as the upper-case column names of the tables they
//! are read from (`ID`, `GU_CODE`, `REGISTRY_ID`, ...). Child collections are
//! `None` until something attaches to them.

use serde::{Deserialize, Serialize};

/// A registry: the top level of the fixture graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Registry {
    pub id: String,
    pub income: String,
    pub gu_code: i64,
    pub no: i64,
    #[serde(default)]
    pub signed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packs: Option<Vec<Pack>>,
}

/// A pack of files, optionally owned by a registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Pack {
    pub id: String,
    pub gu_code: i64,
    pub no: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<FileEntry>>,
}

/// A file belonging to a pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct FileEntry {
    pub id: String,
    pub pack_id: String,
    pub no: i64,
    pub snils: String,
}

impl Registry {
    /// Append one pack, creating the collection on first use.
    pub fn attach_pack(&mut self, pack: Pack) {
        self.packs.get_or_insert_with(Vec::new).push(pack);
    }

    /// Replace the pack collection with a joined group.
    pub fn set_packs(&mut self, packs: Vec<Pack>) {
        self.packs = Some(packs);
    }

    /// Registry key, as used by the first lookup level.
    pub fn key(&self) -> String {
        self.id.clone()
    }
}

impl Pack {
    /// Append one file, creating the collection on first use.
    pub fn attach_file(&mut self, file: FileEntry) {
        self.files.get_or_insert_with(Vec::new).push(file);
    }

    /// Replace the file collection with a joined group.
    pub fn set_files(&mut self, files: Vec<FileEntry>) {
        self.files = Some(files);
    }

    pub fn key(&self) -> String {
        self.id.clone()
    }

    /// Foreign key to the owning registry; empty for unowned packs.
    pub fn registry_key(&self) -> String {
        self.registry_id.clone().unwrap_or_default()
    }

    /// The pack as selected without its registry column.
    pub fn detached(&self) -> Pack {
        Pack {
            registry_id: None,
            ..self.clone()
        }
    }
}

impl FileEntry {
    pub fn pack_key(&self) -> String {
        self.pack_id.clone()
    }
}
