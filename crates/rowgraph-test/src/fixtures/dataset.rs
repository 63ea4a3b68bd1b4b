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

//! Normalised registry/pack/file tables and the views queried from them.
//!
//! A [`Dataset`] holds the three tables flat, children unset. Every other
//! shape a test needs is derived from it:
//!
//! - joined rows, as a query with `join` would return them;
//! - one result set per level, as a multi-statement query would return them;
//! - the graph both folds are expected to produce.
//!
//! Column orders follow the selects the fixtures model:
//!
//! ```text
//! pack/file join:           ID,GU_CODE,NO | PACK_ID,ID,NO,SNILS
//! registry/pack/file join:  ID,INCOME,GU_CODE,NO,SIGNED | REGISTRY_ID,ID,GU_CODE,NO | PACK_ID,ID,NO,SNILS
//! ```
//!
//! Packs in the two-level views carry no `REGISTRY_ID`.

use super::entities::{FileEntry, Pack, Registry};
use crate::sources::{JsonResultSets, JsonRows};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Registry columns in select order.
pub const REGISTRY_COLUMNS: [&str; 5] = ["ID", "INCOME", "GU_CODE", "NO", "SIGNED"];
/// Pack columns when selected without the registry.
pub const PACK_COLUMNS: [&str; 3] = ["ID", "GU_CODE", "NO"];
/// Pack columns when selected beneath a registry.
pub const OWNED_PACK_COLUMNS: [&str; 4] = ["REGISTRY_ID", "ID", "GU_CODE", "NO"];
/// File columns in select order.
pub const FILE_COLUMNS: [&str; 4] = ["PACK_ID", "ID", "NO", "SNILS"];

/// Split columns for the pack/file join.
pub const PACK_FILE_SPLIT: &str = "PACK_ID";
/// Split columns for the registry/pack/file join.
pub const REGISTRY_PACK_FILE_SPLIT: &str = "REGISTRY_ID,PACK_ID";

/// Flat registry, pack and file tables.
///
/// Both [`sample`](Dataset::sample) and [`generate`](Dataset::generate)
/// give every pack at least one file and list files so that packs first
/// appear in table order. Under those conditions the join-row reducers and
/// the multi-result joiners produce the same graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub registries: Vec<Registry>,
    pub packs: Vec<Pack>,
    pub files: Vec<FileEntry>,
}

impl Dataset {
    /// Two registries, four packs (one without a registry) and six files.
    ///
    /// Files of `BBFDX` and `BBFDY` are interleaved so joined rows do not
    /// arrive grouped by parent.
    pub fn sample() -> Self {
        Self {
            registries: vec![
                registry("R1", "2024-01-15", 101, 1, Some("2024-01-20")),
                registry("R2", "2024-02-01", 102, 2, None),
            ],
            packs: vec![
                pack("BBFDX", 101, 1, Some("R1")),
                pack("BBFDY", 101, 2, Some("R1")),
                pack("CCA01", 102, 1, Some("R2")),
                pack("ZZ001", 900, 1, None),
            ],
            files: vec![
                file("F1", "BBFDX", 1, "112-233-445 95"),
                file("F2", "BBFDY", 1, "112-233-445 96"),
                file("F3", "BBFDX", 2, "112-233-445 97"),
                file("F4", "CCA01", 1, "112-233-445 98"),
                file("F5", "CCA01", 2, "112-233-445 99"),
                file("F6", "ZZ001", 1, "112-233-446 00"),
            ],
        }
    }

    /// A dataset of `registries` registries, each owning `packs_per_registry`
    /// packs of `files_per_pack` files.
    ///
    /// Files are laid out round-robin across all packs, so consecutive join
    /// rows never share a parent unless there is only one pack.
    pub fn generate(registries: usize, packs_per_registry: usize, files_per_pack: usize) -> Self {
        let mut dataset = Self::default();

        for r in 0..registries {
            let registry_id = format!("R{:04}", r);
            let signed = (r % 2 == 0).then_some("2024-03-01");
            dataset.registries.push(registry(
                &registry_id,
                "2024-02-15",
                100 + r as i64,
                r as i64 + 1,
                signed,
            ));
            for p in 0..packs_per_registry {
                let pack_id = format!("P{:04}-{:03}", r, p);
                dataset
                    .packs
                    .push(pack(&pack_id, 100 + r as i64, p as i64 + 1, Some(&registry_id)));
            }
        }

        for f in 0..files_per_pack {
            for (p, owner) in dataset.packs.iter().enumerate() {
                let id = format!("F{:06}", f * dataset.packs.len() + p);
                let snils = format!("{:03}-{:03}-{:03} {:02}", p % 1000, f % 1000, p % 997, f % 100);
                dataset.files.push(file(&id, &owner.id, f as i64 + 1, &snils));
            }
        }

        dataset
    }

    fn pack_index(&self) -> HashMap<&str, &Pack> {
        self.packs.iter().map(|p| (p.id.as_str(), p)).collect()
    }

    fn registry_index(&self) -> HashMap<&str, &Registry> {
        self.registries.iter().map(|r| (r.id.as_str(), r)).collect()
    }

    /// Packs with a registry, in table order.
    pub fn owned_packs(&self) -> Vec<Pack> {
        self.packs
            .iter()
            .filter(|p| p.registry_id.is_some())
            .cloned()
            .collect()
    }

    /// Rows of the pack/file inner join, one per file, in file order.
    pub fn pack_file_rows(&self) -> Vec<(Pack, FileEntry)> {
        let packs = self.pack_index();
        self.files
            .iter()
            .filter_map(|f| packs.get(f.pack_id.as_str()).map(|p| (p.detached(), f.clone())))
            .collect()
    }

    /// Rows of the registry/pack/file inner join, one per owned file, in file order.
    pub fn registry_pack_file_rows(&self) -> Vec<(Registry, Pack, FileEntry)> {
        let packs = self.pack_index();
        let registries = self.registry_index();
        self.files
            .iter()
            .filter_map(|f| {
                let pack = packs.get(f.pack_id.as_str())?;
                let registry = registries.get(pack.registry_id.as_deref()?)?;
                Some(((*registry).clone(), (*pack).clone(), f.clone()))
            })
            .collect()
    }

    /// Packs without registry column, each holding its files in file order.
    ///
    /// Packs without files keep `files` unset.
    pub fn expected_packs(&self) -> Vec<Pack> {
        self.packs
            .iter()
            .map(|p| {
                let mut pack = p.detached();
                self.fill_files(&mut pack);
                pack
            })
            .collect()
    }

    /// Registries holding their owned packs, each pack holding its files.
    ///
    /// Registries without packs keep `packs` unset.
    pub fn expected_registries(&self) -> Vec<Registry> {
        self.registries
            .iter()
            .map(|r| {
                let mut registry = r.clone();
                let packs: Vec<Pack> = self
                    .packs
                    .iter()
                    .filter(|p| p.registry_id.as_deref() == Some(r.id.as_str()))
                    .map(|p| {
                        let mut pack = p.clone();
                        self.fill_files(&mut pack);
                        pack
                    })
                    .collect();
                if !packs.is_empty() {
                    registry.packs = Some(packs);
                }
                registry
            })
            .collect()
    }

    fn fill_files(&self, pack: &mut Pack) {
        let files: Vec<FileEntry> = self
            .files
            .iter()
            .filter(|f| f.pack_id == pack.id)
            .cloned()
            .collect();
        if !files.is_empty() {
            pack.files = Some(files);
        }
    }

    /// The pack/file join as an in-memory row source.
    pub fn pack_file_table(&self) -> JsonRows {
        let rows = self
            .pack_file_rows()
            .iter()
            .map(|(p, f)| [cells(p, &PACK_COLUMNS), cells(f, &FILE_COLUMNS)].concat())
            .collect();
        JsonRows::new(header(&[&PACK_COLUMNS[..], &FILE_COLUMNS[..]]), rows)
    }

    /// The registry/pack/file join as an in-memory row source.
    pub fn registry_pack_file_table(&self) -> JsonRows {
        let rows = self
            .registry_pack_file_rows()
            .iter()
            .map(|(r, p, f)| {
                [
                    cells(r, &REGISTRY_COLUMNS),
                    cells(p, &OWNED_PACK_COLUMNS),
                    cells(f, &FILE_COLUMNS),
                ]
                .concat()
            })
            .collect();
        JsonRows::new(
            header(&[&REGISTRY_COLUMNS[..], &OWNED_PACK_COLUMNS[..], &FILE_COLUMNS[..]]),
            rows,
        )
    }

    /// Packs then files, as two result sets.
    pub fn pack_result_sets(&self) -> JsonResultSets {
        let packs: Vec<Pack> = self.packs.iter().map(Pack::detached).collect();
        JsonResultSets::new(vec![values(&packs), values(&self.files)])
    }

    /// Registries, owned packs, then files, as three result sets.
    pub fn registry_result_sets(&self) -> JsonResultSets {
        JsonResultSets::new(vec![
            values(&self.registries),
            values(&self.owned_packs()),
            values(&self.files),
        ])
    }

    /// CSV text of the pack/file join.
    pub fn pack_file_csv(&self) -> String {
        let table = self.pack_file_table();
        csv_text(table.columns(), table.rows())
    }

    /// CSV text of the registry/pack/file join.
    pub fn registry_pack_file_csv(&self) -> String {
        let table = self.registry_pack_file_table();
        csv_text(table.columns(), table.rows())
    }

    pub fn registries_csv(&self) -> String {
        table_csv(&self.registries, &REGISTRY_COLUMNS)
    }

    /// CSV text of the pack table without the registry column.
    pub fn packs_csv(&self) -> String {
        table_csv(&self.packs, &PACK_COLUMNS)
    }

    /// CSV text of the owned packs, registry column first.
    pub fn owned_packs_csv(&self) -> String {
        table_csv(&self.owned_packs(), &OWNED_PACK_COLUMNS)
    }

    pub fn files_csv(&self) -> String {
        table_csv(&self.files, &FILE_COLUMNS)
    }
}

fn registry(id: &str, income: &str, gu_code: i64, no: i64, signed: Option<&str>) -> Registry {
    Registry {
        id: id.to_string(),
        income: income.to_string(),
        gu_code,
        no,
        signed: signed.map(str::to_string),
        packs: None,
    }
}

fn pack(id: &str, gu_code: i64, no: i64, registry_id: Option<&str>) -> Pack {
    Pack {
        id: id.to_string(),
        gu_code,
        no,
        registry_id: registry_id.map(str::to_string),
        files: None,
    }
}

fn file(id: &str, pack_id: &str, no: i64, snils: &str) -> FileEntry {
    FileEntry {
        id: id.to_string(),
        pack_id: pack_id.to_string(),
        no,
        snils: snils.to_string(),
    }
}

fn header(segments: &[&[&str]]) -> Vec<String> {
    segments
        .iter()
        .flat_map(|columns| columns.iter().map(|c| c.to_string()))
        .collect()
}

/// Values of `entity` in column order; absent columns become null.
fn cells<T: Serialize>(entity: &T, columns: &[&str]) -> Vec<Value> {
    let object = match serde_json::to_value(entity) {
        Ok(Value::Object(object)) => object,
        _ => Default::default(),
    };
    columns
        .iter()
        .map(|c| object.get(*c).cloned().unwrap_or(Value::Null))
        .collect()
}

fn values<T: Serialize>(entities: &[T]) -> Vec<Value> {
    entities
        .iter()
        .map(|e| serde_json::to_value(e).unwrap_or(Value::Null))
        .collect()
}

fn table_csv<T: Serialize>(entities: &[T], columns: &[&str]) -> String {
    let rows: Vec<Vec<Value>> = entities.iter().map(|e| cells(e, columns)).collect();
    let columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
    csv_text(&columns, &rows)
}

/// CSV document with a header row, quoting fields as needed.
///
/// The writer targets memory, so a write failure can only come from the csv
/// crate itself; the document is then empty.
fn csv_text(columns: &[String], rows: &[Vec<Value>]) -> String {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    let written = std::iter::once(columns.to_vec())
        .chain(rows.iter().map(|row| row.iter().map(cell_text).collect()))
        .try_for_each(|record| writer.write_record(&record));

    match (written, writer.into_inner()) {
        (Ok(()), Ok(bytes)) => String::from_utf8(bytes).unwrap_or_default(),
        _ => String::new(),
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
