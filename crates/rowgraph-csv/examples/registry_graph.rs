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

//! Build the registry graph from CSV, once from joined rows and once from
//! per-level result sets.
//!
//! Run with `RUST_LOG=debug` to see the reducer and joiner logs.

use rowgraph_core::{query_nested_by_child_keys, read_nested_children, SplitOn};
use rowgraph_csv::{CsvResultSets, CsvRows};
use rowgraph_test::{registries_equivalent, Dataset, FileEntry, Pack, Registry, REGISTRY_PACK_FILE_SPLIT};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let dataset = Dataset::sample();

    println!("=== Joined rows ===\n");
    let joined_csv = dataset.registry_pack_file_csv();
    println!("{}", joined_csv);

    let split = match SplitOn::parse(REGISTRY_PACK_FILE_SPLIT) {
        Ok(split) => split,
        Err(e) => {
            eprintln!("invalid split: {}", e);
            return;
        }
    };

    let reduced: Vec<Registry> = match query_nested_by_child_keys(
        &mut CsvRows::from_text(&joined_csv),
        &split,
        Registry::attach_pack,
        Pack::registry_key,
        Pack::attach_file,
        FileEntry::pack_key,
    ) {
        Ok(registries) => registries,
        Err(e) => {
            eprintln!("query failed: {}", e);
            return;
        }
    };
    print_graph(&reduced);

    println!("\n=== Multiple result sets ===\n");
    let registries_csv = dataset.registries_csv();
    let packs_csv = dataset.owned_packs_csv();
    let files_csv = dataset.files_csv();
    let mut sets = CsvResultSets::from_texts(&[
        registries_csv.as_str(),
        packs_csv.as_str(),
        files_csv.as_str(),
    ]);

    let joined: Vec<Registry> = match read_nested_children(
        &mut sets,
        Registry::key,
        Registry::set_packs,
        Pack::registry_key,
        Pack::key,
        Pack::set_files,
        FileEntry::pack_key,
    ) {
        Ok(registries) => registries,
        Err(e) => {
            eprintln!("read failed: {}", e);
            return;
        }
    };
    print_graph(&joined);

    match registries_equivalent(&reduced, &joined) {
        Ok(()) => println!("\nBoth graphs are equivalent."),
        Err(diff) => println!("\nGraphs differ: {}", diff),
    }
}

fn print_graph(registries: &[Registry]) {
    for registry in registries {
        println!(
            "{} (income {}, signed {})",
            registry.id,
            registry.income,
            registry.signed.as_deref().unwrap_or("-")
        );
        for pack in registry.packs.iter().flatten() {
            println!("  {} #{}", pack.id, pack.no);
            for file in pack.files.iter().flatten() {
                println!("    {} {}", file.id, file.snils);
            }
        }
    }
}
