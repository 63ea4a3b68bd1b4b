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

//! Rowgraph Benchmark Framework
//!
//! Sized fixture datasets for comparing the join-row reducers with the
//! multi-result joiners.
//!
//! ## Usage
//!
//! Run all benchmarks:
//! ```bash
//! cargo bench --package rowgraph-bench
//! ```
//!
//! Run specific benchmark:
//! ```bash
//! cargo bench --package rowgraph-bench --bench graph
//! ```

use rowgraph_test::Dataset;
use thiserror::Error;

/// Maximum number of files in a generated dataset.
pub const MAX_DATASET_FILES: usize = 10_000_000;

/// Result type for benchmarking operations
pub type Result<T> = std::result::Result<T, BenchError>;

/// Errors that can occur while preparing benchmark data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BenchError {
    #[error("Dataset too large: {requested} files requested, maximum is {max}")]
    DatasetTooLarge { requested: usize, max: usize },

    #[error("Invalid dataset shape: {reason}")]
    InvalidShape { reason: String },
}

/// Dataset size categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetSize {
    /// Small: 10 files
    Small,
    /// Medium: 100 files
    Medium,
    /// Large: 1,000 files
    Large,
    /// Stress: 10,000 files
    Stress,
}

impl DatasetSize {
    pub const ALL: [DatasetSize; 4] = [
        DatasetSize::Small,
        DatasetSize::Medium,
        DatasetSize::Large,
        DatasetSize::Stress,
    ];

    /// (registries, packs per registry, files per pack)
    pub fn shape(&self) -> (usize, usize, usize) {
        match self {
            DatasetSize::Small => (1, 2, 5),
            DatasetSize::Medium => (2, 5, 10),
            DatasetSize::Large => (10, 10, 10),
            DatasetSize::Stress => (20, 25, 20),
        }
    }

    /// Number of files, and so of joined rows.
    pub fn count(&self) -> usize {
        let (r, p, f) = self.shape();
        r * p * f
    }

    pub fn name(&self) -> &'static str {
        match self {
            DatasetSize::Small => "small",
            DatasetSize::Medium => "medium",
            DatasetSize::Large => "large",
            DatasetSize::Stress => "stress",
        }
    }
}

/// Generate a dataset, rejecting empty or oversized shapes.
pub fn generate_dataset(registries: usize, packs_per_registry: usize, files_per_pack: usize) -> Result<Dataset> {
    if registries == 0 || packs_per_registry == 0 || files_per_pack == 0 {
        return Err(BenchError::InvalidShape {
            reason: format!(
                "every level needs at least one entity, got {}x{}x{}",
                registries, packs_per_registry, files_per_pack
            ),
        });
    }

    let requested = registries
        .checked_mul(packs_per_registry)
        .and_then(|n| n.checked_mul(files_per_pack))
        .unwrap_or(usize::MAX);
    if requested > MAX_DATASET_FILES {
        return Err(BenchError::DatasetTooLarge {
            requested,
            max: MAX_DATASET_FILES,
        });
    }

    Ok(Dataset::generate(registries, packs_per_registry, files_per_pack))
}

/// Generate the dataset for a size category.
pub fn dataset(size: DatasetSize) -> Result<Dataset> {
    let (r, p, f) = size.shape();
    generate_dataset(r, p, f)
}
