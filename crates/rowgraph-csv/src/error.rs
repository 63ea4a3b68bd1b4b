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

//! Error types for CSV row sources.

use rowgraph_core::GraphError;
use thiserror::Error;

/// CSV row source error types.
///
/// # Examples
///
/// ```
/// use rowgraph_csv::CsvError;
///
/// let err = CsvError::Deserialize {
///     row: 3,
///     entity: 1,
///     message: "invalid digit found in string".to_string(),
/// };
///
/// assert_eq!(
///     err.to_string(),
///     "Failed to deserialize entity 1 at row 3: invalid digit found in string"
/// );
/// ```
#[derive(Debug, Error)]
pub enum CsvError {
    /// CSV parsing error at a specific input line.
    #[error("CSV parse error at line {line}: {message}")]
    ParseError {
        /// Input line where the error occurred (1-based, header line included).
        line: usize,
        /// Detailed error message.
        message: String,
    },

    /// A column segment could not be deserialized into its entity.
    #[error("Failed to deserialize entity {entity} at row {row}: {message}")]
    Deserialize {
        /// Record number (1-based, header excluded).
        row: usize,
        /// Position of the entity within the row, or of the result set.
        entity: usize,
        /// Detailed error message.
        message: String,
    },

    /// Row count exceeded security limit.
    ///
    /// # Examples
    ///
    /// ```
    /// use rowgraph_csv::CsvError;
    ///
    /// let err = CsvError::SecurityLimit {
    ///     limit: 1_000_000,
    ///     actual: 1_000_001,
    /// };
    /// assert!(err.to_string().contains("Security limit"));
    /// ```
    #[error("Security limit exceeded: row count {actual} exceeds maximum {limit}")]
    SecurityLimit {
        /// Maximum allowed rows.
        limit: usize,
        /// Actual row count encountered.
        actual: usize,
    },

    /// I/O error while opening or reading a source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from underlying CSV library.
    #[error("CSV library error: {0}")]
    CsvLib(#[from] csv::Error),

    /// Split resolution or result-set sequencing failed.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Convenience type alias for `Result` with `CsvError`.
pub type Result<T> = std::result::Result<T, CsvError>;
