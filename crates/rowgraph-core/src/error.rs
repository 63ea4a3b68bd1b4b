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

//! Error types for graph building.

use thiserror::Error;

/// Errors raised by the graph builder and its source contracts.
///
/// The reducers and joiners themselves never fail: a broken key function
/// silently over- or under-merges. These variants cover split-point
/// resolution and the conditions a row source or result cursor reports
/// while materialising entities.
///
/// # Examples
///
/// ```
/// use rowgraph_core::GraphError;
///
/// let err = GraphError::NotEnoughResults {
///     requested: 3,
///     available: 2,
/// };
/// assert_eq!(
///     err.to_string(),
///     "Not enough result sets: requested set 3 but the cursor holds 2"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A cursor was asked for more result sets than it yields.
    #[error("Not enough result sets: requested set {requested} but the cursor holds {available}")]
    NotEnoughResults {
        /// Ordinal of the requested set (1-based).
        requested: usize,
        /// Number of sets the cursor was created with.
        available: usize,
    },

    /// A split column could not be located in the row headers.
    ///
    /// ```
    /// use rowgraph_core::GraphError;
    ///
    /// let err = GraphError::SplitColumnNotFound {
    ///     column: "PACK_ID".to_string(),
    ///     after: 0,
    /// };
    /// assert!(err.to_string().contains("PACK_ID"));
    /// ```
    #[error("Split column '{column}' not found after column {after}")]
    SplitColumnNotFound {
        /// Name of the split column.
        column: String,
        /// Column index the search started after (0-based).
        after: usize,
    },

    /// The split specification itself is malformed.
    #[error("Invalid split specification: {reason}")]
    InvalidSplit {
        /// Reason the specification was rejected.
        reason: String,
    },

    /// An entity could not be materialised from its columns.
    #[error("Failed to materialize entity {entity} at row {row}: {message}")]
    Materialize {
        /// Row number (1-based).
        row: usize,
        /// Entity position within the row, or result set index (0-based).
        entity: usize,
        /// Underlying deserialisation message.
        message: String,
    },
}

/// Convenience type alias for `Result` with `GraphError`.
pub type Result<T> = std::result::Result<T, GraphError>;
