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

//! Split points for flattened multi-entity rows.
//!
//! A joined row carries the columns of several entities side by side. A
//! [`SplitOn`] names the column at which each entity after the first begins,
//! e.g. `"REGISTRY_ID,PACK_ID"` for a registry → pack → file join.

use crate::error::{GraphError, Result};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// Split column used when none is given.
pub const DEFAULT_SPLIT_ON: &str = "Id";

/// Ordered column names marking where each entity's columns begin.
///
/// A row holding `n` entities needs `n - 1` split columns. When fewer names
/// are given, the last one is reused for the remaining boundaries, so the
/// default `"Id"` splits `Id,Name,Id,Title` into two entities.
///
/// # Examples
///
/// ```
/// use rowgraph_core::SplitOn;
///
/// let split: SplitOn = "REGISTRY_ID, PACK_ID".parse().unwrap();
/// assert_eq!(split.columns(), &["REGISTRY_ID", "PACK_ID"]);
///
/// let headers = ["ID", "NO", "REGISTRY_ID", "ID", "PACK_ID", "ID"];
/// let ranges = split.resolve(&headers, 3).unwrap();
/// assert_eq!(ranges, vec![0..2, 2..4, 4..6]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOn {
    columns: Vec<String>,
}

impl Default for SplitOn {
    fn default() -> Self {
        Self {
            columns: vec![DEFAULT_SPLIT_ON.to_string()],
        }
    }
}

impl SplitOn {
    /// Build a split specification from column names.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::InvalidSplit` when no names are given or a name
    /// is blank.
    pub fn new<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns
            .into_iter()
            .map(|c| c.into().trim().to_string())
            .collect();

        if columns.is_empty() {
            return Err(GraphError::InvalidSplit {
                reason: "no split columns given".to_string(),
            });
        }
        if let Some(position) = columns.iter().position(String::is_empty) {
            return Err(GraphError::InvalidSplit {
                reason: format!("empty column name at position {}", position),
            });
        }

        Ok(Self { columns })
    }

    /// Parse a comma-separated list such as `"REGISTRY_ID,PACK_ID"`.
    pub fn parse(spec: &str) -> Result<Self> {
        Self::new(spec.split(','))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Split column for the given boundary, reusing the last name past the end.
    pub fn column_for(&self, boundary: usize) -> &str {
        self.columns
            .get(boundary)
            .or_else(|| self.columns.last())
            .map(String::as_str)
            .unwrap_or(DEFAULT_SPLIT_ON)
    }

    /// Resolve the column range of each of `entities` entities in `headers`.
    ///
    /// Each boundary is the first header after the previous boundary that
    /// matches its split column, compared ASCII case-insensitively. The last
    /// entity runs to the end of the row.
    ///
    /// # Errors
    ///
    /// - `GraphError::InvalidSplit` if `entities` is zero
    /// - `GraphError::SplitColumnNotFound` if a boundary cannot be located
    pub fn resolve<H: AsRef<str>>(&self, headers: &[H], entities: usize) -> Result<Vec<Range<usize>>> {
        if entities == 0 {
            return Err(GraphError::InvalidSplit {
                reason: "a row must hold at least one entity".to_string(),
            });
        }

        let mut ranges = Vec::with_capacity(entities);
        let mut start = 0;

        for boundary in 0..entities - 1 {
            let column = self.column_for(boundary);
            let position = headers
                .iter()
                .enumerate()
                .skip(start + 1)
                .find(|(_, header)| matches_column(header.as_ref(), column))
                .map(|(index, _)| index)
                .ok_or_else(|| GraphError::SplitColumnNotFound {
                    column: column.to_string(),
                    after: start,
                })?;

            ranges.push(start..position);
            start = position;
        }

        ranges.push(start..headers.len());
        Ok(ranges)
    }
}

fn matches_column(header: &str, column: &str) -> bool {
    header.trim().eq_ignore_ascii_case(column)
}

impl FromStr for SplitOn {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for SplitOn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.columns.join(","))
    }
}
