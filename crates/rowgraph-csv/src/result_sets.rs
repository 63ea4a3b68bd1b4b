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

//! A sequence of CSV result sets, one per entity level.

use crate::error::{CsvError, Result};
use crate::rows::{input_line, CsvSourceConfig};
use rowgraph_core::{GraphError, ResultCursor};
use serde::de::DeserializeOwned;
use std::collections::VecDeque;
use std::io::Read;
use tracing::debug;

/// Result sets read in order, each from its own CSV input with a header row.
///
/// # Examples
///
/// ```
/// use rowgraph_core::ResultCursor;
/// use rowgraph_csv::CsvResultSets;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Pack {
///     #[serde(rename = "ID")]
///     id: String,
/// }
///
/// let mut sets = CsvResultSets::from_texts(&["ID\nBBFDX\nBBFDY\n"]);
/// let packs: Vec<Pack> = sets.read().unwrap();
/// assert_eq!(packs.len(), 2);
/// assert!(sets.read::<Pack>().is_err());
/// ```
pub struct CsvResultSets<R> {
    sets: VecDeque<R>,
    total: usize,
    config: CsvSourceConfig,
}

impl<'a> CsvResultSets<&'a [u8]> {
    /// Result sets from in-memory CSV texts.
    pub fn from_texts(texts: &[&'a str]) -> Self {
        Self::new(texts.iter().copied().map(str::as_bytes))
    }
}

impl<R: Read> CsvResultSets<R> {
    pub fn new(sets: impl IntoIterator<Item = R>) -> Self {
        Self::with_config(sets, CsvSourceConfig::default())
    }

    pub fn with_config(sets: impl IntoIterator<Item = R>, config: CsvSourceConfig) -> Self {
        let sets: VecDeque<R> = sets.into_iter().collect();
        Self {
            total: sets.len(),
            sets,
            config,
        }
    }

    /// Result sets not yet read.
    pub fn remaining(&self) -> usize {
        self.sets.len()
    }
}

impl<R: Read> ResultCursor for CsvResultSets<R> {
    type Error = CsvError;

    fn read<T: DeserializeOwned>(&mut self) -> Result<Vec<T>> {
        let entity = self.total - self.sets.len();
        let input = self.sets.pop_front().ok_or(GraphError::NotEnoughResults {
            requested: entity + 1,
            available: self.total,
        })?;

        let mut reader = self.config.reader(input);
        let mut out = Vec::new();
        for (index, result) in reader.deserialize::<T>().enumerate() {
            self.config.check_limit(index)?;
            let row = index + 1;
            let item = result.map_err(|e| match e.kind() {
                csv::ErrorKind::Deserialize { .. } => CsvError::Deserialize {
                    row,
                    entity,
                    message: e.to_string(),
                },
                _ => CsvError::ParseError {
                    line: input_line(&e, row + 1),
                    message: e.to_string(),
                },
            })?;
            out.push(item);
        }

        debug!(set = entity + 1, rows = out.len(), "read csv result set");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Deserialize)]
    struct File {
        #[serde(rename = "PACK_ID")]
        pack_id: String,
        #[serde(rename = "NO")]
        no: i64,
    }

    #[test]
    fn test_reads_sets_in_order() {
        let mut sets = CsvResultSets::from_texts(&["PACK_ID,NO\nP1,1\n", "PACK_ID,NO\nP2,2\nP2,3\n"]);
        assert_eq!(sets.remaining(), 2);
        let first: Vec<File> = sets.read().unwrap();
        let second: Vec<File> = sets.read().unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(second[1].no, 3);
        assert_eq!(second[0].pack_id, "P2");
        assert_eq!(sets.remaining(), 0);
    }

    #[test]
    fn test_exhausted_cursor() {
        let mut sets = CsvResultSets::from_texts(&["PACK_ID,NO\n"]);
        let empty: Vec<File> = sets.read().unwrap();
        assert!(empty.is_empty());
        let err = sets.read::<File>().unwrap_err();
        assert!(matches!(
            err,
            CsvError::Graph(GraphError::NotEnoughResults {
                requested: 2,
                available: 1
            })
        ));
    }

    #[test]
    fn test_deserialize_error_names_set() {
        let mut sets = CsvResultSets::from_texts(&["PACK_ID,NO\n", "PACK_ID,NO\nP1,x\n"]);
        let _: Vec<File> = sets.read().unwrap();
        let err = sets.read::<File>().unwrap_err();
        assert!(matches!(err, CsvError::Deserialize { row: 1, entity: 1, .. }));
    }

    #[test]
    fn test_ragged_record_reports_input_line() {
        let mut sets = CsvResultSets::from_texts(&["PACK_ID,NO\nP1,1\nP1\n"]);
        let err = sets.read::<File>().unwrap_err();
        assert!(matches!(err, CsvError::ParseError { line: 3, .. }));
    }

    #[test]
    fn test_row_limit_per_set() {
        let config = CsvSourceConfig {
            max_rows: 2,
            ..Default::default()
        };
        let mut sets = CsvResultSets::with_config(
            vec!["PACK_ID,NO\nP1,1\nP1,2\n".as_bytes(), "PACK_ID,NO\nP1,1\nP1,2\nP1,3\n".as_bytes()],
            config,
        );
        assert_eq!(sets.read::<File>().unwrap().len(), 2);
        assert!(matches!(
            sets.read::<File>().unwrap_err(),
            CsvError::SecurityLimit { limit: 2, actual: 3 }
        ));
    }
}
