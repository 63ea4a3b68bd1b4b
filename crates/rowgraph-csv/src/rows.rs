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

//! Joined rows read from CSV.

use crate::error::{CsvError, Result};
use csv::{Reader, ReaderBuilder, StringRecord};
use rowgraph_core::{RowSource, SplitOn};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::ops::Range;
use std::path::Path;
use tracing::debug;

/// Default maximum number of rows read from one CSV source.
pub const DEFAULT_MAX_ROWS: usize = 1_000_000;

/// Configuration for CSV row sources.
///
/// # Examples
///
/// ```
/// use rowgraph_csv::CsvSourceConfig;
///
/// let config = CsvSourceConfig {
///     delimiter: b';',
///     ..Default::default()
/// };
/// assert!(config.trim);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvSourceConfig {
    /// Field delimiter character (default: `,`).
    pub delimiter: u8,

    /// Whether to trim leading/trailing whitespace from headers and fields
    /// (default: `true`).
    pub trim: bool,

    /// Maximum number of data rows per source (default: 1,000,000).
    ///
    /// Reading stops with `CsvError::SecurityLimit` once exceeded.
    pub max_rows: usize,
}

impl Default for CsvSourceConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: true,
            max_rows: DEFAULT_MAX_ROWS,
        }
    }
}

impl CsvSourceConfig {
    pub(crate) fn reader<R: Read>(&self, reader: R) -> Reader<R> {
        ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .trim(if self.trim {
                csv::Trim::All
            } else {
                csv::Trim::None
            })
            .from_reader(reader)
    }

    pub(crate) fn check_limit(&self, index: usize) -> Result<()> {
        if index >= self.max_rows {
            return Err(CsvError::SecurityLimit {
                limit: self.max_rows,
                actual: index + 1,
            });
        }
        Ok(())
    }
}

/// One joined result set read from CSV.
///
/// The header row names every column of every entity side by side; the
/// [`SplitOn`] passed to a visit decides where each entity's columns begin.
/// Each entity is deserialized from its own header and field slice, so
/// repeated column names across entities are fine.
///
/// A `CsvRows` reads its input once: a second visit sees no rows.
///
/// # Examples
///
/// ```
/// use rowgraph_core::{query_by_parent_key, SplitOn};
/// use rowgraph_csv::CsvRows;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Pack {
///     #[serde(rename = "ID")]
///     id: String,
///     #[serde(skip)]
///     files: Vec<File>,
/// }
///
/// #[derive(Deserialize)]
/// struct File {
///     #[serde(rename = "ID")]
///     id: String,
/// }
///
/// let text = "ID,PACK_ID,ID\nBBFDX,BBFDX,F1\nBBFDX,BBFDX,F2\n";
/// let packs: Vec<Pack> = query_by_parent_key(
///     &mut CsvRows::from_text(text),
///     &SplitOn::parse("PACK_ID").unwrap(),
///     |p: &Pack| p.id.clone(),
///     |p: &mut Pack, f| p.files.push(f),
/// )
/// .unwrap();
///
/// assert_eq!(packs.len(), 1);
/// assert_eq!(packs[0].files.len(), 2);
/// ```
pub struct CsvRows<R> {
    reader: Reader<R>,
    config: CsvSourceConfig,
}

impl<'a> CsvRows<&'a [u8]> {
    /// Read rows from in-memory CSV text.
    pub fn from_text(text: &'a str) -> Self {
        Self::new(text.as_bytes())
    }
}

impl CsvRows<File> {
    /// Read rows from a CSV file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(File::open(path)?))
    }
}

impl<R: Read> CsvRows<R> {
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, CsvSourceConfig::default())
    }

    pub fn with_config(reader: R, config: CsvSourceConfig) -> Self {
        Self {
            reader: config.reader(reader),
            config,
        }
    }

    /// Header slices for each of `entities` entities.
    fn segments(&mut self, split_on: &SplitOn, entities: usize) -> Result<Vec<Segment>> {
        let headers = self.reader.headers()?.clone();
        let names: Vec<&str> = headers.iter().collect();
        let ranges = split_on.resolve(&names, entities)?;
        Ok(ranges
            .into_iter()
            .map(|range| Segment {
                headers: slice(&headers, &range),
                range,
            })
            .collect())
    }

    /// Deliver every record to `each`, enforcing the row limit.
    fn each_record<F>(&mut self, mut each: F) -> Result<usize>
    where
        F: FnMut(usize, &StringRecord) -> Result<()>,
    {
        let mut record = StringRecord::new();
        let mut count = 0;
        loop {
            match self.reader.read_record(&mut record) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    return Err(CsvError::ParseError {
                        line: input_line(&e, count + 2),
                        message: e.to_string(),
                    })
                }
            }
            self.config.check_limit(count)?;
            count += 1;
            each(count, &record)?;
        }
        Ok(count)
    }
}

struct Segment {
    headers: StringRecord,
    range: Range<usize>,
}

impl Segment {
    fn materialize<T: DeserializeOwned>(&self, record: &StringRecord, row: usize, entity: usize) -> Result<T> {
        slice(record, &self.range)
            .deserialize(Some(&self.headers))
            .map_err(|e| CsvError::Deserialize {
                row,
                entity,
                message: e.to_string(),
            })
    }
}

/// Input line of a reader error, or `fallback` when the csv crate has none.
pub(crate) fn input_line(error: &csv::Error, fallback: usize) -> usize {
    error
        .position()
        .map_or(fallback, |position| position.line() as usize)
}

fn slice(record: &StringRecord, range: &Range<usize>) -> StringRecord {
    record.iter().skip(range.start).take(range.len()).collect()
}

impl<R: Read> RowSource for CsvRows<R> {
    type Error = CsvError;

    fn visit_pairs<A, B, F>(&mut self, split_on: &SplitOn, mut combine: F) -> Result<usize>
    where
        A: DeserializeOwned,
        B: DeserializeOwned,
        F: FnMut(A, B),
    {
        let segments = self.segments(split_on, 2)?;
        let rows = self.each_record(|row, record| {
            let a = segments[0].materialize(record, row, 0)?;
            let b = segments[1].materialize(record, row, 1)?;
            combine(a, b);
            Ok(())
        })?;
        debug!(rows, split_on = %split_on, "read joined csv rows");
        Ok(rows)
    }

    fn visit_triples<A, B, C, F>(&mut self, split_on: &SplitOn, mut combine: F) -> Result<usize>
    where
        A: DeserializeOwned,
        B: DeserializeOwned,
        C: DeserializeOwned,
        F: FnMut(A, B, C),
    {
        let segments = self.segments(split_on, 3)?;
        let rows = self.each_record(|row, record| {
            let a = segments[0].materialize(record, row, 0)?;
            let b = segments[1].materialize(record, row, 1)?;
            let c = segments[2].materialize(record, row, 2)?;
            combine(a, b, c);
            Ok(())
        })?;
        debug!(rows, split_on = %split_on, "read joined csv rows");
        Ok(rows)
    }
}
