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

//! In-memory row sources backed by `serde_json` values.
//!
//! [`JsonRows`] plays a query returning one joined result set, [`JsonResultSets`]
//! a multi-statement query returning one set per level. Both materialise
//! entities through `serde_json::from_value` and report failures as
//! [`GraphError`].

use rowgraph_core::{GraphError, ResultCursor, Result, RowSource, SplitOn};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::VecDeque;
use std::ops::Range;

/// A joined result set: one header row and any number of value rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonRows {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
    failure: Option<(usize, String)>,
}

impl JsonRows {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns,
            rows,
            failure: None,
        }
    }

    /// Fail with `message` when row `row` (1-based) is reached.
    ///
    /// Rows before it are still delivered.
    pub fn fail_at(mut self, row: usize, message: impl Into<String>) -> Self {
        self.failure = Some((row, message.into()));
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn check_row(&self, index: usize) -> Result<()> {
        match &self.failure {
            Some((row, message)) if *row == index + 1 => Err(GraphError::Materialize {
                row: *row,
                entity: 0,
                message: message.clone(),
            }),
            _ => Ok(()),
        }
    }

    fn materialize<T: DeserializeOwned>(&self, index: usize, entity: usize, range: &Range<usize>) -> Result<T> {
        let row = index + 1;
        let cells = self.rows[index]
            .get(range.clone())
            .ok_or_else(|| GraphError::Materialize {
                row,
                entity,
                message: format!(
                    "row has {} cells, columns {}..{} requested",
                    self.rows[index].len(),
                    range.start,
                    range.end
                ),
            })?;

        let object: Map<String, Value> = self.columns[range.clone()]
            .iter()
            .cloned()
            .zip(cells.iter().cloned())
            .collect();

        serde_json::from_value(Value::Object(object)).map_err(|e| GraphError::Materialize {
            row,
            entity,
            message: e.to_string(),
        })
    }
}

impl RowSource for JsonRows {
    type Error = GraphError;

    fn visit_pairs<A, B, F>(&mut self, split_on: &SplitOn, mut combine: F) -> Result<usize>
    where
        A: DeserializeOwned,
        B: DeserializeOwned,
        F: FnMut(A, B),
    {
        let ranges = split_on.resolve(&self.columns, 2)?;
        for index in 0..self.rows.len() {
            self.check_row(index)?;
            let a = self.materialize(index, 0, &ranges[0])?;
            let b = self.materialize(index, 1, &ranges[1])?;
            combine(a, b);
        }
        Ok(self.rows.len())
    }

    fn visit_triples<A, B, C, F>(&mut self, split_on: &SplitOn, mut combine: F) -> Result<usize>
    where
        A: DeserializeOwned,
        B: DeserializeOwned,
        C: DeserializeOwned,
        F: FnMut(A, B, C),
    {
        let ranges = split_on.resolve(&self.columns, 3)?;
        for index in 0..self.rows.len() {
            self.check_row(index)?;
            let a = self.materialize(index, 0, &ranges[0])?;
            let b = self.materialize(index, 1, &ranges[1])?;
            let c = self.materialize(index, 2, &ranges[2])?;
            combine(a, b, c);
        }
        Ok(self.rows.len())
    }
}

/// A sequence of result sets, each a list of JSON objects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonResultSets {
    sets: VecDeque<Vec<Value>>,
    total: usize,
}

impl JsonResultSets {
    pub fn new(sets: Vec<Vec<Value>>) -> Self {
        Self {
            total: sets.len(),
            sets: sets.into(),
        }
    }

    /// Result sets not yet read.
    pub fn remaining(&self) -> usize {
        self.sets.len()
    }
}

impl ResultCursor for JsonResultSets {
    type Error = GraphError;

    fn read<T: DeserializeOwned>(&mut self) -> Result<Vec<T>> {
        let entity = self.total - self.sets.len();
        let set = self.sets.pop_front().ok_or(GraphError::NotEnoughResults {
            requested: entity + 1,
            available: self.total,
        })?;

        set.into_iter()
            .enumerate()
            .map(|(index, value)| {
                serde_json::from_value(value).map_err(|e| GraphError::Materialize {
                    row: index + 1,
                    entity,
                    message: e.to_string(),
                })
            })
            .collect()
    }
}
