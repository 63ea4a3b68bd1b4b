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

//! Contracts for the row sources the graph builder consumes.
//!
//! The builder never executes queries or decodes columns itself. It is driven
//! by one of two collaborators:
//!
//! - a [`RowSource`] delivering flattened join rows, each already split into
//!   sibling entities at [`SplitOn`] boundaries;
//! - a [`ResultCursor`] delivering one fully materialised result set per
//!   entity level, in the order the levels were queried.
//!
//! Both report failures through their own associated error type, which the
//! `query_*` and `read_*` operations propagate unmodified.

use crate::split::SplitOn;
use serde::de::DeserializeOwned;

/// A source of flattened multi-entity rows.
///
/// Implementations materialise every entity of a row from its own column
/// range and hand the entities to the combiner, once per physical row and in
/// delivery order. Rows already delivered stay delivered if the source fails
/// part way through.
pub trait RowSource {
    /// Error reported while reading or materialising rows.
    type Error;

    /// Deliver each row as two entities split at `split_on`.
    ///
    /// Returns the number of rows delivered.
    fn visit_pairs<A, B, F>(&mut self, split_on: &SplitOn, combine: F) -> Result<usize, Self::Error>
    where
        A: DeserializeOwned,
        B: DeserializeOwned,
        F: FnMut(A, B);

    /// Deliver each row as three entities split at `split_on`.
    ///
    /// Returns the number of rows delivered.
    fn visit_triples<A, B, C, F>(
        &mut self,
        split_on: &SplitOn,
        combine: F,
    ) -> Result<usize, Self::Error>
    where
        A: DeserializeOwned,
        B: DeserializeOwned,
        C: DeserializeOwned,
        F: FnMut(A, B, C);
}

/// A sequential multi-result cursor.
///
/// Each call to [`read`](Self::read) drains the next result set completely.
/// Asking for more sets than the cursor holds is an error
/// (`GraphError::NotEnoughResults` or the implementation's equivalent).
pub trait ResultCursor {
    /// Error reported while reading or materialising a result set.
    type Error;

    /// Read and materialise the next result set.
    fn read<T: DeserializeOwned>(&mut self) -> Result<Vec<T>, Self::Error>;
}

impl<S: RowSource + ?Sized> RowSource for &mut S {
    type Error = S::Error;

    fn visit_pairs<A, B, F>(&mut self, split_on: &SplitOn, combine: F) -> Result<usize, Self::Error>
    where
        A: DeserializeOwned,
        B: DeserializeOwned,
        F: FnMut(A, B),
    {
        (**self).visit_pairs(split_on, combine)
    }

    fn visit_triples<A, B, C, F>(
        &mut self,
        split_on: &SplitOn,
        combine: F,
    ) -> Result<usize, Self::Error>
    where
        A: DeserializeOwned,
        B: DeserializeOwned,
        C: DeserializeOwned,
        F: FnMut(A, B, C),
    {
        (**self).visit_triples(split_on, combine)
    }
}

impl<C: ResultCursor + ?Sized> ResultCursor for &mut C {
    type Error = C::Error;

    fn read<T: DeserializeOwned>(&mut self) -> Result<Vec<T>, Self::Error> {
        (**self).read()
    }
}
