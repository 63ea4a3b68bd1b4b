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

//! Order-insensitive graph comparison.
//!
//! Two graphs are equivalent when every level holds the same entities,
//! matched by `ID`, with equal columns and equivalent children. Collection
//! order is ignored and an unset collection counts as empty.

use crate::fixtures::{FileEntry, Pack, Registry};

/// Describe the first difference between two registry lists.
pub fn registries_equivalent(expected: &[Registry], actual: &[Registry]) -> Result<(), String> {
    same_count("registries", expected.len(), actual.len())?;
    for registry in actual {
        let want = expected
            .iter()
            .find(|r| r.id == registry.id)
            .ok_or_else(|| format!("unexpected registry {}", registry.id))?;
        if (&want.income, want.gu_code, want.no, &want.signed)
            != (&registry.income, registry.gu_code, registry.no, &registry.signed)
        {
            return Err(format!("registry {} columns differ", registry.id));
        }
        packs_equivalent(
            want.packs.as_deref().unwrap_or_default(),
            registry.packs.as_deref().unwrap_or_default(),
        )
        .map_err(|e| format!("registry {}: {}", registry.id, e))?;
    }
    Ok(())
}

/// Describe the first difference between two pack lists.
pub fn packs_equivalent(expected: &[Pack], actual: &[Pack]) -> Result<(), String> {
    same_count("packs", expected.len(), actual.len())?;
    for pack in actual {
        let want = expected
            .iter()
            .find(|p| p.id == pack.id)
            .ok_or_else(|| format!("unexpected pack {}", pack.id))?;
        if (want.gu_code, want.no, &want.registry_id) != (pack.gu_code, pack.no, &pack.registry_id) {
            return Err(format!("pack {} columns differ", pack.id));
        }
        files_equivalent(
            want.files.as_deref().unwrap_or_default(),
            pack.files.as_deref().unwrap_or_default(),
        )
        .map_err(|e| format!("pack {}: {}", pack.id, e))?;
    }
    Ok(())
}

/// Describe the first difference between two file lists.
pub fn files_equivalent(expected: &[FileEntry], actual: &[FileEntry]) -> Result<(), String> {
    same_count("files", expected.len(), actual.len())?;
    for file in actual {
        match expected.iter().find(|f| f.id == file.id) {
            Some(want) if want == file => {}
            Some(_) => return Err(format!("file {} columns differ", file.id)),
            None => return Err(format!("unexpected file {}", file.id)),
        }
    }
    Ok(())
}

fn same_count(what: &str, expected: usize, actual: usize) -> Result<(), String> {
    if expected == actual {
        Ok(())
    } else {
        Err(format!("expected {} {}, found {}", expected, what, actual))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Dataset;

    #[test]
    fn test_order_is_ignored() {
        let expected = Dataset::sample().expected_registries();
        let mut actual = expected.clone();
        actual.reverse();
        for registry in &mut actual {
            if let Some(packs) = registry.packs.as_mut() {
                packs.reverse();
            }
        }
        assert_eq!(registries_equivalent(&expected, &actual), Ok(()));
    }

    #[test]
    fn test_unset_matches_empty() {
        let mut expected = Dataset::sample().expected_packs();
        let mut actual = expected.clone();
        expected[0].files = None;
        actual[0].files = Some(Vec::new());
        assert_eq!(packs_equivalent(&expected, &actual), Ok(()));
    }

    #[test]
    fn test_reports_missing_file() {
        let expected = Dataset::sample().expected_packs();
        let mut actual = expected.clone();
        if let Some(files) = actual[0].files.as_mut() {
            files.pop();
        }
        let err = packs_equivalent(&expected, &actual).unwrap_err();
        assert_eq!(err, "pack BBFDX: expected 2 files, found 1");
    }

    #[test]
    fn test_reports_changed_column() {
        let expected = Dataset::sample().expected_registries();
        let mut actual = expected.clone();
        actual[1].signed = Some("2024-02-02".to_string());
        let err = registries_equivalent(&expected, &actual).unwrap_err();
        assert_eq!(err, "registry R2 columns differ");
    }
}
