/*
 * Copyright (c) 2021 Works Applications Co., Ltd.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::dic::category_type::CategoryType;
use crate::dic::connect::ConnectionMatrix;
use crate::dic::lexicon::{read_entries, WordEntry};
use crate::error::{KakariError, KakariResult};

/// Unknown word templates from `unk.def`
///
/// Same layout as the lexicon, with a category name in place of the surface.
#[derive(Debug, Clone)]
pub struct UnknownDictionary {
    entries: Vec<WordEntry>,
    by_category: HashMap<CategoryType, Vec<u32>>,
}

impl UnknownDictionary {
    pub fn from_file(path: &Path) -> KakariResult<UnknownDictionary> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(data: R) -> KakariResult<UnknownDictionary> {
        let entries = read_entries(data)?;
        let mut by_category: HashMap<CategoryType, Vec<u32>> = HashMap::new();
        for (id, e) in entries.iter().enumerate() {
            let category: CategoryType = e.surface.parse()?;
            by_category.entry(category).or_default().push(id as u32);
        }
        if !by_category.contains_key(&CategoryType::DEFAULT) {
            return Err(KakariError::InvalidDataFormat(
                0,
                "no template for the DEFAULT category".to_owned(),
            ));
        }
        Ok(UnknownDictionary {
            entries,
            by_category,
        })
    }

    /// Template ids for a category, DEFAULT templates when it has none
    pub fn templates(&self, category: CategoryType) -> &[u32] {
        self.by_category
            .get(&category)
            .or_else(|| self.by_category.get(&CategoryType::DEFAULT))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn entry(&self, id: u32) -> &WordEntry {
        &self.entries[id as usize]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn validate(&self, matrix: &ConnectionMatrix) -> KakariResult<()> {
        for (i, e) in self.entries.iter().enumerate() {
            if !matrix.accepts(e.left_id, e.right_id) {
                return Err(KakariError::InvalidDataFormat(
                    i + 1,
                    format!("connection ids of {} are out of the matrix", e.surface),
                ));
            }
        }
        Ok(())
    }
}
