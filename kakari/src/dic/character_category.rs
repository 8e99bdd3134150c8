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

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::dic::category_type::CategoryType;
use crate::prelude::*;

/// Unknown word behaviour of one category, a `char.def` header line
///
/// `NAME INVOKE GROUP LENGTH`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryDefinition {
    pub category: CategoryType,
    /// generate unknown words even when dictionary words start here
    pub invoke: bool,
    /// generate one word covering the run of this category
    pub group: bool,
    /// generate words of 1..=length characters
    pub length: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Range {
    begin: u32,
    end: u32,
    primary: CategoryType,
    categories: CategoryType,
}

impl Range {
    fn contains(&self, cp: u32) -> bool {
        self.begin <= cp && cp < self.end
    }
}

/// CharacterCategory holds mapping from character to character category type
#[derive(Debug, Clone)]
pub struct CharacterCategory {
    ranges: Vec<Range>,
    definitions: Vec<CategoryDefinition>,
}

impl Default for CharacterCategory {
    fn default() -> Self {
        CharacterCategory {
            ranges: Vec::new(),
            definitions: vec![FALLBACK],
        }
    }
}

impl CharacterCategory {
    /// Creates a character category from file
    pub fn from_file(path: &Path) -> KakariResult<CharacterCategory> {
        let reader = BufReader::new(fs::File::open(path)?);
        Self::from_reader(reader)
    }

    /// Reads MeCab style character definition
    ///
    /// Definition file syntax:
    ///     category lines: NAME INVOKE GROUP LENGTH
    ///     range lines: CODE_POINT[..CODE_POINT] NAME [NAME...]
    ///     the first name of a range line is the primary category,
    ///     later lines override earlier ones
    ///
    /// Definition example:
    ///     "KANJI 0 0 2"
    ///     "0x4E00..0x9FFF KANJI"
    pub fn from_reader<T: BufRead>(reader: T) -> KakariResult<CharacterCategory> {
        let mut ranges = Vec::new();
        let mut definitions: Vec<CategoryDefinition> = Vec::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line = match line.find('#') {
                Some(pos) => &line[..pos],
                None => &line,
            };
            let cols: Vec<_> = line.split_whitespace().collect();
            if cols.is_empty() {
                continue;
            }

            if cols[0].starts_with("0x") {
                ranges.push(Self::parse_range(i, &cols)?);
            } else {
                let def = Self::parse_definition(i, &cols)?;
                if definitions.iter().any(|d| d.category == def.category) {
                    return Err(KakariError::InvalidDataFormat(
                        i,
                        format!("category {} defined twice", cols[0]),
                    ));
                }
                definitions.push(def);
            }
        }

        if !definitions
            .iter()
            .any(|d| d.category == CategoryType::DEFAULT)
        {
            definitions.push(FALLBACK);
        }

        for r in ranges.iter() {
            if !definitions.iter().any(|d| d.category == r.primary) {
                return Err(KakariError::InvalidDataFormat(
                    0,
                    format!("category {:?} is used but not defined", r.primary),
                ));
            }
        }

        Ok(CharacterCategory {
            ranges,
            definitions,
        })
    }

    fn parse_definition(line: usize, cols: &[&str]) -> KakariResult<CategoryDefinition> {
        if cols.len() < 4 {
            return Err(KakariError::InvalidDataFormat(
                line,
                "expected NAME INVOKE GROUP LENGTH".to_owned(),
            ));
        }
        let category: CategoryType = cols[0].parse()?;
        let flag = |s: &str| -> KakariResult<bool> {
            match s {
                "0" => Ok(false),
                "1" => Ok(true),
                _ => Err(KakariError::InvalidDataFormat(
                    line,
                    format!("flag must be 0 or 1, was {}", s),
                )),
            }
        };
        Ok(CategoryDefinition {
            category,
            invoke: flag(cols[1])?,
            group: flag(cols[2])?,
            length: cols[3].parse()?,
        })
    }

    fn parse_range(line: usize, cols: &[&str]) -> KakariResult<Range> {
        if cols.len() < 2 {
            return Err(KakariError::InvalidDataFormat(
                line,
                "range without category".to_owned(),
            ));
        }

        let r: Vec<_> = cols[0].split("..").collect();
        let begin = u32::from_str_radix(r[0].trim_start_matches("0x"), 16)?;
        let end = if r.len() > 1 {
            u32::from_str_radix(r[1].trim_start_matches("0x"), 16)? + 1
        } else {
            begin + 1
        };
        if begin >= end {
            return Err(KakariError::InvalidDataFormat(
                line,
                format!("empty range {}", cols[0]),
            ));
        }

        let primary: CategoryType = cols[1].parse()?;
        let mut categories = primary;
        for elem in &cols[2..] {
            categories |= elem.parse::<CategoryType>()?;
        }

        Ok(Range {
            begin,
            end,
            primary,
            categories,
        })
    }

    fn range_of(&self, c: char) -> Option<&Range> {
        let cp = c as u32;
        self.ranges.iter().rev().find(|r| r.contains(cp))
    }

    /// Returns a set of category types which given char has
    pub fn get_category_types(&self, c: char) -> CategoryType {
        self.range_of(c)
            .map(|r| r.categories)
            .unwrap_or(CategoryType::DEFAULT)
    }

    /// Category which decides how unknown words starting with `c` are built
    pub fn primary_category(&self, c: char) -> CategoryType {
        self.range_of(c)
            .map(|r| r.primary)
            .unwrap_or(CategoryType::DEFAULT)
    }

    pub fn definition(&self, category: CategoryType) -> &CategoryDefinition {
        self.definitions
            .iter()
            .find(|d| d.category == category)
            .or_else(|| {
                self.definitions
                    .iter()
                    .find(|d| d.category == CategoryType::DEFAULT)
            })
            .unwrap_or(&FALLBACK)
    }

    pub fn num_definitions(&self) -> usize {
        self.definitions.len()
    }
}

/// Used when `char.def` has no DEFAULT line
static FALLBACK: CategoryDefinition = CategoryDefinition {
    category: CategoryType::DEFAULT,
    invoke: false,
    group: true,
    length: 0,
};
