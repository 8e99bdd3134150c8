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

//! Grouping of morphemes into chunks (base phrases) and head/function selection

use std::ops::Range;

pub mod chunker;
pub mod pattern;
pub mod selector;

pub use chunker::{BoundaryClassifier, Chunker, Label, RuleClassifier};
pub use pattern::{ChunkPatterns, PatternMatcher};
pub use selector::Selector;

/// A contiguous morpheme range with its dependency annotation
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// first morpheme index
    pub begin: usize,
    /// one past the last morpheme index
    pub end: usize,
    /// head morpheme, relative to `begin`
    pub head: usize,
    /// function morpheme, relative to `begin`
    pub func: usize,
    /// index of the chunk this one modifies
    pub link: Option<usize>,
    pub score: f64,
    /// features selected for the dependency resolver
    pub features: Vec<String>,
}

impl Chunk {
    pub fn new(begin: usize, end: usize) -> Chunk {
        Chunk {
            begin,
            end,
            head: 0,
            func: 0,
            link: None,
            score: 0.0,
            features: Vec::new(),
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.begin..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// Absolute index of the head morpheme
    pub fn head_index(&self) -> usize {
        self.begin + self.head
    }

    /// Absolute index of the function morpheme
    pub fn func_index(&self) -> usize {
        self.begin + self.func
    }

    /// Value of the first feature named `name`, e.g. `F_H1`
    pub fn feature(&self, name: &str) -> Option<&str> {
        self.features.iter().find_map(|f| {
            let (k, v) = f.split_once(':')?;
            if k == name {
                Some(v)
            } else {
                None
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_relative() {
        let mut c = Chunk::new(3, 6);
        c.head = 1;
        c.func = 2;
        assert_eq!(4, c.head_index());
        assert_eq!(5, c.func_index());
        assert_eq!(3, c.len());
        assert_eq!(3..6, c.range());
    }

    #[test]
    fn feature_lookup() {
        let mut c = Chunk::new(0, 1);
        c.features = vec!["F_H0:本".to_owned(), "F_H1:名詞".to_owned(), "A:を".to_owned()];
        assert_eq!(Some("名詞"), c.feature("F_H1"));
        assert_eq!(Some("を"), c.feature("A"));
        assert_eq!(None, c.feature("F_F1"));
    }
}
