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

use std::ops::Range;

use crate::ne::EntityTag;
use crate::normalizer::normalize_surface;

const CTYPE: usize = 4;
const CFORM: usize = 5;
const BASE: usize = 6;
const READING: usize = 7;
const PRONUNCIATION: usize = 8;

/// Number of part of speech levels
pub const POS_DEPTH: usize = 4;

/// A morpheme: a span of the canonical text with its dictionary features
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Morpheme {
    surface: String,
    begin: usize,
    features: Vec<String>,
    normalized_surface: String,
    unknown: bool,
    ne: Option<EntityTag>,
}

fn non_empty(s: Option<&String>) -> &str {
    match s {
        Some(s) if s != "*" => s,
        _ => "",
    }
}

impl Morpheme {
    /// `begin` is the byte offset of the surface in the canonical text
    pub fn new(surface: &str, begin: usize, features: Vec<String>, unknown: bool) -> Morpheme {
        Morpheme {
            surface: surface.to_owned(),
            begin,
            features,
            normalized_surface: normalize_surface(surface),
            unknown,
            ne: None,
        }
    }

    /// Creates a morpheme from a `surface<TAB>feature` lattice line
    pub fn from_feature_string(surface: &str, begin: usize, feature: &str) -> Morpheme {
        let features = if feature.is_empty() {
            Vec::new()
        } else {
            feature.split(',').map(|s| s.to_owned()).collect()
        };
        Morpheme::new(surface, begin, features, false)
    }

    pub fn surface(&self) -> &str {
        &self.surface
    }

    pub fn begin(&self) -> usize {
        self.begin
    }

    pub fn end(&self) -> usize {
        self.begin + self.surface.len()
    }

    /// Byte range into the canonical text
    pub fn range(&self) -> Range<usize> {
        self.begin()..self.end()
    }

    /// Part of speech level `level` (0-based), empty when unset
    pub fn pos(&self, level: usize) -> &str {
        if level >= POS_DEPTH {
            return "";
        }
        non_empty(self.features.get(level))
    }

    /// Part of speech levels up to the first unset one
    pub fn pos_levels(&self) -> impl Iterator<Item = &str> {
        (0..POS_DEPTH)
            .map(move |i| self.pos(i))
            .take_while(|s| !s.is_empty())
    }

    pub fn conjugation_type(&self) -> &str {
        non_empty(self.features.get(CTYPE))
    }

    pub fn conjugation_form(&self) -> &str {
        non_empty(self.features.get(CFORM))
    }

    /// Dictionary form, the surface when the entry has none
    pub fn base_form(&self) -> &str {
        match non_empty(self.features.get(BASE)) {
            "" => &self.surface,
            b => b,
        }
    }

    pub fn reading(&self) -> &str {
        non_empty(self.features.get(READING))
    }

    pub fn pronunciation(&self) -> &str {
        non_empty(self.features.get(PRONUNCIATION))
    }

    pub fn normalized_surface(&self) -> &str {
        &self.normalized_surface
    }

    /// Raw feature columns, `*` included
    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Comma joined feature columns
    pub fn feature(&self) -> String {
        self.features.join(",")
    }

    pub fn is_unknown(&self) -> bool {
        self.unknown
    }

    /// Named entity tag, None when entities were not tagged
    pub fn ne(&self) -> Option<&EntityTag> {
        self.ne.as_ref()
    }

    pub fn set_ne(&mut self, tag: Option<EntityTag>) {
        self.ne = tag;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn watashi() -> Morpheme {
        Morpheme::from_feature_string(
            "渡し",
            27,
            "動詞,自立,*,*,五段・サ行,連用形,渡す,ワタシ,ワタシ",
        )
    }

    #[test]
    fn accessors() {
        let m = watashi();
        assert_eq!("渡し", m.surface());
        assert_eq!(27..33, m.range());
        assert_eq!("動詞", m.pos(0));
        assert_eq!("", m.pos(2));
        assert_eq!(vec!["動詞", "自立"], m.pos_levels().collect::<Vec<_>>());
        assert_eq!("五段・サ行", m.conjugation_type());
        assert_eq!("連用形", m.conjugation_form());
        assert_eq!("渡す", m.base_form());
        assert_eq!("ワタシ", m.reading());
        assert!(!m.is_unknown());
    }

    #[test]
    fn feature_round_trip() {
        let m = watashi();
        assert_eq!("動詞,自立,*,*,五段・サ行,連用形,渡す,ワタシ,ワタシ", m.feature());
    }

    #[test]
    fn missing_columns_are_empty() {
        let m = Morpheme::new("ＡＢ", 0, vec!["名詞".to_owned()], true);
        assert_eq!("", m.reading());
        assert_eq!("ＡＢ", m.base_form());
        assert_eq!("AB", m.normalized_surface());
        assert!(m.is_unknown());
    }
}
