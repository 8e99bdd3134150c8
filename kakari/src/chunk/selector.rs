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

use itertools::Itertools;

use crate::analysis::morpheme::{Morpheme, POS_DEPTH};
use crate::chunk::pattern::{ChunkPatterns, CompiledPatterns};
use crate::chunk::Chunk;
use crate::error::KakariResult;

/// Chooses head and function morphemes of every chunk
/// and computes the chunk features used by the dependency resolver
///
/// Feature families, by first letter:
/// `F` static features of the chunk, `G` gap features seen when the chunk
/// lies between a source and a target, `A`/`B` dynamic features seen by the
/// chunk a child attaches to, `L` and `R` context features of neighbours.
#[derive(Debug, Clone)]
pub struct Selector {
    patterns: CompiledPatterns,
}

/// Part of speech levels joined with `-`, up to the first unset level
fn concat_pos(m: &Morpheme) -> String {
    m.pos_levels().join("-")
}

impl Selector {
    pub fn new(patterns: &ChunkPatterns) -> KakariResult<Selector> {
        Ok(Selector {
            patterns: patterns.compile()?,
        })
    }

    pub fn select(&self, morphemes: &[Morpheme], chunks: &mut [Chunk]) {
        let size = chunks.len();
        for (i, chunk) in chunks.iter_mut().enumerate() {
            let mut features = Vec::new();
            let (hid, fid) = self.find_head(&morphemes[chunk.range()], &mut features);
            chunk.head = hid;
            chunk.func = fid;

            let htoken = &morphemes[chunk.begin + hid];
            let ftoken = &morphemes[chunk.begin + fid];
            Self::token_features("F_H", htoken, &mut features);
            Self::token_features("F_F", ftoken, &mut features);

            let fsurface = ftoken.normalized_surface();
            let ffeature = ftoken.feature();
            if self.patterns.dyn_a.prefix_match(&ffeature) {
                features.push(format!("A:{}", fsurface));
            } else if !ftoken.conjugation_form().is_empty() {
                features.push(format!("A:{}", ftoken.conjugation_form()));
            } else {
                features.push(format!("A:{}", concat_pos(ftoken)));
            }
            features.push(format!("B:{}", concat_pos(htoken)));

            if self.patterns.case.prefix_match(&ffeature) {
                features.push(format!("G_CASE:{}", fsurface));
            }

            features.push(format!("L_F0:{}", fsurface));
            if !htoken.pos(0).is_empty() {
                features.push(format!("R_H1:{}", htoken.pos(0)));
            }

            if i == 0 {
                features.push("F_BOS:1".to_owned());
            }
            if i + 1 == size {
                features.push("F_EOS:1".to_owned());
            }

            chunk.features = features;
        }
    }

    /// Head and function positions relative to the chunk start,
    /// punctuation and bracket features are collected on the way
    fn find_head(&self, tokens: &[Morpheme], features: &mut Vec<String>) -> (usize, usize) {
        let mut hid = 0;
        let mut fid = 0;
        for (j, token) in tokens.iter().enumerate() {
            let surface = token.normalized_surface();
            if let Some(p) = self.patterns.punct.matches(surface) {
                features.push(format!("G_PUNC:{}", p));
                features.push(format!("F_PUNC:{}", p));
            }
            if let Some(p) = self.patterns.open_bracket.matches(surface) {
                features.push(format!("G_OB:{}", p));
                features.push(format!("F_OB:{}", p));
            }
            if let Some(p) = self.patterns.close_bracket.matches(surface) {
                features.push(format!("G_CB:{}", p));
                features.push(format!("F_CB:{}", p));
            }

            let feature = token.feature();
            if self.patterns.func.prefix_match(&feature) {
                fid = j;
            } else if !self.patterns.non_head.prefix_match(&feature) {
                hid = j;
            }
        }
        if hid > fid {
            fid = hid;
        }
        (hid, fid)
    }

    /// `{prefix}0` surface, `{prefix}1..4` part of speech levels,
    /// `{prefix}5` conjugation type, `{prefix}6` conjugation form
    fn token_features(prefix: &str, token: &Morpheme, features: &mut Vec<String>) {
        features.push(format!("{}0:{}", prefix, token.normalized_surface()));
        for (k, pos) in token.pos_levels().enumerate().take(POS_DEPTH) {
            features.push(format!("{}{}:{}", prefix, k + 1, pos));
        }
        if !token.conjugation_type().is_empty() {
            features.push(format!("{}5:{}", prefix, token.conjugation_type()));
        }
        if !token.conjugation_form().is_empty() {
            features.push(format!("{}6:{}", prefix, token.conjugation_form()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::Chunker;

    fn m(surface: &str, feature: &str) -> Morpheme {
        Morpheme::from_feature_string(surface, 0, feature)
    }

    fn selected(ms: &[Morpheme]) -> Vec<Chunk> {
        let patterns = ChunkPatterns::default();
        let mut chunks = Chunker::from_patterns(&patterns).unwrap().chunk(ms);
        Selector::new(&patterns).unwrap().select(ms, &mut chunks);
        chunks
    }

    #[test]
    fn head_and_function() {
        let ms = vec![
            m("本", "名詞,一般,*,*,*,*,本,ホン,ホン"),
            m("を", "助詞,格助詞,一般,*,*,*,を,ヲ,ヲ"),
            m("渡し", "動詞,自立,*,*,五段・サ行,連用形,渡す,ワタシ,ワタシ"),
            m("た", "助動詞,*,*,*,特殊・タ,基本形,た,タ,タ"),
            m("。", "記号,句点,*,*,*,*,。,。,。"),
        ];
        let chunks = selected(&ms);
        assert_eq!(2, chunks.len());
        assert_eq!((0, 1), (chunks[0].head, chunks[0].func));
        assert_eq!((0, 1), (chunks[1].head, chunks[1].func));

        let c = &chunks[0];
        assert_eq!(Some("本"), c.feature("F_H0"));
        assert_eq!(Some("名詞"), c.feature("F_H1"));
        assert_eq!(Some("一般"), c.feature("F_H2"));
        assert_eq!(Some("格助詞"), c.feature("F_F2"));
        assert_eq!(Some("を"), c.feature("A"));
        assert_eq!(Some("名詞-一般"), c.feature("B"));
        assert_eq!(Some("を"), c.feature("G_CASE"));
        assert_eq!(Some("1"), c.feature("F_BOS"));
        assert_eq!(None, c.feature("F_EOS"));

        let c = &chunks[1];
        assert_eq!(Some("五段・サ行"), c.feature("F_H5"));
        assert_eq!(Some("連用形"), c.feature("F_H6"));
        assert_eq!(Some("基本形"), c.feature("A"));
        assert_eq!(Some("。"), c.feature("G_PUNC"));
        assert_eq!(Some("1"), c.feature("F_EOS"));
    }

    #[test]
    fn head_after_function_moves_function() {
        // no function word: both point at the content word
        let ms = vec![m("この", "連体詞,*,*,*,*,*,この,コノ,コノ")];
        let chunks = selected(&ms);
        assert_eq!((0, 0), (chunks[0].head, chunks[0].func));
        assert_eq!(Some("連体詞"), chunks[0].feature("A"));
    }

    #[test]
    fn brackets_are_features() {
        let ms = vec![
            m("「", "記号,括弧開,*,*,*,*,「,「,「"),
            m("本", "名詞,一般,*,*,*,*,本,ホン,ホン"),
            m("」", "記号,括弧閉,*,*,*,*,」,」,」"),
        ];
        let chunks = selected(&ms);
        assert_eq!(1, chunks.len());
        assert_eq!(1, chunks[0].head);
        assert_eq!(Some("「"), chunks[0].feature("G_OB"));
        assert_eq!(Some("」"), chunks[0].feature("F_CB"));
    }
}
