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

use crate::analysis::morpheme::Morpheme;
use crate::chunk::pattern::{ChunkPatterns, PatternMatcher};
use crate::chunk::Chunk;
use crate::error::KakariResult;

/// Whether a morpheme begins a new chunk or continues the current one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Begin,
    Inside,
}

impl Label {
    pub fn as_str(self) -> &'static str {
        match self {
            Label::Begin => "B",
            Label::Inside => "I",
        }
    }
}

/// Labels every morpheme of a sentence, the first label must be `Begin`
pub trait BoundaryClassifier {
    fn classify(&self, morphemes: &[Morpheme]) -> Vec<Label>;
}

/// Boundary rules over IPADIC style features
#[derive(Debug, Clone)]
pub struct RuleClassifier {
    attach: PatternMatcher,
    prefix: PatternMatcher,
    open_bracket: PatternMatcher,
}

impl RuleClassifier {
    pub fn new(patterns: &ChunkPatterns) -> KakariResult<RuleClassifier> {
        Ok(RuleClassifier {
            attach: patterns.attach.parse()?,
            prefix: patterns.prefix.parse()?,
            open_bracket: patterns.open_bracket.parse()?,
        })
    }

    fn is_noun(m: &Morpheme) -> bool {
        m.pos(0) == "名詞"
    }

    fn label(&self, prev: &Morpheme, cur: &Morpheme) -> Label {
        let feature = cur.feature();
        if self.attach.prefix_match(&feature) {
            return Label::Inside;
        }
        if self.prefix.prefix_match(&prev.feature())
            || self.open_bracket.matches(prev.normalized_surface()).is_some()
        {
            return Label::Inside;
        }
        // compound noun
        if Self::is_noun(prev) && Self::is_noun(cur) {
            return Label::Inside;
        }
        // サ変接続 noun + する
        if prev.pos(0) == "名詞"
            && prev.pos(1) == "サ変接続"
            && cur.pos(0) == "動詞"
            && cur.base_form() == "する"
        {
            return Label::Inside;
        }
        Label::Begin
    }
}

impl BoundaryClassifier for RuleClassifier {
    fn classify(&self, morphemes: &[Morpheme]) -> Vec<Label> {
        let mut labels = Vec::with_capacity(morphemes.len());
        for (i, m) in morphemes.iter().enumerate() {
            if i == 0 {
                labels.push(Label::Begin);
            } else {
                labels.push(self.label(&morphemes[i - 1], m));
            }
        }
        labels
    }
}

/// Groups morphemes into chunks with a boundary classifier
pub struct Chunker<C = RuleClassifier> {
    classifier: C,
}

impl Chunker<RuleClassifier> {
    pub fn from_patterns(patterns: &ChunkPatterns) -> KakariResult<Chunker<RuleClassifier>> {
        Ok(Chunker::new(RuleClassifier::new(patterns)?))
    }
}

impl<C: BoundaryClassifier> Chunker<C> {
    pub fn new(classifier: C) -> Chunker<C> {
        Chunker { classifier }
    }

    /// Chunks partitioning `morphemes` in text order
    pub fn chunk(&self, morphemes: &[Morpheme]) -> Vec<Chunk> {
        let labels = self.classifier.classify(morphemes);
        debug_assert_eq!(labels.len(), morphemes.len());

        let mut chunks = Vec::new();
        let mut begin = 0;
        for (i, label) in labels.iter().enumerate().skip(1) {
            if *label == Label::Begin {
                chunks.push(Chunk::new(begin, i));
                begin = i;
            }
        }
        if !morphemes.is_empty() {
            chunks.push(Chunk::new(begin, morphemes.len()));
        }
        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(surface: &str, feature: &str) -> Morpheme {
        Morpheme::from_feature_string(surface, 0, feature)
    }

    fn sentence() -> Vec<Morpheme> {
        vec![
            m("太郎", "名詞,固有名詞,人名,名,*,*,太郎,タロウ,タロー"),
            m("は", "助詞,係助詞,*,*,*,*,は,ハ,ワ"),
            m("この", "連体詞,*,*,*,*,*,この,コノ,コノ"),
            m("本", "名詞,一般,*,*,*,*,本,ホン,ホン"),
            m("を", "助詞,格助詞,一般,*,*,*,を,ヲ,ヲ"),
            m("渡し", "動詞,自立,*,*,五段・サ行,連用形,渡す,ワタシ,ワタシ"),
            m("た", "助動詞,*,*,*,特殊・タ,基本形,た,タ,タ"),
            m(".", "記号,句点,*,*,*,*,.,.,."),
        ]
    }

    fn ranges(chunks: &[Chunk]) -> Vec<(usize, usize)> {
        chunks.iter().map(|c| (c.begin, c.end)).collect()
    }

    #[test]
    fn labels() {
        let c = RuleClassifier::new(&ChunkPatterns::default()).unwrap();
        let labels: String = c
            .classify(&sentence())
            .iter()
            .map(|l| l.as_str())
            .collect();
        assert_eq!("BIBBIBII", labels);
    }

    #[test]
    fn chunks_partition_morphemes() {
        let chunker = Chunker::from_patterns(&ChunkPatterns::default()).unwrap();
        let chunks = chunker.chunk(&sentence());
        assert_eq!(vec![(0, 2), (2, 3), (3, 5), (5, 8)], ranges(&chunks));
    }

    #[test]
    fn compound_and_prefix() {
        let chunker = Chunker::from_patterns(&ChunkPatterns::default()).unwrap();
        let ms = vec![
            m("お", "接頭詞,名詞接続,*,*,*,*,お,オ,オ"),
            m("茶", "名詞,一般,*,*,*,*,茶,チャ,チャ"),
            m("研究", "名詞,サ変接続,*,*,*,*,研究,ケンキュウ,ケンキュー"),
            m("し", "動詞,自立,*,*,サ変・スル,連用形,する,シ,シ"),
            m("「", "記号,括弧開,*,*,*,*,「,「,「"),
            m("本", "名詞,一般,*,*,*,*,本,ホン,ホン"),
            m("」", "記号,括弧閉,*,*,*,*,」,」,」"),
        ];
        let chunks = chunker.chunk(&ms);
        assert_eq!(vec![(0, 4), (4, 7)], ranges(&chunks));
    }

    #[test]
    fn empty_input() {
        let chunker = Chunker::from_patterns(&ChunkPatterns::default()).unwrap();
        assert!(chunker.chunk(&[]).is_empty());
    }

    struct EveryMorpheme;

    impl BoundaryClassifier for EveryMorpheme {
        fn classify(&self, morphemes: &[Morpheme]) -> Vec<Label> {
            vec![Label::Begin; morphemes.len()]
        }
    }

    #[test]
    fn custom_classifier() {
        let chunker = Chunker::new(EveryMorpheme);
        assert_eq!(8, chunker.chunk(&sentence()).len());
    }
}
