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

use log::{debug, warn};

use crate::analysis::lattice::Lattice;
use crate::analysis::morpheme::Morpheme;
use crate::analysis::node::{Node, WordRef};
use crate::dic::category_type::CategoryType;
use crate::dic::DictionaryAccess;
use crate::prelude::*;

/// Default cap for grouped unknown words, in characters
pub const DEFAULT_MAX_UNKNOWN_LENGTH: usize = 24;

/// Morphological segmenter: lattice construction and Viterbi search
///
/// Generic over dictionary pointers, `&Dictionary` and `Arc<Dictionary>` both work.
pub struct Segmenter<D> {
    dict: D,
    max_unknown_length: usize,
    debug: bool,
}

impl<D: DictionaryAccess> Segmenter<D> {
    pub fn new(dict: D, max_unknown_length: usize) -> Segmenter<D> {
        Segmenter {
            dict,
            max_unknown_length: max_unknown_length.max(1),
            debug: false,
        }
    }

    /// Dump every lattice through `log::debug!`
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Splits `text` into morphemes whose surfaces concatenate back to `text`
    pub fn segment(&self, text: &str) -> KakariResult<Vec<Morpheme>> {
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let mut lattice = Lattice::default();
        match self.build_lattice(text, &mut lattice) {
            Ok(()) => {}
            Err(e @ KakariError::Segmentation { .. }) => {
                warn!("{}, falling back to one word per character", e);
                return Ok(self.per_character(text));
            }
            Err(e) => return Err(e),
        }

        if self.debug {
            let mut buf = Vec::new();
            lattice.dump(text, &self.dict, &mut buf)?;
            debug!("lattice:\n{}", String::from_utf8_lossy(&buf));
        }

        let morphemes = lattice
            .best_path()
            .into_iter()
            .map(|node| self.to_morpheme(text, node))
            .collect();
        Ok(morphemes)
    }

    fn build_lattice(&self, text: &str, lattice: &mut Lattice) -> KakariResult<()> {
        let lexicon = self.dict.lexicon();
        let conn = self.dict.connection();
        let input = text.as_bytes();
        lattice.reset(input.len(), lexicon.len());

        for (offset, _) in text.char_indices() {
            if !lattice.has_previous_node(offset) {
                continue;
            }

            let mut has_words = false;
            for (id, end) in lexicon.lookup(input, offset) {
                let e = lexicon.entry(id);
                let node = Node::new(offset, end, e.left_id, e.right_id, e.cost, WordRef::Known(id));
                has_words |= lattice.insert(node, conn);
            }

            let inserted = self.provide_unknown_words(text, offset, has_words, lattice);
            if !has_words && inserted == 0 {
                self.insert_default(text, offset, lattice);
            }
        }

        lattice.connect_eos(conn)
    }

    /// Unknown word candidates following the definition of the category
    /// of the character at `offset`, returns how many were inserted
    fn provide_unknown_words(
        &self,
        text: &str,
        offset: usize,
        has_words: bool,
        lattice: &mut Lattice,
    ) -> usize {
        let cat = self.dict.character_category();
        let rest = &text[offset..];
        let first = match rest.chars().next() {
            Some(c) => c,
            None => return 0,
        };
        let category = cat.primary_category(first);
        let def = cat.definition(category);
        if has_words && !def.invoke {
            return 0;
        }

        // end offsets after 1, 2, ... characters of the same category
        let mut run_ends = Vec::new();
        for (i, c) in rest.char_indices() {
            if i > 0 && !cat.get_category_types(c).contains(category) {
                break;
            }
            run_ends.push(offset + i + c.len_utf8());
            if run_ends.len() >= self.max_unknown_length {
                break;
            }
        }

        let mut inserted = 0;
        if def.group {
            if let Some(&end) = run_ends.last() {
                inserted += self.insert_unknown(category, offset, end, lattice);
            }
        }
        for n in 1..=def.length.min(run_ends.len()) {
            if def.group && n == run_ends.len() {
                continue;
            }
            inserted += self.insert_unknown(category, offset, run_ends[n - 1], lattice);
        }
        inserted
    }

    fn insert_default(&self, text: &str, offset: usize, lattice: &mut Lattice) {
        let end = text[offset..]
            .chars()
            .next()
            .map(|c| offset + c.len_utf8())
            .unwrap_or(offset);
        self.insert_unknown(CategoryType::DEFAULT, offset, end, lattice);
    }

    fn insert_unknown(
        &self,
        category: CategoryType,
        begin: usize,
        end: usize,
        lattice: &mut Lattice,
    ) -> usize {
        let unknown = self.dict.unknown();
        let conn = self.dict.connection();
        let mut inserted = 0;
        for &id in unknown.templates(category) {
            let e = unknown.entry(id);
            let node = Node::new(begin, end, e.left_id, e.right_id, e.cost, WordRef::Unknown(id));
            if lattice.insert(node, conn) {
                inserted += 1;
            }
        }
        inserted
    }

    fn to_morpheme(&self, text: &str, node: &Node) -> Morpheme {
        let surface = &text[node.begin()..node.end()];
        match node.word() {
            WordRef::Known(id) => {
                let e = self.dict.lexicon().entry(id);
                Morpheme::new(surface, node.begin(), e.features.clone(), false)
            }
            WordRef::Unknown(id) => {
                let e = self.dict.unknown().entry(id);
                Morpheme::new(surface, node.begin(), e.features.clone(), true)
            }
            WordRef::Bos | WordRef::Eos => Morpheme::new(surface, node.begin(), Vec::new(), true),
        }
    }

    /// One unknown word per character, features of the first DEFAULT template
    fn per_character(&self, text: &str) -> Vec<Morpheme> {
        let unknown = self.dict.unknown();
        let features = unknown
            .templates(CategoryType::DEFAULT)
            .first()
            .map(|&id| unknown.entry(id).features.clone())
            .unwrap_or_default();
        text.char_indices()
            .map(|(i, c)| Morpheme::new(&text[i..i + c.len_utf8()], i, features.clone(), true))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dic::character_category::CharacterCategory;
    use crate::dic::connect::ConnectionMatrix;
    use crate::dic::lexicon::Lexicon;
    use crate::dic::unknown::UnknownDictionary;
    use crate::dic::Dictionary;
    use std::io::Cursor;

    const LEX: &str = "\
東京,1,1,1000,名詞,固有名詞,地域,一般,*,*,東京,トウキョウ,トーキョー
京都,1,1,1000,名詞,固有名詞,地域,一般,*,*,京都,キョウト,キョート
都,1,1,2500,名詞,一般,*,*,*,*,都,ミヤコ,ミヤコ
に,2,2,300,助詞,格助詞,一般,*,*,*,に,ニ,ニ
行く,3,3,1500,動詞,自立,*,*,五段・カ行促音便,基本形,行く,イク,イク
";

    const CHAR_DEF: &str = "\
DEFAULT 0 1 0
HIRAGANA 0 1 2
KATAKANA 1 1 0
KANJI 0 0 2
ALPHA 1 1 0
0x0041..0x005A ALPHA
0x3041..0x309F HIRAGANA
0x30A1..0x30FF KATAKANA
0x4E00..0x9FFF KANJI
";

    const UNK: &str = "\
DEFAULT,4,4,5000,記号,一般,*,*,*,*,*
HIRAGANA,4,4,6000,名詞,一般,*,*,*,*,*
KATAKANA,1,1,3000,名詞,一般,*,*,*,*,*
KANJI,1,1,4000,名詞,一般,*,*,*,*,*
ALPHA,1,1,3000,名詞,固有名詞,組織,*,*,*,*
";

    fn dictionary() -> Dictionary {
        let conn = ConnectionMatrix::from_reader(Cursor::new("5 5\n1 2 -200\n2 3 -200\n")).unwrap();
        Dictionary::from_parts(
            Lexicon::from_reader(Cursor::new(LEX)).unwrap(),
            conn,
            CharacterCategory::from_reader(Cursor::new(CHAR_DEF)).unwrap(),
            UnknownDictionary::from_reader(Cursor::new(UNK)).unwrap(),
        )
    }

    fn surfaces(ms: &[Morpheme]) -> Vec<&str> {
        ms.iter().map(|m| m.surface()).collect()
    }

    #[test]
    fn empty_text() {
        let dict = dictionary();
        let seg = Segmenter::new(&dict, DEFAULT_MAX_UNKNOWN_LENGTH);
        assert!(seg.segment("").unwrap().is_empty());
    }

    #[test]
    fn dictionary_words() {
        let dict = dictionary();
        let seg = Segmenter::new(&dict, DEFAULT_MAX_UNKNOWN_LENGTH);
        let ms = seg.segment("東京に行く").unwrap();
        assert_eq!(vec!["東京", "に", "行く"], surfaces(&ms));
        assert_eq!("助詞", ms[1].pos(0));
        assert_eq!(6..9, ms[1].range());
        assert!(!ms[0].is_unknown());
    }

    #[test]
    fn grouped_unknown_katakana() {
        let dict = dictionary();
        let seg = Segmenter::new(&dict, DEFAULT_MAX_UNKNOWN_LENGTH);
        let ms = seg.segment("カタカナに行く").unwrap();
        assert_eq!(vec!["カタカナ", "に", "行く"], surfaces(&ms));
        assert!(ms[0].is_unknown());
        assert_eq!("名詞", ms[0].pos(0));
    }

    #[test]
    fn group_is_capped() {
        let dict = dictionary();
        let seg = Segmenter::new(&dict, 2);
        let ms = seg.segment("カタカナ").unwrap();
        assert_eq!(vec!["カタ", "カナ"], surfaces(&ms));
    }

    #[test]
    fn uncategorized_character_is_default_word() {
        let dict = dictionary();
        let seg = Segmenter::new(&dict, DEFAULT_MAX_UNKNOWN_LENGTH);
        let ms = seg.segment("東京★").unwrap();
        assert_eq!(vec!["東京", "★"], surfaces(&ms));
        assert_eq!("記号", ms[1].pos(0));
    }

    #[test]
    fn surfaces_cover_input() {
        let dict = dictionary();
        let seg = Segmenter::new(&dict, DEFAULT_MAX_UNKNOWN_LENGTH);
        let text = "ABC東京都に行くカナ!?";
        let ms = seg.segment(text).unwrap();
        let joined: String = ms.iter().map(|m| m.surface()).collect();
        assert_eq!(text, joined);
        let mut prev = 0;
        for m in ms.iter() {
            assert_eq!(prev, m.begin());
            prev = m.end();
        }
        assert_eq!(text.len(), prev);
    }

    #[test]
    fn deterministic() {
        let dict = dictionary();
        let seg = Segmenter::new(&dict, DEFAULT_MAX_UNKNOWN_LENGTH);
        let text = "東京都に行く";
        assert_eq!(seg.segment(text).unwrap(), seg.segment(text).unwrap());
    }

    #[test]
    fn per_character_fallback_covers_input() {
        let dict = dictionary();
        let seg = Segmenter::new(&dict, DEFAULT_MAX_UNKNOWN_LENGTH);
        let ms = seg.per_character("東に");
        assert_eq!(vec!["東", "に"], surfaces(&ms));
        assert!(ms.iter().all(|m| m.is_unknown() && m.pos(0) == "記号"));
    }
}
