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

//! Parse results and their textual forms

use std::fmt::{Display, Formatter};
use std::ops::Range;
use std::str::FromStr;

use crate::analysis::morpheme::Morpheme;
use crate::charset::Charset;
use crate::chunk::Chunk;
use crate::dep::validate_links;
use crate::error::{KakariError, KakariResult};

pub mod format;
mod read;

pub use format::FormatType;

/// How far a sentence has been analysed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    RawSentence = 0,
    /// morphemes
    Pos = 1,
    /// chunk boundaries
    Chunk = 2,
    /// head and function morphemes with chunk features
    Selection = 3,
    /// dependency links
    Dep = 4,
}

impl Layer {
    pub const ALL: [Layer; 5] = [
        Layer::RawSentence,
        Layer::Pos,
        Layer::Chunk,
        Layer::Selection,
        Layer::Dep,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Layer> {
        Self::ALL.get(id as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Layer::RawSentence => "raw",
            Layer::Pos => "pos",
            Layer::Chunk => "chunk",
            Layer::Selection => "selection",
            Layer::Dep => "dep",
        }
    }

    /// Parses a layer given as a number or a name, errors name `option`
    pub fn parse_option(value: &str, option: &str) -> KakariResult<Layer> {
        let value = value.trim();
        let layer = match value.parse::<u8>() {
            Ok(id) => Layer::from_id(id),
            Err(_) => match value.to_ascii_lowercase().as_str() {
                "raw" | "raw_sentence" | "raw-sentence" => Some(Layer::RawSentence),
                "pos" => Some(Layer::Pos),
                "chunk" => Some(Layer::Chunk),
                "selection" => Some(Layer::Selection),
                "dep" => Some(Layer::Dep),
                _ => None,
            },
        };
        layer.ok_or_else(|| {
            KakariError::configuration(option, format!("unknown layer `{}`", value))
        })
    }
}

impl FromStr for Layer {
    type Err = KakariError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Layer::parse_option(s, "layer")
    }
}

impl Display for Layer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of parsing one sentence.
///
/// Morpheme byte ranges index into `text`, chunks partition the morphemes
/// and chunk links only point forward.
#[derive(Debug, Clone)]
pub struct ParseTree {
    pub(crate) text: String,
    pub(crate) charset: Charset,
    pub(crate) morphemes: Vec<Morpheme>,
    pub(crate) chunks: Vec<Chunk>,
    pub(crate) layer: Layer,
}

impl ParseTree {
    /// Unanalysed sentence
    pub fn new(text: &str, charset: Charset) -> ParseTree {
        ParseTree {
            text: text.to_owned(),
            charset,
            morphemes: Vec::new(),
            chunks: Vec::new(),
            layer: Layer::RawSentence,
        }
    }

    /// Assembles a tree analysed up to `layer`.
    ///
    /// Morphemes must lie inside `text`. From the chunk layer on, chunks
    /// must partition the morphemes and links must point forward; below
    /// it there must be no chunks.
    pub fn from_parts(
        text: String,
        charset: Charset,
        morphemes: Vec<Morpheme>,
        chunks: Vec<Chunk>,
        layer: Layer,
    ) -> KakariResult<ParseTree> {
        check_parts(&text, &morphemes, &chunks, layer)?;
        Ok(ParseTree {
            text,
            charset,
            morphemes,
            chunks,
            layer,
        })
    }

    /// Reads a tree written in the lattice format, up to `layer`
    pub fn read(input: &str, layer: Layer, charset: Charset) -> KakariResult<ParseTree> {
        read::read(input, layer, charset)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    pub fn morphemes(&self) -> &[Morpheme] {
        &self.morphemes
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn is_empty(&self) -> bool {
        self.morphemes.is_empty()
    }

    /// Morphemes of chunk `i`
    pub fn chunk_morphemes(&self, i: usize) -> &[Morpheme] {
        &self.morphemes[self.chunks[i].range()]
    }

    /// Byte range of chunk `i` in the text
    pub fn chunk_span(&self, i: usize) -> Range<usize> {
        let ms = self.chunk_morphemes(i);
        match (ms.first(), ms.last()) {
            (Some(first), Some(last)) => first.begin()..last.end(),
            _ => 0..0,
        }
    }

    pub fn chunk_surface(&self, i: usize) -> &str {
        &self.text[self.chunk_span(i)]
    }

    pub fn to_string_as(&self, format: FormatType) -> KakariResult<String> {
        format::format(self, format)
    }
}

fn check_parts(text: &str, morphemes: &[Morpheme], chunks: &[Chunk], layer: Layer) -> KakariResult<()> {
    let invalid = |reason: String| KakariError::InvalidDataFormat(0, reason);
    for (i, m) in morphemes.iter().enumerate() {
        if text.get(m.begin()..m.end()).is_none() {
            return Err(invalid(format!("morpheme {} is out of the text", i)));
        }
    }

    if layer < Layer::Chunk {
        if !chunks.is_empty() {
            return Err(invalid(format!("chunks in a tree of layer {}", layer)));
        }
        return Ok(());
    }

    let mut expected = 0;
    for (i, chunk) in chunks.iter().enumerate() {
        if chunk.begin != expected || chunk.is_empty() {
            return Err(invalid(format!("chunk {} does not continue the previous one", i)));
        }
        if chunk.head >= chunk.len() || chunk.func >= chunk.len() {
            return Err(invalid(format!("head/func out of chunk {}", i)));
        }
        if chunk.link.map_or(false, |l| l >= chunks.len()) {
            return Err(invalid(format!("link of chunk {} out of range", i)));
        }
        expected = chunk.end;
    }
    if expected != morphemes.len() {
        return Err(invalid(format!(
            "chunks cover {} of {} morphemes",
            expected,
            morphemes.len()
        )));
    }
    validate_links(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::{assert_matches, assert_ok};

    #[test]
    fn layer_names_and_numbers() {
        assert_eq!(Layer::Dep, "4".parse::<Layer>().unwrap());
        assert_eq!(Layer::Selection, "selection".parse::<Layer>().unwrap());
        assert!(Layer::Pos < Layer::Chunk);
        assert_matches!(
            Layer::parse_option("7", "input-layer"),
            Err(KakariError::Configuration { option, .. }) if option == "input-layer"
        );
    }

    #[test]
    fn chunk_surface() {
        let ms = vec![
            Morpheme::from_feature_string("この", 0, "連体詞,*,*,*,*,*,この,コノ,コノ"),
            Morpheme::from_feature_string("本", 6, "名詞,一般,*,*,*,*,本,ホン,ホン"),
            Morpheme::from_feature_string("を", 9, "助詞,格助詞,一般,*,*,*,を,ヲ,ヲ"),
        ];
        let chunks = vec![Chunk::new(0, 1), Chunk::new(1, 3)];
        let tree = ParseTree::from_parts("この本を".to_owned(), Charset::Utf8, ms, chunks, Layer::Chunk)
            .unwrap();
        assert_eq!("この", tree.chunk_surface(0));
        assert_eq!("本を", tree.chunk_surface(1));
        assert_eq!(6..12, tree.chunk_span(1));
    }

    fn hon() -> Vec<Morpheme> {
        vec![Morpheme::from_feature_string("本", 0, "名詞,一般,*,*,*,*,本,ホン,ホン")]
    }

    #[test]
    fn chunk_past_the_morphemes() {
        let tree = ParseTree::from_parts(
            "本".to_owned(),
            Charset::Utf8,
            hon(),
            vec![Chunk::new(0, 2)],
            Layer::Chunk,
        );
        assert_matches!(tree, Err(KakariError::InvalidDataFormat(0, _)));
    }

    #[test]
    fn chunks_must_cover_morphemes() {
        let make = |chunks| ParseTree::from_parts("本".to_owned(), Charset::Utf8, hon(), chunks, Layer::Dep);
        assert_matches!(make(vec![]), Err(KakariError::InvalidDataFormat(0, _)));
        let mut bad_head = Chunk::new(0, 1);
        bad_head.head = 1;
        assert_matches!(make(vec![bad_head]), Err(KakariError::InvalidDataFormat(0, _)));
        assert_ok!(make(vec![Chunk::new(0, 1)]));
    }

    #[test]
    fn morpheme_outside_text() {
        let tree = ParseTree::from_parts("".to_owned(), Charset::Utf8, hon(), vec![], Layer::Pos);
        assert_matches!(tree, Err(KakariError::InvalidDataFormat(0, _)));
    }

    #[test]
    fn no_chunks_below_chunk_layer() {
        let tree =
            ParseTree::from_parts("本".to_owned(), Charset::Utf8, hon(), vec![Chunk::new(0, 1)], Layer::Pos);
        assert_matches!(tree, Err(KakariError::InvalidDataFormat(0, _)));
    }

    #[test]
    fn self_link() {
        let mut c = Chunk::new(0, 1);
        c.link = Some(0);
        let tree = ParseTree::from_parts("本".to_owned(), Charset::Utf8, hon(), vec![c], Layer::Chunk);
        assert_matches!(
            tree,
            Err(KakariError::Consistency { source_chunk: 0, target: 0, .. })
        );
    }
}
