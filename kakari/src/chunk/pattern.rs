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

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{KakariError, KakariResult};

/// A pattern or a list of alternatives written `(a|b|c)`
///
/// Patterns are plain strings: `prefix_match` tests the start of a
/// feature string such as `助詞,格助詞,一般,...`, `matches` tests equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatcher {
    patterns: Vec<String>,
}

impl PatternMatcher {
    pub fn compile(pattern: &str) -> KakariResult<PatternMatcher> {
        let pattern = pattern.trim();
        let patterns: Vec<String> =
            if pattern.len() >= 3 && pattern.starts_with('(') && pattern.ends_with(')') {
                pattern[1..pattern.len() - 1]
                    .split('|')
                    .filter(|p| !p.is_empty())
                    .map(|p| p.to_owned())
                    .collect()
            } else if pattern.is_empty() {
                Vec::new()
            } else {
                vec![pattern.to_owned()]
            };
        if patterns.is_empty() {
            return Err(KakariError::configuration(
                "chunkPatterns",
                format!("empty pattern `{}`", pattern),
            ));
        }
        Ok(PatternMatcher { patterns })
    }

    /// True when `s` starts with one of the alternatives
    pub fn prefix_match(&self, s: &str) -> bool {
        self.patterns.iter().any(|p| s.starts_with(p.as_str()))
    }

    /// The alternative equal to `s`
    pub fn matches(&self, s: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|p| p.as_str() == s)
            .map(|p| p.as_str())
    }
}

impl FromStr for PatternMatcher {
    type Err = KakariError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PatternMatcher::compile(s)
    }
}

impl Display for PatternMatcher {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({})", self.patterns.join("|"))
    }
}

/// Pattern sources used by the chunker and the selector,
/// the defaults are written for IPADIC features
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkPatterns {
    /// feature prefixes of morphemes which never begin a chunk
    pub attach: String,
    /// feature prefixes of prefixes, the next morpheme stays in the chunk
    pub prefix: String,
    /// normalized surfaces of opening brackets
    pub open_bracket: String,
    /// normalized surfaces of closing brackets
    pub close_bracket: String,
    /// feature prefixes of function words
    pub func: String,
    /// feature prefixes of morphemes which can not be a head
    pub non_head: String,
    /// normalized surfaces of punctuation
    pub punct: String,
    /// feature prefixes of case markers
    pub case: String,
    /// feature prefixes of function words whose surface is a dynamic feature
    pub dyn_a: String,
}

impl Default for ChunkPatterns {
    fn default() -> Self {
        ChunkPatterns {
            attach: "(助詞|助動詞|動詞,非自立|動詞,接尾|形容詞,非自立|形容詞,接尾|名詞,接尾|名詞,非自立|記号,句点|記号,読点|記号,括弧閉)".to_owned(),
            prefix: "(接頭詞)".to_owned(),
            open_bracket: "(「|『|(|[|{|【|〔|〈|《|“|‘)".to_owned(),
            close_bracket: "(」|』|)|]|}|】|〕|〉|》|”|’)".to_owned(),
            func: "(助詞|助動詞|動詞,非自立|動詞,接尾|形容詞,非自立|形容詞,接尾)".to_owned(),
            non_head: "(名詞,接尾|名詞,非自立|記号)".to_owned(),
            punct: "(、|。|,|.)".to_owned(),
            case: "(助詞,格助詞|助詞,係助詞)".to_owned(),
            dyn_a: "(助詞|副詞)".to_owned(),
        }
    }
}

/// `chunkPatterns` object of the configuration file, every key optional
#[allow(non_snake_case)]
#[derive(Deserialize, Debug, Default, Clone)]
pub struct RawChunkPatterns {
    attach: Option<String>,
    prefix: Option<String>,
    openBracket: Option<String>,
    closeBracket: Option<String>,
    func: Option<String>,
    nonHead: Option<String>,
    punct: Option<String>,
    case: Option<String>,
    dynA: Option<String>,
}

impl ChunkPatterns {
    /// Defaults overridden by the keys present in `raw`
    pub fn merge(raw: RawChunkPatterns) -> ChunkPatterns {
        let d = ChunkPatterns::default();
        ChunkPatterns {
            attach: raw.attach.unwrap_or(d.attach),
            prefix: raw.prefix.unwrap_or(d.prefix),
            open_bracket: raw.openBracket.unwrap_or(d.open_bracket),
            close_bracket: raw.closeBracket.unwrap_or(d.close_bracket),
            func: raw.func.unwrap_or(d.func),
            non_head: raw.nonHead.unwrap_or(d.non_head),
            punct: raw.punct.unwrap_or(d.punct),
            case: raw.case.unwrap_or(d.case),
            dyn_a: raw.dynA.unwrap_or(d.dyn_a),
        }
    }

    pub fn compile(&self) -> KakariResult<CompiledPatterns> {
        Ok(CompiledPatterns {
            attach: self.attach.parse()?,
            prefix: self.prefix.parse()?,
            open_bracket: self.open_bracket.parse()?,
            close_bracket: self.close_bracket.parse()?,
            func: self.func.parse()?,
            non_head: self.non_head.parse()?,
            punct: self.punct.parse()?,
            case: self.case.parse()?,
            dyn_a: self.dyn_a.parse()?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CompiledPatterns {
    pub attach: PatternMatcher,
    pub prefix: PatternMatcher,
    pub open_bracket: PatternMatcher,
    pub close_bracket: PatternMatcher,
    pub func: PatternMatcher,
    pub non_head: PatternMatcher,
    pub punct: PatternMatcher,
    pub case: PatternMatcher,
    pub dyn_a: PatternMatcher,
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::{assert_err, assert_none, assert_some_eq};

    #[test]
    fn alternatives() {
        let p = PatternMatcher::compile("(助詞|助動詞|動詞,非自立)").unwrap();
        assert!(p.prefix_match("助詞,格助詞,一般,*"));
        assert!(p.prefix_match("動詞,非自立,*,*"));
        assert!(!p.prefix_match("動詞,自立,*,*"));
        assert_eq!("(助詞|助動詞|動詞,非自立)", p.to_string());
    }

    #[test]
    fn single_pattern() {
        let p = PatternMatcher::compile("接頭詞").unwrap();
        assert!(p.prefix_match("接頭詞,名詞接続"));
        assert_some_eq!(p.matches("接頭詞"), "接頭詞");
        assert_none!(p.matches("接頭"));
    }

    #[test]
    fn parenthesis_alternatives() {
        let p: PatternMatcher = ChunkPatterns::default().open_bracket.parse().unwrap();
        assert_some_eq!(p.matches("("), "(");
        assert_some_eq!(p.matches("「"), "「");
        assert_none!(p.matches(")"));
    }

    #[test]
    fn empty_pattern_is_rejected() {
        assert_err!(PatternMatcher::compile(""));
        assert_err!(PatternMatcher::compile("(|)"));
    }

    #[test]
    fn merge_keeps_defaults() {
        let raw: RawChunkPatterns = serde_json::from_str(r#"{"prefix": "(接頭詞|連体詞)"}"#).unwrap();
        let p = ChunkPatterns::merge(raw);
        assert_eq!("(接頭詞|連体詞)", p.prefix);
        assert_eq!(ChunkPatterns::default().func, p.func);
        assert!(p.compile().is_ok());
    }
}
