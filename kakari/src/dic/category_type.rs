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

use crate::error::KakariError;
use bitflags::bitflags;
use std::fmt::{Debug, Formatter};
use std::str::FromStr;

bitflags! {
    /// A set of categories for a character
    ///
    /// Implemented as a bitset with fixed size
    #[repr(transparent)]
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CategoryType: u32 {
        /** The fall back category. */
        const DEFAULT = (1 << 0);
        /** White spaces. */
        const SPACE = (1 << 1);
        /** CJKV ideographic characters. */
        const KANJI = (1 << 2);
        /** Symbols. */
        const SYMBOL = (1 << 3);
        /** Numerical characters. */
        const NUMERIC = (1 << 4);
        /** Latin alphabets. */
        const ALPHA = (1 << 5);
        /** Hiragana characters. */
        const HIRAGANA = (1 << 6);
        /** Katakana characters. */
        const KATAKANA = (1 << 7);
        /** Kanji numeric characters. */
        const KANJINUMERIC = (1 << 8);
        /** Greek alphabets. */
        const GREEK = (1 << 9);
        /** Cyrillic alphabets. */
        const CYRILLIC = (1 << 10);
    }
}

impl CategoryType {
    pub fn count(self) -> u32 {
        self.bits().count_ones()
    }
}

impl Default for CategoryType {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Debug for CategoryType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

impl FromStr for CategoryType {
    type Err = KakariError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let result = bitflags::parser::from_str::<CategoryType>(s);
        result.map_err(|_| KakariError::InvalidCharacterCategoryType(s.into()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use claim::{assert_err, assert_matches};

    #[test]
    fn format() {
        assert_eq!("KANJI", format!("{:?}", CategoryType::KANJI));
        assert_eq!(
            "SPACE | HIRAGANA",
            format!("{:?}", CategoryType::HIRAGANA | CategoryType::SPACE)
        );
    }

    #[test]
    fn parse() {
        assert_eq!(CategoryType::KATAKANA, "KATAKANA".parse().unwrap());
        assert_err!("KATAKANA_OOV".parse::<CategoryType>());
    }

    #[test]
    fn count_bits() {
        let c = CategoryType::KANJI | CategoryType::KANJINUMERIC;
        assert_eq!(2, c.count());
        assert_eq!(0, CategoryType::empty().count());
    }

    #[test]
    fn iter_in_bit_order() {
        let ct = CategoryType::NUMERIC | CategoryType::KANJI;
        let mut iter = ct.iter();
        assert_matches!(iter.next(), Some(CategoryType::KANJI));
        assert_matches!(iter.next(), Some(CategoryType::NUMERIC));
        assert_matches!(iter.next(), None);
    }
}
