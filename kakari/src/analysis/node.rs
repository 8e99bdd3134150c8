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

/// What a lattice node stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordRef {
    Bos,
    Eos,
    /// lexicon entry id
    Known(u32),
    /// unknown word template id
    Unknown(u32),
}

impl Display for WordRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            WordRef::Bos => write!(f, "BOS"),
            WordRef::Eos => write!(f, "EOS"),
            WordRef::Known(id) => write!(f, "(K{})", id),
            WordRef::Unknown(id) => write!(f, "(U{})", id),
        }
    }
}

/// Lattice node, boundaries are byte offsets into the canonical text
#[derive(Debug, Clone)]
pub struct Node {
    begin: usize,
    end: usize,
    left_id: u16,
    right_id: u16,
    cost: i16,
    word: WordRef,
}

impl Node {
    pub fn new(
        begin: usize,
        end: usize,
        left_id: u16,
        right_id: u16,
        cost: i16,
        word: WordRef,
    ) -> Node {
        Node {
            begin,
            end,
            left_id,
            right_id,
            cost,
            word,
        }
    }

    pub fn bos() -> Node {
        Node::new(0, 0, 0, 0, 0, WordRef::Bos)
    }

    pub fn eos(at: usize) -> Node {
        Node::new(at, at, 0, 0, 0, WordRef::Eos)
    }

    #[inline]
    pub fn begin(&self) -> usize {
        self.begin
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    #[inline]
    pub fn left_id(&self) -> u16 {
        self.left_id
    }

    #[inline]
    pub fn right_id(&self) -> u16 {
        self.right_id
    }

    #[inline]
    pub fn cost(&self) -> i16 {
        self.cost
    }

    pub fn word(&self) -> WordRef {
        self.word
    }

    pub fn span(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_special_node(&self) -> bool {
        matches!(self.word, WordRef::Bos | WordRef::Eos)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self.word, WordRef::Unknown(_))
    }

    /// Position in dictionary entry order,
    /// unknown words come after all `num_known` lexicon entries
    pub fn entry_order(&self, num_known: usize) -> usize {
        match self.word {
            WordRef::Bos | WordRef::Eos => 0,
            WordRef::Known(id) => id as usize,
            WordRef::Unknown(id) => num_known + id as usize,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unknown_words_order_after_known() {
        let known = Node::new(0, 3, 1, 1, 100, WordRef::Known(41));
        let unk = Node::new(0, 3, 1, 1, 100, WordRef::Unknown(0));
        assert!(known.entry_order(42) < unk.entry_order(42));
        assert_eq!(3, unk.span());
        assert!(unk.is_unknown());
        assert!(Node::bos().is_special_node());
    }
}
