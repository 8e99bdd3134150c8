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


//! Named entity tags over morphemes, written `B-TYPE`, `I-TYPE` and `O`

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::{KakariError, KakariResult};

pub mod rules;
pub mod tagger;

pub use rules::EntityRules;
pub use tagger::{constrain_to_chunks, EntityClassifier, EntityTagger};

/// Position of a morpheme in a named entity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityTag {
    /// first morpheme of an entity of the given type
    Begin(String),
    /// continuation of the entity before
    Inside(String),
    Outside,
}

impl EntityTag {
    /// Entity type, None outside entities
    pub fn kind(&self) -> Option<&str> {
        match self {
            EntityTag::Begin(k) | EntityTag::Inside(k) => Some(k),
            EntityTag::Outside => None,
        }
    }

    pub fn is_begin(&self) -> bool {
        matches!(self, EntityTag::Begin(_))
    }

    /// The same tag continuing an entity, `Outside` stays as it is
    pub fn to_inside(&self) -> EntityTag {
        match self {
            EntityTag::Begin(k) | EntityTag::Inside(k) => EntityTag::Inside(k.clone()),
            EntityTag::Outside => EntityTag::Outside,
        }
    }

    /// The same tag starting an entity
    pub fn to_begin(&self) -> EntityTag {
        match self {
            EntityTag::Begin(k) | EntityTag::Inside(k) => EntityTag::Begin(k.clone()),
            EntityTag::Outside => EntityTag::Outside,
        }
    }
}

impl Display for EntityTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityTag::Begin(k) => write!(f, "B-{}", k),
            EntityTag::Inside(k) => write!(f, "I-{}", k),
            EntityTag::Outside => f.write_str("O"),
        }
    }
}

impl FromStr for EntityTag {
    type Err = KakariError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || KakariError::configuration("ne", format!("bad named entity tag `{}`", s));
        if s == "O" {
            return Ok(EntityTag::Outside);
        }
        let (position, kind) = s.split_once('-').ok_or_else(bad)?;
        if kind.is_empty() {
            return Err(bad());
        }
        match position {
            "B" => Ok(EntityTag::Begin(kind.to_owned())),
            "I" => Ok(EntityTag::Inside(kind.to_owned())),
            _ => Err(bad()),
        }
    }
}

/// Whether named entities are tagged, and how they meet chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NeMode {
    Off = 0,
    /// entities never cross a chunk boundary
    ChunkConstraint = 1,
    Free = 2,
}

impl NeMode {
    pub const ALL: [NeMode; 3] = [NeMode::Off, NeMode::ChunkConstraint, NeMode::Free];

    pub fn is_on(self) -> bool {
        self != NeMode::Off
    }

    pub fn name(self) -> &'static str {
        match self {
            NeMode::Off => "off",
            NeMode::ChunkConstraint => "chunk",
            NeMode::Free => "free",
        }
    }

    /// Parses a mode given as a number or a name, errors name `option`
    pub fn parse_option(value: &str, option: &str) -> KakariResult<NeMode> {
        let value = value.trim();
        let mode = match value.parse::<usize>() {
            Ok(id) => NeMode::ALL.get(id).copied(),
            Err(_) => {
                let name = value.to_ascii_lowercase();
                NeMode::ALL.iter().copied().find(|m| m.name() == name)
            }
        };
        mode.ok_or_else(|| {
            KakariError::configuration(option, format!("unknown named entity mode `{}`", value))
        })
    }
}

impl Default for NeMode {
    fn default() -> Self {
        NeMode::Off
    }
}

impl FromStr for NeMode {
    type Err = KakariError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NeMode::parse_option(s, "ne")
    }
}

impl Display for NeMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::{assert_err, assert_matches};

    #[test]
    fn tag_text() {
        let b: EntityTag = "B-PERSON".parse().unwrap();
        assert_eq!(EntityTag::Begin("PERSON".to_owned()), b);
        assert_eq!("I-PERSON", b.to_inside().to_string());
        assert_eq!(EntityTag::Outside, "O".parse::<EntityTag>().unwrap());
        assert_eq!(Some("PERSON"), b.kind());
        assert_eq!(None, EntityTag::Outside.kind());
        assert_eq!(EntityTag::Outside, EntityTag::Outside.to_begin());
        assert_err!("B-".parse::<EntityTag>());
        assert_err!("X-PERSON".parse::<EntityTag>());
        assert_err!("PERSON".parse::<EntityTag>());
    }

    #[test]
    fn modes() {
        assert_eq!(NeMode::Off, "0".parse::<NeMode>().unwrap());
        assert_eq!(NeMode::ChunkConstraint, "1".parse::<NeMode>().unwrap());
        assert_eq!(NeMode::Free, "free".parse::<NeMode>().unwrap());
        assert!(!NeMode::default().is_on());
        assert_matches!(
            NeMode::parse_option("3", "ne"),
            Err(KakariError::Configuration { option, .. }) if option == "ne"
        );
    }
}
