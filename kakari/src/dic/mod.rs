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

use std::ops::Deref;
use std::path::Path;

use log::info;

use crate::config::Config;
use crate::prelude::*;
use character_category::CharacterCategory;
use connect::ConnectionMatrix;
use lexicon::Lexicon;
use unknown::UnknownDictionary;

pub mod category_type;
pub mod character_category;
pub mod connect;
pub mod lexicon;
pub mod unknown;

/// Provides access to dictionary data
pub trait DictionaryAccess {
    fn lexicon(&self) -> &Lexicon;
    fn connection(&self) -> &ConnectionMatrix;
    fn character_category(&self) -> &CharacterCategory;
    fn unknown(&self) -> &UnknownDictionary;
}

impl<T> DictionaryAccess for T
where
    T: Deref,
    <T as Deref>::Target: DictionaryAccess,
{
    fn lexicon(&self) -> &Lexicon {
        <T as Deref>::deref(self).lexicon()
    }

    fn connection(&self) -> &ConnectionMatrix {
        <T as Deref>::deref(self).connection()
    }

    fn character_category(&self) -> &CharacterCategory {
        <T as Deref>::deref(self).character_category()
    }

    fn unknown(&self) -> &UnknownDictionary {
        <T as Deref>::deref(self).unknown()
    }
}

/// Read-only dictionary data shared by all parses
pub struct Dictionary {
    lexicon: Lexicon,
    connection: ConnectionMatrix,
    character_category: CharacterCategory,
    unknown: UnknownDictionary,
}

fn load<T, F>(path: &Path, f: F) -> KakariResult<T>
where
    F: FnOnce(&Path) -> KakariResult<T>,
{
    f(path).map_err(|e| KakariError::resource_load(path, e))
}

impl Dictionary {
    /// Loads the lexicon, connection matrix, character and unknown word
    /// definitions named by the configuration
    pub fn from_cfg(cfg: &Config) -> KakariResult<Dictionary> {
        let connection = load(&cfg.connection_matrix, ConnectionMatrix::from_file)?;
        let lexicon = load(&cfg.system_dict, |p| {
            let lex = Lexicon::from_file(p)?;
            lex.validate(&connection)?;
            Ok(lex)
        })?;
        let character_category =
            load(&cfg.character_definition_file, CharacterCategory::from_file)?;
        let unknown = load(&cfg.unknown_definition_file, |p| {
            let unk = UnknownDictionary::from_file(p)?;
            unk.validate(&connection)?;
            Ok(unk)
        })?;

        info!(
            "loaded dictionary: {} words, {}x{} matrix, {} categories, {} unknown templates",
            lexicon.len(),
            connection.num_left(),
            connection.num_right(),
            character_category.num_definitions(),
            unknown.len()
        );

        Ok(Dictionary::from_parts(
            lexicon,
            connection,
            character_category,
            unknown,
        ))
    }

    pub fn from_parts(
        lexicon: Lexicon,
        connection: ConnectionMatrix,
        character_category: CharacterCategory,
        unknown: UnknownDictionary,
    ) -> Dictionary {
        Dictionary {
            lexicon,
            connection,
            character_category,
            unknown,
        }
    }
}

impl DictionaryAccess for Dictionary {
    fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    fn connection(&self) -> &ConnectionMatrix {
        &self.connection
    }

    fn character_category(&self) -> &CharacterCategory {
        &self.character_category
    }

    fn unknown(&self) -> &UnknownDictionary {
        &self.unknown
    }
}
