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


use std::path::Path;

use log::debug;

use crate::analysis::morpheme::Morpheme;
use crate::chunk::Chunk;
use crate::error::KakariResult;
use crate::ne::{EntityRules, EntityTag};

/// Tags every morpheme of a sentence
pub trait EntityClassifier {
    fn classify(&self, morphemes: &[Morpheme]) -> Vec<EntityTag>;
}

fn is_number(m: &Morpheme) -> bool {
    m.pos(0) == "名詞" && m.pos(1) == "数"
}

/// Stores classifier tags on morphemes and keeps them well formed
#[derive(Debug, Clone)]
pub struct EntityTagger<C = EntityRules> {
    classifier: C,
}

impl EntityTagger<EntityRules> {
    pub fn from_file(path: &Path) -> KakariResult<EntityTagger<EntityRules>> {
        let rules = EntityRules::from_file(path)?;
        debug!("{} named entity rules", rules.len());
        Ok(EntityTagger::new(rules))
    }
}

impl<C: EntityClassifier> EntityTagger<C> {
    pub fn new(classifier: C) -> EntityTagger<C> {
        EntityTagger { classifier }
    }

    pub fn tag(&self, morphemes: &mut [Morpheme]) {
        let mut tags = self.classifier.classify(morphemes);
        debug_assert_eq!(tags.len(), morphemes.len());

        // digits of one number share the tag of the first one
        let mut run = 0;
        for (i, m) in morphemes.iter().enumerate() {
            run = if is_number(m) { run + 1 } else { 0 };
            if run >= 2 {
                tags[i] = tags[i - 1].to_inside();
            }
        }

        // an entity starts with B, I only continues the same type
        for i in 0..tags.len() {
            let stray = match &tags[i] {
                EntityTag::Inside(kind) => i == 0 || tags[i - 1].kind() != Some(kind.as_str()),
                _ => false,
            };
            if stray {
                tags[i] = tags[i].to_begin();
            }
        }

        for (m, tag) in morphemes.iter_mut().zip(tags) {
            m.set_ne(Some(tag));
        }
    }
}

/// Splits entities which run over a chunk boundary
pub fn constrain_to_chunks(morphemes: &mut [Morpheme], chunks: &[Chunk]) {
    for chunk in chunks {
        if let Some(m) = morphemes.get_mut(chunk.begin) {
            let begin = match (*m).ne() {
                Some(tag @ EntityTag::Inside(_)) => tag.to_begin(),
                _ => continue,
            };
            m.set_ne(Some(begin));
        }
    }
}
