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


use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::analysis::morpheme::Morpheme;
use crate::error::{KakariError, KakariResult};
use crate::ne::tagger::EntityClassifier;
use crate::ne::EntityTag;

/// Entity types by feature prefix and by surface.
///
/// The file format is one `TYPE<TAB>pattern` per line. Patterns are
/// prefixes of the feature string, patterns starting with `=` match the
/// normalized surface. Lines starting with `#` are comments.
#[derive(Debug, Clone, Default)]
pub struct EntityRules {
    surfaces: HashMap<String, String>,
    /// (feature prefix, type), longest prefix first
    features: Vec<(String, String)>,
}

impl EntityRules {
    pub fn from_file(path: &Path) -> KakariResult<EntityRules> {
        let reader = BufReader::new(File::open(path)?);
        Self::from_reader(reader)
    }

    pub fn from_reader<R: BufRead>(reader: R) -> KakariResult<EntityRules> {
        let mut rules = EntityRules::default();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim_end_matches(&['\r', '\n'][..]);
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let (kind, pattern) = line
                .split_once('\t')
                .map(|(k, p)| (k.trim(), p.trim()))
                .filter(|(k, p)| !k.is_empty() && !p.is_empty() && !k.contains('-'))
                .ok_or_else(|| {
                    KakariError::InvalidDataFormat(i + 1, format!("expected `TYPE<TAB>pattern`, got `{}`", line))
                })?;
            rules.add(kind, pattern);
        }
        Ok(rules)
    }

    /// Adds one rule, a `=` prefix makes `pattern` a surface
    pub fn add(&mut self, kind: &str, pattern: &str) {
        match pattern.strip_prefix('=') {
            Some(surface) => {
                self.surfaces.insert(surface.to_owned(), kind.to_owned());
            }
            None => {
                self.features.push((pattern.to_owned(), kind.to_owned()));
                self.features
                    .sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.surfaces.len() + self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entity type of a single morpheme, surfaces take priority
    pub fn kind(&self, m: &Morpheme) -> Option<&str> {
        if let Some(kind) = self.surfaces.get(m.normalized_surface()) {
            return Some(kind);
        }
        let feature = m.feature();
        self.features
            .iter()
            .find(|(prefix, _)| feature.starts_with(prefix.as_str()))
            .map(|(_, kind)| kind.as_str())
    }
}

impl EntityClassifier for EntityRules {
    /// Neighbouring morphemes of the same type form one entity
    fn classify(&self, morphemes: &[Morpheme]) -> Vec<EntityTag> {
        let mut tags = Vec::with_capacity(morphemes.len());
        let mut prev = None;
        for m in morphemes {
            let kind = self.kind(m);
            tags.push(match kind {
                None => EntityTag::Outside,
                Some(k) if prev == Some(k) => EntityTag::Inside(k.to_owned()),
                Some(k) => EntityTag::Begin(k.to_owned()),
            });
            prev = kind;
        }
        tags
    }
}
