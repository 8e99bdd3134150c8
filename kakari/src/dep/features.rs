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

use std::collections::BTreeSet;

use crate::chunk::Chunk;

/// Chunk features grouped by the role they play in a source/target pair
#[derive(Debug, Default)]
struct ChunkFeatures {
    /// `F*` features, as seen from the source side (`S*`)
    source: Vec<String>,
    /// `F*` features, as seen from the target side (`D*`)
    target: Vec<String>,
    left: Vec<String>,
    right: Vec<String>,
    gap: Vec<String>,
    dynamic: Vec<String>,
    /// function POS, first level and optional second level
    func_pos: String,
    head_pos: String,
}

impl ChunkFeatures {
    fn new(chunk: &Chunk) -> ChunkFeatures {
        let mut result = ChunkFeatures::default();
        for f in chunk.features.iter() {
            match f.as_bytes().first() {
                Some(b'F') => {
                    result.source.push(format!("S{}", &f[1..]));
                    result.target.push(format!("D{}", &f[1..]));
                }
                Some(b'L') => result.left.push(f.clone()),
                Some(b'R') => result.right.push(f.clone()),
                Some(b'G') => result.gap.push(f.clone()),
                Some(b'A') | Some(b'B') => result.dynamic.push(f.clone()),
                _ => {}
            }
        }
        result.func_pos = match (chunk.feature("F_F1"), chunk.feature("F_F2")) {
            (Some(p1), Some(p2)) => format!("{},{}", p1, p2),
            (Some(p1), None) => p1.to_owned(),
            _ => String::new(),
        };
        result.head_pos = chunk.feature("F_H1").unwrap_or_default().to_owned();
        result
    }
}

/// Builds the feature set of every candidate pair of a sentence
pub(crate) struct FeatureTable {
    chunks: Vec<ChunkFeatures>,
}

impl FeatureTable {
    pub fn new(chunks: &[Chunk]) -> FeatureTable {
        FeatureTable {
            chunks: chunks.iter().map(ChunkFeatures::new).collect(),
        }
    }

    /// Features of attaching `src` to `dst`, given the children attached so far
    pub fn pair_features(&self, children: &[Vec<usize>], src: usize, dst: usize) -> Vec<String> {
        debug_assert!(src < dst && dst < self.chunks.len());
        let mut fset = BTreeSet::new();

        fset.insert(format!("DIST:{}", distance(src, dst)));

        let s = &self.chunks[src];
        let d = &self.chunks[dst];
        fset.extend(s.source.iter().cloned());
        fset.extend(d.target.iter().cloned());

        if src > 0 {
            fset.extend(self.chunks[src - 1].left.iter().cloned());
        }
        if let Some(r) = self.chunks.get(dst + 1) {
            fset.extend(r.right.iter().cloned());
        }

        self.gap_features(src, dst, "", &mut fset);

        for &c in children[dst].iter() {
            fset.extend(self.chunks[c].dynamic.iter().cloned());
        }
        self.source_children(children, src, &mut fset);

        if let Some(p) = conjunction(s, d) {
            fset.insert(format!("P_FH:{}", p));
        }

        fset.into_iter().collect()
    }

    /// Features of the match between two candidates `near < far` of `src`.
    /// Candidate specific features carry the suffix `1` for `near`
    /// and `2` for `far`, a positive score means `far` wins.
    pub fn match_features(
        &self,
        children: &[Vec<usize>],
        src: usize,
        near: usize,
        far: usize,
    ) -> Vec<String> {
        debug_assert!(src < near && near < far && far < self.chunks.len());
        let mut fset = BTreeSet::new();
        let s = &self.chunks[src];
        fset.extend(s.source.iter().cloned());
        if src > 0 {
            fset.extend(self.chunks[src - 1].left.iter().cloned());
        }
        self.source_children(children, src, &mut fset);

        for (n, dst) in [(1, near), (2, far)] {
            let d = &self.chunks[dst];
            fset.insert(format!("DIST{}:{}", n, distance(src, dst)));
            fset.extend(d.target.iter().map(|f| format!("D{}{}", n, &f[1..])));
            if let Some(r) = self.chunks.get(dst + 1) {
                fset.extend(r.right.iter().map(|f| format!("R{}{}", n, &f[1..])));
            }
            self.gap_features(src, dst, &n.to_string(), &mut fset);
            for &c in children[dst].iter() {
                fset.extend(self.chunks[c].dynamic.iter().map(|f| format!("A{}{}", n, f)));
            }
            if let Some(p) = conjunction(s, d) {
                fset.insert(format!("P_FH{}:{}", n, p));
            }
        }

        fset.into_iter().collect()
    }

    /// Gap features between `src` and `dst` and the bracket status of the gap
    fn gap_features(&self, src: usize, dst: usize, suffix: &str, fset: &mut BTreeSet<String>) {
        let mut status = 0;
        for gap in self.chunks[src + 1..dst].iter() {
            for g in gap.gap.iter() {
                if g.starts_with("G_OB") {
                    status |= 1;
                } else if g.starts_with("G_CB") {
                    status |= 2;
                } else if suffix.is_empty() {
                    fset.insert(g.clone());
                } else {
                    fset.insert(format!("G{}{}", suffix, &g[1..]));
                }
            }
        }
        let brackets = match status {
            0 => "GNB",
            1 => "GOB",
            2 => "GCB",
            _ => "GBB",
        };
        fset.insert(format!("{}{}:1", brackets, suffix));
    }

    fn source_children(&self, children: &[Vec<usize>], src: usize, fset: &mut BTreeSet<String>) {
        for &c in children[src].iter() {
            fset.extend(self.chunks[c].dynamic.iter().map(|f| lower_first(f)));
        }
    }
}

fn distance(src: usize, dst: usize) -> &'static str {
    match dst - src {
        1 => "1",
        2..=5 => "2-5",
        _ => "6-",
    }
}

/// `func/head` POS of a source and a target chunk
fn conjunction(s: &ChunkFeatures, d: &ChunkFeatures) -> Option<String> {
    if s.func_pos.is_empty() || d.head_pos.is_empty() {
        None
    } else {
        Some(format!("{}/{}", s.func_pos, d.head_pos))
    }
}

fn lower_first(f: &str) -> String {
    let mut chars = f.chars();
    match chars.next() {
        Some(c) => c.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
