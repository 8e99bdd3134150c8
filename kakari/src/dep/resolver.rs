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

use log::debug;

use crate::chunk::Chunk;
use crate::dep::features::FeatureTable;
use crate::dep::model::Scorer;
use crate::dep::{validate_links, Algorithm};
use crate::error::KakariResult;

/// Links every chunk to the chunk it modifies
pub struct Resolver<S> {
    scorer: S,
    algorithm: Algorithm,
    threshold: f64,
}

impl<S: Scorer> Resolver<S> {
    pub fn new(scorer: S, algorithm: Algorithm, threshold: f64) -> Resolver<S> {
        Resolver {
            scorer,
            algorithm,
            threshold,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Writes `link` and `score` of all chunks.
    /// Links written here always point forward.
    pub fn resolve(&self, chunks: &mut [Chunk]) -> KakariResult<()> {
        for c in chunks.iter_mut() {
            c.link = None;
            c.score = 0.0;
        }
        if chunks.len() < 2 {
            return Ok(());
        }

        let table = FeatureTable::new(chunks);
        match self.algorithm {
            Algorithm::Backward => self.backward(&table, chunks),
            Algorithm::ShiftReduce => self.shift_reduce(&table, chunks),
            Algorithm::Tournament => self.tournament(&table, chunks),
        }
        debug!(
            "resolved {} chunks with {}: {:?}",
            chunks.len(),
            self.algorithm,
            chunks.iter().map(|c| c.link).collect::<Vec<_>>()
        );
        validate_links(chunks)
    }

    fn backward(&self, table: &FeatureTable, chunks: &mut [Chunk]) {
        let n = chunks.len();
        let mut children = vec![Vec::new(); n];
        for src in (0..n - 1).rev() {
            let mut best: Option<(usize, f64)> = None;
            let mut candidate = Some(src + 1);
            while let Some(dst) = candidate {
                let score = self
                    .scorer
                    .score(&table.pair_features(&children, src, dst));
                // strict comparison keeps the closest target on ties
                if !score.is_nan() && best.map_or(true, |(_, b)| score > b) {
                    best = Some((dst, score));
                }
                candidate = chunks[dst].link;
            }
            if let Some((dst, score)) = best {
                chunks[src].score = score;
                if score > self.threshold {
                    chunks[src].link = Some(dst);
                    children[dst].push(src);
                }
            }
        }
    }

    fn shift_reduce(&self, table: &FeatureTable, chunks: &mut [Chunk]) {
        let n = chunks.len();
        let mut children = vec![Vec::new(); n];
        let mut agenda = vec![0];
        for dst in 1..n {
            let mut next = agenda.pop();
            while let Some(src) = next {
                let score = self
                    .scorer
                    .score(&table.pair_features(&children, src, dst));
                if dst + 1 != n && !(score > 0.0) {
                    break;
                }
                chunks[src].link = Some(dst);
                chunks[src].score = score;
                children[dst].push(src);
                next = agenda.pop();
            }
            if let Some(src) = next {
                agenda.push(src);
            }
            agenda.push(dst);
        }
    }

    /// Walks the projective chain of `src`, the current winner plays
    /// every next candidate and the last winner is the target
    fn tournament(&self, table: &FeatureTable, chunks: &mut [Chunk]) {
        let n = chunks.len();
        let mut children = vec![Vec::new(); n];
        for src in (0..n - 1).rev() {
            let mut winner = src + 1;
            let mut score = 0.0;
            let mut candidate = chunks[winner].link;
            while let Some(dst) = candidate {
                let s = self
                    .scorer
                    .score(&table.match_features(&children, src, winner, dst));
                if !s.is_nan() {
                    score = s;
                    if s > 0.0 {
                        winner = dst;
                    }
                }
                candidate = chunks[dst].link;
            }
            chunks[src].link = Some(winner);
            chunks[src].score = score.abs();
            children[winner].push(src);
        }
    }
}
