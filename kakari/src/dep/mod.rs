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

//! Dependency resolution between chunks

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::chunk::Chunk;
use crate::error::{KakariError, KakariResult};

mod features;
pub mod model;
pub mod resolver;

pub use model::{LinearModel, Scorer};
pub use resolver::Resolver;

/// Strategy used to pick the target of every chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Right to left, best candidate on the projective chain
    Backward,
    /// Stack based, attaches while the score stays positive
    ShiftReduce,
    /// Right to left, pairwise matches between candidates on the projective chain
    Tournament,
}

impl Default for Algorithm {
    fn default() -> Self {
        Algorithm::Backward
    }
}

impl FromStr for Algorithm {
    type Err = KakariError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "backward" => Ok(Algorithm::Backward),
            "shift_reduce" | "shift-reduce" | "shiftreduce" => Ok(Algorithm::ShiftReduce),
            "tournament" => Ok(Algorithm::Tournament),
            _ => Err(KakariError::configuration(
                "algorithm",
                format!("unknown algorithm `{}`", s),
            )),
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Algorithm::Backward => f.write_str("backward"),
            Algorithm::ShiftReduce => f.write_str("shift_reduce"),
            Algorithm::Tournament => f.write_str("tournament"),
        }
    }
}

/// Checks that every link points to a later chunk of the same sentence.
///
/// Links that only go forward can not form a cycle, so this also
/// guarantees that the links form a forest.
pub fn validate_links(chunks: &[Chunk]) -> KakariResult<()> {
    let n = chunks.len();
    for (i, chunk) in chunks.iter().enumerate() {
        let target = match chunk.link {
            Some(t) => t,
            None => continue,
        };
        let reason = if target == i {
            "self link"
        } else if target < i {
            "backward link"
        } else if target >= n {
            "target out of range"
        } else {
            continue;
        };
        return Err(KakariError::Consistency {
            source_chunk: i,
            target,
            reason,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::{assert_matches, assert_ok};

    fn linked(links: &[Option<usize>]) -> Vec<Chunk> {
        links
            .iter()
            .enumerate()
            .map(|(i, l)| {
                let mut c = Chunk::new(i, i + 1);
                c.link = *l;
                c
            })
            .collect()
    }

    #[test]
    fn forward_links_are_valid() {
        assert_ok!(validate_links(&linked(&[Some(2), Some(2), None])));
        assert_ok!(validate_links(&[]));
    }

    #[test]
    fn self_link() {
        let err = validate_links(&linked(&[Some(1), Some(1), None]));
        assert_matches!(
            err,
            Err(KakariError::Consistency {
                source_chunk: 1,
                target: 1,
                reason: "self link"
            })
        );
    }

    #[test]
    fn cycle_is_a_backward_link() {
        let err = validate_links(&linked(&[Some(1), Some(0), None]));
        assert_matches!(
            err,
            Err(KakariError::Consistency {
                source_chunk: 1,
                target: 0,
                ..
            })
        );
    }

    #[test]
    fn out_of_range() {
        let err = validate_links(&linked(&[Some(5), None]));
        assert_matches!(
            err,
            Err(KakariError::Consistency {
                reason: "target out of range",
                ..
            })
        );
    }

    #[test]
    fn algorithm_names() {
        assert_eq!(Algorithm::Backward, "backward".parse::<Algorithm>().unwrap());
        assert_eq!(
            Algorithm::ShiftReduce,
            "Shift-Reduce".parse::<Algorithm>().unwrap()
        );
        assert_eq!(Algorithm::Tournament, "tournament".parse::<Algorithm>().unwrap());
        assert_eq!("tournament", Algorithm::Tournament.to_string());
        assert_matches!(
            "cky".parse::<Algorithm>(),
            Err(KakariError::Configuration { .. })
        );
    }
}
