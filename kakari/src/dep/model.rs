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
use std::ops::Deref;
use std::path::Path;

use crate::dep::Algorithm;
use crate::error::{KakariError, KakariResult};

/// Scores the features of a source/target chunk pair
pub trait Scorer {
    fn score(&self, features: &[String]) -> f64;
}

impl<T> Scorer for T
where
    T: Deref,
    T::Target: Scorer,
{
    fn score(&self, features: &[String]) -> f64 {
        self.deref().score(features)
    }
}

/// Sparse linear model: `bias + Σ weight(feature)`.
///
/// The file format is one `feature<TAB>weight` per line. Lines starting
/// with `#` are comments, keys starting with `@` are parameters.
#[derive(Debug, Clone)]
pub struct LinearModel {
    weights: HashMap<String, f64>,
    bias: f64,
    threshold: f64,
    algorithm: Algorithm,
}

impl Default for LinearModel {
    fn default() -> Self {
        LinearModel {
            weights: HashMap::new(),
            bias: 0.0,
            threshold: f64::NEG_INFINITY,
            algorithm: Algorithm::default(),
        }
    }
}

fn split_line(line: &str) -> Option<(&str, &str)> {
    line.rsplit_once('\t').or_else(|| line.rsplit_once(' '))
}

impl LinearModel {
    pub fn from_file(path: &Path) -> KakariResult<LinearModel> {
        let reader = BufReader::new(File::open(path)?);
        Self::from_reader(reader)
    }

    pub fn from_reader<R: BufRead>(reader: R) -> KakariResult<LinearModel> {
        let mut model = LinearModel::default();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim_end_matches(&['\r', '\n'][..]);
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let lineno = i + 1;
            let (key, value) = split_line(line).ok_or_else(|| {
                KakariError::InvalidDataFormat(lineno, format!("no weight in `{}`", line))
            })?;
            let key = key.trim();
            let value = value.trim();
            let number = || match value.parse::<f64>() {
                Ok(v) if v.is_nan() => Err(KakariError::InvalidDataFormat(
                    lineno,
                    format!("{}: weight is not a number", key),
                )),
                Ok(v) => Ok(v),
                Err(e) => Err(KakariError::InvalidDataFormat(
                    lineno,
                    format!("{}: {}", key, e),
                )),
            };
            match key {
                "@algorithm" => {
                    model.algorithm = value.parse().map_err(|_| {
                        KakariError::InvalidDataFormat(
                            lineno,
                            format!("unknown algorithm `{}`", value),
                        )
                    })?
                }
                "@bias" => model.bias = number()?,
                "@threshold" => model.threshold = number()?,
                k if k.starts_with('@') => {
                    return Err(KakariError::InvalidDataFormat(
                        lineno,
                        format!("unknown parameter `{}`", k),
                    ))
                }
                k => {
                    model.weights.insert(k.to_owned(), number()?);
                }
            }
        }
        Ok(model)
    }

    pub fn from_weights<I, S>(weights: I) -> LinearModel
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        LinearModel {
            weights: weights.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            ..LinearModel::default()
        }
    }

    pub fn weight(&self, feature: &str) -> Option<f64> {
        self.weights.get(feature).copied()
    }

    /// A link is made only when the best score is above this value
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

impl Scorer for LinearModel {
    fn score(&self, features: &[String]) -> f64 {
        features
            .iter()
            .filter_map(|f| self.weights.get(f))
            .fold(self.bias, |acc, w| acc + w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::assert_matches;
    use std::sync::Arc;

    const MODEL: &str = "# comment
@algorithm\tshift_reduce
@bias\t0.5
@threshold\t-1
DIST:1\t1.5
P_FH:連体詞/名詞\t2
G_CASE:が -0.25
";

    fn strings(fs: &[&str]) -> Vec<String> {
        fs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn read_model() {
        let model = LinearModel::from_reader(MODEL.as_bytes()).unwrap();
        assert_eq!(3, model.len());
        assert_eq!(Algorithm::ShiftReduce, model.algorithm());
        assert_eq!(-1.0, model.threshold());
        assert_eq!(Some(-0.25), model.weight("G_CASE:が"));
        let score = model.score(&strings(&["DIST:1", "P_FH:連体詞/名詞", "unseen"]));
        assert!((score - 4.0).abs() < 1e-9);
    }

    #[test]
    fn score_through_pointer() {
        let model = Arc::new(LinearModel::from_weights(vec![("a", 1.0), ("b", 2.0)]));
        assert_eq!(3.0, model.score(&strings(&["a", "b"])));
    }

    #[test]
    fn bad_weight() {
        let err = LinearModel::from_reader("DIST:1\tmany".as_bytes());
        assert_matches!(err, Err(KakariError::InvalidDataFormat(1, _)));
    }

    #[test]
    fn nan_weight_is_rejected() {
        let err = LinearModel::from_reader("x\t1\nDIST:1\tNaN\n".as_bytes());
        assert_matches!(err, Err(KakariError::InvalidDataFormat(2, _)));
        let err = LinearModel::from_reader("@bias\tnan\n".as_bytes());
        assert_matches!(err, Err(KakariError::InvalidDataFormat(1, _)));
    }

    #[test]
    fn tournament_parameter() {
        let model = LinearModel::from_reader("@algorithm\ttournament\n".as_bytes()).unwrap();
        assert_eq!(Algorithm::Tournament, model.algorithm());
        assert!(model.is_empty());
    }

    #[test]
    fn unknown_parameter() {
        let err = LinearModel::from_reader("x\t1\n@order\t2".as_bytes());
        assert_matches!(err, Err(KakariError::InvalidDataFormat(2, _)));
    }
}
