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

use crate::analysis::morpheme::Morpheme;
use crate::charset::Charset;
use crate::chunk::Chunk;
use crate::error::{KakariError, KakariResult};
use crate::ne::EntityTag;
use crate::tree::{Layer, ParseTree};

fn invalid<S: Into<String>>(line: usize, reason: S) -> KakariError {
    KakariError::InvalidDataFormat(line, reason.into())
}

fn csv_features(s: &str, line: usize) -> KakariResult<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(s.as_bytes());
    match reader.records().next() {
        Some(record) => Ok(record
            .map_err(|e| invalid(line, e.to_string()))?
            .iter()
            .map(|f| f.to_owned())
            .collect()),
        None => Ok(Vec::new()),
    }
}

/// `* id linkD [head/func [score [features]]]`
fn read_header(line: &str, lineno: usize, expected_id: usize, begin: usize) -> KakariResult<Chunk> {
    let cols: Vec<&str> = line.splitn(6, ' ').collect();
    if cols.len() < 3 {
        return Err(invalid(lineno, "chunk header needs an id and a link"));
    }

    let id: usize = cols[1]
        .parse()
        .map_err(|_| invalid(lineno, format!("bad chunk id `{}`", cols[1])))?;
    if id != expected_id {
        return Err(invalid(
            lineno,
            format!("chunk id {} where {} was expected", id, expected_id),
        ));
    }

    let link = cols[2]
        .strip_suffix('D')
        .and_then(|l| l.parse::<i64>().ok())
        .ok_or_else(|| invalid(lineno, format!("bad link `{}`", cols[2])))?;

    let mut chunk = Chunk::new(begin, begin);
    chunk.link = match link {
        -1 => None,
        l if l < 0 => return Err(invalid(lineno, format!("bad link `{}`", cols[2]))),
        l => Some(l as usize),
    };

    if let Some(hf) = cols.get(3) {
        let (head, func) = hf
            .split_once('/')
            .and_then(|(h, f)| Some((h.parse::<usize>().ok()?, f.parse::<usize>().ok()?)))
            .ok_or_else(|| invalid(lineno, format!("bad head/func `{}`", hf)))?;
        chunk.head = head;
        chunk.func = func;
    }
    if let Some(score) = cols.get(4) {
        chunk.score = score
            .parse()
            .map_err(|_| invalid(lineno, format!("bad score `{}`", score)))?;
    }
    if let Some(features) = cols.get(5) {
        chunk.features = csv_features(features, lineno)?;
    }
    Ok(chunk)
}

pub(super) fn read(input: &str, layer: Layer, charset: Charset) -> KakariResult<ParseTree> {
    if layer == Layer::RawSentence {
        return Ok(ParseTree::new(input.trim_end_matches(&['\r', '\n'][..]), charset));
    }

    let mut text = String::new();
    let mut morphemes = Vec::new();
    let mut chunks: Vec<Chunk> = Vec::new();

    for (i, line) in input.lines().enumerate() {
        let lineno = i + 1;
        let line = line.trim_end_matches('\r');
        if line == "EOS" {
            break;
        }
        if line.is_empty() {
            continue;
        }

        if line.starts_with("* ") {
            if layer == Layer::Pos {
                continue;
            }
            if chunks.last().map_or(false, |c| c.is_empty()) {
                return Err(invalid(lineno, "empty chunk"));
            }
            chunks.push(read_header(line, lineno, chunks.len(), morphemes.len())?);
            continue;
        }

        let mut cols = line.splitn(3, '\t');
        let (surface, feature) = match (cols.next(), cols.next()) {
            (Some(s), Some(f)) if !s.is_empty() && !f.is_empty() => (s, f),
            _ => return Err(invalid(lineno, "expected `surface<TAB>feature[<TAB>NE]`")),
        };
        let ne = cols
            .next()
            .map(|t| t.parse::<EntityTag>())
            .transpose()
            .map_err(|e| invalid(lineno, e.to_string()))?;
        if layer >= Layer::Chunk && chunks.is_empty() {
            return Err(invalid(lineno, "morpheme before the first chunk header"));
        }
        let mut morpheme = Morpheme::from_feature_string(surface, text.len(), feature);
        morpheme.set_ne(ne);
        morphemes.push(morpheme);
        text.push_str(surface);
        if let Some(chunk) = chunks.last_mut() {
            chunk.end = morphemes.len();
        }
    }

    if chunks.last().map_or(false, |c| c.is_empty()) {
        return Err(invalid(0, "empty chunk at the end of input"));
    }

    ParseTree::from_parts(text, charset, morphemes, chunks, layer)
}
