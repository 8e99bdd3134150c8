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

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use csv::{StringRecord, Trim};
use yada::builder::DoubleArrayBuilder;
use yada::DoubleArray;

use crate::dic::connect::ConnectionMatrix;
use crate::error::{KakariError, KakariResult};

/// Number of feature columns after the cost column
pub const NUM_FEATURES: usize = 9;

/// One line of a MeCab style csv dictionary
///
/// `surface,left_id,right_id,cost,pos1,pos2,pos3,pos4,ctype,cform,base,reading,pronunciation`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    pub surface: String,
    pub left_id: u16,
    pub right_id: u16,
    pub cost: i16,
    /// feature columns as written, `*` included
    pub features: Vec<String>,
}

impl WordEntry {
    /// Comma joined feature columns
    pub fn feature_string(&self) -> String {
        self.features.join(",")
    }
}

/// Reads csv entries, the first column is the surface (or category name)
pub(crate) fn read_entries<R: Read>(data: R) -> KakariResult<Vec<WordEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::None)
        .flexible(true)
        .from_reader(data);
    let mut record = StringRecord::new();
    let mut entries = Vec::new();
    while reader.read_record(&mut record)? {
        let line = record.position().map_or(0, |p| p.line()) as usize;
        entries.push(parse_record(&record, line)?);
    }
    Ok(entries)
}

fn parse_record(record: &StringRecord, line: usize) -> KakariResult<WordEntry> {
    if record.len() < 5 {
        return Err(KakariError::InvalidDataFormat(
            line,
            format!("expected at least 5 columns, found {}", record.len()),
        ));
    }
    let surface = field(record, line, 0, "surface")?.to_owned();
    let left_id = number(record, line, 1, "left_id")?;
    let right_id = number(record, line, 2, "right_id")?;
    let cost = number(record, line, 3, "cost")?;
    let features = record
        .iter()
        .skip(4)
        .take(NUM_FEATURES)
        .map(|s| s.to_owned())
        .collect();

    Ok(WordEntry {
        surface,
        left_id,
        right_id,
        cost,
        features,
    })
}

fn field<'r>(record: &'r StringRecord, line: usize, idx: usize, name: &str) -> KakariResult<&'r str> {
    match record.get(idx) {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(KakariError::InvalidDataFormat(
            line,
            format!("({}) {} is empty", idx, name),
        )),
    }
}

fn number<T: FromStr>(record: &StringRecord, line: usize, idx: usize, name: &str) -> KakariResult<T> {
    field(record, line, idx, name)?.parse::<T>().map_err(|_| {
        KakariError::InvalidDataFormat(line, format!("({}) {} is not a number", idx, name))
    })
}

/// Dictionary words indexed by a double array trie over their surfaces
///
/// Entry ids are line numbers in file order, entries sharing a surface
/// keep that order.
pub struct Lexicon {
    entries: Vec<WordEntry>,
    groups: Vec<Vec<u32>>,
    trie: DoubleArray<Vec<u8>>,
}

#[cfg(test)]
impl std::fmt::Debug for Lexicon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexicon")
            .field("entries", &self.entries)
            .field("groups", &self.groups)
            .finish_non_exhaustive()
    }
}

impl Lexicon {
    pub fn from_file(path: &Path) -> KakariResult<Lexicon> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(data: R) -> KakariResult<Lexicon> {
        Self::from_entries(read_entries(data)?)
    }

    pub fn from_entries(entries: Vec<WordEntry>) -> KakariResult<Lexicon> {
        if entries.is_empty() {
            return Err(KakariError::InvalidDataFormat(0, "empty lexicon".to_owned()));
        }

        let mut by_surface: BTreeMap<&str, Vec<u32>> = BTreeMap::new();
        for (id, e) in entries.iter().enumerate() {
            by_surface.entry(e.surface.as_str()).or_default().push(id as u32);
        }

        // BTreeMap iterates in byte order, which is what the builder expects
        let keyset: Vec<(&[u8], u32)> = by_surface
            .keys()
            .enumerate()
            .map(|(i, s)| (s.as_bytes(), i as u32))
            .collect();
        let bytes = DoubleArrayBuilder::build(&keyset).ok_or(KakariError::MissingDictionaryTrie)?;
        let groups = by_surface.into_iter().map(|(_, ids)| ids).collect();

        Ok(Lexicon {
            entries,
            groups,
            trie: DoubleArray::new(bytes),
        })
    }

    /// Every dictionary word which starts at `offset` of `input`,
    /// as `(entry_id, end_offset)`, shorter words first
    pub fn lookup<'a>(
        &'a self,
        input: &'a [u8],
        offset: usize,
    ) -> impl Iterator<Item = (u32, usize)> + 'a {
        self.trie
            .common_prefix_search(&input[offset..])
            .flat_map(move |(group, len)| {
                self.groups[group as usize]
                    .iter()
                    .map(move |&id| (id, offset + len))
            })
    }

    pub fn entry(&self, id: u32) -> &WordEntry {
        &self.entries[id as usize]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks that every connection id exists in the matrix
    pub fn validate(&self, matrix: &ConnectionMatrix) -> KakariResult<()> {
        for (i, e) in self.entries.iter().enumerate() {
            if !matrix.accepts(e.left_id, e.right_id) {
                return Err(KakariError::InvalidDataFormat(
                    i + 1,
                    format!(
                        "connection ids {} {} of {} are out of the matrix",
                        e.left_id, e.right_id, e.surface
                    ),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::assert_matches;
    use std::io::Cursor;

    const LEX: &str = "\
本,1,1,3000,名詞,一般,*,*,*,*,本,ホン,ホン
本を,1,2,9000,名詞,一般,*,*,*,*,本を,ホンヲ,ホンヲ
本,1,1,3500,名詞,接尾,助数詞,*,*,*,本,ホン,ホン
を,2,2,500,助詞,格助詞,一般,*,*,*,を,ヲ,ヲ
";

    fn lexicon() -> Lexicon {
        Lexicon::from_reader(Cursor::new(LEX)).unwrap()
    }

    #[test]
    fn reads_all_columns() {
        let lex = lexicon();
        assert_eq!(4, lex.len());
        let e = lex.entry(3);
        assert_eq!("を", e.surface);
        assert_eq!(2, e.left_id);
        assert_eq!(500, e.cost);
        assert_eq!(NUM_FEATURES, e.features.len());
        assert_eq!("助詞,格助詞,一般,*,*,*,を,ヲ,ヲ", e.feature_string());
    }

    #[test]
    fn lookup_prefixes_in_file_order() {
        let lex = lexicon();
        let input = "本を読む".as_bytes();
        let found: Vec<_> = lex.lookup(input, 0).collect();
        assert_eq!(vec![(0, 3), (2, 3), (1, 6)], found);
        let found: Vec<_> = lex.lookup(input, 3).collect();
        assert_eq!(vec![(3, 6)], found);
        assert_eq!(0, lex.lookup(input, 6).count());
    }

    #[test]
    fn short_feature_list_is_allowed() {
        let lex = Lexicon::from_reader(Cursor::new("X,0,0,10,記号\n")).unwrap();
        assert_eq!(vec!["記号".to_owned()], lex.entry(0).features);
    }

    #[test]
    fn bad_number_names_column() {
        let res = Lexicon::from_reader(Cursor::new("X,0,zero,10,記号\n"));
        match res {
            Err(KakariError::InvalidDataFormat(1, msg)) => assert!(msg.contains("right_id")),
            Err(e) => panic!("unexpected error {:?}", e),
            Ok(_) => panic!("accepted bad line"),
        }
    }

    #[test]
    fn empty_lexicon_is_rejected() {
        assert_matches!(
            Lexicon::from_reader(Cursor::new("")),
            Err(KakariError::InvalidDataFormat(0, _))
        );
    }

    #[test]
    fn ids_are_validated_against_matrix() {
        let lex = lexicon();
        assert!(lex.validate(&ConnectionMatrix::zeroed(3, 3)).is_ok());
        assert_matches!(
            lex.validate(&ConnectionMatrix::zeroed(2, 2)),
            Err(KakariError::InvalidDataFormat(..))
        );
    }
}
