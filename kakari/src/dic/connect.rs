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

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{KakariError, KakariResult};

/// Connection cost table read from MeCab `matrix.def`
///
/// The first line holds the sizes, every other line `LEFT RIGHT COST`
/// where LEFT is the right id of the preceding word and RIGHT the left id
/// of the following word. Pairs which are not listed cost 0.
#[derive(Debug, Clone)]
pub struct ConnectionMatrix {
    data: Vec<i16>,
    num_left: usize,
    num_right: usize,
}

impl ConnectionMatrix {
    pub fn from_file(path: &Path) -> KakariResult<ConnectionMatrix> {
        let reader = BufReader::new(fs::File::open(path)?);
        Self::from_reader(reader)
    }

    pub fn from_reader<R: BufRead>(reader: R) -> KakariResult<ConnectionMatrix> {
        let mut lines = reader
            .lines()
            .enumerate()
            .filter(|(_, l)| l.as_ref().map(|l| !l.trim().is_empty()).unwrap_or(true));

        let (num_left, num_right) = match lines.next() {
            Some((i, line)) => {
                let line = line?;
                let cols: Vec<_> = line.split_whitespace().collect();
                if cols.len() != 2 {
                    return Err(KakariError::InvalidDataFormat(
                        i,
                        "expected matrix size".to_owned(),
                    ));
                }
                (cols[0].parse::<usize>()?, cols[1].parse::<usize>()?)
            }
            None => {
                return Err(KakariError::InvalidDataFormat(
                    0,
                    "empty connection matrix".to_owned(),
                ))
            }
        };

        let mut matrix = ConnectionMatrix::zeroed(num_left, num_right);
        for (i, line) in lines {
            let line = line?;
            let cols: Vec<_> = line.split_whitespace().collect();
            if cols.len() != 3 {
                return Err(KakariError::InvalidDataFormat(
                    i,
                    "expected LEFT RIGHT COST".to_owned(),
                ));
            }
            let left: u16 = cols[0].parse()?;
            let right: u16 = cols[1].parse()?;
            let cost: i16 = cols[2].parse()?;
            if !matrix.contains(left, right) {
                return Err(KakariError::InvalidDataFormat(
                    i,
                    format!("connection id out of range: {} {}", left, right),
                ));
            }
            matrix.update(left, right, cost);
        }

        Ok(matrix)
    }

    pub fn zeroed(num_left: usize, num_right: usize) -> ConnectionMatrix {
        ConnectionMatrix {
            data: vec![0; num_left * num_right],
            num_left,
            num_right,
        }
    }

    #[inline(always)]
    fn index(&self, left: u16, right: u16) -> usize {
        let uleft = left as usize;
        let uright = right as usize;
        debug_assert!(uleft < self.num_left);
        debug_assert!(uright < self.num_right);
        uright * self.num_left + uleft
    }

    fn contains(&self, left: u16, right: u16) -> bool {
        (left as usize) < self.num_left && (right as usize) < self.num_right
    }

    /// Gets the value of the connection matrix
    ///
    /// Ids are validated when the lexicon is loaded, out of range ids panic.
    #[inline(always)]
    pub fn cost(&self, left: u16, right: u16) -> i16 {
        self.data[self.index(left, right)]
    }

    pub fn update(&mut self, left: u16, right: u16, value: i16) {
        let index = self.index(left, right);
        self.data[index] = value;
    }

    /// Checks that a word with the given ids can be connected on both sides
    pub fn accepts(&self, left_id: u16, right_id: u16) -> bool {
        (left_id as usize) < self.num_right && (right_id as usize) < self.num_left
    }

    /// Returns maximum number of left connection ID
    pub fn num_left(&self) -> usize {
        self.num_left
    }

    /// Returns maximum number of right connection ID
    pub fn num_right(&self) -> usize {
        self.num_right
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::assert_matches;
    use std::io::Cursor;

    #[test]
    fn sparse_matrix_defaults_to_zero() {
        let data = "3 3\n0 1 -100\n2 0 250\n";
        let m = ConnectionMatrix::from_reader(Cursor::new(data)).unwrap();
        assert_eq!(3, m.num_left());
        assert_eq!(3, m.num_right());
        assert_eq!(-100, m.cost(0, 1));
        assert_eq!(250, m.cost(2, 0));
        assert_eq!(0, m.cost(1, 1));
    }

    #[test]
    fn out_of_range_is_rejected() {
        let data = "2 2\n0 2 10\n";
        assert_matches!(
            ConnectionMatrix::from_reader(Cursor::new(data)),
            Err(KakariError::InvalidDataFormat(1, _))
        );
    }

    #[test]
    fn missing_header_is_rejected() {
        assert_matches!(
            ConnectionMatrix::from_reader(Cursor::new("")),
            Err(KakariError::InvalidDataFormat(0, _))
        );
        assert_matches!(
            ConnectionMatrix::from_reader(Cursor::new("1 2 3\n")),
            Err(KakariError::InvalidDataFormat(0, _))
        );
    }

    #[test]
    fn accepts_checks_both_sides() {
        let m = ConnectionMatrix::zeroed(2, 3);
        assert!(m.accepts(2, 1));
        assert!(!m.accepts(3, 1));
        assert!(!m.accepts(0, 2));
    }
}
