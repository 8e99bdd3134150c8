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

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::KakariError;

/// Character encoding of raw input and output bytes
///
/// The numeric ids are stable and used by the `-t` flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Charset {
    /// Legacy multi-byte Japanese encoding
    EucJp,

    /// Windows code page 932 (Shift_JIS with Microsoft extensions)
    Cp932,

    Utf8,

    /// 7-bit ASCII
    Ascii,
}

impl Charset {
    pub const ALL: [Charset; 4] = [Charset::EucJp, Charset::Cp932, Charset::Utf8, Charset::Ascii];

    pub fn id(self) -> u8 {
        match self {
            Charset::EucJp => 0,
            Charset::Cp932 => 1,
            Charset::Utf8 => 2,
            Charset::Ascii => 3,
        }
    }

    pub fn from_id(id: u8) -> Option<Charset> {
        Charset::ALL.get(id as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Charset::EucJp => "EUC-JP",
            Charset::Cp932 => "CP932",
            Charset::Utf8 => "UTF-8",
            Charset::Ascii => "ASCII",
        }
    }
}

impl Default for Charset {
    fn default() -> Self {
        Charset::Utf8
    }
}

impl FromStr for Charset {
    type Err = KakariError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(|c: char| c == '-' || c == '_', "");
        match normalized.as_str() {
            "eucjp" | "euc" | "0" => Ok(Charset::EucJp),
            "cp932" | "sjis" | "shiftjis" | "windows31j" | "1" => Ok(Charset::Cp932),
            "utf8" | "2" => Ok(Charset::Utf8),
            "ascii" | "usascii" | "3" => Ok(Charset::Ascii),
            _ => Err(KakariError::configuration(
                "charset",
                format!("unknown charset {:?}", s),
            )),
        }
    }
}

impl Display for Charset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_names() {
        assert_eq!(Charset::EucJp, "EUC-JP".parse().unwrap());
        assert_eq!(Charset::EucJp, "euc_jp".parse().unwrap());
        assert_eq!(Charset::Cp932, "Shift_JIS".parse().unwrap());
        assert_eq!(Charset::Cp932, "SJIS".parse().unwrap());
        assert_eq!(Charset::Utf8, "utf8".parse().unwrap());
        assert_eq!(Charset::Ascii, "ASCII".parse().unwrap());
    }

    #[test]
    fn parse_ids() {
        for cs in Charset::ALL.iter() {
            let parsed: Charset = cs.id().to_string().parse().unwrap();
            assert_eq!(*cs, parsed);
            assert_eq!(Some(*cs), Charset::from_id(cs.id()));
        }
        assert_eq!(None, Charset::from_id(4));
    }

    #[test]
    fn unknown_charset_names_option() {
        match "latin1".parse::<Charset>() {
            Err(KakariError::Configuration { option, .. }) => assert_eq!("charset", option),
            other => panic!("unexpected {:?}", other),
        }
    }
}
