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

//! Input normalizer: raw bytes in a declared charset to canonical text

use encoding_rs::{DecoderResult, EncoderResult, Encoding, EUC_JP, SHIFT_JIS};
use unicode_normalization::UnicodeNormalization;

use crate::charset::Charset;
use crate::error::{KakariError, KakariResult};

/// Decodes `bytes` declared as `charset` into canonical (UTF-8) text.
///
/// The error carries the offset of the first byte which is not valid
/// under the declared charset.
pub fn normalize(bytes: &[u8], charset: Charset) -> KakariResult<String> {
    match charset {
        Charset::Utf8 => match std::str::from_utf8(bytes) {
            Ok(s) => Ok(s.to_owned()),
            Err(e) => Err(KakariError::Encoding {
                charset,
                offset: e.valid_up_to(),
            }),
        },
        Charset::Ascii => match bytes.iter().position(|b| !b.is_ascii()) {
            // ascii is a subset of utf-8, every byte is one char
            None => Ok(bytes.iter().map(|&b| b as char).collect()),
            Some(offset) => Err(KakariError::Encoding { charset, offset }),
        },
        Charset::EucJp => decode_legacy(bytes, EUC_JP, charset),
        Charset::Cp932 => decode_legacy(bytes, SHIFT_JIS, charset),
    }
}

/// Encodes canonical text back into `charset`
pub fn encode(text: &str, charset: Charset) -> KakariResult<Vec<u8>> {
    match charset {
        Charset::Utf8 => Ok(text.as_bytes().to_vec()),
        Charset::Ascii => match text.chars().find(|c| !c.is_ascii()) {
            None => Ok(text.as_bytes().to_vec()),
            Some(ch) => Err(KakariError::Unmappable { charset, ch }),
        },
        Charset::EucJp => encode_legacy(text, EUC_JP, charset),
        Charset::Cp932 => encode_legacy(text, SHIFT_JIS, charset),
    }
}

/// Normalized form of a morpheme surface, used for feature extraction
/// and pattern matching. Full-width ASCII and half-width katakana are folded.
pub fn normalize_surface(surface: &str) -> String {
    surface.nfkc().collect()
}

fn decode_legacy(
    bytes: &[u8],
    encoding: &'static Encoding,
    charset: Charset,
) -> KakariResult<String> {
    let mut decoder = encoding.new_decoder_without_bom_handling();
    let capacity = decoder
        .max_utf8_buffer_length_without_replacement(bytes.len())
        .unwrap_or(bytes.len() * 3);
    let mut output = String::with_capacity(capacity);
    let mut consumed = 0;

    loop {
        let (result, read) =
            decoder.decode_to_string_without_replacement(&bytes[consumed..], &mut output, true);
        consumed += read;
        match result {
            DecoderResult::InputEmpty => return Ok(output),
            DecoderResult::OutputFull => {
                let rest = bytes.len() - consumed;
                output.reserve(
                    decoder
                        .max_utf8_buffer_length_without_replacement(rest)
                        .unwrap_or(rest * 3)
                        .max(4),
                );
            }
            DecoderResult::Malformed(bad, after) => {
                let offset = consumed.saturating_sub(bad as usize + after as usize);
                return Err(KakariError::Encoding { charset, offset });
            }
        }
    }
}

fn encode_legacy(
    text: &str,
    encoding: &'static Encoding,
    charset: Charset,
) -> KakariResult<Vec<u8>> {
    let mut encoder = encoding.new_encoder();
    let capacity = encoder
        .max_buffer_length_from_utf8_without_replacement(text.len())
        .unwrap_or(text.len() * 2);
    let mut output = Vec::with_capacity(capacity);
    let mut consumed = 0;

    loop {
        let (result, read) =
            encoder.encode_from_utf8_to_vec_without_replacement(&text[consumed..], &mut output, true);
        consumed += read;
        match result {
            EncoderResult::InputEmpty => return Ok(output),
            EncoderResult::OutputFull => {
                let rest = text.len() - consumed;
                output.reserve(
                    encoder
                        .max_buffer_length_from_utf8_without_replacement(rest)
                        .unwrap_or(rest * 2)
                        .max(4),
                );
            }
            EncoderResult::Unmappable(ch) => {
                return Err(KakariError::Unmappable { charset, ch });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SENTENCE: &str = "太郎は二郎にこの本を渡した.";

    #[test]
    fn utf8_passes_through() {
        assert_eq!(SENTENCE, normalize(SENTENCE.as_bytes(), Charset::Utf8).unwrap());
    }

    #[test]
    fn utf8_reports_first_invalid_byte() {
        let mut bytes = "ab".as_bytes().to_vec();
        bytes.push(0xFF);
        bytes.push(b'c');
        match normalize(&bytes, Charset::Utf8) {
            Err(KakariError::Encoding { offset, charset }) => {
                assert_eq!(2, offset);
                assert_eq!(Charset::Utf8, charset);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn ascii_rejects_high_bytes() {
        let bytes = b"abc\x80def";
        match normalize(bytes, Charset::Ascii) {
            Err(KakariError::Encoding { offset, charset }) => {
                assert_eq!(3, offset);
                assert_eq!(Charset::Ascii, charset);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!("plain", normalize(b"plain", Charset::Ascii).unwrap());
    }

    #[test]
    fn legacy_round_trip() {
        for cs in [Charset::EucJp, Charset::Cp932].iter() {
            let bytes = encode(SENTENCE, *cs).unwrap();
            assert_ne!(SENTENCE.as_bytes(), &bytes[..]);
            assert_eq!(SENTENCE, normalize(&bytes, *cs).unwrap());
        }
    }

    #[test]
    fn euc_jp_reports_offset() {
        let mut bytes = encode("本を", Charset::EucJp).unwrap();
        let valid = bytes.len();
        // lead byte followed by an invalid trail byte
        bytes.push(0xA4);
        bytes.push(0x20);
        match normalize(&bytes, Charset::EucJp) {
            Err(KakariError::Encoding { offset, .. }) => assert_eq!(valid, offset),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn ascii_encode_rejects_kanji() {
        match encode("本", Charset::Ascii) {
            Err(KakariError::Unmappable { ch, .. }) => assert_eq!('本', ch),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn surface_is_nfkc() {
        assert_eq!("ABC123", normalize_surface("ＡＢＣ１２３"));
        assert_eq!("カタカナ", normalize_surface("ｶﾀｶﾅ"));
        assert_eq!(".", normalize_surface("."));
    }
}
