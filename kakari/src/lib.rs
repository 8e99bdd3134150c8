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

//! Japanese dependency structure parser
//!
//! Raw bytes are decoded, split into morphemes with a lattice search over
//! a MeCab style dictionary, grouped into chunks (文節) and every chunk is
//! linked to the later chunk it modifies.
//!
//! The main entry point of the library is the
//! [`Parser`](parser/struct.Parser.html) struct.

pub mod analysis;
pub mod charset;
pub mod chunk;
pub mod config;
pub mod dep;
pub mod dic;
pub mod error;
pub mod flags;
pub mod ne;
pub mod normalizer;
pub mod parser;
pub mod tree;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod prelude {
    pub use crate::{
        analysis::Morpheme,
        charset::Charset,
        chunk::Chunk,
        config::Config,
        dep::Algorithm,
        error::KakariError,
        error::KakariResult,
        ne::{EntityTag, NeMode},
        parser::{Parser, ParserState},
        tree::{FormatType, Layer, ParseTree},
    };
}
