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

use std::fmt::Debug;
use std::path::PathBuf;
use thiserror::Error;

use crate::charset::Charset;

pub type KakariResult<T> = Result<T, KakariError>;

/// Kakari error
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum KakariError {
    #[error("{context}: {cause}")]
    ErrWithContext {
        context: String,
        cause: Box<KakariError>,
    },

    #[error("{context}: {cause}")]
    Io {
        cause: std::io::Error,
        context: String,
    },

    /// Bad or unknown option, fatal to the call or the construction
    #[error("invalid option `{option}`: {reason}")]
    Configuration { option: String, reason: String },

    /// Input bytes are not valid under the declared charset
    #[error("invalid {charset} byte sequence at offset {offset}")]
    Encoding { charset: Charset, offset: usize },

    /// Character can not be represented in the output charset
    #[error("character {ch:?} can not be encoded as {charset}")]
    Unmappable { charset: Charset, ch: char },

    /// Lattice could not be connected, recovered by the segmenter
    #[error("no segmentation path reaches byte offset {offset}")]
    Segmentation { offset: usize },

    /// Dependency links do not form a forward-only forest
    #[error("inconsistent dependency link {source_chunk} -> {target}: {reason}")]
    Consistency {
        source_chunk: usize,
        target: usize,
        reason: &'static str,
    },

    /// Dictionary or model could not be loaded
    #[error("failed to load {}: {cause}", .path.display())]
    ResourceLoad {
        path: PathBuf,
        cause: Box<KakariError>,
    },

    #[error("parser is {0}")]
    Lifecycle(&'static str),

    #[error("Invalid data format: {1} at line {0}")]
    InvalidDataFormat(usize, String),

    #[error("Formatting failed")]
    FmtError(#[from] std::fmt::Error),

    #[error("Parse Int Error")]
    ParseIntError(#[from] std::num::ParseIntError),

    #[error("Parse Float Error")]
    ParseFloatError(#[from] std::num::ParseFloatError),

    #[error("Serde error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Invalid character category type: {0}")]
    InvalidCharacterCategoryType(String),

    #[error("Failed to build the lexicon trie")]
    MissingDictionaryTrie,
}

impl From<std::io::Error> for KakariError {
    fn from(e: std::io::Error) -> Self {
        KakariError::Io {
            cause: e,
            context: String::from("IO Error"),
        }
    }
}

impl KakariError {
    pub fn with_context<S: Into<String>>(self, ctx: S) -> Self {
        match self {
            KakariError::Io { cause, .. } => KakariError::Io {
                cause,
                context: ctx.into(),
            },
            cause => KakariError::ErrWithContext {
                cause: Box::new(cause),
                context: ctx.into(),
            },
        }
    }

    pub fn configuration<O: Into<String>, R: Into<String>>(option: O, reason: R) -> Self {
        KakariError::Configuration {
            option: option.into(),
            reason: reason.into(),
        }
    }

    pub fn resource_load<P: Into<PathBuf>>(path: P, cause: KakariError) -> Self {
        KakariError::ResourceLoad {
            path: path.into(),
            cause: Box::new(cause),
        }
    }

    /// Strips context wrappers, returns the underlying error
    pub fn root(&self) -> &KakariError {
        match self {
            KakariError::ErrWithContext { cause, .. } => cause.root(),
            e => e,
        }
    }
}
