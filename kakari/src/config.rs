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

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::analysis::segmenter::DEFAULT_MAX_UNKNOWN_LENGTH;
use crate::charset::Charset;
use crate::chunk::pattern::{ChunkPatterns, RawChunkPatterns};
use crate::dep::Algorithm;
use crate::error::{KakariError, KakariResult};
use crate::flags::{self, Flags};
use crate::ne::NeMode;
use crate::tree::{FormatType, Layer};

const DEFAULT_RESOURCE_DIR: &str = "resources";
const DEFAULT_SETTING_FILE: &str = "kakari.json";
const DEFAULT_SYSTEM_DICT_FILE: &str = "lex.csv";
const DEFAULT_MATRIX_FILE: &str = "matrix.def";
const DEFAULT_CHAR_DEF_FILE: &str = "char.def";
const DEFAULT_UNK_DEF_FILE: &str = "unk.def";
const DEFAULT_MODEL_FILE: &str = "dep.model";
const DEFAULT_NE_MODEL_FILE: &str = "ne.model";

/// Setting data loaded from config file
#[derive(Debug, Clone)]
pub struct Config {
    pub resource_dir: PathBuf,
    pub system_dict: PathBuf,
    pub connection_matrix: PathBuf,
    pub character_definition_file: PathBuf,
    pub unknown_definition_file: PathBuf,
    pub parser_model: PathBuf,
    pub ne_model: PathBuf,

    pub charset: Charset,
    pub output_format: FormatType,
    pub input_layer: Layer,
    pub output_layer: Layer,
    pub max_unknown_length: usize,
    /// Overrides the algorithm named by the model
    pub algorithm: Option<Algorithm>,
    pub ne: NeMode,
    pub chunk_patterns: ChunkPatterns,
    /// Dump segmentation lattices with `log::debug!`
    pub debug: bool,
}

/// Struct corresponds with raw config json file.
/// You must use filed names defined here as json object key.
#[allow(non_snake_case)]
#[derive(Deserialize, Debug, Default)]
pub struct RawConfig {
    resourcePath: Option<PathBuf>,
    systemDict: Option<PathBuf>,
    connectionMatrix: Option<PathBuf>,
    characterDefinitionFile: Option<PathBuf>,
    unknownDefinitionFile: Option<PathBuf>,
    parserModel: Option<PathBuf>,
    neModel: Option<PathBuf>,

    charset: Option<String>,
    /// name or number
    outputFormat: Option<Value>,
    inputLayer: Option<Value>,
    outputLayer: Option<Value>,
    maxUnknownLength: Option<usize>,
    algorithm: Option<String>,
    ne: Option<Value>,
    chunkPatterns: Option<RawChunkPatterns>,
}

impl RawConfig {
    pub fn from_file(path: &Path) -> KakariResult<RawConfig> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Numbers and strings are both accepted for enumerated settings
fn value_str(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl Config {
    /// Loads `config_file`, or `kakari.json` of the resource directory when
    /// it exists. Explicit arguments take priority over the file.
    pub fn new(config_file: Option<PathBuf>, resource_dir: Option<PathBuf>) -> KakariResult<Self> {
        let read = |path: &Path| {
            RawConfig::from_file(path).map_err(|e| {
                KakariError::configuration("rcfile", format!("{}: {}", path.display(), e))
            })
        };

        // prioritize arg (cli option) > default
        let raw_config = match config_file {
            Some(path) => read(&path)?,
            None => {
                let dir = resource_dir
                    .clone()
                    .unwrap_or_else(Config::default_resource_dir);
                let path = dir.join(DEFAULT_SETTING_FILE);
                if path.is_file() {
                    read(&path)?
                } else {
                    RawConfig::default()
                }
            }
        };
        Config::from_raw(raw_config, resource_dir)
    }

    /// Configuration with every file taken from `resource_dir`
    pub fn with_resource_dir<P: Into<PathBuf>>(resource_dir: P) -> KakariResult<Self> {
        Config::from_raw(RawConfig::default(), Some(resource_dir.into()))
    }

    /// Flags override the configuration file they name
    pub fn from_flags(flags: &Flags) -> KakariResult<Self> {
        let mut config = Config::new(flags.rcfile.clone(), flags.dicdir.clone())?;
        if let Some(model) = &flags.parser_model {
            config.parser_model = model.clone();
        }
        if let Some(charset) = flags.charset {
            config.charset = charset;
        }
        if let Some(format) = flags.output_format {
            config.output_format = format;
        }
        if let Some(layer) = flags.input_layer {
            config.input_layer = layer;
        }
        if let Some(layer) = flags.output_layer {
            config.output_layer = layer;
        }
        if let Some(n) = flags.max_unknown_length {
            config.max_unknown_length = n;
        }
        if flags.algorithm.is_some() {
            config.algorithm = flags.algorithm;
        }
        if let Some(ne) = flags.ne {
            config.ne = ne;
        }
        if let Some(model) = &flags.ne_model {
            config.ne_model = model.clone();
        }
        Ok(config)
    }

    pub fn from_raw(raw_config: RawConfig, resource_dir: Option<PathBuf>) -> KakariResult<Self> {
        // prioritize arg (cli option) > config file > default
        let resource_dir = resource_dir
            .or(raw_config.resourcePath)
            .unwrap_or_else(Config::default_resource_dir);

        let path = |p: Option<PathBuf>, default: &str| {
            Config::join_if_relative(&resource_dir, p.unwrap_or_else(|| PathBuf::from(default)))
        };
        let system_dict = path(raw_config.systemDict, DEFAULT_SYSTEM_DICT_FILE);
        let connection_matrix = path(raw_config.connectionMatrix, DEFAULT_MATRIX_FILE);
        let character_definition_file =
            path(raw_config.characterDefinitionFile, DEFAULT_CHAR_DEF_FILE);
        let unknown_definition_file = path(raw_config.unknownDefinitionFile, DEFAULT_UNK_DEF_FILE);
        let parser_model = path(raw_config.parserModel, DEFAULT_MODEL_FILE);
        let ne_model = path(raw_config.neModel, DEFAULT_NE_MODEL_FILE);

        let charset = match raw_config.charset {
            Some(c) => c.parse()?,
            None => Charset::default(),
        };
        let output_format = match raw_config.outputFormat {
            Some(v) => value_str(&v).parse()?,
            None => FormatType::default(),
        };
        let input_layer = match raw_config.inputLayer {
            Some(v) => Layer::parse_option(&value_str(&v), "input-layer")?,
            None => Layer::RawSentence,
        };
        let output_layer = match raw_config.outputLayer {
            Some(v) => flags::output_layer(&value_str(&v))?,
            None => Layer::Dep,
        };
        let max_unknown_length = match raw_config.maxUnknownLength {
            Some(n) => flags::max_unknown_length(&n.to_string())?,
            None => DEFAULT_MAX_UNKNOWN_LENGTH,
        };
        let algorithm = raw_config
            .algorithm
            .map(|a| a.parse::<Algorithm>())
            .transpose()?;
        let ne = match raw_config.ne {
            Some(v) => NeMode::parse_option(&value_str(&v), "ne")?,
            None => NeMode::default(),
        };
        let chunk_patterns = ChunkPatterns::merge(raw_config.chunkPatterns.unwrap_or_default());

        Ok(Config {
            resource_dir,
            system_dict,
            connection_matrix,
            character_definition_file,
            unknown_definition_file,
            parser_model,
            ne_model,
            charset,
            output_format,
            input_layer,
            output_layer,
            max_unknown_length,
            algorithm,
            ne,
            chunk_patterns,
            debug: false,
        })
    }

    /// `resources/` at the workspace root
    pub fn default_resource_dir() -> PathBuf {
        let src_root_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        src_root_path.join("..").join(DEFAULT_RESOURCE_DIR)
    }

    fn join_if_relative(resource_dir: &Path, file_path: PathBuf) -> PathBuf {
        if file_path.is_absolute() {
            file_path
        } else {
            resource_dir.join(&file_path)
        }
    }
}
