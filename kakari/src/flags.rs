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

//! Command line style option strings, `-f1 -I0 --charset=UTF-8`

use std::path::PathBuf;

use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::all_consuming,
    multi::{fold_many1, separated_list0},
    sequence::delimited,
    IResult,
};

use crate::charset::Charset;
use crate::dep::Algorithm;
use crate::error::{KakariError, KakariResult};
use crate::ne::NeMode;
use crate::tree::{FormatType, Layer};

/// Short and long names of every option, all options take a value
const OPTIONS: [(char, &str); 11] = [
    ('f', "output-format"),
    ('I', "input-layer"),
    ('O', "output-layer"),
    ('t', "charset"),
    ('r', "rcfile"),
    ('d', "dicdir"),
    ('m', "parser-model"),
    ('u', "max-unknown-length"),
    ('a', "algorithm"),
    ('n', "ne"),
    ('N', "ne-model"),
];

fn quoted(input: &str) -> IResult<&str, &str> {
    delimited(char('"'), take_while(|c: char| c != '"'), char('"'))(input)
}

fn bare(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace() && c != '"')(input)
}

/// One argument, quoted parts may contain spaces: `--rcfile="my dir"/k.json`
fn argument(input: &str) -> IResult<&str, String> {
    fold_many1(alt((quoted, bare)), String::new, |mut acc, part| {
        acc.push_str(part);
        acc
    })(input)
}

fn arguments(input: &str) -> IResult<&str, Vec<String>> {
    all_consuming(delimited(
        multispace0,
        separated_list0(multispace1, argument),
        multispace0,
    ))(input)
}

/// Splits an option string into arguments
pub fn tokenize(input: &str) -> KakariResult<Vec<String>> {
    arguments(input)
        .map(|(_, args)| args)
        .map_err(|e| KakariError::configuration("flags", format!("can not split `{}`: {}", input, e)))
}

/// Options given on a command line, `None` when absent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flags {
    pub output_format: Option<FormatType>,
    pub input_layer: Option<Layer>,
    pub output_layer: Option<Layer>,
    pub charset: Option<Charset>,
    pub rcfile: Option<PathBuf>,
    pub dicdir: Option<PathBuf>,
    pub parser_model: Option<PathBuf>,
    pub max_unknown_length: Option<usize>,
    pub algorithm: Option<Algorithm>,
    pub ne: Option<NeMode>,
    pub ne_model: Option<PathBuf>,
}

fn long_name(name: &str) -> KakariResult<&'static str> {
    OPTIONS
        .iter()
        .find(|(_, long)| *long == name)
        .map(|(_, long)| *long)
        .ok_or_else(|| KakariError::configuration(name, "unknown option"))
}

fn short_name(name: char) -> KakariResult<&'static str> {
    OPTIONS
        .iter()
        .find(|(short, _)| *short == name)
        .map(|(_, long)| *long)
        .ok_or_else(|| KakariError::configuration(name.to_string(), "unknown option"))
}

impl Flags {
    /// Parses a whitespace separated option string
    pub fn parse(input: &str) -> KakariResult<Flags> {
        Self::from_args(tokenize(input)?)
    }

    /// Parses already split arguments, without the program name
    pub fn from_args<I, S>(args: I) -> KakariResult<Flags>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut flags = Flags::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let arg = arg.as_ref();
            let (name, attached) = if let Some(long) = arg.strip_prefix("--") {
                match long.split_once('=') {
                    Some((name, value)) => (long_name(name)?, Some(value.to_owned())),
                    None => (long_name(long)?, None),
                }
            } else if let Some(short) = arg.strip_prefix('-') {
                let mut chars = short.chars();
                let name = match chars.next() {
                    Some(c) => short_name(c)?,
                    None => return Err(KakariError::configuration(arg, "unknown option")),
                };
                let rest = chars.as_str();
                (name, Some(rest.to_owned()).filter(|r| !r.is_empty()))
            } else {
                return Err(KakariError::configuration(arg, "unexpected argument"));
            };

            let value = match attached {
                Some(v) => v,
                None => args
                    .next()
                    .map(|v| v.as_ref().to_owned())
                    .ok_or_else(|| KakariError::configuration(name, "missing value"))?,
            };
            flags.set(name, &value)?;
        }
        Ok(flags)
    }

    fn set(&mut self, name: &'static str, value: &str) -> KakariResult<()> {
        match name {
            "output-format" => self.output_format = Some(value.parse()?),
            "input-layer" => self.input_layer = Some(Layer::parse_option(value, name)?),
            "output-layer" => self.output_layer = Some(output_layer(value)?),
            "charset" => self.charset = Some(value.parse()?),
            "rcfile" => self.rcfile = Some(PathBuf::from(value)),
            "dicdir" => self.dicdir = Some(PathBuf::from(value)),
            "parser-model" => self.parser_model = Some(PathBuf::from(value)),
            "max-unknown-length" => self.max_unknown_length = Some(max_unknown_length(value)?),
            "algorithm" => self.algorithm = Some(value.parse()?),
            "ne" => self.ne = Some(NeMode::parse_option(value, name)?),
            "ne-model" => self.ne_model = Some(PathBuf::from(value)),
            _ => return Err(KakariError::configuration(name, "unknown option")),
        }
        Ok(())
    }
}

/// Output layers start at POS, a raw sentence is never an output
pub(crate) fn output_layer(value: &str) -> KakariResult<Layer> {
    match Layer::parse_option(value, "output-layer")? {
        Layer::RawSentence => Err(KakariError::configuration(
            "output-layer",
            "raw sentence is not an output layer",
        )),
        layer => Ok(layer),
    }
}

pub(crate) fn max_unknown_length(value: &str) -> KakariResult<usize> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(KakariError::configuration(
            "max-unknown-length",
            format!("expected a positive integer, got `{}`", value),
        )),
    }
}
