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
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use log::Level;
use structopt::StructOpt;

use kakari::config::Config;
use kakari::flags::Flags;
use kakari::normalizer::encode;
use kakari::prelude::*;

/// A Japanese dependency structure parser
#[derive(StructOpt)]
#[structopt(name = "kakari")]
struct Cli {
    /// Input text file: If not present, read from STDIN
    #[structopt(parse(from_os_str))]
    file: Option<PathBuf>,

    /// Output format: tree, lattice, tree-lattice, xml, conll, none (or 0-5)
    #[structopt(short = "f", long = "output-format")]
    output_format: Option<String>,

    /// Input layer: 0 raw sentence, 1 POS, 2 chunk, 3 selection, 4 dependency
    #[structopt(short = "I", long = "input-layer")]
    input_layer: Option<String>,

    /// Output layer: 1 POS, 2 chunk, 3 selection, 4 dependency
    #[structopt(short = "O", long = "output-layer")]
    output_layer: Option<String>,

    /// Charset of input and output: EUC-JP, CP932, UTF-8, ASCII
    #[structopt(short = "t", long = "charset")]
    charset: Option<String>,

    /// Path to the setting file in JSON format
    #[structopt(short = "r", long = "rcfile", parse(from_os_str))]
    rcfile: Option<PathBuf>,

    /// Path to the root directory of resources
    #[structopt(short = "d", long = "dicdir", parse(from_os_str))]
    dicdir: Option<PathBuf>,

    /// Path to the dependency model
    #[structopt(short = "m", long = "parser-model", parse(from_os_str))]
    parser_model: Option<PathBuf>,

    /// Maximum length of unknown words, in characters
    #[structopt(short = "u", long = "max-unknown-length")]
    max_unknown_length: Option<String>,

    /// Dependency algorithm: backward, shift_reduce or tournament
    #[structopt(short = "a", long = "algorithm")]
    algorithm: Option<String>,

    /// Named entity tags: 0 off, 1 within chunks, 2 across chunks
    #[structopt(short = "n", long = "ne")]
    ne: Option<String>,

    /// Path to the named entity rules
    #[structopt(short = "N", long = "ne-model", parse(from_os_str))]
    ne_model: Option<PathBuf>,

    // Output text file: If not present, use stdout
    #[structopt(short = "o", long = "output", parse(from_os_str))]
    output_file: Option<PathBuf>,

    /// Prints resource loading information
    #[structopt(short = "v", long = "verbose")]
    verbose: bool,

    /// Debug mode: Print the segmentation lattices
    #[structopt(long = "debug")]
    debug: bool,
}

impl Cli {
    /// Options in the flag grammar of the library
    fn flags(&self) -> KakariResult<Flags> {
        let mut args: Vec<String> = Vec::new();
        let mut push = |name: &str, value: Option<String>| {
            if let Some(v) = value {
                args.push(format!("--{}", name));
                args.push(v);
            }
        };
        let path = |p: &Option<PathBuf>| p.as_ref().map(|p| p.to_string_lossy().into_owned());
        push("output-format", self.output_format.clone());
        push("input-layer", self.input_layer.clone());
        push("output-layer", self.output_layer.clone());
        push("charset", self.charset.clone());
        push("rcfile", path(&self.rcfile));
        push("dicdir", path(&self.dicdir));
        push("parser-model", path(&self.parser_model));
        push("max-unknown-length", self.max_unknown_length.clone());
        push("algorithm", self.algorithm.clone());
        push("ne", self.ne.clone());
        push("ne-model", path(&self.ne_model));
        Flags::from_args(args)
    }
}

fn main() {
    let args: Cli = Cli::from_args();

    if args.verbose || args.debug {
        let level = if args.debug { Level::Debug } else { Level::Info };
        if let Err(e) = simple_logger::init_with_level(level) {
            eprintln!("Failed to initialize logger: {}", e);
        }
    }

    if let Err(e) = run(&args) {
        eprintln!("kakari: {}", e);
        process::exit(1);
    }
}

fn run(args: &Cli) -> KakariResult<()> {
    let mut config = Config::from_flags(&args.flags()?)?;
    config.debug = args.debug;
    let charset = config.charset;
    let input_layer = config.input_layer;
    let parser = Parser::new(config)?;
    let format = parser.output_format()?;

    // input: stdin or file
    let reader: Box<dyn BufRead> = match &args.file {
        Some(input_path) => Box::new(BufReader::new(
            File::open(input_path).map_err(|e| {
                KakariError::from(e).with_context(format!("{}", input_path.display()))
            })?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    // output: stdout or file
    let mut writer: Box<dyn Write> = match &args.output_file {
        Some(output_path) => Box::new(BufWriter::new(File::create(output_path).map_err(
            |e| KakariError::from(e).with_context(format!("{}", output_path.display())),
        )?)),
        None => Box::new(BufWriter::new(io::stdout())),
    };

    let mut write_tree = |bytes: &[u8]| -> KakariResult<()> {
        let tree = parser.parse_bytes(bytes)?;
        writer.write_all(&encode(&tree.to_string_as(format)?, charset)?)?;
        Ok(())
    };

    // raw sentences are one per line, annotated input ends with EOS
    let mut block: Vec<u8> = Vec::new();
    for line in reader.split(b'\n') {
        let mut line = line?;
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        if input_layer == Layer::RawSentence {
            write_tree(&line)?;
            continue;
        }
        let eos = line == b"EOS";
        block.extend_from_slice(&line);
        block.push(b'\n');
        if eos {
            write_tree(&block)?;
            block.clear();
        }
    }
    if block.iter().any(|b| !b.is_ascii_whitespace()) {
        write_tree(&block)?;
    }
    drop(write_tree);

    writer.flush()?;
    Ok(())
}
