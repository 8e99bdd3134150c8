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

#[macro_use]
extern crate lazy_static;

use claim::assert_matches;

use kakari::prelude::*;

mod common;
use common::{links, parse, parser_with, SENTENCE};

#[test]
fn lower_output_layers_are_lattices() {
    let out = parser_with("-O 1 -f tree").parse_to_string(SENTENCE).unwrap();
    assert!(out.starts_with("太郎\t名詞"));
    assert!(!out.contains("* 0"));

    let out = parser_with("-O 2").parse_to_string(SENTENCE).unwrap();
    assert!(out.starts_with("* 0 -1D\n太郎\t"));

    let out = parser_with("-O 3").parse_to_string(SENTENCE).unwrap();
    let first = out.lines().next().unwrap();
    assert!(first.starts_with("* 0 -1D 0/1 0.000000 "));
    assert!(first.contains("F_H0:太郎"));
}

#[test]
fn output_layer_stops_the_pipeline() {
    let tree = parser_with("-O 2").parse(SENTENCE).unwrap();
    assert_eq!(Layer::Chunk, tree.layer());
    assert_eq!(5, tree.chunks().len());
    assert!(tree.chunks().iter().all(|c| c.features.is_empty()));
    assert!(tree.chunks().iter().all(|c| c.link.is_none()));
}

#[test]
fn pos_input() {
    let pos = parser_with("-O 1").parse_to_string(SENTENCE).unwrap();
    let tree = parser_with("-I 1").parse(&pos).unwrap();
    assert_eq!(SENTENCE, tree.text());
    assert_eq!(links(&parse(SENTENCE)), links(&tree));
}

#[test]
fn chunk_and_selection_input() {
    let expected = parse(SENTENCE).to_string_as(FormatType::Lattice).unwrap();
    for (output, input) in &[("-O 2", "-I 2 -f 1"), ("-O 3", "-I 3 -f 1")] {
        let annotated = parser_with(output).parse_to_string(SENTENCE).unwrap();
        let out = parser_with(input).parse_to_string(&annotated).unwrap();
        assert_eq!(expected, out);
    }
}

#[test]
fn dep_input_is_validated() {
    let parser = parser_with("-I 4 -f 1");
    let lattice = parse(SENTENCE).to_string_as(FormatType::Lattice).unwrap();
    assert_eq!(lattice, parser.parse_to_string(&lattice).unwrap());

    let broken = lattice.replacen("* 3 4D", "* 3 1D", 1);
    assert_matches!(
        parser.parse(&broken),
        Err(KakariError::Consistency { source_chunk: 3, target: 1, .. })
    );
}

#[test]
fn chunk_input_links_are_validated() {
    let input = "* 0 -1D\n本\t名詞,一般,*,*,*,*,本,ホン,ホン\n* 1 0D\nを\t助詞,格助詞,一般,*,*,*,を,ヲ,ヲ\nEOS\n";
    for flags in &["-I 2 -O 2", "-I 3 -O 3"] {
        assert_matches!(
            parser_with(flags).parse_to_string(input),
            Err(KakariError::Consistency { source_chunk: 1, target: 0, .. })
        );
    }
}

#[test]
fn malformed_annotated_input() {
    let parser = parser_with("-I 2");
    assert_matches!(
        parser.parse("太郎\t名詞\nEOS\n"),
        Err(KakariError::InvalidDataFormat(1, _))
    );
    assert_matches!(
        parser.parse("* 0 -1D\n太郎\nEOS\n"),
        Err(KakariError::InvalidDataFormat(2, _))
    );
}

#[test]
fn parse_tree_runs_remaining_stages() {
    let pos = parser_with("-O 1").parse(SENTENCE).unwrap();
    assert_eq!(Layer::Pos, pos.layer());
    let full = common::PARSER.parse_tree(pos).unwrap();
    assert_eq!(Layer::Dep, full.layer());
    assert_eq!(links(&parse(SENTENCE)), links(&full));
}
