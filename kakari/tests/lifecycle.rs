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

use std::sync::Arc;
use std::thread;

use claim::{assert_matches, assert_ok};

use kakari::prelude::*;

mod common;
use common::{links, parse, parser_with, SENTENCE, TEST_CONFIG};

#[test]
fn close_releases_resources() {
    let parser = parser_with("");
    assert_eq!(ParserState::Ready, parser.state());
    assert_ok!(parser.parse(SENTENCE));

    assert_ok!(parser.close());
    assert_eq!(ParserState::Closed, parser.state());
    assert_matches!(parser.parse(SENTENCE), Err(KakariError::Lifecycle("closed")));
    assert_matches!(parser.output_format(), Err(KakariError::Lifecycle("closed")));

    // closing twice is harmless
    assert_ok!(parser.close());
    assert_eq!(ParserState::Closed, parser.state());
}

#[test]
fn reload_swaps_configuration() {
    let parser = parser_with("-f tree");
    assert_eq!(FormatType::Tree, parser.output_format().unwrap());

    let mut config = TEST_CONFIG.clone();
    config.output_format = FormatType::Conll;
    assert_ok!(parser.reload(config));
    assert_eq!(FormatType::Conll, parser.output_format().unwrap());
    assert_eq!(ParserState::Ready, parser.state());

    let out = parser.parse_to_string(SENTENCE).unwrap();
    assert!(out.starts_with("1\t太郎\t"));
}

#[test]
fn failed_reload_keeps_resources() {
    let parser = parser_with("");
    let mut config = TEST_CONFIG.clone();
    config.parser_model = config.resource_dir.join("missing.model");
    assert_matches!(parser.reload(config), Err(KakariError::ResourceLoad { .. }));
    assert_eq!(ParserState::Ready, parser.state());
    assert_eq!(links(&parse(SENTENCE)), links(&parser.parse(SENTENCE).unwrap()));
}

#[test]
fn reload_after_close_fails() {
    let parser = parser_with("");
    assert_ok!(parser.close());
    assert_matches!(
        parser.reload(TEST_CONFIG.clone()),
        Err(KakariError::Lifecycle("closed"))
    );
    assert_eq!(ParserState::Closed, parser.state());
}

#[test]
fn concurrent_parses_agree() {
    let expected = parse(SENTENCE).to_string_as(FormatType::Lattice).unwrap();
    let parser = Arc::new(parser_with(""));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let parser = parser.clone();
            thread::spawn(move || {
                (0..10)
                    .map(|_| {
                        parser
                            .parse(SENTENCE)
                            .and_then(|t| t.to_string_as(FormatType::Lattice))
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        for out in handle.join().unwrap() {
            assert_eq!(expected, out.unwrap());
        }
    }
    assert_eq!(ParserState::Ready, parser.state());
}

#[test]
fn parser_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Parser>();
}
