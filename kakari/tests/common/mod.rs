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

#![allow(dead_code)]

use kakari::config::Config;
use kakari::prelude::*;

pub const SENTENCE: &str = "太郎は二郎にこの本を渡した.";

lazy_static! {
    pub static ref TEST_CONFIG: Config =
        Config::new(None, None).expect("Failed to read config file for test");
    pub static ref PARSER: Parser =
        Parser::new(TEST_CONFIG.clone()).expect("Failed to create Parser for tests");
}

/// Parses with the shared default parser
pub fn parse(text: &str) -> ParseTree {
    PARSER.parse(text).expect("Failed to parse")
}

/// Parser on the default resources with some options changed
pub fn parser_with(flags: &str) -> Parser {
    Parser::from_flags(flags).expect("Failed to create Parser from flags")
}

pub fn links(tree: &ParseTree) -> Vec<Option<usize>> {
    tree.chunks().iter().map(|c| c.link).collect()
}

pub fn surfaces(tree: &ParseTree) -> Vec<&str> {
    tree.morphemes().iter().map(|m| m.surface()).collect()
}
