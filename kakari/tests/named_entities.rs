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
use tempfile::tempdir;

use kakari::prelude::*;

mod common;
use common::{links, parse, parser_with, SENTENCE};

fn tags(tree: &ParseTree) -> Vec<String> {
    tree.morphemes()
        .iter()
        .map(|m| m.ne().map(|t| t.to_string()).unwrap_or_default())
        .collect()
}

#[test]
fn names_are_tagged() {
    let tree = parser_with("-n 1").parse(SENTENCE).unwrap();
    assert_eq!(
        vec!["B-PERSON", "O", "B-PERSON", "O", "O", "O", "O", "O", "O", "O"],
        tags(&tree)
    );
    assert_eq!(links(&parse(SENTENCE)), links(&tree));
}

#[test]
fn off_by_default() {
    let tree = parse(SENTENCE);
    assert!(tree.morphemes().iter().all(|m| m.ne().is_none()));
    let out = parse(SENTENCE).to_string_as(FormatType::Lattice).unwrap();
    assert!(!out.contains("\tB-PERSON"));
}

#[test]
fn entity_columns_in_outputs() {
    let out = parser_with("-n 2 -f lattice").parse_to_string(SENTENCE).unwrap();
    assert!(out.contains("太郎\t名詞,固有名詞,人名,名,*,*,太郎,タロウ,タロー\tB-PERSON\n"));
    assert!(out.contains("は\t助詞,係助詞,*,*,*,*,は,ハ,ワ\tO\n"));

    let out = parser_with("-n 2 -O 1").parse_to_string(SENTENCE).unwrap();
    assert!(out.starts_with("太郎\t名詞,固有名詞,人名,名,*,*,太郎,タロウ,タロー\tB-PERSON\n"));

    let out = parser_with("-n 1").parse_to_string(SENTENCE).unwrap();
    assert!(out.lines().next().unwrap().contains("<PERSON>太郎</PERSON>は"));

    let out = parser_with("-n 1 -f xml").parse_to_string(SENTENCE).unwrap();
    assert!(out.contains(" ne=\"B-PERSON\">二郎</tok>"));
}

#[test]
fn tagged_lattice_reads_back() {
    let lattice = parser_with("-n 1 -f lattice").parse_to_string(SENTENCE).unwrap();
    let tree = parser_with("-I 4").parse(&lattice).unwrap();
    assert_eq!(
        Some(&EntityTag::Begin("PERSON".to_owned())),
        tree.morphemes()[2].ne()
    );
    assert_eq!(lattice, tree.to_string_as(FormatType::Lattice).unwrap());
}

#[test]
fn missing_rules() {
    let dir = tempdir().unwrap();
    let rules = dir.path().join("none.model");
    assert_matches!(
        Parser::from_flags(&format!("-n 1 -N {}", rules.display())),
        Err(KakariError::ResourceLoad { ref path, .. }) if path == &rules
    );
    // rules are only read when tagging
    assert!(Parser::from_flags(&format!("-n 0 -N {}", rules.display())).is_ok());
}

#[test]
fn custom_rules() {
    let dir = tempdir().unwrap();
    let rules = dir.path().join("book.model");
    std::fs::write(&rules, "ARTIFACT\t=本\n").unwrap();
    let tree = parser_with(&format!("-n 2 -N {}", rules.display()))
        .parse(SENTENCE)
        .unwrap();
    assert_eq!(
        vec!["O", "O", "O", "O", "O", "B-ARTIFACT", "O", "O", "O", "O"],
        tags(&tree)
    );
}
