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

use std::fmt::{Display, Formatter, Write};
use std::str::FromStr;

use itertools::Itertools;

use crate::analysis::morpheme::Morpheme;
use crate::error::{KakariError, KakariResult};
use crate::ne::EntityTag;
use crate::tree::{Layer, ParseTree};

/// Output format of a parse tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatType {
    /// chunks as an indented dependency diagram
    Tree = 0,
    /// one morpheme per line, chunk headers starting with `*`
    Lattice = 1,
    TreeLattice = 2,
    Xml = 3,
    Conll = 4,
    None = 5,
}

impl FormatType {
    pub const ALL: [FormatType; 6] = [
        FormatType::Tree,
        FormatType::Lattice,
        FormatType::TreeLattice,
        FormatType::Xml,
        FormatType::Conll,
        FormatType::None,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<FormatType> {
        Self::ALL.get(id as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            FormatType::Tree => "tree",
            FormatType::Lattice => "lattice",
            FormatType::TreeLattice => "tree-lattice",
            FormatType::Xml => "xml",
            FormatType::Conll => "conll",
            FormatType::None => "none",
        }
    }
}

impl Default for FormatType {
    fn default() -> Self {
        FormatType::Tree
    }
}

impl FromStr for FormatType {
    type Err = KakariError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        let format = match value.parse::<u8>() {
            Ok(id) => FormatType::from_id(id),
            Err(_) => {
                let name = value.to_ascii_lowercase().replace('_', "-");
                FormatType::ALL.iter().copied().find(|f| f.name() == name)
            }
        };
        format.ok_or_else(|| {
            KakariError::configuration("output-format", format!("unknown format `{}`", value))
        })
    }
}

impl Display for FormatType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Renders `tree`. Trees without chunks are written as a lattice
/// when a chunk based format is requested.
pub fn format(tree: &ParseTree, format: FormatType) -> KakariResult<String> {
    let mut out = String::new();
    let chunked = tree.layer() >= Layer::Chunk;
    match format {
        FormatType::Tree if chunked => write_tree(tree, &mut out)?,
        FormatType::TreeLattice if chunked => {
            write_tree(tree, &mut out)?;
            write_lattice(tree, &mut out)?;
        }
        FormatType::Tree | FormatType::TreeLattice | FormatType::Lattice => {
            write_lattice(tree, &mut out)?
        }
        FormatType::Xml => write_xml(tree, &mut out)?,
        FormatType::Conll => write_conll(tree, &mut out)?,
        FormatType::None => {}
    }
    Ok(out)
}

/// Display width, ASCII takes one column and everything else two
fn display_width(s: &str) -> usize {
    s.chars().map(|c| if c.is_ascii() { 1 } else { 2 }).sum()
}

fn link_id(link: Option<usize>) -> i64 {
    link.map_or(-1, |l| l as i64)
}

/// Chunk surfaces with named entities wrapped in `<TYPE>` and `</TYPE>`,
/// an entity running over a boundary is closed in the chunk where it ends
fn entity_surfaces(tree: &ParseTree) -> Vec<String> {
    let mut open: Option<&str> = None;
    let mut surfaces = Vec::with_capacity(tree.chunks().len());
    for i in 0..tree.chunks().len() {
        let mut surface = String::new();
        for m in tree.chunk_morphemes(i) {
            let continues = matches!(m.ne(), Some(EntityTag::Inside(_)));
            if let Some(kind) = open.filter(|_| !continues) {
                surface.push_str(&format!("</{}>", kind));
                open = None;
            }
            if let Some(EntityTag::Begin(kind)) = m.ne() {
                open = Some(kind.as_str());
                surface.push_str(&format!("<{}>", kind));
            }
            surface.push_str(m.surface());
        }
        surfaces.push(surface);
    }
    if let (Some(kind), Some(last)) = (open, surfaces.last_mut()) {
        last.push_str(&format!("</{}>", kind));
    }
    surfaces
}

fn write_tree<W: Write>(tree: &ParseTree, out: &mut W) -> KakariResult<()> {
    let size = tree.chunks().len();
    let tagged;
    let surfaces: Vec<&str> = if tree.morphemes().iter().any(|m| m.ne().is_some()) {
        tagged = entity_surfaces(tree);
        tagged.iter().map(|s| s.as_str()).collect()
    } else {
        (0..size).map(|i| tree.chunk_surface(i)).collect()
    };
    let max_len = surfaces.iter().map(|s| display_width(s)).max().unwrap_or(0);

    let mut covered = vec![false; size];
    for (i, surface) in surfaces.iter().enumerate() {
        let link = tree.chunks()[i].link;
        let pad = max_len - display_width(surface) + i * 2;
        write!(out, "{:pad$}{}", "", surface, pad = pad)?;
        let mut linked = false;
        for j in i + 1..size {
            if link == Some(j) {
                out.write_str("-D")?;
                linked = true;
                covered[j] = true;
            } else if covered[j] {
                out.write_str(" |")?;
            } else if linked {
                out.write_str("  ")?;
            } else {
                out.write_str("--")?;
            }
        }
        out.write_char('\n')?;
    }
    out.write_str("EOS\n")?;
    Ok(())
}

/// Comma joined, fields with separators or quotes are quoted
fn csv_features(features: &[String]) -> KakariResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(features)?;
    let bytes = writer
        .into_inner()
        .map_err(|e| KakariError::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes)
        .trim_end_matches('\n')
        .to_owned())
}

fn write_lattice<W: Write>(tree: &ParseTree, out: &mut W) -> KakariResult<()> {
    let layer = tree.layer();
    if layer == Layer::RawSentence {
        writeln!(out, "{}", tree.text())?;
        return Ok(());
    }

    let write_tokens = |out: &mut W, ms: &[Morpheme]| {
        for m in ms {
            write!(out, "{}\t{}", m.surface(), m.feature())?;
            if let Some(ne) = m.ne() {
                write!(out, "\t{}", ne)?;
            }
            out.write_char('\n')?;
        }
        Ok::<(), std::fmt::Error>(())
    };

    if layer == Layer::Pos {
        write_tokens(out, tree.morphemes())?;
    } else {
        for (i, chunk) in tree.chunks().iter().enumerate() {
            write!(out, "* {} {}D", i, link_id(chunk.link))?;
            match layer {
                Layer::Selection => {
                    write!(out, " {}/{} {:.6}", chunk.head, chunk.func, chunk.score)?;
                    if !chunk.features.is_empty() {
                        write!(out, " {}", csv_features(&chunk.features)?)?;
                    }
                }
                Layer::Dep => {
                    write!(out, " {}/{} {:.6}", chunk.head, chunk.func, chunk.score)?;
                }
                _ => {}
            }
            out.write_char('\n')?;
            write_tokens(out, tree.chunk_morphemes(i))?;
        }
    }
    out.write_str("EOS\n")?;
    Ok(())
}

fn xml_escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn write_xml<W: Write>(tree: &ParseTree, out: &mut W) -> KakariResult<()> {
    let write_token = |out: &mut W, id: usize, m: &Morpheme| {
        write!(out, "  <tok id=\"{}\" feature=\"{}\"", id, xml_escape(&m.feature()))?;
        if let Some(ne) = m.ne() {
            write!(out, " ne=\"{}\"", xml_escape(&ne.to_string()))?;
        }
        writeln!(out, ">{}</tok>", xml_escape(m.surface()))
    };

    out.write_str("<sentence>\n")?;
    if tree.layer() < Layer::Chunk {
        for (id, m) in tree.morphemes().iter().enumerate() {
            write_token(out, id, m)?;
        }
    } else {
        for (ci, chunk) in tree.chunks().iter().enumerate() {
            write!(
                out,
                " <chunk id=\"{}\" link=\"{}\" rel=\"D\" score=\"{:.6}\" head=\"{}\" func=\"{}\"",
                ci,
                link_id(chunk.link),
                chunk.score,
                chunk.begin + chunk.head,
                chunk.begin + chunk.func
            )?;
            if tree.layer() == Layer::Selection && !chunk.features.is_empty() {
                write!(
                    out,
                    " feature=\"{}\"",
                    xml_escape(&csv_features(&chunk.features)?)
                )?;
            }
            out.write_str(">\n")?;
            for id in chunk.range() {
                write_token(out, id, &tree.morphemes()[id])?;
            }
            out.write_str(" </chunk>\n")?;
        }
    }
    out.write_str("</sentence>\n")?;
    Ok(())
}

fn or_underscore(s: &str) -> &str {
    if s.is_empty() {
        "_"
    } else {
        s
    }
}

fn write_conll<W: Write>(tree: &ParseTree, out: &mut W) -> KakariResult<()> {
    let chunked = tree.layer() >= Layer::Chunk && !tree.chunks().is_empty();
    let dep = tree.layer() >= Layer::Dep;
    let mut chunk_of = vec![0; tree.morphemes().len()];
    for (ci, chunk) in tree.chunks().iter().enumerate() {
        for id in chunk.range() {
            chunk_of[id] = ci;
        }
    }

    for (id, m) in tree.morphemes().iter().enumerate() {
        let pos = m.pos_levels().join("-");
        let ne = m.ne().map(|t| format!("NE={}", t)).unwrap_or_default();
        let feats = [m.conjugation_type(), m.conjugation_form(), ne.as_str()]
            .iter()
            .filter(|s| !s.is_empty())
            .join("|");

        let (head, deprel) = if chunked {
            let chunk = &tree.chunks()[chunk_of[id]];
            let head_id = chunk.begin + chunk.head;
            if id != head_id {
                ((head_id + 1).to_string(), "I")
            } else if !dep {
                ("_".to_owned(), "_")
            } else {
                match chunk.link {
                    Some(t) => {
                        let target = &tree.chunks()[t];
                        ((target.begin + target.head + 1).to_string(), "D")
                    }
                    None => ("0".to_owned(), "ROOT"),
                }
            }
        } else {
            ("_".to_owned(), "_")
        };

        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t_\t_",
            id + 1,
            m.surface(),
            m.base_form(),
            or_underscore(m.pos(0)),
            or_underscore(&pos),
            or_underscore(&feats),
            head,
            deprel
        )?;
    }
    out.write_char('\n')?;
    Ok(())
}
