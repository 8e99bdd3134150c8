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

use std::cmp::Reverse;
use std::io::Write;

use crate::analysis::node::{Node, WordRef};
use crate::dic::connect::ConnectionMatrix;
use crate::dic::DictionaryAccess;
use crate::error::{KakariError, KakariResult};

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct NodeIdx {
    end: u32,
    index: u32,
}

impl NodeIdx {
    pub fn empty() -> NodeIdx {
        NodeIdx {
            end: u32::MAX,
            index: u32::MAX,
        }
    }

    pub fn new(end: usize, index: usize) -> NodeIdx {
        NodeIdx {
            end: end as u32,
            index: index as u32,
        }
    }

    pub fn end(&self) -> usize {
        self.end as usize
    }

    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub fn is_empty(&self) -> bool {
        self.index == u32::MAX
    }
}

/// Viterbi state of a node: best total cost from BOS and its right id
struct VNode {
    total_cost: i64,
    right_id: u16,
}

/// Lattice which is constructed for performing the Viterbi search.
/// Contain several parallel arrays.
/// First level of parallel arrays is indexed by end word boundary,
/// boundaries are byte offsets aligned to character boundaries.
///
/// The path to every node is fixed when the node is inserted,
/// so nodes must be inserted in the order of their begin offset.
#[derive(Default)]
pub struct Lattice {
    ends: Vec<Vec<VNode>>,
    ends_full: Vec<Vec<Node>>,
    indices: Vec<Vec<NodeIdx>>,
    eos: Option<(Node, NodeIdx, i64)>,
    num_known: usize,
    size: usize,
}

impl Lattice {
    fn reset_vec<T>(data: &mut Vec<Vec<T>>, target: usize) {
        for v in data.iter_mut() {
            v.clear();
        }
        if data.len() < target {
            data.resize_with(target, Vec::new);
        }
    }

    /// Prepare lattice for the analysis of a text with the
    /// specified length (in bytes)
    ///
    /// `num_known` is the size of the lexicon, used to place unknown words
    /// after dictionary words when breaking ties.
    pub fn reset(&mut self, length: usize, num_known: usize) {
        Self::reset_vec(&mut self.ends, length + 1);
        Self::reset_vec(&mut self.ends_full, length + 1);
        Self::reset_vec(&mut self.indices, length + 1);
        self.eos = None;
        self.size = length + 1;
        self.num_known = num_known;
        self.connect_bos();
    }

    fn connect_bos(&mut self) {
        self.ends[0].push(VNode {
            total_cost: 0,
            right_id: 0,
        });
        self.ends_full[0].push(Node::bos());
        self.indices[0].push(NodeIdx::empty());
    }

    /// Find EOS node -- finish the lattice construction
    pub fn connect_eos(&mut self, conn: &ConnectionMatrix) -> KakariResult<()> {
        let len = self.size - 1;
        let node = Node::eos(len);
        match self.connect_node(&node, conn) {
            Some((idx, cost)) => {
                self.eos = Some((node, idx, cost));
                Ok(())
            }
            None => Err(KakariError::Segmentation { offset: len }),
        }
    }

    /// Insert a single node in the lattice, founding the path to the previous node
    ///
    /// Returns false when no path reaches the begin of the node.
    pub fn insert(&mut self, node: Node, conn: &ConnectionMatrix) -> bool {
        let (idx, cost) = match self.connect_node(&node, conn) {
            Some(v) => v,
            None => return false,
        };
        let end_idx = node.end();
        self.ends[end_idx].push(VNode {
            total_cost: cost,
            right_id: node.right_id(),
        });
        self.indices[end_idx].push(idx);
        self.ends_full[end_idx].push(node);
        true
    }

    /// Find the path with the minimal cost through the lattice to the attached node
    ///
    /// Equal costs prefer the predecessor with the longer span,
    /// then the one earlier in dictionary entry order.
    pub fn connect_node(&self, r_node: &Node, conn: &ConnectionMatrix) -> Option<(NodeIdx, i64)> {
        let begin = r_node.begin();
        let node_cost = i64::from(r_node.cost());
        let mut best: Option<((i64, Reverse<usize>, usize), NodeIdx)> = None;

        for (i, l_node) in self.ends[begin].iter().enumerate() {
            let l_full = &self.ends_full[begin][i];
            let connect_cost = i64::from(conn.cost(l_node.right_id, r_node.left_id()));
            let new_cost = l_node.total_cost + connect_cost + node_cost;
            let key = (
                new_cost,
                Reverse(l_full.span()),
                l_full.entry_order(self.num_known),
            );
            match &best {
                Some((k, _)) if *k <= key => {}
                _ => best = Some((key, NodeIdx::new(begin, i))),
            }
        }

        best.map(|((cost, _, _), idx)| (idx, cost))
    }

    /// Checks if there exist at least one at the word end boundary
    pub fn has_previous_node(&self, i: usize) -> bool {
        self.ends.get(i).map(|d| !d.is_empty()).unwrap_or(false)
    }

    /// Total cost of the best path, None before `connect_eos`
    pub fn best_cost(&self) -> Option<i64> {
        self.eos.as_ref().map(|(_, _, c)| *c)
    }

    /// Nodes of the path with the minimum cost in text order, BOS and EOS excluded
    pub fn best_path(&self) -> Vec<&Node> {
        let mut result = Vec::new();
        let mut idx = match &self.eos {
            Some((_, idx, _)) => *idx,
            None => return result,
        };
        while !idx.is_empty() && idx.end() != 0 {
            result.push(&self.ends_full[idx.end()][idx.index()]);
            idx = self.indices[idx.end()][idx.index()];
        }
        result.reverse();
        result
    }
}

impl Lattice {
    /// Writes one line per node, latest boundary first:
    /// `index: begin end surface word pos left right cost: connection costs`
    pub fn dump<D: DictionaryAccess, W: Write>(
        &self,
        text: &str,
        dict: &D,
        out: &mut W,
    ) -> KakariResult<()> {
        let conn = dict.connection();
        let mut dump_idx = 0;

        for boundary in (0..self.size).rev() {
            for r_node in self.ends_full[boundary].iter() {
                let (surface, pos) = match r_node.word() {
                    WordRef::Bos | WordRef::Eos => ("(null)", "BOS/EOS".to_owned()),
                    WordRef::Known(id) => (
                        &text[r_node.begin()..r_node.end()],
                        dict.lexicon().entry(id).feature_string(),
                    ),
                    WordRef::Unknown(id) => (
                        &text[r_node.begin()..r_node.end()],
                        dict.unknown().entry(id).feature_string(),
                    ),
                };

                write!(
                    out,
                    "{}: {} {} {}{} {} {} {} {}:",
                    dump_idx,
                    r_node.begin(),
                    r_node.end(),
                    surface,
                    r_node.word(),
                    pos,
                    r_node.left_id(),
                    r_node.right_id(),
                    r_node.cost()
                )?;

                if r_node.word() != WordRef::Bos {
                    for l_node in &self.ends[r_node.begin()] {
                        let connect_cost = conn.cost(l_node.right_id, r_node.left_id());
                        write!(out, " {}", connect_cost)?;
                    }
                }

                writeln!(out)?;
                dump_idx += 1;
            }
        }
        Ok(())
    }
}
