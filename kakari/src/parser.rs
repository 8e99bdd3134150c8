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

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use log::{debug, info};

use crate::analysis::segmenter::Segmenter;
use crate::chunk::{Chunker, Selector};
use crate::config::Config;
use crate::dep::{Algorithm, LinearModel, Resolver};
use crate::dic::Dictionary;
use crate::error::{KakariError, KakariResult};
use crate::flags::Flags;
use crate::ne::{constrain_to_chunks, EntityTagger, NeMode};
use crate::normalizer::normalize;
use crate::tree::{FormatType, Layer, ParseTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    Ready,
    /// at least one call is running
    Parsing,
    Closed,
}

/// Everything a parse needs, shared read-only between calls
struct Resources {
    config: Config,
    segmenter: Segmenter<Arc<Dictionary>>,
    chunker: Chunker,
    selector: Selector,
    resolver: Resolver<Arc<LinearModel>>,
    /// present when named entities are tagged
    ne_tagger: Option<EntityTagger>,
}

impl Resources {
    fn load(config: Config) -> KakariResult<Resources> {
        let dictionary = Arc::new(Dictionary::from_cfg(&config)?);
        let model = LinearModel::from_file(&config.parser_model)
            .map_err(|e| KakariError::resource_load(&config.parser_model, e))?;
        let algorithm: Algorithm = config.algorithm.unwrap_or_else(|| model.algorithm());
        info!(
            "loaded model {}: {} weights, {} algorithm",
            config.parser_model.display(),
            model.len(),
            algorithm
        );
        let threshold = model.threshold();
        let ne_tagger = if config.ne.is_on() {
            let tagger = EntityTagger::from_file(&config.ne_model)
                .map_err(|e| KakariError::resource_load(&config.ne_model, e))?;
            info!("loaded named entity rules {}", config.ne_model.display());
            Some(tagger)
        } else {
            None
        };

        Ok(Resources {
            segmenter: Segmenter::new(dictionary, config.max_unknown_length)
                .with_debug(config.debug),
            chunker: Chunker::from_patterns(&config.chunk_patterns)?,
            selector: Selector::new(&config.chunk_patterns)?,
            resolver: Resolver::new(Arc::new(model), algorithm, threshold),
            ne_tagger,
            config,
        })
    }

    fn read(&self, text: &str) -> KakariResult<ParseTree> {
        match self.config.input_layer {
            Layer::RawSentence => Ok(ParseTree::new(text, self.config.charset)),
            layer => ParseTree::read(text, layer, self.config.charset),
        }
    }

    /// Runs the stages between the tree layer and the output layer
    fn run(&self, mut tree: ParseTree) -> KakariResult<ParseTree> {
        let output = self.config.output_layer;
        // chunked input keeps the tags it was written with
        let tag_entities = tree.layer < Layer::Chunk;
        if tree.layer < Layer::Pos && output >= Layer::Pos {
            tree.morphemes = self.segmenter.segment(&tree.text)?;
            tree.layer = Layer::Pos;
            debug!("{} morphemes", tree.morphemes.len());
        }
        if let Some(tagger) = self.ne_tagger.as_ref().filter(|_| tag_entities) {
            tagger.tag(&mut tree.morphemes);
        }
        if tree.layer < Layer::Chunk && output >= Layer::Chunk {
            tree.chunks = self.chunker.chunk(&tree.morphemes);
            tree.layer = Layer::Chunk;
            debug!("{} chunks", tree.chunks.len());
            if tag_entities && self.config.ne == NeMode::ChunkConstraint {
                constrain_to_chunks(&mut tree.morphemes, &tree.chunks);
            }
        }
        if tree.layer < Layer::Selection && output >= Layer::Selection {
            self.selector.select(&tree.morphemes, &mut tree.chunks);
            tree.layer = Layer::Selection;
        }
        if tree.layer < Layer::Dep && output >= Layer::Dep {
            self.resolver.resolve(&mut tree.chunks)?;
            tree.layer = Layer::Dep;
        }
        if tree.layer > output {
            tree.layer = output;
            if output < Layer::Chunk {
                tree.chunks.clear();
            }
        }
        Ok(tree)
    }

    /// Output below the dependency layer is always a lattice
    fn output_format(&self) -> FormatType {
        if self.config.output_layer < Layer::Dep {
            FormatType::Lattice
        } else {
            self.config.output_format
        }
    }
}

/// Counts a running call until dropped
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> InFlight<'a> {
        counter.fetch_add(1, Ordering::SeqCst);
        InFlight(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Dependency parser facade.
///
/// Calls share the loaded resources through a read lock, so `close` and
/// `reload` wait until the calls in flight are finished.
pub struct Parser {
    resources: RwLock<Option<Arc<Resources>>>,
    in_flight: AtomicUsize,
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("state", &self.state())
            .finish()
    }
}

impl Parser {
    pub fn new(config: Config) -> KakariResult<Parser> {
        let resources = Resources::load(config)?;
        Ok(Parser {
            resources: RwLock::new(Some(Arc::new(resources))),
            in_flight: AtomicUsize::new(0),
        })
    }

    /// Creates a parser from an option string such as `-f1 -O4`
    pub fn from_flags(flags: &str) -> KakariResult<Parser> {
        Parser::new(Config::from_flags(&Flags::parse(flags)?)?)
    }

    /// Creates a parser from command line arguments, without the program name
    pub fn from_args<I, S>(args: I) -> KakariResult<Parser>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Parser::new(Config::from_flags(&Flags::from_args(args)?)?)
    }

    pub fn version() -> &'static str {
        crate::VERSION
    }

    fn with_resources<T, F>(&self, f: F) -> KakariResult<T>
    where
        F: FnOnce(&Resources) -> KakariResult<T>,
    {
        let guard = self
            .resources
            .read()
            .map_err(|_| KakariError::Lifecycle("poisoned"))?;
        let resources = guard.as_ref().ok_or(KakariError::Lifecycle("closed"))?;
        let _running = InFlight::enter(&self.in_flight);
        f(resources)
    }

    /// Parses one sentence given in the configured input layer
    pub fn parse(&self, text: &str) -> KakariResult<ParseTree> {
        self.with_resources(|r| r.run(r.read(text)?))
    }

    /// Decodes `bytes` with the configured charset, then parses them
    pub fn parse_bytes(&self, bytes: &[u8]) -> KakariResult<ParseTree> {
        self.with_resources(|r| {
            let text = normalize(bytes, r.config.charset)?;
            r.run(r.read(&text)?)
        })
    }

    /// Runs the stages `tree` has not been through yet
    pub fn parse_tree(&self, tree: ParseTree) -> KakariResult<ParseTree> {
        self.with_resources(|r| r.run(tree))
    }

    /// Parses and formats with the configured output format
    pub fn parse_to_string(&self, text: &str) -> KakariResult<String> {
        self.with_resources(|r| r.run(r.read(text)?)?.to_string_as(r.output_format()))
    }

    /// Format used by `parse_to_string`
    pub fn output_format(&self) -> KakariResult<FormatType> {
        self.with_resources(|r| Ok(r.output_format()))
    }

    pub fn config(&self) -> KakariResult<Config> {
        self.with_resources(|r| Ok(r.config.clone()))
    }

    pub fn state(&self) -> ParserState {
        match self.resources.try_read() {
            Ok(guard) if guard.is_none() => ParserState::Closed,
            Ok(_) if self.in_flight.load(Ordering::SeqCst) == 0 => ParserState::Ready,
            Ok(_) => ParserState::Parsing,
            // a writer is swapping or closing
            Err(std::sync::TryLockError::WouldBlock) => ParserState::Parsing,
            Err(std::sync::TryLockError::Poisoned(_)) => ParserState::Closed,
        }
    }

    /// Releases the dictionary and the model once running calls are done
    pub fn close(&self) -> KakariResult<()> {
        let mut guard = self
            .resources
            .write()
            .map_err(|_| KakariError::Lifecycle("poisoned"))?;
        if guard.take().is_some() {
            info!("parser closed");
        }
        Ok(())
    }

    /// Loads new resources and swaps them in once running calls are done.
    /// On error the current resources stay in use.
    pub fn reload(&self, config: Config) -> KakariResult<()> {
        let resources = Resources::load(config)?;
        let mut guard = self
            .resources
            .write()
            .map_err(|_| KakariError::Lifecycle("poisoned"))?;
        match guard.as_mut() {
            Some(current) => {
                *current = Arc::new(resources);
                info!("parser reloaded");
                Ok(())
            }
            None => Err(KakariError::Lifecycle("closed")),
        }
    }
}
