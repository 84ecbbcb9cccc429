//! The walk sampler: per-seed batches of metapath-constrained random walks.
//!
//! For every seed conference the sampler writes exactly `numwalks` lines,
//! contiguously, in the index's seed order. Every hop draws a uniform index
//! over the full candidate list, so duplicate entries weight the draw by
//! edge multiplicity.

use super::progress::ProgressObserver;
use super::scheme::Scheme;
use crate::graph::{GraphIndex, NodeKind};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::time::Instant;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during walk generation.
#[derive(Error, Debug)]
pub enum WalkError {
    /// A hop landed on a node whose candidate list for the next hop is
    /// empty, so the metapath cannot be continued.
    #[error("empty adjacency at {kind} {id}; walk cannot continue")]
    EmptyAdjacency { kind: NodeKind, id: String },

    #[error("failed to write walk output")]
    Io(#[from] io::Error),
}

/// Sampler parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkConfig {
    pub scheme: Scheme,
    /// Walks generated per seed conference.
    pub numwalks: usize,
    /// Metapath steps per walk (2 hops each for CAC, 4 for CSASC).
    pub walklength: usize,
    /// Master RNG seed; `None` draws one from the thread RNG.
    pub seed: Option<u64>,
    /// Distribute seed batches over a rayon pool. Output is identical to a
    /// sequential run with the same master seed.
    pub parallel: bool,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            scheme: Scheme::Cac,
            numwalks: 1000,
            walklength: 100,
            seed: None,
            parallel: false,
        }
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkReport {
    /// Seed conferences processed.
    pub seeds: usize,
    /// Output lines written.
    pub walks: usize,
}

/// Generates metapath walks over a built [`GraphIndex`].
pub struct WalkSampler<'g> {
    graph: &'g GraphIndex,
    config: WalkConfig,
}

impl<'g> WalkSampler<'g> {
    pub fn new(graph: &'g GraphIndex, config: WalkConfig) -> Self {
        WalkSampler { graph, config }
    }

    /// Write one line per walk to `sink`, notifying `observer` after each
    /// completed seed batch.
    ///
    /// Each seed batch samples from its own RNG stream derived from the
    /// master seed and the seed ordinal, which keeps runs reproducible and
    /// makes the parallel mode byte-identical to the sequential one.
    pub fn generate<W: Write>(
        &self,
        sink: &mut W,
        observer: &mut dyn ProgressObserver,
    ) -> Result<WalkReport, WalkError> {
        let seeds = self.graph.seeds();
        let total = seeds.len();
        let master = self.config.seed.unwrap_or_else(|| rand::thread_rng().gen());
        debug!(
            total,
            scheme = %self.config.scheme,
            numwalks = self.config.numwalks,
            walklength = self.config.walklength,
            master_seed = master,
            "starting walk generation"
        );
        let start = Instant::now();

        if self.config.parallel {
            let buffers: Result<Vec<String>, WalkError> = seeds
                .par_iter()
                .enumerate()
                .map(|(ordinal, &conf)| {
                    let mut rng = StdRng::seed_from_u64(stream_seed(master, ordinal as u64));
                    let mut buf = String::new();
                    self.walk_seed(conf, &mut rng, &mut buf)?;
                    Ok(buf)
                })
                .collect();
            for (ordinal, buf) in buffers?.iter().enumerate() {
                sink.write_all(buf.as_bytes())?;
                observer.seed_done(ordinal + 1, total, start.elapsed());
            }
        } else {
            let mut buf = String::new();
            for (ordinal, &conf) in seeds.iter().enumerate() {
                let mut rng = StdRng::seed_from_u64(stream_seed(master, ordinal as u64));
                buf.clear();
                self.walk_seed(conf, &mut rng, &mut buf)?;
                sink.write_all(buf.as_bytes())?;
                observer.seed_done(ordinal + 1, total, start.elapsed());
            }
        }

        Ok(WalkReport {
            seeds: total,
            walks: total * self.config.numwalks,
        })
    }

    /// Render all `numwalks` lines for one seed conference into `out`.
    fn walk_seed(&self, seed: u32, rng: &mut StdRng, out: &mut String) -> Result<(), WalkError> {
        for _ in 0..self.config.numwalks {
            match self.config.scheme {
                Scheme::Cac => self.cac_walk(seed, rng, out)?,
                Scheme::Csasc => self.csasc_walk(seed, rng, out)?,
            }
            out.push('\n');
        }
        Ok(())
    }

    /// One conference–author–conference walk: `walklength` 2-hop steps.
    fn cac_walk(&self, seed: u32, rng: &mut StdRng, out: &mut String) -> Result<(), WalkError> {
        out.push_str(self.graph.conf_label(seed));
        let mut conf = seed;
        for _ in 0..self.config.walklength {
            let author = self.pick(rng, self.graph.conf_authors(conf), NodeKind::Conference, conf)?;
            out.push(' ');
            out.push_str(self.graph.author_label(author));

            conf = self.pick(rng, self.graph.author_confs(author), NodeKind::Author, author)?;
            out.push(' ');
            out.push_str(self.graph.conf_label(conf));
        }
        Ok(())
    }

    /// One conference–paper–author–paper–conference walk: `walklength`
    /// 4-hop steps. The closing hop is the paper's single conference,
    /// treated as a one-element choice.
    fn csasc_walk(&self, seed: u32, rng: &mut StdRng, out: &mut String) -> Result<(), WalkError> {
        out.push_str(self.graph.conf_label(seed));
        let mut conf = seed;
        for _ in 0..self.config.walklength {
            let paper = self.pick(rng, self.graph.conf_papers(conf), NodeKind::Conference, conf)?;
            out.push(' ');
            out.push_str(self.graph.paper_label(paper));

            let author = self.pick(rng, self.graph.paper_authors(paper), NodeKind::Paper, paper)?;
            out.push(' ');
            out.push_str(self.graph.author_label(author));

            let paper = self.pick(rng, self.graph.author_papers(author), NodeKind::Author, author)?;
            out.push(' ');
            out.push_str(self.graph.paper_label(paper));

            conf = self
                .graph
                .paper_conf(paper)
                .ok_or_else(|| self.empty(NodeKind::Paper, paper))?;
            out.push(' ');
            out.push_str(self.graph.conf_label(conf));
        }
        Ok(())
    }

    /// Uniform draw over `candidates`; `kind`/`at` name the node whose
    /// adjacency is being sampled, for the empty-list error.
    fn pick(
        &self,
        rng: &mut StdRng,
        candidates: &[u32],
        kind: NodeKind,
        at: u32,
    ) -> Result<u32, WalkError> {
        candidates
            .choose(rng)
            .copied()
            .ok_or_else(|| self.empty(kind, at))
    }

    fn empty(&self, kind: NodeKind, at: u32) -> WalkError {
        WalkError::EmptyAdjacency {
            kind,
            id: self.graph.node_id(kind, at).to_string(),
        }
    }
}

/// Independent per-seed RNG stream, derived from the master seed and the
/// seed's ordinal with a splitmix stride.
fn stream_seed(master: u64, ordinal: u64) -> u64 {
    master ^ ordinal.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
