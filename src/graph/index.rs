//! Loader and in-memory index for the bibliographic relation files.
//!
//! A directory is expected to contain five tab-separated files:
//!
//! - `id_author.txt`, `id_paper.txt`, `id_conf.txt` — `<id>\t<label>` rows
//! - `paper_author.txt` — `<paper_id>\t<author_id>` rows
//! - `paper_conf.txt` — `<paper_id>\t<conf_id>` rows
//!
//! String ids are interned to dense `u32` indices per node type at load time.
//! All tables are immutable once [`GraphIndex::load`] returns.

use super::adjacency::Adjacency;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

const ID_AUTHOR_FILE: &str = "id_author.txt";
const ID_PAPER_FILE: &str = "id_paper.txt";
const ID_CONF_FILE: &str = "id_conf.txt";
const PAPER_AUTHOR_FILE: &str = "paper_author.txt";
const PAPER_CONF_FILE: &str = "paper_conf.txt";

/// Errors that can occur while loading the graph.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("failed to read {file}")]
    Io {
        file: String,
        #[source]
        source: io::Error,
    },
}

pub type GraphResult<T> = Result<T, GraphError>;

/// The three node types of the bibliographic network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Conference,
    Author,
    Paper,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Conference => write!(f, "conference"),
            NodeKind::Author => write!(f, "author"),
            NodeKind::Paper => write!(f, "paper"),
        }
    }
}

/// Interning table for one node type: raw string id → dense index, plus the
/// display label when the id file provided one.
///
/// Insertion order defines the dense index space, so repeated loads of the
/// same files produce identical tables.
#[derive(Debug, Default)]
struct NodeTable {
    entries: IndexMap<String, Option<String>, FxBuildHasher>,
}

impl NodeTable {
    /// Dense index for `id`, interning it on first sight.
    fn intern(&mut self, id: &str) -> u32 {
        let entry = self.entries.entry(id.to_string());
        let idx = entry.index() as u32;
        entry.or_insert(None);
        idx
    }

    /// Intern `id` and attach its display label (all spaces removed).
    fn insert_labeled(&mut self, id: &str, label: &str) {
        let label = label.replace(' ', "");
        let entry = self.entries.entry(id.to_string());
        *entry.or_insert(None) = Some(label);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    /// Raw source-file id of node `idx`.
    fn id(&self, idx: u32) -> &str {
        let (id, _) = self
            .entries
            .get_index(idx as usize)
            .expect("node index out of range");
        id
    }

    /// Display label of node `idx`, falling back to the raw id when the id
    /// file carried no entry for it.
    fn label(&self, idx: u32) -> &str {
        let (id, label) = self
            .entries
            .get_index(idx as usize)
            .expect("node index out of range");
        label.as_deref().unwrap_or(id)
    }

    /// Nodes interned from relation files without a label row.
    fn unlabeled(&self) -> usize {
        self.entries.values().filter(|l| l.is_none()).count()
    }
}

/// Diagnostic counters from a completed load. Informational only; the
/// sampler never consumes these.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadStats {
    pub authors: usize,
    pub papers: usize,
    pub conferences: usize,
    pub paper_author_rows: usize,
    pub paper_conf_rows: usize,
    /// Input lines dropped for not being exactly two tab-separated fields.
    pub malformed_lines: usize,
    /// Nodes named by relation rows but absent from the id files.
    pub unlabeled_nodes: usize,
    pub mean_papers_per_conf: f64,
    pub mean_authors_per_conf: f64,
}

/// Immutable in-memory graph: label tables, base relations, and the derived
/// multiplicity-preserving conference↔author lists.
///
/// `conf_authors` holds every author of every paper of a conference, one
/// entry per (paper, author) pair, so an author with N papers at a
/// conference appears N times. Uniform selection over such a row is
/// selection proportional to paper count. `author_confs` is the inverse,
/// built in lockstep.
#[derive(Debug)]
pub struct GraphIndex {
    authors: NodeTable,
    papers: NodeTable,
    conferences: NodeTable,
    /// paper → authors, in file order.
    paper_author: Adjacency,
    /// author → papers, inverse of `paper_author`.
    author_paper: Adjacency,
    /// paper → its conference; later duplicate rows overwrite earlier ones.
    paper_conf: Vec<Option<u32>>,
    /// conference → papers, one entry per `paper_conf.txt` row.
    conf_paper: Adjacency,
    /// conference → authors, multiplicity-preserving.
    conf_authors: Adjacency,
    /// author → conferences, multiplicity-preserving.
    author_confs: Adjacency,
    /// Conferences with at least one derived author edge, in first-seen
    /// `paper_conf.txt` order.
    seeds: Vec<u32>,
    stats: LoadStats,
}

impl GraphIndex {
    /// Load and index the five relation files under `dir`.
    ///
    /// Missing or unreadable files are fatal. Malformed lines are dropped
    /// and counted in [`LoadStats::malformed_lines`].
    pub fn load(dir: &Path) -> GraphResult<GraphIndex> {
        let mut authors = NodeTable::default();
        let mut papers = NodeTable::default();
        let mut conferences = NodeTable::default();
        let mut malformed = 0usize;

        malformed += read_relation(dir, ID_AUTHOR_FILE, |id, label| {
            authors.insert_labeled(id, label);
        })?;
        debug!(count = authors.len(), "loaded author labels");

        malformed += read_relation(dir, ID_PAPER_FILE, |id, label| {
            papers.insert_labeled(id, label);
        })?;
        debug!(count = papers.len(), "loaded paper labels");

        malformed += read_relation(dir, ID_CONF_FILE, |id, label| {
            conferences.insert_labeled(id, label);
        })?;
        debug!(count = conferences.len(), "loaded conference labels");

        // paper_author.txt: forward and inverse lists in one pass.
        let mut pa_lists: Vec<Vec<u32>> = Vec::new();
        let mut ap_lists: Vec<Vec<u32>> = Vec::new();
        let mut paper_author_rows = 0usize;
        malformed += read_relation(dir, PAPER_AUTHOR_FILE, |p, a| {
            let p = papers.intern(p);
            let a = authors.intern(a);
            push_edge(&mut pa_lists, p, a);
            push_edge(&mut ap_lists, a, p);
            paper_author_rows += 1;
        })?;

        // paper_conf.txt: forward map (last row wins) and inverse list (one
        // entry per row). `conf_order` records first-seen conference order,
        // which later defines seed iteration order.
        let mut paper_conf: Vec<Option<u32>> = Vec::new();
        let mut cp_lists: Vec<Vec<u32>> = Vec::new();
        let mut conf_order: Vec<u32> = Vec::new();
        let mut paper_conf_rows = 0usize;
        malformed += read_relation(dir, PAPER_CONF_FILE, |p, c| {
            let p = papers.intern(p) as usize;
            let c = conferences.intern(c);
            if paper_conf.len() <= p {
                paper_conf.resize(p + 1, None);
            }
            paper_conf[p] = Some(c);
            if cp_lists.len() <= c as usize {
                cp_lists.resize(c as usize + 1, Vec::new());
            }
            if cp_lists[c as usize].is_empty() {
                conf_order.push(c);
            }
            cp_lists[c as usize].push(p as u32);
            paper_conf_rows += 1;
        })?;

        // Relation files may have interned nodes the id files never named;
        // bring every table to its final node count.
        pa_lists.resize(papers.len(), Vec::new());
        ap_lists.resize(authors.len(), Vec::new());
        cp_lists.resize(conferences.len(), Vec::new());
        paper_conf.resize(papers.len(), None);

        // Derive the multiplicity-preserving conference↔author lists. A
        // paper with no author rows contributes nothing.
        let mut ca_lists: Vec<Vec<u32>> = vec![Vec::new(); conferences.len()];
        let mut ac_lists: Vec<Vec<u32>> = vec![Vec::new(); authors.len()];
        let mut sum_papers = 0usize;
        let mut sum_authors = 0usize;
        for &c in &conf_order {
            let conf_papers = &cp_lists[c as usize];
            sum_papers += conf_papers.len();
            for &p in conf_papers {
                for &a in &pa_lists[p as usize] {
                    ca_lists[c as usize].push(a);
                    ac_lists[a as usize].push(c);
                    sum_authors += 1;
                }
            }
        }

        let mut seeds = Vec::with_capacity(conf_order.len());
        for &c in &conf_order {
            if ca_lists[c as usize].is_empty() {
                debug!(
                    conference = conferences.id(c),
                    "no derived author edges; excluded from seed set"
                );
            } else {
                seeds.push(c);
            }
        }

        let confs_with_papers = conf_order.len();
        let stats = LoadStats {
            authors: authors.len(),
            papers: papers.len(),
            conferences: conferences.len(),
            paper_author_rows,
            paper_conf_rows,
            malformed_lines: malformed,
            unlabeled_nodes: authors.unlabeled() + papers.unlabeled() + conferences.unlabeled(),
            mean_papers_per_conf: ratio(sum_papers, confs_with_papers),
            mean_authors_per_conf: ratio(sum_authors, confs_with_papers),
        };

        info!(
            authors = stats.authors,
            papers = stats.papers,
            conferences = stats.conferences,
            seeds = seeds.len(),
            mean_papers_per_conf = stats.mean_papers_per_conf,
            mean_authors_per_conf = stats.mean_authors_per_conf,
            "graph index built"
        );
        if stats.unlabeled_nodes > 0 {
            warn!(
                count = stats.unlabeled_nodes,
                "relation rows referenced ids missing from the id files; raw ids used as labels"
            );
        }

        Ok(GraphIndex {
            authors,
            papers,
            conferences,
            paper_author: Adjacency::from_lists(pa_lists),
            author_paper: Adjacency::from_lists(ap_lists),
            paper_conf,
            conf_paper: Adjacency::from_lists(cp_lists),
            conf_authors: Adjacency::from_lists(ca_lists),
            author_confs: Adjacency::from_lists(ac_lists),
            seeds,
            stats,
        })
    }

    /// Seed conferences, in first-seen input order.
    pub fn seeds(&self) -> &[u32] {
        &self.seeds
    }

    pub fn stats(&self) -> &LoadStats {
        &self.stats
    }

    /// Authors of a conference, one entry per (paper, author) pair.
    pub fn conf_authors(&self, conf: u32) -> &[u32] {
        self.conf_authors.row(conf)
    }

    /// Conferences of an author, one entry per (paper, author) pair.
    pub fn author_confs(&self, author: u32) -> &[u32] {
        self.author_confs.row(author)
    }

    pub fn conf_papers(&self, conf: u32) -> &[u32] {
        self.conf_paper.row(conf)
    }

    pub fn paper_authors(&self, paper: u32) -> &[u32] {
        self.paper_author.row(paper)
    }

    pub fn author_papers(&self, author: u32) -> &[u32] {
        self.author_paper.row(author)
    }

    /// The conference a paper was published at, if any row named one.
    pub fn paper_conf(&self, paper: u32) -> Option<u32> {
        self.paper_conf[paper as usize]
    }

    pub fn conf_label(&self, conf: u32) -> &str {
        self.conferences.label(conf)
    }

    pub fn author_label(&self, author: u32) -> &str {
        self.authors.label(author)
    }

    pub fn paper_label(&self, paper: u32) -> &str {
        self.papers.label(paper)
    }

    /// Raw source-file id of a node, for diagnostics.
    pub fn node_id(&self, kind: NodeKind, idx: u32) -> &str {
        match kind {
            NodeKind::Conference => self.conferences.id(idx),
            NodeKind::Author => self.authors.id(idx),
            NodeKind::Paper => self.papers.id(idx),
        }
    }
}

fn ratio(sum: usize, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

/// Append `target` to the list of `source`, growing the table as needed.
fn push_edge(lists: &mut Vec<Vec<u32>>, source: u32, target: u32) {
    let source = source as usize;
    if lists.len() <= source {
        lists.resize(source + 1, Vec::new());
    }
    lists[source].push(target);
}

/// Stream `dir/name` line by line, invoking `f` for every well-formed
/// two-field row. Returns the number of dropped malformed lines.
fn read_relation<F>(dir: &Path, name: &str, mut f: F) -> GraphResult<usize>
where
    F: FnMut(&str, &str),
{
    let path = dir.join(name);
    let file = File::open(&path).map_err(|source| GraphError::Io {
        file: path.display().to_string(),
        source,
    })?;
    let reader = BufReader::new(file);

    let mut skipped = 0usize;
    for line in reader.lines() {
        let line = line.map_err(|source| GraphError::Io {
            file: path.display().to_string(),
            source,
        })?;
        let line = line.trim();
        let mut fields = line.split('\t');
        match (fields.next(), fields.next(), fields.next()) {
            (Some(a), Some(b), None) if !a.is_empty() => f(a, b),
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(file = %path.display(), skipped, "dropped malformed lines");
    }
    Ok(skipped)
}
