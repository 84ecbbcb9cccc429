//! Metapath-guided random walk corpus generation for heterogeneous
//! bibliographic networks.
//!
//! The crate loads a conference/author/paper graph from tab-separated
//! relation files into an immutable in-memory index, then emits random walks
//! constrained to one of two metapath schemes:
//!
//! - **CAC**: conference → author → conference
//! - **CSASC**: conference → paper → author → paper → conference
//!
//! One output line is produced per walk, space-separated node labels, the
//! first token being the seed conference's label. The resulting corpus is
//! intended as skip-gram training input for network embedding models.
//!
//! # Example
//!
//! ```no_run
//! use metawalk::{GraphIndex, NoProgress, Scheme, WalkConfig, WalkSampler};
//!
//! # fn main() -> anyhow::Result<()> {
//! let index = GraphIndex::load("net_dbis".as_ref())?;
//! let config = WalkConfig {
//!     scheme: Scheme::Cac,
//!     numwalks: 1000,
//!     walklength: 100,
//!     seed: Some(42),
//!     parallel: false,
//! };
//! let sampler = WalkSampler::new(&index, config);
//! let mut out = Vec::new();
//! sampler.generate(&mut out, &mut NoProgress)?;
//! # Ok(())
//! # }
//! ```

pub mod graph;
pub mod walk;

pub use graph::{GraphError, GraphIndex, GraphResult, LoadStats, NodeKind};
pub use walk::{
    LogProgress, NoProgress, ProgressObserver, Scheme, WalkConfig, WalkError, WalkReport,
    WalkSampler,
};

/// Crate version string.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
