//! In-memory bibliographic graph: label tables, relation tables, and the
//! derived multiplicity-preserving conference↔author lists.

pub mod adjacency;
pub mod index;

pub use adjacency::Adjacency;
pub use index::{GraphError, GraphIndex, GraphResult, LoadStats, NodeKind};
