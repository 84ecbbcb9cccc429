//! Compressed Sparse Row (CSR) adjacency storage.
//!
//! Relation tables are built once during the load phase and read randomly
//! (and heavily) during sampling, so neighbor lists live in one contiguous
//! arena with per-node offset ranges rather than a map of vectors.

/// A read-only one-to-many relation over dense `u32` node indices.
///
/// Row `i` holds the targets of source node `i`, in insertion order.
/// Duplicate targets are preserved; uniform selection over a row is therefore
/// weighted by edge multiplicity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Adjacency {
    /// Offsets into `targets`. Size = source count + 1.
    offsets: Vec<usize>,
    /// Contiguous array of target node indices.
    targets: Vec<u32>,
}

impl Adjacency {
    /// Flatten per-source target lists into CSR form.
    pub fn from_lists(lists: Vec<Vec<u32>>) -> Self {
        let mut offsets = Vec::with_capacity(lists.len() + 1);
        let mut targets = Vec::new();

        offsets.push(0);
        for row in lists {
            targets.extend(row);
            offsets.push(targets.len());
        }

        Adjacency { offsets, targets }
    }

    /// Number of source nodes.
    pub fn source_count(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Total number of stored edges, duplicates included.
    pub fn edge_count(&self) -> usize {
        self.targets.len()
    }

    /// Targets of source node `idx`, in insertion order.
    pub fn row(&self, idx: u32) -> &[u32] {
        let idx = idx as usize;
        let start = self.offsets[idx];
        let end = self.offsets[idx + 1];
        &self.targets[start..end]
    }

    /// Out-degree of source node `idx` (multiplicity included).
    pub fn degree(&self, idx: u32) -> usize {
        let idx = idx as usize;
        self.offsets[idx + 1] - self.offsets[idx]
    }
}
