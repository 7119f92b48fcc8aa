// SPDX-License-Identifier: AGPL-3.0-only

//! Single-molecule graph record: one feature row per atom plus a local
//! adjacency list per atom. An atom's bond degree is the length of its
//! adjacency list; degrees are never stored separately, so they cannot
//! drift out of sync with the lists.

use crate::error::DeepWellError;

/// Per-molecule input to the degree-bucketed batch encoder.
///
/// Feature rows are stored flat row-major (`n_atoms × n_feat`), adjacency
/// as one local-index list per atom. Self-indices are permitted (a lone
/// atom can still carry a nonzero degree), duplicate neighbors are
/// permitted; only out-of-range indices are rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct MolGraph {
    n_feat: usize,
    features: Vec<f64>,
    adjacency: Vec<Vec<usize>>,
}

impl MolGraph {
    /// Build a molecule graph from per-atom feature rows and adjacency
    /// lists.
    ///
    /// # Errors
    ///
    /// Returns [`DeepWellError::AtomCountMismatch`] when the two inputs
    /// disagree in length, [`DeepWellError::RaggedFeatureRow`] when a
    /// feature row deviates from `n_feat`, and
    /// [`DeepWellError::NeighborOutOfRange`] when an adjacency list names
    /// an atom the molecule does not have.
    pub fn new(
        n_feat: usize,
        features: Vec<Vec<f64>>,
        adjacency: Vec<Vec<usize>>,
    ) -> Result<Self, DeepWellError> {
        if features.len() != adjacency.len() {
            return Err(DeepWellError::AtomCountMismatch {
                feature_rows: features.len(),
                adjacency_rows: adjacency.len(),
            });
        }
        let n_atoms = adjacency.len();
        let mut flat = Vec::with_capacity(n_atoms * n_feat);
        for (atom, row) in features.iter().enumerate() {
            if row.len() != n_feat {
                return Err(DeepWellError::RaggedFeatureRow {
                    atom,
                    expected: n_feat,
                    got: row.len(),
                });
            }
            flat.extend_from_slice(row);
        }
        for (atom, nbrs) in adjacency.iter().enumerate() {
            for &neighbor in nbrs {
                if neighbor >= n_atoms {
                    return Err(DeepWellError::NeighborOutOfRange {
                        atom,
                        neighbor,
                        n_atoms,
                    });
                }
            }
        }
        Ok(Self {
            n_feat,
            features: flat,
            adjacency,
        })
    }

    /// Build from an undirected edge list; each edge adds both endpoints
    /// to each other's adjacency list. A `(k, k)` self-edge contributes
    /// degree 2 to atom `k`.
    ///
    /// # Errors
    ///
    /// Same validation as [`MolGraph::new`].
    pub fn from_edges(
        n_feat: usize,
        features: Vec<Vec<f64>>,
        edges: &[(usize, usize)],
    ) -> Result<Self, DeepWellError> {
        let n_atoms = features.len();
        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n_atoms];
        for &(i, j) in edges {
            for (atom, neighbor) in [(i, j), (j, i)] {
                if atom >= n_atoms {
                    return Err(DeepWellError::NeighborOutOfRange {
                        atom,
                        neighbor,
                        n_atoms,
                    });
                }
                adjacency[atom].push(neighbor);
            }
        }
        Self::new(n_feat, features, adjacency)
    }

    /// Number of atoms.
    #[must_use]
    pub fn n_atoms(&self) -> usize {
        self.adjacency.len()
    }

    /// Feature width per atom.
    #[must_use]
    pub fn n_feat(&self) -> usize {
        self.n_feat
    }

    /// Bond degree of a local atom.
    #[must_use]
    pub fn degree(&self, atom: usize) -> usize {
        self.adjacency[atom].len()
    }

    /// Largest degree in the molecule (0 for an atom-free molecule).
    #[must_use]
    pub fn max_degree(&self) -> usize {
        self.adjacency.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Local neighbor indices of an atom.
    #[must_use]
    pub fn neighbors(&self, atom: usize) -> &[usize] {
        &self.adjacency[atom]
    }

    /// Feature row of a local atom.
    #[must_use]
    pub fn feature_row(&self, atom: usize) -> &[f64] {
        &self.features[atom * self.n_feat..(atom + 1) * self.n_feat]
    }
}
