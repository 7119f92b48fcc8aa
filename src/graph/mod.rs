// SPDX-License-Identifier: AGPL-3.0-only

//! Graph featurization: degree-bucketed topology encoding for
//! graph-convolution models and Coulomb-matrix encoding for DTNN models.
//!
//! The degree-bucketed encoder merges a minibatch of molecules into one
//! disconnected graph and emits fixed-name tensors for the downstream
//! network. Graph-convolution layers gather neighbor features with one
//! uniform-shape lookup per degree, which dictates the merged atom
//! ordering: degree-major (all atoms of degree `min_deg` first, then
//! `min_deg+1`, and so on), batch order then local atom order within one
//! degree bucket. The degree-slice table then partitions the merged index
//! range into contiguous `(offset, count)` slices, one per degree.
//!
//! The bucket build is the classic three-pass scheme: count per bucket,
//! exclusive prefix scan to bucket offsets, scatter atoms to merged rows
//! while recording the (molecule, local atom) → merged index table used
//! to translate neighbor lists.

pub mod dtnn;
pub mod expand;
pub mod mol;

pub use dtnn::{atomic_number_from_diagonal, CoulombMatrix, DtnnTopology};
pub use expand::{gauss_centers, gauss_expand};
pub use mol::MolGraph;

use crate::constants::{DEFAULT_MAX_DEG, DEFAULT_MIN_DEG};
use crate::error::DeepWellError;
use crate::feed::{ArrayF64, ArrayI32, FeedMap, Tensor, TensorSpec};

/// Degree-bucketed graph topology batch encoder.
///
/// Configured once (feature width, degree range, instance name) and then
/// applied to any number of minibatches. Every encode call is pure and
/// re-entrant: fresh output tensors, no caching, deterministic for a
/// given molecule ordering.
#[derive(Debug, Clone)]
pub struct GraphTopology {
    n_feat: usize,
    min_deg: usize,
    max_deg: usize,
    name: String,
}

impl GraphTopology {
    /// Encoder with the reference degree range and the instance name
    /// `topology`.
    #[must_use]
    pub fn new(n_feat: usize) -> Self {
        Self {
            n_feat,
            min_deg: DEFAULT_MIN_DEG,
            max_deg: DEFAULT_MAX_DEG,
            name: "topology".to_string(),
        }
    }

    /// Override the degree range `[min_deg, max_deg]`.
    #[must_use]
    pub fn with_degree_range(mut self, min_deg: usize, max_deg: usize) -> Self {
        self.min_deg = min_deg;
        self.max_deg = max_deg;
        self
    }

    /// Override the instance name that namespaces all slot identifiers.
    /// Two encoder instances with different names never collide in a
    /// merged feed map.
    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Feature width per atom.
    #[must_use]
    pub fn n_feat(&self) -> usize {
        self.n_feat
    }

    /// Lower edge of the degree range.
    #[must_use]
    pub fn min_deg(&self) -> usize {
        self.min_deg
    }

    /// Upper edge of the degree range.
    #[must_use]
    pub fn max_deg(&self) -> usize {
        self.max_deg
    }

    /// Instance name (slot namespace).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn slot(&self, suffix: &str) -> String {
        format!("{}/{}", self.name, suffix)
    }

    /// Declared tensor slots, in emission order. Batch-dependent dims are
    /// open (`None`): total atom count and per-bucket row counts are only
    /// known at encode time.
    #[must_use]
    pub fn slots(&self) -> Vec<TensorSpec> {
        let n_buckets = self.max_deg - self.min_deg + 1;
        let mut specs = Vec::with_capacity(self.max_deg + 3);
        specs.push(TensorSpec::f64(
            self.slot("atom_features"),
            vec![None, Some(self.n_feat)],
        ));
        for deg in 1..=self.max_deg {
            specs.push(TensorSpec::i32(
                self.slot(&format!("deg_adj_{deg}")),
                vec![None, Some(deg)],
            ));
        }
        specs.push(TensorSpec::i32(
            self.slot("deg_slice"),
            vec![Some(n_buckets), Some(2)],
        ));
        specs.push(TensorSpec::i32(self.slot("membership"), vec![None]));
        specs
    }

    /// Encode a minibatch into its feed map.
    ///
    /// Emits, in order: `atom_features` (f64, total_atoms × n_feat),
    /// `deg_adj_<d>` for every `d` in `[1, max_deg]` (i32, count_d × d,
    /// merged-space neighbor indices; empty buckets give 0-row tensors),
    /// `deg_slice` (i32, buckets × 2 of offset/count), and `membership`
    /// (i32, total_atoms, merged atom → batch position of its source
    /// molecule).
    ///
    /// # Errors
    ///
    /// Fails fast before any tensor is built:
    /// [`DeepWellError::EmptyBatch`] for an empty batch,
    /// [`DeepWellError::FeatureWidthMismatch`] when a molecule's feature
    /// width disagrees with the encoder, and
    /// [`DeepWellError::DegreeOverflow`] / [`DeepWellError::DegreeUnderflow`]
    /// when an atom's degree leaves `[min_deg, max_deg]` (reject, never
    /// clamp: a clamped degree would silently corrupt adjacency shapes).
    pub fn batch_to_feed(&self, batch: &[MolGraph]) -> Result<FeedMap, DeepWellError> {
        if batch.is_empty() {
            return Err(DeepWellError::EmptyBatch);
        }
        for (molecule, mol) in batch.iter().enumerate() {
            if mol.n_feat() != self.n_feat {
                return Err(DeepWellError::FeatureWidthMismatch {
                    molecule,
                    expected: self.n_feat,
                    got: mol.n_feat(),
                });
            }
            for atom in 0..mol.n_atoms() {
                let degree = mol.degree(atom);
                if degree > self.max_deg {
                    return Err(DeepWellError::DegreeOverflow {
                        molecule,
                        atom,
                        degree,
                        max_deg: self.max_deg,
                    });
                }
                if degree < self.min_deg {
                    return Err(DeepWellError::DegreeUnderflow {
                        molecule,
                        atom,
                        degree,
                        min_deg: self.min_deg,
                    });
                }
            }
        }

        let total_atoms: usize = batch.iter().map(MolGraph::n_atoms).sum();
        let n_buckets = self.max_deg - self.min_deg + 1;

        // Pass 1: count atoms per degree bucket across the whole batch.
        let mut count = vec![0usize; n_buckets];
        for mol in batch {
            for atom in 0..mol.n_atoms() {
                count[mol.degree(atom) - self.min_deg] += 1;
            }
        }

        // Pass 2: exclusive prefix scan gives each bucket's merged offset.
        let mut start = vec![0usize; n_buckets];
        let mut offset = 0;
        for (b, &c) in count.iter().enumerate() {
            start[b] = offset;
            offset += c;
        }

        // Pass 3: scatter atoms to merged rows (batch order within each
        // bucket), recording the local → merged index table.
        let mut cursor = start.clone();
        let mut merged_index: Vec<Vec<usize>> = Vec::with_capacity(batch.len());
        let mut membership = vec![0i32; total_atoms];
        let mut atom_features = ArrayF64::zeros(&[total_atoms, self.n_feat]);
        for (molecule, mol) in batch.iter().enumerate() {
            let mut rows = Vec::with_capacity(mol.n_atoms());
            for atom in 0..mol.n_atoms() {
                let b = mol.degree(atom) - self.min_deg;
                let row = cursor[b];
                cursor[b] += 1;
                rows.push(row);
                membership[row] = molecule as i32;
                atom_features.data_mut()[row * self.n_feat..(row + 1) * self.n_feat]
                    .copy_from_slice(mol.feature_row(atom));
            }
            merged_index.push(rows);
        }

        // Pass 4: adjacency matrices, one per degree ≥ 1. Iterating in the
        // same (molecule, atom) order as the scatter keeps matrix rows in
        // merged-index order within each bucket.
        let mut deg_adj: Vec<ArrayI32> = (1..=self.max_deg)
            .map(|deg| {
                let rows = if deg >= self.min_deg {
                    count[deg - self.min_deg]
                } else {
                    0
                };
                ArrayI32::zeros(&[rows, deg])
            })
            .collect();
        let mut adj_cursor = vec![0usize; self.max_deg + 1];
        for (molecule, mol) in batch.iter().enumerate() {
            for atom in 0..mol.n_atoms() {
                let deg = mol.degree(atom);
                if deg == 0 {
                    continue;
                }
                let row = adj_cursor[deg];
                adj_cursor[deg] += 1;
                let matrix = &mut deg_adj[deg - 1];
                for (k, &neighbor) in mol.neighbors(atom).iter().enumerate() {
                    matrix.data_mut()[row * deg + k] = merged_index[molecule][neighbor] as i32;
                }
            }
        }

        let mut deg_slice = ArrayI32::zeros(&[n_buckets, 2]);
        for b in 0..n_buckets {
            deg_slice.data_mut()[b * 2] = start[b] as i32;
            deg_slice.data_mut()[b * 2 + 1] = count[b] as i32;
        }

        let mut feed = FeedMap::new();
        feed.insert(self.slot("atom_features"), Tensor::F64(atom_features));
        for (i, matrix) in deg_adj.into_iter().enumerate() {
            feed.insert(self.slot(&format!("deg_adj_{}", i + 1)), Tensor::I32(matrix));
        }
        feed.insert(self.slot("deg_slice"), Tensor::I32(deg_slice));
        feed.insert(
            self.slot("membership"),
            Tensor::I32(ArrayI32::from_vec(&[total_atoms], membership)),
        );
        Ok(feed)
    }
}
