// SPDX-License-Identifier: AGPL-3.0-only

//! Coulomb-matrix batch encoding for deep tensor neural networks.
//!
//! Input molecules arrive as Coulomb matrices in the Rupp convention
//! (Rupp et al., PRL 108, 058301 (2012)): diagonal entries 0.5 Z^2.4,
//! off-diagonal entries Z_i Z_j / d_ij with d_ij in bohr. The encoder
//! recovers integer atomic numbers from the diagonal, reconstructs pair
//! distances from the off-diagonal entries, and expands each distance on
//! a uniform Gaussian basis (Schütt et al., Nat. Commun. 8, 13890
//! (2017), DOI 10.1038/ncomms13890).
//!
//! Zero and negative off-diagonal entries are a defined signal, not an
//! error: they mark absent interactions (padding, masked pairs) and
//! produce an all-zero expansion with a zero mask entry.

use crate::constants::{
    COULOMB_DIAG_EXPONENT, COULOMB_DIAG_PREFACTOR, DEFAULT_DISTANCE_MAX, DEFAULT_DISTANCE_MIN,
    DEFAULT_N_DISTANCE,
};
use crate::error::DeepWellError;
use crate::feed::{ArrayF64, ArrayI32, FeedMap, Tensor, TensorSpec};
use crate::graph::expand::gauss_expand;

// ═══════════════════════════════════════════════════════════════════
// Coulomb matrices
// ═══════════════════════════════════════════════════════════════════

/// Square Coulomb matrix, flat row-major storage.
#[derive(Debug, Clone, PartialEq)]
pub struct CoulombMatrix {
    size: usize,
    data: Vec<f64>,
}

impl CoulombMatrix {
    /// Build from nested rows, enforcing squareness.
    ///
    /// # Errors
    ///
    /// [`DeepWellError::NonSquareMatrix`] when any row's length differs
    /// from the row count.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, DeepWellError> {
        let size = rows.len();
        let mut data = Vec::with_capacity(size * size);
        for row in &rows {
            if row.len() != size {
                return Err(DeepWellError::NonSquareMatrix {
                    rows: size,
                    cols: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self { size, data })
    }

    /// Side length.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Entry at (row, col).
    #[must_use]
    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.size + col]
    }

    /// Flat row-major view.
    #[must_use]
    pub fn data(&self) -> &[f64] {
        &self.data
    }
}

/// Recover the integer atomic number encoded in a Coulomb diagonal
/// entry: Z = round((c / 0.5)^(1/2.4)). Non-positive entries recover
/// Z = 0 (a padded or absent atom), never an error.
///
/// The 2.4 exponent is the Rupp parametrization and has no closed-form
/// inverse in integers, hence round-to-nearest.
#[must_use]
pub fn atomic_number_from_diagonal(c: f64) -> i32 {
    if c <= 0.0 {
        return 0;
    }
    #[allow(clippy::cast_possible_truncation)]
    let z = (c / COULOMB_DIAG_PREFACTOR)
        .powf(1.0 / COULOMB_DIAG_EXPONENT)
        .round() as i32;
    z
}

// ═══════════════════════════════════════════════════════════════════
// Batch encoder
// ═══════════════════════════════════════════════════════════════════

/// Coulomb-matrix batch encoder for DTNN-style models.
///
/// Pads every molecule to `max_n_atoms` and emits, per batch: recovered
/// atomic numbers, a real-atom mask, a 4-D tensor of Gaussian-expanded
/// pair distances, and a pair-interaction mask. Every encode call is
/// pure and re-entrant.
#[derive(Debug, Clone)]
pub struct DtnnTopology {
    max_n_atoms: usize,
    n_distance: usize,
    distance_min: f64,
    distance_max: f64,
    name: String,
}

impl DtnnTopology {
    /// Encoder with the reference distance basis (100 bins on
    /// [-1, 18] bohr) and the instance name `dtnn`.
    #[must_use]
    pub fn new(max_n_atoms: usize) -> Self {
        Self {
            max_n_atoms,
            n_distance: DEFAULT_N_DISTANCE,
            distance_min: DEFAULT_DISTANCE_MIN,
            distance_max: DEFAULT_DISTANCE_MAX,
            name: "dtnn".to_string(),
        }
    }

    /// Override the Gaussian distance basis.
    #[must_use]
    pub fn with_distance_bins(
        mut self,
        n_distance: usize,
        distance_min: f64,
        distance_max: f64,
    ) -> Self {
        self.n_distance = n_distance;
        self.distance_min = distance_min;
        self.distance_max = distance_max;
        self
    }

    /// Override the instance name that namespaces all slot identifiers.
    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Padded atom count.
    #[must_use]
    pub fn max_n_atoms(&self) -> usize {
        self.max_n_atoms
    }

    /// Number of Gaussian bins.
    #[must_use]
    pub fn n_distance(&self) -> usize {
        self.n_distance
    }

    /// Lower edge of the distance basis.
    #[must_use]
    pub fn distance_min(&self) -> f64 {
        self.distance_min
    }

    /// Upper edge of the distance basis.
    #[must_use]
    pub fn distance_max(&self) -> f64 {
        self.distance_max
    }

    /// Instance name (slot namespace).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn slot(&self, suffix: &str) -> String {
        format!("{}/{}", self.name, suffix)
    }

    /// Declared tensor slots, in emission order. The batch dim is open.
    #[must_use]
    pub fn slots(&self) -> Vec<TensorSpec> {
        let n = self.max_n_atoms;
        vec![
            TensorSpec::i32(self.slot("atom_number"), vec![None, Some(n)]),
            TensorSpec::f64(self.slot("atom_mask"), vec![None, Some(n)]),
            TensorSpec::f64(
                self.slot("distance_matrix"),
                vec![None, Some(n), Some(n), Some(self.n_distance)],
            ),
            TensorSpec::f64(self.slot("distance_matrix_mask"), vec![None, Some(n), Some(n)]),
        ]
    }

    /// Encode a minibatch of Coulomb matrices into its feed map.
    ///
    /// Emits, in order: `atom_number` (i32, batch × max_n_atoms, zero
    /// for padded slots), `atom_mask` (f64, same shape, 1 where the
    /// recovered atomic number is nonzero), `distance_matrix` (f64,
    /// batch × max_n_atoms × max_n_atoms × n_distance, the Gaussian
    /// expansion of Z_i Z_j / v for every off-diagonal entry v > 0),
    /// and `distance_matrix_mask` (f64, batch × max_n_atoms ×
    /// max_n_atoms, 1 for expanded pairs). Diagonal entries and pairs
    /// with v <= 0 keep an all-zero expansion and a zero mask entry.
    ///
    /// # Errors
    ///
    /// Fails fast before any tensor is built:
    /// [`DeepWellError::EmptyBatch`] for an empty batch,
    /// [`DeepWellError::InvalidDistanceBins`] for a zero-bin basis,
    /// [`DeepWellError::InvalidDistanceRange`] for an empty or inverted
    /// basis range, and [`DeepWellError::MatrixTooLarge`] when a matrix
    /// exceeds `max_n_atoms`.
    pub fn batch_to_feed(&self, batch: &[CoulombMatrix]) -> Result<FeedMap, DeepWellError> {
        if batch.is_empty() {
            return Err(DeepWellError::EmptyBatch);
        }
        if self.n_distance == 0 {
            return Err(DeepWellError::InvalidDistanceBins);
        }
        if self.distance_max <= self.distance_min {
            return Err(DeepWellError::InvalidDistanceRange {
                distance_min: self.distance_min,
                distance_max: self.distance_max,
            });
        }
        for (molecule, matrix) in batch.iter().enumerate() {
            if matrix.size() > self.max_n_atoms {
                return Err(DeepWellError::MatrixTooLarge {
                    molecule,
                    size: matrix.size(),
                    max_n_atoms: self.max_n_atoms,
                });
            }
        }

        let n = self.max_n_atoms;
        let nd = self.n_distance;
        let mut atom_number = ArrayI32::zeros(&[batch.len(), n]);
        let mut atom_mask = ArrayF64::zeros(&[batch.len(), n]);
        let mut distance_matrix = ArrayF64::zeros(&[batch.len(), n, n, nd]);
        let mut distance_mask = ArrayF64::zeros(&[batch.len(), n, n]);

        for (b, matrix) in batch.iter().enumerate() {
            let size = matrix.size();
            let mut numbers = vec![0i32; size];
            for (i, z) in numbers.iter_mut().enumerate() {
                *z = atomic_number_from_diagonal(matrix.at(i, i));
                atom_number.data_mut()[b * n + i] = *z;
                if *z != 0 {
                    atom_mask.data_mut()[b * n + i] = 1.0;
                }
            }
            for i in 0..size {
                for j in 0..size {
                    let v = matrix.at(i, j);
                    if i == j || v <= 0.0 {
                        continue;
                    }
                    let distance = f64::from(numbers[i] * numbers[j]) / v;
                    let expanded =
                        gauss_expand(distance, nd, self.distance_min, self.distance_max);
                    let base = ((b * n + i) * n + j) * nd;
                    distance_matrix.data_mut()[base..base + nd].copy_from_slice(&expanded);
                    distance_mask.data_mut()[(b * n + i) * n + j] = 1.0;
                }
            }
        }

        let mut feed = FeedMap::new();
        feed.insert(self.slot("atom_number"), Tensor::I32(atom_number));
        feed.insert(self.slot("atom_mask"), Tensor::F64(atom_mask));
        feed.insert(self.slot("distance_matrix"), Tensor::F64(distance_matrix));
        feed.insert(self.slot("distance_matrix_mask"), Tensor::F64(distance_mask));
        Ok(feed)
    }
}
