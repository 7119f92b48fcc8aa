// SPDX-License-Identifier: AGPL-3.0-only

//! Typed errors for deepWell batch encoding and data loading.
//!
//! Replaces `Result<_, String>` in public APIs with a proper enum so callers
//! can pattern-match on failure modes (degree overflow, ill-shaped Coulomb
//! matrix, bad bin configuration) rather than parsing opaque strings. The one
//! deliberate non-error: non-positive or diagonal pairwise Coulomb values are
//! a "no interaction" signal and are zeroed, never rejected.

use std::fmt;

/// Errors arising from batch featurization or data loading.
#[derive(Debug)]
pub enum DeepWellError {
    /// A batch encoder was handed an empty molecule batch.
    EmptyBatch,

    /// A molecule's feature rows and adjacency lists disagree in atom count.
    AtomCountMismatch {
        /// Number of feature rows supplied.
        feature_rows: usize,
        /// Number of adjacency lists supplied.
        adjacency_rows: usize,
    },

    /// One atom's feature row has the wrong width for its own molecule.
    RaggedFeatureRow {
        /// Local atom index within the molecule.
        atom: usize,
        /// Declared feature width.
        expected: usize,
        /// Width actually found.
        got: usize,
    },

    /// An adjacency list names an atom index outside the molecule.
    NeighborOutOfRange {
        /// Local atom index whose list is malformed.
        atom: usize,
        /// The offending neighbor index.
        neighbor: usize,
        /// Number of atoms in the molecule.
        n_atoms: usize,
    },

    /// An atom feature row does not match the encoder's declared width.
    FeatureWidthMismatch {
        /// Position of the molecule within the batch.
        molecule: usize,
        /// Declared feature width (`n_feat`).
        expected: usize,
        /// Width actually found.
        got: usize,
    },

    /// An atom's bond degree exceeds the encoder's `max_deg`.
    DegreeOverflow {
        /// Position of the molecule within the batch.
        molecule: usize,
        /// Local atom index within the molecule.
        atom: usize,
        /// The offending degree.
        degree: usize,
        /// The encoder's upper degree bound.
        max_deg: usize,
    },

    /// An atom's bond degree falls below the encoder's `min_deg`.
    DegreeUnderflow {
        /// Position of the molecule within the batch.
        molecule: usize,
        /// Local atom index within the molecule.
        atom: usize,
        /// The offending degree.
        degree: usize,
        /// The encoder's lower degree bound.
        min_deg: usize,
    },

    /// A Coulomb matrix was built from a non-square array.
    NonSquareMatrix {
        /// Number of rows supplied.
        rows: usize,
        /// Length of the offending row.
        cols: usize,
    },

    /// A Coulomb matrix is larger than the encoder's padded size.
    MatrixTooLarge {
        /// Position of the molecule within the batch.
        molecule: usize,
        /// Side length of the supplied matrix.
        size: usize,
        /// The encoder's padded side length.
        max_n_atoms: usize,
    },

    /// The distance expansion was configured with zero bins.
    InvalidDistanceBins,

    /// The distance expansion range is empty or inverted.
    InvalidDistanceRange {
        /// Configured lower edge.
        distance_min: f64,
        /// Configured upper edge.
        distance_max: f64,
    },

    /// Profile loss arrays (outputs, labels, volumes) disagree in length.
    ProfileLengthMismatch {
        /// Number of predicted density values.
        outputs: usize,
        /// Number of reference labels.
        labels: usize,
        /// Number of grid volume elements.
        volumes: usize,
    },

    /// Data file loading failed (path, underlying IO or parse error).
    DataLoad(String),
}

impl fmt::Display for DeepWellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBatch => write!(f, "Batch encoding requires at least one molecule"),
            Self::AtomCountMismatch {
                feature_rows,
                adjacency_rows,
            } => write!(
                f,
                "Molecule has {feature_rows} feature rows but {adjacency_rows} adjacency lists"
            ),
            Self::RaggedFeatureRow {
                atom,
                expected,
                got,
            } => write!(
                f,
                "Atom {atom}: feature row has width {got}, molecule declares {expected}"
            ),
            Self::NeighborOutOfRange {
                atom,
                neighbor,
                n_atoms,
            } => write!(
                f,
                "Atom {atom}: neighbor index {neighbor} outside molecule of {n_atoms} atoms"
            ),
            Self::FeatureWidthMismatch {
                molecule,
                expected,
                got,
            } => write!(
                f,
                "Molecule {molecule}: atom feature row has width {got}, encoder expects {expected}"
            ),
            Self::DegreeOverflow {
                molecule,
                atom,
                degree,
                max_deg,
            } => write!(
                f,
                "Molecule {molecule}, atom {atom}: degree {degree} exceeds max_deg {max_deg}"
            ),
            Self::DegreeUnderflow {
                molecule,
                atom,
                degree,
                min_deg,
            } => write!(
                f,
                "Molecule {molecule}, atom {atom}: degree {degree} below min_deg {min_deg}"
            ),
            Self::NonSquareMatrix { rows, cols } => write!(
                f,
                "Coulomb matrix must be square: got a row of length {cols} in a {rows}-row matrix"
            ),
            Self::MatrixTooLarge {
                molecule,
                size,
                max_n_atoms,
            } => write!(
                f,
                "Molecule {molecule}: Coulomb matrix size {size} exceeds max_n_atoms {max_n_atoms}"
            ),
            Self::InvalidDistanceBins => {
                write!(f, "Distance expansion requires at least one bin")
            }
            Self::InvalidDistanceRange {
                distance_min,
                distance_max,
            } => write!(
                f,
                "Distance expansion range is empty: min {distance_min} >= max {distance_max}"
            ),
            Self::ProfileLengthMismatch {
                outputs,
                labels,
                volumes,
            } => write!(
                f,
                "Profile loss arrays disagree: {outputs} outputs, {labels} labels, {volumes} volumes"
            ),
            Self::DataLoad(msg) => write!(f, "Data loading failed: {msg}"),
        }
    }
}

impl std::error::Error for DeepWellError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_empty_batch() {
        let err = DeepWellError::EmptyBatch;
        assert_eq!(
            err.to_string(),
            "Batch encoding requires at least one molecule"
        );
    }

    #[test]
    fn display_degree_overflow_names_all_parts() {
        let err = DeepWellError::DegreeOverflow {
            molecule: 3,
            atom: 7,
            degree: 11,
            max_deg: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("Molecule 3"));
        assert!(msg.contains("atom 7"));
        assert!(msg.contains("degree 11"));
        assert!(msg.contains("max_deg 10"));
    }

    #[test]
    fn display_non_square() {
        let err = DeepWellError::NonSquareMatrix { rows: 3, cols: 2 };
        assert!(err.to_string().contains("square"));
        assert!(err.to_string().contains("length 2"));
    }

    #[test]
    fn display_matrix_too_large() {
        let err = DeepWellError::MatrixTooLarge {
            molecule: 0,
            size: 29,
            max_n_atoms: 23,
        };
        assert!(err.to_string().contains("29"));
        assert!(err.to_string().contains("23"));
    }

    #[test]
    fn display_profile_mismatch() {
        let err = DeepWellError::ProfileLengthMismatch {
            outputs: 128,
            labels: 127,
            volumes: 128,
        };
        assert!(err.to_string().contains("128 outputs"));
        assert!(err.to_string().contains("127 labels"));
    }

    #[test]
    fn display_data_load() {
        let err = DeepWellError::DataLoad("qm_graphs.json: no such file".into());
        assert_eq!(
            err.to_string(),
            "Data loading failed: qm_graphs.json: no such file"
        );
    }

    #[test]
    fn error_trait_works() {
        let err = DeepWellError::InvalidDistanceBins;
        let dyn_err: &dyn std::error::Error = &err;
        assert_eq!(
            dyn_err.to_string(),
            "Distance expansion requires at least one bin"
        );
    }
}
