// SPDX-License-Identifier: AGPL-3.0-only

//! Fixture data loading and minibatch encoding drivers.
//!
//! Three JSON fixture sets live under `data/`:
//!   - `qm_graphs.json` — small-molecule graphs (one-hot element
//!     features plus bond adjacency) for the degree-bucketed encoder
//!   - `coulomb_qm.json` — Coulomb matrices built from CCCBDB
//!     equilibrium geometries for the DTNN encoder
//!   - `density_profiles.json` — radial density profiles, labels, and
//!     grid volume elements for the profile-loss baseline

use crate::error::DeepWellError;
use crate::feed::FeedMap;
use crate::graph::{CoulombMatrix, DtnnTopology, GraphTopology, MolGraph};
use rayon::prelude::*;
use serde::Deserialize;
use std::path::Path;

/// A single molecule from the graph fixture set
#[derive(Debug, Clone, Deserialize)]
#[allow(missing_docs)]
pub struct MoleculeRecord {
    pub name: String,
    pub elements: Vec<String>,
    pub atom_features: Vec<Vec<f64>>,
    pub adjacency: Vec<Vec<usize>>,
}

impl MoleculeRecord {
    /// Validate the raw record into a [`MolGraph`] with the given
    /// feature width.
    ///
    /// # Errors
    ///
    /// Same validation as [`MolGraph::new`].
    pub fn to_graph(&self, n_feat: usize) -> Result<MolGraph, DeepWellError> {
        MolGraph::new(n_feat, self.atom_features.clone(), self.adjacency.clone())
    }
}

#[derive(Debug, Deserialize)]
struct GraphFile {
    n_feat: usize,
    molecules: Vec<MoleculeRecord>,
}

/// A single molecule from the Coulomb fixture set
#[derive(Debug, Clone, Deserialize)]
#[allow(missing_docs)]
pub struct CoulombRecord {
    pub name: String,
    pub elements: Vec<String>,
    pub matrix: Vec<Vec<f64>>,
}

impl CoulombRecord {
    /// Validate the raw rows into a square [`CoulombMatrix`].
    ///
    /// # Errors
    ///
    /// [`DeepWellError::NonSquareMatrix`] on ragged rows.
    pub fn to_matrix(&self) -> Result<CoulombMatrix, DeepWellError> {
        CoulombMatrix::from_rows(self.matrix.clone())
    }
}

#[derive(Debug, Deserialize)]
struct CoulombFile {
    molecules: Vec<CoulombRecord>,
}

/// One recorded density profile per physical system
#[derive(Debug, Clone, Deserialize)]
#[allow(missing_docs)]
pub struct ProfileSystem {
    pub name: String,
    pub predicted: Vec<f64>,
}

/// A density-profile baseline entry: reference labels and grid volume
/// elements over the concatenated per-system grids, plus the recorded
/// predicted profiles.
#[derive(Debug, Clone, Deserialize)]
#[allow(missing_docs)]
pub struct ProfileEntry {
    pub name: String,
    pub description: String,
    pub labels: Vec<f64>,
    pub volume: Vec<f64>,
    pub systems: Vec<ProfileSystem>,
}

#[derive(Debug, Deserialize)]
struct ProfileFile {
    entries: Vec<ProfileEntry>,
}

/// Load the molecular graph fixture set → (`n_feat`, raw records).
///
/// Uses streaming `from_reader` to avoid buffering the entire JSON file
/// in memory as an intermediate string.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or JSON deserialization fails.
pub fn load_molecules(
    path: &Path,
) -> Result<(usize, Vec<MoleculeRecord>), Box<dyn std::error::Error>> {
    let reader = std::io::BufReader::new(std::fs::File::open(path)?);
    let file: GraphFile = serde_json::from_reader(reader)?;
    Ok((file.n_feat, file.molecules))
}

/// Load the Coulomb matrix fixture set.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or JSON deserialization fails.
pub fn load_coulomb_set(path: &Path) -> Result<Vec<CoulombRecord>, Box<dyn std::error::Error>> {
    let reader = std::io::BufReader::new(std::fs::File::open(path)?);
    let file: CoulombFile = serde_json::from_reader(reader)?;
    Ok(file.molecules)
}

/// Load the density-profile baseline entries.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or JSON deserialization fails.
pub fn load_profile_entries(path: &Path) -> Result<Vec<ProfileEntry>, Box<dyn std::error::Error>> {
    let reader = std::io::BufReader::new(std::fs::File::open(path)?);
    let file: ProfileFile = serde_json::from_reader(reader)?;
    Ok(file.entries)
}

/// Load the graph fixtures from the discovered data root as validated
/// graphs, ready for the degree-bucketed encoder.
///
/// # Errors
///
/// Returns [`DeepWellError::DataLoad`] if the fixture cannot be read and
/// the validation errors of [`MolGraph::new`] for defective records.
pub fn load_graph_fixtures() -> Result<(usize, Vec<MolGraph>), DeepWellError> {
    let path = crate::discovery::graph_fixture_path();
    let (n_feat, records) = load_molecules(&path)
        .map_err(|e| DeepWellError::DataLoad(format!("graph fixtures: {e}")))?;
    let graphs = records
        .iter()
        .map(|r| r.to_graph(n_feat))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((n_feat, graphs))
}

/// Load the Coulomb fixtures from the discovered data root as validated
/// square matrices.
///
/// # Errors
///
/// Returns [`DeepWellError::DataLoad`] if the fixture cannot be read and
/// [`DeepWellError::NonSquareMatrix`] for defective records.
pub fn load_coulomb_fixtures() -> Result<Vec<CoulombMatrix>, DeepWellError> {
    let path = crate::discovery::coulomb_fixture_path();
    let records = load_coulomb_set(&path)
        .map_err(|e| DeepWellError::DataLoad(format!("coulomb fixtures: {e}")))?;
    records.iter().map(CoulombRecord::to_matrix).collect()
}

/// Load the density-profile baseline entries from the discovered data
/// root.
///
/// # Errors
///
/// Returns [`DeepWellError::DataLoad`] if the fixture cannot be read.
pub fn load_profile_fixtures() -> Result<Vec<ProfileEntry>, DeepWellError> {
    let path = crate::discovery::profile_fixture_path();
    load_profile_entries(&path)
        .map_err(|e| DeepWellError::DataLoad(format!("profile fixtures: {e}")))
}

// ═══════════════════════════════════════════════════════════════════
// Minibatch drivers
// ═══════════════════════════════════════════════════════════════════

/// Encode a molecule set in fixed-size minibatches.
///
/// Batches encode independently in parallel; each encode call is pure
/// and re-entrant, so the output order is the input order regardless of
/// scheduling. Molecule indices in each feed (membership values) are
/// batch-local.
///
/// # Errors
///
/// [`DeepWellError::EmptyBatch`] for an empty molecule set or a zero
/// batch size, plus any per-batch encode error.
pub fn encode_minibatches(
    topology: &GraphTopology,
    graphs: &[MolGraph],
    batch_size: usize,
) -> Result<Vec<FeedMap>, DeepWellError> {
    if graphs.is_empty() || batch_size == 0 {
        return Err(DeepWellError::EmptyBatch);
    }
    graphs
        .par_chunks(batch_size)
        .map(|chunk| topology.batch_to_feed(chunk))
        .collect()
}

/// Encode a Coulomb matrix set in fixed-size minibatches, in parallel.
///
/// # Errors
///
/// [`DeepWellError::EmptyBatch`] for an empty matrix set or a zero
/// batch size, plus any per-batch encode error.
pub fn encode_coulomb_minibatches(
    topology: &DtnnTopology,
    matrices: &[CoulombMatrix],
    batch_size: usize,
) -> Result<Vec<FeedMap>, DeepWellError> {
    if matrices.is_empty() || batch_size == 0 {
        return Err(DeepWellError::EmptyBatch);
    }
    matrices
        .par_chunks(batch_size)
        .map(|chunk| topology.batch_to_feed(chunk))
        .collect()
}
