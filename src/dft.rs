// SPDX-License-Identifier: AGPL-3.0-only

//! Density-profile regression for learned exchange-correlation models.
//!
//! A trained functional is judged by the electron density profiles its
//! self-consistent solve produces, not by its pointwise outputs: the
//! loss is the squared density deviation integrated over space,
//! Σ (n_pred − n_ref)² dV on the radial grid (Kasim & Vinko,
//! PRL 127, 126403 (2021)). The SCF machinery itself stays behind the
//! [`ScfSolver`] seam; this module only defines the evaluation contract
//! and a replay solver for recorded baselines.

use crate::data::ProfileEntry;
use crate::error::DeepWellError;

/// Volume-weighted squared-deviation loss over one concatenated grid.
///
/// Accumulates in index order; baseline values are bit-sensitive to the
/// summation order, so do not reorder or pairwise-reduce.
///
/// # Errors
///
/// [`DeepWellError::ProfileLengthMismatch`] when the three arrays
/// disagree in length.
///
/// # Example
///
/// ```
/// use deepwell_manta::dft::density_profile_loss;
///
/// let loss = density_profile_loss(&[1.0, 2.0], &[1.0, 1.5], &[2.0, 4.0])
///     .expect("lengths agree");
/// assert!((loss - 1.0).abs() < 1e-12); // 0²·2 + 0.5²·4
/// ```
pub fn density_profile_loss(
    outputs: &[f64],
    labels: &[f64],
    volumes: &[f64],
) -> Result<f64, DeepWellError> {
    if outputs.len() != labels.len() || labels.len() != volumes.len() {
        return Err(DeepWellError::ProfileLengthMismatch {
            outputs: outputs.len(),
            labels: labels.len(),
            volumes: volumes.len(),
        });
    }
    let mut loss = 0.0;
    for ((&out, &label), &volume) in outputs.iter().zip(labels.iter()).zip(volumes.iter()) {
        let residual = out - label;
        loss += residual * residual * volume;
    }
    Ok(loss)
}

/// The self-consistent-field seam: anything that can produce a density
/// profile for a named system.
///
/// The evaluation pipeline never looks inside the solve; it only
/// concatenates per-system profiles in entry order and scores them.
pub trait ScfSolver {
    /// Predicted density profile for one named system, on that system's
    /// radial grid.
    ///
    /// # Errors
    ///
    /// Implementations fail when the system is unknown or the underlying
    /// solve cannot produce a profile.
    fn predicted_profile(&self, system: &str) -> Result<Vec<f64>, DeepWellError>;
}

/// Replay solver: serves profiles recorded in a baseline fixture.
///
/// Stands in for a real SCF loop when scoring stored baselines, and
/// doubles as a test seam for the evaluation pipeline.
#[derive(Debug, Clone, Default)]
pub struct RecordedScf {
    profiles: Vec<(String, Vec<f64>)>,
}

impl RecordedScf {
    /// Empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a replay solver from a baseline entry's recorded systems.
    #[must_use]
    pub fn from_entry(entry: &ProfileEntry) -> Self {
        let mut scf = Self::new();
        for system in &entry.systems {
            scf.record(&system.name, system.predicted.clone());
        }
        scf
    }

    /// Record (or replace) the profile for one system.
    pub fn record(&mut self, system: &str, profile: Vec<f64>) {
        if let Some(slot) = self.profiles.iter_mut().find(|(n, _)| n == system) {
            slot.1 = profile;
            return;
        }
        self.profiles.push((system.to_string(), profile));
    }

    /// Number of recorded systems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// True when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl ScfSolver for RecordedScf {
    fn predicted_profile(&self, system: &str) -> Result<Vec<f64>, DeepWellError> {
        self.profiles
            .iter()
            .find(|(n, _)| n == system)
            .map(|(_, p)| p.clone())
            .ok_or_else(|| {
                DeepWellError::DataLoad(format!("no recorded profile for system '{system}'"))
            })
    }
}

/// Score one baseline entry: solve every system in entry order,
/// concatenate the profiles, and take the volume-weighted loss against
/// the entry's labels.
///
/// # Errors
///
/// Propagates solver failures and
/// [`DeepWellError::ProfileLengthMismatch`] when the concatenated
/// profiles do not cover the label grid.
pub fn evaluate_entry(entry: &ProfileEntry, solver: &dyn ScfSolver) -> Result<f64, DeepWellError> {
    let mut outputs = Vec::with_capacity(entry.labels.len());
    for system in &entry.systems {
        outputs.extend(solver.predicted_profile(&system.name)?);
    }
    density_profile_loss(&outputs, &entry.labels, &entry.volume)
}
