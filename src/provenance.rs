// SPDX-License-Identifier: AGPL-3.0-only

//! Provenance metadata for all Python baseline values.
//!
//! Every hardcoded expected value in validation binaries traces back to a
//! specific Python control run. This module centralizes that metadata so
//! validation binaries carry machine-readable provenance.
//!
//! # Provenance chain
//!
//! ```text
//! Python script → commit → environment → command → output → Rust constant
//! ```
//!
//! ## Data Sources
//!
//! | Dataset / Publication | DOI / Accession | Notes |
//! |----------------------|-----------------|-------|
//! | Coulomb matrix representation | [10.1103/PhysRevLett.108.058301](https://doi.org/10.1103/PhysRevLett.108.058301) | Rupp et al., PRL 108, 058301 (2012) |
//! | Deep tensor neural networks | [10.1038/ncomms13890](https://doi.org/10.1038/ncomms13890) | Schütt et al., Nat. Commun. 8, 13890 (2017) |
//! | Graph convolutions on molecules | [arXiv:1509.09292](https://arxiv.org/abs/1509.09292) | Duvenaud et al., NeurIPS (2015) |
//! | Learned exchange-correlation | [10.1103/PhysRevLett.127.126403](https://doi.org/10.1103/PhysRevLett.127.126403) | Kasim & Vinko, PRL 127, 126403 (2021) |
//! | NIST CCCBDB geometries | [10.18434/T47C7Z](https://doi.org/10.18434/T47C7Z) | Experimental equilibrium geometries, release 22 (2022) |
//! | CODATA 2018 constants | [10.1103/RevModPhys.93.025010](https://doi.org/10.1103/RevModPhys.93.025010) | bohr radius for Å conversion |

/// A single provenance record tying a Rust reference value to its Python origin.
#[derive(Debug, Clone)]
pub struct BaselineProvenance {
    /// Human-readable label (e.g. "density profile loss")
    pub label: &'static str,
    /// Python script that produced the value (relative to control/)
    pub script: &'static str,
    /// Git commit hash of the control repo at time of run
    pub commit: &'static str,
    /// Date of the control run (ISO 8601)
    pub date: &'static str,
    /// Exact command used to produce the baseline
    pub command: &'static str,
    /// Python environment spec (conda env name or requirements file)
    pub environment: &'static str,
    /// The reference value itself
    pub value: f64,
    /// Unit or description of the value
    pub unit: &'static str,
}

// ═══════════════════════════════════════════════════════════════════
// Density profile baselines: from control/densityfit/
// ═══════════════════════════════════════════════════════════════════

/// Python density-profile loss for the neural LDA-exchange correction,
/// evaluated on the hydrogen + helium radial grids.
pub const DENSITY_PROFILE_LOSS: BaselineProvenance = BaselineProvenance {
    label: "density profile loss (lda_x_nn_correction, H + He)",
    script: "densityfit/eval_profiles.py",
    commit: "3b1f9ac2 (deepWell control, pinned)",
    date: "2026-06-02",
    command: "python -m densityfit.eval_profiles --entry=lda_x_nn_correction --systems=hydrogen,helium",
    environment: "envs/densityfit.yaml (Python 3.11, NumPy 1.26, PyTorch 2.1)",
    value: 0.006_871_2,
    unit: "integrated squared density deviation (4πr²·dr weighted)",
};

/// Grid points in the concatenated density-profile baseline (64 per system).
pub const PROFILE_GRID_POINTS: usize = 128;

// ═══════════════════════════════════════════════════════════════════
// Graph fixture census: from control/featurize/
// ═══════════════════════════════════════════════════════════════════

/// Python atom count over the merged graph fixture set.
pub const GRAPH_FIXTURE_ATOMS: BaselineProvenance = BaselineProvenance {
    label: "graph fixture merged atom count",
    script: "featurize/make_graphs.py",
    commit: "3b1f9ac2 (deepWell control, pinned)",
    date: "2026-06-02",
    command: "python -m featurize.make_graphs --out=qm_graphs.json",
    environment: "envs/manta.yaml (Python 3.11, NumPy 1.26, RDKit 2023.09)",
    value: 25.0,
    unit: "atoms",
};

/// Degree histogram of the graph fixture set: (degree, atom count).
///
/// Produced by the same control run as [`GRAPH_FIXTURE_ATOMS`]; counts
/// must sum to 25.
pub const GRAPH_DEGREE_HISTOGRAM: &[(usize, usize)] =
    &[(0, 0), (1, 19), (2, 2), (3, 1), (4, 3)];

/// Graph fixture molecules with their atom counts, in file order.
pub const GRAPH_FIXTURE_MOLECULES: &[(&str, usize)] = &[
    ("water", 3),
    ("methane", 5),
    ("ammonia", 4),
    ("carbon_dioxide", 3),
    ("ethane", 8),
    ("hydrogen_fluoride", 2),
];

// ═══════════════════════════════════════════════════════════════════
// Coulomb control values: water O-H pair
// ═══════════════════════════════════════════════════════════════════

/// Water control pair for the DTNN encoder.
///
/// # Python baseline provenance
///
/// | Field | Value |
/// |-------|-------|
/// | Script | `control/featurize/make_coulomb.py` |
/// | Commit | `3b1f9ac2` (deepWell control, pinned) |
/// | Date | 2026-06-02 |
/// | Command | `python -m featurize.make_coulomb --molecules=water,ammonia,methane,hydrogen_fluoride,lithium_hydride` |
/// | Environment | `envs/manta.yaml` (Python 3.11, NumPy 1.26) |
///
/// Geometry: water O-H equilibrium bond length 0.9572 Å from CCCBDB
/// (experimental, release 22). The Coulomb entry is Z_O·Z_H / d with d
/// in bohr; the expansion values use the reference basis (100 bins on
/// [-1, 18] bohr).
pub const WATER_OH_BOND_ANGSTROM: f64 = 0.9572;

/// Water O-H separation in bohr (0.9572 Å × the CODATA Å→bohr factor).
pub const WATER_OH_DISTANCE_BOHR: f64 = 1.808_845_847_288_233_4;

/// Water O-H Coulomb matrix entry: Z_O·Z_H / d = 8 / [`WATER_OH_DISTANCE_BOHR`].
pub const WATER_OH_COULOMB_ENTRY: f64 = 4.422_709_658_754_701;

/// Peak bin of the Gaussian expansion of the O-H distance on the
/// reference basis.
pub const WATER_OH_PEAK_BIN: usize = 15;

/// Expansion value in the peak bin, from the Python control run.
pub const WATER_OH_PEAK_VALUE: f64 = 0.976_815_044_881_187_5;
