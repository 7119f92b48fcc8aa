// SPDX-License-Identifier: AGPL-3.0-only

//! Featurization constants and reference encoder defaults.
//!
//! The Coulomb-matrix diagonal convention and the DTNN bin layout come from
//! the literature (Rupp et al. 2012; Schütt et al. 2017) and from the Python
//! control implementation. The exponent 2.4 is an empirical fit constant:
//! preserve it exactly, never re-derive it.

/// Ångström to bohr conversion (CODATA 2018 bohr radius).
///
/// Fixture Coulomb matrices were built from CCCBDB geometries in Å using
/// this factor; cross-checks against recorded distances depend on the
/// exact value.
pub const ANGSTROM_TO_BOHR: f64 = 1.889_726_125_457_828_1;

/// Coulomb matrix diagonal prefactor: diagonal = `0.5 * Z^2.4`.
pub const COULOMB_DIAG_PREFACTOR: f64 = 0.5;

/// Coulomb matrix diagonal exponent (empirical, Rupp et al. 2012).
pub const COULOMB_DIAG_EXPONENT: f64 = 2.4;

/// Default degree range for graph-convolution adjacency bucketing.
pub const DEFAULT_MAX_DEG: usize = 10;

/// Lower edge of the default degree range (degree-0 atoms are tracked).
pub const DEFAULT_MIN_DEG: usize = 0;

/// Default number of Gaussian distance-expansion bins.
pub const DEFAULT_N_DISTANCE: usize = 100;

/// Default lower edge of the expansion center grid (bohr).
///
/// Starts below zero so the lowest centers catch near-contact pairs whose
/// recovered distance falls under one bin width.
pub const DEFAULT_DISTANCE_MIN: f64 = -1.0;

/// Default upper edge of the expansion center grid (bohr).
pub const DEFAULT_DISTANCE_MAX: f64 = 18.0;
