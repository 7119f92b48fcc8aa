// SPDX-License-Identifier: AGPL-3.0-only

//! Centralized validation tolerances with numerical justification.
//!
//! Every tolerance threshold used in validation binaries and integration
//! tests is defined here with documentation of its origin and rationale.
//! No ad-hoc magic numbers.
//!
//! # Tolerance categories
//!
//! | Category | Basis | Example |
//! |----------|-------|---------|
//! | Machine precision | IEEE 754 f64 | 1e-12 for single-expression math |
//! | Control parity | Same arithmetic, NumPy vs Rust | 1e-10 elementwise |
//! | Regression | Recorded control-run scalar | 1e-6 relative on profile loss |

// ═══════════════════════════════════════════════════════════════════
// Machine-precision tolerances (IEEE 754 f64)
// ═══════════════════════════════════════════════════════════════════

/// Tolerance for single-expression f64 arithmetic.
///
/// One exp() plus a handful of multiplications stays within a few ulps of
/// the correctly rounded result; 1e-12 leaves three orders of headroom
/// while still catching any formula transcription error.
pub const EXACT_F64: f64 = 1e-12;

/// Tolerance for comparing Rust results against the NumPy control run
/// when both sides evaluate the same formula on the same inputs.
///
/// The JSON fixtures carry shortest-round-trip decimal literals, so both
/// sides start from bit-identical doubles. Differences can only come from
/// libm (exp, pow) disagreeing by an ulp or two; 1e-10 is conservative.
pub const CONTROL_PARITY_F64: f64 = 1e-10;

// ═══════════════════════════════════════════════════════════════════
// Featurization tolerances
// ═══════════════════════════════════════════════════════════════════

/// Atomic-number recovery margin before rounding.
///
/// `(2c)^(1/2.4)` of an exact `0.5·Z^2.4` diagonal lands within ~1e-13 of
/// the integer for Z ≤ 100; anything beyond 1e-6 from an integer would
/// indicate a wrong exponent, not rounding noise.
pub const ATOM_NUMBER_RECOVERY: f64 = 1e-6;

// ═══════════════════════════════════════════════════════════════════
// Regression tolerances (recorded control runs)
// ═══════════════════════════════════════════════════════════════════

/// Density-profile regression loss, relative to the recorded control value.
///
/// The control assertion used NumPy `allclose` defaults (rtol 1e-5); we
/// hold the Rust side one order tighter since both sides sum the same
/// 128 fixture terms in the same order.
pub const DENSITY_PROFILE_REL: f64 = 1e-6;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_ordering() {
        assert!(
            EXACT_F64 < CONTROL_PARITY_F64,
            "machine precision < control parity"
        );
        assert!(
            CONTROL_PARITY_F64 < DENSITY_PROFILE_REL,
            "control parity < regression"
        );
    }

    #[test]
    fn all_tolerances_positive() {
        for tol in [
            EXACT_F64,
            CONTROL_PARITY_F64,
            ATOM_NUMBER_RECOVERY,
            DENSITY_PROFILE_REL,
        ] {
            assert!(tol > 0.0, "tolerance must be positive, got {tol}");
        }
    }
}
