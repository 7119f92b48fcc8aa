// SPDX-License-Identifier: AGPL-3.0-only

//! Gaussian distance expansion: lift a scalar pairwise distance into a
//! fixed-length vector of unnormalized kernel responses on an evenly
//! spaced center grid.
//!
//! Centers sit at `distance_min + i * step` for `i` in `[0, n_distance)`
//! with `step = (distance_max - distance_min) / n_distance`; the kernel
//! width equals the center spacing. No normalization. Both this function
//! and [`gauss_centers`] evaluate the center formula with the same float
//! expression, so a distance equal to `gauss_centers(..)[k]` responds with
//! exactly 1.0 in bin `k`, and repeated calls are bit-identical.

/// Expansion centers: `distance_min + i * step` for each bin.
#[must_use]
pub fn gauss_centers(n_distance: usize, distance_min: f64, distance_max: f64) -> Vec<f64> {
    let step = (distance_max - distance_min) / n_distance as f64;
    (0..n_distance)
        .map(|i| distance_min + i as f64 * step)
        .collect()
}

/// Expand `distance` over `n_distance` Gaussian bins.
///
/// Output element `i` is `exp(-(distance - center_i)^2 / (2 * step^2))`.
/// The output length always equals `n_distance`.
#[must_use]
pub fn gauss_expand(
    distance: f64,
    n_distance: usize,
    distance_min: f64,
    distance_max: f64,
) -> Vec<f64> {
    let step = (distance_max - distance_min) / n_distance as f64;
    let denom = 2.0 * step * step;
    (0..n_distance)
        .map(|i| {
            let center = distance_min + i as f64 * step;
            let d = distance - center;
            (-(d * d) / denom).exp()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tolerances;

    #[test]
    fn output_length_always_matches_bin_count() {
        for n in [0, 1, 2, 17, 100] {
            assert_eq!(gauss_expand(3.0, n, -1.0, 18.0).len(), n);
            assert_eq!(gauss_centers(n, -1.0, 18.0).len(), n);
        }
    }

    #[test]
    fn peak_at_own_center_is_exactly_one() {
        let (n, lo, hi) = (100, -1.0, 18.0);
        let centers = gauss_centers(n, lo, hi);
        for (k, &c) in centers.iter().enumerate() {
            let out = gauss_expand(c, n, lo, hi);
            assert_eq!(
                out[k].to_bits(),
                1.0_f64.to_bits(),
                "bin {k} at its own center {c} must respond exactly 1.0, got {}",
                out[k]
            );
        }
    }

    #[test]
    fn neighbor_bin_response_is_exp_half() {
        // one full step away from a center: exp(-step²/(2·step²)) = exp(-1/2)
        let (n, lo, hi) = (100, -1.0, 18.0);
        let centers = gauss_centers(n, lo, hi);
        let out = gauss_expand(centers[40], n, lo, hi);
        let expected = (-0.5_f64).exp();
        for k in [39, 41] {
            assert!(
                (out[k] - expected).abs() < tolerances::EXACT_F64,
                "bin {k} should respond exp(-1/2)={expected}, got {}",
                out[k]
            );
        }
    }

    #[test]
    fn response_symmetric_about_center() {
        let (n, lo, hi) = (50, 0.0, 10.0);
        let centers = gauss_centers(n, lo, hi);
        let out = gauss_expand(centers[20], n, lo, hi);
        for off in 1..5 {
            assert_eq!(
                out[20 - off].to_bits(),
                out[20 + off].to_bits(),
                "offset {off} bins should respond identically on both sides"
            );
        }
    }

    #[test]
    fn repeated_calls_bit_identical() {
        let a = gauss_expand(1.8088458472882334, 100, -1.0, 18.0);
        let b = gauss_expand(1.8088458472882334, 100, -1.0, 18.0);
        for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
            assert_eq!(x.to_bits(), y.to_bits(), "bin {i} must be reproducible");
        }
    }

    #[test]
    fn far_distance_decays_to_zero() {
        let out = gauss_expand(1000.0, 100, -1.0, 18.0);
        assert!(
            out.iter().all(|&v| v == 0.0),
            "responses 5000+ sigma out underflow to zero"
        );
    }

    #[test]
    fn step_uses_open_upper_edge() {
        // n bins cover [lo, hi): the last center is hi - step, not hi
        let centers = gauss_centers(10, 0.0, 10.0);
        assert!((centers[0] - 0.0).abs() < tolerances::EXACT_F64);
        assert!((centers[9] - 9.0).abs() < tolerances::EXACT_F64);
    }
}
