// SPDX-License-Identifier: AGPL-3.0-only

//! Integration tests: density-profile regression public API.
//!
//! Validates the volume-weighted loss, recorded-SCF replay, entry evaluation
//! across the module boundary, and the fixture regression against the pinned
//! control loss.

use deepwell_manta::data::{ProfileEntry, ProfileSystem};
use deepwell_manta::dft::{density_profile_loss, evaluate_entry, RecordedScf, ScfSolver};
use deepwell_manta::error::DeepWellError;
use deepwell_manta::provenance::DENSITY_PROFILE_LOSS;
use deepwell_manta::tolerances::DENSITY_PROFILE_REL;
use deepwell_manta::{data, discovery};

fn two_system_entry() -> ProfileEntry {
    ProfileEntry {
        name: "toy_correction".to_string(),
        description: "two tiny systems on a shared grid".to_string(),
        labels: vec![1.0, 2.0, 0.5, 0.25],
        volume: vec![0.5, 1.0, 2.0, 4.0],
        systems: vec![
            ProfileSystem {
                name: "alpha".to_string(),
                predicted: vec![1.1, 2.0],
            },
            ProfileSystem {
                name: "beta".to_string(),
                predicted: vec![0.5, 0.75],
            },
        ],
    }
}

#[test]
fn loss_is_volume_weighted_squared_error() {
    // (1.1-1.0)²·0.5 + 0²·1.0 + 0²·2.0 + (0.75-0.25)²·4.0
    let entry = two_system_entry();
    let scf = RecordedScf::from_entry(&entry);
    let loss = evaluate_entry(&entry, &scf).expect("evaluation succeeds");
    let expected = 0.1 * 0.1 * 0.5 + 0.5 * 0.5 * 4.0;
    assert!((loss - expected).abs() < 1e-12, "loss {loss} vs {expected}");
}

#[test]
fn entry_evaluation_concatenates_in_system_order() {
    let entry = two_system_entry();
    let scf = RecordedScf::from_entry(&entry);
    let loss = evaluate_entry(&entry, &scf).expect("evaluation succeeds");

    let concatenated = vec![1.1, 2.0, 0.5, 0.75];
    let direct = density_profile_loss(&concatenated, &entry.labels, &entry.volume)
        .expect("direct loss succeeds");
    assert_eq!(loss.to_bits(), direct.to_bits());
}

#[test]
fn zero_volume_points_contribute_nothing() {
    let loss = density_profile_loss(&[5.0, 1.0], &[0.0, 1.0], &[0.0, 3.0])
        .expect("lengths agree");
    assert_eq!(loss, 0.0, "only the zero-residual point has volume");
}

#[test]
fn length_mismatch_is_typed() {
    let err = density_profile_loss(&[1.0, 2.0], &[1.0], &[1.0, 1.0])
        .expect_err("outputs and labels disagree");
    assert!(matches!(
        err,
        DeepWellError::ProfileLengthMismatch {
            outputs: 2,
            labels: 1,
            volumes: 2,
        }
    ));
}

#[test]
fn partial_grid_coverage_is_rejected() {
    // Systems covering 2 of 4 grid points must not silently score a subset.
    let mut entry = two_system_entry();
    entry.systems.pop();
    let scf = RecordedScf::from_entry(&entry);
    let err = evaluate_entry(&entry, &scf).expect_err("grid left uncovered");
    assert!(matches!(
        err,
        DeepWellError::ProfileLengthMismatch {
            outputs: 2,
            labels: 4,
            volumes: 4,
        }
    ));
}

#[test]
fn unknown_system_is_a_load_error() {
    let scf = RecordedScf::new();
    let err = scf
        .predicted_profile("nonexistent")
        .expect_err("nothing recorded");
    match err {
        DeepWellError::DataLoad(msg) => assert!(msg.contains("nonexistent")),
        other => panic!("expected DataLoad, got {other:?}"),
    }
}

#[test]
fn recording_replaces_earlier_profiles() {
    let mut scf = RecordedScf::new();
    scf.record("alpha", vec![1.0, 2.0]);
    scf.record("alpha", vec![3.0, 4.0]);
    assert_eq!(scf.len(), 1);
    let replayed = scf.predicted_profile("alpha").expect("recorded");
    assert_eq!(replayed, vec![3.0, 4.0]);
}

#[test]
fn fixture_regression_matches_pinned_loss() {
    let path = discovery::profile_fixture_path();
    if path.exists() {
        let entries = data::load_profile_entries(&path).expect("fixtures parse");
        let entry = entries
            .iter()
            .find(|e| e.name == "lda_x_nn_correction")
            .expect("regression entry present");
        let scf = RecordedScf::from_entry(entry);
        let loss = evaluate_entry(entry, &scf).expect("evaluation succeeds");
        let rel = ((loss - DENSITY_PROFILE_LOSS.value) / DENSITY_PROFILE_LOSS.value).abs();
        assert!(
            rel < DENSITY_PROFILE_REL,
            "loss {loss} deviates from pinned {} by {rel:.3e}",
            DENSITY_PROFILE_LOSS.value
        );
    }
}

#[test]
fn fixture_evaluation_is_deterministic() {
    let path = discovery::profile_fixture_path();
    if path.exists() {
        let entries = data::load_profile_entries(&path).expect("fixtures parse");
        for entry in &entries {
            let scf = RecordedScf::from_entry(entry);
            let a = evaluate_entry(entry, &scf).expect("first pass");
            let b = evaluate_entry(entry, &scf).expect("second pass");
            assert_eq!(a.to_bits(), b.to_bits(), "{} drifted", entry.name);
        }
    }
}
