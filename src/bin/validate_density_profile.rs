// SPDX-License-Identifier: AGPL-3.0-only

//! Density-profile regression validation — volume-weighted loss vs pinned control
//!
//! Validates:
//!   1. Profile fixtures load with the expected grid size and system split
//!   2. Recorded SCF replay reproduces each system's profile exactly
//!   3. Concatenated evaluation equals the direct loss call bit-for-bit
//!   4. The regression loss matches the pinned control value at 1e-6 relative
//!   5. Evaluation is deterministic across repeated calls
//!
//! The pinned loss comes from the deepWell Python control (see `provenance`).
//! Run: cargo run --release --bin validate_density_profile
//! Exit code 0 if all checks pass, 1 otherwise.

use deepwell_manta::dft::{density_profile_loss, evaluate_entry, RecordedScf, ScfSolver};
use deepwell_manta::provenance::{DENSITY_PROFILE_LOSS, PROFILE_GRID_POINTS};
use deepwell_manta::tolerances::DENSITY_PROFILE_REL;
use deepwell_manta::validation::ValidationHarness;
use deepwell_manta::{data, discovery};

fn main() {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║  Density Profile Regression — Control Parity Validation      ║");
    println!("║  Volume-weighted squared loss vs deepWell control            ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let mut harness = ValidationHarness::new("density_profile");
    harness.print_provenance(&[&DENSITY_PROFILE_LOSS]);

    // ═══════════════════════════════════════════════════════════════
    // Fixture shape: grid size and per-system split
    // ═══════════════════════════════════════════════════════════════
    println!("  ── profile fixtures ──");
    let entries = data::load_profile_entries(&discovery::profile_fixture_path())
        .expect("Failed to load profile fixtures");
    println!("  Entries: {}", entries.len());
    harness.check_count("profile entry count", entries.len(), 1);

    let entry = entries
        .iter()
        .find(|e| e.name == "lda_x_nn_correction")
        .expect("lda_x_nn_correction entry missing");
    println!(
        "  Entry: {}   grid: {}   systems: {}",
        entry.name,
        entry.labels.len(),
        entry.systems.len()
    );

    harness.check_count("label grid points", entry.labels.len(), PROFILE_GRID_POINTS);
    harness.check_count("volume grid points", entry.volume.len(), PROFILE_GRID_POINTS);
    harness.check_count("system count", entry.systems.len(), 2);
    let system_total: usize = entry.systems.iter().map(|s| s.predicted.len()).sum();
    harness.check_count("system profiles cover the grid", system_total, entry.labels.len());
    for system in &entry.systems {
        harness.check_count(
            &format!("{} profile length", system.name),
            system.predicted.len(),
            entry.labels.len() / entry.systems.len(),
        );
    }
    harness.check_bool(
        "volume weights nonnegative",
        entry.volume.iter().all(|&v| v >= 0.0),
    );

    // ═══════════════════════════════════════════════════════════════
    // Recorded SCF replay + loss regression
    // ═══════════════════════════════════════════════════════════════
    println!();
    println!("  ── loss regression ──");
    let scf = RecordedScf::from_entry(entry);
    harness.check_count("recorded systems", scf.len(), entry.systems.len());

    let mut replay_exact = true;
    for system in &entry.systems {
        let replayed = scf
            .predicted_profile(&system.name)
            .expect("recorded system missing");
        if replayed != system.predicted {
            replay_exact = false;
        }
    }
    harness.check_bool("recorded replay is exact", replay_exact);

    let loss = evaluate_entry(entry, &scf).expect("evaluation failed");
    println!("  loss: {loss:.15}");
    println!("  pinned: {:.15}", DENSITY_PROFILE_LOSS.value);
    harness.check_rel(
        "profile regression loss",
        loss,
        DENSITY_PROFILE_LOSS.value,
        DENSITY_PROFILE_REL,
    );

    let outputs: Vec<f64> = entry
        .systems
        .iter()
        .flat_map(|s| s.predicted.iter().copied())
        .collect();
    let direct = density_profile_loss(&outputs, &entry.labels, &entry.volume)
        .expect("direct loss failed");
    harness.check_bool(
        "entry evaluation equals direct loss",
        loss.to_bits() == direct.to_bits(),
    );

    let again = evaluate_entry(entry, &scf).expect("evaluation failed");
    harness.check_bool("evaluation deterministic", loss.to_bits() == again.to_bits());

    println!();
    println!("  Total: {}/{} checks", harness.passed_count(), harness.total_count());
    harness.finish();
}
