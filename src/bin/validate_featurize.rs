// SPDX-License-Identifier: AGPL-3.0-only

//! Manta featurization validation — graph topology and DTNN Coulomb encoders
//!
//! Validates:
//!   1. RDKit-derived graph fixtures load and the degree census matches the pinned one
//!   2. One merged batch encodes with a contiguous degree-slice partition
//!   3. Membership and adjacency tensors cover the merged atom range
//!   4. Water O-H Coulomb entry, recovered bond length, and expansion peak vs controls
//!   5. Atomic number recovery from every Coulomb diagonal in the fixture set
//!
//! Expected values are pinned from the deepWell Python control (see `provenance`).
//! Run: cargo run --release --bin validate_featurize
//! Exit code 0 if all checks pass, 1 otherwise.

use deepwell_manta::constants::{
    ANGSTROM_TO_BOHR, COULOMB_DIAG_EXPONENT, COULOMB_DIAG_PREFACTOR, DEFAULT_DISTANCE_MAX,
    DEFAULT_DISTANCE_MIN, DEFAULT_N_DISTANCE,
};
use deepwell_manta::feed::Tensor;
use deepwell_manta::graph::dtnn::{atomic_number_from_diagonal, CoulombMatrix, DtnnTopology};
use deepwell_manta::graph::expand::gauss_expand;
use deepwell_manta::graph::mol::MolGraph;
use deepwell_manta::graph::GraphTopology;
use deepwell_manta::provenance::{
    GRAPH_DEGREE_HISTOGRAM, GRAPH_FIXTURE_ATOMS, GRAPH_FIXTURE_MOLECULES, WATER_OH_BOND_ANGSTROM,
    WATER_OH_COULOMB_ENTRY, WATER_OH_DISTANCE_BOHR, WATER_OH_PEAK_BIN, WATER_OH_PEAK_VALUE,
};
use deepwell_manta::tolerances::{ATOM_NUMBER_RECOVERY, CONTROL_PARITY_F64, EXACT_F64};
use deepwell_manta::validation::ValidationHarness;
use deepwell_manta::{data, discovery};

/// Atomic numbers for the elements present in the QM fixture set.
fn atomic_number(symbol: &str) -> i32 {
    match symbol {
        "H" => 1,
        "Li" => 3,
        "C" => 6,
        "N" => 7,
        "O" => 8,
        "F" => 9,
        _ => 0,
    }
}

#[allow(clippy::too_many_lines)]
fn main() {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║  Manta Featurization — Control Parity Validation             ║");
    println!("║  Graph topology + DTNN Coulomb encoders vs deepWell control  ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let mut harness = ValidationHarness::new("featurize");
    harness.print_provenance(&[&GRAPH_FIXTURE_ATOMS]);

    // ═══════════════════════════════════════════════════════════════
    // Graph fixtures: load + degree census
    // ═══════════════════════════════════════════════════════════════
    println!("  ── graph fixtures ──");
    let (n_feat, records) = data::load_molecules(&discovery::graph_fixture_path())
        .expect("Failed to load graph fixtures");
    let graphs: Vec<MolGraph> = records
        .iter()
        .map(|r| r.to_graph(n_feat).expect("invalid fixture molecule"))
        .collect();
    let total_atoms: usize = graphs.iter().map(MolGraph::n_atoms).sum();
    println!("  Molecules: {}   atom features: {n_feat}", graphs.len());
    println!("  Total atoms: {total_atoms}");

    harness.check_count(
        "fixture molecule count",
        graphs.len(),
        GRAPH_FIXTURE_MOLECULES.len(),
    );
    harness.check_abs(
        "total fixture atoms",
        total_atoms as f64,
        GRAPH_FIXTURE_ATOMS.value,
        0.5,
    );
    for (name, expected_atoms) in GRAPH_FIXTURE_MOLECULES {
        match records.iter().find(|r| r.name == *name) {
            Some(r) => harness.check_count(
                &format!("{name} atom count"),
                r.elements.len(),
                *expected_atoms,
            ),
            None => harness.check_bool(&format!("{name} present"), false),
        }
    }
    for (deg, expected) in GRAPH_DEGREE_HISTOGRAM {
        let got: usize = graphs
            .iter()
            .map(|g| (0..g.n_atoms()).filter(|&a| g.degree(a) == *deg).count())
            .sum();
        harness.check_count(&format!("degree-{deg} atom count"), got, *expected);
    }

    // ═══════════════════════════════════════════════════════════════
    // Merged batch encoding: slice partition + membership
    // ═══════════════════════════════════════════════════════════════
    println!();
    println!("  ── merged batch encoding ──");
    let max_deg = graphs.iter().map(MolGraph::max_degree).max().unwrap_or(0);
    let topo = GraphTopology::new(n_feat).with_degree_range(0, max_deg);
    let feed = topo.batch_to_feed(&graphs).expect("batch encoding failed");
    println!("  Degree range: 0..={max_deg}   feed slots: {}", feed.len());

    harness.check_count("feed slot count", feed.len(), topo.slots().len());
    let conforms = topo
        .slots()
        .iter()
        .all(|spec| feed.get(&spec.name).is_some_and(|t| t.conforms_to(spec)));
    harness.check_bool("all tensors conform to slot specs", conforms);

    let features = feed
        .get("topology/atom_features")
        .and_then(Tensor::as_f64)
        .expect("atom_features slot missing");
    harness.check_count("merged feature rows", features.shape()[0], total_atoms);

    let slice = feed
        .get("topology/deg_slice")
        .and_then(Tensor::as_i32)
        .expect("deg_slice slot missing");
    let n_buckets = slice.shape()[0];
    let mut offsets_contiguous = true;
    let mut running = 0_i32;
    for b in 0..n_buckets {
        let offset = slice.data()[b * 2];
        let count = slice.data()[b * 2 + 1];
        if offset != running || count < 0 {
            offsets_contiguous = false;
        }
        running += count;
    }
    harness.check_bool("slice offsets are contiguous", offsets_contiguous);
    harness.check_count("slice counts sum to atom total", running as usize, total_atoms);
    for (deg, expected) in GRAPH_DEGREE_HISTOGRAM {
        let count = slice.data()[deg * 2 + 1];
        harness.check_count(&format!("slice count for degree {deg}"), count as usize, *expected);
    }

    let membership = feed
        .get("topology/membership")
        .and_then(Tensor::as_i32)
        .expect("membership slot missing");
    harness.check_count("membership length", membership.len(), total_atoms);
    let n_mols = i32::try_from(graphs.len()).expect("molecule count fits i32");
    let in_range = membership.data().iter().all(|&m| m >= 0 && m < n_mols);
    harness.check_bool("membership indices in range", in_range);
    let mut seen = vec![false; graphs.len()];
    for &m in membership.data() {
        if m >= 0 && (m as usize) < seen.len() {
            seen[m as usize] = true;
        }
    }
    harness.check_bool("every molecule appears in membership", seen.iter().all(|&s| s));

    // ═══════════════════════════════════════════════════════════════
    // Coulomb matrices: pinned water O-H chain + Z recovery
    // ═══════════════════════════════════════════════════════════════
    println!();
    println!("  ── Coulomb matrix control values ──");
    let coulomb = data::load_coulomb_set(&discovery::coulomb_fixture_path())
        .expect("Failed to load Coulomb fixtures");
    println!("  Coulomb molecules: {}", coulomb.len());
    harness.check_count("Coulomb molecule count", coulomb.len(), 5);

    let water = coulomb
        .iter()
        .find(|r| r.name == "water")
        .expect("water fixture missing");
    let water_matrix = water.to_matrix().expect("water matrix invalid");
    let entry = water_matrix.at(0, 1);
    println!("  water O-H entry: {entry:.15}");
    harness.check_abs("water O-H Coulomb entry", entry, WATER_OH_COULOMB_ENTRY, EXACT_F64);

    let z_o = atomic_number_from_diagonal(water_matrix.at(0, 0));
    let z_h = atomic_number_from_diagonal(water_matrix.at(1, 1));
    harness.check_count("water oxygen Z", z_o as usize, 8);
    harness.check_count("water hydrogen Z", z_h as usize, 1);

    let recovered = f64::from(z_o * z_h) / entry;
    println!("  recovered O-H distance: {recovered:.15} bohr");
    harness.check_abs(
        "recovered O-H distance (bohr)",
        recovered,
        WATER_OH_DISTANCE_BOHR,
        EXACT_F64,
    );
    harness.check_abs(
        "pinned bond length × bohr factor",
        WATER_OH_BOND_ANGSTROM * ANGSTROM_TO_BOHR,
        WATER_OH_DISTANCE_BOHR,
        EXACT_F64,
    );

    let expansion = gauss_expand(
        recovered,
        DEFAULT_N_DISTANCE,
        DEFAULT_DISTANCE_MIN,
        DEFAULT_DISTANCE_MAX,
    );
    let (peak_bin, peak_value) = expansion
        .iter()
        .enumerate()
        .fold((0, f64::MIN), |acc, (i, &v)| if v > acc.1 { (i, v) } else { acc });
    println!("  expansion peak: bin {peak_bin}, value {peak_value:.15}");
    harness.check_count("O-H expansion peak bin", peak_bin, WATER_OH_PEAK_BIN);
    harness.check_abs(
        "O-H expansion peak value",
        peak_value,
        WATER_OH_PEAK_VALUE,
        CONTROL_PARITY_F64,
    );

    let mut max_residual = 0.0_f64;
    for record in &coulomb {
        let matrix = record.to_matrix().expect("fixture matrix invalid");
        let mut all_match = true;
        for (i, symbol) in record.elements.iter().enumerate() {
            let c = matrix.at(i, i);
            let raw = (c / COULOMB_DIAG_PREFACTOR).powf(1.0 / COULOMB_DIAG_EXPONENT);
            max_residual = max_residual.max((raw - raw.round()).abs());
            if atomic_number_from_diagonal(c) != atomic_number(symbol) {
                all_match = false;
            }
        }
        harness.check_bool(&format!("Z recovery: {}", record.name), all_match);
    }
    println!("  max Z recovery residual: {max_residual:.3e}");
    harness.check_abs("Z recovery residual", max_residual, 0.0, ATOM_NUMBER_RECOVERY);

    // ═══════════════════════════════════════════════════════════════
    // DTNN batch encoding: padding masks over the full Coulomb set
    // ═══════════════════════════════════════════════════════════════
    println!();
    println!("  ── DTNN batch encoding ──");
    let matrices: Vec<CoulombMatrix> = coulomb
        .iter()
        .map(|r| r.to_matrix().expect("fixture matrix invalid"))
        .collect();
    let max_atoms = matrices.iter().map(CoulombMatrix::size).max().unwrap_or(1);
    let dtnn = DtnnTopology::new(max_atoms);
    let dtnn_feed = dtnn.batch_to_feed(&matrices).expect("DTNN encoding failed");
    println!("  Padded size: {max_atoms}   feed slots: {}", dtnn_feed.len());
    harness.check_count("DTNN feed slot count", dtnn_feed.len(), 4);

    let mask = dtnn_feed
        .get("dtnn/atom_mask")
        .and_then(Tensor::as_f64)
        .expect("atom_mask slot missing");
    let live: f64 = mask.data().iter().sum();
    let coulomb_atoms: usize = coulomb.iter().map(|r| r.elements.len()).sum();
    println!("  live atoms in mask: {live}   expected: {coulomb_atoms}");
    harness.check_abs("atom mask live count", live, coulomb_atoms as f64, 0.5);

    let pair_mask = dtnn_feed
        .get("dtnn/distance_matrix_mask")
        .and_then(Tensor::as_f64)
        .expect("distance_matrix_mask slot missing");
    let n = max_atoms;
    let mut symmetric = true;
    let mut diagonal_zero = true;
    for b in 0..matrices.len() {
        for i in 0..n {
            if pair_mask.data()[(b * n + i) * n + i] != 0.0 {
                diagonal_zero = false;
            }
            for j in 0..n {
                if pair_mask.data()[(b * n + i) * n + j] != pair_mask.data()[(b * n + j) * n + i] {
                    symmetric = false;
                }
            }
        }
    }
    harness.check_bool("pair mask symmetric", symmetric);
    harness.check_bool("pair mask diagonal zero", diagonal_zero);

    println!();
    println!("  Total: {}/{} checks", harness.passed_count(), harness.total_count());
    harness.finish();
}
