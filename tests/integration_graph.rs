// SPDX-License-Identifier: AGPL-3.0-only

//! Integration tests: degree-bucketed graph topology encoding public API.
//!
//! Validates the merged-batch contract end to end: bucket partition, adjacency
//! indices in merged space, membership, namespacing across encoder instances,
//! and typed fail-fast rejection of malformed batches.

use deepwell_manta::error::DeepWellError;
use deepwell_manta::feed::{FeedMap, Tensor};
use deepwell_manta::graph::mol::MolGraph;
use deepwell_manta::graph::GraphTopology;

/// Methane-shaped graph: one degree-4 carbon, four degree-1 hydrogens.
fn methane() -> MolGraph {
    MolGraph::new(
        1,
        vec![vec![6.0], vec![1.0], vec![1.0], vec![1.0], vec![1.0]],
        vec![vec![1, 2, 3, 4], vec![0], vec![0], vec![0], vec![0]],
    )
    .expect("valid molecule")
}

/// Diatomic graph: two degree-1 atoms.
fn hydrogen_fluoride() -> MolGraph {
    MolGraph::new(1, vec![vec![9.0], vec![1.0]], vec![vec![1], vec![0]]).expect("valid molecule")
}

fn tensor<'a>(feed: &'a FeedMap, name: &str) -> &'a Tensor {
    feed.get(name).expect("slot present")
}

fn i32_data<'a>(feed: &'a FeedMap, name: &str) -> &'a [i32] {
    tensor(feed, name).as_i32().expect("i32 tensor").data()
}

fn f64_data<'a>(feed: &'a FeedMap, name: &str) -> &'a [f64] {
    tensor(feed, name).as_f64().expect("f64 tensor").data()
}

#[test]
fn merged_batch_partitions_by_degree() {
    let topo = GraphTopology::new(1).with_degree_range(0, 4);
    let feed = topo
        .batch_to_feed(&[methane(), hydrogen_fluoride()])
        .expect("encoding succeeds");

    // 7 atoms total: 6 of degree 1, then the carbon of degree 4.
    let slice = i32_data(&feed, "topology/deg_slice");
    assert_eq!(slice, &[0, 0, 0, 6, 6, 0, 6, 0, 6, 1]);
    assert_eq!(tensor(&feed, "topology/deg_slice").shape(), &[5, 2]);

    let membership = i32_data(&feed, "topology/membership");
    assert_eq!(membership, &[0, 0, 0, 0, 1, 1, 0]);
}

#[test]
fn adjacency_points_into_merged_space() {
    let topo = GraphTopology::new(1).with_degree_range(0, 4);
    let feed = topo
        .batch_to_feed(&[methane(), hydrogen_fluoride()])
        .expect("encoding succeeds");

    // Hydrogens point at the carbon (merged row 6); the diatomic pair point
    // at each other (merged rows 5 and 4).
    assert_eq!(i32_data(&feed, "topology/deg_adj_1"), &[6, 6, 6, 6, 5, 4]);
    assert_eq!(tensor(&feed, "topology/deg_adj_1").shape(), &[6, 1]);

    // The carbon's row lists its four hydrogens in merged space.
    assert_eq!(i32_data(&feed, "topology/deg_adj_4"), &[0, 1, 2, 3]);
    assert_eq!(tensor(&feed, "topology/deg_adj_4").shape(), &[1, 4]);

    // Intermediate degree buckets are empty but still present.
    assert_eq!(tensor(&feed, "topology/deg_adj_2").shape(), &[0, 2]);
    assert_eq!(tensor(&feed, "topology/deg_adj_3").shape(), &[0, 3]);
}

#[test]
fn feature_rows_follow_merged_order() {
    let topo = GraphTopology::new(1).with_degree_range(0, 4);
    let feed = topo
        .batch_to_feed(&[methane(), hydrogen_fluoride()])
        .expect("encoding succeeds");

    let features = f64_data(&feed, "topology/atom_features");
    assert_eq!(features, &[1.0, 1.0, 1.0, 1.0, 9.0, 1.0, 6.0]);
    assert_eq!(tensor(&feed, "topology/atom_features").shape(), &[7, 1]);
}

#[test]
fn two_instances_namespace_their_slots() {
    let conv1 = GraphTopology::new(1).with_degree_range(0, 4).with_name("conv1");
    let conv2 = GraphTopology::new(1).with_degree_range(0, 4).with_name("conv2");
    let batch = [methane(), hydrogen_fluoride()];

    let merged = FeedMap::merge_all([
        conv1.batch_to_feed(&batch).expect("conv1 encodes"),
        conv2.batch_to_feed(&batch).expect("conv2 encodes"),
    ]);

    assert_eq!(merged.len(), conv1.slots().len() + conv2.slots().len());
    assert!(merged.get("conv1/atom_features").is_some());
    assert!(merged.get("conv2/atom_features").is_some());
    assert!(merged.get("topology/atom_features").is_none());
}

#[test]
fn re_encoding_is_bit_identical() {
    let topo = GraphTopology::new(1).with_degree_range(0, 4);
    let batch = [methane(), hydrogen_fluoride()];
    let first = topo.batch_to_feed(&batch).expect("encoding succeeds");
    let second = topo.batch_to_feed(&batch).expect("encoding succeeds");
    assert_eq!(first, second);
}

#[test]
fn tensors_conform_to_advertised_slots() {
    let topo = GraphTopology::new(1).with_degree_range(0, 4);
    let feed = topo
        .batch_to_feed(&[methane(), hydrogen_fluoride()])
        .expect("encoding succeeds");

    assert_eq!(feed.len(), topo.slots().len());
    for spec in topo.slots() {
        let t = feed.get(&spec.name).expect("every advertised slot is filled");
        assert!(t.conforms_to(&spec), "{} violates its spec", spec.name);
    }
}

#[test]
fn single_molecule_batch_keeps_local_structure() {
    let topo = GraphTopology::new(1).with_degree_range(0, 1);
    let feed = topo
        .batch_to_feed(&[hydrogen_fluoride()])
        .expect("encoding succeeds");

    assert_eq!(i32_data(&feed, "topology/deg_slice"), &[0, 0, 0, 2]);
    assert_eq!(i32_data(&feed, "topology/membership"), &[0, 0]);
    assert_eq!(i32_data(&feed, "topology/deg_adj_1"), &[1, 0]);
}

#[test]
fn degree_overflow_is_typed_and_fail_fast() {
    let topo = GraphTopology::new(1).with_degree_range(0, 2);
    let err = topo
        .batch_to_feed(&[hydrogen_fluoride(), methane()])
        .expect_err("carbon degree 4 exceeds max_deg 2");
    match err {
        DeepWellError::DegreeOverflow {
            molecule,
            atom,
            degree,
            max_deg,
        } => {
            assert_eq!(molecule, 1);
            assert_eq!(atom, 0);
            assert_eq!(degree, 4);
            assert_eq!(max_deg, 2);
        }
        other => panic!("expected DegreeOverflow, got {other:?}"),
    }
}

#[test]
fn degree_underflow_is_typed_and_fail_fast() {
    let topo = GraphTopology::new(1).with_degree_range(2, 4);
    let err = topo
        .batch_to_feed(&[methane()])
        .expect_err("hydrogens of degree 1 fall below min_deg 2");
    assert!(matches!(
        err,
        DeepWellError::DegreeUnderflow {
            molecule: 0,
            atom: 1,
            degree: 1,
            min_deg: 2,
        }
    ));
}

#[test]
fn empty_batch_is_rejected() {
    let topo = GraphTopology::new(1);
    let err = topo.batch_to_feed(&[]).expect_err("empty batch is an error");
    assert!(matches!(err, DeepWellError::EmptyBatch));
}

#[test]
fn feature_width_mismatch_names_the_molecule() {
    let topo = GraphTopology::new(3).with_degree_range(0, 4);
    let err = topo
        .batch_to_feed(&[methane()])
        .expect_err("1-wide features against a 3-wide encoder");
    assert!(matches!(
        err,
        DeepWellError::FeatureWidthMismatch {
            molecule: 0,
            expected: 3,
            got: 1,
        }
    ));
}
