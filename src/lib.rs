// SPDX-License-Identifier: AGPL-3.0-only

//! deepWell Manta — quantum chemistry featurization and DFT regression environment
//!
//! Validates the Manta tensor-feed encoders against deepWell Python controls
//! using QM molecular workloads (graph topology, DTNN Coulomb featurization,
//! density-profile functional fitting).
//!
//! ## Active modules
//!   - `feed` — typed tensor slots and ordered feed maps
//!   - `graph` — degree-bucketed graph topology and DTNN Coulomb encoders
//!   - `dft` — density-profile loss and recorded-SCF replay
//!   - `data` — QM fixture records and minibatch encoding drivers
//!   - `discovery` — fixture root discovery (env override, manifest, cwd)
//!   - `provenance` — pinned control baselines with generation records
//!   - `validation` — check harness shared by the validation binaries
//!
//! ## Validation binaries
//!   - `validate_featurize` — graph/DTNN encoders against RDKit-derived fixtures
//!   - `validate_density_profile` — profile loss against the pinned control value

pub mod constants;
pub mod data;
pub mod dft;
pub mod discovery;
pub mod error;
pub mod feed;
pub mod graph;
pub mod provenance;
pub mod tolerances;
pub mod validation;
