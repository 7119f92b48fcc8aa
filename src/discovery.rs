// SPDX-License-Identifier: AGPL-3.0-only

//! Runtime discovery of the fixture data root.
//!
//! Code has self-knowledge only and discovers resources at runtime. No
//! hardcoded absolute paths.
//!
//! # Discovery order
//!
//! 1. Environment variable (`DEEPWELL_DATA_ROOT`)
//! 2. `CARGO_MANIFEST_DIR` (development layout)
//! 3. Current working directory
//!
//! The first path containing a `data/` subdirectory wins. This replaces
//! scattered `PathBuf::from(env!("CARGO_MANIFEST_DIR"))` calls in
//! validation binaries with a single, overridable discovery.

use std::path::{Path, PathBuf};

/// Well-known fixture locations within the data root.
pub mod paths {
    /// Fixture data subdirectory
    pub const DATA_DIR: &str = "data";
    /// Molecular graph fixtures (one-hot features plus adjacency)
    pub const GRAPH_FIXTURES: &str = "data/qm_graphs.json";
    /// Coulomb matrix fixtures from CCCBDB equilibrium geometries
    pub const COULOMB_FIXTURES: &str = "data/coulomb_qm.json";
    /// Density-profile baseline entries
    pub const PROFILE_FIXTURES: &str = "data/density_profiles.json";
}

/// Discover the data root, returning an error if no valid root is found.
///
/// Checks, in order: `DEEPWELL_DATA_ROOT` env, manifest dir, CWD.
/// Returns the first path that contains a `data/` subdirectory.
///
/// # Errors
///
/// Returns `DeepWellError::DataLoad` if no path with a `data/` directory
/// can be found via any discovery strategy.
///
/// # Example
///
/// ```
/// use deepwell_manta::discovery::try_discover_data_root;
///
/// let result = try_discover_data_root();
/// // Succeeds when run from a checkout with data/; Err otherwise
/// if let Ok(root) = result {
///     assert!(root.join("data").is_dir());
/// }
/// ```
pub fn try_discover_data_root() -> Result<PathBuf, crate::error::DeepWellError> {
    try_discover_with_override(None)
}

/// Discover the data root with an optional override (capability injection).
///
/// When `override_root` is `Some`, it is checked first, before env vars,
/// manifest, or CWD. This enables pure, `unsafe`-free testing without
/// global env mutation.
///
/// # Errors
///
/// Returns `DeepWellError::DataLoad` if no valid root is found.
pub fn try_discover_with_override(
    override_root: Option<&Path>,
) -> Result<PathBuf, crate::error::DeepWellError> {
    // 0. Injected override (no global state)
    if let Some(root) = override_root {
        if is_valid_root(root) {
            return Ok(root.to_path_buf());
        }
    }

    // 1. Explicit environment override
    if let Ok(root) = std::env::var("DEEPWELL_DATA_ROOT") {
        let p = PathBuf::from(&root);
        if is_valid_root(&p) {
            return Ok(p);
        }
    }

    // 2. CARGO_MANIFEST_DIR (fixtures ship next to the manifest)
    let manifest_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    if is_valid_root(&manifest_root) {
        return Ok(manifest_root);
    }

    // 3. CWD
    if let Ok(cwd) = std::env::current_dir() {
        if is_valid_root(&cwd) {
            return Ok(cwd);
        }
    }

    Err(crate::error::DeepWellError::DataLoad(
        "no valid data root found (need directory with data/ subdirectory)".into(),
    ))
}

/// Discover the fixture data root directory.
///
/// Checks, in order:
/// 1. `DEEPWELL_DATA_ROOT` environment variable
/// 2. `CARGO_MANIFEST_DIR` (standard development layout)
/// 3. Current working directory
///
/// Returns the first path that contains a `data/` subdirectory. If no
/// valid root is found, falls back to the manifest dir (may fail
/// gracefully downstream).
#[must_use]
pub fn discover_data_root() -> PathBuf {
    try_discover_data_root().unwrap_or_else(|_| PathBuf::from(env!("CARGO_MANIFEST_DIR")))
}

/// Check if a directory looks like a valid fixture root.
pub(crate) fn is_valid_root(path: &Path) -> bool {
    path.join(paths::DATA_DIR).is_dir()
}

/// Fixture→path mapping for runtime probing.
const FIXTURE_PROBES: &[(&str, &str)] = &[
    ("molecular-graphs", paths::GRAPH_FIXTURES),
    ("coulomb-matrices", paths::COULOMB_FIXTURES),
    ("density-profiles", paths::PROFILE_FIXTURES),
];

/// Discover which fixture sets are available at runtime.
///
/// Probes the filesystem for known fixture files rather than assuming a
/// complete checkout.
#[must_use]
pub fn available_fixtures() -> Vec<&'static str> {
    let root = discover_data_root();
    FIXTURE_PROBES
        .iter()
        .filter(|(_, path)| root.join(path).is_file())
        .map(|(name, _)| *name)
        .collect()
}

/// Resolve the molecular graph fixture path.
#[must_use]
pub fn graph_fixture_path() -> PathBuf {
    discover_data_root().join(paths::GRAPH_FIXTURES)
}

/// Resolve the Coulomb matrix fixture path.
#[must_use]
pub fn coulomb_fixture_path() -> PathBuf {
    discover_data_root().join(paths::COULOMB_FIXTURES)
}

/// Resolve the density-profile baseline path.
#[must_use]
pub fn profile_fixture_path() -> PathBuf {
    discover_data_root().join(paths::PROFILE_FIXTURES)
}
