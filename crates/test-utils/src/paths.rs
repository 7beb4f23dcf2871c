//! Locating optional sample files and scratch directories.

use std::path::{Path, PathBuf};

/// Environment variable naming an extra directory of sample images.
pub const TEST_DATA_ENV: &str = "TEST_DATA_DIR";

/// Workspace root: two levels above this crate's manifest.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .ancestors()
        .nth(2)
        .unwrap_or(manifest_dir)
        .to_path_buf()
}

/// Directories searched for sample images, in priority order.
///
/// `$TEST_DATA_DIR` first when set, then `crates/heif-map/testdata/`, then
/// `testdata/` at the workspace root.
pub fn sample_dirs() -> Vec<PathBuf> {
    let root = workspace_root();
    std::env::var_os(TEST_DATA_ENV)
        .map(PathBuf::from)
        .into_iter()
        .chain([
            root.join("crates").join("heif-map").join("testdata"),
            root.join("testdata"),
        ])
        .collect()
}

/// First existing file called `name` in [`sample_dirs`].
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    sample_dirs()
        .into_iter()
        .map(|dir| dir.join(name))
        .find(|path| path.is_file())
}

/// Scratch directory removed when the handle drops.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix("heif_map_test_")
        .tempdir()
        .expect("Failed to create temporary test directory")
}
