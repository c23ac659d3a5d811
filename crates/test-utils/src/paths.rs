//! Scratch directories for tests that write downloads to disk.

use std::path::PathBuf;

/// Creates a temporary directory for test output.
///
/// The directory is automatically cleaned up when the returned `TempDir` is dropped.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary test directory")
}

/// A path `depth` directories below `root` that does not exist yet.
///
/// ```
/// use test_utils::{nested_path, temp_test_dir};
///
/// let dir = temp_test_dir();
/// let path = nested_path(dir.path(), 2, "annotation_25.nrrd");
/// assert!(!path.parent().unwrap().exists());
/// ```
pub fn nested_path(root: &std::path::Path, depth: usize, file_name: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    for level in 0..depth {
        path.push(format!("level_{}", level));
    }
    path.join(file_name)
}
