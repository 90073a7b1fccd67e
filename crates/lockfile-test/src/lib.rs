#![deny(clippy::all)]
//! End-to-end tests for lockfile reading and writing
//!
//! Runs the whole read, write, read cycle over the lockfiles in the
//! repository's `fixtures/` directory. `fixtures/invalid/` holds lockfiles
//! that must be rejected.

use std::path::{Path, PathBuf};

/// The repository's `fixtures/` directory
pub fn fixtures_dir() -> PathBuf {
  Path::new(env!("CARGO_MANIFEST_DIR"))
    .parent()
    .and_then(Path::parent)
    .map(|root| root.join("fixtures"))
    .unwrap_or_else(|| panic!("crate is not inside a workspace"))
}

/// Load a fixture file from the fixtures directory
pub fn load_fixture(filename: &str) -> String {
  load_fixture_from_path(&fixtures_dir().join(filename))
}

/// Load a fixture file from a path
pub fn load_fixture_from_path(fixture_path: &Path) -> String {
  std::fs::read_to_string(fixture_path).unwrap_or_else(|e| {
    panic!(
      "Failed to read fixture file {}: {}",
      fixture_path.display(),
      e
    )
  })
}
