// Shared helpers for integration tests.
//
// Provides a temporary directory for on-disk INI files and the reference
// document used across the suites.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// The reference document: one main-section item and one named section.
pub const REFERENCE: &str =
    "M_K1=Main Section String\n[Section1]\nS1_K1=Section 1 String\nS1_K2=12345\n";

/// A scratch directory backed by a [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped.
pub struct TempIni {
    /// Temporary directory holding the test files.
    pub dir: tempfile::TempDir,
}

impl TempIni {
    /// Create an empty scratch directory.
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Path of `name` inside the scratch directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write raw bytes to `name` and return its path.
    pub fn write(&self, name: &str, bytes: impl AsRef<[u8]>) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, bytes).expect("write test file");
        path
    }

    /// Read the raw bytes of a file.
    pub fn read(path: &Path) -> Vec<u8> {
        std::fs::read(path).expect("read test file")
    }
}
