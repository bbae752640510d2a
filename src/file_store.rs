//! Generated-file layout.
//!
//! All pipeline output lands under one injected root directory:
//! `<root>/contract_{number}.pdf` for the PDFs and `<root>/originals/` for
//! the original-format artifacts and intermediate HTML. The root is passed in
//! explicitly (never ambient state) so tests can run against an isolated
//! directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const STORE_DIR_ENV: &str = "LEASE_STORE_DIR";
const DEFAULT_DIR_NAME: &str = "lease_contracts";

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root from `LEASE_STORE_DIR`, falling back to
    /// `<system tmp>/lease_contracts`.
    pub fn from_env() -> Self {
        match std::env::var(STORE_DIR_ENV) {
            Ok(dir) if !dir.is_empty() => Self::new(dir),
            _ => Self::new(std::env::temp_dir().join(DEFAULT_DIR_NAME)),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn pdf_path(&self, contract_number: &str) -> PathBuf {
        self.root.join(format!("contract_{contract_number}.pdf"))
    }

    pub fn originals_dir(&self) -> PathBuf {
        self.root.join("originals")
    }

    pub fn original_path(&self, filename: &str) -> PathBuf {
        self.originals_dir().join(filename)
    }

    /// Create the directory layout. Safe to call on every generation run.
    pub fn ensure_layout(&self) -> io::Result<()> {
        fs::create_dir_all(self.originals_dir())
    }

    pub fn write_pdf(&self, contract_number: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let path = self.pdf_path(contract_number);
        fs::write(&path, bytes)?;
        Ok(path)
    }

    pub fn write_original(&self, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let path = self.original_path(filename);
        fs::write(&path, bytes)?;
        Ok(path)
    }
}

/// Best-effort deletion for stale artifacts. Cleanup failures are logged and
/// never abort the surrounding operation.
pub fn remove_quietly(path: &Path) {
    if !path.exists() {
        return;
    }
    if let Err(err) = fs::remove_file(path) {
        log::error!("failed to delete {}: {err}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_layout() {
        let store = FileStore::new("/tmp/lease_test_root");
        assert_eq!(
            store.pdf_path("20240401-0001"),
            PathBuf::from("/tmp/lease_test_root/contract_20240401-0001.pdf")
        );
        assert_eq!(
            store.original_path("contract_20240401-0001.xlsx"),
            PathBuf::from("/tmp/lease_test_root/originals/contract_20240401-0001.xlsx")
        );
    }

    #[test]
    fn test_ensure_layout_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("out"));
        store.ensure_layout().unwrap();
        store.ensure_layout().unwrap();
        assert!(store.originals_dir().is_dir());
    }

    #[test]
    fn test_write_pdf_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.ensure_layout().unwrap();

        store.write_pdf("X-1", b"first").unwrap();
        let path = store.write_pdf("X-1", b"second").unwrap();
        assert_eq!(fs::read(path).unwrap(), b"second");
    }

    #[test]
    fn test_remove_quietly_missing_file() {
        remove_quietly(Path::new("/nonexistent/contract_none.pdf"));
    }
}
