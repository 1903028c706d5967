//! Per-job scratch storage.
//!
//! Each merge job gets its own [`ScratchArena`]: a uniquely named directory
//! under the configured scratch root, deleted when the arena is dropped, on
//! success and on every failure path alike, so repeated failures cannot grow
//! the disk. Distinct jobs therefore never share scratch files, and the root
//! only needs to tolerate concurrent distinct subdirectories.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;
use uuid::Uuid;

use crate::error::{MergeError, Result};

/// Scoped scratch directory for one job. Removed on drop.
pub struct ScratchArena {
    dir: TempDir,
}

impl ScratchArena {
    /// Create an arena under `root` for the given job. The root directory is
    /// created if absent (idempotent setup).
    pub fn create(root: &Path, job_id: &str) -> Result<Self> {
        fs::create_dir_all(root).map_err(|e| MergeError::io(root, e))?;
        let dir = tempfile::Builder::new()
            .prefix(&format!("job-{job_id}-"))
            .tempdir_in(root)
            .map_err(|e| MergeError::io(root, e))?;
        debug!(path = %dir.path().display(), job_id, "Created scratch arena");
        Ok(ScratchArena { dir })
    }

    /// Path of the arena directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Reserve a collision-free scratch file path with the given stem and
    /// extension. The random suffix keeps concurrent fetches from ever
    /// interfering, even for identical source URLs.
    pub fn unique_file(&self, stem: &str, ext: &str) -> PathBuf {
        self.dir
            .path()
            .join(format!("{stem}-{}.{ext}", Uuid::new_v4()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_is_idempotent_for_missing_root() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("scratch").join("deep");

        let arena = ScratchArena::create(&nested, "job-1").expect("arena under missing root");
        assert!(arena.path().starts_with(&nested));

        // A second arena for the same root (root now exists) must also work.
        let again = ScratchArena::create(&nested, "job-1").expect("arena under existing root");
        assert_ne!(arena.path(), again.path());
    }

    #[test]
    fn unique_file_names_never_collide() {
        let root = tempfile::tempdir().unwrap();
        let arena = ScratchArena::create(root.path(), "abc123").unwrap();

        let a = arena.unique_file("module_0", "docx");
        let b = arena.unique_file("module_0", "docx");
        assert_ne!(a, b);
        assert!(a.extension().is_some_and(|e| e == "docx"));
    }

    #[test]
    fn arena_is_removed_on_drop() {
        let root = tempfile::tempdir().unwrap();
        let path = {
            let arena = ScratchArena::create(root.path(), "abc123").unwrap();
            std::fs::write(arena.unique_file("template", "docx"), b"bytes").unwrap();
            arena.path().to_path_buf()
        };
        assert!(!path.exists(), "arena directory must be deleted on drop");
    }
}
