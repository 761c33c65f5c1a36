use std::fs;
use std::path::{Path, PathBuf};

use crate::contents::checkpoints::CHECKPOINT_DIR;
use crate::contents::error::Result;

/// A bundle located on disk: a directory named after its document, holding a
/// primary file of the identical name plus zero or more sidecar files.
#[derive(Debug, Clone)]
pub struct Bundle {
    /// Document name, e.g. `report.ipynb`
    name: String,
    /// Directory that contains the bundle directory
    parent_dir: PathBuf,
}

/// The sole existence predicate for "is this directory a bundle": the
/// directory contains a file whose name equals the directory's own basename.
/// An empty directory with the right name is not a bundle.
pub fn is_bundle_dir(os_path: &Path) -> bool {
    let Some(name) = os_path.file_name() else {
        return false;
    };
    os_path.is_dir() && os_path.join(name).is_file()
}

impl Bundle {
    pub fn new(name: impl Into<String>, parent_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            parent_dir: parent_dir.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bundle directory itself: `<parent>/<name>`.
    pub fn dir(&self) -> PathBuf {
        self.parent_dir.join(&self.name)
    }

    /// The primary document file: `<parent>/<name>/<name>`.
    pub fn primary_path(&self) -> PathBuf {
        self.dir().join(&self.name)
    }

    /// Where this bundle's checkpoints live.
    pub fn checkpoint_dir(&self) -> PathBuf {
        self.dir().join(CHECKPOINT_DIR)
    }

    pub fn exists(&self) -> bool {
        is_bundle_dir(&self.dir())
    }

    /// Sidecar filenames: every file directly inside the bundle directory
    /// other than the primary document. Non-recursive; the checkpoint
    /// subdirectory is not a file and never appears.
    pub fn sidecars(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(self.dir())? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if file_name != self.name {
                names.push(file_name);
            }
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_bundle_dir() {
        let temp = tempfile::TempDir::new().unwrap();
        let dir = temp.path().join("n.ipynb");

        // plain file is not a bundle
        fs::write(&dir, b"{}").unwrap();
        assert!(!is_bundle_dir(&dir));
        fs::remove_file(&dir).unwrap();

        // empty directory with the right name is not a bundle
        fs::create_dir(&dir).unwrap();
        assert!(!is_bundle_dir(&dir));

        // directory plus same-named file is
        fs::write(dir.join("n.ipynb"), b"{}").unwrap();
        assert!(is_bundle_dir(&dir));
    }

    #[test]
    fn test_sidecars_exclude_primary_and_subdirs() {
        let temp = tempfile::TempDir::new().unwrap();
        let bundle = Bundle::new("n.ipynb", temp.path());
        fs::create_dir(bundle.dir()).unwrap();
        fs::write(bundle.primary_path(), b"{}").unwrap();
        fs::write(bundle.dir().join("data.py"), b"# data").unwrap();
        fs::write(bundle.dir().join("notes.md"), b"notes").unwrap();
        fs::create_dir(bundle.checkpoint_dir()).unwrap();

        assert!(bundle.exists());
        assert_eq!(bundle.sidecars().unwrap(), vec!["data.py", "notes.md"]);
    }
}
