//! Marker files on disk.
//!
//! Each [`ControlFlag`] is a zero-byte file in the shared directory.  The file
//! content is never written or read; only its existence matters.

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;
use vcam_core::ControlFlag;

use crate::application::sync_settings::{FlagError, FlagStore};

/// [`FlagStore`] over a real directory.
#[derive(Debug, Clone)]
pub struct FsFlagStore {
    dir: PathBuf,
}

impl FsFlagStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the marker file for `flag`.
    pub fn path_of(&self, flag: ControlFlag) -> PathBuf {
        self.dir.join(flag.file_name())
    }
}

impl FlagStore for FsFlagStore {
    fn is_set(&self, flag: ControlFlag) -> bool {
        self.path_of(flag).exists()
    }

    fn set(&self, flag: ControlFlag) -> Result<(), FlagError> {
        let path = self.path_of(flag);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => {
                debug!("created {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
            Err(source) => Err(FlagError::Io { path, source }),
        }
    }

    fn clear(&self, flag: ControlFlag) -> Result<(), FlagError> {
        let path = self.path_of(flag);
        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!("deleted {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(FlagError::Io { path, source }),
        }
    }

    fn ensure_dir(&self) -> Result<(), FlagError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| FlagError::Io {
            path: self.dir.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn store() -> (tempfile::TempDir, FsFlagStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let flags = FsFlagStore::new(dir.path());
        (dir, flags)
    }

    #[test]
    fn test_set_creates_exactly_one_empty_file() {
        // Arrange
        let (dir, flags) = store();

        // Act
        flags.set(ControlFlag::ForceShow).unwrap();

        // Assert
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["force_show.jpg"]);
        assert_eq!(fs::metadata(flags.path_of(ControlFlag::ForceShow)).unwrap().len(), 0);
        assert!(flags.is_set(ControlFlag::ForceShow));
    }

    #[test]
    fn test_set_existing_marker_leaves_it_untouched() {
        // Arrange: a marker with content and a known mtime.
        let (_dir, flags) = store();
        let path = flags.path_of(ControlFlag::PlaySound);
        fs::write(&path, b"keep").unwrap();
        let before = fs::metadata(&path).unwrap().modified().unwrap();

        // Act
        flags.set(ControlFlag::PlaySound).unwrap();

        // Assert
        let meta = fs::metadata(&path).unwrap();
        assert_eq!(meta.len(), 4);
        assert_eq!(meta.modified().unwrap(), before);
    }

    #[test]
    fn test_clear_removes_marker_and_tolerates_absence() {
        let (_dir, flags) = store();
        flags.set(ControlFlag::DisableToast).unwrap();

        flags.clear(ControlFlag::DisableToast).unwrap();
        flags.clear(ControlFlag::DisableToast).unwrap();

        assert!(!flags.is_set(ControlFlag::DisableToast));
    }

    #[test]
    fn test_marker_file_names_match_hooking_module() {
        let (dir, flags) = store();
        for flag in ControlFlag::ALL {
            flags.set(flag).unwrap();
        }
        for name in ["force_show.jpg", "disable.jpg", "no-silent.jpg", "private_dir.jpg", "no_toast.jpg"] {
            assert!(dir.path().join(name).exists(), "{name} missing");
        }
    }

    #[test]
    fn test_ensure_dir_creates_nested_directory() {
        // Arrange
        let root = tempfile::tempdir().expect("tempdir");
        let flags = FsFlagStore::new(root.path().join("DCIM").join("Camera1"));

        // Act
        flags.ensure_dir().unwrap();

        // Assert
        assert!(flags.dir().is_dir());
    }

    #[test]
    fn test_set_in_missing_directory_returns_io_error() {
        let root = tempfile::tempdir().expect("tempdir");
        let flags = FsFlagStore::new(root.path().join("absent"));

        let result = flags.set(ControlFlag::Disable);

        assert!(matches!(result, Err(FlagError::Io { .. })));
    }
}
