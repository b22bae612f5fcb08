//! Storage permission adapters.
//!
//! On a desktop there is no runtime permission dialog: access to the shared
//! directory is "granted" when the process can write there.  `request` cannot
//! change that, so it only tells the user what to fix.

pub mod mock;

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::application::sync_settings::StoragePermission;
use crate::infrastructure::storage::base_dir::can_create_in;

/// Grants access when the shared directory is writable or can be created.
#[derive(Debug, Clone)]
pub struct DirectoryAccessPermission {
    dir: PathBuf,
}

impl DirectoryAccessPermission {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl StoragePermission for DirectoryAccessPermission {
    fn is_granted(&self) -> bool {
        writable_or_creatable(&self.dir)
    }

    fn request(&self) {
        warn!(
            "no write access to {}; grant access and repeat the command",
            self.dir.display()
        );
    }
}

/// An existing directory must accept new files; a missing one needs its
/// nearest existing ancestor to.  Leaves no directory or file behind.
fn writable_or_creatable(dir: &Path) -> bool {
    match dir.ancestors().find(|path| path.exists()) {
        Some(existing) => existing.is_dir() && can_create_in(existing),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_existing_directory_is_granted() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(DirectoryAccessPermission::new(dir.path()).is_granted());
    }

    #[test]
    fn test_missing_directory_under_writable_parent_is_granted_without_creating() {
        // Arrange
        let root = tempfile::tempdir().expect("tempdir");
        let shared = root.path().join("DCIM").join("Camera1");

        // Act
        let granted = DirectoryAccessPermission::new(&shared).is_granted();

        // Assert
        assert!(granted);
        assert!(!shared.exists());
    }

    #[test]
    fn test_path_below_a_file_is_not_granted() {
        let root = tempfile::tempdir().expect("tempdir");
        let file = root.path().join("blocker");
        std::fs::write(&file, b"").unwrap();

        assert!(!DirectoryAccessPermission::new(file.join("Camera1")).is_granted());
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_the_process_cannot_write_is_not_granted() {
        use std::os::unix::fs::PermissionsExt;

        // Arrange: the shared dir exists, but its write bits are cleared.
        let root = tempfile::tempdir().expect("tempdir");
        let shared = root.path().join("Camera1");
        std::fs::create_dir(&shared).unwrap();
        std::fs::set_permissions(&shared, std::fs::Permissions::from_mode(0o555)).unwrap();
        if std::fs::write(shared.join("x"), b"").is_ok() {
            // Privileged process: mode bits are not enforced.
            return;
        }

        // Act
        let granted = DirectoryAccessPermission::new(&shared).is_granted();
        let below = DirectoryAccessPermission::new(shared.join("sub")).is_granted();
        std::fs::set_permissions(&shared, std::fs::Permissions::from_mode(0o755)).unwrap();

        // Assert
        assert!(!granted);
        assert!(!below);
    }
}
