//! Where the properties file, the videos and the marker files live.
//!
//! ```text
//! <private dir>/VCAM/                 preferred base dir (if writable)
//! <public root>/DCIM/Camera1/         shared dir: marker files, fallback base dir
//! ```

use std::path::{Path, PathBuf};

use tracing::debug;

/// Sub-directory of the app-private directory used as base dir.
pub const PRIVATE_SUBDIR: &str = "VCAM";

/// Shared camera directory under the public storage root.
pub fn shared_dir(public_root: &Path) -> PathBuf {
    public_root.join("DCIM").join("Camera1")
}

/// Picks the base directory for the properties file and videos.
///
/// `<private>/VCAM` wins when `private` is set and writable (creating the
/// sub-directory if needed); otherwise the shared directory is used.
pub fn resolve_base_dir(private: Option<&Path>, public_root: &Path) -> PathBuf {
    if let Some(private) = private {
        let candidate = private.join(PRIVATE_SUBDIR);
        if is_writable_dir(&candidate) {
            return candidate;
        }
        debug!(
            "private dir {} not writable, using shared dir",
            candidate.display()
        );
    }
    shared_dir(public_root)
}

/// Returns `true` when `dir` exists (or can be created) and this process can
/// create files in it.
pub(crate) fn is_writable_dir(dir: &Path) -> bool {
    if std::fs::create_dir_all(dir).is_err() {
        return false;
    }
    dir.is_dir() && can_create_in(dir)
}

/// Tries to create (and drop) a scratch file in `dir`.
///
/// Permission bits alone do not say whether *this* process may write: the
/// owner, ACLs and read-only mounts all matter, so access is decided by
/// attempting it.
pub(crate) fn can_create_in(dir: &Path) -> bool {
    match tempfile::Builder::new().prefix(".vcam-access").tempfile_in(dir) {
        Ok(_) => true,
        Err(e) => {
            debug!("cannot create files in {}: {e}", dir.display());
            false
        }
    }
}
