//! Mock storage permission for tests.
//!
//! The real gate depends on file-system permissions of the test machine.
//! `MockStoragePermission` answers from a flag the test controls and counts
//! every `request` so assertions can check that a request went out exactly
//! once.
//!
//! # Usage in tests
//!
//! ```ignore
//! let permission = MockStoragePermission::denied();
//! let mut controller = SettingsController::new(&mut store, &flags, &permission, &videos);
//!
//! controller.toggle_flag(ControlFlag::ForceShow, true)?;
//! assert_eq!(permission.request_count(), 1);
//!
//! permission.grant();
//! controller.on_permission_result(true);
//! ```

use std::cell::Cell;

use crate::application::sync_settings::StoragePermission;

/// A permission gate that records requests instead of prompting anyone.
#[derive(Debug, Default)]
pub struct MockStoragePermission {
    granted: Cell<bool>,
    requests: Cell<usize>,
}

impl MockStoragePermission {
    /// A gate that reports access as granted.
    pub fn granted() -> Self {
        Self {
            granted: Cell::new(true),
            requests: Cell::new(0),
        }
    }

    /// A gate that reports access as missing.
    pub fn denied() -> Self {
        Self::default()
    }

    /// Flips the gate to granted, as if the user accepted the prompt.
    pub fn grant(&self) {
        self.granted.set(true);
    }

    /// Number of `request` calls so far.
    pub fn request_count(&self) -> usize {
        self.requests.get()
    }
}

impl StoragePermission for MockStoragePermission {
    fn is_granted(&self) -> bool {
        self.granted.get()
    }

    fn request(&self) {
        self.requests.set(self.requests.get() + 1);
    }
}
