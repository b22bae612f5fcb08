//! SettingsController: the logic behind the settings screen.
//!
//! Every method is a discrete command handler for one UI event (a toggle
//! press, a text field losing focus, the screen resuming).  The controller
//! holds no copy of the displayed state: [`SettingsController::sync`] rebuilds
//! it from the marker files and the settings store each time, so files changed
//! by another process between two observations are always reflected.
//!
//! # Two toggle families (for beginners)
//!
//! | Toggle                          | Stored as                       |
//! |---------------------------------|---------------------------------|
//! | force-show, disable, play-sound, force-private-dir, disable-toast | existence of a marker file |
//! | show-fps, show-info-overlay, mute-audio | `true`/`false` in the properties file |
//!
//! Marker files live in a shared directory that needs a storage permission.
//! Before creating or deleting one, the controller asks the injected
//! [`StoragePermission`].  When it is missing the controller requests it,
//! queues a [`Notice`] for the user and leaves the file alone; the user has to
//! flip the toggle again once access is granted.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info, warn};
use vcam_core::settings::{clamp_volume, parse_field_int};
use vcam_core::{ConfigToggle, ControlFlag, SelectionError, SettingsStore, ToggleTarget};

use super::select_video::{self, VideoChoices, VideoSource};

/// Error type for marker-file operations.
#[derive(Debug, Error)]
pub enum FlagError {
    /// Creating, deleting or inspecting a marker file failed.
    #[error("I/O error on marker file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Presence/absence store for marker files.
///
/// Implementations map each [`ControlFlag`] to a file in the shared directory.
/// Callers never see paths.
#[cfg_attr(test, mockall::automock)]
pub trait FlagStore {
    /// Returns `true` when the marker file for `flag` exists right now.
    fn is_set(&self, flag: ControlFlag) -> bool;

    /// Creates the empty marker file for `flag` if it is absent.
    fn set(&self, flag: ControlFlag) -> Result<(), FlagError>;

    /// Deletes the marker file for `flag` if it is present.
    fn clear(&self, flag: ControlFlag) -> Result<(), FlagError>;

    /// Creates the shared directory if it does not exist yet.
    fn ensure_dir(&self) -> Result<(), FlagError>;
}

/// Gate for read/write access to the shared directory.
pub trait StoragePermission {
    /// Returns `true` when storage access is currently granted.
    fn is_granted(&self) -> bool;

    /// Asks the platform (or the user) to grant storage access.
    ///
    /// The answer arrives later through
    /// [`SettingsController::on_permission_result`].
    fn request(&self);
}

/// User-facing message queued by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Storage access is needed and has just been requested.
    PermissionRequired,
    /// The storage access request was refused.
    PermissionDenied,
    /// The video directory holds no selectable video.
    NoVideosFound,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Notice::PermissionRequired => {
                "storage permission is missing; read/write access to the shared camera \
                 directory is needed to change this setting"
            }
            Notice::PermissionDenied => {
                "storage permission was denied; marker-file settings cannot be changed"
            }
            Notice::NoVideosFound => "no .mp4 videos found in the video directory",
        };
        f.write_str(text)
    }
}

/// Result of a toggle command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The stored state was changed.
    Applied,
    /// The marker already had the requested state; nothing was written.
    Unchanged,
    /// Storage access is missing; a request was issued and nothing was written.
    PermissionRequested,
}

/// Displayed state of one marker flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagState {
    pub flag: ControlFlag,
    pub enabled: bool,
}

/// Everything the settings screen shows, derived from ground truth.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsSnapshot {
    /// One entry per marker flag, in [`ControlFlag::ALL`] order.
    pub flags: Vec<FlagState>,
    pub show_fps: bool,
    pub show_info_overlay: bool,
    pub mute_audio: bool,
    pub fps_override: i32,
    pub loop_delay: i32,
    pub volume_percent: i32,
    pub current_video: String,
}

impl SettingsSnapshot {
    /// Displayed state of `flag`.
    pub fn flag(&self, flag: ControlFlag) -> bool {
        self.flags
            .iter()
            .any(|state| state.flag == flag && state.enabled)
    }

    /// Displayed state of a config-backed toggle.
    pub fn config(&self, toggle: ConfigToggle) -> bool {
        match toggle {
            ConfigToggle::ShowFps => self.show_fps,
            ConfigToggle::ShowInfoOverlay => self.show_info_overlay,
            ConfigToggle::MuteAudio => self.mute_audio,
        }
    }

    /// Text next to the volume slider, e.g. `Volume: 80%`.
    pub fn volume_label(&self) -> String {
        format!("Volume: {}%", self.volume_percent)
    }
}

/// The settings screen controller.
///
/// Borrows the settings store and the injected adapters for the lifetime of
/// the screen; nothing here is global.
pub struct SettingsController<'a, S: SettingsStore> {
    store: &'a mut S,
    flags: &'a dyn FlagStore,
    permission: &'a dyn StoragePermission,
    videos: &'a dyn VideoSource,
    notices: Vec<Notice>,
    permission_requested: bool,
}

impl<'a, S: SettingsStore> SettingsController<'a, S> {
    /// Creates a controller over the given store and adapters.
    pub fn new(
        store: &'a mut S,
        flags: &'a dyn FlagStore,
        permission: &'a dyn StoragePermission,
        videos: &'a dyn VideoSource,
    ) -> Self {
        Self {
            store,
            flags,
            permission,
            videos,
            notices: Vec::new(),
            permission_requested: false,
        }
    }

    /// Read access to the underlying store.
    pub fn store(&self) -> &S {
        &*self.store
    }

    /// Write access to the underlying store, for settings the controller does
    /// not model itself (per-app video overrides).
    pub fn store_mut(&mut self) -> &mut S {
        &mut *self.store
    }

    // ── Toggles ───────────────────────────────────────────────────────────────

    /// Routes a toggle press to the family that stores it.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError`] if a marker file could not be created or deleted.
    /// Config-backed toggles never fail; persistence errors are logged.
    pub fn toggle(&mut self, target: ToggleTarget, enabled: bool) -> Result<ToggleOutcome, FlagError> {
        match target {
            ToggleTarget::Flag(flag) => self.toggle_flag(flag, enabled),
            ToggleTarget::Config(toggle) => Ok(self.toggle_config(toggle, enabled)),
        }
    }

    /// Makes the marker file for `flag` exist (`enabled`) or not.
    ///
    /// When the file already has the requested state nothing is written and
    /// no permission is needed.
    ///
    /// # Errors
    ///
    /// Returns [`FlagError`] if the file system refuses the change.
    pub fn toggle_flag(&mut self, flag: ControlFlag, enabled: bool) -> Result<ToggleOutcome, FlagError> {
        if self.flags.is_set(flag) == enabled {
            debug!("{flag} already {}", on_off(enabled));
            return Ok(ToggleOutcome::Unchanged);
        }

        if !self.permission.is_granted() {
            self.request_permission();
            return Ok(ToggleOutcome::PermissionRequested);
        }

        if enabled {
            self.flags.set(flag)?;
        } else {
            self.flags.clear(flag)?;
        }
        info!("{flag} turned {} ({})", on_off(enabled), flag.file_name());
        Ok(ToggleOutcome::Applied)
    }

    /// Stores a config-backed toggle through its typed setter.
    pub fn toggle_config(&mut self, toggle: ConfigToggle, enabled: bool) -> ToggleOutcome {
        let result = match toggle {
            ConfigToggle::ShowFps => self.store.set_show_fps_enabled(enabled),
            ConfigToggle::ShowInfoOverlay => self.store.set_show_info_overlay(enabled),
            ConfigToggle::MuteAudio => self.store.set_muted(enabled),
        };
        match result {
            Ok(()) => info!("{toggle} turned {}", on_off(enabled)),
            Err(e) => warn!("{toggle} not persisted: {e}"),
        }
        ToggleOutcome::Applied
    }

    // ── Numeric fields ────────────────────────────────────────────────────────

    /// Commits the FPS override field.  Non-numeric text stores `0`.
    pub fn commit_fps_field(&mut self, text: &str) -> i32 {
        let fps = parse_field_int(text);
        if let Err(e) = self.store.set_fps_override(fps) {
            warn!("fps override {fps} not persisted: {e}");
        }
        fps
    }

    /// Commits the loop delay field (milliseconds).  Non-numeric text stores `0`.
    pub fn commit_loop_delay_field(&mut self, text: &str) -> i32 {
        let delay = parse_field_int(text);
        if let Err(e) = self.store.set_loop_delay(delay) {
            warn!("loop delay {delay} not persisted: {e}");
        }
        delay
    }

    /// Commits the volume slider.  Returns the stored, clamped percentage.
    pub fn set_volume(&mut self, percent: i32) -> i32 {
        if let Err(e) = self.store.set_audio_volume(percent) {
            warn!("volume {percent} not persisted: {e}");
        }
        clamp_volume(percent)
    }

    // ── Video selection ───────────────────────────────────────────────────────

    /// Selection list for the video picker.  Queues
    /// [`Notice::NoVideosFound`] and returns `None` when the library is empty.
    pub fn video_choices(&mut self) -> Option<VideoChoices> {
        let choices = select_video::video_choices(&*self.store, self.videos);
        if choices.is_none() {
            self.notices.push(Notice::NoVideosFound);
        }
        choices
    }

    /// Persists the picked video.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError`] for an index outside the current library.
    pub fn select_video(&mut self, index: i64) -> Result<String, SelectionError> {
        select_video::select_video(&mut *self.store, self.videos, index)
    }

    /// Label of the currently selected video.
    pub fn current_video_label(&self) -> String {
        select_video::current_video_label(&*self.store, self.videos)
    }

    // ── Reconciliation ────────────────────────────────────────────────────────

    /// Rebuilds the displayed state from the file system and the store.
    ///
    /// Called on every resume.  Also re-checks storage access: a missing
    /// permission is requested, a granted one makes sure the shared directory
    /// exists.
    pub fn sync(&mut self) -> SettingsSnapshot {
        debug!("syncing settings view with marker files and store");

        if self.permission.is_granted() {
            self.ensure_shared_dir();
        } else {
            self.request_permission();
        }

        let flags = ControlFlag::ALL
            .iter()
            .map(|&flag| FlagState {
                flag,
                enabled: self.flags.is_set(flag),
            })
            .collect();

        SettingsSnapshot {
            flags,
            show_fps: self.store.show_fps_enabled(),
            show_info_overlay: self.store.show_info_overlay(),
            mute_audio: self.store.is_muted(),
            fps_override: self.store.fps_override(),
            loop_delay: self.store.loop_delay(),
            volume_percent: self.store.audio_volume_percent(),
            current_video: self.current_video_label(),
        }
    }

    // ── Permission ────────────────────────────────────────────────────────────

    /// Handles the answer to an earlier storage permission request.
    pub fn on_permission_result(&mut self, granted: bool) {
        self.permission_requested = false;
        if granted {
            info!("storage permission granted");
            self.ensure_shared_dir();
        } else {
            warn!("storage permission denied");
            self.notices.push(Notice::PermissionDenied);
        }
    }

    /// Drains the queued notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn request_permission(&mut self) {
        if self.permission_requested {
            return;
        }
        self.permission_requested = true;
        self.permission.request();
        self.notices.push(Notice::PermissionRequired);
    }

    fn ensure_shared_dir(&self) {
        if let Err(e) = self.flags.ensure_dir() {
            warn!("shared directory unavailable: {e}");
        }
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
