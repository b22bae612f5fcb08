//! Command bridge: exposes the settings controller to a front end.
//!
//! Every function here is one discrete UI event.  The command-line binary in
//! `main.rs` is the only front end today, but nothing in this module prints
//! or parses arguments, so a graphical shell could call the same handlers.
//!
//! # Data Transfer Objects (DTOs)
//!
//! Internal types such as [`SettingsSnapshot`] or [`vcam_core::ControlFlag`] carry more
//! structure than a front end needs.  DTOs flatten them into plain
//! `String`/`i32`/`bool` fields with `#[derive(Serialize)]`, so the binary can
//! print them as JSON with `serde_json`.
//!
//! # `CommandResult<T>` wrapper
//!
//! All handlers return `CommandResult<T>` rather than `Result<T, E>`.
//! This ensures every command response has the same shape:
//! `{ success: bool, data: T | null, error: string | null }`.
//!
//! Notices queued by the controller (permission required, no videos found)
//! are not part of the envelope; the caller drains them with
//! [`SettingsController::take_notices`] after each command.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::info;
use vcam_core::{info as device, ConfigToggle, SettingsStore, ToggleTarget};

use crate::application::sync_settings::{
    SettingsController, SettingsSnapshot, StoragePermission, ToggleOutcome,
};
use crate::infrastructure::{
    flag_store::FsFlagStore,
    permission::DirectoryAccessPermission,
    storage::{ConfigStore, DirectoryVideoSource},
};

// ── Session ───────────────────────────────────────────────────────────────────

/// Owns the store and adapters the controller borrows.
pub struct SettingsSession<P: StoragePermission = DirectoryAccessPermission> {
    pub store: ConfigStore,
    pub flags: FsFlagStore,
    pub permission: P,
    pub videos: DirectoryVideoSource,
}

impl SettingsSession<DirectoryAccessPermission> {
    /// Opens the store in `base_dir` and targets marker files in `shared_dir`,
    /// with access decided by the file system.
    pub fn open(base_dir: impl Into<PathBuf>, shared_dir: impl Into<PathBuf>) -> Self {
        let shared_dir = shared_dir.into();
        let permission = DirectoryAccessPermission::new(shared_dir.clone());
        Self::with_permission(base_dir, shared_dir, permission)
    }
}

impl<P: StoragePermission> SettingsSession<P> {
    /// Like [`SettingsSession::open`] with an explicit permission gate.
    pub fn with_permission(
        base_dir: impl Into<PathBuf>,
        shared_dir: impl Into<PathBuf>,
        permission: P,
    ) -> Self {
        let base_dir = base_dir.into();
        let store = ConfigStore::open(base_dir.clone());
        info!("settings store at {}", store.path().display());
        Self {
            store,
            flags: FsFlagStore::new(shared_dir),
            permission,
            videos: DirectoryVideoSource::new(base_dir),
        }
    }

    /// A controller over this session's store and adapters.
    pub fn controller(&mut self) -> SettingsController<'_, ConfigStore> {
        SettingsController::new(&mut self.store, &self.flags, &self.permission, &self.videos)
    }
}

// ── Data Transfer Objects ─────────────────────────────────────────────────────

/// One toggle as shown on the settings screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToggleDto {
    pub name: String,
    pub enabled: bool,
    /// Marker file name for file-backed toggles, `None` for config-backed ones.
    pub marker_file: Option<String>,
}

/// The full settings screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SettingsViewDto {
    pub toggles: Vec<ToggleDto>,
    pub fps_override: i32,
    pub loop_delay: i32,
    pub volume_percent: i32,
    pub volume_label: String,
    pub current_video: String,
}

impl From<&SettingsSnapshot> for SettingsViewDto {
    fn from(s: &SettingsSnapshot) -> Self {
        let markers = s.flags.iter().map(|state| ToggleDto {
            name: state.flag.name().to_string(),
            enabled: state.enabled,
            marker_file: Some(state.flag.file_name().to_string()),
        });
        let config = ConfigToggle::ALL.iter().map(|&toggle| ToggleDto {
            name: toggle.name().to_string(),
            enabled: s.config(toggle),
            marker_file: None,
        });

        Self {
            toggles: markers.chain(config).collect(),
            fps_override: s.fps_override,
            loop_delay: s.loop_delay,
            volume_percent: s.volume_percent,
            volume_label: s.volume_label(),
            current_video: s.current_video.clone(),
        }
    }
}

/// Result of a toggle press.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToggleResultDto {
    pub name: String,
    pub requested: bool,
    /// `"applied"`, `"unchanged"` or `"permission_requested"`.
    pub outcome: String,
}

/// Volume slider after a commit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VolumeDto {
    pub percent: i32,
    pub label: String,
}

/// The video picker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoChoicesDto {
    pub videos: Vec<String>,
    /// Row to highlight; `None` when there is nothing to choose from.
    pub preselected: Option<usize>,
    pub current: String,
}

/// One per-app video override.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerAppVideoDto {
    pub app: String,
    pub path: String,
    /// Whether the file exists right now.
    pub exists: bool,
}

/// Unified response wrapper used by every handler.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResult<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

fn outcome_name(outcome: ToggleOutcome) -> &'static str {
    match outcome {
        ToggleOutcome::Applied => "applied",
        ToggleOutcome::Unchanged => "unchanged",
        ToggleOutcome::PermissionRequested => "permission_requested",
    }
}

// ── Settings screen commands ──────────────────────────────────────────────────

/// Re-reads every toggle and field from disk (the "screen resumed" event).
pub fn get_settings_view<S: SettingsStore>(
    controller: &mut SettingsController<'_, S>,
) -> CommandResult<SettingsViewDto> {
    let snapshot = controller.sync();
    CommandResult::ok(SettingsViewDto::from(&snapshot))
}

/// Applies a toggle press by name (`force-show`, `mute-audio`, ...).
pub fn toggle_setting<S: SettingsStore>(
    controller: &mut SettingsController<'_, S>,
    name: &str,
    enabled: bool,
) -> CommandResult<ToggleResultDto> {
    let target: ToggleTarget = match name.parse() {
        Ok(target) => target,
        Err(e) => return CommandResult::err(format!("{e}")),
    };

    match controller.toggle(target, enabled) {
        Ok(outcome) => CommandResult::ok(ToggleResultDto {
            name: target.to_string(),
            requested: enabled,
            outcome: outcome_name(outcome).to_string(),
        }),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

/// Commits the FPS override text field.
pub fn commit_fps_field<S: SettingsStore>(
    controller: &mut SettingsController<'_, S>,
    text: &str,
) -> CommandResult<i32> {
    CommandResult::ok(controller.commit_fps_field(text))
}

/// Commits the loop delay text field.
pub fn commit_loop_delay_field<S: SettingsStore>(
    controller: &mut SettingsController<'_, S>,
    text: &str,
) -> CommandResult<i32> {
    CommandResult::ok(controller.commit_loop_delay_field(text))
}

/// Commits the volume slider.
pub fn set_volume<S: SettingsStore>(
    controller: &mut SettingsController<'_, S>,
    percent: i32,
) -> CommandResult<VolumeDto> {
    let percent = controller.set_volume(percent);
    CommandResult::ok(VolumeDto {
        percent,
        label: format!("Volume: {percent}%"),
    })
}

// ── Video picker commands ─────────────────────────────────────────────────────

/// Opens the video picker.
pub fn list_video_choices<S: SettingsStore>(
    controller: &mut SettingsController<'_, S>,
) -> CommandResult<VideoChoicesDto> {
    let current = controller.current_video_label();
    let dto = match controller.video_choices() {
        Some(choices) => VideoChoicesDto {
            videos: choices.names,
            preselected: Some(choices.preselected),
            current,
        },
        None => VideoChoicesDto {
            videos: Vec::new(),
            preselected: None,
            current,
        },
    };
    CommandResult::ok(dto)
}

/// Picks the video at `index` in the current listing.
pub fn select_video<S: SettingsStore>(
    controller: &mut SettingsController<'_, S>,
    index: i64,
) -> CommandResult<String> {
    match controller.select_video(index) {
        Ok(name) => CommandResult::ok(name),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

// ── Per-app video commands ────────────────────────────────────────────────────

/// Lists every per-app override.
pub fn per_app_list(controller: &SettingsController<'_, ConfigStore>) -> CommandResult<Vec<PerAppVideoDto>> {
    let dtos = controller
        .store()
        .per_app_videos()
        .map(|(app, path)| PerAppVideoDto {
            app: app.to_string(),
            path: path.to_string(),
            exists: std::path::Path::new(path).exists(),
        })
        .collect();
    CommandResult::ok(dtos)
}

/// Sets the video for `app`.  An empty `path` is rejected; use
/// [`per_app_clear`] to remove an override.
pub fn per_app_set(
    controller: &mut SettingsController<'_, ConfigStore>,
    app: &str,
    path: &str,
) -> CommandResult<()> {
    if app.is_empty() || path.is_empty() {
        return CommandResult::err("app id and video path must not be empty");
    }
    match controller.store_mut().set_per_app_video(app, path) {
        Ok(()) => CommandResult::ok(()),
        Err(e) => CommandResult::err(format!("failed to save config: {e}")),
    }
}

/// Removes the override for `app`.  Returns whether one existed.
pub fn per_app_clear(
    controller: &mut SettingsController<'_, ConfigStore>,
    app: &str,
) -> CommandResult<bool> {
    let existed = controller.store().has_per_app_video(app);
    match controller.store_mut().set_per_app_video(app, "") {
        Ok(()) => CommandResult::ok(existed),
        Err(e) => CommandResult::err(format!("failed to save config: {e}")),
    }
}

/// The video the hooking module would play for `app`.
pub fn per_app_resolve(
    controller: &SettingsController<'_, ConfigStore>,
    app: &str,
    fallback: &str,
) -> CommandResult<String> {
    CommandResult::ok(controller.store().resolve_video_for_app(app, fallback))
}

// ── Information commands ──────────────────────────────────────────────────────

/// Product, device and version text.
pub fn get_device_info() -> CommandResult<String> {
    CommandResult::ok(device::device_info())
}

/// Camera parameter text for the given stream.
pub fn get_camera_info(width: u32, height: u32, fps: u32) -> CommandResult<String> {
    CommandResult::ok(device::camera_info(width, height, fps))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::application::sync_settings::Notice;
    use crate::infrastructure::permission::mock::MockStoragePermission;

    /// Session over a fresh temp dir: base dir `root/VCAM`, shared dir
    /// `root/DCIM/Camera1`, access granted.
    fn make_session() -> (TempDir, SettingsSession<MockStoragePermission>) {
        let root = tempfile::tempdir().expect("tempdir");
        let session = SettingsSession::with_permission(
            root.path().join("VCAM"),
            root.path().join("DCIM").join("Camera1"),
            MockStoragePermission::granted(),
        );
        (root, session)
    }

    #[test]
    fn test_get_settings_view_reports_defaults_and_creates_shared_dir() {
        // Arrange
        let (root, mut session) = make_session();
        let mut controller = session.controller();

        // Act
        let result = get_settings_view(&mut controller);

        // Assert
        assert!(result.success);
        let view = result.data.unwrap();
        assert_eq!(view.toggles.len(), 8);
        assert!(view.toggles.iter().all(|t| !t.enabled));
        assert_eq!(view.volume_label, "Volume: 100%");
        assert_eq!(view.current_video, "virtual.mp4");
        assert!(root.path().join("DCIM").join("Camera1").is_dir());
    }

    #[test]
    fn test_toggle_setting_force_show_creates_marker_file() {
        // Arrange
        let (root, mut session) = make_session();
        let mut controller = session.controller();
        get_settings_view(&mut controller);

        // Act
        let result = toggle_setting(&mut controller, "force-show", true);

        // Assert
        assert!(result.success);
        assert_eq!(result.data.unwrap().outcome, "applied");
        let marker = root.path().join("DCIM").join("Camera1").join("force_show.jpg");
        assert!(marker.exists());
        let view = get_settings_view(&mut controller).data.unwrap();
        assert!(view.toggles.iter().any(|t| t.name == "force-show" && t.enabled));
    }

    #[test]
    fn test_toggle_setting_unknown_name_fails() {
        let (_root, mut session) = make_session();
        let mut controller = session.controller();

        let result = toggle_setting(&mut controller, "turbo", true);

        assert!(!result.success);
        assert!(result.error.unwrap().contains("turbo"));
    }

    #[test]
    fn test_toggle_setting_config_toggle_persists_to_properties() {
        // Arrange
        let (root, mut session) = make_session();
        let mut controller = session.controller();

        // Act
        let result = toggle_setting(&mut controller, "mute_audio", true);

        // Assert
        assert!(result.success);
        let text = fs::read_to_string(root.path().join("VCAM").join("vcam_config.properties")).unwrap();
        assert!(text.contains("mute_audio=true"));
    }

    #[test]
    fn test_toggle_setting_without_permission_reports_request() {
        // Arrange
        let root = tempfile::tempdir().expect("tempdir");
        let mut session = SettingsSession::with_permission(
            root.path().join("VCAM"),
            root.path().join("DCIM").join("Camera1"),
            MockStoragePermission::denied(),
        );
        let mut controller = session.controller();

        // Act
        let result = toggle_setting(&mut controller, "disable", true);

        // Assert
        assert_eq!(result.data.unwrap().outcome, "permission_requested");
        assert_eq!(controller.take_notices(), vec![Notice::PermissionRequired]);
        drop(controller);
        assert_eq!(session.permission.request_count(), 1);
    }

    #[test]
    fn test_set_volume_clamps_and_labels() {
        let (_root, mut session) = make_session();
        let mut controller = session.controller();

        let dto = set_volume(&mut controller, 250).data.unwrap();

        assert_eq!(dto, VolumeDto { percent: 100, label: "Volume: 100%".to_string() });
    }

    #[test]
    fn test_commit_fps_field_non_numeric_stores_zero() {
        let (_root, mut session) = make_session();
        let mut controller = session.controller();

        assert_eq!(commit_fps_field(&mut controller, "60").data, Some(60));
        assert_eq!(commit_fps_field(&mut controller, "fast").data, Some(0));
        assert_eq!(commit_loop_delay_field(&mut controller, "250").data, Some(250));
        assert_eq!(commit_loop_delay_field(&mut controller, " 250 ").data, Some(0));
        assert_eq!(controller.store().fps_override(), 0);
    }

    #[test]
    fn test_list_video_choices_and_select_video() {
        // Arrange
        let (root, mut session) = make_session();
        let base = root.path().join("VCAM");
        fs::write(base.join("b.mp4"), b"").unwrap();
        fs::write(base.join("a.mp4"), b"").unwrap();
        let mut controller = session.controller();

        // Act
        let selected = select_video(&mut controller, 1);
        let choices = list_video_choices(&mut controller).data.unwrap();

        // Assert
        assert_eq!(selected.data.as_deref(), Some("b.mp4"));
        assert_eq!(choices.videos, vec!["a.mp4", "b.mp4"]);
        assert_eq!(choices.preselected, Some(1));
        assert_eq!(choices.current, "b.mp4");
    }

    #[test]
    fn test_select_video_out_of_range_fails() {
        let (_root, mut session) = make_session();
        let mut controller = session.controller();

        let result = select_video(&mut controller, 0);

        assert!(!result.success);
    }

    #[test]
    fn test_list_video_choices_empty_queues_notice() {
        let (_root, mut session) = make_session();
        let mut controller = session.controller();

        let dto = list_video_choices(&mut controller).data.unwrap();

        assert!(dto.videos.is_empty());
        assert_eq!(dto.preselected, None);
        assert_eq!(controller.take_notices(), vec![Notice::NoVideosFound]);
    }

    #[test]
    fn test_per_app_commands_round_trip() {
        // Arrange
        let (root, mut session) = make_session();
        let video = root.path().join("x.mp4");
        fs::write(&video, b"").unwrap();
        let video = video.to_string_lossy().into_owned();
        let mut controller = session.controller();

        // Act
        assert!(per_app_set(&mut controller, "com.x", &video).success);
        let listed = per_app_list(&controller).data.unwrap();
        let resolved = per_app_resolve(&controller, "com.x", "/default.mp4").data.unwrap();
        let cleared = per_app_clear(&mut controller, "com.x").data.unwrap();

        // Assert
        assert_eq!(
            listed,
            vec![PerAppVideoDto { app: "com.x".to_string(), path: video.clone(), exists: true }]
        );
        assert_eq!(resolved, video);
        assert!(cleared);
        assert!(per_app_list(&controller).data.unwrap().is_empty());
    }

    #[test]
    fn test_per_app_set_rejects_empty_path() {
        let (_root, mut session) = make_session();
        let mut controller = session.controller();

        assert!(!per_app_set(&mut controller, "com.x", "").success);
    }

    #[test]
    fn test_camera_info_lists_format() {
        let info = get_camera_info(1280, 720, 30).data.unwrap();
        assert!(info.contains("Resolution: 1280x720"));
        assert!(info.contains("YUV_420_888"));
    }

    #[test]
    fn test_command_result_ok_sets_success_true() {
        let r: CommandResult<i32> = CommandResult::ok(42);
        assert!(r.success);
        assert_eq!(r.data.unwrap(), 42);
        assert!(r.error.is_none());
    }

    #[test]
    fn test_command_result_err_sets_success_false() {
        let r: CommandResult<i32> = CommandResult::err("something went wrong");
        assert!(!r.success);
        assert!(r.data.is_none());
        assert_eq!(r.error.unwrap(), "something went wrong");
    }
}
