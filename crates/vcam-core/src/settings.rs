//! Settings schema and the typed accessor trait.
//!
//! The properties file written by the settings tool holds these keys:
//!
//! | Key                       | Type | Default | Meaning                           |
//! |---------------------------|------|---------|-----------------------------------|
//! | `fps_override`            | int  | `0`     | Playback FPS, `0` = source FPS    |
//! | `show_fps`                | bool | `false` | Draw an FPS counter               |
//! | `audio_volume`            | int  | `100`   | Volume in percent, `[0, 100]`     |
//! | `mute_audio`              | bool | `false` | Mute the video's audio track      |
//! | `show_info_overlay`       | bool | `false` | Draw a camera info overlay        |
//! | `video_index`             | int  | `0`     | Index into the video library      |
//! | `loop_delay`              | int  | `0`     | Pause between loops, milliseconds |
//! | `app_video_<packageId>`   | str  | –       | Per-app video path override       |
//!
//! # Why a trait? (for beginners)
//!
//! [`SettingsStore`] only asks an implementor for six generic accessors
//! (`get_*` / `set_*` for strings, integers and booleans).  All the typed
//! helpers (`audio_volume`, `set_fps_override`, ...) are *provided methods*
//! built on top of them, so the defaults and clamping rules are written once
//! and shared by the file-backed store and by test doubles alike.

/// Name of the persisted settings file inside the base directory.
pub const CONFIG_FILE_NAME: &str = "vcam_config.properties";
/// Header comment written at the top of the settings file.
pub const CONFIG_HEADER: &str = "VCAM Configuration";

pub const KEY_FPS_OVERRIDE: &str = "fps_override";
pub const KEY_SHOW_FPS: &str = "show_fps";
pub const KEY_AUDIO_VOLUME: &str = "audio_volume";
pub const KEY_MUTE_AUDIO: &str = "mute_audio";
pub const KEY_SHOW_INFO_OVERLAY: &str = "show_info_overlay";
pub const KEY_VIDEO_INDEX: &str = "video_index";
pub const KEY_LOOP_DELAY: &str = "loop_delay";

/// Prefix of per-app video keys: `app_video_<packageId>`.
pub const APP_VIDEO_PREFIX: &str = "app_video_";

pub const DEFAULT_AUDIO_VOLUME: i32 = 100;
pub const MIN_AUDIO_VOLUME: i32 = 0;
pub const MAX_AUDIO_VOLUME: i32 = 100;

// ── Key and value helpers ─────────────────────────────────────────────────────

/// Builds the properties key that stores the video for `app_id`.
pub fn app_video_key(app_id: &str) -> String {
    format!("{APP_VIDEO_PREFIX}{app_id}")
}

/// Extracts the package id from a per-app video key.
///
/// Returns `None` for keys without the prefix.
pub fn app_id_from_key(key: &str) -> Option<&str> {
    key.strip_prefix(APP_VIDEO_PREFIX)
}

/// Clamps a volume percentage into `[0, 100]`.
pub fn clamp_volume(percent: i32) -> i32 {
    percent.clamp(MIN_AUDIO_VOLUME, MAX_AUDIO_VOLUME)
}

/// Parses a stored integer, falling back to `default` when absent or malformed.
pub fn parse_int(raw: Option<&str>, default: i32) -> i32 {
    raw.and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Parses a stored boolean (`true`/`false`, any case), falling back to
/// `default` when absent or malformed.
pub fn parse_bool(raw: Option<&str>, default: bool) -> bool {
    match raw {
        Some(v) if v.eq_ignore_ascii_case("true") => true,
        Some(v) if v.eq_ignore_ascii_case("false") => false,
        _ => default,
    }
}

/// Parses a numeric text field as entered by the user.  Anything that is not
/// an integer yields `0`, surrounding whitespace included.
pub fn parse_field_int(text: &str) -> i32 {
    text.parse().unwrap_or(0)
}

// ── Store trait ───────────────────────────────────────────────────────────────

/// Key/value settings storage with typed accessors.
///
/// Setters are write-through: an implementation persists the change before
/// returning.  A setter error means the in-memory value changed but the
/// persisted copy did not.
pub trait SettingsStore {
    /// Error produced when persisting a change fails.
    type Error: std::error::Error;

    fn get_string(&self, key: &str, default: &str) -> String;
    fn get_int(&self, key: &str, default: i32) -> i32;
    fn get_bool(&self, key: &str, default: bool) -> bool;

    fn set_string(&mut self, key: &str, value: &str) -> Result<(), Self::Error>;
    fn set_int(&mut self, key: &str, value: i32) -> Result<(), Self::Error>;
    fn set_bool(&mut self, key: &str, value: bool) -> Result<(), Self::Error>;

    // ── Typed wrappers ────────────────────────────────────────────────────────

    fn fps_override(&self) -> i32 {
        self.get_int(KEY_FPS_OVERRIDE, 0)
    }

    fn set_fps_override(&mut self, fps: i32) -> Result<(), Self::Error> {
        self.set_int(KEY_FPS_OVERRIDE, fps)
    }

    fn show_fps_enabled(&self) -> bool {
        self.get_bool(KEY_SHOW_FPS, false)
    }

    fn set_show_fps_enabled(&mut self, enabled: bool) -> Result<(), Self::Error> {
        self.set_bool(KEY_SHOW_FPS, enabled)
    }

    /// Stored volume in percent.  Not clamped on read: a hand-edited file can
    /// hold any integer.
    fn audio_volume_percent(&self) -> i32 {
        self.get_int(KEY_AUDIO_VOLUME, DEFAULT_AUDIO_VOLUME)
    }

    /// Volume as a playback gain fraction in `[0.0, 1.0]`.
    fn audio_volume(&self) -> f32 {
        clamp_volume(self.audio_volume_percent()) as f32 / 100.0
    }

    /// Stores the volume clamped to `[0, 100]`.
    fn set_audio_volume(&mut self, percent: i32) -> Result<(), Self::Error> {
        self.set_int(KEY_AUDIO_VOLUME, clamp_volume(percent))
    }

    fn is_muted(&self) -> bool {
        self.get_bool(KEY_MUTE_AUDIO, false)
    }

    fn set_muted(&mut self, muted: bool) -> Result<(), Self::Error> {
        self.set_bool(KEY_MUTE_AUDIO, muted)
    }

    fn show_info_overlay(&self) -> bool {
        self.get_bool(KEY_SHOW_INFO_OVERLAY, false)
    }

    fn set_show_info_overlay(&mut self, show: bool) -> Result<(), Self::Error> {
        self.set_bool(KEY_SHOW_INFO_OVERLAY, show)
    }

    fn video_index(&self) -> i32 {
        self.get_int(KEY_VIDEO_INDEX, 0)
    }

    fn set_video_index(&mut self, index: i32) -> Result<(), Self::Error> {
        self.set_int(KEY_VIDEO_INDEX, index)
    }

    /// Pause between video loops in milliseconds.
    fn loop_delay(&self) -> i32 {
        self.get_int(KEY_LOOP_DELAY, 0)
    }

    fn set_loop_delay(&mut self, delay_ms: i32) -> Result<(), Self::Error> {
        self.set_int(KEY_LOOP_DELAY, delay_ms)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
