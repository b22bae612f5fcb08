//! Boolean options understood by the hooking module.
//!
//! There are two families and they never mix:
//!
//! | Family          | Storage                         | Type             |
//! |-----------------|---------------------------------|------------------|
//! | Marker flags    | existence of a zero-byte file   | [`ControlFlag`]  |
//! | Config toggles  | `true`/`false` property value   | [`ConfigToggle`] |
//!
//! [`ToggleTarget`] is the union used by front ends that accept either family
//! by name (e.g. `vcam-settings toggle force-show on`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::settings::{KEY_MUTE_AUDIO, KEY_SHOW_FPS, KEY_SHOW_INFO_OVERLAY};

/// Error returned when a toggle name is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown toggle '{0}'")]
pub struct UnknownToggle(pub String);

// ── Marker flags ──────────────────────────────────────────────────────────────

/// A boolean option encoded as the presence of a marker file in the shared
/// directory.  The file content is irrelevant and never written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlFlag {
    /// Force the replacement preview to show even when the app hides it.
    ForceShow,
    /// Disable the hooking module entirely.
    Disable,
    /// Play the video's audio track instead of staying silent.
    PlaySound,
    /// Read videos from each app's private directory.
    ForcePrivateDir,
    /// Suppress the module's toast messages.
    DisableToast,
}

impl ControlFlag {
    /// Every marker flag, in the order a settings screen lists them.
    pub const ALL: [ControlFlag; 5] = [
        ControlFlag::ForceShow,
        ControlFlag::Disable,
        ControlFlag::PlaySound,
        ControlFlag::ForcePrivateDir,
        ControlFlag::DisableToast,
    ];

    /// Name of the marker file the hooking module looks for.
    pub fn file_name(self) -> &'static str {
        match self {
            ControlFlag::ForceShow => "force_show.jpg",
            ControlFlag::Disable => "disable.jpg",
            ControlFlag::PlaySound => "no-silent.jpg",
            ControlFlag::ForcePrivateDir => "private_dir.jpg",
            ControlFlag::DisableToast => "no_toast.jpg",
        }
    }

    /// Command-line / UI name, e.g. `force-show`.
    pub fn name(self) -> &'static str {
        match self {
            ControlFlag::ForceShow => "force-show",
            ControlFlag::Disable => "disable",
            ControlFlag::PlaySound => "play-sound",
            ControlFlag::ForcePrivateDir => "force-private-dir",
            ControlFlag::DisableToast => "disable-toast",
        }
    }
}

impl fmt::Display for ControlFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Config-backed toggles ─────────────────────────────────────────────────────

/// A boolean option stored as a key in the properties file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigToggle {
    ShowFps,
    ShowInfoOverlay,
    MuteAudio,
}

impl ConfigToggle {
    pub const ALL: [ConfigToggle; 3] = [
        ConfigToggle::ShowFps,
        ConfigToggle::ShowInfoOverlay,
        ConfigToggle::MuteAudio,
    ];

    /// The properties key backing this toggle.
    pub fn key(self) -> &'static str {
        match self {
            ConfigToggle::ShowFps => KEY_SHOW_FPS,
            ConfigToggle::ShowInfoOverlay => KEY_SHOW_INFO_OVERLAY,
            ConfigToggle::MuteAudio => KEY_MUTE_AUDIO,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ConfigToggle::ShowFps => "show-fps",
            ConfigToggle::ShowInfoOverlay => "show-info-overlay",
            ConfigToggle::MuteAudio => "mute-audio",
        }
    }
}

impl fmt::Display for ConfigToggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Either family ─────────────────────────────────────────────────────────────

/// Any toggle a user can flip, tagged with the family that stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToggleTarget {
    Flag(ControlFlag),
    Config(ConfigToggle),
}

impl FromStr for ToggleTarget {
    type Err = UnknownToggle;

    /// Parses a toggle name.  Underscores are accepted in place of hyphens.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        if let Some(flag) = ControlFlag::ALL.into_iter().find(|f| f.name() == wanted) {
            return Ok(ToggleTarget::Flag(flag));
        }
        ConfigToggle::ALL
            .into_iter()
            .find(|t| t.name() == wanted)
            .map(ToggleTarget::Config)
            .ok_or_else(|| UnknownToggle(s.to_string()))
    }
}

impl fmt::Display for ToggleTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToggleTarget::Flag(flag) => flag.fmt(f),
            ToggleTarget::Config(toggle) => toggle.fmt(f),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
