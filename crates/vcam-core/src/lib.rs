//! # vcam-core
//!
//! Shared library for the VCAM settings tool containing the settings schema,
//! the `.properties` text codec, the marker-flag catalogue and the video
//! library rules.
//!
//! This crate has zero dependencies on the file system, OS permission APIs or
//! UI frameworks.  Everything that touches disk lives in `vcam-settings`.
//!
//! # Architecture overview (for beginners)
//!
//! VCAM is a virtual camera: an external hooking module replaces the camera
//! feed of other apps with a video file.  The hooking module is configured
//! through two channels, both written by the settings tool:
//!
//! - **`properties`** – A Java-compatible `key=value` text file
//!   (`vcam_config.properties`) holding playback settings such as the FPS
//!   override, audio volume and the selected video.
//!
//! - **`domain::flags`** – Zero-byte *marker files* (`force_show.jpg`,
//!   `disable.jpg`, ...) whose mere existence switches a behaviour on.
//!
//! The **`settings`** module names every key of the properties file and
//! provides the [`SettingsStore`] trait whose provided methods implement the
//! typed accessors (volume clamping, defaults) on top of any key/value store.
//!
//! The **`domain::video_library`** module decides which files count as
//! selectable videos and how the persisted selection index maps to a label.

pub mod domain;
pub mod info;
pub mod properties;
pub mod settings;

// Re-export the most-used types at the crate root so callers can write
// `vcam_core::ControlFlag` instead of `vcam_core::domain::flags::ControlFlag`.
pub use domain::flags::{ConfigToggle, ControlFlag, ToggleTarget};
pub use domain::video_library::{SelectionError, VideoLibrary, DEFAULT_VIDEO_NAME};
pub use properties::{parse_properties, store_properties, Properties, PropertiesError};
pub use settings::SettingsStore;
