//! vcam-settings library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does vcam-settings do? (for beginners)
//!
//! The hooking module that fakes the camera feed has no UI of its own.  It
//! reads its configuration from disk every time a camera is opened:
//!
//! 1. Playback settings (FPS override, loop delay, volume, overlays, the
//!    selected video and per-app video overrides) from
//!    `<base dir>/vcam_config.properties`.
//! 2. Boolean switches from the *existence* of marker files such as
//!    `force_show.jpg` in the shared `DCIM/Camera1` directory.
//!
//! This crate is the writer side of that contract:
//!
//! - `infrastructure::storage` owns the properties file (`ConfigStore`) and
//!   resolves where the base directory lives.
//! - `infrastructure::flag_store` creates and deletes marker files.
//! - `application` turns discrete UI events (toggle pressed, field committed,
//!   screen resumed) into store and flag mutations and re-reads ground truth.
//! - `infrastructure::ui_bridge` wraps the application in command handlers that
//!   return serialisable snapshots; `main.rs` drives them from the command line.

/// Application layer: settings use cases.
pub mod application;

/// Infrastructure layer: file system adapters, permission gate and UI bridge.
pub mod infrastructure;
