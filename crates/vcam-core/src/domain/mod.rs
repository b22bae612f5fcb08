//! Domain entities for the VCAM settings tool.
//!
//! This module contains pure business rules with no file system access.
//!
//! # What lives here? (for beginners)
//!
//! - **`flags`** – The catalogue of boolean options.  Some of them are
//!   *marker files* whose existence is the whole signal to the hooking module,
//!   others are plain keys in the properties file.  Keeping both families in
//!   distinct types makes it impossible to route a toggle to the wrong
//!   storage.
//!
//! - **`video_library`** – Which directory entries are selectable videos, how
//!   they are ordered, and how a persisted selection index maps back to a
//!   file name.
//!
//! Code in outer layers (the `vcam-settings` application and infrastructure
//! layers) depends on these types, but the domain never depends on them.

/// Marker-file flags and config-backed toggles.
pub mod flags;

/// Selectable video files and selection-index rules.
pub mod video_library;
