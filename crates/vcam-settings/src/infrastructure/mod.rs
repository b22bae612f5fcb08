//! Infrastructure layer for the settings tool.
//!
//! Contains file-system adapters (properties file, marker files, video
//! directory), the storage permission gate and the command bridge used by the
//! front end.
//!
//! **Dependency rule**: this layer may depend on `application` and `vcam_core`,
//! but MUST NOT be imported by the `application` or domain layers.

pub mod flag_store;
pub mod permission;
pub mod storage;
pub mod ui_bridge;
