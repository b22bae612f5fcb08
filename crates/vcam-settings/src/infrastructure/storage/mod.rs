//! Storage infrastructure: everything that lives in files.
//!
//! - `config_store` owns `vcam_config.properties`, the file the hooking module
//!   reads playback settings from.
//! - `video_dir` lists the `.mp4` files next to it.
//! - `base_dir` decides which directory holds both.
//! - `app_config` is this tool's own TOML configuration (where the storage
//!   roots are, which log level to use).

pub mod app_config;
pub mod base_dir;
pub mod config_store;
pub mod video_dir;

pub use config_store::{ConfigError, ConfigStore};
pub use video_dir::{list_available_videos, DirectoryVideoSource};
