//! Application layer use cases for the settings tool.
//!
//! # What use cases does the settings tool have?
//!
//! - **`sync_settings`** – The settings screen controller.  Routes toggle
//!   presses to the right storage family (marker file vs. properties key),
//!   commits numeric fields, and rebuilds the displayed state from ground
//!   truth on every resume.  Marker files and the storage permission are
//!   reached through the `FlagStore` and `StoragePermission` traits, injected
//!   at construction time.
//!
//! - **`select_video`** – Lists the video library, validates a selection and
//!   derives the "current video" label from the persisted index.
//!
//! Nothing in this layer touches the file system directly.

pub mod select_video;
pub mod sync_settings;
