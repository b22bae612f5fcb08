//! Directory listing of selectable videos.

use std::path::{Path, PathBuf};

use tracing::debug;
use vcam_core::VideoLibrary;

use crate::application::select_video::VideoSource;

/// Lists the selectable videos in `dir`, sorted by ordinal name.
///
/// A missing or unreadable directory yields an empty list.
pub fn list_available_videos(dir: &Path) -> Vec<String> {
    library_in(dir).names().to_vec()
}

fn library_in(dir: &Path) -> VideoLibrary {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("cannot list videos in {}: {e}", dir.display());
            return VideoLibrary::default();
        }
    };

    VideoLibrary::from_names(
        entries
            .filter_map(Result::ok)
            .filter_map(|entry| entry.file_name().into_string().ok()),
    )
}

/// [`VideoSource`] that re-reads a directory on every call.
#[derive(Debug, Clone)]
pub struct DirectoryVideoSource {
    dir: PathBuf,
}

impl DirectoryVideoSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl VideoSource for DirectoryVideoSource {
    fn list_videos(&self) -> VideoLibrary {
        library_in(&self.dir)
    }
}
