//! Selectable video files and the persisted selection index.
//!
//! A *video library* is the sorted list of file names in the video directory
//! that the hooking module can play.  The library is never persisted: it is
//! rebuilt from a directory listing every time it is needed, so files added or
//! removed behind the tool's back are picked up immediately.
//!
//! The user's choice is persisted separately as a zero-based index into this
//! list.  Because the directory can shrink between runs, every consumer of the
//! index goes through [`VideoLibrary::label_for`] or
//! [`VideoLibrary::preselect_index`], which re-validate it.

use thiserror::Error;

/// Label shown when the persisted index does not point at a listed file.
///
/// The hooking module plays `virtual.mp4` when no valid selection exists, so
/// the label names that file rather than an arbitrary library entry.
pub const DEFAULT_VIDEO_NAME: &str = "virtual.mp4";

/// Error type for video selection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// The requested index is outside `[0, len)`.
    #[error("video index {index} is out of range (library has {len} videos)")]
    OutOfRange { index: i64, len: usize },
}

/// Returns `true` when `name` is a selectable video file name.
///
/// The extension check is case-insensitive (`clip.MP4` qualifies); hidden
/// files (leading `.`) are excluded.
pub fn is_selectable_video(name: &str) -> bool {
    !name.starts_with('.') && name.to_ascii_lowercase().ends_with(".mp4")
}

/// Sorted, filtered list of selectable video file names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoLibrary {
    names: Vec<String>,
}

impl VideoLibrary {
    /// Builds a library from raw directory entry names.
    ///
    /// Non-video names are dropped and the rest are sorted by ordinal
    /// (byte-wise) comparison, so `B.mp4` sorts before `a.MP4`.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names
            .into_iter()
            .map(Into::into)
            .filter(|n| is_selectable_video(n))
            .collect();
        names.sort();
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns the file name at `index`, if it is in range.
    pub fn get(&self, index: i64) -> Option<&str> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.names.get(i))
            .map(String::as_str)
    }

    /// Validates a requested selection index.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::OutOfRange`] unless `0 <= index < len`.
    pub fn validate_index(&self, index: i64) -> Result<usize, SelectionError> {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < self.names.len())
            .ok_or(SelectionError::OutOfRange {
                index,
                len: self.names.len(),
            })
    }

    /// Index to highlight in a selection list: the persisted index when valid,
    /// otherwise `0`.
    pub fn preselect_index(&self, persisted: i64) -> usize {
        self.validate_index(persisted).unwrap_or(0)
    }

    /// Label for the persisted index: the file name when valid, otherwise
    /// [`DEFAULT_VIDEO_NAME`].
    pub fn label_for(&self, persisted: i64) -> &str {
        self.get(persisted).unwrap_or(DEFAULT_VIDEO_NAME)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
