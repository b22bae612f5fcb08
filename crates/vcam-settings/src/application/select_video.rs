//! Video selection: list the library, persist a choice, label the current one.
//!
//! The library is re-listed on every call through a [`VideoSource`], never
//! cached, so a video deleted while the tool is open simply disappears from
//! the next listing and a stale persisted index falls back cleanly.

use tracing::{info, warn};
use vcam_core::{SelectionError, SettingsStore, VideoLibrary};

/// Source of the current video library.
///
/// The infrastructure layer implements this with a directory listing.
pub trait VideoSource {
    /// Returns the library as it exists right now.
    fn list_videos(&self) -> VideoLibrary;
}

/// Data for a single-choice selection list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoChoices {
    /// Selectable file names, in display order.
    pub names: Vec<String>,
    /// Row to highlight: the persisted index, or `0` when it is stale.
    pub preselected: usize,
}

/// Builds the selection list, or `None` when there is nothing to choose from.
pub fn video_choices<S: SettingsStore>(store: &S, source: &dyn VideoSource) -> Option<VideoChoices> {
    let library = source.list_videos();
    if library.is_empty() {
        return None;
    }
    let preselected = library.preselect_index(i64::from(store.video_index()));
    Some(VideoChoices {
        names: library.names().to_vec(),
        preselected,
    })
}

/// Persists `index` as the selected video and returns the chosen file name.
///
/// A failed write is logged and the in-memory selection still
/// changes so the UI reflects the choice for the rest of the session.
///
/// # Errors
///
/// Returns [`SelectionError::OutOfRange`] when `index` does not address a
/// listed video.  Nothing is persisted in that case.
pub fn select_video<S: SettingsStore>(
    store: &mut S,
    source: &dyn VideoSource,
    index: i64,
) -> Result<String, SelectionError> {
    let library = source.list_videos();
    let valid = library.validate_index(index)?;
    let name = library.names()[valid].clone();

    // `valid < library.len()`, which always fits an i32 for a real directory.
    let stored = i32::try_from(valid).map_err(|_| SelectionError::OutOfRange {
        index,
        len: library.len(),
    })?;
    if let Err(e) = store.set_video_index(stored) {
        warn!("selected video {name} not persisted: {e}");
    } else {
        info!("selected video {stored}: {name}");
    }
    Ok(name)
}

/// Label for the currently selected video.
///
/// Returns the file name at the persisted index, or
/// [`vcam_core::DEFAULT_VIDEO_NAME`] when the index is out of range or the
/// library is empty.
pub fn current_video_label<S: SettingsStore>(store: &S, source: &dyn VideoSource) -> String {
    source
        .list_videos()
        .label_for(i64::from(store.video_index()))
        .to_string()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use vcam_core::settings::KEY_VIDEO_INDEX;
    use vcam_core::DEFAULT_VIDEO_NAME;

    use super::*;
    use crate::application::test_support::{FixedVideos, MemoryStore};

    fn three_videos() -> FixedVideos {
        FixedVideos::new(&["c.mp4", "a.mp4", "b.mp4", "notes.txt"])
    }

    #[test]
    fn test_select_video_persists_valid_index_and_returns_name() {
        // Arrange
        let mut store = MemoryStore::default();
        let source = three_videos();

        // Act
        let name = select_video(&mut store, &source, 2).expect("valid index");

        // Assert
        assert_eq!(name, "c.mp4");
        assert_eq!(store.video_index(), 2);
    }

    #[test]
    fn test_select_video_rejects_out_of_range_without_writing() {
        // Arrange
        let mut store = MemoryStore::default();
        let source = three_videos();

        // Act
        let past_end = select_video(&mut store, &source, 3);
        let negative = select_video(&mut store, &source, -1);

        // Assert
        assert_eq!(past_end, Err(SelectionError::OutOfRange { index: 3, len: 3 }));
        assert!(negative.is_err());
        assert_eq!(store.writes(), 0);
        assert!(!store.contains(KEY_VIDEO_INDEX));
    }

    #[test]
    fn test_current_video_label_uses_persisted_index() {
        let mut store = MemoryStore::default();
        store.set_video_index(1).unwrap();
        assert_eq!(current_video_label(&store, &three_videos()), "b.mp4");
    }

    #[test]
    fn test_current_video_label_falls_back_when_library_shrank() {
        // Arrange: index 5 persisted while only three videos remain.
        let mut store = MemoryStore::default();
        store.set_video_index(5).unwrap();

        // Act
        let label = current_video_label(&store, &three_videos());

        // Assert
        assert_eq!(label, DEFAULT_VIDEO_NAME);
    }

    #[test]
    fn test_current_video_label_falls_back_for_empty_library() {
        let store = MemoryStore::default();
        assert_eq!(current_video_label(&store, &FixedVideos::new(&[])), DEFAULT_VIDEO_NAME);
    }

    #[test]
    fn test_video_choices_preselects_zero_for_stale_index() {
        let mut store = MemoryStore::default();
        store.set_video_index(9).unwrap();

        let choices = video_choices(&store, &three_videos()).expect("non-empty");

        assert_eq!(choices.names, vec!["a.mp4", "b.mp4", "c.mp4"]);
        assert_eq!(choices.preselected, 0);
    }

    #[test]
    fn test_video_choices_is_none_for_empty_library() {
        let store = MemoryStore::default();
        assert!(video_choices(&store, &FixedVideos::new(&["readme.txt"])).is_none());
    }
}
