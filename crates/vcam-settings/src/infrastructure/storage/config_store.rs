//! `vcam_config.properties` persistence.
//!
//! [`ConfigStore`] keeps the whole key/value map in memory and writes the
//! complete file after every mutation.  Per-app video overrides are stored as
//! `app_video_<package id>` keys and mirrored in a separate map so callers can
//! look them up by package id.
//!
//! # File format (for beginners)
//!
//! The hooking module reads the file with a Java-properties parser, so it is
//! written in that format:
//!
//! ```text
//! #VCAM Configuration
//! audio_volume=80
//! app_video_com.example.camera=/sdcard/DCIM/Camera1/demo.mp4
//! ```
//!
//! Reading accepts anything a properties writer may have produced, including
//! a date comment and `\uXXXX` escapes.
//!
//! # Failure handling
//!
//! A file that cannot be read or parsed leaves the in-memory map untouched and
//! is logged.  A failed save is logged and returned as [`ConfigError`]; the
//! previous file stays in place because the new content is written to a
//! sibling `.tmp` file and renamed over it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error, info, warn};
use vcam_core::settings::{
    app_id_from_key, app_video_key, parse_bool, parse_int, CONFIG_FILE_NAME, CONFIG_HEADER,
};
use vcam_core::{parse_properties, store_properties, Properties, PropertiesError, SettingsStore};

use super::video_dir::list_available_videos;

/// Error type for the properties file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file content is not valid properties text.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: PropertiesError,
    },
}

/// In-memory view of `vcam_config.properties` with write-through setters.
#[derive(Debug)]
pub struct ConfigStore {
    dir: PathBuf,
    path: PathBuf,
    properties: Properties,
    per_app_videos: BTreeMap<String, String>,
}

impl ConfigStore {
    /// Creates an empty store for `<dir>/vcam_config.properties` without
    /// touching the disk.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let path = dir.join(CONFIG_FILE_NAME);
        Self {
            dir,
            path,
            properties: Properties::new(),
            per_app_videos: BTreeMap::new(),
        }
    }

    /// Creates a store for `dir` and loads the existing file, if any.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let mut store = Self::new(dir);
        store.load();
        store
    }

    /// Directory holding the properties file.
    pub fn config_dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of the properties file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    // ── Load / save ───────────────────────────────────────────────────────────

    /// Merges the file on disk into memory and rebuilds the per-app map.
    ///
    /// Creates the config directory if needed.  Read and parse failures are
    /// logged and leave the in-memory state unchanged.  Loading the same file
    /// twice has the same effect as loading it once.
    pub fn load(&mut self) {
        if let Err(source) = std::fs::create_dir_all(&self.dir) {
            warn!("cannot create config dir {}: {source}", self.dir.display());
        }

        match self.read_file() {
            Ok(Some(loaded)) => {
                debug!("loaded {} entries from {}", loaded.len(), self.path.display());
                self.properties.extend(loaded);
            }
            Ok(None) => debug!("no config at {}, using defaults", self.path.display()),
            Err(e) => warn!("keeping in-memory config: {e}"),
        }

        self.per_app_videos = self
            .properties
            .iter()
            .filter_map(|(key, value)| {
                app_id_from_key(key).map(|app| (app.to_string(), value.clone()))
            })
            .collect();
    }

    fn read_file(&self) -> Result<Option<Properties>, ConfigError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let text = vcam_core::properties::decode_latin1(&bytes);
        parse_properties(&text)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    /// Writes the complete map to disk.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the temporary file cannot be written or
    /// renamed.  The error is also logged.
    pub fn save(&mut self) -> Result<(), ConfigError> {
        self.flatten_per_app_videos();
        let text = store_properties(&self.properties, Some(CONFIG_HEADER));

        let result = self.write_atomically(text.as_bytes());
        match &result {
            Ok(()) => debug!("saved {} entries to {}", self.properties.len(), self.path.display()),
            Err(e) => error!("failed to save config: {e}"),
        }
        result
    }

    fn flatten_per_app_videos(&mut self) {
        let per_app = &self.per_app_videos;
        self.properties
            .retain(|key, _| app_id_from_key(key).map_or(true, |app| per_app.contains_key(app)));
        for (app, path) in per_app {
            self.properties.insert(app_video_key(app), path.clone());
        }
    }

    fn write_atomically(&self, content: &[u8]) -> Result<(), ConfigError> {
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| ConfigError::Io { path, source }
        };

        std::fs::create_dir_all(&self.dir).map_err(io_err(&self.dir))?;
        let tmp = self.path.with_extension("properties.tmp");
        if let Err(e) = std::fs::write(&tmp, content) {
            let _ = std::fs::remove_file(&tmp);
            return Err(io_err(&tmp)(e));
        }
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(io_err(&self.path)(e));
        }
        Ok(())
    }

    // ── Per-app videos ────────────────────────────────────────────────────────

    /// Video path configured for `app`, if any.
    pub fn per_app_video(&self, app: &str) -> Option<&str> {
        self.per_app_videos.get(app).map(String::as_str)
    }

    /// Returns `true` when `app` has its own video configured.
    pub fn has_per_app_video(&self, app: &str) -> bool {
        self.per_app_videos.contains_key(app)
    }

    /// All per-app overrides, ordered by package id.
    pub fn per_app_videos(&self) -> impl Iterator<Item = (&str, &str)> {
        self.per_app_videos
            .iter()
            .map(|(app, path)| (app.as_str(), path.as_str()))
    }

    /// Sets the video for `app`; an empty `path` removes the override.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the change could not be persisted.  The
    /// in-memory mapping is updated either way.
    pub fn set_per_app_video(&mut self, app: &str, path: &str) -> Result<(), ConfigError> {
        let key = app_video_key(app);
        if path.is_empty() {
            self.per_app_videos.remove(app);
            self.properties.remove(&key);
            info!("removed video override for {app}");
        } else {
            self.per_app_videos.insert(app.to_string(), path.to_string());
            self.properties.insert(key, path.to_string());
            info!("video override for {app}: {path}");
        }
        self.save()
    }

    /// The configured video for `app` if that file exists right now,
    /// otherwise `fallback`.
    pub fn resolve_video_for_app(&self, app: &str, fallback: &str) -> String {
        match self.per_app_video(app) {
            Some(path) if Path::new(path).exists() => path.to_string(),
            Some(path) => {
                debug!("video override {path} for {app} missing, using {fallback}");
                fallback.to_string()
            }
            None => fallback.to_string(),
        }
    }

    /// Selectable videos in the config directory.
    pub fn available_videos(&self) -> Vec<String> {
        list_available_videos(&self.dir)
    }
}

impl SettingsStore for ConfigStore {
    type Error = ConfigError;

    fn get_string(&self, key: &str, default: &str) -> String {
        self.properties
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn get_int(&self, key: &str, default: i32) -> i32 {
        parse_int(self.properties.get(key).map(String::as_str), default)
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        parse_bool(self.properties.get(key).map(String::as_str), default)
    }

    fn set_string(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        if let Some(app) = app_id_from_key(key) {
            return self.set_per_app_video(app, value);
        }
        self.properties.insert(key.to_string(), value.to_string());
        self.save()
    }

    fn set_int(&mut self, key: &str, value: i32) -> Result<(), ConfigError> {
        self.set_string(key, &value.to_string())
    }

    fn set_bool(&mut self, key: &str, value: bool) -> Result<(), ConfigError> {
        self.set_string(key, if value { "true" } else { "false" })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::fs;

    use vcam_core::settings::KEY_FPS_OVERRIDE;

    use super::*;

    fn read_file(store: &ConfigStore) -> String {
        fs::read_to_string(store.path()).expect("config file")
    }

    // ── Load / save ───────────────────────────────────────────────────────────

    #[test]
    fn test_open_without_file_uses_defaults_and_creates_dir() {
        // Arrange
        let root = tempfile::tempdir().expect("tempdir");
        let dir = root.path().join("VCAM");

        // Act
        let store = ConfigStore::open(&dir);

        // Assert
        assert!(dir.is_dir());
        assert_eq!(store.fps_override(), 0);
        assert_eq!(store.audio_volume_percent(), 100);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_save_writes_header_and_sorted_entries() {
        // Arrange
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = ConfigStore::new(dir.path());

        // Act
        store.set_show_fps_enabled(true).unwrap();
        store.set_fps_override(24).unwrap();

        // Assert
        let text = read_file(&store);
        assert!(text.starts_with("#VCAM Configuration\n"));
        assert!(text.contains("fps_override=24\n"));
        assert!(text.contains("show_fps=true\n"));
        assert!(!dir.path().join("vcam_config.properties.tmp").exists());
    }

    #[test]
    fn test_load_reads_file_written_by_another_writer() {
        // Arrange: date comment, colon separator, escaped key, Latin-1 byte.
        let dir = tempfile::tempdir().expect("tempdir");
        let mut bytes = b"#VCAM Configuration\n#Mon Jan 01 00:00:00 UTC 2024\n".to_vec();
        bytes.extend_from_slice(b"video_index: 2\napp_video_com.cam=/v/caf\xe9.mp4\n");
        fs::write(dir.path().join(CONFIG_FILE_NAME), bytes).unwrap();

        // Act
        let store = ConfigStore::open(dir.path());

        // Assert
        assert_eq!(store.video_index(), 2);
        assert_eq!(store.per_app_video("com.cam"), Some("/v/café.mp4"));
    }

    #[test]
    fn test_load_twice_equals_load_once() {
        // Arrange
        let dir = tempfile::tempdir().expect("tempdir");
        let mut writer = ConfigStore::new(dir.path());
        writer.set_loop_delay(500).unwrap();
        writer.set_per_app_video("com.a", "/a.mp4").unwrap();

        // Act
        let once = ConfigStore::open(dir.path());
        let mut twice = ConfigStore::open(dir.path());
        twice.load();

        // Assert
        assert_eq!(once.properties, twice.properties);
        assert_eq!(once.per_app_videos, twice.per_app_videos);
    }

    #[test]
    fn test_load_with_malformed_file_keeps_prior_state() {
        // Arrange
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = ConfigStore::new(dir.path());
        store.set_fps_override(30).unwrap();
        fs::write(store.path(), "fps_override=\\u12\n").unwrap();

        // Act
        store.load();

        // Assert
        assert_eq!(store.fps_override(), 30);
    }

    #[test]
    fn test_save_failure_returns_error_and_keeps_memory() {
        // Arrange: a directory occupies the file path, so rename fails.
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = ConfigStore::new(dir.path());
        fs::create_dir(store.path()).unwrap();

        // Act
        let result = store.set_int(KEY_FPS_OVERRIDE, 60);

        // Assert
        assert!(matches!(result, Err(ConfigError::Io { .. })));
        assert_eq!(store.fps_override(), 60);
    }

    #[test]
    fn test_failed_save_leaves_previous_file_untouched() {
        // Arrange: a valid file on disk, and a directory where the temp file goes.
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = ConfigStore::new(dir.path());
        store.set_loop_delay(500).unwrap();
        let before = fs::read(store.path()).unwrap();
        fs::create_dir(dir.path().join("vcam_config.properties.tmp")).unwrap();

        // Act
        let result = store.set_loop_delay(900);

        // Assert
        assert!(matches!(result, Err(ConfigError::Io { .. })));
        assert_eq!(fs::read(store.path()).unwrap(), before);
        assert_eq!(ConfigStore::open(dir.path()).loop_delay(), 500);
        assert_eq!(store.loop_delay(), 900);
    }

    #[test]
    fn test_malformed_values_read_as_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "audio_volume=loud\nmute_audio=yes\n",
        )
        .unwrap();

        let store = ConfigStore::open(dir.path());

        assert_eq!(store.audio_volume_percent(), 100);
        assert!(!store.is_muted());
    }

    // ── Per-app videos ────────────────────────────────────────────────────────

    #[test]
    fn test_per_app_video_round_trips_through_fresh_load() {
        // Arrange
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = ConfigStore::new(dir.path());

        // Act
        store.set_per_app_video("com.x", "/sdcard/x.mp4").unwrap();
        let reloaded = ConfigStore::open(dir.path());

        // Assert
        assert!(reloaded.has_per_app_video("com.x"));
        assert_eq!(reloaded.per_app_video("com.x"), Some("/sdcard/x.mp4"));
        assert_eq!(
            reloaded.get_string("app_video_com.x", ""),
            "/sdcard/x.mp4"
        );
    }

    #[test]
    fn test_set_per_app_video_empty_removes_mapping_and_key() {
        // Arrange
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = ConfigStore::new(dir.path());
        store.set_per_app_video("com.x", "/x.mp4").unwrap();

        // Act
        store.set_per_app_video("com.x", "").unwrap();

        // Assert
        assert!(!store.has_per_app_video("com.x"));
        assert!(!read_file(&store).contains("app_video_com.x"));
        assert!(!ConfigStore::open(dir.path()).has_per_app_video("com.x"));
    }

    #[test]
    fn test_set_string_on_app_video_key_updates_mapping() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = ConfigStore::new(dir.path());

        store.set_string("app_video_com.y", "/y.mp4").unwrap();

        assert_eq!(store.per_app_video("com.y"), Some("/y.mp4"));
        assert_eq!(store.per_app_videos().collect::<Vec<_>>(), vec![("com.y", "/y.mp4")]);
    }

    #[test]
    fn test_resolve_video_for_app_checks_existence_each_call() {
        // Arrange
        let dir = tempfile::tempdir().expect("tempdir");
        let video = dir.path().join("x.mp4");
        fs::write(&video, b"").unwrap();
        let video = video.to_string_lossy().into_owned();
        let mut store = ConfigStore::new(dir.path());
        store.set_per_app_video("com.x", &video).unwrap();
        assert_eq!(store.resolve_video_for_app("com.x", "/default.mp4"), video);

        // Act
        fs::remove_file(&video).unwrap();

        // Assert
        assert_eq!(store.resolve_video_for_app("com.x", "/default.mp4"), "/default.mp4");
        assert_eq!(store.resolve_video_for_app("com.none", "/default.mp4"), "/default.mp4");
    }

    #[test]
    fn test_available_videos_lists_config_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("b.mp4"), b"").unwrap();
        fs::write(dir.path().join("a.mp4"), b"").unwrap();
        let store = ConfigStore::open(dir.path());

        assert_eq!(store.available_videos(), vec!["a.mp4", "b.mp4"]);
    }
}
