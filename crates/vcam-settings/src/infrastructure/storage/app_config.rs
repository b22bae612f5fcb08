//! TOML configuration of the settings tool itself.
//!
//! This is *not* the file the hooking module reads (that is
//! `vcam_config.properties`, see `config_store`).  It only tells the tool
//! where the storage roots are and how verbose to log:
//!
//! - Windows:  `%APPDATA%\VCAM\config.toml`
//! - Linux:    `~/.config/vcam/config.toml`
//! - macOS:    `~/Library/Application Support/VCAM/config.toml`
//!
//! ```toml
//! [storage]
//! private_dir = "/home/me/.local/share/vcam/files"
//! public_root = "/home/me"
//!
//! [logging]
//! level = "debug"
//! ```
//!
//! Every field has a serde default, so a missing file, a missing section or a
//! missing key all fall back to the values below.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for the tool configuration file.
#[derive(Debug, Error)]
pub enum AppConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level tool configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Storage roots, standing in for the device's app-private and public storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    /// App-private external directory; the base dir is `<private_dir>/VCAM`
    /// when it is writable.
    #[serde(default = "default_private_dir")]
    pub private_dir: Option<PathBuf>,
    /// Public storage root; marker files live in `<public_root>/DCIM/Camera1`.
    #[serde(default = "default_public_root")]
    pub public_root: PathBuf,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `tracing` level used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_private_dir() -> Option<PathBuf> {
    platform_data_dir().map(|d| d.join("vcam").join("files"))
}
fn default_public_root() -> PathBuf {
    home_dir().unwrap_or_else(|| PathBuf::from("."))
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            private_dir: default_private_dir(),
            public_root: default_public_root(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Resolves the default path of the tool configuration file.
///
/// # Errors
///
/// Returns [`AppConfigError::NoPlatformConfigDir`] when the platform config
/// base directory cannot be determined from the environment.
pub fn config_file_path() -> Result<PathBuf, AppConfigError> {
    platform_config_dir()
        .map(|dir| dir.join("config.toml"))
        .ok_or(AppConfigError::NoPlatformConfigDir)
}

/// Loads the configuration from `path`, returning defaults if the file does
/// not exist.
///
/// # Errors
///
/// Returns [`AppConfigError::Io`] for file-system errors other than "not
/// found", and [`AppConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: &Path) -> Result<AppConfig, AppConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(source) => Err(AppConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn home_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("USERPROFILE").map(PathBuf::from)
    }

    #[cfg(not(target_os = "windows"))]
    {
        std::env::var_os("HOME").map(PathBuf::from)
    }
}

/// Resolves the platform config directory including the `vcam` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("VCAM"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| home_dir().map(|h| h.join(".config")))?;
        Some(base.join("vcam"))
    }

    #[cfg(target_os = "macos")]
    {
        home_dir().map(|h| h.join("Library").join("Application Support").join("VCAM"))
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

/// Resolves the platform data base directory (without a `vcam` subdirectory).
fn platform_data_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("LOCALAPPDATA").map(PathBuf::from)
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_DATA_HOME or ~/.local/share
        std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| home_dir().map(|h| h.join(".local").join("share")))
    }

    #[cfg(target_os = "macos")]
    {
        home_dir().map(|h| h.join("Library").join("Application Support"))
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
