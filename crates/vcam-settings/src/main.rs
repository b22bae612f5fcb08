//! VCAM settings tool entry point.
//!
//! Command-line stand-in for the settings screen.  Each subcommand is one UI
//! event: the screen is "resumed" (state re-read from disk), the event is
//! applied, and the result is printed.
//!
//! # Usage
//!
//! ```text
//! vcam-settings [OPTIONS] <COMMAND>
//!
//! Commands:
//!   status                      Show every toggle and field
//!   toggle <NAME> <on|off>      Flip a toggle (force-show, mute-audio, ...)
//!   fps <TEXT>                  Commit the FPS override field
//!   loop-delay <TEXT>           Commit the loop delay field (ms)
//!   volume <PERCENT>            Commit the volume slider
//!   videos                      List selectable videos
//!   select <INDEX>              Select a video by list index
//!   app-video <ACTION>          Per-app video overrides (list/set/clear/resolve)
//!   info                        Device information
//!   camera-info                 Camera stream information
//!
//! Options:
//!   --config <PATH>        Tool configuration file
//!   --private-dir <DIR>    App-private storage directory
//!   --public-root <DIR>    Public storage root
//!   --json                 Print the command result as JSON
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable           | Description                         |
//! |--------------------|-------------------------------------|
//! | `VCAM_CONFIG`      | Tool configuration file             |
//! | `VCAM_PRIVATE_DIR` | App-private storage directory       |
//! | `VCAM_PUBLIC_ROOT` | Public storage root                 |
//! | `RUST_LOG`         | Log filter (overrides `[logging]`)  |
//!
//! CLI args take precedence when both are present.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use vcam_core::DEFAULT_VIDEO_NAME;
use vcam_settings::application::sync_settings::SettingsController;
use vcam_settings::infrastructure::{
    storage::{
        app_config::{config_file_path, load_config, AppConfig},
        base_dir::{resolve_base_dir, shared_dir},
        ConfigStore,
    },
    ui_bridge::{self, CommandResult, SettingsSession},
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// VCAM settings tool.
///
/// Persists playback preferences for the virtual camera and toggles the
/// marker files the hooking module checks.
#[derive(Debug, Parser)]
#[command(
    name = "vcam-settings",
    about = "Settings tool for the VCAM virtual camera",
    version
)]
struct Cli {
    /// Tool configuration file (TOML).
    #[arg(long, env = "VCAM_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// App-private storage directory; `<dir>/VCAM` is used when writable.
    #[arg(long, env = "VCAM_PRIVATE_DIR", global = true)]
    private_dir: Option<PathBuf>,

    /// Public storage root; marker files go to `<root>/DCIM/Camera1`.
    #[arg(long, env = "VCAM_PUBLIC_ROOT", global = true)]
    public_root: Option<PathBuf>,

    /// Print the command result envelope as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show every toggle and field, re-read from disk.
    Status,
    /// Turn a toggle on or off.
    Toggle {
        /// force-show, disable, play-sound, force-private-dir, disable-toast,
        /// show-fps, show-info-overlay or mute-audio.
        name: String,
        state: Switch,
    },
    /// Commit the FPS override field (0 = no override).
    Fps { text: String },
    /// Commit the loop delay field in milliseconds.
    LoopDelay { text: String },
    /// Commit the volume slider (clamped to 0..=100).
    Volume {
        #[arg(allow_negative_numbers = true)]
        percent: i32,
    },
    /// List selectable videos.
    Videos,
    /// Select the video at INDEX in the `videos` listing.
    Select {
        #[arg(allow_negative_numbers = true)]
        index: i64,
    },
    /// Per-app video overrides.
    AppVideo {
        #[command(subcommand)]
        action: AppVideoCommand,
    },
    /// Show device information.
    Info,
    /// Show camera stream information.
    CameraInfo {
        #[arg(long, default_value_t = 1280)]
        width: u32,
        #[arg(long, default_value_t = 720)]
        height: u32,
        #[arg(long, default_value_t = 30)]
        fps: u32,
    },
}

#[derive(Debug, Subcommand)]
enum AppVideoCommand {
    /// List all overrides.
    List,
    /// Use PATH as the video for APP.
    Set { app: String, path: String },
    /// Remove the override for APP.
    Clear { app: String },
    /// Print the video APP would get right now.
    Resolve {
        app: String,
        /// Used when APP has no override or its file is gone
        /// [default: <base dir>/virtual.mp4].
        #[arg(long)]
        fallback: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Switch {
    On,
    Off,
}

impl Command {
    /// Whether the command reads or writes settings.  The others only print
    /// and never resolve or create a storage directory.
    fn needs_storage(&self) -> bool {
        !matches!(self, Command::Info | Command::CameraInfo { .. })
    }
}

impl Switch {
    fn enabled(self) -> bool {
        self == Switch::On
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

/// Loads the tool configuration and applies CLI/env overrides.
fn resolve_app_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => config_file_path().context("cannot locate the tool configuration file")?,
    };
    let mut config = load_config(&path)
        .with_context(|| format!("failed to load tool configuration from {}", path.display()))?;

    if let Some(dir) = &cli.private_dir {
        config.storage.private_dir = Some(dir.clone());
    }
    if let Some(root) = &cli.public_root {
        config.storage.public_root = root.clone();
    }
    Ok(config)
}

// ── Output ────────────────────────────────────────────────────────────────────

/// Prints a command result and turns a failed envelope into an error.
fn emit<T: Serialize>(
    result: CommandResult<T>,
    json: bool,
    render: impl FnOnce(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        let text = serde_json::to_string_pretty(&result).context("failed to encode result")?;
        println!("{text}");
    } else if let Some(data) = &result.data {
        println!("{}", render(data));
    }

    match result.error {
        Some(e) if !result.success => anyhow::bail!(e),
        _ => Ok(()),
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

fn run(
    command: Command,
    controller: &mut SettingsController<'_, ConfigStore>,
    json: bool,
) -> anyhow::Result<()> {
    if !command.needs_storage() {
        return run_without_storage(command, json);
    }

    // Every settings command starts from a freshly resumed screen.
    controller.sync();

    match command {
        Command::Status => emit(ui_bridge::get_settings_view(controller), json, |view| {
            let mut lines: Vec<String> = view
                .toggles
                .iter()
                .map(|t| match &t.marker_file {
                    Some(file) => format!("{:<18} {:<3} ({file})", t.name, on_off(t.enabled)),
                    None => format!("{:<18} {}", t.name, on_off(t.enabled)),
                })
                .collect();
            lines.push(format!("FPS override: {}", view.fps_override));
            lines.push(format!("Loop delay: {} ms", view.loop_delay));
            lines.push(view.volume_label.clone());
            lines.push(format!("Current: {}", view.current_video));
            lines.join("\n")
        }),
        Command::Toggle { name, state } => emit(
            ui_bridge::toggle_setting(controller, &name, state.enabled()),
            json,
            |r| format!("{} -> {} ({})", r.name, on_off(r.requested), r.outcome),
        ),
        Command::Fps { text } => emit(ui_bridge::commit_fps_field(controller, &text), json, |fps| {
            format!("FPS override: {fps}")
        }),
        Command::LoopDelay { text } => emit(
            ui_bridge::commit_loop_delay_field(controller, &text),
            json,
            |delay| format!("Loop delay: {delay} ms"),
        ),
        Command::Volume { percent } => emit(ui_bridge::set_volume(controller, percent), json, |v| {
            v.label.clone()
        }),
        Command::Videos => emit(ui_bridge::list_video_choices(controller), json, |choices| {
            let mut lines: Vec<String> = choices
                .videos
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let mark = if choices.preselected == Some(i) { '*' } else { ' ' };
                    format!("{mark} {i}: {name}")
                })
                .collect();
            lines.push(format!("Current: {}", choices.current));
            lines.join("\n")
        }),
        Command::Select { index } => emit(ui_bridge::select_video(controller, index), json, |name| {
            format!("Current: {name}")
        }),
        Command::AppVideo { action } => run_app_video(action, controller, json),
        other @ (Command::Info | Command::CameraInfo { .. }) => run_without_storage(other, json),
    }
}

fn run_without_storage(command: Command, json: bool) -> anyhow::Result<()> {
    match command {
        Command::Info => emit(ui_bridge::get_device_info(), json, |text| text.clone()),
        Command::CameraInfo { width, height, fps } => {
            emit(ui_bridge::get_camera_info(width, height, fps), json, |text| text.clone())
        }
        other => anyhow::bail!("command {other:?} needs settings storage"),
    }
}

fn run_app_video(
    action: AppVideoCommand,
    controller: &mut SettingsController<'_, ConfigStore>,
    json: bool,
) -> anyhow::Result<()> {
    match action {
        AppVideoCommand::List => emit(ui_bridge::per_app_list(controller), json, |entries| {
            entries
                .iter()
                .map(|e| {
                    let missing = if e.exists { "" } else { " [missing]" };
                    format!("{} -> {}{missing}", e.app, e.path)
                })
                .collect::<Vec<_>>()
                .join("\n")
        }),
        AppVideoCommand::Set { app, path } => {
            emit(ui_bridge::per_app_set(controller, &app, &path), json, |_| {
                format!("{app} -> {path}")
            })
        }
        AppVideoCommand::Clear { app } => emit(ui_bridge::per_app_clear(controller, &app), json, |existed| {
            if *existed {
                format!("{app}: override removed")
            } else {
                format!("{app}: no override")
            }
        }),
        AppVideoCommand::Resolve { app, fallback } => {
            let fallback = fallback.unwrap_or_else(|| {
                controller
                    .store()
                    .config_dir()
                    .join(DEFAULT_VIDEO_NAME)
                    .to_string_lossy()
                    .into_owned()
            });
            emit(
                ui_bridge::per_app_resolve(controller, &app, &fallback),
                json,
                |text| text.clone(),
            )
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// # What happens at startup
///
/// 1. CLI arguments are parsed with `clap`.
/// 2. The tool configuration is loaded and CLI/env overrides applied.
/// 3. `tracing_subscriber` is initialised.  `RUST_LOG` wins; otherwise the
///    `[logging] level` from the configuration is used.  Logs go to stderr.
/// 4. `info` and `camera-info` print and exit here.
/// 5. The base directory is resolved and a [`SettingsSession`] opened.
/// 6. The subcommand runs; queued notices are printed to stderr.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = resolve_app_config(&cli)?;

    // ── Logging setup ─────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    debug!("tool configuration: {config:?}");

    if !cli.command.needs_storage() {
        return run_without_storage(cli.command, cli.json);
    }

    let base_dir = resolve_base_dir(
        config.storage.private_dir.as_deref(),
        &config.storage.public_root,
    );
    let shared = shared_dir(&config.storage.public_root);
    info!(
        "base dir {}, shared dir {}",
        base_dir.display(),
        shared.display()
    );

    let mut session = SettingsSession::open(base_dir, shared);
    let mut controller = session.controller();

    let result = run(cli.command, &mut controller, cli.json);

    for notice in controller.take_notices() {
        eprintln!("note: {notice}");
    }
    result
}

// ── Tests ─────────────────────────────────────────────────────────────────────
