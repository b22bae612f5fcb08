//! Human-readable device and camera summaries shown on the about screen.

use std::env::consts::{ARCH, FAMILY, OS};

/// Product name printed on the first line of [`device_info`].
pub const PRODUCT_NAME: &str = "VCAM - Virtual Camera";

/// Pixel format the hooking module delivers frames in.
pub const FRAME_FORMAT: &str = "YUV_420_888";

/// Multi-line summary of the host and tool version.
///
/// ```text
/// VCAM - Virtual Camera
/// Device: unix x86_64
/// OS: linux
/// VCAM Version: 4.4.0
/// ```
pub fn device_info() -> String {
    format!(
        "{PRODUCT_NAME}\nDevice: {FAMILY} {ARCH}\nOS: {OS}\nVCAM Version: {}",
        env!("CARGO_PKG_VERSION")
    )
}

/// Multi-line summary of a camera stream.
pub fn camera_info(width: u32, height: u32, fps: u32) -> String {
    format!("Resolution: {width}x{height}\nFPS: {fps}\nFormat: {FRAME_FORMAT}")
}
