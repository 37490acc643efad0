// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default gallery sub-folder (under the XDG pictures directory)
pub const DEFAULT_SAVE_FOLDER: &str = "Camera";

/// Prefix for temporary capture files written before the gallery save
pub const TEMP_CAPTURE_PREFIX: &str = "camroll-capture-";

/// JPEG quality presets for captured photos
///
/// The capture step always produces a JPEG; the preset trades file size
/// against compression artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PhotoQuality {
    /// High compression
    Low,
    /// Balanced
    Medium,
    /// Low compression (default)
    #[default]
    High,
    /// Minimal compression
    Maximum,
}

impl PhotoQuality {
    /// All presets in ascending quality, for dropdowns
    pub const ALL: [PhotoQuality; 4] = [
        PhotoQuality::Low,
        PhotoQuality::Medium,
        PhotoQuality::High,
        PhotoQuality::Maximum,
    ];

    /// Get display name for the preset
    pub fn display_name(&self) -> &'static str {
        match self {
            PhotoQuality::Low => "Low",
            PhotoQuality::Medium => "Medium",
            PhotoQuality::High => "High",
            PhotoQuality::Maximum => "Maximum",
        }
    }

    /// JPEG encoder quality (1-100)
    pub fn jpeg_quality(&self) -> u8 {
        match self {
            PhotoQuality::Low => 60,
            PhotoQuality::Medium => 80,
            PhotoQuality::High => 92,
            PhotoQuality::Maximum => 98,
        }
    }
}

/// UI Constants
pub mod ui {
    /// Capture button size (outer)
    pub const CAPTURE_BUTTON_OUTER: f32 = 64.0;

    /// Capture button size (inner)
    pub const CAPTURE_BUTTON_INNER: f32 = 52.0;

    /// Capture button border radius
    pub const CAPTURE_BUTTON_RADIUS: f32 = 26.0;

    /// Background alpha of the control overlay drawn on top of the preview
    pub const OVERLAY_BACKGROUND_ALPHA: f32 = 0.5;

    /// Distance of the control overlay from the bottom edge
    pub const OVERLAY_BOTTOM_MARGIN: u16 = 16;

    /// Shell heading text size
    pub const HEADING_TEXT_SIZE: u16 = 24;

    /// Shell subheading / hint text size
    pub const BODY_TEXT_SIZE: u16 = 16;

    /// Minimum window size
    pub const MIN_WINDOW_WIDTH: f32 = 360.0;
    pub const MIN_WINDOW_HEIGHT: f32 = 240.0;
}

/// GStreamer pipeline constants
pub mod pipeline {
    /// Maximum buffer queue size (keep small for low latency)
    pub const MAX_BUFFERS: u32 = 2;

    /// Output pixel format for appsink
    pub const OUTPUT_FORMAT: &str = "RGBA";

    /// Name of the appsink element in the launch string
    pub const SINK_NAME: &str = "sink";
}

/// Timing constants
pub mod timing {
    use super::Duration;

    /// Frame counter modulo for periodic logging
    pub const FRAME_LOG_INTERVAL: u64 = 30;

    /// Pipeline state change timeout on stop
    pub const STOP_TIMEOUT_SECS: u64 = 2;

    /// Pipeline playing state timeout on start
    pub const START_TIMEOUT_SECS: u64 = 5;

    /// How long a capture waits for the first frame after activation
    pub const FIRST_FRAME_TIMEOUT: Duration = Duration::from_secs(3);

    /// Preview refresh interval for the GUI (~30fps)
    pub const PREVIEW_REFRESH: Duration = Duration::from_millis(33);

    /// Input poll interval for the terminal front-end (~60fps)
    pub const TERMINAL_POLL: Duration = Duration::from_millis(16);

    /// Frames skipped by the headless CLI capture while exposure settles
    pub const CLI_WARMUP: Duration = Duration::from_millis(500);
}

/// XDG desktop portal names used for the camera permission check
pub mod portal {
    pub const BUS_NAME: &str = "org.freedesktop.portal.Desktop";
    pub const OBJECT_PATH: &str = "/org/freedesktop/portal/desktop";
    pub const CAMERA_INTERFACE: &str = "org.freedesktop.portal.Camera";
    pub const REQUEST_INTERFACE: &str = "org.freedesktop.portal.Request";

    /// `Response` code: the user granted access
    pub const RESPONSE_SUCCESS: u32 = 0;
    /// `Response` code: the user dismissed or denied the prompt
    pub const RESPONSE_CANCELLED: u32 = 1;
}

/// Application version and runtime information
pub mod app_info {
    use std::path::Path;

    /// Application ID in RDNN format; also names the config directory
    pub const APP_ID: &str = "dev.camroll.CamRoll";

    pub const REPOSITORY: &str = "https://github.com/camroll/camroll";

    /// Freedesktop icon name used for the window and about page
    pub const ICON_NAME: &str = "camera-photo";

    /// Get the application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }

    /// Check if the application is running inside a Flatpak sandbox
    pub fn is_flatpak() -> bool {
        Path::new("/.flatpak-info").exists()
    }

    /// Get the runtime environment string (e.g., "Flatpak" or "Native")
    pub fn runtime_environment() -> &'static str {
        if is_flatpak() { "Flatpak" } else { "Native" }
    }
}
