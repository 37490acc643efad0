// SPDX-License-Identifier: GPL-3.0-only

//! Application state management

use crate::backends::camera::CameraBackend;
use crate::backends::permission::PermissionState;
use crate::config::Config;
use crate::session::{Acknowledgment, CaptureSession, SessionId};
use crate::shell::Shell;
use cosmic::cosmic_config;
use cosmic::widget::about::About;
use std::sync::Arc;
use std::time::Instant;

/// The context page to display in the context drawer.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ContextPage {
    #[default]
    About,
    Settings,
}

/// Latest preview image handed to the view
#[derive(Debug, Clone)]
pub struct PreviewImage {
    pub handle: cosmic::widget::image::Handle,
    /// Capture instant of the frame behind `handle`
    pub captured_at: Instant,
}

/// The application model stores app-specific state used to describe its interface and
/// drive its logic.
pub struct AppModel {
    /// Application state which is managed by the COSMIC runtime.
    pub core: cosmic::Core,
    /// Display a context drawer with the designated page if defined.
    pub context_page: ContextPage,
    /// The about page for this app.
    pub about: About,
    /// Configuration data that persists between application runs.
    pub config: Config,
    /// Configuration handler for saving settings
    pub config_handler: Option<cosmic_config::Config>,
    /// Whether the capture session is mounted
    pub shell: Shell,
    /// Mounted capture session
    pub session: Option<CaptureSession>,
    /// Camera backend shared by every mount
    pub backend: Arc<dyn CameraBackend>,
    /// Preview shown while the session is live
    pub preview: Option<PreviewImage>,
    /// Capture outcome waiting to be dismissed
    pub acknowledgment: Option<Acknowledgment>,
    /// Dropdown labels (localized once at startup)
    pub theme_dropdown_options: Vec<String>,
    pub facing_dropdown_options: Vec<String>,
    pub quality_dropdown_options: Vec<String>,
}

/// Messages emitted by the application and its widgets.
#[derive(Debug, Clone)]
pub enum Message {
    // ===== UI Navigation =====
    /// Open external URL (repository, etc.)
    LaunchUrl(String),
    /// Toggle context drawer page (About, Settings)
    ToggleContextPage(ContextPage),

    // ===== Capture Session =====
    /// Shell toggle: mount the capture session
    OpenCamera,
    /// Permission check finished for a mount
    PermissionResolved(SessionId, PermissionState),
    /// User asked to re-request camera permission
    RequestPermission,
    /// Capture button pressed
    Capture,
    /// Capture-and-save finished for a mount
    CaptureFinished(SessionId, Acknowledgment),
    /// Close button pressed
    CloseCamera,
    /// Preview refresh timer
    PreviewTick,

    // ===== Acknowledgment dialog =====
    DismissAcknowledgment,
    /// Open the gallery folder in the file manager
    OpenGalleryFolder,

    // ===== Settings =====
    /// Configuration changed on disk
    UpdateConfig(Config),
    SetAppTheme(usize),
    SetCameraFacing(usize),
    SetPhotoQuality(usize),
    SetSaveFolder(String),
    SetForceCameraPortal(bool),
}
