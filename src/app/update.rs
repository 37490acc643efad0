// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! The main `update()` function acts as a dispatcher, while specific handlers
//! are implemented in the `handlers` submodules organized by functional domain.
//!
//! # Handler Modules
//!
//! - `handlers::session`: Shell toggle, permission, capture, close, preview
//! - `handlers::system`: Context drawer, settings, gallery folder

use crate::app::state::{AppModel, Message};
use cosmic::Task;

impl AppModel {
    /// Main message handler - routes messages to appropriate handler methods.
    pub fn update(&mut self, message: Message) -> Task<cosmic::Action<Message>> {
        match message {
            // ===== UI Navigation =====
            Message::LaunchUrl(url) => self.handle_launch_url(url),
            Message::ToggleContextPage(page) => self.handle_toggle_context_page(page),

            // ===== Capture Session =====
            Message::OpenCamera => self.handle_open_camera(),
            Message::PermissionResolved(id, state) => self.handle_permission_resolved(id, state),
            Message::RequestPermission => self.handle_request_permission(),
            Message::Capture => self.handle_capture(),
            Message::CaptureFinished(id, ack) => self.handle_capture_finished(id, ack),
            Message::CloseCamera => self.handle_close_camera(),
            Message::PreviewTick => self.handle_preview_tick(),

            // ===== Acknowledgment dialog =====
            Message::DismissAcknowledgment => {
                self.acknowledgment = None;
                Task::none()
            }
            Message::OpenGalleryFolder => {
                self.acknowledgment = None;
                self.handle_open_gallery_folder()
            }

            // ===== Settings =====
            Message::UpdateConfig(config) => self.handle_update_config(config),
            Message::SetAppTheme(index) => self.handle_set_app_theme(index),
            Message::SetCameraFacing(index) => self.handle_set_camera_facing(index),
            Message::SetPhotoQuality(index) => self.handle_set_photo_quality(index),
            Message::SetSaveFolder(name) => self.handle_set_save_folder(name),
            Message::SetForceCameraPortal(enabled) => self.handle_set_force_camera_portal(enabled),
        }
    }
}
