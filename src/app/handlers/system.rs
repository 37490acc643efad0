// SPDX-License-Identifier: GPL-3.0-only

//! System handlers
//!
//! Handles the context drawer, settings changes and the gallery folder.

use crate::app::state::{AppModel, ContextPage, Message};
use crate::backends::camera::CameraFacing;
use crate::config::AppTheme;
use crate::constants::PhotoQuality;
use crate::storage::gallery_directory;
use cosmic::Task;
use cosmic::cosmic_config::CosmicConfigEntry;
use tracing::{error, info};

impl AppModel {
    pub(crate) fn handle_launch_url(&self, url: String) -> Task<cosmic::Action<Message>> {
        if let Err(err) = open::that_detached(&url) {
            error!(url = %url, error = %err, "Failed to open URL");
        }
        Task::none()
    }

    pub(crate) fn handle_toggle_context_page(
        &mut self,
        context_page: ContextPage,
    ) -> Task<cosmic::Action<Message>> {
        if self.context_page == context_page {
            self.core.window.show_context = !self.core.window.show_context;
        } else {
            self.context_page = context_page;
            self.core.window.show_context = true;
        }
        Task::none()
    }

    pub(crate) fn handle_open_gallery_folder(&self) -> Task<cosmic::Action<Message>> {
        let dir = gallery_directory(&self.config.save_folder_name);
        info!(path = %dir.display(), "Opening gallery directory");

        if let Err(e) = open::that_detached(&dir) {
            error!(error = %e, path = %dir.display(), "Failed to open gallery directory");
        }
        Task::none()
    }

    /// Persist the current config
    fn save_config(&self, what: &str) {
        if let Some(handler) = self.config_handler.as_ref()
            && let Err(err) = self.config.write_entry(handler)
        {
            error!(?err, setting = what, "Failed to save setting");
        }
    }

    pub(crate) fn handle_update_config(
        &mut self,
        config: crate::config::Config,
    ) -> Task<cosmic::Action<Message>> {
        info!("UpdateConfig received");
        let theme_changed = config.app_theme != self.config.app_theme;
        self.config = config;
        if theme_changed {
            cosmic::command::set_theme(self.config.app_theme.theme())
        } else {
            Task::none()
        }
    }

    pub(crate) fn handle_set_app_theme(&mut self, index: usize) -> Task<cosmic::Action<Message>> {
        let Some(app_theme) = AppTheme::ALL.get(index).copied() else {
            return Task::none();
        };

        info!(?app_theme, "Setting application theme");
        self.config.app_theme = app_theme;
        self.save_config("app_theme");

        cosmic::command::set_theme(app_theme.theme())
    }

    /// Takes effect on the next mount
    pub(crate) fn handle_set_camera_facing(
        &mut self,
        index: usize,
    ) -> Task<cosmic::Action<Message>> {
        if let Some(facing) = CameraFacing::ALL.get(index).copied() {
            info!(%facing, "Setting camera facing");
            self.config.camera_facing = facing;
            self.save_config("camera_facing");
        }
        Task::none()
    }

    pub(crate) fn handle_set_photo_quality(
        &mut self,
        index: usize,
    ) -> Task<cosmic::Action<Message>> {
        if let Some(quality) = PhotoQuality::ALL.get(index).copied() {
            info!(?quality, "Setting photo quality");
            self.config.photo_quality = quality;
            self.save_config("photo_quality");
        }
        Task::none()
    }

    pub(crate) fn handle_set_save_folder(&mut self, name: String) -> Task<cosmic::Action<Message>> {
        // Path separators would escape the pictures directory
        let name: String = name.chars().filter(|c| !matches!(c, '/' | '\\')).collect();
        self.config.save_folder_name = name;
        self.save_config("save_folder_name");
        Task::none()
    }

    pub(crate) fn handle_set_force_camera_portal(
        &mut self,
        enabled: bool,
    ) -> Task<cosmic::Action<Message>> {
        info!(enabled, "Setting forced camera portal");
        self.config.force_camera_portal = enabled;
        self.save_config("force_camera_portal");
        Task::none()
    }
}
