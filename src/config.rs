// SPDX-License-Identifier: GPL-3.0-only

use crate::backends::camera::types::CameraFacing;
use crate::constants::{DEFAULT_SAVE_FOLDER, PhotoQuality};
use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use cosmic::{Theme, theme};
use serde::{Deserialize, Serialize};

/// Application theme preference
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum AppTheme {
    /// Follow system theme (dark or light based on system setting)
    #[default]
    System,
    /// Always use dark theme
    Dark,
    /// Always use light theme
    Light,
}

impl AppTheme {
    /// Dropdown order in the settings drawer
    pub const ALL: [AppTheme; 3] = [AppTheme::System, AppTheme::Dark, AppTheme::Light];

    /// Get the COSMIC theme for this app theme preference
    pub fn theme(&self) -> Theme {
        match self {
            Self::Dark => {
                let mut theme = theme::system_dark();
                theme.theme_type.prefer_dark(Some(true));
                theme
            }
            Self::Light => {
                let mut theme = theme::system_light();
                theme.theme_type.prefer_dark(Some(false));
                theme
            }
            Self::System => theme::system_preference(),
        }
    }
}

#[derive(Debug, Clone, CosmicConfigEntry, Eq, PartialEq, Serialize, Deserialize)]
#[version = 1]
pub struct Config {
    /// Application theme preference (System, Dark, Light)
    pub app_theme: AppTheme,
    /// Which camera a session looks up on mount
    pub camera_facing: CameraFacing,
    /// Gallery sub-folder under the pictures directory
    pub save_folder_name: String,
    /// JPEG quality preset for captured photos
    pub photo_quality: PhotoQuality,
    /// Ask the camera portal even when running outside a sandbox
    pub force_camera_portal: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_theme: AppTheme::default(),
            camera_facing: CameraFacing::Back,
            save_folder_name: DEFAULT_SAVE_FOLDER.to_string(),
            photo_quality: PhotoQuality::default(),
            force_camera_portal: false,
        }
    }
}

impl Config {
    /// Load the stored config, falling back to defaults
    ///
    /// Used by the headless front-ends; the GUI loads through its own
    /// config handle so it can also watch for changes.
    pub fn load(app_id: &str) -> Self {
        match cosmic_config::Config::new(app_id, Self::VERSION) {
            Ok(handle) => match Self::get_entry(&handle) {
                Ok(config) => config,
                Err((errors, config)) => {
                    tracing::warn!(?errors, "Errors loading config");
                    config
                }
            },
            Err(why) => {
                tracing::debug!(%why, "No config handle, using defaults");
                Self::default()
            }
        }
    }
}
