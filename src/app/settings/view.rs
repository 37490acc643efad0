// SPDX-License-Identifier: MPL-2.0

//! Settings drawer view

use crate::app::state::{AppModel, ContextPage, Message};
use crate::backends::camera::CameraFacing;
use crate::config::AppTheme;
use crate::constants::{DEFAULT_SAVE_FOLDER, PhotoQuality, app_info};
use crate::fl;
use cosmic::Element;
use cosmic::app::context_drawer;
use cosmic::widget;

impl AppModel {
    /// Create the settings view for the context drawer
    ///
    /// Camera choices apply to the next time the camera is opened.
    pub fn settings_view(&self) -> context_drawer::ContextDrawer<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let theme_index = AppTheme::ALL
            .iter()
            .position(|t| *t == self.config.app_theme);
        let theme_dropdown = widget::dropdown(
            &self.theme_dropdown_options,
            theme_index,
            Message::SetAppTheme,
        );

        let facing_index = CameraFacing::ALL
            .iter()
            .position(|f| *f == self.config.camera_facing);
        let facing_dropdown = widget::dropdown(
            &self.facing_dropdown_options,
            facing_index,
            Message::SetCameraFacing,
        );

        let quality_index = PhotoQuality::ALL
            .iter()
            .position(|q| *q == self.config.photo_quality);
        let quality_dropdown = widget::dropdown(
            &self.quality_dropdown_options,
            quality_index,
            Message::SetPhotoQuality,
        );

        let folder_input = widget::text_input(DEFAULT_SAVE_FOLDER, &self.config.save_folder_name)
            .on_input(Message::SetSaveFolder);

        let portal_toggle = widget::toggler(self.config.force_camera_portal)
            .on_toggle(Message::SetForceCameraPortal);

        let version_info = format!(
            "{} ({})",
            fl!("version", version = app_info::version()),
            app_info::runtime_environment()
        );

        let settings_column: Element<'_, Message> = widget::column()
            .push(widget::text(fl!("appearance")).size(16).font(cosmic::font::bold()))
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(widget::text(fl!("theme")).size(14))
            .push(theme_dropdown)
            .push(widget::vertical_space().height(spacing.space_l))
            .push(widget::divider::horizontal::default())
            .push(widget::vertical_space().height(spacing.space_s))
            .push(widget::text(fl!("camera")).size(16).font(cosmic::font::bold()))
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(widget::text(fl!("camera-facing")).size(14))
            .push(facing_dropdown)
            .push(widget::vertical_space().height(spacing.space_s))
            .push(widget::text(fl!("photo-quality")).size(14))
            .push(quality_dropdown)
            .push(widget::vertical_space().height(spacing.space_s))
            .push(widget::text(fl!("save-folder")).size(14))
            .push(folder_input)
            .push(widget::vertical_space().height(spacing.space_s))
            .push(
                widget::row()
                    .push(widget::text(fl!("force-portal")).size(14))
                    .push(widget::horizontal_space().width(cosmic::iced::Length::Fill))
                    .push(portal_toggle)
                    .align_y(cosmic::iced::Alignment::Center),
            )
            .push(widget::vertical_space().height(spacing.space_l))
            .push(widget::divider::horizontal::default())
            .push(widget::vertical_space().height(spacing.space_s))
            .push(
                widget::text(version_info)
                    .size(12)
                    .class(cosmic::theme::Text::Accent),
            )
            .spacing(0)
            .into();

        context_drawer::context_drawer(
            settings_column,
            Message::ToggleContextPage(ContextPage::Settings),
        )
        .title(fl!("settings"))
    }
}
