// SPDX-License-Identifier: MPL-2.0

//! Main application module
//!
//! The libcosmic front-end over the shell and capture session.
//!
//! # Architecture
//!
//! - `state`: Application state types (AppModel, Message, ContextPage)
//! - `view`: Shell view, live session view and acknowledgment dialog
//! - `settings`: Settings drawer UI
//! - `update`: Message dispatch
//! - `handlers`: Message handlers grouped by domain

mod handlers;
mod settings;
mod state;
mod update;
mod view;

use crate::backends::camera::CameraFacing;
use crate::config::{AppTheme, Config};
use crate::constants::{PhotoQuality, app_info, timing};
use crate::fl;
use crate::session::SessionView;
use cosmic::app::context_drawer;
use cosmic::cosmic_config::{self, CosmicConfigEntry};
use cosmic::iced::Subscription;
use cosmic::widget::{self, about::About};
use cosmic::{Element, Task};
pub use state::{AppModel, ContextPage, Message, PreviewImage};
use tracing::{error, info};

impl cosmic::Application for AppModel {
    /// The async executor that will be used to run your application's commands.
    type Executor = cosmic::executor::Default;

    /// Data that your application receives to its init method.
    type Flags = ();

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    /// Unique identifier in RDNN (reverse domain name notation) format.
    const APP_ID: &'static str = app_info::APP_ID;

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    /// Initializes the application with any given flags and startup commands.
    fn init(
        core: cosmic::Core,
        _flags: Self::Flags,
    ) -> (Self, Task<cosmic::Action<Self::Message>>) {
        let about = About::default()
            .name(fl!("app-title"))
            .icon(widget::icon::from_name(app_info::ICON_NAME).handle())
            .version(env!("GIT_VERSION"))
            .links([(fl!("repository"), app_info::REPOSITORY)])
            .license(env!("CARGO_PKG_LICENSE"));

        // Load configuration
        let (config_handler, config) =
            match cosmic_config::Config::new(Self::APP_ID, Config::VERSION) {
                Ok(handler) => {
                    let config = match Config::get_entry(&handler) {
                        Ok(config) => config,
                        Err((errors, config)) => {
                            error!(?errors, "Errors loading config");
                            config
                        }
                    };
                    (Some(handler), config)
                }
                Err(err) => {
                    error!(%err, "Failed to create config handler");
                    (None, Config::default())
                }
            };

        // GStreamer must be initialized before any pipeline is built
        if let Err(e) = gstreamer::init() {
            error!(error = %e, "Failed to initialize GStreamer");
        }

        let theme_dropdown_options = AppTheme::ALL
            .iter()
            .map(|theme| match theme {
                AppTheme::System => fl!("match-desktop"),
                AppTheme::Dark => fl!("dark"),
                AppTheme::Light => fl!("light"),
            })
            .collect();
        let facing_dropdown_options = CameraFacing::ALL
            .iter()
            .map(|facing| match facing {
                CameraFacing::Back => fl!("facing-back"),
                CameraFacing::Front => fl!("facing-front"),
                CameraFacing::External => fl!("facing-external"),
                CameraFacing::Any => fl!("facing-any"),
            })
            .collect();
        let quality_dropdown_options = PhotoQuality::ALL
            .iter()
            .map(|quality| match quality {
                PhotoQuality::Low => fl!("quality-low"),
                PhotoQuality::Medium => fl!("quality-medium"),
                PhotoQuality::High => fl!("quality-high"),
                PhotoQuality::Maximum => fl!("quality-maximum"),
            })
            .collect();

        info!(theme = ?config.app_theme, facing = %config.camera_facing, "Starting application");
        let theme_task = cosmic::command::set_theme(config.app_theme.theme());

        let app = AppModel {
            core,
            context_page: ContextPage::default(),
            about,
            config,
            config_handler,
            shell: crate::shell::Shell::new(),
            session: None,
            backend: crate::backends::camera::get_backend(),
            preview: None,
            acknowledgment: None,
            theme_dropdown_options,
            facing_dropdown_options,
            quality_dropdown_options,
        };

        (app, theme_task)
    }

    /// Elements to pack at the end of the header bar.
    fn header_end(&self) -> Vec<Element<'_, Self::Message>> {
        vec![
            widget::button::icon(widget::icon::from_name("preferences-system-symbolic"))
                .on_press(Message::ToggleContextPage(ContextPage::Settings))
                .into(),
            widget::button::icon(widget::icon::from_name("help-about-symbolic"))
                .on_press(Message::ToggleContextPage(ContextPage::About))
                .into(),
        ]
    }

    /// Display a context drawer if the context page is requested.
    fn context_drawer(&self) -> Option<context_drawer::ContextDrawer<'_, Self::Message>> {
        if !self.core.window.show_context {
            return None;
        }

        Some(match self.context_page {
            ContextPage::About => context_drawer::about(
                &self.about,
                |url| Message::LaunchUrl(url.to_string()),
                Message::ToggleContextPage(ContextPage::About),
            ),
            ContextPage::Settings => self.settings_view(),
        })
    }

    /// Modal acknowledgment of the last capture
    fn dialog(&self) -> Option<Element<'_, Self::Message>> {
        self.acknowledgment_dialog()
    }

    /// Describes the interface based on the current state of the application model.
    fn view(&self) -> Element<'_, Self::Message> {
        self.view()
    }

    /// Register subscriptions for this application.
    fn subscription(&self) -> Subscription<Self::Message> {
        let config_sub = self
            .core()
            .watch_config::<Config>(Self::APP_ID)
            .map(|update| Message::UpdateConfig(update.config));

        // Poll the frame slot only while the preview is live
        let preview_live = self
            .session
            .as_ref()
            .is_some_and(|session| matches!(session.view(), SessionView::Live { .. }));

        if preview_live {
            Subscription::batch([
                config_sub,
                cosmic::iced::time::every(timing::PREVIEW_REFRESH).map(|_| Message::PreviewTick),
            ])
        } else {
            config_sub
        }
    }

    /// Handles messages emitted by the application and its widgets.
    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        self.update(message)
    }
}
