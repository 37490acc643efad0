// SPDX-License-Identifier: GPL-3.0-only

//! Main application view
//!
//! - Shell: heading, hint and the "open camera" toggle
//! - Capture session: one branch per [`SessionView`]
//! - Live preview with capture and close controls overlaid at the bottom
//! - Acknowledgment dialog after each capture

use crate::app::state::{AppModel, Message};
use crate::backends::permission::PermissionState;
use crate::constants::ui;
use crate::fl;
use crate::session::{Acknowledgment, SessionView};
use cosmic::Element;
use cosmic::iced::{Alignment, Background, Color, ContentFit, Length};
use cosmic::widget;

impl AppModel {
    /// Build the main application view
    pub fn view(&self) -> Element<'_, Message> {
        match self.session.as_ref() {
            Some(session) if self.shell.session_visible() => self.session_view(session.view()),
            _ => self.shell_view(),
        }
    }

    /// Static text plus the toggle that mounts the capture session
    fn shell_view(&self) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let content = widget::column()
            .push(
                widget::text(fl!("shell-heading"))
                    .size(ui::HEADING_TEXT_SIZE)
                    .font(cosmic::font::bold()),
            )
            .push(widget::text(fl!("shell-subheading")).size(ui::BODY_TEXT_SIZE))
            .push(widget::vertical_space().height(spacing.space_m))
            .push(widget::button::suggested(fl!("open-camera")).on_press(Message::OpenCamera))
            .spacing(spacing.space_xs)
            .align_x(Alignment::Center);

        centered(content.into())
    }

    fn session_view(&self, view: SessionView) -> Element<'_, Message> {
        match view {
            SessionView::PermissionNeeded { state, requesting } => {
                self.permission_view(state, requesting)
            }
            SessionView::NoDevice => self.message_view(fl!("no-device")),
            SessionView::Closed => widget::Space::new(Length::Fill, Length::Fill).into(),
            SessionView::Live { capturing } => self.live_view(capturing),
        }
    }

    /// Explanation and manual retry button
    fn permission_view(&self, state: PermissionState, requesting: bool) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let explanation = match (requesting, state) {
            (true, _) => fl!("permission-requesting"),
            (false, PermissionState::Denied) => fl!("permission-denied"),
            (false, PermissionState::Restricted) => fl!("permission-restricted"),
            (false, _) => fl!("permission-missing"),
        };

        // Disabled while a request is in flight
        let request_button = widget::button::suggested(fl!("permission-request"))
            .on_press_maybe((!requesting).then_some(Message::RequestPermission));

        let content = widget::column()
            .push(widget::text(explanation).size(ui::BODY_TEXT_SIZE))
            .push(request_button)
            .push(widget::button::standard(fl!("close")).on_press(Message::CloseCamera))
            .spacing(spacing.space_s)
            .align_x(Alignment::Center);

        centered(content.into())
    }

    fn message_view(&self, text: String) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let content = widget::column()
            .push(widget::text(text).size(ui::BODY_TEXT_SIZE))
            .push(widget::button::standard(fl!("close")).on_press(Message::CloseCamera))
            .spacing(spacing.space_s)
            .align_x(Alignment::Center);

        centered(content.into())
    }

    /// Live preview with the control overlay
    fn live_view(&self, capturing: bool) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let preview: Element<'_, Message> = match &self.preview {
            Some(preview) => widget::image(preview.handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            // Camera is starting
            None => widget::Space::new(Length::Fill, Length::Fill).into(),
        };

        let hint = widget::text(if capturing {
            fl!("capturing")
        } else {
            fl!("capture-hint")
        })
        .size(ui::BODY_TEXT_SIZE)
        .class(cosmic::theme::Text::Color(Color::WHITE))
        .align_x(Alignment::Center);

        let controls = widget::row()
            .push(widget::Space::new(Length::Fill, Length::Shrink))
            .push(self.build_capture_button(capturing))
            .push(widget::Space::new(Length::Fill, Length::Shrink))
            .align_y(Alignment::Center)
            .width(Length::Fill);

        let close_row = widget::row()
            .push(widget::Space::new(Length::Fill, Length::Shrink))
            .push(widget::button::standard(fl!("close")).on_press(Message::CloseCamera));

        let overlay = widget::container(
            widget::column()
                .push(close_row)
                .push(widget::Space::new(Length::Shrink, Length::Fill))
                .push(
                    widget::container(
                        widget::column()
                            .push(hint)
                            .push(controls)
                            .spacing(spacing.space_xs)
                            .align_x(Alignment::Center),
                    )
                    .width(Length::Fill)
                    .padding(spacing.space_s)
                    .style(|_theme| widget::container::Style {
                        background: Some(Background::Color(Color::from_rgba(
                            0.0,
                            0.0,
                            0.0,
                            ui::OVERLAY_BACKGROUND_ALPHA,
                        ))),
                        ..Default::default()
                    }),
                )
                .push(widget::vertical_space().height(ui::OVERLAY_BOTTOM_MARGIN)),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(spacing.space_xs);

        widget::container(
            cosmic::iced::widget::stack![preview, overlay]
                .width(Length::Fill)
                .height(Length::Fill),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .style(|_theme| widget::container::Style {
            background: Some(Background::Color(Color::BLACK)),
            ..Default::default()
        })
        .into()
    }

    /// Round shutter button; gray and inert while a capture is in flight
    fn build_capture_button(&self, capturing: bool) -> Element<'_, Message> {
        let color = if capturing {
            Color::from_rgb(0.7, 0.7, 0.7)
        } else {
            Color::WHITE
        };

        // Press-down effect while busy
        let (inner_size, outer_size) = if capturing {
            (ui::CAPTURE_BUTTON_INNER * 0.85, ui::CAPTURE_BUTTON_OUTER * 0.85)
        } else {
            (ui::CAPTURE_BUTTON_INNER, ui::CAPTURE_BUTTON_OUTER)
        };

        let button_inner = widget::container(widget::Space::new(
            Length::Fixed(inner_size),
            Length::Fixed(inner_size),
        ))
        .style(move |_theme| widget::container::Style {
            background: Some(Background::Color(color)),
            border: cosmic::iced::Border {
                radius: [ui::CAPTURE_BUTTON_RADIUS * (inner_size / ui::CAPTURE_BUTTON_INNER); 4]
                    .into(),
                ..Default::default()
            },
            ..Default::default()
        });

        let button = widget::button::custom(button_inner)
            .on_press_maybe((!capturing).then_some(Message::Capture))
            .padding(0)
            .width(Length::Fixed(outer_size))
            .height(Length::Fixed(outer_size));

        // Fixed-size wrapper so the row does not shift when the button shrinks
        widget::container(button)
            .width(Length::Fixed(ui::CAPTURE_BUTTON_OUTER))
            .height(Length::Fixed(ui::CAPTURE_BUTTON_OUTER))
            .center_x(ui::CAPTURE_BUTTON_OUTER)
            .center_y(ui::CAPTURE_BUTTON_OUTER)
            .into()
    }

    /// Modal shown after each capture until dismissed
    pub(crate) fn acknowledgment_dialog(&self) -> Option<Element<'_, Message>> {
        let ack = self.acknowledgment.as_ref()?;

        let dialog = match ack {
            Acknowledgment::Saved(path) => widget::dialog()
                .title(fl!("photo-saved-title"))
                .body(format!("{}\n{}", fl!("photo-saved-body"), path.display()))
                .icon(widget::icon::from_name("emblem-ok-symbolic").size(32))
                .primary_action(
                    widget::button::suggested(fl!("ok")).on_press(Message::DismissAcknowledgment),
                )
                .secondary_action(
                    widget::button::standard(fl!("open-folder"))
                        .on_press(Message::OpenGalleryFolder),
                ),
            Acknowledgment::Failed(err) => widget::dialog()
                .title(fl!("photo-failed-title"))
                .body(format!("{}\n{}", fl!("photo-failed-body"), err))
                .icon(widget::icon::from_name("dialog-error-symbolic").size(32))
                .primary_action(
                    widget::button::suggested(fl!("ok")).on_press(Message::DismissAcknowledgment),
                ),
        };

        Some(dialog.into())
    }
}

fn centered(content: Element<'_, Message>) -> Element<'_, Message> {
    widget::container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}
