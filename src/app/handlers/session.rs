// SPDX-License-Identifier: GPL-3.0-only

//! Capture session handlers
//!
//! Mounting, permission, capture, close and preview refresh. Async results
//! carry the [`SessionId`] of the mount that started them; anything arriving
//! after that mount is gone is dropped.

use crate::app::state::{AppModel, Message, PreviewImage};
use crate::backends::permission::{PermissionState, PortalPermission};
use crate::session::{Acknowledgment, CaptureSession, SessionDeps, SessionId, SessionOptions};
use crate::storage::DirectoryGallery;
use cosmic::Task;
use std::sync::Arc;
use tracing::{debug, info};

impl AppModel {
    /// Capabilities for a new mount, built from the current config
    fn session_deps(&self) -> SessionDeps {
        SessionDeps {
            backend: Arc::clone(&self.backend),
            gate: Arc::new(PortalPermission::new(self.config.force_camera_portal)),
            gallery: Arc::new(DirectoryGallery::pictures(&self.config.save_folder_name)),
        }
    }

    pub(crate) fn handle_open_camera(&mut self) -> Task<cosmic::Action<Message>> {
        let Some(id) = self.shell.open() else {
            return Task::none();
        };

        let options = SessionOptions {
            facing: self.config.camera_facing,
            quality: self.config.photo_quality,
        };
        let (session, check) = CaptureSession::mount(id, options, self.session_deps());
        self.session = Some(session);
        self.preview = None;

        Task::perform(check, move |state| {
            cosmic::Action::App(Message::PermissionResolved(id, state))
        })
    }

    pub(crate) fn handle_permission_resolved(
        &mut self,
        id: SessionId,
        state: PermissionState,
    ) -> Task<cosmic::Action<Message>> {
        match self.session.as_mut() {
            Some(session) => {
                session.permission_resolved(id, state);
            }
            None => debug!(session = %id, "Permission result for unmounted session"),
        }
        Task::none()
    }

    pub(crate) fn handle_request_permission(&mut self) -> Task<cosmic::Action<Message>> {
        let Some(session) = self.session.as_mut() else {
            return Task::none();
        };
        let id = session.id();
        match session.request_permission() {
            Some(check) => Task::perform(check, move |state| {
                cosmic::Action::App(Message::PermissionResolved(id, state))
            }),
            None => Task::none(),
        }
    }

    pub(crate) fn handle_capture(&mut self) -> Task<cosmic::Action<Message>> {
        let Some(session) = self.session.as_mut() else {
            return Task::none();
        };
        let id = session.id();
        match session.begin_capture() {
            Some(capture) => Task::perform(capture, move |ack| {
                cosmic::Action::App(Message::CaptureFinished(id, ack))
            }),
            None => Task::none(),
        }
    }

    pub(crate) fn handle_capture_finished(
        &mut self,
        id: SessionId,
        ack: Acknowledgment,
    ) -> Task<cosmic::Action<Message>> {
        let Some(session) = self.session.as_mut() else {
            debug!(session = %id, "Capture result for unmounted session");
            return Task::none();
        };
        if let Some(ack) = session.finish_capture(id, ack) {
            self.acknowledgment = Some(ack);
        }
        Task::none()
    }

    pub(crate) fn handle_close_camera(&mut self) -> Task<cosmic::Action<Message>> {
        if let Some(session) = self.session.as_mut() {
            let shell = &mut self.shell;
            session.close(|| shell.session_closed());
        }
        // Shell unmounts the session once it regains control
        if !self.shell.session_visible() {
            self.session = None;
            self.preview = None;
            info!("Capture session unmounted");
        }
        Task::none()
    }

    pub(crate) fn handle_preview_tick(&mut self) -> Task<cosmic::Action<Message>> {
        let Some(frame) = self.session.as_ref().and_then(|s| s.latest_frame()) else {
            return Task::none();
        };

        let is_new = self
            .preview
            .as_ref()
            .is_none_or(|preview| preview.captured_at != frame.captured_at);
        if is_new {
            let pixels = frame.packed_rgba();
            if !pixels.is_empty() {
                self.preview = Some(PreviewImage {
                    handle: cosmic::widget::image::Handle::from_rgba(
                        frame.width,
                        frame.height,
                        pixels,
                    ),
                    captured_at: frame.captured_at,
                });
            }
        }
        Task::none()
    }
}
