// SPDX-License-Identifier: GPL-3.0-only

//! Capture session
//!
//! Owns one permission check, one active flag, the looked-up device and the
//! hardware lease. Front-ends drive it from their event loop:
//!
//! ```text
//!  mount ──► permission future ──► permission_resolved ──┐
//!                                                        ▼
//!  request_permission (retry) ──► ... ─────────► sync_hardware
//!                                                        │
//!  begin_capture ──► capture future ──► finish_capture   │
//!                                                        ▼
//!  close(on_close) ─────────────────────────────► lease dropped
//! ```
//!
//! The hardware runs only while permission is granted, a device is present
//! and the session is active. Every transition re-checks those three
//! conditions and acquires or releases the lease accordingly.

pub mod flow;
pub mod state;

pub use crate::backends::permission::PermissionState;
pub use flow::capture_and_save;
pub use state::{Acknowledgment, SessionId, SessionView};

use crate::backends::camera::{ActiveCamera, CameraBackend, CameraDevice, CameraFacing, CameraFrame};
use crate::backends::permission::PermissionGate;
use crate::errors::CameraError;
use crate::constants::PhotoQuality;
use crate::storage::Gallery;
use futures::future::BoxFuture;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Capabilities a session consumes
#[derive(Clone)]
pub struct SessionDeps {
    pub backend: Arc<dyn CameraBackend>,
    pub gate: Arc<dyn PermissionGate>,
    pub gallery: Arc<dyn Gallery>,
}

/// Settings captured at mount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionOptions {
    pub facing: CameraFacing,
    pub quality: PhotoQuality,
}

pub struct CaptureSession {
    id: SessionId,
    permission: PermissionState,
    active: bool,
    device: Option<CameraDevice>,
    hardware: Option<Box<dyn ActiveCamera>>,
    permission_in_flight: bool,
    capture_in_flight: bool,
    quality: PhotoQuality,
    deps: SessionDeps,
}

impl CaptureSession {
    /// Mount a session
    ///
    /// Looks the device up synchronously and returns the one permission check
    /// for this mount. Feed its result to [`Self::permission_resolved`].
    pub fn mount(
        id: SessionId,
        options: SessionOptions,
        deps: SessionDeps,
    ) -> (Self, BoxFuture<'static, PermissionState>) {
        let device = deps.backend.lookup(options.facing);
        match &device {
            Some(device) => {
                info!(session = %id, device = %device.name, "Capture session mounted")
            }
            None => {
                warn!(session = %id, facing = %options.facing, "No camera for requested facing")
            }
        }

        let check = deps.gate.check();
        let session = Self {
            id,
            permission: PermissionState::NotDetermined,
            active: true,
            device,
            hardware: None,
            permission_in_flight: true,
            capture_in_flight: false,
            quality: options.quality,
            deps,
        };
        (session, check)
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn permission(&self) -> PermissionState {
        self.permission
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn device(&self) -> Option<&CameraDevice> {
        self.device.as_ref()
    }

    pub fn is_hardware_active(&self) -> bool {
        self.hardware.is_some()
    }

    /// Store the answer of a permission check
    ///
    /// Returns false when the result belongs to another mount.
    pub fn permission_resolved(&mut self, id: SessionId, state: PermissionState) -> bool {
        if id != self.id {
            debug!(session = %self.id, stale = %id, "Discarding stale permission result");
            return false;
        }

        info!(session = %self.id, %state, "Camera permission resolved");
        self.permission = state;
        self.permission_in_flight = false;
        self.sync_hardware();
        true
    }

    /// Re-issue the permission check (user-triggered retry)
    ///
    /// `None` while a check is already in flight or access is granted.
    pub fn request_permission(&mut self) -> Option<BoxFuture<'static, PermissionState>> {
        if self.permission_in_flight {
            debug!(session = %self.id, "Permission request already in flight");
            return None;
        }
        if self.permission.is_granted() {
            return None;
        }

        info!(session = %self.id, "Re-requesting camera permission");
        self.permission_in_flight = true;
        Some(self.deps.gate.check())
    }

    /// Render branch for the current state
    pub fn view(&self) -> SessionView {
        if !self.permission.is_granted() {
            SessionView::PermissionNeeded {
                state: self.permission,
                requesting: self.permission_in_flight,
            }
        } else if self.device.is_none() {
            SessionView::NoDevice
        } else if !self.active {
            SessionView::Closed
        } else {
            SessionView::Live {
                capturing: self.capture_in_flight,
            }
        }
    }

    fn should_run_hardware(&self) -> bool {
        self.permission.is_granted() && self.device.is_some() && self.active
    }

    /// Acquire or release the hardware lease to match the render conditions
    fn sync_hardware(&mut self) {
        if !self.should_run_hardware() {
            if self.hardware.take().is_some() {
                info!(session = %self.id, "Camera released");
            }
            return;
        }

        if self.hardware.is_some() {
            return;
        }

        let Some(device) = self.device.as_ref() else {
            return;
        };
        match self.deps.backend.activate(device) {
            Ok(lease) => {
                info!(session = %self.id, device = %lease.device().name, "Camera acquired");
                self.hardware = Some(lease);
            }
            Err(e) => {
                // A device that cannot start is as good as absent for this mount
                let err = CameraError::from(e);
                error!(
                    session = %self.id,
                    device = %device.name,
                    error = %err,
                    "Failed to start camera"
                );
                self.device = None;
            }
        }
    }

    /// Newest preview frame; `None` unless the preview is live
    pub fn latest_frame(&self) -> Option<Arc<CameraFrame>> {
        self.hardware.as_ref().and_then(|hw| hw.latest_frame())
    }

    /// Start the capture-and-save action
    ///
    /// `None` (a no-op) unless the preview is live with hardware running and
    /// no other capture is in flight. Feed the result to
    /// [`Self::finish_capture`].
    pub fn begin_capture(&mut self) -> Option<BoxFuture<'static, Acknowledgment>> {
        if !self.view().is_live() {
            debug!(session = %self.id, "Capture ignored, preview not live");
            return None;
        }
        if self.capture_in_flight {
            debug!(session = %self.id, "Capture ignored, one already in flight");
            return None;
        }
        let hardware = self.hardware.as_ref()?;

        info!(session = %self.id, quality = ?self.quality, "Capturing photo");
        self.capture_in_flight = true;
        let capture = hardware.take_photo(self.quality);
        let gallery = Arc::clone(&self.deps.gallery);
        Some(Box::pin(capture_and_save(capture, gallery)))
    }

    /// Record the outcome of a capture
    ///
    /// Returns the acknowledgment to show, or `None` for a stale result.
    /// Neither the active flag nor the permission state changes.
    pub fn finish_capture(&mut self, id: SessionId, ack: Acknowledgment) -> Option<Acknowledgment> {
        if id != self.id {
            debug!(session = %self.id, stale = %id, "Discarding stale capture result");
            return None;
        }

        self.capture_in_flight = false;
        match &ack {
            Acknowledgment::Saved(path) => {
                info!(session = %self.id, path = %path.display(), "Photo saved")
            }
            Acknowledgment::Failed(e) => warn!(session = %self.id, error = %e, "Photo not saved"),
        }
        Some(ack)
    }

    /// Close the session
    ///
    /// Deactivates and releases the hardware first, then invokes `on_close`
    /// exactly once.
    pub fn close<F: FnOnce()>(&mut self, on_close: F) {
        if self.active {
            info!(session = %self.id, "Closing capture session");
        }
        self.active = false;
        self.sync_hardware();
        on_close();
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        if self.hardware.take().is_some() {
            info!(session = %self.id, "Camera released on unmount");
        }
    }
}
