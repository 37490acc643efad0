// SPDX-License-Identifier: MPL-2.0

//! Camera backend abstraction
//!
//! ```text
//! ┌─────────────────────┐
//! │   Capture Session   │
//! └──────────┬──────────┘
//!            │ lookup / activate
//!            ▼
//! ┌─────────────────────┐
//! │  CameraBackend Trait│  ← Device discovery
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │ ActiveCamera (lease)│  ← Running hardware, released on drop
//! └─────────────────────┘
//! ```
//!
//! A session never constructs a [`CameraDevice`]; it asks the backend for
//! one by facing and hands it back to [`CameraBackend::activate`] when the
//! preview should run. The returned lease keeps the hardware open until it is
//! dropped.

pub mod frame_slot;
pub mod pipewire;
pub mod types;

pub use frame_slot::FrameSlot;
pub use types::*;

use crate::constants::PhotoQuality;
use crate::errors::CaptureError;
use crate::pipelines::photo::CapturedPhoto;
use futures::future::BoxFuture;
use std::sync::Arc;

/// Camera discovery and activation
pub trait CameraBackend: Send + Sync {
    /// Enumerate available cameras on this backend
    fn enumerate_cameras(&self) -> Vec<CameraDevice>;

    /// Find the first camera facing `facing`
    ///
    /// Synchronous: the session resolves its device handle during mount.
    fn lookup(&self, facing: CameraFacing) -> Option<CameraDevice> {
        self.enumerate_cameras()
            .into_iter()
            .find(|device| facing.matches(device.facing))
    }

    /// Start the hardware for `device`
    ///
    /// # Returns
    /// * `Ok(lease)` - Hardware running; stopped when the lease is dropped
    /// * `Err(BackendError)` - Pipeline could not be started
    fn activate(&self, device: &CameraDevice) -> BackendResult<Box<dyn ActiveCamera>>;
}

/// Running camera hardware
///
/// Dropping the value stops the hardware. Captures already in flight observe
/// the release and fail with [`CaptureError::HardwareInactive`].
pub trait ActiveCamera: Send {
    /// Device this lease was opened for
    fn device(&self) -> &CameraDevice;

    /// Newest preview frame, if any arrived yet
    fn latest_frame(&self) -> Option<Arc<CameraFrame>>;

    /// Capture a still photo into a temporary file
    ///
    /// The returned future does not borrow the lease, so it can be driven by
    /// an executor while the UI keeps ownership of the hardware.
    fn take_photo(
        &self,
        quality: PhotoQuality,
    ) -> BoxFuture<'static, Result<CapturedPhoto, CaptureError>>;
}

/// Get a concrete backend instance (PipeWire only)
pub fn get_backend() -> Arc<dyn CameraBackend> {
    Arc::new(pipewire::PipeWireBackend::new())
}
