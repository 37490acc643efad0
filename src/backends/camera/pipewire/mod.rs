// SPDX-License-Identifier: MPL-2.0

//! PipeWire camera backend
//!
//! Enumeration goes through `pw-dump`; capture through a GStreamer
//! `pipewiresrc` pipeline that PipeWire (and the camera portal, when
//! sandboxed) grants access to.

mod enumeration;
mod pipeline;

pub use enumeration::{enumerate_pipewire_cameras, is_pipewire_available, parse_pw_dump};
pub use pipeline::PipeWirePipeline;

use super::frame_slot::FrameSlot;
use super::types::*;
use super::{ActiveCamera, CameraBackend};
use crate::constants::{PhotoQuality, timing};
use crate::errors::CaptureError;
use crate::pipelines::photo::{CapturedPhoto, PhotoEncoder};
use futures::future::BoxFuture;
use std::sync::Arc;
use tracing::{debug, info};

/// PipeWire backend implementation
#[derive(Debug, Default)]
pub struct PipeWireBackend;

impl PipeWireBackend {
    /// Create a new PipeWire backend
    pub fn new() -> Self {
        Self
    }
}

impl CameraBackend for PipeWireBackend {
    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        info!("Using PipeWire backend for camera enumeration");

        if let Some(cameras) = enumerate_pipewire_cameras() {
            info!(count = cameras.len(), "PipeWire cameras enumerated");
            cameras
        } else {
            info!("PipeWire enumeration returned None");
            Vec::new()
        }
    }

    fn activate(&self, device: &CameraDevice) -> BackendResult<Box<dyn ActiveCamera>> {
        info!(device = %device.name, "Activating PipeWire camera");
        let slot = FrameSlot::new();
        let pipeline = PipeWirePipeline::new(device, slot)?;
        Ok(Box::new(PipeWireCamera {
            device: device.clone(),
            pipeline,
        }))
    }
}

/// Running PipeWire camera
pub struct PipeWireCamera {
    device: CameraDevice,
    pipeline: PipeWirePipeline,
}

impl ActiveCamera for PipeWireCamera {
    fn device(&self) -> &CameraDevice {
        &self.device
    }

    fn latest_frame(&self) -> Option<Arc<CameraFrame>> {
        self.pipeline.slot().latest()
    }

    fn take_photo(
        &self,
        quality: PhotoQuality,
    ) -> BoxFuture<'static, Result<CapturedPhoto, CaptureError>> {
        // Weak so an in-flight capture never keeps a released camera alive
        let slot = Arc::downgrade(self.pipeline.slot());
        Box::pin(async move {
            let frame = {
                let slot = slot.upgrade().ok_or(CaptureError::HardwareInactive)?;
                slot.next_frame(timing::FIRST_FRAME_TIMEOUT).await?
            };
            debug!(width = frame.width, height = frame.height, "Captured frame for photo");
            PhotoEncoder::new(quality).encode_to_temp(frame).await
        })
    }
}
