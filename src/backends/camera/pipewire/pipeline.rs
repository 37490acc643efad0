// SPDX-License-Identifier: MPL-2.0

//! PipeWire GStreamer pipeline for camera capture
//!
//! `pipewiresrc ! videoconvert ! video/x-raw,format=RGBA ! appsink`. Every
//! sample is copied into a [`CameraFrame`] and published to the lease's
//! [`FrameSlot`].

use super::super::frame_slot::FrameSlot;
use super::super::types::*;
use crate::constants::{pipeline, timing};
use gstreamer::prelude::*;
use gstreamer_app::AppSink;
use gstreamer_video::VideoInfo;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// PipeWire camera pipeline
///
/// Owns the running GStreamer pipeline. Dropping it sets the pipeline to NULL,
/// which releases the camera, and closes the frame slot.
pub struct PipeWirePipeline {
    pipeline: gstreamer::Pipeline,
    appsink: AppSink,
    slot: Arc<FrameSlot>,
}

impl PipeWirePipeline {
    /// Create and start a pipeline for `device`
    pub fn new(device: &CameraDevice, slot: Arc<FrameSlot>) -> BackendResult<Self> {
        info!(device = %device.name, path = %device.path, "Creating PipeWire pipeline");

        gstreamer::init().map_err(|e| BackendError::InitializationFailed(e.to_string()))?;

        gstreamer::ElementFactory::find("pipewiresrc").ok_or_else(|| {
            BackendError::NotAvailable("pipewiresrc not available: factory not found".to_string())
        })?;

        let description = pipeline_description(&device.path);
        debug!(pipeline = %description, "Launching pipeline");

        let pipeline = gstreamer::parse::launch(&description)
            .map_err(|e| {
                BackendError::InitializationFailed(format!("Failed to parse pipeline: {}", e))
            })?
            .dynamic_cast::<gstreamer::Pipeline>()
            .map_err(|_| {
                BackendError::InitializationFailed("Failed to cast to pipeline".to_string())
            })?;

        let appsink = pipeline
            .by_name(pipeline::SINK_NAME)
            .ok_or_else(|| BackendError::InitializationFailed("Failed to get appsink".to_string()))?
            .dynamic_cast::<AppSink>()
            .map_err(|_| BackendError::InitializationFailed("Failed to cast appsink".to_string()))?;

        appsink.set_property("sync", false);
        appsink.set_property("max-buffers", pipeline::MAX_BUFFERS);
        appsink.set_property("drop", true);
        appsink.set_property("enable-last-sample", false);

        let frame_counter = Arc::new(AtomicU64::new(0));
        let callback_slot = Arc::clone(&slot);
        appsink.set_callbacks(
            gstreamer_app::AppSinkCallbacks::builder()
                .new_sample(move |appsink| {
                    let frame_num = frame_counter.fetch_add(1, Ordering::Relaxed);
                    let frame = read_frame(appsink, frame_num)?;

                    if frame_num % timing::FRAME_LOG_INTERVAL == 0 {
                        debug!(
                            frame = frame_num,
                            width = frame.width,
                            height = frame.height,
                            stride = frame.stride,
                            "Frame received"
                        );
                    }

                    callback_slot.publish(frame);
                    Ok(gstreamer::FlowSuccess::Ok)
                })
                .build(),
        );

        pipeline.set_state(gstreamer::State::Playing).map_err(|e| {
            BackendError::InitializationFailed(format!("Failed to start pipeline: {}", e))
        })?;

        // Async transitions are fine; frames arrive once the device is ready
        let (result, state, pending) = pipeline.state(gstreamer::ClockTime::from_seconds(
            timing::START_TIMEOUT_SECS,
        ));
        debug!(result = ?result, state = ?state, pending = ?pending, "Pipeline state");
        if result.is_err() {
            let _ = pipeline.set_state(gstreamer::State::Null);
            return Err(BackendError::InitializationFailed(
                "Pipeline failed to reach PLAYING".to_string(),
            ));
        }
        if state != gstreamer::State::Playing {
            warn!("Pipeline is not in PLAYING state yet");
        }

        info!("PipeWire camera started");

        Ok(Self {
            pipeline,
            appsink,
            slot,
        })
    }

    pub fn slot(&self) -> &Arc<FrameSlot> {
        &self.slot
    }
}

impl Drop for PipeWirePipeline {
    fn drop(&mut self) {
        info!("Stopping PipeWire pipeline");
        // Clear callbacks first so the slot stops receiving frames
        self.appsink
            .set_callbacks(gstreamer_app::AppSinkCallbacks::builder().build());

        if let Err(e) = self.pipeline.set_state(gstreamer::State::Null) {
            error!(error = %e, "Failed to stop pipeline");
        } else {
            let (result, state, _) = self.pipeline.state(gstreamer::ClockTime::from_seconds(
                timing::STOP_TIMEOUT_SECS,
            ));
            debug!(result = ?result, state = ?state, "Pipeline stopped");
        }

        self.slot.close();
    }
}

/// Pull one sample from the sink and copy it into a frame
fn read_frame(appsink: &AppSink, frame_num: u64) -> Result<CameraFrame, gstreamer::FlowError> {
    let frame_start = Instant::now();
    let should_log = frame_num % timing::FRAME_LOG_INTERVAL == 0;

    let sample = appsink.pull_sample().map_err(|e| {
        if should_log {
            error!(frame = frame_num, error = ?e, "Failed to pull sample");
        }
        gstreamer::FlowError::Eos
    })?;

    let buffer = sample.buffer().ok_or_else(|| {
        if should_log {
            error!(frame = frame_num, "No buffer in sample");
        }
        gstreamer::FlowError::Error
    })?;

    let caps = sample.caps().ok_or(gstreamer::FlowError::Error)?;
    let video_info = VideoInfo::from_caps(caps).map_err(|e| {
        if should_log {
            error!(frame = frame_num, error = ?e, "Failed to get video info");
        }
        gstreamer::FlowError::Error
    })?;

    let map = buffer.map_readable().map_err(|e| {
        if should_log {
            error!(frame = frame_num, error = ?e, "Failed to map buffer");
        }
        gstreamer::FlowError::Error
    })?;

    Ok(CameraFrame {
        width: video_info.width(),
        height: video_info.height(),
        stride: video_info.stride()[0] as u32,
        data: Arc::from(map.as_slice()),
        captured_at: frame_start,
    })
}

/// `pipewiresrc` property selecting the device behind `path`
fn target_property(path: &str) -> String {
    if path.is_empty() {
        // PipeWire auto-selects the default camera
        String::new()
    } else if let Some(serial) = path.strip_prefix("pipewire-serial-") {
        format!("target-object={} ", serial)
    } else if let Some(node_id) = path.strip_prefix("pipewire-") {
        format!("target-object={} ", node_id)
    } else {
        warn!(path, "Unknown device path format, using path property");
        format!("path={} ", path)
    }
}

/// gst-launch description of the preview pipeline
pub(crate) fn pipeline_description(path: &str) -> String {
    format!(
        "pipewiresrc {}do-timestamp=true ! \
        queue max-size-buffers={} leaky=downstream ! \
        videoconvert ! video/x-raw,format={} ! \
        appsink name={}",
        target_property(path),
        pipeline::MAX_BUFFERS,
        pipeline::OUTPUT_FORMAT,
        pipeline::SINK_NAME
    )
}
