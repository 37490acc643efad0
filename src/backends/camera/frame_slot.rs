// SPDX-License-Identifier: GPL-3.0-only

//! Latest-frame mailbox shared between a pipeline and its readers
//!
//! The GStreamer streaming thread publishes every decoded frame here; the UI
//! polls [`FrameSlot::latest`] for the preview and a still capture awaits
//! [`FrameSlot::next_frame`]. Only the newest frame is kept.

use super::types::CameraFrame;
use crate::errors::CaptureError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

#[derive(Default)]
pub struct FrameSlot {
    latest: Mutex<Option<Arc<CameraFrame>>>,
    notify: Notify,
    closed: AtomicBool,
}

impl FrameSlot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Replace the stored frame and wake pending captures
    pub fn publish(&self, frame: CameraFrame) {
        let mut latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        *latest = Some(Arc::new(frame));
        drop(latest);
        self.notify.notify_waiters();
    }

    pub fn latest(&self) -> Option<Arc<CameraFrame>> {
        self.latest
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Mark the producing pipeline as stopped and wake pending captures
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.notify.notify_waiters();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Wait for a frame, returning the stored one immediately if present
    pub async fn next_frame(&self, timeout: Duration) -> Result<Arc<CameraFrame>, CaptureError> {
        let notified = self.notify.notified();
        tokio::pin!(notified);
        // Register before checking so a publish between the check and the await is not lost
        notified.as_mut().enable();

        if self.is_closed() {
            return Err(CaptureError::HardwareInactive);
        }
        if let Some(frame) = self.latest() {
            return Ok(frame);
        }

        if tokio::time::timeout(timeout, notified).await.is_err() {
            return Err(CaptureError::NoFrameAvailable);
        }

        if self.is_closed() {
            return Err(CaptureError::HardwareInactive);
        }
        self.latest().ok_or(CaptureError::NoFrameAvailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_returns_stored_frame_immediately() {
        let slot = FrameSlot::new();
        slot.publish(CameraFrame::from_rgba(1, 1, vec![9, 9, 9, 255]));

        let frame = slot.next_frame(Duration::from_millis(10)).await.unwrap();
        assert_eq!(frame.width, 1);
    }

    #[tokio::test]
    async fn test_waits_for_publish() {
        let slot = FrameSlot::new();
        let publisher = Arc::clone(&slot);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            publisher.publish(CameraFrame::from_rgba(2, 1, vec![0; 8]));
        });

        let frame = slot.next_frame(Duration::from_secs(2)).await.unwrap();
        assert_eq!(frame.width, 2);
    }

    #[tokio::test]
    async fn test_times_out_without_frames() {
        let slot = FrameSlot::new();
        let result = slot.next_frame(Duration::from_millis(10)).await;
        assert_eq!(result.unwrap_err(), CaptureError::NoFrameAvailable);
    }

    #[tokio::test]
    async fn test_closed_slot_reports_inactive() {
        let slot = FrameSlot::new();
        slot.publish(CameraFrame::from_rgba(1, 1, vec![0; 4]));
        slot.close();
        let result = slot.next_frame(Duration::from_millis(10)).await;
        assert_eq!(result.unwrap_err(), CaptureError::HardwareInactive);
    }
}
