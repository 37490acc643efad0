// SPDX-License-Identifier: GPL-3.0-only

//! Capture-and-save action

use super::state::Acknowledgment;
use crate::errors::CaptureError;
use crate::pipelines::photo::CapturedPhoto;
use crate::storage::{AssetKind, Gallery};
use futures::future::BoxFuture;
use std::sync::Arc;
use tracing::{error, info};

/// Await a still capture, then persist it to the gallery
///
/// Either step failing yields [`Acknowledgment::Failed`]; nothing is retried.
/// The temporary capture is gone once this returns.
pub async fn capture_and_save(
    capture: BoxFuture<'static, Result<CapturedPhoto, CaptureError>>,
    gallery: Arc<dyn Gallery>,
) -> Acknowledgment {
    let photo = match capture.await {
        Ok(photo) => photo,
        Err(e) => {
            error!(error = %e, "Photo capture failed");
            return Acknowledgment::Failed(e.into());
        }
    };

    info!(width = photo.width, height = photo.height, "Photo captured, saving");

    match gallery.save(photo, AssetKind::Photo).await {
        Ok(path) => Acknowledgment::Saved(path),
        Err(e) => {
            error!(error = %e, "Saving photo to gallery failed");
            Acknowledgment::Failed(e.into())
        }
    }
}
