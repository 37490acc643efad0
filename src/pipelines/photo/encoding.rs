// SPDX-License-Identifier: GPL-3.0-only

//! Async photo encoding
//!
//! Converts an RGBA camera frame into a JPEG written to the temporary
//! directory. The alpha channel is dropped; JPEG has no use for it.

use super::CapturedPhoto;
use crate::backends::camera::types::CameraFrame;
use crate::constants::{PhotoQuality, TEMP_CAPTURE_PREFIX};
use crate::errors::CaptureError;
use image::RgbImage;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// Photo encoder
#[derive(Debug, Clone)]
pub struct PhotoEncoder {
    quality: PhotoQuality,
    output_dir: PathBuf,
}

impl PhotoEncoder {
    /// Encoder writing to the system temporary directory
    pub fn new(quality: PhotoQuality) -> Self {
        Self {
            quality,
            output_dir: std::env::temp_dir(),
        }
    }

    /// Encoder writing to a custom directory
    pub fn with_output_dir(quality: PhotoQuality, output_dir: PathBuf) -> Self {
        Self {
            quality,
            output_dir,
        }
    }

    /// Encode a frame to a temporary JPEG
    ///
    /// Runs on the blocking pool (CPU-bound) and resolves once the file is
    /// fully written.
    pub async fn encode_to_temp(
        &self,
        frame: Arc<CameraFrame>,
    ) -> Result<CapturedPhoto, CaptureError> {
        info!(
            width = frame.width,
            height = frame.height,
            quality = ?self.quality,
            "Starting encoding"
        );

        let quality = self.quality;
        let path = self
            .output_dir
            .join(format!("{}{}.jpg", TEMP_CAPTURE_PREFIX, uuid::Uuid::new_v4()));

        tokio::task::spawn_blocking(move || {
            let data = Self::encode_jpeg(&frame, quality)?;
            std::fs::write(&path, &data)?;
            debug!(size = data.len(), path = %path.display(), "Encoding complete");
            Ok::<_, CaptureError>(CapturedPhoto::new(path, frame.width, frame.height))
        })
        .await
        .map_err(|e| CaptureError::EncodingFailed(format!("Encoding task error: {}", e)))?
    }

    /// Encode an RGBA frame as JPEG bytes
    pub fn encode_jpeg(
        frame: &CameraFrame,
        quality: PhotoQuality,
    ) -> Result<Vec<u8>, CaptureError> {
        let image = Self::to_rgb(frame)?;

        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        let mut encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, quality.jpeg_quality());

        encoder
            .encode(
                image.as_raw(),
                image.width(),
                image.height(),
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| CaptureError::EncodingFailed(format!("JPEG encoding failed: {}", e)))?;

        Ok(buffer)
    }

    fn to_rgb(frame: &CameraFrame) -> Result<RgbImage, CaptureError> {
        if frame.width == 0 || frame.height == 0 {
            return Err(CaptureError::EncodingFailed("empty frame".to_string()));
        }

        let rgba = frame.packed_rgba();
        if rgba.is_empty() {
            return Err(CaptureError::EncodingFailed(format!(
                "frame buffer too small for {}x{}",
                frame.width, frame.height
            )));
        }

        let rgb: Vec<u8> = rgba
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();

        RgbImage::from_raw(frame.width, frame.height, rgb)
            .ok_or_else(|| CaptureError::EncodingFailed("pixel buffer size mismatch".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red_frame(width: u32, height: u32) -> CameraFrame {
        let data = [255u8, 0, 0, 255].repeat((width * height) as usize);
        CameraFrame::from_rgba(width, height, data)
    }

    #[test]
    fn test_encode_jpeg_produces_decodable_image() {
        let bytes = PhotoEncoder::encode_jpeg(&red_frame(8, 4), PhotoQuality::High).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8], "JPEG SOI marker");

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 4));
    }

    #[test]
    fn test_encode_rejects_empty_frame() {
        let frame = CameraFrame::from_rgba(0, 0, Vec::new());
        assert!(matches!(
            PhotoEncoder::encode_jpeg(&frame, PhotoQuality::Low),
            Err(CaptureError::EncodingFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_encode_to_temp_writes_file() {
        let dir = std::env::temp_dir().join(format!("camroll-enc-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();

        let encoder = PhotoEncoder::with_output_dir(PhotoQuality::Medium, dir.clone());
        let photo = encoder
            .encode_to_temp(Arc::new(red_frame(4, 4)))
            .await
            .unwrap();

        assert!(photo.path().starts_with(&dir));
        assert!(photo.path().exists());
        assert_eq!((photo.width, photo.height), (4, 4));

        drop(photo);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
