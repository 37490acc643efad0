// SPDX-License-Identifier: MPL-2.0

//! Error types for the camera application
//!
//! Permission denial and missing hardware are session *states*, not errors.
//! The types here cover the transient failures of the capture-and-save action
//! and the setup failures reported by the headless front-ends.

use std::fmt;

/// Main application error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Camera setup errors
    Camera(CameraError),
    /// Still capture errors (hardware or encoding)
    Capture(CaptureError),
    /// Gallery write errors
    Save(SaveError),
}

/// Camera setup errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// No camera matches the requested facing
    NoCameraFound,
    /// Camera permission is not granted (carries the state name)
    PermissionNotGranted(String),
    /// Pipeline could not be started
    InitializationFailed(String),
}

/// Still capture errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The hardware lease was released before a frame could be taken
    HardwareInactive,
    /// No frame arrived within the capture timeout
    NoFrameAvailable,
    /// Frame could not be encoded
    EncodingFailed(String),
    /// Temporary file could not be written
    Io(String),
}

/// Gallery write errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveError {
    /// Gallery directory is missing and could not be created
    GalleryUnavailable(String),
    /// Copying the photo into the gallery failed
    WriteFailed(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Capture(e) => write!(f, "Capture error: {}", e),
            AppError::Save(e) => write!(f, "Save error: {}", e),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::NoCameraFound => write!(f, "No camera devices found"),
            CameraError::PermissionNotGranted(state) => {
                write!(f, "Camera permission not granted ({})", state)
            }
            CameraError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::HardwareInactive => write!(f, "Camera is no longer active"),
            CaptureError::NoFrameAvailable => write!(f, "No frame available for capture"),
            CaptureError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
            CaptureError::Io(msg) => write!(f, "Failed to write capture: {}", msg),
        }
    }
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::GalleryUnavailable(msg) => write!(f, "Gallery unavailable: {}", msg),
            SaveError::WriteFailed(msg) => write!(f, "Failed to save photo: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CameraError {}
impl std::error::Error for CaptureError {}
impl std::error::Error for SaveError {}

impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

impl From<CaptureError> for AppError {
    fn from(err: CaptureError) -> Self {
        AppError::Capture(err)
    }
}

impl From<SaveError> for AppError {
    fn from(err: SaveError) -> Self {
        AppError::Save(err)
    }
}

impl From<std::io::Error> for CaptureError {
    fn from(err: std::io::Error) -> Self {
        CaptureError::Io(err.to_string())
    }
}

impl From<std::io::Error> for SaveError {
    fn from(err: std::io::Error) -> Self {
        SaveError::WriteFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_category() {
        let err: AppError = SaveError::WriteFailed("disk full".into()).into();
        assert_eq!(err.to_string(), "Save error: Failed to save photo: disk full");

        let err: AppError = CaptureError::NoFrameAvailable.into();
        assert!(err.to_string().starts_with("Capture error"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        assert!(matches!(SaveError::from(io), SaveError::WriteFailed(msg) if msg == "read-only"));
    }
}
