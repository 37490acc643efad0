// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for camera backends

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Which way a camera points
///
/// Parsed from libcamera's `api.libcamera.location` PipeWire property.
/// Plain V4L2 webcams do not report a location and are treated as external.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CameraFacing {
    /// Rear camera (phones, tablets)
    #[default]
    Back,
    /// Front / user-facing camera
    Front,
    /// USB or otherwise unlocated camera
    External,
    /// Lookup wildcard, never reported by a device
    Any,
}

impl CameraFacing {
    /// Facing values selectable in settings, in dropdown order
    pub const ALL: [CameraFacing; 4] = [
        CameraFacing::Back,
        CameraFacing::Front,
        CameraFacing::External,
        CameraFacing::Any,
    ];

    /// Parse a libcamera location string
    pub fn from_location(location: &str) -> Self {
        match location.trim().to_ascii_lowercase().as_str() {
            "back" | "rear" => CameraFacing::Back,
            "front" => CameraFacing::Front,
            _ => CameraFacing::External,
        }
    }

    /// Whether a device with facing `device` satisfies a lookup for `self`
    pub fn matches(&self, device: CameraFacing) -> bool {
        *self == CameraFacing::Any || *self == device
    }
}

impl std::fmt::Display for CameraFacing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraFacing::Back => write!(f, "back"),
            CameraFacing::Front => write!(f, "front"),
            CameraFacing::External => write!(f, "external"),
            CameraFacing::Any => write!(f, "any"),
        }
    }
}

impl std::str::FromStr for CameraFacing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "back" | "rear" => Ok(CameraFacing::Back),
            "front" => Ok(CameraFacing::Front),
            "external" => Ok(CameraFacing::External),
            "any" => Ok(CameraFacing::Any),
            other => Err(format!(
                "unknown camera facing '{}' (expected back, front, external or any)",
                other
            )),
        }
    }
}

/// Represents a camera device
///
/// This is the opaque device handle handed to a capture session. Sessions look
/// it up through a backend and never construct one themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    pub name: String,
    /// Capture target understood by the backend (e.g. "pipewire-serial-42");
    /// empty means "let PipeWire choose"
    pub path: String,
    /// PipeWire node ID, when known
    pub node_id: Option<String>,
    pub facing: CameraFacing,
}

/// One decoded RGBA frame
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// Bytes per row (may exceed `width * 4` because of padding)
    pub stride: u32,
    pub data: Arc<[u8]>,
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Build a frame from tightly packed RGBA bytes
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            stride: width * 4,
            data: Arc::from(data.into_boxed_slice()),
            captured_at: Instant::now(),
        }
    }

    /// RGB value at (x, y), clamped to the frame bounds
    pub fn pixel_rgb(&self, x: u32, y: u32) -> (u8, u8, u8) {
        if self.width == 0 || self.height == 0 {
            return (0, 0, 0);
        }
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        let idx = (y * self.stride + x * 4) as usize;
        if idx + 2 < self.data.len() {
            (self.data[idx], self.data[idx + 1], self.data[idx + 2])
        } else {
            (0, 0, 0)
        }
    }

    /// Tightly packed RGBA bytes with row padding removed
    pub fn packed_rgba(&self) -> Vec<u8> {
        let row_bytes = (self.width * 4) as usize;
        if self.stride as usize == row_bytes {
            return self
                .data
                .get(..row_bytes * self.height as usize)
                .map(<[u8]>::to_vec)
                .unwrap_or_default();
        }

        let mut packed = Vec::with_capacity(row_bytes * self.height as usize);
        for row in 0..self.height as usize {
            let start = row * self.stride as usize;
            match self.data.get(start..start + row_bytes) {
                Some(bytes) => packed.extend_from_slice(bytes),
                // Truncated buffer
                None => return Vec::new(),
            }
        }
        packed
    }
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Backend errors
#[derive(Debug, Clone)]
pub enum BackendError {
    /// Backend is not available on this system
    NotAvailable(String),
    /// Failed to initialize backend
    InitializationFailed(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::NotAvailable(msg) => write!(f, "Backend not available: {}", msg),
            BackendError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<BackendError> for crate::errors::CameraError {
    fn from(err: BackendError) -> Self {
        crate::errors::CameraError::InitializationFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CameraError;

    #[test]
    fn test_backend_error_becomes_setup_error() {
        let err = CameraError::from(BackendError::NotAvailable("no pipewiresrc".into()));
        assert!(
            matches!(&err, CameraError::InitializationFailed(msg) if msg.contains("no pipewiresrc"))
        );
    }

    #[test]
    fn test_facing_from_location() {
        assert_eq!(CameraFacing::from_location("back"), CameraFacing::Back);
        assert_eq!(CameraFacing::from_location(" Front "), CameraFacing::Front);
        assert_eq!(CameraFacing::from_location("external"), CameraFacing::External);
        assert_eq!(CameraFacing::from_location(""), CameraFacing::External);
    }

    #[test]
    fn test_facing_any_matches_everything() {
        for facing in [CameraFacing::Back, CameraFacing::Front, CameraFacing::External] {
            assert!(CameraFacing::Any.matches(facing));
        }
        assert!(!CameraFacing::Back.matches(CameraFacing::Front));
    }

    #[test]
    fn test_facing_parse() {
        assert_eq!("rear".parse::<CameraFacing>(), Ok(CameraFacing::Back));
        assert!("sideways".parse::<CameraFacing>().is_err());
    }

    #[test]
    fn test_packed_rgba_strips_padding() {
        // 1x2 frame with 4 bytes of padding per row
        let frame = CameraFrame {
            width: 1,
            height: 2,
            stride: 8,
            data: Arc::from(
                vec![1, 2, 3, 4, 0, 0, 0, 0, 5, 6, 7, 8, 0, 0, 0, 0].into_boxed_slice(),
            ),
            captured_at: Instant::now(),
        };
        assert_eq!(frame.packed_rgba(), vec![1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(frame.pixel_rgb(0, 1), (5, 6, 7));
        assert_eq!(frame.pixel_rgb(9, 9), (5, 6, 7));
    }
}
