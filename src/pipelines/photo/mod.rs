// SPDX-License-Identifier: MPL-2.0

//! Still photo capture output
//!
//! A capture produces a [`CapturedPhoto`]: a JPEG in the temporary directory
//! that lives only until the gallery has copied it. Dropping the value removes
//! the file, so the temporary is discarded whether the save succeeds or not.

pub mod encoding;

pub use encoding::PhotoEncoder;

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Transient photo file produced by one capture action
#[derive(Debug)]
pub struct CapturedPhoto {
    path: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl CapturedPhoto {
    /// Take ownership of an already written temporary file
    pub fn new(path: PathBuf, width: u32, height: u32) -> Self {
        Self {
            path,
            width,
            height,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for CapturedPhoto {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Discarded temporary capture"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to remove temporary capture")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_removes_temporary_file() {
        let path = std::env::temp_dir().join(format!("camroll-test-{}.jpg", uuid::Uuid::new_v4()));
        std::fs::write(&path, b"jpeg").unwrap();

        let photo = CapturedPhoto::new(path.clone(), 1, 1);
        assert!(photo.path().exists());
        drop(photo);

        assert!(!path.exists());
    }

    #[test]
    fn test_drop_tolerates_missing_file() {
        let path =
            std::env::temp_dir().join(format!("camroll-missing-{}.jpg", uuid::Uuid::new_v4()));
        drop(CapturedPhoto::new(path, 1, 1));
    }
}
