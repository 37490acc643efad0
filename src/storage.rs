// SPDX-License-Identifier: MPL-2.0

//! Gallery storage
//!
//! The "gallery" is the user's pictures directory: photos are copied into a
//! sub-folder of `dirs::picture_dir()` where file managers and photo viewers
//! pick them up.

use crate::constants::DEFAULT_SAVE_FOLDER;
use crate::errors::SaveError;
use crate::pipelines::photo::CapturedPhoto;
use futures::future::BoxFuture;
use std::fs::OpenOptions;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

/// Kind of asset handed to the gallery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Photo,
}

impl AssetKind {
    /// File name prefix used for saved assets
    fn prefix(&self) -> &'static str {
        match self {
            AssetKind::Photo => "IMG",
        }
    }
}

/// Gallery-save capability
pub trait Gallery: Send + Sync {
    /// Persist a captured photo and return its final location
    ///
    /// The temporary capture is consumed and discarded whether or not the
    /// write succeeds.
    fn save(
        &self,
        photo: CapturedPhoto,
        kind: AssetKind,
    ) -> BoxFuture<'static, Result<PathBuf, SaveError>>;
}

/// The user's pictures directory (~/Pictures)
fn pictures_root() -> PathBuf {
    dirs::picture_dir().unwrap_or_else(|| {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Pictures")
    })
}

/// Get the gallery directory (~/Pictures/<folder_name>)
///
/// The folder must be a single plain path segment. Empty names, `.`, `..`,
/// nested or absolute paths fall back to [`DEFAULT_SAVE_FOLDER`] so the
/// gallery never leaves the pictures directory.
pub fn gallery_directory(folder_name: &str) -> PathBuf {
    let trimmed = folder_name.trim();
    let mut components = Path::new(trimmed).components();
    let folder_name = match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => trimmed,
        _ => {
            if !trimmed.is_empty() {
                warn!(folder = %folder_name, "Ignoring invalid gallery folder name");
            }
            DEFAULT_SAVE_FOLDER
        }
    };

    pictures_root().join(folder_name)
}

/// Gallery backed by a plain directory
#[derive(Debug, Clone)]
pub struct DirectoryGallery {
    root: PathBuf,
}

impl DirectoryGallery {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Gallery in the user's pictures directory
    pub fn pictures(folder_name: &str) -> Self {
        Self::new(gallery_directory(folder_name))
    }
}

impl Gallery for DirectoryGallery {
    fn save(
        &self,
        photo: CapturedPhoto,
        kind: AssetKind,
    ) -> BoxFuture<'static, Result<PathBuf, SaveError>> {
        let root = self.root.clone();
        Box::pin(async move {
            let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();

            let saved = tokio::task::spawn_blocking(move || {
                std::fs::create_dir_all(&root).map_err(|e| {
                    SaveError::GalleryUnavailable(format!("{}: {}", root.display(), e))
                })?;
                let target = copy_into(&root, photo.path(), kind, &stamp)?;
                // Temporary file goes away here
                drop(photo);
                Ok::<_, SaveError>(target)
            })
            .await
            .map_err(|e| SaveError::WriteFailed(format!("Save task error: {}", e)))??;

            info!(path = %saved.display(), "Photo saved to gallery");
            Ok(saved)
        })
    }
}

/// Suffixes tried before giving up on a timestamp
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Copy `source` into `dir` under a fresh timestamped name
///
/// Uses `create_new` so concurrent saves within the same second never
/// overwrite each other; a numeric suffix is appended on collision.
fn copy_into(
    dir: &Path,
    source: &Path,
    kind: AssetKind,
    stamp: &str,
) -> Result<PathBuf, SaveError> {
    let extension = source
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_else(|| "jpg".to_string());

    let mut input = std::fs::File::open(source)?;

    for attempt in 0..MAX_NAME_ATTEMPTS {
        let name = if attempt == 0 {
            format!("{}_{}.{}", kind.prefix(), stamp, extension)
        } else {
            format!("{}_{}_{}.{}", kind.prefix(), stamp, attempt, extension)
        };
        let target = dir.join(name);

        match OpenOptions::new().write(true).create_new(true).open(&target) {
            Ok(mut output) => {
                let copied = std::io::copy(&mut input, &mut output).and_then(|_| output.sync_all());
                if let Err(e) = copied {
                    let _ = std::fs::remove_file(&target);
                    return Err(e.into());
                }
                return Ok(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                debug!(path = %target.display(), "Gallery name taken, trying next suffix");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(SaveError::WriteFailed(format!(
        "no free file name for {} in {}",
        stamp,
        dir.display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("camroll-{}-{}", tag, uuid::Uuid::new_v4()))
    }

    fn temp_capture(contents: &[u8]) -> CapturedPhoto {
        let path =
            std::env::temp_dir().join(format!("camroll-capture-{}.jpg", uuid::Uuid::new_v4()));
        std::fs::write(&path, contents).unwrap();
        CapturedPhoto::new(path, 1, 1)
    }

    #[test]
    fn test_gallery_directory_uses_folder_name() {
        assert!(gallery_directory("Snaps").ends_with("Snaps"));
        assert!(gallery_directory("  ").ends_with(DEFAULT_SAVE_FOLDER));
    }

    #[test]
    fn test_gallery_directory_stays_inside_pictures() {
        let fallback = pictures_root().join(DEFAULT_SAVE_FOLDER);
        for name in ["..", ".", "/etc", "../Documents", "Snaps/nested", " .. "] {
            assert_eq!(gallery_directory(name), fallback, "folder name {:?}", name);
        }
    }

    #[tokio::test]
    async fn test_save_copies_and_discards_temp() {
        let root = scratch_dir("gallery");
        let gallery = DirectoryGallery::new(root.clone());
        let photo = temp_capture(b"photo-bytes");
        let temp_path = photo.path().to_path_buf();

        let saved = gallery.save(photo, AssetKind::Photo).await.unwrap();

        assert!(saved.starts_with(&root));
        assert_eq!(std::fs::read(&saved).unwrap(), b"photo-bytes");
        assert!(!temp_path.exists(), "temporary capture must be removed");
        let name = saved.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("IMG_") && name.ends_with(".jpg"));

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_copy_into_appends_suffix_on_collision() {
        let root = scratch_dir("collide");
        std::fs::create_dir_all(&root).unwrap();
        let source = root.join("source.jpg");
        std::fs::write(&source, b"x").unwrap();

        let first = copy_into(&root, &source, AssetKind::Photo, "20260101_120000").unwrap();
        let second = copy_into(&root, &source, AssetKind::Photo, "20260101_120000").unwrap();

        assert!(first.ends_with("IMG_20260101_120000.jpg"));
        assert!(second.ends_with("IMG_20260101_120000_1.jpg"));

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[tokio::test]
    async fn test_save_into_unwritable_location_fails() {
        // A regular file where the gallery directory should be
        let blocker = scratch_dir("blocker");
        std::fs::write(&blocker, b"not a dir").unwrap();
        let gallery = DirectoryGallery::new(blocker.join("nested"));
        let photo = temp_capture(b"x");
        let temp_path = photo.path().to_path_buf();

        let result = gallery.save(photo, AssetKind::Photo).await;
        assert!(matches!(result, Err(SaveError::GalleryUnavailable(_))));
        assert!(!temp_path.exists(), "temporary capture is discarded on failure too");

        std::fs::remove_file(&blocker).unwrap();
    }
}
