// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for camera operations
//!
//! This module provides command-line functionality for:
//! - Listing available cameras
//! - Taking a single photo through a one-shot capture session

use camroll::backends::camera::{CameraBackend, CameraFacing, get_backend};
use camroll::backends::permission::PortalPermission;
use camroll::config::Config;
use camroll::constants::{app_info, timing};
use camroll::errors::CameraError;
use camroll::session::{Acknowledgment, CaptureSession, SessionDeps, SessionOptions, SessionView};
use camroll::shell::Shell;
use camroll::storage::DirectoryGallery;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// List all available cameras
pub fn list_cameras() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize GStreamer
    gstreamer::init()?;

    let cameras = get_backend().enumerate_cameras();

    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras:");
    println!();
    for (index, camera) in cameras.iter().enumerate() {
        println!("  [{}] {}", index, camera.name);
        println!("      Facing: {}", camera.facing);
        if !camera.path.is_empty() {
            println!("      Target: {}", camera.path);
        }
        println!();
    }

    Ok(())
}

/// Take a photo with the camera matching `facing`
///
/// `output` may name a directory (the photo is saved there instead of the
/// gallery) or a file (the saved photo is moved to that path).
pub fn take_photo(
    facing: Option<CameraFacing>,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize GStreamer
    gstreamer::init()?;

    let config = Config::load(app_info::APP_ID);

    let gallery = match output.as_ref() {
        Some(path) if path.is_dir() => DirectoryGallery::new(path.clone()),
        _ => DirectoryGallery::pictures(&config.save_folder_name),
    };
    let deps = SessionDeps {
        backend: get_backend(),
        gate: Arc::new(PortalPermission::new(config.force_camera_portal)),
        gallery: Arc::new(gallery),
    };
    let options = SessionOptions {
        facing: facing.unwrap_or(config.camera_facing),
        quality: config.photo_quality,
    };

    let rt = tokio::runtime::Runtime::new()?;

    let mut shell = Shell::new();
    let id = shell.open().ok_or("Capture session already open")?;
    let (mut session, check) = CaptureSession::mount(id, options, deps);

    let state = rt.block_on(check);
    session.permission_resolved(id, state);

    match session.view() {
        SessionView::Live { .. } => {}
        SessionView::PermissionNeeded { state, .. } => {
            return Err(CameraError::PermissionNotGranted(state.to_string()).into());
        }
        SessionView::NoDevice | SessionView::Closed => {
            return Err(CameraError::NoCameraFound.into());
        }
    }

    if let Some(device) = session.device() {
        println!("Using camera: {}", device.name);
    }
    println!("Quality: {}", options.quality.display_name());

    // Let exposure settle before taking the shot
    println!("Capturing...");
    std::thread::sleep(timing::CLI_WARMUP);

    let capture = session.begin_capture().ok_or("Camera is not ready")?;
    let ack = rt.block_on(capture);
    let ack = session.finish_capture(id, ack).ok_or("Capture result was discarded")?;

    session.close(|| shell.session_closed());

    match ack {
        Acknowledgment::Saved(saved) => {
            // If user specified a specific filename, move the file there
            if let Some(user_path) = output
                && !user_path.is_dir()
            {
                move_file(&saved, &user_path)?;
                println!("Photo saved: {}", user_path.display());
                return Ok(());
            }
            println!("Photo saved: {}", saved.display());
            Ok(())
        }
        Acknowledgment::Failed(err) => Err(err.into()),
    }
}

/// Rename, falling back to copy when crossing filesystems
fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    if let Some(parent) = to.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    if std::fs::rename(from, to).is_err() {
        std::fs::copy(from, to)?;
        std::fs::remove_file(from)?;
    }
    Ok(())
}
