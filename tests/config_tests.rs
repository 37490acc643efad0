// SPDX-License-Identifier: MPL-2.0

//! Integration tests for configuration module

use camroll::Config;
use camroll::PhotoQuality;
use camroll::backends::camera::CameraFacing;
use camroll::constants::DEFAULT_SAVE_FOLDER;

#[test]
fn test_config_default() {
    // Test that default config can be created
    let config = Config::default();

    // Check sensible defaults
    assert_eq!(
        config.camera_facing,
        CameraFacing::Back,
        "Back camera should be preferred by default"
    );
    assert_eq!(config.photo_quality, PhotoQuality::High);
    assert!(!config.force_camera_portal);
}

#[test]
fn test_config_save_folder() {
    let config = Config::default();
    assert_eq!(config.save_folder_name, DEFAULT_SAVE_FOLDER);
}

#[test]
fn test_config_serde_roundtrip_keeps_facing() {
    let config = Config {
        camera_facing: CameraFacing::Front,
        ..Default::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    let restored: Config = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, config);
}
