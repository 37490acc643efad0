// SPDX-License-Identifier: MPL-2.0

//! Integration tests for constants module

use camroll::PhotoQuality;
use camroll::constants::timing;

#[test]
fn test_photo_quality_values() {
    // Test that all presets exist (Low, Medium, High, Maximum)
    assert_eq!(PhotoQuality::ALL.len(), 4);
}

#[test]
fn test_photo_quality_ordering() {
    // Test that presets are ordered from lowest to highest quality
    let mut prev = 0u8;
    for quality in PhotoQuality::ALL {
        let jpeg = quality.jpeg_quality();
        assert!(jpeg > prev, "Presets should be ordered from lowest to highest");
        assert!(jpeg <= 100);
        prev = jpeg;
    }
}

#[test]
fn test_photo_quality_display_names() {
    for quality in PhotoQuality::ALL {
        assert!(
            !quality.display_name().is_empty(),
            "Preset {:?} has empty display name",
            quality
        );
    }
}

#[test]
fn test_warmup_shorter_than_first_frame_timeout() {
    assert!(timing::CLI_WARMUP < timing::FIRST_FRAME_TIMEOUT);
}
