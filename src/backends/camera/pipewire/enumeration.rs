// SPDX-License-Identifier: GPL-3.0-only

//! PipeWire camera enumeration
//!
//! Cameras are discovered from `pw-dump`, which prints every PipeWire object
//! as JSON. Video sources carry `media.class = "Video/Source"`; libcamera
//! nodes additionally report where the sensor points through
//! `api.libcamera.location`.

use super::super::types::{CameraDevice, CameraFacing};
use serde_json::Value;
use std::process::Command;
use tracing::{debug, info, warn};

/// Enumerate cameras using PipeWire
/// Returns list of available cameras discovered through PipeWire
pub fn enumerate_pipewire_cameras() -> Option<Vec<CameraDevice>> {
    debug!("Attempting to enumerate cameras via PipeWire");

    if !is_pipewire_available() {
        return None;
    }

    let output = match Command::new("pw-dump").output() {
        Ok(output) => output,
        Err(e) => {
            warn!("Failed to run pw-dump: {}", e);
            return None;
        }
    };

    if !output.status.success() {
        warn!("pw-dump command failed");
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let cameras = parse_pw_dump(&stdout);

    if cameras.is_empty() {
        // Let PipeWire pick its default camera; we cannot tell which way it faces
        info!("No cameras listed by pw-dump, using PipeWire auto-selection");
        return Some(vec![CameraDevice {
            name: "Default Camera (PipeWire)".to_string(),
            path: String::new(),
            node_id: None,
            facing: CameraFacing::External,
        }]);
    }

    debug!(count = cameras.len(), "Found PipeWire cameras");
    Some(cameras)
}

/// Extract video sources from `pw-dump` JSON output
pub fn parse_pw_dump(json: &str) -> Vec<CameraDevice> {
    let nodes: Vec<Value> = match serde_json::from_str(json) {
        Ok(nodes) => nodes,
        Err(e) => {
            warn!("Failed to parse JSON from pw-dump: {}", e);
            return Vec::new();
        }
    };

    let mut cameras: Vec<CameraDevice> = nodes.iter().filter_map(node_to_device).collect();

    // Libcamera exposes the same sensor through a V4L2 node as well; prefer
    // entries that know their facing
    cameras.sort_by_key(|device| device.facing == CameraFacing::External);
    cameras
}

fn node_to_device(node: &Value) -> Option<CameraDevice> {
    if node.get("type").and_then(Value::as_str) != Some("PipeWire:Interface:Node") {
        return None;
    }

    let props = node.get("info")?.get("props")?;
    if props.get("media.class").and_then(Value::as_str) != Some("Video/Source") {
        return None;
    }

    let name = props
        .get("node.description")
        .or_else(|| props.get("node.nick"))
        .or_else(|| props.get("node.name"))
        .and_then(Value::as_str)
        .unwrap_or("Unknown Camera")
        .to_string();

    let node_id = node.get("id").and_then(Value::as_u64).map(|id| id.to_string());

    // object.serial is numeric in pw-dump, quoted in some older releases
    let serial = props.get("object.serial").and_then(|v| match v {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    });

    // Priority: use object.serial for target-object, fallback to node ID
    let path = match (&serial, &node_id) {
        (Some(serial), _) => format!("pipewire-serial-{}", serial),
        (None, Some(id)) => format!("pipewire-{}", id),
        (None, None) => String::new(),
    };

    let facing = props
        .get("api.libcamera.location")
        .and_then(Value::as_str)
        .map(CameraFacing::from_location)
        .unwrap_or(CameraFacing::External);

    debug!(name = %name, path = %path, facing = %facing, "Found video camera");

    Some(CameraDevice {
        name,
        path,
        node_id,
        facing,
    })
}

/// Check if the pipewiresrc GStreamer element can be created
pub fn is_pipewire_available() -> bool {
    if gstreamer::init().is_err() {
        warn!("GStreamer init failed");
        return false;
    }

    let available = gstreamer::ElementFactory::make("pipewiresrc")
        .build()
        .is_ok();
    if !available {
        debug!("pipewiresrc not available");
    }
    available
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = r#"[
        {
            "id": 31,
            "type": "PipeWire:Interface:Node",
            "info": { "props": {
                "media.class": "Audio/Source",
                "node.description": "Built-in Microphone",
                "object.serial": 31
            } }
        },
        {
            "id": 58,
            "type": "PipeWire:Interface:Node",
            "info": { "props": {
                "media.class": "Video/Source",
                "node.description": "USB Webcam (V4L2)",
                "object.serial": 102
            } }
        },
        {
            "id": 61,
            "type": "PipeWire:Interface:Node",
            "info": { "props": {
                "media.class": "Video/Source",
                "node.description": "imx363",
                "object.serial": "140",
                "api.libcamera.location": "back"
            } }
        },
        {
            "id": 62,
            "type": "PipeWire:Interface:Node",
            "info": { "props": {
                "media.class": "Video/Source",
                "node.description": "ov8856",
                "api.libcamera.location": "front"
            } }
        },
        {
            "id": 3,
            "type": "PipeWire:Interface:Metadata",
            "props": { "metadata.name": "default" }
        }
    ]"#;

    #[test]
    fn test_parse_filters_video_sources() {
        let cameras = parse_pw_dump(DUMP);
        assert_eq!(cameras.len(), 3);
        assert!(cameras.iter().all(|c| c.name != "Built-in Microphone"));
    }

    #[test]
    fn test_parse_reads_facing_and_paths() {
        let cameras = parse_pw_dump(DUMP);

        let back = cameras.iter().find(|c| c.facing == CameraFacing::Back).unwrap();
        assert_eq!(back.name, "imx363");
        assert_eq!(back.path, "pipewire-serial-140");
        assert_eq!(back.node_id.as_deref(), Some("61"));

        let front = cameras.iter().find(|c| c.facing == CameraFacing::Front).unwrap();
        assert_eq!(front.path, "pipewire-62");

        let usb = cameras.iter().find(|c| c.facing == CameraFacing::External).unwrap();
        assert_eq!(usb.path, "pipewire-serial-102");
    }

    #[test]
    fn test_located_cameras_sort_first() {
        let cameras = parse_pw_dump(DUMP);
        assert_eq!(cameras.last().unwrap().facing, CameraFacing::External);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_pw_dump("not json").is_empty());
        assert!(parse_pw_dump("[]").is_empty());
    }
}
