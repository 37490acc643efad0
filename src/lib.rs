// SPDX-License-Identifier: MPL-2.0

//! CamRoll - take a photo and save it to your gallery
//!
//! A small camera application: a shell screen opens a capture session that
//! asks for camera permission, previews the chosen camera, takes a still and
//! copies it into the user's pictures directory.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: COSMIC application, views and message handlers
//! - [`shell`]: Root screen state that mounts and unmounts the session
//! - [`session`]: Capture session core (permission, hardware lease, capture flow)
//! - [`backends`]: Camera and permission backend abstraction
//! - [`pipelines`]: Still photo encoding
//! - [`storage`]: Gallery persistence
//! - [`config`]: User configuration handling
//! - [`terminal`]: Terminal front-end over the same session core
//!
//! # Example
//!
//! ```ignore
//! // This is a GUI application, typically run via:
//! // camroll
//! ```

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod i18n;
pub mod pipelines;
pub mod session;
pub mod shell;
pub mod storage;
pub mod terminal;

// Re-export commonly used types
pub use app::{AppModel, Message};
pub use config::Config;
pub use constants::PhotoQuality;
pub use session::{Acknowledgment, CaptureSession, SessionView};
