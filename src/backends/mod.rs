// SPDX-License-Identifier: MPL-2.0

//! Platform capabilities consumed by the capture session
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               Capture Session                │
//! └───────────┬───────────────────────┬─────────┘
//!             │                       │
//! ┌───────────┴─────────┐   ┌─────────┴─────────┐
//! │     Permission      │   │      Camera       │
//! │  (portal / D-Bus)   │   │    (PipeWire)     │
//! └─────────────────────┘   └───────────────────┘
//! ```
//!
//! - [`camera`]: device discovery, hardware lease and still capture
//! - [`permission`]: camera-access check through the XDG desktop portal

pub mod camera;
pub mod permission;
