// SPDX-License-Identifier: MPL-2.0

//! Processing pipelines for still capture
//!
//! ```text
//! ┌──────────────┐     ┌───────────────────┐     ┌──────────────┐     ┌──────────┐
//! │ Camera Frame │ ──▶ │  Photo Encoder    │ ──▶ │  Temp JPEG   │ ──▶ │ Gallery  │
//! │   (RGBA)     │     │  (blocking task)  │     │ CapturedPhoto│     │  save    │
//! └──────────────┘     └───────────────────┘     └──────────────┘     └──────────┘
//! ```
//!
//! Encoding runs on the blocking pool so the preview never stalls.

pub mod photo;
