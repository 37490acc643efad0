// SPDX-License-Identifier: GPL-3.0-only

//! Capture-session state types

use crate::backends::permission::PermissionState;
use crate::errors::AppError;
use std::path::PathBuf;

/// Mount counter tagging asynchronous results
///
/// Every mount of a capture session gets a fresh id. Results that come back
/// carrying an older id belong to a session that is gone and are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SessionId(u64);

impl SessionId {
    pub fn next(self) -> Self {
        SessionId(self.0 + 1)
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a capture session should render, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionView {
    /// Permission is not granted: explanation plus a retry control
    PermissionNeeded {
        state: PermissionState,
        /// A permission request is in flight
        requesting: bool,
    },
    /// No camera matched the requested facing
    NoDevice,
    /// Closed by the user; render nothing
    Closed,
    /// Live preview with capture and close controls
    Live {
        /// A capture is in flight
        capturing: bool,
    },
}

impl SessionView {
    pub fn is_live(&self) -> bool {
        matches!(self, SessionView::Live { .. })
    }
}

/// User-visible outcome of one capture action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acknowledgment {
    /// Photo written to the gallery at this path
    Saved(PathBuf),
    /// Capture or save failed
    Failed(AppError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_ids_increase() {
        let first = SessionId::default();
        let second = first.next();
        assert!(second > first);
        assert_eq!(second.to_string(), "#1");
    }
}
