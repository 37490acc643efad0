// SPDX-License-Identifier: GPL-3.0-only

//! Application shell
//!
//! Holds one flag, whether the capture session is mounted. Opening hands out
//! a fresh [`SessionId`] for the new mount.

use crate::session::SessionId;
use tracing::debug;

#[derive(Debug, Default)]
pub struct Shell {
    session_visible: bool,
    last_mount: SessionId,
}

impl Shell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_visible(&self) -> bool {
        self.session_visible
    }

    /// Mount the capture session
    ///
    /// Returns the id for the new mount, or `None` if one is already mounted.
    pub fn open(&mut self) -> Option<SessionId> {
        if self.session_visible {
            return None;
        }
        self.last_mount = self.last_mount.next();
        self.session_visible = true;
        debug!(session = %self.last_mount, "Shell mounting capture session");
        Some(self.last_mount)
    }

    /// Close callback target: unmount the capture session
    pub fn session_closed(&mut self) {
        debug!(session = %self.last_mount, "Shell regained control");
        self.session_visible = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_and_close_toggle_visibility() {
        let mut shell = Shell::new();
        assert!(!shell.session_visible());

        let first = shell.open().unwrap();
        assert!(shell.session_visible());
        assert!(shell.open().is_none(), "already mounted");

        shell.session_closed();
        assert!(!shell.session_visible());

        let second = shell.open().unwrap();
        assert!(second > first);
    }
}
