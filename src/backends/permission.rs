// SPDX-License-Identifier: MPL-2.0

//! Camera permission via the XDG desktop portal
//!
//! Inside a sandbox the camera is only reachable after
//! `org.freedesktop.portal.Camera.AccessCamera` succeeds. The call returns a
//! request object whose `Response` signal carries the user's answer. Outside
//! a sandbox there is nothing to ask and access is granted directly, unless
//! the portal is forced through config.

use crate::constants::{app_info, portal};
use futures::StreamExt;
use futures::future::BoxFuture;
use std::collections::HashMap;
use tracing::{debug, info, warn};
use zbus::zvariant::{OwnedObjectPath, OwnedValue, Value};

/// Camera permission as reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionState {
    /// No answer yet
    #[default]
    NotDetermined,
    Granted,
    /// The user refused access
    Denied,
    /// Access is blocked by policy, or the portal could not be asked
    Restricted,
}

impl PermissionState {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionState::Granted)
    }

    /// Map a portal `Response` code
    pub fn from_portal_response(code: u32) -> Self {
        match code {
            portal::RESPONSE_SUCCESS => PermissionState::Granted,
            portal::RESPONSE_CANCELLED => PermissionState::Denied,
            _ => PermissionState::Restricted,
        }
    }
}

impl std::fmt::Display for PermissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionState::NotDetermined => write!(f, "not determined"),
            PermissionState::Granted => write!(f, "granted"),
            PermissionState::Denied => write!(f, "denied"),
            PermissionState::Restricted => write!(f, "restricted"),
        }
    }
}

/// Asynchronous camera-permission check
pub trait PermissionGate: Send + Sync {
    /// Ask the platform for camera access
    ///
    /// Suspends until the platform answers. Never fails: an unreachable
    /// platform is reported as [`PermissionState::Restricted`].
    fn check(&self) -> BoxFuture<'static, PermissionState>;
}

/// Permission gate backed by the camera portal
#[derive(Debug, Clone, Default)]
pub struct PortalPermission {
    force_portal: bool,
}

impl PortalPermission {
    pub fn new(force_portal: bool) -> Self {
        Self { force_portal }
    }

    fn uses_portal(&self) -> bool {
        self.force_portal || app_info::is_flatpak()
    }
}

impl PermissionGate for PortalPermission {
    fn check(&self) -> BoxFuture<'static, PermissionState> {
        let uses_portal = self.uses_portal();
        Box::pin(async move {
            if !uses_portal {
                debug!("Not sandboxed, camera access needs no portal");
                return PermissionState::Granted;
            }

            match access_camera().await {
                Ok(state) => {
                    info!(%state, "Camera portal answered");
                    state
                }
                Err(e) => {
                    warn!(error = %e, "Camera portal unavailable");
                    PermissionState::Restricted
                }
            }
        })
    }
}

/// Request path the portal will use for `handle_token`
///
/// The sender's unique name loses its leading ':' and has '.' replaced by '_'.
pub fn request_path(unique_name: &str, handle_token: &str) -> String {
    let sender = unique_name.trim_start_matches(':').replace('.', "_");
    format!("{}/request/{}/{}", portal::OBJECT_PATH, sender, handle_token)
}

/// Call `AccessCamera` and wait for the request's `Response`
async fn access_camera() -> zbus::Result<PermissionState> {
    let connection = zbus::Connection::session().await?;

    let unique_name = connection
        .unique_name()
        .map(|name| name.to_string())
        .ok_or_else(|| zbus::Error::Failure("Session bus connection has no unique name".into()))?;
    let handle_token = format!("camroll_{}", uuid::Uuid::new_v4().simple());
    let expected_path = request_path(&unique_name, &handle_token);

    // Subscribe before calling so a fast answer cannot be missed
    let request = zbus::Proxy::new(
        &connection,
        portal::BUS_NAME,
        expected_path.as_str(),
        portal::REQUEST_INTERFACE,
    )
    .await?;
    let mut responses = request.receive_signal("Response").await?;

    let camera = zbus::Proxy::new(
        &connection,
        portal::BUS_NAME,
        portal::OBJECT_PATH,
        portal::CAMERA_INTERFACE,
    )
    .await?;

    let mut options: HashMap<&str, Value> = HashMap::new();
    options.insert("handle_token", Value::new(handle_token.as_str()));

    debug!(request = %expected_path, "Calling AccessCamera");
    let handle: OwnedObjectPath = camera.call("AccessCamera", &(options,)).await?;
    if handle.as_str() != expected_path {
        // Portals older than 0.9 pick their own path; our subscription would never fire
        warn!(
            handle = %handle.as_str(),
            expected = %expected_path,
            "Portal returned an unexpected request path"
        );
        return Ok(PermissionState::Restricted);
    }

    let message = responses
        .next()
        .await
        .ok_or_else(|| zbus::Error::Failure("Portal request closed without a response".into()))?;
    let (code, _results): (u32, HashMap<String, OwnedValue>) = message.body().deserialize()?;

    Ok(PermissionState::from_portal_response(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_codes() {
        assert_eq!(PermissionState::from_portal_response(0), PermissionState::Granted);
        assert_eq!(PermissionState::from_portal_response(1), PermissionState::Denied);
        assert_eq!(PermissionState::from_portal_response(2), PermissionState::Restricted);
    }

    #[test]
    fn test_request_path_escapes_sender() {
        assert_eq!(
            request_path(":1.42", "camroll_abc"),
            "/org/freedesktop/portal/desktop/request/1_42/camroll_abc"
        );
    }

    #[test]
    fn test_unsandboxed_check_is_granted() {
        if app_info::is_flatpak() {
            return;
        }
        let state = pollster::block_on(PortalPermission::new(false).check());
        assert_eq!(state, PermissionState::Granted);
    }
}
