// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the capture session driven through the shell

use camroll::backends::camera::{
    ActiveCamera, BackendError, BackendResult, CameraBackend, CameraDevice, CameraFacing,
    CameraFrame,
};
use camroll::backends::permission::{PermissionGate, PermissionState};
use camroll::constants::PhotoQuality;
use camroll::errors::{AppError, CaptureError, SaveError};
use camroll::pipelines::photo::CapturedPhoto;
use camroll::session::{
    Acknowledgment, CaptureSession, SessionDeps, SessionId, SessionOptions, SessionView,
};
use camroll::shell::Shell;
use camroll::storage::{AssetKind, Gallery};
use futures::future::BoxFuture;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Weak};

// ===== Fakes =====

struct FakeGate {
    answers: Mutex<VecDeque<PermissionState>>,
    checks: AtomicUsize,
}

impl FakeGate {
    fn answering(answers: &[PermissionState]) -> Arc<Self> {
        Arc::new(Self {
            answers: Mutex::new(answers.iter().copied().collect()),
            checks: AtomicUsize::new(0),
        })
    }
}

impl PermissionGate for FakeGate {
    fn check(&self) -> BoxFuture<'static, PermissionState> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        let state = self
            .answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(PermissionState::Granted);
        Box::pin(async move { state })
    }
}

#[derive(Default)]
struct HardwareCounters {
    acquired: AtomicUsize,
    released: AtomicUsize,
}

struct FakeBackend {
    devices: Vec<CameraDevice>,
    fail_activation: bool,
    fail_capture: bool,
    counters: Arc<HardwareCounters>,
}

impl FakeBackend {
    fn with_devices(devices: Vec<CameraDevice>) -> Self {
        Self {
            devices,
            fail_activation: false,
            fail_capture: false,
            counters: Arc::new(HardwareCounters::default()),
        }
    }
}

impl CameraBackend for FakeBackend {
    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        self.devices.clone()
    }

    fn activate(&self, device: &CameraDevice) -> BackendResult<Box<dyn ActiveCamera>> {
        if self.fail_activation {
            return Err(BackendError::InitializationFailed("busy".into()));
        }
        self.counters.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeCamera {
            device: device.clone(),
            alive: Arc::new(()),
            fail_capture: self.fail_capture,
            counters: Arc::clone(&self.counters),
        }))
    }
}

struct FakeCamera {
    device: CameraDevice,
    alive: Arc<()>,
    fail_capture: bool,
    counters: Arc<HardwareCounters>,
}

impl ActiveCamera for FakeCamera {
    fn device(&self) -> &CameraDevice {
        &self.device
    }

    fn latest_frame(&self) -> Option<Arc<CameraFrame>> {
        Some(Arc::new(CameraFrame::from_rgba(1, 1, vec![0, 0, 0, 255])))
    }

    fn take_photo(
        &self,
        _quality: PhotoQuality,
    ) -> BoxFuture<'static, Result<CapturedPhoto, CaptureError>> {
        let alive: Weak<()> = Arc::downgrade(&self.alive);
        let fail = self.fail_capture;
        Box::pin(async move {
            if alive.upgrade().is_none() {
                return Err(CaptureError::HardwareInactive);
            }
            if fail {
                return Err(CaptureError::NoFrameAvailable);
            }
            let path = std::env::temp_dir()
                .join(format!("camroll-session-{}.jpg", uuid::Uuid::new_v4()));
            std::fs::write(&path, b"jpeg")?;
            Ok(CapturedPhoto::new(path, 1, 1))
        })
    }
}

impl Drop for FakeCamera {
    fn drop(&mut self) {
        self.counters.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// Temporary paths handed to the gallery, with whether they existed
type Received = Arc<Mutex<Vec<(PathBuf, bool)>>>;

#[derive(Default)]
struct FakeGallery {
    fail: bool,
    received: Received,
}

impl Gallery for FakeGallery {
    fn save(
        &self,
        photo: CapturedPhoto,
        _kind: AssetKind,
    ) -> BoxFuture<'static, Result<PathBuf, SaveError>> {
        let received = Arc::clone(&self.received);
        let fail = self.fail;
        Box::pin(async move {
            let temp = photo.path().to_path_buf();
            received.lock().unwrap().push((temp.clone(), temp.exists()));
            drop(photo);
            if fail {
                Err(SaveError::WriteFailed("disk full".into()))
            } else {
                Ok(PathBuf::from("/gallery/IMG_1.jpg"))
            }
        })
    }
}

// ===== Helpers =====

fn device(name: &str, facing: CameraFacing) -> CameraDevice {
    CameraDevice {
        name: name.into(),
        path: format!("pipewire-serial-{}", name.len()),
        node_id: None,
        facing,
    }
}

struct Harness {
    shell: Shell,
    counters: Arc<HardwareCounters>,
    gate: Arc<FakeGate>,
    received: Received,
    deps: SessionDeps,
}

impl Harness {
    fn new(backend: FakeBackend, answers: &[PermissionState], gallery: FakeGallery) -> Self {
        let counters = Arc::clone(&backend.counters);
        let gate = FakeGate::answering(answers);
        let received = Arc::clone(&gallery.received);
        let deps = SessionDeps {
            backend: Arc::new(backend),
            gate: gate.clone(),
            gallery: Arc::new(gallery),
        };
        Self {
            shell: Shell::new(),
            counters,
            gate,
            received,
            deps,
        }
    }

    fn granted() -> Self {
        Self::new(
            FakeBackend::with_devices(vec![device("rear", CameraFacing::Back)]),
            &[PermissionState::Granted],
            FakeGallery::default(),
        )
    }

    /// Mount and resolve the initial permission check
    fn open(&mut self) -> CaptureSession {
        let id = self.shell.open().expect("shell already showing a session");
        let (mut session, check) =
            CaptureSession::mount(id, SessionOptions::default(), self.deps.clone());
        let state = pollster::block_on(check);
        assert!(session.permission_resolved(id, state));
        session
    }

    fn acquired(&self) -> usize {
        self.counters.acquired.load(Ordering::SeqCst)
    }

    fn released(&self) -> usize {
        self.counters.released.load(Ordering::SeqCst)
    }
}

fn capture(session: &mut CaptureSession) -> Acknowledgment {
    let id = session.id();
    let fut = session.begin_capture().expect("capture should start");
    let ack = pollster::block_on(fut);
    session.finish_capture(id, ack).expect("result should be current")
}

// ===== Permission and preview =====

#[test]
fn test_granted_with_device_is_live() {
    let mut h = Harness::granted();
    let session = h.open();

    assert_eq!(session.view(), SessionView::Live { capturing: false });
    assert!(session.is_hardware_active());
    assert!(session.latest_frame().is_some());
    assert_eq!(h.acquired(), 1);
}

#[test]
fn test_pending_permission_shows_requesting() {
    let mut h = Harness::granted();
    let id = h.shell.open().unwrap();
    let (session, _check) = CaptureSession::mount(id, SessionOptions::default(), h.deps.clone());

    assert_eq!(
        session.view(),
        SessionView::PermissionNeeded {
            state: PermissionState::NotDetermined,
            requesting: true,
        }
    );
    assert!(!session.is_hardware_active());
    assert_eq!(h.acquired(), 0);
}

#[test]
fn test_denied_never_touches_hardware() {
    for state in [PermissionState::Denied, PermissionState::Restricted] {
        let mut h = Harness::new(
            FakeBackend::with_devices(vec![device("rear", CameraFacing::Back)]),
            &[state],
            FakeGallery::default(),
        );
        let session = h.open();

        assert_eq!(
            session.view(),
            SessionView::PermissionNeeded {
                state,
                requesting: false,
            }
        );
        assert!(session.latest_frame().is_none());
        assert_eq!(h.acquired(), 0);
    }
}

#[test]
fn test_retry_after_denial_goes_live() {
    let mut h = Harness::new(
        FakeBackend::with_devices(vec![device("rear", CameraFacing::Back)]),
        &[PermissionState::Denied, PermissionState::Granted],
        FakeGallery::default(),
    );
    let mut session = h.open();
    let id = session.id();

    let retry = session.request_permission().expect("retry allowed after denial");
    // Second press while the first is pending is ignored
    assert!(session.request_permission().is_none());
    assert!(matches!(
        session.view(),
        SessionView::PermissionNeeded { requesting: true, .. }
    ));

    session.permission_resolved(id, pollster::block_on(retry));
    assert!(session.view().is_live());
    assert_eq!(h.gate.checks.load(Ordering::SeqCst), 2);

    // Nothing to ask once granted
    assert!(session.request_permission().is_none());
}

#[test]
fn test_no_matching_device() {
    let mut h = Harness::new(
        FakeBackend::with_devices(vec![device("webcam", CameraFacing::External)]),
        &[PermissionState::Granted],
        FakeGallery::default(),
    );
    let mut session = h.open();

    assert_eq!(session.view(), SessionView::NoDevice);
    assert!(session.begin_capture().is_none());
    assert_eq!(h.acquired(), 0);
}

#[test]
fn test_activation_failure_reads_as_no_device() {
    let mut backend = FakeBackend::with_devices(vec![device("rear", CameraFacing::Back)]);
    backend.fail_activation = true;
    let mut h = Harness::new(backend, &[PermissionState::Granted], FakeGallery::default());
    let session = h.open();

    assert_eq!(session.view(), SessionView::NoDevice);
    assert!(!session.is_hardware_active());
}

#[test]
fn test_lookup_honors_facing() {
    let backend = FakeBackend::with_devices(vec![
        device("rear", CameraFacing::Back),
        device("selfie", CameraFacing::Front),
    ]);
    assert_eq!(backend.lookup(CameraFacing::Front).map(|d| d.name), Some("selfie".into()));
    assert_eq!(backend.lookup(CameraFacing::Any).map(|d| d.name), Some("rear".into()));
    assert!(backend.lookup(CameraFacing::External).is_none());
}

// ===== Capture =====

#[test]
fn test_capture_saves_and_discards_temp() {
    let mut h = Harness::granted();
    let mut session = h.open();

    let ack = capture(&mut session);
    assert_eq!(ack, Acknowledgment::Saved(PathBuf::from("/gallery/IMG_1.jpg")));

    let received = h.received.lock().unwrap().clone();
    assert_eq!(received.len(), 1);
    let (temp, existed) = &received[0];
    assert!(*existed, "gallery should receive an existing file");
    assert!(!temp.exists(), "temporary capture should be removed");

    // Capture leaves the session untouched
    assert_eq!(session.view(), SessionView::Live { capturing: false });
    assert_eq!(session.permission(), PermissionState::Granted);
    assert!(session.is_active());
}

#[test]
fn test_capture_in_flight_ignores_second_press() {
    let mut h = Harness::granted();
    let mut session = h.open();
    let id = session.id();

    let first = session.begin_capture().expect("first press starts a capture");
    assert_eq!(session.view(), SessionView::Live { capturing: true });
    assert!(session.begin_capture().is_none());

    let ack = pollster::block_on(first);
    assert!(session.finish_capture(id, ack).is_some());
    assert!(session.begin_capture().is_some());
}

#[test]
fn test_capture_failure_acknowledged() {
    let mut backend = FakeBackend::with_devices(vec![device("rear", CameraFacing::Back)]);
    backend.fail_capture = true;
    let mut h = Harness::new(backend, &[PermissionState::Granted], FakeGallery::default());
    let mut session = h.open();

    let ack = capture(&mut session);
    assert_eq!(ack, Acknowledgment::Failed(AppError::Capture(CaptureError::NoFrameAvailable)));
    assert!(h.received.lock().unwrap().is_empty());
    assert!(session.view().is_live());
}

#[test]
fn test_gallery_failure_acknowledged() {
    let mut h = Harness::new(
        FakeBackend::with_devices(vec![device("rear", CameraFacing::Back)]),
        &[PermissionState::Granted],
        FakeGallery {
            fail: true,
            ..Default::default()
        },
    );
    let mut session = h.open();

    let ack = capture(&mut session);
    assert!(matches!(ack, Acknowledgment::Failed(AppError::Save(_))));

    let received = h.received.lock().unwrap().clone();
    assert!(!received[0].0.exists(), "temporary capture removed on failure too");

    // Session stays usable for another attempt
    assert!(session.is_active());
    assert!(session.begin_capture().is_some());
}

#[test]
fn test_capture_after_release_reports_inactive() {
    let mut h = Harness::granted();
    let mut session = h.open();
    let id = session.id();

    let pending = session.begin_capture().unwrap();
    let shell = &mut h.shell;
    session.close(|| shell.session_closed());

    let ack = pollster::block_on(pending);
    assert_eq!(ack, Acknowledgment::Failed(AppError::Capture(CaptureError::HardwareInactive)));
    assert!(session.finish_capture(id, ack).is_some());
}

#[test]
fn test_begin_capture_requires_live_preview() {
    let mut h = Harness::new(
        FakeBackend::with_devices(vec![device("rear", CameraFacing::Back)]),
        &[PermissionState::Denied],
        FakeGallery::default(),
    );
    let mut session = h.open();
    assert!(session.begin_capture().is_none());
}

// ===== Close and unmount =====

#[test]
fn test_close_releases_before_callback() {
    let mut h = Harness::granted();
    let mut session = h.open();
    assert!(h.shell.session_visible());

    let counters = Arc::clone(&h.counters);
    let called = AtomicBool::new(false);
    let shell = &mut h.shell;
    session.close(|| {
        assert_eq!(counters.released.load(Ordering::SeqCst), 1);
        called.store(true, Ordering::SeqCst);
        shell.session_closed();
    });

    assert!(called.load(Ordering::SeqCst));
    assert!(!h.shell.session_visible());
    assert!(!session.is_active());
    assert!(!session.is_hardware_active());
    assert_eq!(session.view(), SessionView::Closed);
    assert!(session.begin_capture().is_none());
}

#[test]
fn test_unmount_releases_hardware() {
    let mut h = Harness::granted();
    let session = h.open();
    assert_eq!(h.released(), 0);

    drop(session);
    assert_eq!(h.released(), 1);
    assert_eq!(h.acquired(), h.released());
}

#[test]
fn test_reopen_starts_fresh_session() {
    let mut h = Harness::new(
        FakeBackend::with_devices(vec![device("rear", CameraFacing::Back)]),
        &[PermissionState::Granted, PermissionState::Granted],
        FakeGallery::default(),
    );
    let mut first = h.open();
    let first_id = first.id();
    let shell = &mut h.shell;
    first.close(|| shell.session_closed());
    drop(first);

    let second = h.open();
    assert!(second.id() > first_id);
    assert!(second.view().is_live());
    assert_eq!(h.acquired(), 2);
    assert_eq!(h.released(), 1);
}

#[test]
fn test_stale_results_are_discarded() {
    let mut h = Harness::granted();
    let mut session = h.open();
    let stale = SessionId::default();
    assert_ne!(stale, session.id());

    assert!(!session.permission_resolved(stale, PermissionState::Denied));
    assert_eq!(session.permission(), PermissionState::Granted);

    let ack = Acknowledgment::Saved(PathBuf::from("/elsewhere.jpg"));
    assert!(session.finish_capture(stale, ack).is_none());
}

#[test]
fn test_shell_refuses_second_open() {
    let mut shell = Shell::new();
    let first = shell.open();
    assert!(first.is_some());
    assert!(shell.open().is_none());

    shell.session_closed();
    let second = shell.open();
    assert!(second > first);
}
