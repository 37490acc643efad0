// SPDX-License-Identifier: GPL-3.0-only

//! Terminal front-end
//!
//! Drives the same shell and capture session as the GUI. The preview is
//! rendered with Unicode half-block characters for improved vertical
//! resolution; keys stand in for the buttons.
//!
//! Log output goes to a file while the alternate screen is up, see
//! [`log_writer`].

use crate::backends::camera::{CameraFacing, CameraFrame, get_backend};
use crate::backends::permission::{PermissionState, PortalPermission};
use crate::config::Config;
use crate::constants::{app_info, timing};
use crate::fl;
use crate::i18n;
use crate::session::{
    Acknowledgment, CaptureSession, SessionDeps, SessionId, SessionOptions, SessionView,
};
use crate::shell::Shell;
use crate::storage::DirectoryGallery;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};
use futures::future::BoxFuture;
use std::fs::OpenOptions;
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use tracing::info;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// File the terminal front-end logs to (`~/.cache/camroll/terminal.log`)
pub fn log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("camroll")
        .join("terminal.log")
}

/// Log sink for the terminal front-end
///
/// Anything written to stdout or stderr would land inside the ratatui frame,
/// so events are appended to [`log_path`]. When the file cannot be opened
/// they are discarded.
pub fn log_writer() -> BoxMakeWriter {
    let path = log_path();
    let file = path
        .parent()
        .map_or(Ok(()), std::fs::create_dir_all)
        .and_then(|_| OpenOptions::new().create(true).append(true).open(&path));

    match file {
        Ok(file) => BoxMakeWriter::new(Mutex::new(file)),
        Err(_) => BoxMakeWriter::new(io::sink),
    }
}

/// Run the terminal front-end
pub fn run(facing: Option<CameraFacing>) -> Result<(), Box<dyn std::error::Error>> {
    let requested_languages = i18n_embed::DesktopLanguageRequester::requested_languages();
    i18n::init(&requested_languages);

    gstreamer::init()?;

    let config = Config::load(app_info::APP_ID);
    let options = SessionOptions {
        facing: facing.unwrap_or(config.camera_facing),
        quality: config.photo_quality,
    };
    let deps = SessionDeps {
        backend: get_backend(),
        gate: Arc::new(PortalPermission::new(config.force_camera_portal)),
        gallery: Arc::new(DirectoryGallery::pictures(&config.save_folder_name)),
    };

    let runtime = tokio::runtime::Runtime::new()?;

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = TerminalApp::new(options, deps, runtime.handle().clone());
    let result = app.run(&mut terminal);
    // Release the camera before leaving the alternate screen
    drop(app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Completed async work, tagged with the mount that started it
enum Completion {
    Permission(SessionId, PermissionState),
    Capture(SessionId, Acknowledgment),
}

struct TerminalApp {
    shell: Shell,
    session: Option<CaptureSession>,
    options: SessionOptions,
    deps: SessionDeps,
    acknowledgment: Option<Acknowledgment>,
    runtime: tokio::runtime::Handle,
    completions_tx: mpsc::Sender<Completion>,
    completions_rx: mpsc::Receiver<Completion>,
    quit: bool,
}

impl TerminalApp {
    fn new(options: SessionOptions, deps: SessionDeps, runtime: tokio::runtime::Handle) -> Self {
        let (completions_tx, completions_rx) = mpsc::channel();
        Self {
            shell: Shell::new(),
            session: None,
            options,
            deps,
            acknowledgment: None,
            runtime,
            completions_tx,
            completions_rx,
            quit: false,
        }
    }

    fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        while !self.quit {
            self.drain_completions();

            terminal.draw(|f| self.draw(f.area(), f.buffer_mut()))?;

            // Handle input with timeout for frame updates
            if event::poll(timing::TERMINAL_POLL)?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    self.quit = true;
                    continue;
                }
                self.handle_key(key.code);
            }
        }
        Ok(())
    }

    fn drain_completions(&mut self) {
        while let Ok(completion) = self.completions_rx.try_recv() {
            let Some(session) = self.session.as_mut() else {
                continue;
            };
            match completion {
                Completion::Permission(id, state) => {
                    session.permission_resolved(id, state);
                }
                Completion::Capture(id, ack) => {
                    if let Some(ack) = session.finish_capture(id, ack) {
                        self.acknowledgment = Some(ack);
                    }
                }
            }
        }
    }

    fn spawn_permission(&self, id: SessionId, check: BoxFuture<'static, PermissionState>) {
        let tx = self.completions_tx.clone();
        self.runtime.spawn(async move {
            let state = check.await;
            // Receiver gone means the app is exiting
            let _ = tx.send(Completion::Permission(id, state));
        });
    }

    fn handle_key(&mut self, code: KeyCode) {
        // Modal acknowledgment swallows keys until dismissed
        if self.acknowledgment.is_some() {
            if matches!(code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.acknowledgment = None;
            }
            return;
        }

        let Some(session) = self.session.as_mut() else {
            match code {
                KeyCode::Char('o') | KeyCode::Enter => self.open_session(),
                KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
                _ => {}
            }
            return;
        };

        match code {
            KeyCode::Char('p') | KeyCode::Char('c') | KeyCode::Char(' ') => {
                let id = session.id();
                if let Some(capture) = session.begin_capture() {
                    let tx = self.completions_tx.clone();
                    self.runtime.spawn(async move {
                        let ack = capture.await;
                        let _ = tx.send(Completion::Capture(id, ack));
                    });
                }
            }
            KeyCode::Char('r') => {
                let id = session.id();
                if let Some(check) = session.request_permission() {
                    self.spawn_permission(id, check);
                }
            }
            KeyCode::Char('x') | KeyCode::Esc => self.close_session(),
            KeyCode::Char('q') => {
                self.close_session();
                self.quit = true;
            }
            _ => {}
        }
    }

    fn open_session(&mut self) {
        let Some(id) = self.shell.open() else {
            return;
        };
        let (session, check) = CaptureSession::mount(id, self.options, self.deps.clone());
        self.session = Some(session);
        self.spawn_permission(id, check);
    }

    fn close_session(&mut self) {
        if let Some(session) = self.session.as_mut() {
            let shell = &mut self.shell;
            session.close(|| shell.session_closed());
        }
        if !self.shell.session_visible() {
            self.session = None;
            info!("Capture session unmounted");
        }
    }

    fn draw(&self, area: Rect, buf: &mut Buffer) {
        // Reserve bottom line for status
        let main_area = Rect {
            height: area.height.saturating_sub(1),
            ..area
        };
        let status_area = Rect {
            y: area.y + area.height.saturating_sub(1),
            height: 1,
            ..area
        };

        let view = self.session.as_ref().map(|s| s.view());
        let status = match view {
            None => {
                let text = format!("{}\n\n{}", fl!("shell-heading"), fl!("shell-subheading"));
                centered_text(&text, main_area, buf);
                key_hints(&[("o", fl!("open-camera")), ("q", fl!("quit"))])
            }
            Some(SessionView::PermissionNeeded { state, requesting }) => {
                let text = match (requesting, state) {
                    (true, _) => fl!("permission-requesting"),
                    (false, PermissionState::Denied) => fl!("permission-denied"),
                    (false, PermissionState::Restricted) => fl!("permission-restricted"),
                    (false, _) => fl!("permission-missing"),
                };
                centered_text(&text, main_area, buf);
                key_hints(&[
                    ("r", fl!("permission-request")),
                    ("x", fl!("close")),
                    ("q", fl!("quit")),
                ])
            }
            Some(SessionView::NoDevice) => {
                centered_text(&fl!("no-device"), main_area, buf);
                key_hints(&[("x", fl!("close")), ("q", fl!("quit"))])
            }
            Some(SessionView::Closed) => String::new(),
            Some(SessionView::Live { capturing }) => {
                let frame_widget = FrameWidget {
                    frame: self.session.as_ref().and_then(|s| s.latest_frame()),
                };
                (&frame_widget).render(main_area, buf);
                if capturing {
                    fl!("capturing")
                } else {
                    key_hints(&[
                        ("p", fl!("take-photo")),
                        ("x", fl!("close")),
                        ("q", fl!("quit")),
                    ])
                }
            }
        };

        StatusBar { message: &status }.render(status_area, buf);

        if let Some(ack) = &self.acknowledgment {
            AckPopup { ack }.render(main_area, buf);
        }
    }
}

/// Status line such as `'x' Close | 'q' Quit`
fn key_hints(hints: &[(&str, String)]) -> String {
    hints
        .iter()
        .map(|(key, label)| format!("'{}' {}", key, label))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn centered_text(text: &str, area: Rect, buf: &mut Buffer) {
    let lines = text.lines().count() as u16;
    let inner = Rect {
        y: area.y + area.height.saturating_sub(lines) / 2,
        height: lines.min(area.height),
        ..area
    };
    Paragraph::new(text)
        .alignment(Alignment::Center)
        .render(inner, buf);
}

/// Widget that renders a camera frame using half-block characters
struct FrameWidget {
    frame: Option<Arc<CameraFrame>>,
}

impl Widget for &FrameWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(frame) = &self.frame else {
            centered_text(&fl!("waiting-for-camera"), area, buf);
            return;
        };
        if frame.width == 0 || frame.height == 0 || area.width == 0 || area.height == 0 {
            return;
        }

        // Each terminal cell displays 2 vertical pixels using half-block characters
        let frame_aspect = frame.width as f64 / frame.height as f64;
        let term_width = area.width as f64;
        let term_height = (area.height * 2) as f64;

        let (display_width, display_height) = if term_width / term_height > frame_aspect {
            // Terminal is wider - fit to height
            let w = term_height * frame_aspect;
            (w as u16, (term_height / 2.0) as u16)
        } else {
            // Terminal is taller - fit to width
            let h = term_width / frame_aspect;
            (term_width as u16, (h / 2.0) as u16)
        };
        if display_width == 0 || display_height == 0 {
            return;
        }

        let x_offset = area.x + (area.width.saturating_sub(display_width)) / 2;
        let y_offset = area.y + (area.height.saturating_sub(display_height)) / 2;

        let x_scale = frame.width as f64 / display_width as f64;
        let y_scale = frame.height as f64 / (display_height * 2) as f64;

        for ty in 0..display_height {
            for tx in 0..display_width {
                let src_x = (tx as f64 * x_scale) as u32;
                let src_y_top = (ty as f64 * 2.0 * y_scale) as u32;
                let src_y_bottom = ((ty as f64 * 2.0 + 1.0) * y_scale) as u32;

                let (r, g, b) = frame.pixel_rgb(src_x, src_y_top);
                let top = Color::Rgb(r, g, b);
                let (r, g, b) = frame.pixel_rgb(src_x, src_y_bottom);
                let bottom = Color::Rgb(r, g, b);

                if let Some(cell) = buf.cell_mut((x_offset + tx, y_offset + ty)) {
                    cell.set_char('▀');
                    cell.set_fg(top);
                    cell.set_bg(bottom);
                }
            }
        }
    }
}

/// Modal acknowledgment box
struct AckPopup<'a> {
    ack: &'a Acknowledgment,
}

impl Widget for AckPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (title, body, color) = match self.ack {
            Acknowledgment::Saved(path) => (
                fl!("photo-saved-title"),
                format!("{}\n{}", fl!("photo-saved-body"), path.display()),
                Color::Green,
            ),
            Acknowledgment::Failed(err) => (
                fl!("photo-failed-title"),
                format!("{}\n{}", fl!("photo-failed-body"), err),
                Color::Red,
            ),
        };

        let width = area.width.min(60);
        let height = area.height.min(7);
        let popup = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        };

        Clear.render(popup, buf);
        Paragraph::new(format!("{}\n\n[Enter] {}", body, fl!("ok")))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(format!(" {} ", title))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            )
            .render(popup, buf);
    }
}

/// Status bar widget
struct StatusBar<'a> {
    message: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default().fg(Color::White).bg(Color::DarkGray);
        buf.set_style(area, style);

        let text: String = self.message.chars().take(area.width as usize).collect();
        buf.set_string(area.x, area.y, text, style);
    }
}
