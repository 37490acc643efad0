// SPDX-License-Identifier: GPL-3.0-only

use camroll::app::AppModel;
use camroll::backends::camera::CameraFacing;
use camroll::constants::ui;
use camroll::i18n;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

mod cli;

#[derive(Parser)]
#[command(name = "camroll")]
#[command(about = "Take a photo and save it to your gallery")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run in terminal mode (renders camera to terminal)
    Terminal {
        /// Camera to use: back, front, external or any (default: from settings)
        #[arg(short, long)]
        facing: Option<CameraFacing>,
    },

    /// List available cameras
    List,

    /// Take a photo
    Photo {
        /// Camera to use: back, front, external or any (default: from settings)
        #[arg(short, long)]
        facing: Option<CameraFacing>,

        /// Output file or directory (default: ~/Pictures/Camera/IMG_TIMESTAMP.jpg)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=camroll=debug, RUST_LOG=info
    // The terminal front-end owns stdout, so its logs go to a file instead
    let (writer, ansi) = match cli.command {
        Some(Commands::Terminal { .. }) => (camroll::terminal::log_writer(), false),
        _ => (BoxMakeWriter::new(std::io::stdout), true),
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true)
        .with_level(true)
        .init();

    match cli.command {
        Some(Commands::Terminal { facing }) => camroll::terminal::run(facing),
        Some(Commands::List) => cli::list_cameras(),
        Some(Commands::Photo { facing, output }) => cli::take_photo(facing, output),
        None => run_gui(),
    }
}

fn run_gui() -> Result<(), Box<dyn std::error::Error>> {
    // Get the system's preferred languages.
    let requested_languages = i18n_embed::DesktopLanguageRequester::requested_languages();

    // Enable localizations to be applied.
    i18n::init(&requested_languages);

    // Settings for configuring the application window and iced runtime.
    let settings = cosmic::app::Settings::default().size_limits(
        cosmic::iced::Limits::NONE
            .min_width(ui::MIN_WINDOW_WIDTH)
            .min_height(ui::MIN_WINDOW_HEIGHT),
    );

    cosmic::app::run::<AppModel>(settings, ())?;

    Ok(())
}
