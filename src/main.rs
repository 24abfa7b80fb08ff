//! Desktop front end for yt-dlp: list a link's formats, pick one, download it

// eframe window and widgets
mod app;
// Link field, format catalog and display state behind the window
mod controller;
// yt-dlp child-process driver
mod downloader;
mod error;
// Dropdown labels and the label -> format id map
mod formats;
mod link;
// Data decoded from yt-dlp
mod model;
// Progress line decoding and percentage maths
mod progress;
mod settings;

use std::sync::Arc;

use anyhow::{anyhow, Context};
use eframe::egui::{self, Visuals};
// OnceCell for single-time runtime initialization
use once_cell::sync::OnceCell;
use tokio::runtime::Runtime;
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::GrabberApp;
use controller::Controller;
use downloader::YtDlp;
use settings::Settings;

// Global Tokio runtime stored in a OnceCell for lazy init
static RUNTIME: OnceCell<Arc<Runtime>> = OnceCell::new();

/// Program entry point: initializes logging and the runtime, then launches the GUI
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let runtime = RUNTIME
        .get_or_try_init(|| Runtime::new().map(Arc::new))
        .context("failed to start the tokio runtime")?;
    let settings = Settings::load().context("failed to resolve the working directory")?;

    let extractor = YtDlp::new(settings.program.clone());
    info!(
        program = %extractor.program().display(),
        output_dir = %settings.output_dir.display(),
        "starting"
    );
    let controller = Controller::new(
        extractor,
        runtime.handle().clone(),
        settings.output_dir.clone(),
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(settings.window_size)
            .with_title(settings.window_title),
        ..Default::default()
    };
    let credit = settings.credit;
    eframe::run_native(
        settings.window_title,
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(Visuals::light());
            Box::new(GrabberApp::new(controller, credit))
        }),
    )
    .map_err(|e| anyhow!("window closed with an error: {e}"))
}
