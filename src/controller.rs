//! UI-independent state and actions behind the downloader window

use std::{
    path::PathBuf,
    sync::Arc,
    thread::{self, JoinHandle},
};
use tokio::{
    runtime::Handle,
    sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender},
};
use tracing::{info, warn};

use crate::{
    downloader::{output_template, MediaExtractor},
    error::AppError,
    formats::{FormatCatalog, PLACEHOLDER},
    link::is_valid_link,
    model::DownloadRequest,
    progress::{report, ProgressUpdate},
};

/// How a status line should be coloured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Busy,
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub tone: Tone,
}

impl Status {
    fn busy(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            tone: Tone::Busy,
        }
    }

    fn success(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            tone: Tone::Success,
        }
    }

    fn failure(err: &AppError) -> Self {
        Self {
            text: err.to_string(),
            tone: Tone::Failure,
        }
    }
}

/// What the status line, percentage readout and progress bar show
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
    pub status: Status,
    pub percentage: String,
    pub bar: f32,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            status: Status {
                text: String::new(),
                tone: Tone::Neutral,
            },
            percentage: "0%".to_owned(),
            bar: 0.0,
        }
    }
}

/// Messages a download thread posts back to the UI thread
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerEvent {
    Status(Status),
    ResetProgress,
    Progress(ProgressUpdate),
}

/// Owns the link field, the format catalog and the display state.
///
/// Everything here lives on the UI thread. Download threads never touch it
/// directly; they post [`WorkerEvent`]s that [`Controller::pump_events`]
/// applies in arrival order, so the last message wins.
pub struct Controller<E: MediaExtractor> {
    extractor: Arc<E>,
    runtime: Handle,
    output_dir: PathBuf,
    link: String,
    selected: String,
    catalog: FormatCatalog,
    display: DisplayState,
    events_tx: UnboundedSender<WorkerEvent>,
    events_rx: UnboundedReceiver<WorkerEvent>,
}

impl<E: MediaExtractor> Controller<E> {
    pub fn new(extractor: E, runtime: Handle, output_dir: PathBuf) -> Self {
        let (events_tx, events_rx) = unbounded_channel();
        Self {
            extractor: Arc::new(extractor),
            runtime,
            output_dir,
            link: String::new(),
            selected: PLACEHOLDER.to_owned(),
            catalog: FormatCatalog::default(),
            display: DisplayState::default(),
            events_tx,
            events_rx,
        }
    }

    pub fn link_mut(&mut self) -> &mut String {
        &mut self.link
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    /// Dropdown options together with the selection they write into
    pub fn format_picker(&mut self) -> (&[String], &mut String) {
        (self.catalog.labels(), &mut self.selected)
    }

    pub fn catalog(&self) -> &FormatCatalog {
        &self.catalog
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// Probes the current link and repopulates the dropdown.
    ///
    /// Blocks the calling thread until yt-dlp answers.
    pub fn fetch_formats(&mut self) {
        if let Err(err) = self.try_fetch_formats() {
            warn!(error = %err, "format fetch failed");
            self.display.status = Status::failure(&err);
        }
    }

    fn try_fetch_formats(&mut self) -> Result<(), AppError> {
        let link = self.link.trim().to_owned();
        if !is_valid_link(&link) {
            return Err(AppError::InvalidLink);
        }

        self.display.status = Status::busy("Fetching Formats...");
        info!(%link, "fetching formats");
        let formats = self.runtime.block_on(self.extractor.probe(&link))?;

        self.catalog.rebuild(&formats);
        self.selected = PLACEHOLDER.to_owned();
        info!(
            formats = formats.len(),
            labels = self.catalog.len(),
            "formats fetched"
        );
        self.display.status = Status::success("Formats Fetched!");
        Ok(())
    }

    /// Starts downloading the selected format on a new background thread.
    ///
    /// Link and selection are captured now; validation and every status
    /// change happen on the worker and reach the UI through the event channel.
    /// Returns `None` only if the thread could not be spawned.
    pub fn start_download(&mut self) -> Option<JoinHandle<()>> {
        let job = DownloadJob {
            link: self.link.trim().to_owned(),
            format_id: self.catalog.resolve(&self.selected).map(str::to_owned),
            output_template: output_template(&self.output_dir),
        };
        let extractor = Arc::clone(&self.extractor);
        let runtime = self.runtime.clone();
        let events = self.events_tx.clone();

        let spawned = thread::Builder::new()
            .name("download".to_owned())
            .spawn(move || job.run(extractor.as_ref(), &runtime, &events));

        match spawned {
            Ok(handle) => Some(handle),
            Err(source) => {
                let err = AppError::Worker(source);
                warn!(error = %err, "download thread failed to start");
                self.display.status = Status::failure(&err);
                None
            }
        }
    }

    /// Applies every queued worker message; returns how many were applied.
    pub fn pump_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                WorkerEvent::Status(status) => self.display.status = status,
                WorkerEvent::ResetProgress => {
                    self.display.percentage = "0%".to_owned();
                    self.display.bar = 0.0;
                }
                WorkerEvent::Progress(update) => {
                    self.display.percentage = update.readout();
                    self.display.bar = update.ratio();
                }
            }
            applied += 1;
        }
        applied
    }
}

/// A download captured at click time, run on its own thread
struct DownloadJob {
    link: String,
    format_id: Option<String>,
    output_template: String,
}

impl DownloadJob {
    fn run<E: MediaExtractor>(
        self,
        extractor: &E,
        runtime: &Handle,
        events: &UnboundedSender<WorkerEvent>,
    ) {
        let post = |event| {
            // The receiver only goes away when the window closes
            let _ = events.send(event);
        };

        let request = match self.into_request() {
            Ok(request) => request,
            Err(err) => {
                warn!(error = %err, "download rejected");
                post(WorkerEvent::Status(Status::failure(&err)));
                return;
            }
        };

        post(WorkerEvent::ResetProgress);
        post(WorkerEvent::Status(Status::busy("Downloading...")));
        info!(link = %request.link, format = %request.format_id, "download started");

        let result = runtime.block_on(extractor.download(&request, |event| {
            if let Some(update) = report(&event) {
                post(WorkerEvent::Progress(update));
            }
        }));

        match result {
            Ok(()) => {
                info!(link = %request.link, "download finished");
                post(WorkerEvent::Status(Status::success("Downloaded!")));
            }
            Err(err) => {
                let err = AppError::from(err);
                warn!(link = %request.link, error = %err, "download failed");
                post(WorkerEvent::Status(Status::failure(&err)));
            }
        }
    }

    fn into_request(self) -> Result<DownloadRequest, AppError> {
        if !is_valid_link(&self.link) {
            return Err(AppError::InvalidLink);
        }
        let format_id = self.format_id.ok_or(AppError::NoFormatSelected)?;
        Ok(DownloadRequest {
            link: self.link,
            format_id,
            output_template: self.output_template,
        })
    }
}
