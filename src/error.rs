use std::io;

use thiserror::Error;

/// Failures coming out of the yt-dlp child process
#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    /// yt-dlp ran and exited unsuccessfully; holds its own error line
    #[error("{0}")]
    Failed(String),
    #[error("yt-dlp {0} was not captured")]
    MissingPipe(&'static str),
    #[error("could not read yt-dlp output: {0}")]
    Io(#[from] io::Error),
    #[error("unexpected yt-dlp output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything an action can end with besides success.
///
/// The `Display` text is exactly what the status line shows.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid YouTube Link!")]
    InvalidLink,
    #[error("Select a valid format!")]
    NoFormatSelected,
    #[error("Error: {0}")]
    Extractor(#[from] ExtractorError),
    #[error("Error: could not start download thread: {0}")]
    Worker(#[source] io::Error),
}
