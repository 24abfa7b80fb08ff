use serde::Deserialize;

/// One downloadable stream as reported by yt-dlp's metadata probe
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FormatDescriptor {
    /// Opaque identifier passed back to yt-dlp with `-f`
    pub format_id: String,
    /// Frame height in pixels; missing for audio-only streams. Some
    /// extractors report it as a float such as `720.0`.
    #[serde(default)]
    pub height: Option<f64>,
    /// Frames per second; yt-dlp reports either an integer or a float
    #[serde(default)]
    pub fps: Option<f64>,
    /// Video codec tag such as `vp9`, `avc1.64001F` or `none`
    #[serde(default)]
    pub vcodec: Option<String>,
}

/// The parts of `--dump-single-json` output this app reads
#[derive(Debug, Default, Deserialize)]
pub struct ProbeDocument {
    /// Absent for flat playlists and some generic pages
    #[serde(default)]
    pub formats: Option<Vec<FormatDescriptor>>,
}

/// A single progress report emitted by yt-dlp while a transfer runs.
///
/// Every counter is optional: yt-dlp omits `total_bytes` for streamed
/// formats and only sometimes provides an estimate instead.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProgressEvent {
    /// `downloading`, `finished` or `error`
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub downloaded_bytes: Option<f64>,
    #[serde(default)]
    pub total_bytes: Option<f64>,
    #[serde(default)]
    pub total_bytes_estimate: Option<f64>,
}

/// Everything the extractor needs to fetch one chosen format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub link: String,
    pub format_id: String,
    /// yt-dlp output template, e.g. `/home/me/%(title)s.%(ext)s`
    pub output_template: String,
}
