use crate::model::ProgressEvent;

/// Prefix yt-dlp writes in front of every progress line we ask it for
pub const PROGRESS_MARKER: &str = "grabber-progress:";

/// `--progress-template` value making yt-dlp print each report as JSON
pub fn progress_template() -> String {
    format!("download:{PROGRESS_MARKER}%(progress)j")
}

/// Decodes a stdout line produced by [`progress_template`].
///
/// Lines without the marker, or with JSON we cannot read, are not progress.
pub fn parse_progress_from_line(line: &str) -> Option<ProgressEvent> {
    let payload = line.trim().strip_prefix(PROGRESS_MARKER)?;
    serde_json::from_str(payload.trim()).ok()
}

/// A percentage ready to be shown in the readout and the bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressUpdate {
    pub percent: f64,
}

impl ProgressUpdate {
    /// Readout text with two decimals, e.g. `25.00%`
    pub fn readout(&self) -> String {
        format!("{:.2}%", self.percent)
    }

    /// Bar fill between 0.0 and 1.0
    pub fn ratio(&self) -> f32 {
        (self.percent / 100.0).clamp(0.0, 1.0) as f32
    }
}

/// Turns a progress event into a display update.
///
/// Returns `None` unless the transfer is downloading and some positive total
/// is known; the exact total wins over yt-dlp's estimate.
pub fn report(event: &ProgressEvent) -> Option<ProgressUpdate> {
    if event.status != "downloading" {
        return None;
    }
    let total = event
        .total_bytes
        .filter(|total| *total > 0.0)
        .or(event.total_bytes_estimate)
        .filter(|total| *total > 0.0)?;
    let downloaded = event.downloaded_bytes.unwrap_or(0.0);
    Some(ProgressUpdate {
        percent: downloaded / total * 100.0,
    })
}
