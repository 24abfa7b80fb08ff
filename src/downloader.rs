use std::{
    fmt::Display,
    future::Future,
    path::{Path, PathBuf},
    process::Stdio,
};
use tokio::{
    io::{AsyncBufReadExt, AsyncReadExt, BufReader},
    process::Command,
};
use tracing::{debug, warn};

use crate::{
    error::ExtractorError,
    model::{DownloadRequest, FormatDescriptor, ProbeDocument, ProgressEvent},
    progress::{parse_progress_from_line, progress_template},
};

/// The media-extraction backend: lists formats and downloads one of them.
pub trait MediaExtractor: Send + Sync + 'static {
    /// Metadata-only probe; nothing is downloaded.
    fn probe(
        &self,
        link: &str,
    ) -> impl Future<Output = Result<Vec<FormatDescriptor>, ExtractorError>>;

    /// Downloads `request.format_id`, calling `on_progress` for each report.
    fn download<F>(
        &self,
        request: &DownloadRequest,
        on_progress: F,
    ) -> impl Future<Output = Result<(), ExtractorError>>
    where
        F: FnMut(ProgressEvent);
}

/// Default program name for the current platform
pub fn default_program() -> PathBuf {
    let bin = if cfg!(target_os = "windows") { "yt-dlp.exe" } else { "yt-dlp" };
    PathBuf::from(bin)
}

/// Runs the `yt-dlp` executable as a child process.
#[derive(Debug, Clone)]
pub struct YtDlp {
    program: PathBuf,
}

impl YtDlp {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self, args: &[String]) -> Command {
        debug!(program = %self.program.display(), ?args, "running yt-dlp");
        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    fn spawn_error(&self, source: std::io::Error) -> ExtractorError {
        ExtractorError::Spawn {
            program: self.program.display().to_string(),
            source,
        }
    }
}

impl MediaExtractor for YtDlp {
    async fn probe(&self, link: &str) -> Result<Vec<FormatDescriptor>, ExtractorError> {
        let output = self
            .command(&probe_args(link))
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractorError::Failed(failure_message(&stderr, output.status)));
        }
        parse_probe(&output.stdout)
    }

    async fn download<F>(
        &self,
        request: &DownloadRequest,
        mut on_progress: F,
    ) -> Result<(), ExtractorError>
    where
        F: FnMut(ProgressEvent),
    {
        let mut child = self
            .command(&download_args(request))
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let stdout = child.stdout.take().ok_or(ExtractorError::MissingPipe("stdout"))?;
        let mut stderr = child.stderr.take().ok_or(ExtractorError::MissingPipe("stderr"))?;

        // stderr is drained alongside stdout so neither pipe can fill up and stall yt-dlp
        let pump = async {
            let mut lines = BufReader::new(stdout).split(b'\n');
            while let Some(raw) = lines.next_segment().await? {
                let line = String::from_utf8_lossy(&raw);
                match parse_progress_from_line(&line) {
                    Some(event) => on_progress(event),
                    None => debug!(line = %line.trim_end(), "yt-dlp"),
                }
            }
            Ok::<_, std::io::Error>(())
        };
        let drain = async {
            let mut buf = Vec::new();
            stderr.read_to_end(&mut buf).await.map(|_| buf)
        };
        let (pumped, drained) = tokio::join!(pump, drain);
        pumped?;
        let stderr = drained?;

        let status = child.wait().await?;
        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr);
            warn!(%status, "yt-dlp download failed");
            return Err(ExtractorError::Failed(failure_message(&stderr, status)));
        }
        Ok(())
    }
}

/// Arguments for a metadata-only probe of `link`
pub fn probe_args(link: &str) -> Vec<String> {
    vec![
        "--dump-single-json".to_owned(),
        "--flat-playlist".to_owned(),
        "--no-warnings".to_owned(),
        link.to_owned(),
    ]
}

/// Arguments for downloading exactly one item of `request.link`
pub fn download_args(request: &DownloadRequest) -> Vec<String> {
    vec![
        "-f".to_owned(),
        request.format_id.clone(),
        "-o".to_owned(),
        request.output_template.clone(),
        "--no-playlist".to_owned(),
        "--newline".to_owned(),
        "--progress-template".to_owned(),
        progress_template(),
        request.link.clone(),
    ]
}

/// Output template that names files by title and extension inside `dir`
pub fn output_template(dir: &Path) -> String {
    dir.join("%(title)s.%(ext)s").to_string_lossy().into_owned()
}

/// Decodes the `formats` list of a probe document; no list means no formats.
pub fn parse_probe(stdout: &[u8]) -> Result<Vec<FormatDescriptor>, ExtractorError> {
    let doc: ProbeDocument = serde_json::from_slice(stdout)?;
    Ok(doc.formats.unwrap_or_default())
}

/// Last non-empty stderr line, which is where yt-dlp puts its `ERROR:` text.
pub fn failure_message(stderr: &str, status: impl Display) -> String {
    stderr
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| format!("yt-dlp exited with {status}"))
}


#[cfg(all(test, unix))]
mod child_process_tests {
    use super::*;
    use std::{fs, os::unix::fs::PermissionsExt};

    // Stands in for yt-dlp: answers the probe, and for downloads prints
    // progress around noise, then fails when asked for format "bad".
    const FAKE_YT_DLP: &str = r#"#!/bin/sh
if [ "$1" = "--dump-single-json" ]; then
    echo '{"formats": [{"format_id": "22", "height": 720, "fps": 30, "vcodec": "vp9"}]}'
    exit 0
fi
echo '[download] Destination: clip.webm'
echo 'grabber-progress:{"status": "downloading", "downloaded_bytes": 50, "total_bytes": 200}'
printf '\377\376 not utf-8\n'
echo 'grabber-progress:{"status": "finished", "downloaded_bytes": 200, "total_bytes": 200}'
if [ "$2" = "bad" ]; then
    echo 'WARNING: something minor' >&2
    echo 'ERROR: boom' >&2
    exit 1
fi
exit 0
"#;

    fn request(format_id: &str) -> DownloadRequest {
        DownloadRequest {
            link: "https://example.com/watch?v=abc".to_owned(),
            format_id: format_id.to_owned(),
            output_template: "%(title)s.%(ext)s".to_owned(),
        }
    }

    // One test drives every case so no other thread forks while the script
    // is still open for writing.
    #[tokio::test]
    async fn drives_a_real_child_process() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("yt-dlp");
        fs::write(&script, FAKE_YT_DLP).unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        let ytdlp = YtDlp::new(&script);

        let formats = ytdlp.probe("https://example.com/watch?v=abc").await.unwrap();
        assert_eq!(formats.len(), 1);
        assert_eq!(formats[0].format_id, "22");
        assert_eq!(formats[0].height, Some(720.0));

        let mut events = Vec::new();
        ytdlp
            .download(&request("22"), |event| events.push(event))
            .await
            .unwrap();
        let statuses: Vec<_> = events.iter().map(|e| e.status.as_str()).collect();
        assert_eq!(statuses, ["downloading", "finished"]);
        assert_eq!(events[0].downloaded_bytes, Some(50.0));
        assert_eq!(events[0].total_bytes, Some(200.0));

        let mut seen = 0;
        let err = ytdlp
            .download(&request("bad"), |_| seen += 1)
            .await
            .unwrap_err();
        assert!(matches!(&err, ExtractorError::Failed(msg) if msg == "ERROR: boom"));
        assert_eq!(seen, 2);

        let missing = YtDlp::new("/nonexistent/yt-dlp");
        let err = missing
            .download(&request("22"), |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractorError::Spawn { .. }));
        assert!(err.to_string().starts_with("failed to launch /nonexistent/yt-dlp: "));

        let err = missing.probe("https://example.com").await.unwrap_err();
        assert!(matches!(err, ExtractorError::Spawn { .. }));
    }
}
