use std::{io, path::PathBuf};

use crate::downloader::default_program;

/// Fixed startup settings; the app has no config file and no flags
#[derive(Debug, Clone)]
pub struct Settings {
    /// yt-dlp executable, looked up on PATH
    pub program: PathBuf,
    /// Where downloads land
    pub output_dir: PathBuf,
    pub window_title: &'static str,
    pub window_size: [f32; 2],
    /// Credit line shown at the bottom of the window
    pub credit: &'static str,
}

impl Settings {
    /// Builds the settings, resolving the output directory to the current
    /// working directory at startup.
    pub fn load() -> io::Result<Self> {
        Ok(Self {
            program: default_program(),
            output_dir: std::env::current_dir()?,
            window_title: "YouTube Downloader",
            window_size: [800.0, 800.0],
            credit: concat!("yt-format-grabber ", env!("CARGO_PKG_VERSION")),
        })
    }
}
