use std::collections::HashMap;

use crate::model::FormatDescriptor;

/// Dropdown value shown before a format has been picked
pub const PLACEHOLDER: &str = "Select Format";

const SEPARATOR: &str = " - ";

/// Builds the short dropdown label for one format, e.g. `720p - 30fps - vp9`.
pub fn summarize(format: &FormatDescriptor) -> String {
    let resolution = match format.height {
        Some(height) if height > 0.0 => format!("{}p", format_number(height)),
        _ => "Audio Only".to_owned(),
    };
    let rate = match format.fps {
        Some(fps) if fps > 0.0 => format!("{}fps", format_number(fps)),
        _ => String::new(),
    };
    let codec = format.vcodec.as_deref().unwrap_or("N/A");

    [resolution.as_str(), rate.as_str(), codec]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(SEPARATOR)
        .trim_matches(|c: char| c == ' ' || c == '-')
        .to_owned()
}

// Whole numbers print without a fractional part.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as u64)
    } else {
        format!("{value}")
    }
}

/// Labels shown in the dropdown and the format ids they stand for.
///
/// The two halves are always rebuilt together so the dropdown never offers a
/// label the map cannot resolve.
#[derive(Debug, Default)]
pub struct FormatCatalog {
    labels: Vec<String>,
    ids: HashMap<String, String>,
}

impl FormatCatalog {
    /// Replaces the whole catalog with `formats`, in the order given.
    ///
    /// Formats that summarize to the same label collapse onto the last one.
    pub fn rebuild(&mut self, formats: &[FormatDescriptor]) {
        self.labels.clear();
        self.ids.clear();
        for format in formats {
            let label = summarize(format);
            self.ids.insert(label.clone(), format.format_id.clone());
            self.labels.push(label);
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn resolve(&self, label: &str) -> Option<&str> {
        self.ids.get(label).map(String::as_str)
    }

    /// Number of distinct labels that resolve to a format id
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(
        id: &str,
        height: Option<f64>,
        fps: Option<f64>,
        vcodec: Option<&str>,
    ) -> FormatDescriptor {
        FormatDescriptor {
            format_id: id.to_owned(),
            height,
            fps,
            vcodec: vcodec.map(str::to_owned),
        }
    }

    #[test]
    fn summarizes_a_video_format() {
        let f = format("22", Some(720.0), Some(30.0), Some("vp9"));
        assert_eq!(summarize(&f), "720p - 30fps - vp9");
    }

    #[test]
    fn audio_formats_skip_the_frame_rate() {
        let f = format("140", None, None, Some("none"));
        assert_eq!(summarize(&f), "Audio Only - none");
    }

    #[test]
    fn zero_height_and_rate_count_as_missing() {
        let f = format("1", Some(0.0), Some(0.0), Some("opus"));
        assert_eq!(summarize(&f), "Audio Only - opus");
    }

    #[test]
    fn missing_codec_reads_as_not_available() {
        let f = format("18", Some(360.0), Some(25.0), None);
        assert_eq!(summarize(&f), "360p - 25fps - N/A");
    }

    #[test]
    fn empty_codec_leaves_no_trailing_separator() {
        let f = format("18", Some(360.0), None, Some(""));
        assert_eq!(summarize(&f), "360p");
    }

    #[test]
    fn float_heights_print_like_integers() {
        let f = format("hls-1", Some(720.0), Some(30.0), Some("avc1"));
        assert_eq!(summarize(&f), "720p - 30fps - avc1");
    }

    #[test]
    fn fractional_rates_keep_their_decimals() {
        let f = format("299", Some(1080.0), Some(29.97), Some("avc1.64002a"));
        assert_eq!(summarize(&f), "1080p - 29.97fps - avc1.64002a");
    }

    #[test]
    fn rebuild_keeps_collaborator_order() {
        let mut catalog = FormatCatalog::default();
        catalog.rebuild(&[
            format("140", None, None, Some("none")),
            format("22", Some(720.0), Some(30.0), Some("vp9")),
            format("137", Some(1080.0), Some(30.0), Some("avc1")),
        ]);

        assert_eq!(
            catalog.labels(),
            ["Audio Only - none", "720p - 30fps - vp9", "1080p - 30fps - avc1"]
        );
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.resolve("720p - 30fps - vp9"), Some("22"));
        assert_eq!(catalog.resolve("1080p - 30fps - avc1"), Some("137"));
    }

    #[test]
    fn duplicate_labels_resolve_to_the_later_format() {
        let mut catalog = FormatCatalog::default();
        catalog.rebuild(&[
            format("247", Some(720.0), Some(30.0), Some("vp9")),
            format("302", Some(720.0), Some(30.0), Some("vp9")),
        ]);

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.resolve("720p - 30fps - vp9"), Some("302"));
    }

    #[test]
    fn rebuild_discards_the_previous_fetch() {
        let mut catalog = FormatCatalog::default();
        catalog.rebuild(&[format("22", Some(720.0), Some(30.0), Some("vp9"))]);
        catalog.rebuild(&[format("18", Some(360.0), Some(25.0), Some("avc1"))]);

        assert_eq!(catalog.labels(), ["360p - 25fps - avc1"]);
        assert_eq!(catalog.resolve("720p - 30fps - vp9"), None);
    }

    #[test]
    fn placeholder_never_resolves() {
        let mut catalog = FormatCatalog::default();
        catalog.rebuild(&[format("22", Some(720.0), Some(30.0), Some("vp9"))]);
        assert_eq!(catalog.resolve(PLACEHOLDER), None);
    }
}
