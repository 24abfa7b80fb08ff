/// Scheme prefixes a link must start with before it is handed to yt-dlp.
const ACCEPTED_PREFIXES: [&str; 2] = ["http://", "https://"];

/// Returns true when `link` starts with an accepted scheme prefix.
///
/// Only the prefix is checked; anything past it is left for yt-dlp to reject.
pub fn is_valid_link(link: &str) -> bool {
    ACCEPTED_PREFIXES
        .iter()
        .any(|prefix| link.starts_with(prefix))
}
