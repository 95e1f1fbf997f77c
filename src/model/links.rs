//! Google Drive link helpers

use regex::Regex;
use std::sync::LazyLock;

static DRIVE_HOST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://(drive\.google\.com|docs\.google\.com)").unwrap()
});

static DRIVE_ANYWHERE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://.*google.*drive").unwrap());

static BARE_FILE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap());

/// Check whether a URL points at a Google Drive or Docs document
pub fn is_drive_link(url: &str) -> bool {
    let url = url.trim();
    if url.is_empty() {
        return false;
    }
    DRIVE_HOST.is_match(url) || DRIVE_ANYWHERE.is_match(url)
}

/// Turn a bare Drive file id into a shareable link; other input is only trimmed
pub fn format_drive_link(input: &str) -> String {
    let input = input.trim();
    if input.is_empty() {
        return String::new();
    }
    if BARE_FILE_ID.is_match(input) {
        return format!("https://drive.google.com/file/d/{}/view?usp=sharing", input);
    }
    input.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_drive_and_docs() {
        assert!(is_drive_link("https://drive.google.com/file/d/abc/view"));
        assert!(is_drive_link("  http://DOCS.google.com/document/d/xyz  "));
        assert!(is_drive_link("https://www.google.com/drive/folders/1"));
    }

    #[test]
    fn test_rejects_other_links() {
        assert!(!is_drive_link(""));
        assert!(!is_drive_link("https://dropbox.com/s/abc"));
        assert!(!is_drive_link("drive.google.com/file/d/abc"));
    }

    #[test]
    fn test_format_bare_file_id() {
        assert_eq!(
            format_drive_link("1aBcDe_Fg-H"),
            "https://drive.google.com/file/d/1aBcDe_Fg-H/view?usp=sharing"
        );
    }

    #[test]
    fn test_format_keeps_urls() {
        assert_eq!(
            format_drive_link(" https://drive.google.com/file/d/abc/view "),
            "https://drive.google.com/file/d/abc/view"
        );
        assert_eq!(format_drive_link("   "), "");
    }
}
