//! Pure metadata derivation from a URL string.
//!
//! Nothing in here fails: unparseable input degrades to the `"unknown"`
//! domain, the [`FileType::Link`] category or no filename.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use url::Url;

/// Domain reported for URLs without a parseable host.
pub const UNKNOWN_DOMAIN: &str = "unknown";

/// Path signature of publicly readable Supabase storage objects.
const STORAGE_PROVIDER_SIGNATURE: &str = "supabase.co/storage/v1/object/public";

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg", "bmp", "ico"];
const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "txt", "rtf", "odt"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "webm", "flv"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "flac", "aac", "ogg"];
const ARCHIVE_EXTENSIONS: &[&str] = &["zip", "rar", "7z", "tar", "gz"];
const SOFTWARE_EXTENSIONS: &[&str] = &["exe", "msi", "dmg", "pkg", "deb", "rpm"];
const WEBPAGE_EXTENSIONS: &[&str] = &["html", "htm", "php", "asp", "jsp"];

const VIDEO_DOMAINS: &[&str] = &["youtube.com", "vimeo.com", "dailymotion.com"];
const AUDIO_DOMAINS: &[&str] = &["soundcloud.com", "spotify.com"];
const CODE_DOMAINS: &[&str] = &["github.com", "gitlab.com", "bitbucket.org"];

static TIMESTAMP_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[_-]\d{10,}").expect("timestamp pattern is valid"));

/// Coarse content category of the resource a URL points at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Image,
    Document,
    Video,
    Audio,
    Archive,
    Software,
    Webpage,
    Code,
    #[default]
    Link,
}

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Image => "image",
            FileType::Document => "document",
            FileType::Video => "video",
            FileType::Audio => "audio",
            FileType::Archive => "archive",
            FileType::Software => "software",
            FileType::Webpage => "webpage",
            FileType::Code => "code",
            FileType::Link => "link",
        }
    }

    fn from_extension(extension: &str) -> Option<Self> {
        let tables = [
            (IMAGE_EXTENSIONS, FileType::Image),
            (DOCUMENT_EXTENSIONS, FileType::Document),
            (VIDEO_EXTENSIONS, FileType::Video),
            (AUDIO_EXTENSIONS, FileType::Audio),
            (ARCHIVE_EXTENSIONS, FileType::Archive),
            (SOFTWARE_EXTENSIONS, FileType::Software),
            (WEBPAGE_EXTENSIONS, FileType::Webpage),
        ];

        tables
            .into_iter()
            .find(|(extensions, _)| extensions.contains(&extension))
            .map(|(_, file_type)| file_type)
    }

    fn from_domain(domain: &str) -> Option<Self> {
        let matches = |known: &[&str]| known.iter().any(|d| domain.contains(d));

        if matches(VIDEO_DOMAINS) {
            Some(FileType::Video)
        } else if matches(AUDIO_DOMAINS) {
            Some(FileType::Audio)
        } else if matches(CODE_DOMAINS) {
            Some(FileType::Code)
        } else {
            None
        }
    }
}

impl Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the host of `url`, or [`UNKNOWN_DOMAIN`] if there is none.
pub fn domain(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_owned))
        .unwrap_or_else(|| UNKNOWN_DOMAIN.to_string())
}

/// Categorizes `url` by path extension, then by well-known hosts.
pub fn file_type(url: &str) -> FileType {
    let Ok(parsed) = Url::parse(url) else {
        return FileType::Link;
    };

    let path = parsed.path().to_lowercase();
    let by_extension = path
        .rsplit_once('.')
        .and_then(|(_, extension)| FileType::from_extension(extension));

    by_extension
        .or_else(|| parsed.host_str().and_then(FileType::from_domain))
        .unwrap_or(FileType::Link)
}

/// True if `url` points into public Supabase object storage.
pub fn is_storage_provider_url(url: &str) -> bool {
    url.contains(STORAGE_PROVIDER_SIGNATURE)
}

/// Derives a slug-like name from the last path segment of `url`.
///
/// The extension and any `_`/`-` prefixed run of 10+ digits are dropped,
/// characters outside `[A-Za-z0-9_-]` removed, the result lower-cased with
/// underscores turned into hyphens. Returns `None` when nothing is left.
pub fn extract_filename(url: &str) -> Option<String> {
    let trimmed = url.trim_end_matches('|').trim_end_matches('/');
    let parsed = Url::parse(trimmed).ok()?;
    let filename = parsed.path().rsplit('/').next().unwrap_or_default();

    let stem = filename.split('.').next().unwrap_or_default();
    let stem = TIMESTAMP_TOKEN.replace_all(stem, "");

    let clean: String = stem
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .map(|c| if c == '_' { '-' } else { c.to_ascii_lowercase() })
        .collect();

    (!clean.is_empty()).then_some(clean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_of_valid_and_invalid_urls() {
        assert_eq!(domain("https://www.example.com/a/b"), "www.example.com");
        assert_eq!(domain("http://localhost:8080/x"), "localhost");
        assert_eq!(domain("not a url"), UNKNOWN_DOMAIN);
        assert_eq!(domain("mailto:someone@example.com"), UNKNOWN_DOMAIN);
    }

    #[test]
    fn file_type_by_extension() {
        assert_eq!(file_type("https://cdn.example.com/cat.PNG"), FileType::Image);
        assert_eq!(file_type("https://example.com/report.pdf"), FileType::Document);
        assert_eq!(file_type("https://example.com/clip.webm"), FileType::Video);
        assert_eq!(file_type("https://example.com/song.flac"), FileType::Audio);
        assert_eq!(file_type("https://example.com/backup.tar.gz"), FileType::Archive);
        assert_eq!(file_type("https://example.com/setup.exe"), FileType::Software);
        assert_eq!(file_type("https://example.com/index.html"), FileType::Webpage);
    }

    #[test]
    fn file_type_ignores_query_string() {
        assert_eq!(
            file_type("https://example.com/photo.jpg?size=large"),
            FileType::Image
        );
    }

    #[test]
    fn file_type_by_domain() {
        assert_eq!(file_type("https://www.youtube.com/watch?v=abc"), FileType::Video);
        assert_eq!(file_type("https://open.spotify.com/track/1"), FileType::Audio);
        assert_eq!(file_type("https://github.com/rust-lang/rust"), FileType::Code);
    }

    #[test]
    fn file_type_defaults_to_link() {
        assert_eq!(file_type("https://example.com/about"), FileType::Link);
        assert_eq!(file_type("garbage"), FileType::Link);
    }

    #[test]
    fn storage_provider_detection() {
        assert!(is_storage_provider_url(
            "https://abc.supabase.co/storage/v1/object/public/bucket/file.png"
        ));
        assert!(!is_storage_provider_url("https://abc.supabase.co/rest/v1/items"));
    }

    #[test]
    fn extract_filename_strips_extension_and_timestamps() {
        assert_eq!(
            extract_filename("https://example.com/files/Quarterly_Report_1714557600123.pdf"),
            Some("quarterly-report".to_string())
        );
        assert_eq!(
            extract_filename("https://example.com/files/report.final.pdf"),
            Some("report".to_string())
        );
    }

    #[test]
    fn extract_filename_keeps_short_numbers() {
        assert_eq!(
            extract_filename("https://example.com/release-2024.zip"),
            Some("release-2024".to_string())
        );
    }

    #[test]
    fn extract_filename_uses_last_segment_after_trailing_slash() {
        assert_eq!(
            extract_filename("https://example.com/docs/guide/"),
            Some("guide".to_string())
        );
        assert_eq!(
            extract_filename("https://example.com/docs/guide/|"),
            Some("guide".to_string())
        );
    }

    #[test]
    fn extract_filename_none_cases() {
        assert_eq!(extract_filename("https://example.com/"), None);
        assert_eq!(extract_filename("https://example.com"), None);
        assert_eq!(extract_filename("https://example.com/.hidden"), None);
        assert_eq!(extract_filename("::::"), None);
    }

    #[test]
    fn file_type_serializes_lowercase() {
        let json = serde_json::to_string(&FileType::Webpage).unwrap();
        assert_eq!(json, "\"webpage\"");
    }
}
