//! Built-in constant sets shared by the filter chain.

use phf::{phf_set, Set};

/// Schemes eligible for follow-up crawling. Anything else is silently dropped
/// by the filter chain regardless of `allow`/`deny` configuration.
pub static ALLOWED_SCHEMES: Set<&'static str> = phf_set! {
    "http",
    "https",
    "file",
    "ftp",
};

/// Default denied file extensions (archives, media, fonts, documents, binaries) —
/// the usual non-HTML assets a link extractor should not hand the crawler.
pub static DENY_EXTENSIONS: Set<&'static str> = phf_set! {
    "jpg", "jpeg", "png", "gif", "svg", "webp",
    "mp4", "avi", "mov", "wmv", "flv", "mpg", "qt",
    "mp3", "wav", "ogg", "mp2", "wma",
    "woff", "woff2", "ttf", "otf",
    "swf", "xap",
    "ico", "eot",
    "bmp", "tiff", "tif", "heic", "heif",
    "mkv", "webm", "m4v",
    "aac", "flac", "m4a", "aiff",
    "pdf", "eps", "rtf", "ps",
    "doc", "docx", "csv", "epub", "gz",
    "apng", "avif",
    "mid", "midi", "oga", "ogv", "ogx", "opus", "weba", "mpeg", "ts", "3gp", "3g2",
    "arc", "bin", "bz", "bz2", "jar", "mpkg", "rar", "tar", "zip", "7z", "7zip", "apk", "rm",
    "abw", "azw", "odt", "ods", "odp", "ppt", "pptx", "xls", "xlsx", "vsd",
    "css", "js",
};

/// Default tags the walker visits when no `tags` override is configured.
pub const DEFAULT_TAGS: &[&str] = &["a", "area"];

/// Default attributes the walker reads when no `attrs` override is configured.
pub const DEFAULT_ATTRS: &[&str] = &["href"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_schemes_contains_common() {
        assert!(ALLOWED_SCHEMES.contains("http"));
        assert!(ALLOWED_SCHEMES.contains("https"));
        assert!(!ALLOWED_SCHEMES.contains("javascript"));
        assert!(!ALLOWED_SCHEMES.contains("mailto"));
    }

    #[test]
    fn test_deny_extensions_contains_assets() {
        assert!(DENY_EXTENSIONS.contains("jpg"));
        assert!(DENY_EXTENSIONS.contains("pdf"));
        assert!(!DENY_EXTENSIONS.contains("html"));
    }
}
