//! The filter chain: scheme, extension, allow/deny regex, domain, and
//! anchor-text gates applied to every resolved URL before it is emitted.

use crate::defaults::{ALLOWED_SCHEMES, DENY_EXTENSIONS};
use crate::domains::host_matches_any;
use hashbrown::HashSet;
use url::Url;

/// Compiled filtering rules, built once from an [`ExtractorConfig`](crate::config::ExtractorConfig)
/// and reused across extraction calls.
pub(crate) struct FilterChain {
    pub(crate) allow: Vec<regex::Regex>,
    pub(crate) deny: Vec<regex::Regex>,
    pub(crate) allow_domains: Vec<String>,
    pub(crate) deny_domains: Vec<String>,
    pub(crate) restrict_text: Vec<regex::Regex>,
    pub(crate) deny_extensions: HashSet<String>,
    pub(crate) uses_default_extensions: bool,
}

impl FilterChain {
    /// Builds the compiled filter chain from an [`ExtractorConfig`](crate::config::ExtractorConfig),
    /// done once in [`LinkExtractor::new`](crate::extractor::LinkExtractor::new)
    /// and reused across every `extract_links` call.
    pub(crate) fn from_config(config: &crate::config::ExtractorConfig) -> Self {
        FilterChain {
            allow: config.allow.clone(),
            deny: config.deny.clone(),
            allow_domains: config.allow_domains.iter().map(|d| d.to_string()).collect(),
            deny_domains: config.deny_domains.iter().map(|d| d.to_string()).collect(),
            restrict_text: config.restrict_text.clone(),
            deny_extensions: config
                .deny_extensions
                .as_ref()
                .map(|exts| exts.iter().map(|e| e.to_string()).collect())
                .unwrap_or_default(),
            uses_default_extensions: config.deny_extensions.is_none(),
        }
    }

    /// Scheme + extension + allow/deny URL + domain gates — the subset
    /// exposed publicly via `LinkExtractor::matches`. `fragment` is the
    /// resolved link's fragment (already split off of `url` itself), so
    /// `allow`/`deny` patterns written against a `#fragment` still see it.
    pub(crate) fn url_passes(&self, url: &Url, fragment: &str) -> bool {
        if !ALLOWED_SCHEMES.contains(url.scheme()) {
            return false;
        }

        if let Some(ext) = terminal_extension(url.path()) {
            let denied = if self.uses_default_extensions {
                DENY_EXTENSIONS.contains(ext.as_str())
            } else {
                self.deny_extensions.contains(&ext)
            };
            if denied {
                return false;
            }
        }

        let full = if fragment.is_empty() {
            url.as_str().to_string()
        } else {
            format!("{}#{}", url.as_str(), fragment)
        };
        let full = full.as_str();

        if !self.allow.is_empty() && !self.allow.iter().any(|re| re.is_match(full)) {
            return false;
        }

        if self.deny.iter().any(|re| re.is_match(full)) {
            return false;
        }

        if let Some(host) = url.host_str() {
            if !self.allow_domains.is_empty()
                && !host_matches_any(host, self.allow_domains.iter().map(String::as_str))
            {
                return false;
            }
            if host_matches_any(host, self.deny_domains.iter().map(String::as_str)) {
                return false;
            }
        } else if !self.allow_domains.is_empty() {
            return false;
        }

        true
    }

    /// Anchor-text restriction gate, applied after `url_passes`.
    pub(crate) fn text_passes(&self, text: &str) -> bool {
        self.restrict_text.is_empty() || self.restrict_text.iter().any(|re| re.is_match(text))
    }
}

/// Returns the lowercased terminal filename extension of `path` (the
/// characters after the last `.` in the final segment), if any.
fn terminal_extension(path: &str) -> Option<String> {
    let last_segment = path.rsplit('/').next().unwrap_or(path);
    let dot = last_segment.rfind('.')?;
    let ext = &last_segment[dot + 1..];
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> FilterChain {
        FilterChain {
            allow: vec![],
            deny: vec![],
            allow_domains: vec![],
            deny_domains: vec![],
            restrict_text: vec![],
            deny_extensions: HashSet::new(),
            uses_default_extensions: true,
        }
    }

    #[test]
    fn test_default_deny_extension_drops_image() {
        let c = chain();
        let url = Url::parse("http://example.org/photo.jpg").unwrap();
        assert!(!c.url_passes(&url, ""));
    }

    #[test]
    fn test_default_allows_html() {
        let c = chain();
        let url = Url::parse("http://example.org/page.html").unwrap();
        assert!(c.url_passes(&url, ""));
    }

    #[test]
    fn test_scheme_gate() {
        let c = chain();
        let url = Url::parse("javascript:void(0)").unwrap();
        assert!(!c.url_passes(&url, ""));
    }

    #[test]
    fn test_empty_deny_extensions_override_disables_check() {
        let mut c = chain();
        c.uses_default_extensions = false;
        let url = Url::parse("http://example.org/photo.jpg").unwrap();
        assert!(c.url_passes(&url, ""));
    }

    #[test]
    fn test_allow_regex_required() {
        let mut c = chain();
        c.allow = vec![regex::Regex::new("/keep/").unwrap()];
        assert!(!c.url_passes(&Url::parse("http://example.org/skip/x").unwrap(), ""));
        assert!(c.url_passes(&Url::parse("http://example.org/keep/x").unwrap(), ""));
    }

    #[test]
    fn test_deny_regex() {
        let mut c = chain();
        c.deny = vec![regex::Regex::new("drop").unwrap()];
        assert!(!c.url_passes(&Url::parse("http://example.org/dropme").unwrap(), ""));
    }

    #[test]
    fn test_allow_domains() {
        let mut c = chain();
        c.allow_domains = vec!["example.com".to_string()];
        assert!(c.url_passes(&Url::parse("http://sub.example.com/x").unwrap(), ""));
        assert!(!c.url_passes(&Url::parse("http://other.org/x").unwrap(), ""));
    }

    #[test]
    fn test_deny_domains() {
        let mut c = chain();
        c.deny_domains = vec!["blocked.com".to_string()];
        assert!(!c.url_passes(&Url::parse("http://blocked.com/x").unwrap(), ""));
    }

    #[test]
    fn test_allow_regex_matches_against_reappended_fragment() {
        let mut c = chain();
        c.allow = vec![regex::Regex::new(r"#section$").unwrap()];
        let url = Url::parse("http://example.org/page").unwrap();
        assert!(!c.url_passes(&url, ""));
        assert!(c.url_passes(&url, "section"));
    }

    #[test]
    fn test_deny_regex_matches_against_reappended_fragment() {
        let mut c = chain();
        c.deny = vec![regex::Regex::new(r"#drop$").unwrap()];
        let url = Url::parse("http://example.org/page").unwrap();
        assert!(c.url_passes(&url, ""));
        assert!(!c.url_passes(&url, "drop"));
    }

    #[test]
    fn test_restrict_text() {
        let mut c = chain();
        c.restrict_text = vec![regex::Regex::new("^keep$").unwrap()];
        assert!(c.text_passes("keep"));
        assert!(!c.text_passes("drop"));
    }
}
