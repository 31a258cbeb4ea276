//! Domain allow/deny suffix matching.
//!
//! Simpler than the crawler's own public-suffix-aware `parent_host_match`:
//! here a host matches a configured domain when it is that domain or any
//! dot-delimited subdomain of it, with no TLD-list awareness.

/// True when `host` equals `domain` or is a subdomain of it, comparing
/// dot-delimited labels from the right rather than doing a substring check
/// (`evilexample.com` must not match a configured `example.com`).
pub(crate) fn host_matches_domain(host: &str, domain: &str) -> bool {
    let host = host.trim_end_matches('.');
    let domain = domain.trim_end_matches('.');

    if domain.is_empty() {
        return false;
    }
    if host.eq_ignore_ascii_case(domain) {
        return true;
    }
    if host.len() > domain.len() {
        let suffix_start = host.len() - domain.len();
        if host.as_bytes()[suffix_start - 1] == b'.'
            && host[suffix_start..].eq_ignore_ascii_case(domain)
        {
            return true;
        }
    }
    false
}

/// True when `host` matches any domain in `domains`.
pub(crate) fn host_matches_any<'a, I>(host: &str, domains: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    domains.into_iter().any(|domain| host_matches_domain(host, domain))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(host_matches_domain("example.com", "example.com"));
    }

    #[test]
    fn test_subdomain_match() {
        assert!(host_matches_domain("www.example.com", "example.com"));
        assert!(host_matches_domain("a.b.example.com", "example.com"));
    }

    #[test]
    fn test_non_subdomain_suffix_rejected() {
        assert!(!host_matches_domain("evilexample.com", "example.com"));
        assert!(!host_matches_domain("notexample.com", "example.com"));
    }

    #[test]
    fn test_unrelated_domain_rejected() {
        assert!(!host_matches_domain("example.org", "example.com"));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(host_matches_domain("WWW.EXAMPLE.COM", "example.com"));
    }

    #[test]
    fn test_host_matches_any() {
        let domains = vec!["example.com", "example.org"];
        assert!(host_matches_any("sub.example.org", domains.iter().copied()));
        assert!(!host_matches_any("example.net", domains.iter().copied()));
    }
}
