//! URL canonicalization: makes semantically equivalent URLs compare equal.
//!
//! Dot-segment resolution and default scheme/host lowercasing are already
//! handled by the `url` crate during parsing; this module adds the
//! normalizations it deliberately leaves alone — query parameter ordering
//! and percent-encoding case.

use url::Url;

/// Returns a default port for `scheme` the same way the `url` crate's own
/// `Url::port_or_known_default` would, so an explicit `:80` on an `http`
/// URL and no port at all compare equal.
fn is_default_port(scheme: &str, port: u16) -> bool {
    matches!(
        (scheme, port),
        ("http", 80) | ("https", 443) | ("ftp", 21)
    )
}

/// Uppercases the hex digits of every `%xx` escape in `s`, leaving
/// everything else untouched.
fn uppercase_percent_escapes(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let (h1, h2) = (bytes[i + 1], bytes[i + 2]);
            if h1.is_ascii_hexdigit() && h2.is_ascii_hexdigit() {
                out.push('%');
                out.push((h1 as char).to_ascii_uppercase());
                out.push((h2 as char).to_ascii_uppercase());
                i += 3;
                continue;
            }
        }
        out.push(bytes[i] as char);
        i += 1;
    }
    out
}

/// Canonicalizes `url` in place: lowercases scheme and host, strips a
/// redundant default port, sorts query parameters lexicographically by key
/// then value, and uppercases percent-encoding hex digits.
pub(crate) fn canonicalize(url: &Url) -> Url {
    let mut url = url.clone();

    let _ = url.set_scheme(&url.scheme().to_ascii_lowercase());

    if let Some(host) = url.host_str() {
        let lowered = host.to_ascii_lowercase();
        if lowered != host {
            let _ = url.set_host(Some(&lowered));
        }
    }

    if let Some(port) = url.port() {
        if is_default_port(url.scheme(), port) {
            let _ = url.set_port(None);
        }
    }

    if let Some(query) = url.query() {
        let mut pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        pairs.sort_by(|a, b| a.cmp(b));

        if !pairs.is_empty() {
            let new_query: String = {
                let mut serializer = url::form_urlencoded::Serializer::new(String::new());
                for (k, v) in &pairs {
                    serializer.append_pair(k, v);
                }
                serializer.finish()
            };
            url.set_query(Some(&new_query));
        } else if query.is_empty() {
            url.set_query(Some(""));
        }
    }

    let canonical_path = uppercase_percent_escapes(url.path());
    url.set_path(&canonical_path);

    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params_sorted() {
        let a = Url::parse("https://example.com/b?a=1&b=2").unwrap();
        let b = Url::parse("https://example.com/b?b=2&a=1").unwrap();
        assert_eq!(canonicalize(&a), canonicalize(&b));
    }

    #[test]
    fn test_default_port_stripped() {
        let url = Url::parse("http://example.com:80/path").unwrap();
        assert_eq!(canonicalize(&url).as_str(), "http://example.com/path");
    }

    #[test]
    fn test_non_default_port_kept() {
        let url = Url::parse("http://example.com:8080/path").unwrap();
        assert_eq!(canonicalize(&url).port(), Some(8080));
    }

    #[test]
    fn test_hex_escape_uppercased() {
        let url = Url::parse("http://example.com/%2f%e2%99%a5").unwrap();
        assert_eq!(canonicalize(&url).path(), "/%2F%E2%99%A5");
    }

    #[test]
    fn test_canonicalization_is_idempotent() {
        let url = Url::parse("http://example.com/b?b=2&a=1").unwrap();
        let once = canonicalize(&url);
        let twice = canonicalize(&once);
        assert_eq!(once, twice);
    }
}
