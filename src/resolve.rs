//! Resolves a raw attribute value against an effective base URL, applying
//! idempotent, charset-aware percent-encoding.
//!
//! Grounded on the crawler's own `utils::abs::convert_abs_path`, but split
//! into its own pipeline stage: scheme filtering (e.g. `javascript:`,
//! `mailto:`) is left to the filter chain rather than special-cased here, so
//! the resolver only ever answers "what URL does this resolve to", never
//! "should we follow it".

use encoding_rs::Encoding;
use percent_encoding::percent_encode_byte;
use url::Url;

/// A URL resolved against a base, with its fragment split out.
pub(crate) struct ResolvedUrl {
    pub(crate) url: Url,
    pub(crate) fragment: String,
}

/// Characters left untouched in a path component (RFC 3986 `pchar` plus `/`).
fn is_path_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || "-_.~!$&'()*+,;=:@/".contains(c)
}

/// Characters left untouched in a query component.
fn is_query_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || "-_.~!$'()*+,;=:@/?".contains(c)
}

/// Percent-encodes `s`, preserving any already-valid `%XX` escape verbatim
/// (uppercasing its hex digits) and encoding every other non-safe character
/// into the bytes `encoding` produces for it.
fn percent_encode_component(s: &str, encoding: &'static Encoding, is_safe: fn(char) -> bool) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '%'
            && i + 2 < chars.len()
            && chars[i + 1].is_ascii_hexdigit()
            && chars[i + 2].is_ascii_hexdigit()
        {
            out.push('%');
            out.push(chars[i + 1].to_ascii_uppercase());
            out.push(chars[i + 2].to_ascii_uppercase());
            i += 3;
            continue;
        }
        if is_safe(c) {
            out.push(c);
            i += 1;
            continue;
        }
        let mut buf = [0u8; 4];
        let encoded_char = c.encode_utf8(&mut buf);
        let (bytes, _, _) = encoding.encode(encoded_char);
        for b in bytes.iter() {
            out.push_str(percent_encode_byte(*b));
        }
        i += 1;
    }
    out
}

/// Splits `raw` into `(before_fragment, fragment)` on the first unescaped `#`.
fn split_fragment(raw: &str) -> (&str, Option<&str>) {
    match raw.find('#') {
        Some(idx) => (&raw[..idx], Some(&raw[idx + 1..])),
        None => (raw, None),
    }
}

/// Splits `raw` into `(before_query, query)` on the first `?`.
fn split_query(raw: &str) -> (&str, Option<&str>) {
    match raw.find('?') {
        Some(idx) => (&raw[..idx], Some(&raw[idx + 1..])),
        None => (raw, None),
    }
}

/// Resolves `raw_value` against `base`, percent-encoding the path component
/// from its UTF-8 bytes and the query component from `query_encoding`'s
/// bytes, then splits off the fragment.
///
/// Returns `None` when `raw_value` is empty after trimming, or when the
/// resulting reference cannot be parsed as a URL at all.
pub(crate) fn resolve(
    raw_value: &str,
    base: &Url,
    query_encoding: &'static Encoding,
) -> Option<ResolvedUrl> {
    let trimmed = raw_value.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (before_hash, raw_fragment) = split_fragment(trimmed);
    let (before_query, raw_query) = split_query(before_hash);

    let mut reference = percent_encode_component(before_query, encoding_rs::UTF_8, is_path_safe);
    if let Some(q) = raw_query {
        reference.push('?');
        reference.push_str(&percent_encode_component(q, query_encoding, is_query_safe));
    }
    if let Some(frag) = raw_fragment {
        reference.push('#');
        reference.push_str(frag);
    }

    let joined = Url::options()
        .base_url(Some(base))
        .parse(&reference)
        .ok()?;

    let fragment = joined.fragment().unwrap_or("").to_string();
    let mut url = joined;
    url.set_fragment(None);

    Some(ResolvedUrl { url, fragment })
}
