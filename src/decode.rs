//! Declared-encoding byte decoding, grounded on the crawler's own
//! `encoding_rs::Encoding::for_label` + `.decode()` pairing (see
//! `page::get_charset_from_content_type` in the crate's web-crawling
//! lineage) rather than a hard-failing `String::from_utf8`.

use encoding_rs::Encoding;

/// Decodes `body` under `declared_encoding`, falling back to UTF-8 with
/// replacement characters when the label is missing or unrecognized.
/// Returns the decoded text alongside the encoding actually used, since the
/// resolver needs it again to percent-encode query strings the same way
/// the source page was authored in (§4.4 of the crate's design notes).
pub(crate) fn decode_body(
    body: &[u8],
    declared_encoding: Option<&str>,
) -> (String, &'static Encoding) {
    let encoding = declared_encoding
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or_else(|| {
            if let Some(label) = declared_encoding {
                log::debug!("unrecognized encoding label {:?}, falling back to utf-8", label);
            }
            encoding_rs::UTF_8
        });

    let (decoded, _, had_errors) = encoding.decode(body);
    if had_errors {
        log::trace!("decode error recovered with replacement characters");
    }

    (decoded.into_owned(), encoding)
}
