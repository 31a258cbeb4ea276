//! A small abstraction over the two tree shapes the decoder can produce —
//! a real `scraper` HTML tree, or a hand-rolled XML arena tree — so the
//! region selector and walker can traverse either without caring which.

pub(crate) mod html;
pub(crate) mod sxd;
pub(crate) mod xml;

/// Element-level operations the selector and walker need, implemented once
/// for `scraper::ElementRef` and once for [`xml::XmlElementRef`].
pub(crate) trait ElementLike: Copy {
    /// Tag/element name as read from the document. The `scraper`/html5ever
    /// backend always lowercases it, but the hand-rolled `xml`/`sxd`
    /// backends preserve source case (legal uppercase element names like
    /// `<A>` are valid XML/XHTML) — callers that need spec.md §4.3's
    /// "ASCII-lowercased" tag matching must fold case themselves rather
    /// than assume this is already lowercased; see `config.tags.contains`'s
    /// lookup in `walker.rs`, which does.
    fn tag_name(&self) -> &str;
    /// Attribute value lookup, exact attribute name.
    fn attr(&self, name: &str) -> Option<&str>;
    /// Direct element children (text nodes excluded).
    fn element_children(&self) -> Vec<Self>
    where
        Self: Sized;
    /// This element plus every element descendant, document order,
    /// self first — the node-set XPath's `//` axis walks.
    fn self_and_descendants(&self) -> Vec<Self>
    where
        Self: Sized;
    /// Concatenated text of every descendant text node, in document order.
    fn text_content(&self) -> String;
}

/// `rel` attribute tokenization shared by both tree backends: whitespace
/// split, case-insensitive `nofollow` token match.
pub(crate) fn has_nofollow_rel(rel_value: Option<&str>) -> bool {
    match rel_value {
        Some(rel) => rel
            .split_ascii_whitespace()
            .any(|token| token.eq_ignore_ascii_case("nofollow")),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nofollow_token_detected() {
        assert!(has_nofollow_rel(Some("external nofollow")));
        assert!(has_nofollow_rel(Some("NoFollow")));
    }

    #[test]
    fn test_nofollow_not_substring_matched() {
        assert!(!has_nofollow_rel(Some("blah")));
        assert!(!has_nofollow_rel(Some("nofollowed")));
    }

    #[test]
    fn test_no_rel_attribute() {
        assert!(!has_nofollow_rel(None));
    }
}
