//! Region selection: narrows traversal to the subtrees named by
//! `restrict_css` and `restrict_xpaths`, or the whole document when neither
//! is configured.
//!
//! The two selector kinds run against different trees: `restrict_css` is
//! evaluated directly over the document's own HTML/XML backend tree via
//! [`ElementLike`], while `restrict_xpaths` is evaluated by `sxd-xpath`
//! against a dedicated `sxd-document` parse of the body (see
//! [`crate::dom::sxd`]) — the pairing the teacher's `spider_utils` crate
//! depends on. `extractor.rs` is what stitches both sets of region roots
//! together and walks each.

pub(crate) mod css;
pub(crate) mod xpath;

use crate::dom::ElementLike;

/// Returns the CSS-matched region roots for `css` against `root`, in
/// document order. A selector matching nothing contributes no roots, and
/// overlapping selectors are allowed to produce duplicate roots — the
/// Aggregator's dedup pass is what makes the final output unique, not this
/// step (scenario 2 in the test suite relies on duplicates surviving here).
pub(crate) fn select_css_regions<E: ElementLike + Copy>(root: E, css: &[String]) -> Vec<E> {
    let mut regions = Vec::new();
    for expr in css {
        match css::compile(expr) {
            Ok(compiled) => regions.extend(css::evaluate(&compiled, root)),
            Err(reason) => log::debug!("restrict_css {:?} failed to evaluate: {}", expr, reason),
        }
    }
    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::html;

    #[test]
    fn test_no_css_restriction_returns_no_regions() {
        let doc = html::parse("<html><body><p>a</p></body></html>");
        assert!(select_css_regions(doc.root_element(), &[]).is_empty());
    }

    #[test]
    fn test_css_regions_in_document_order() {
        let doc = html::parse(
            r#"<html><body><div id="x"><p>a</p></div><p class="y">b</p></body></html>"#,
        );
        let regions = select_css_regions(
            doc.root_element(),
            &["div#x".to_string(), "p.y".to_string()],
        );
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].tag_name(), "div");
        assert_eq!(regions[1].tag_name(), "p");
    }

    #[test]
    fn test_overlapping_css_selectors_preserve_duplicates() {
        let doc = html::parse("<html><body><p id=\"a\">x</p></body></html>");
        let regions = select_css_regions(
            doc.root_element(),
            &["p".to_string(), "#a".to_string()],
        );
        assert_eq!(regions.len(), 2);
    }

    #[test]
    fn test_selector_matching_nothing_contributes_no_regions() {
        let doc = html::parse("<html><body><p>a</p></body></html>");
        assert!(select_css_regions(doc.root_element(), &["section".to_string()]).is_empty());
    }
}
