//! A third, XPath-only tree backend: a dedicated `sxd-document` parse of the
//! response body, used solely so `selector::xpath` can hand `sxd-xpath`
//! expressions to evaluate — the same pairing the teacher's `spider_utils`
//! uses for its own XPath selector map (`spider_utils::css_query_select_map`).
//! Region roots it yields are walked the same way as any other
//! [`ElementLike`] element; the HTML/XML backends remain the trees `restrict_css`
//! and the rest of the pipeline (base-href lookup, whole-document fallback)
//! run against.

use htmlentity::entity::{decode, ICodedDataTrait};
use regex::Regex;
use sxd_document::dom::{ChildOfElement, Element};
use sxd_document::parser;
use sxd_document::Package;

use super::ElementLike;

/// XML 1.0's five predefined entities — the only named references a strict
/// parser resolves without a DTD declaring them. Everything else (HTML5
/// named references like `&hearts;`/`&euro;`) trips `sxd-document`'s
/// well-formedness check (XML 1.0 §4.1 WFC: Entity Declared) unless
/// neutralized first.
fn is_xml_predefined_entity(name: &str) -> bool {
    matches!(name, "amp" | "lt" | "gt" | "quot" | "apos")
}

/// Rewrites HTML5 named character references that aren't among XML's five
/// predefined entities into numeric character references (`&#NNNN;`), which
/// `sxd-document` resolves without any declaration. Leaves `&amp;`-style
/// XML entities and existing `&#...;` numeric references untouched, so
/// already-well-formed markup round-trips unchanged. An entity name
/// `htmlentity` doesn't recognize is left as-is too — the parse will then
/// fail well-formedness exactly as before, same as any other malformed
/// input per this module's "`None` on any well-formedness error" contract.
///
/// Grounded on `cyrup-ai-kodegen-tools-citescrape`'s own
/// `htmlentity::entity::decode` usage for HTML5 entity decoding ahead of
/// markup reprocessing (`html_preprocessing/html_cleaning.rs`).
fn neutralize_html_named_entities(body: &str) -> std::borrow::Cow<'_, str> {
    lazy_static::lazy_static! {
        static ref NAMED_ENTITY: Regex = Regex::new(r"&([A-Za-z][A-Za-z0-9]*);").unwrap();
    }

    NAMED_ENTITY.replace_all(body, |caps: &regex::Captures| {
        let whole = &caps[0];
        let name = &caps[1];
        if is_xml_predefined_entity(name) {
            return whole.to_string();
        }
        match decode(whole.as_bytes()).to_string() {
            Ok(decoded) if decoded != whole => decoded
                .chars()
                .map(|c| format!("&#{};", c as u32))
                .collect::<String>(),
            _ => whole.to_string(),
        }
    })
}

/// Parses `body` as XML for `sxd-xpath` evaluation, first neutralizing any
/// HTML5 named entity `sxd-document` would otherwise reject as undeclared.
/// `None` on any well-formedness error — `restrict_xpaths` then contributes
/// no regions, mirroring `spider_utils`'s own
/// `if let Ok(package) = parser::parse(html)`.
pub(crate) fn parse(body: &str) -> Option<Package> {
    let neutralized = neutralize_html_named_entities(body);
    parser::parse(&neutralized).ok()
}

/// A handle into a [`Package`]'s `sxd-document` tree, cheap to copy.
#[derive(Clone, Copy)]
pub(crate) struct SxdElementRef<'d> {
    element: Element<'d>,
}

impl<'d> SxdElementRef<'d> {
    pub(crate) fn new(element: Element<'d>) -> Self {
        Self { element }
    }

    fn collect_text(&self, out: &mut String) {
        for child in self.element.children() {
            match child {
                ChildOfElement::Text(t) => out.push_str(t.text()),
                ChildOfElement::Element(e) => SxdElementRef::new(e).collect_text(out),
                _ => {}
            }
        }
    }
}

impl<'d> ElementLike for SxdElementRef<'d> {
    fn tag_name(&self) -> &str {
        self.element.name().local_part()
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.element.attribute_value(name)
    }

    fn element_children(&self) -> Vec<Self> {
        self.element
            .children()
            .into_iter()
            .filter_map(|c| c.element())
            .map(SxdElementRef::new)
            .collect()
    }

    fn self_and_descendants(&self) -> Vec<Self> {
        let mut out = vec![*self];
        for child in self.element_children() {
            out.extend(child.self_and_descendants());
        }
        out
    }

    fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed_xml() {
        let package = parse(r#"<root><a href="x">text</a></root>"#).unwrap();
        let document = package.as_document();
        let root = document
            .root()
            .children()
            .into_iter()
            .find_map(|c| c.element())
            .map(SxdElementRef::new)
            .unwrap();
        assert_eq!(root.tag_name(), "root");
        let children = root.element_children();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].tag_name(), "a");
        assert_eq!(children[0].attr("href"), Some("x"));
        assert_eq!(children[0].text_content(), "text");
    }

    #[test]
    fn test_ill_formed_xml_yields_no_package() {
        assert!(parse("<root><a></root>").is_none());
    }

    #[test]
    fn test_html5_named_entity_neutralized_into_numeric_reference() {
        let neutralized = neutralize_html_named_entities("<p>&hearts; &euro;</p>");
        assert_eq!(neutralized, "<p>&#9829; &#8364;</p>");
    }

    #[test]
    fn test_xml_predefined_entities_left_untouched() {
        let body = "<p>Q&amp;A &lt;tag&gt; &quot;x&quot; &apos;y&apos;</p>";
        assert_eq!(neutralize_html_named_entities(body), body);
    }

    #[test]
    fn test_numeric_references_left_untouched() {
        let body = "<p>&#160;&#x2665;</p>";
        assert_eq!(neutralize_html_named_entities(body), body);
    }

    #[test]
    fn test_html5_named_entity_document_parses_and_yields_decoded_text() {
        let package = parse(r#"<p>&hearts;</p>"#).expect("neutralized markup should parse");
        let document = package.as_document();
        let root = document
            .root()
            .children()
            .into_iter()
            .find_map(|c| c.element())
            .map(SxdElementRef::new)
            .unwrap();
        assert_eq!(root.text_content(), "\u{2665}");
    }

    #[test]
    fn test_unrecognized_entity_name_still_fails_well_formedness() {
        assert!(parse("<p>&notarealentity;</p>").is_none());
    }
}
