//! Permissive HTML parsing, built on the real `scraper`/`html5ever` stack —
//! ill-formed markup never fails, it just parses to whatever DOM html5ever's
//! error-recovery rules produce.

use super::ElementLike;
use scraper::{ElementRef, Html};

/// Parses `body` as HTML. Always succeeds; html5ever's error recovery means
/// there is no ill-formed input that fails outright, only ones that parse
/// to an unexpected tree.
pub(crate) fn parse(body: &str) -> Html {
    Html::parse_document(body)
}

/// Returns the `href` of the first `<base>` element in the document, if any,
/// per HTML's "only the first base element's href counts" rule.
pub(crate) fn find_base_href(doc: &Html) -> Option<String> {
    lazy_static::lazy_static! {
        static ref BASE_SELECTOR: scraper::Selector =
            scraper::Selector::parse("base[href]").expect("static selector");
    }
    doc.select(&BASE_SELECTOR)
        .next()
        .and_then(|el| el.value().attr("href"))
        .map(|s| s.to_string())
}

impl<'a> ElementLike for ElementRef<'a> {
    fn tag_name(&self) -> &str {
        self.value().name()
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.value().attr(name)
    }

    fn element_children(&self) -> Vec<Self> {
        self.children().filter_map(ElementRef::wrap).collect()
    }

    fn self_and_descendants(&self) -> Vec<Self> {
        std::iter::once(*self)
            .chain(self.descendants().filter_map(ElementRef::wrap))
            .collect()
    }

    fn text_content(&self) -> String {
        self.text().collect::<String>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_permissive_on_malformed_markup() {
        let doc = parse("<html><body><p>unclosed<div>nested</p></div>");
        assert_eq!(doc.root_element().value().name(), "html");
    }

    #[test]
    fn test_find_base_href_present() {
        let doc = parse(
            r#"<html><head><base href="http://other.example/base/"></head><body></body></html>"#,
        );
        assert_eq!(
            find_base_href(&doc).as_deref(),
            Some("http://other.example/base/")
        );
    }

    #[test]
    fn test_find_base_href_absent() {
        let doc = parse("<html><head></head><body></body></html>");
        assert_eq!(find_base_href(&doc), None);
    }

    #[test]
    fn test_find_base_href_only_first_counts() {
        let doc = parse(
            r#"<html><head><base href="/one/"><base href="/two/"></head><body></body></html>"#,
        );
        assert_eq!(find_base_href(&doc).as_deref(), Some("/one/"));
    }
}
