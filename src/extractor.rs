//! The `LinkExtractor`: wires the decoder, region selector, walker,
//! resolver, filter chain, and aggregator into the single public entry
//! point, `extract_links`.

use hashbrown::HashSet;
use url::Url;

use crate::config::ExtractorConfig;
use crate::dom::{html, sxd, xml, ElementLike};
use crate::filter::FilterChain;
use crate::link::Link;
use crate::response::{DocumentKind, Response};
use crate::{canonical, decode, resolve, selector, walker};

/// Extracts and normalizes hyperlinks from a [`Response`] according to an
/// [`ExtractorConfig`]. Build one per config and reuse it across every
/// document — it holds no per-call state and is `Send + Sync`, safe to
/// share across worker threads fanning out extractions concurrently.
pub struct LinkExtractor {
    config: ExtractorConfig,
    filter: FilterChain,
}

impl LinkExtractor {
    /// Builds an extractor from a config, compiling its filter chain once.
    pub fn new(config: ExtractorConfig) -> Self {
        let filter = FilterChain::from_config(&config);
        Self { config, filter }
    }

    /// Extracts links from `response`, applying region selection, the
    /// walker, URL resolution, the filter chain, and the aggregator's
    /// optional canonicalization/dedup pass, in that order. Never panics or
    /// returns an error: malformed input simply yields fewer links.
    pub fn extract_links(&self, response: &Response) -> Vec<Link> {
        let source_url = match Url::parse(&response.url) {
            Ok(url) => url,
            Err(e) => {
                log::debug!("response url {:?} failed to parse: {}", response.url, e);
                return Vec::new();
            }
        };

        let (body, query_encoding) = decode::decode_body(&response.body, response.encoding.as_deref());

        let (raw_links, base) = match response.kind {
            DocumentKind::Html => {
                let doc = html::parse(&body);
                let base = effective_base_url(html::find_base_href(&doc), &source_url);
                let raw = self.collect_raw_links(doc.root_element(), &body);
                (raw, base)
            }
            DocumentKind::Xml => {
                let doc = xml::XmlDocument::parse(&body);
                match doc.root() {
                    Some(root) => {
                        let base = effective_base_url(doc.find_base_href(), &source_url);
                        let raw = self.collect_raw_links(root, &body);
                        (raw, base)
                    }
                    None => {
                        log::debug!(
                            "xml body from {:?} failed to parse; no links extracted",
                            response.url
                        );
                        (Vec::new(), source_url.clone())
                    }
                }
            }
        };

        self.aggregate(raw_links, &base, query_encoding)
    }

    /// Walks `restrict_xpaths` regions against a dedicated `sxd-document`
    /// parse of `body`, then `restrict_css` regions against `native_root`
    /// (the document's own HTML/XML backend tree), in that order — the
    /// `xpaths_given ++ css_given` region order SPEC_FULL.md (and spec.md
    /// §4.2) specifies. Falls back to walking the whole document when
    /// neither is configured.
    fn collect_raw_links<E: ElementLike + Copy>(
        &self,
        native_root: E,
        body: &str,
    ) -> Vec<walker::RawLink> {
        let mut raw = Vec::new();

        if !self.config.restrict_xpaths.is_empty() {
            match sxd::parse(body) {
                Some(package) => {
                    let document = package.as_document();
                    for expr in &self.config.restrict_xpaths {
                        match selector::xpath::evaluate(&document, expr) {
                            Ok(elements) => {
                                for el in elements {
                                    raw.extend(walker::walk(el, &self.config));
                                }
                            }
                            Err(reason) => log::debug!(
                                "restrict_xpaths {:?} failed to evaluate: {}",
                                expr,
                                reason
                            ),
                        }
                    }
                }
                None => log::debug!("body failed to parse as XML for restrict_xpaths evaluation"),
            }
        }

        let css_regions = selector::select_css_regions(native_root, &self.config.restrict_css);
        for region in css_regions {
            raw.extend(walker::walk(region, &self.config));
        }

        if self.config.restrict_css.is_empty() && self.config.restrict_xpaths.is_empty() {
            raw = walker::walk(native_root, &self.config);
        }

        raw
    }

    /// Resolves, filters, and optionally canonicalizes/dedups a batch of
    /// [`RawLink`](crate::walker::RawLink)s gathered from every region, in
    /// the order the walker produced them.
    fn aggregate(
        &self,
        raw_links: Vec<walker::RawLink>,
        base: &Url,
        query_encoding: &'static encoding_rs::Encoding,
    ) -> Vec<Link> {
        let mut out = Vec::with_capacity(raw_links.len());
        let mut seen: HashSet<String> = HashSet::new();

        for raw in raw_links {
            let Some(resolved) = resolve::resolve(&raw.value, base, query_encoding) else {
                log::trace!("dropped unresolvable href {:?}", raw.value);
                continue;
            };

            if !self.filter.url_passes(&resolved.url, &resolved.fragment) {
                continue;
            }
            if !self.filter.text_passes(&raw.text) {
                continue;
            }

            let url = if self.config.canonicalize {
                canonical::canonicalize(&resolved.url)
            } else {
                resolved.url
            };
            let url_string = url.to_string();

            if self.config.unique && !seen.insert(url_string.clone()) {
                continue;
            }

            out.push(Link::new(url_string, raw.text, resolved.fragment, raw.nofollow));
        }

        out
    }

    /// A pure predicate over the scheme/extension/allow/deny/domain subset
    /// of the filter chain, skipping anchor-text and `nofollow` concerns —
    /// lets a caller pre-check a URL without a document to extract from.
    pub fn matches(&self, url: &str) -> bool {
        match Url::parse(url) {
            Ok(mut parsed) => {
                let fragment = parsed.fragment().unwrap_or("").to_string();
                parsed.set_fragment(None);
                self.filter.url_passes(&parsed, &fragment)
            }
            Err(_) => false,
        }
    }
}

fn effective_base_url(base_href: Option<String>, source_url: &Url) -> Url {
    match base_href {
        Some(href) => match source_url.join(&href) {
            Ok(resolved) => resolved,
            Err(e) => {
                log::debug!("<base href={:?}> failed to resolve: {}", href, e);
                source_url.clone()
            }
        },
        None => source_url.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractorConfigBuilder;

    fn extractor() -> LinkExtractor {
        LinkExtractor::new(ExtractorConfigBuilder::new().build().unwrap())
    }

    #[test]
    fn test_scenario_1_duplicate_links_deduped() {
        let response = Response::new(
            "http://example.com/index",
            "<html><body><a href=\"/a\">a1</a><a href=\"/a\">a2</a></body></html>",
        );
        let links = extractor().extract_links(&response);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "http://example.com/a");
        assert_eq!(links[0].text, "a1");
    }

    #[test]
    fn test_scenario_2_unique_false_keeps_both() {
        let response = Response::new(
            "http://example.com/index",
            "<html><body><a href=\"/a\">a1</a><a href=\"/a\">a2</a></body></html>",
        );
        let config = ExtractorConfigBuilder::new().with_unique(false).build().unwrap();
        let links = LinkExtractor::new(config).extract_links(&response);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].text, "a1");
        assert_eq!(links[1].text, "a2");
    }

    #[test]
    fn test_scenario_3_canonicalize_dedups_reordered_query() {
        let response = Response::new(
            "https://example.com",
            "<html><body><a href=\"/b?a=1&b=2\">b1</a><a href=\"/b?b=2&a=1\">b2</a></body></html>",
        );
        let config = ExtractorConfigBuilder::new()
            .with_canonicalize(true)
            .build()
            .unwrap();
        let links = LinkExtractor::new(config).extract_links(&response);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://example.com/b?a=1&b=2");
        assert_eq!(links[0].text, "b1");
    }

    #[test]
    fn test_scenario_4_process_value_extracts_js_target() {
        let response = Response::new(
            "http://example.org/somepage/index.html",
            r#"<html><body><a href="javascript:goToPage('../other/page.html','photo'); return false">Text</a></body></html>"#,
        );
        let re = regex::Regex::new(r"javascript:goToPage\('(.*?)'").unwrap();
        let config = ExtractorConfigBuilder::new()
            .with_process_value(move |v: &str| {
                re.captures(v).map(|c| c[1].to_string())
            })
            .build()
            .unwrap();
        let links = LinkExtractor::new(config).extract_links(&response);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "http://example.org/other/page.html");
        assert_eq!(links[0].text, "Text");
    }

    #[test]
    fn test_scenario_5_default_deny_extensions_drops_image() {
        let response = Response::new(
            "http://example.org/",
            "<html><body><a href=\"photo.jpg\">x</a><a href=\"page.html\">y</a></body></html>",
        );
        let links = extractor().extract_links(&response);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "http://example.org/page.html");
        assert_eq!(links[0].text, "y");
    }

    #[test]
    fn test_scenario_6_entity_decoded_then_dual_encoded() {
        let response = Response::new(
            "http://example.org/somepage/index.html",
            "<html><body><p><a href=\"/&hearts;/you?c=&euro;\">text</a></p></body></html>",
        )
        .with_encoding("iso-8859-15");
        let config = ExtractorConfigBuilder::new()
            .with_restrict_xpaths("//p")
            .build()
            .unwrap();
        let links = LinkExtractor::new(config).extract_links(&response);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "http://example.org/%E2%99%A5/you?c=%A4");
        assert_eq!(links[0].text, "text");
    }

    #[test]
    fn test_base_href_overrides_resolution() {
        let response = Response::new(
            "http://example.com/somepage/",
            r#"<html><head><base href="http://otherdomain.com/base/"></head><body><a href="page.html">x</a></body></html>"#,
        );
        let links = extractor().extract_links(&response);
        assert_eq!(links[0].url, "http://otherdomain.com/base/page.html");
    }

    #[test]
    fn test_nofollow_flag_propagated() {
        let response = Response::new(
            "http://example.com/",
            r#"<html><body><a href="/a" rel="external nofollow">x</a></body></html>"#,
        );
        let links = extractor().extract_links(&response);
        assert!(links[0].nofollow);
    }

    #[test]
    fn test_malformed_url_silently_skipped() {
        let response = Response::new(
            "http://example.org/",
            "<html><body><a href=\"http://[example.org/\">x</a></body></html>",
        );
        assert!(extractor().extract_links(&response).is_empty());
    }

    #[test]
    fn test_determinism_repeated_calls_equal() {
        let response = Response::new(
            "http://example.com/",
            "<html><body><a href=\"/a\">x</a><a href=\"/b\">y</a></body></html>",
        );
        let extractor = extractor();
        assert_eq!(
            extractor.extract_links(&response),
            extractor.extract_links(&response)
        );
    }

    #[test]
    fn test_matches_applies_scheme_and_extension_gates() {
        let extractor = extractor();
        assert!(extractor.matches("http://example.com/page.html"));
        assert!(!extractor.matches("http://example.com/photo.jpg"));
        assert!(!extractor.matches("javascript:void(0)"));
    }

    #[test]
    fn test_xml_response_parses_with_xml_backend() {
        let response = Response::new(
            "http://example.com/feed",
            r#"<root><a href="/a">x</a></root>"#,
        )
        .as_xml();
        let links = extractor().extract_links(&response);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "http://example.com/a");
    }

    #[test]
    fn test_ill_formed_xml_yields_no_links_not_panic() {
        let response = Response::new("http://example.com/feed", "<root><a></root>").as_xml();
        assert!(extractor().extract_links(&response).is_empty());
    }

    #[test]
    fn test_unparseable_response_url_yields_no_links() {
        let response = Response::new("not a url", "<html><body><a href=\"/a\">x</a></body></html>");
        assert!(extractor().extract_links(&response).is_empty());
    }

    #[test]
    fn test_xpath_regions_walked_before_css_regions() {
        let response = Response::new(
            "http://example.com/",
            r#"<html><body><div id="x"><a href="/a">a</a></div><a href="/b">b</a></body></html>"#,
        );
        let config = ExtractorConfigBuilder::new()
            .with_restrict_css("#x")
            .with_restrict_xpaths("//body/a")
            .with_unique(false)
            .build()
            .unwrap();
        let links = LinkExtractor::new(config).extract_links(&response);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].url, "http://example.com/b");
        assert_eq!(links[1].url, "http://example.com/a");
    }

    #[test]
    fn test_overlapping_css_and_xpath_regions_preserve_duplicates() {
        let response = Response::new(
            "http://example.com/",
            r#"<html><body><p id="a"><a href="/a">x</a></p></body></html>"#,
        );
        let config = ExtractorConfigBuilder::new()
            .with_restrict_css("#a")
            .with_restrict_xpaths("//p")
            .with_unique(false)
            .build()
            .unwrap();
        let links = LinkExtractor::new(config).extract_links(&response);
        assert_eq!(links.len(), 2);
    }

    #[test]
    fn test_deny_regex_matches_against_links_fragment() {
        let response = Response::new(
            "http://example.com/",
            r#"<html><body><a href="/page#drop">x</a></body></html>"#,
        );
        let config = ExtractorConfigBuilder::new()
            .with_deny(r"#drop$")
            .build()
            .unwrap();
        assert!(LinkExtractor::new(config).extract_links(&response).is_empty());
    }

    #[test]
    fn test_restrict_xpaths_silently_yields_nothing_on_ill_formed_body() {
        let response = Response::new(
            "http://example.com/",
            "<html><body><a href=\"/a\">x</a></body><a href=\"/b\">y</body></html>",
        );
        let config = ExtractorConfigBuilder::new()
            .with_restrict_xpaths("//a")
            .build()
            .unwrap();
        assert!(LinkExtractor::new(config).extract_links(&response).is_empty());
    }
}
