#![warn(missing_docs)]

//! Extracts and normalizes hyperlinks from HTML and XHTML documents for a
//! web-crawling pipeline.
//!
//! Given a fetched document — its raw bytes, declared encoding, and the URL
//! it was retrieved from — [`LinkExtractor::extract_links`] returns an
//! ordered, deduplicated sequence of [`Link`] records suitable for
//! follow-up fetching: absolute URLs paired with their anchor text and
//! follow-policy metadata.
//!
//! # Basic usage
//!
//! ```
//! use linkextract::{ExtractorConfigBuilder, LinkExtractor, Response};
//!
//! let config = ExtractorConfigBuilder::new().build().unwrap();
//! let extractor = LinkExtractor::new(config);
//!
//! let response = Response::new(
//!     "http://example.com/",
//!     r#"<html><body><a href="/about">About</a></body></html>"#,
//! );
//!
//! let links = extractor.extract_links(&response);
//! assert_eq!(links[0].url, "http://example.com/about");
//! ```
//!
//! Restrict extraction to a subtree, filter by domain, and follow a
//! `<base href>` override:
//!
//! ```
//! use linkextract::{ExtractorConfigBuilder, LinkExtractor, Response};
//!
//! let config = ExtractorConfigBuilder::new()
//!     .with_restrict_css("#content")
//!     .with_allow_domains("example.com")
//!     .build()
//!     .unwrap();
//! let extractor = LinkExtractor::new(config);
//!
//! let response = Response::new(
//!     "http://example.com/",
//!     r#"<html><body><div id="content"><a href="/a">a</a></div><a href="/b">b</a></body></html>"#,
//! );
//! assert_eq!(extractor.extract_links(&response).len(), 1);
//! ```

extern crate log;
extern crate url;

/// URL canonicalization: query-parameter sorting and percent-encoding
/// normalization, so semantically equivalent URLs compare equal.
mod canonical;
/// The `ExtractorConfig` value type and its builder.
pub mod config;
/// Byte decoding under a declared character encoding.
mod decode;
/// A small DOM abstraction shared by the HTML and XML tree backends.
mod dom;
/// Domain allow/deny suffix matching.
mod domains;
/// Built-in constant sets: allowed schemes, denied extensions, default tags/attrs.
pub mod defaults;
/// Configuration construction errors.
pub mod error;
/// The `LinkExtractor` entry point.
mod extractor;
/// The scheme/extension/allow/deny/domain/text filter chain.
mod filter;
/// The `Link` output record.
pub mod link;
/// URL resolution and percent-encoding normalization.
mod resolve;
/// The fetched-document input contract.
pub mod response;
/// XPath/CSS region selection.
mod selector;
/// The tag/attribute walker.
mod walker;

pub use config::{ExtractorConfig, ExtractorConfigBuilder, OneOrMany, ProcessValueFn};
pub use error::{ConfigResult, ConfigurationError};
pub use extractor::LinkExtractor;
pub use link::Link;
pub use response::{DocumentKind, Response};
