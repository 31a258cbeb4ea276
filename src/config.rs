//! Extractor configuration: the `ExtractorConfig` value type and its builder.

use crate::error::{ConfigResult, ConfigurationError};
use compact_str::CompactString;
use hashbrown::HashSet;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Accepts either a single value or a list of values for a builder setter,
/// so callers don't have to wrap a lone pattern in a one-element `Vec`.
pub enum OneOrMany<T> {
    /// A single value.
    One(T),
    /// Several values.
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(v) => vec![v],
            OneOrMany::Many(v) => v,
        }
    }
}

impl<T> From<T> for OneOrMany<T> {
    fn from(v: T) -> Self {
        OneOrMany::One(v)
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(v: Vec<T>) -> Self {
        OneOrMany::Many(v)
    }
}

/// A user callback applied to each raw attribute value before resolution;
/// returning `None` drops the link.
pub type ProcessValueFn = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Immutable, cheaply cloneable extraction configuration. Build one with
/// [`ExtractorConfigBuilder`] and reuse it across many [`extract_links`](crate::extractor::LinkExtractor::extract_links) calls.
#[derive(Clone)]
pub struct ExtractorConfig {
    pub(crate) allow: Vec<Regex>,
    pub(crate) deny: Vec<Regex>,
    pub(crate) allow_domains: Vec<CompactString>,
    pub(crate) deny_domains: Vec<CompactString>,
    pub(crate) restrict_xpaths: Vec<String>,
    pub(crate) restrict_css: Vec<String>,
    pub(crate) restrict_text: Vec<Regex>,
    pub(crate) tags: HashSet<CompactString>,
    pub(crate) attrs: HashSet<CompactString>,
    pub(crate) deny_extensions: Option<HashSet<CompactString>>,
    pub(crate) canonicalize: bool,
    pub(crate) unique: bool,
    pub(crate) process_value: Option<ProcessValueFn>,
    pub(crate) strip: bool,
}

impl fmt::Debug for ExtractorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractorConfig")
            .field("allow", &self.allow)
            .field("deny", &self.deny)
            .field("allow_domains", &self.allow_domains)
            .field("deny_domains", &self.deny_domains)
            .field("restrict_xpaths", &self.restrict_xpaths)
            .field("restrict_css", &self.restrict_css)
            .field("restrict_text", &self.restrict_text)
            .field("tags", &self.tags)
            .field("attrs", &self.attrs)
            .field("deny_extensions", &self.deny_extensions)
            .field("canonicalize", &self.canonicalize)
            .field("unique", &self.unique)
            .field("process_value", &self.process_value.is_some())
            .field("strip", &self.strip)
            .finish()
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        ExtractorConfigBuilder::new()
            .build()
            .expect("default configuration always builds")
    }
}

/// Builder for [`ExtractorConfig`], following the crawler's own chained
/// `with_*` setter convention.
pub struct ExtractorConfigBuilder {
    allow: Vec<String>,
    deny: Vec<String>,
    allow_domains: Vec<String>,
    deny_domains: Vec<String>,
    restrict_xpaths: Vec<String>,
    restrict_css: Vec<String>,
    restrict_text: Vec<String>,
    tags: Option<Vec<String>>,
    attrs: Option<Vec<String>>,
    deny_extensions: Option<Vec<String>>,
    canonicalize: bool,
    unique: bool,
    process_value: Option<ProcessValueFn>,
    strip: bool,
}

impl ExtractorConfigBuilder {
    /// Start a new builder with spec defaults: `unique=true`, `strip=true`,
    /// default tags `{a, area}`, default attrs `{href}`.
    pub fn new() -> Self {
        Self {
            allow: Vec::new(),
            deny: Vec::new(),
            allow_domains: Vec::new(),
            deny_domains: Vec::new(),
            restrict_xpaths: Vec::new(),
            restrict_css: Vec::new(),
            restrict_text: Vec::new(),
            tags: None,
            attrs: None,
            deny_extensions: None,
            canonicalize: false,
            unique: true,
            process_value: None,
            strip: true,
        }
    }

    /// URL patterns a link must match at least one of to be kept.
    pub fn with_allow(mut self, allow: impl Into<OneOrMany<String>>) -> Self {
        self.allow = allow.into().into_vec();
        self
    }

    /// URL patterns that drop a link on match.
    pub fn with_deny(mut self, deny: impl Into<OneOrMany<String>>) -> Self {
        self.deny = deny.into().into_vec();
        self
    }

    /// Domains a link's host must be, or be a subdomain of, to be kept.
    pub fn with_allow_domains(mut self, domains: impl Into<OneOrMany<String>>) -> Self {
        self.allow_domains = domains.into().into_vec();
        self
    }

    /// Domains that drop a link on host match.
    pub fn with_deny_domains(mut self, domains: impl Into<OneOrMany<String>>) -> Self {
        self.deny_domains = domains.into().into_vec();
        self
    }

    /// XPath expressions restricting extraction to matching subtrees.
    pub fn with_restrict_xpaths(mut self, xpaths: impl Into<OneOrMany<String>>) -> Self {
        self.restrict_xpaths = xpaths.into().into_vec();
        self
    }

    /// CSS selectors restricting extraction to matching subtrees.
    pub fn with_restrict_css(mut self, css: impl Into<OneOrMany<String>>) -> Self {
        self.restrict_css = css.into().into_vec();
        self
    }

    /// Patterns an anchor's text must match at least one of to be kept.
    pub fn with_restrict_text(mut self, patterns: impl Into<OneOrMany<String>>) -> Self {
        self.restrict_text = patterns.into().into_vec();
        self
    }

    /// Element tag names the walker visits. `None`/empty yields no links.
    pub fn with_tags(mut self, tags: impl Into<OneOrMany<String>>) -> Self {
        self.tags = Some(tags.into().into_vec());
        self
    }

    /// Attribute names the walker reads from matching elements.
    pub fn with_attrs(mut self, attrs: impl Into<OneOrMany<String>>) -> Self {
        self.attrs = Some(attrs.into().into_vec());
        self
    }

    /// Override the default denied-extension set. An empty list disables
    /// the extension check entirely, rather than falling back to defaults.
    pub fn with_deny_extensions(mut self, extensions: impl Into<OneOrMany<String>>) -> Self {
        self.deny_extensions = Some(extensions.into().into_vec());
        self
    }

    /// Enable query-parameter-sorted, case-normalized URL canonicalization.
    pub fn with_canonicalize(mut self, canonicalize: bool) -> Self {
        self.canonicalize = canonicalize;
        self
    }

    /// Enable/disable first-seen-wins deduplication by URL.
    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Strip surrounding whitespace from attribute values before resolution.
    pub fn with_strip(mut self, strip: bool) -> Self {
        self.strip = strip;
        self
    }

    /// A callback applied to each raw attribute value; returning `None`
    /// drops the link. Setting this makes the resulting config non-serializable.
    pub fn with_process_value<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.process_value = Some(Arc::new(f));
        self
    }

    /// Compiles regex patterns and validates selectors, returning a
    /// [`ConfigurationError`] on the first failure instead of deferring it
    /// to extraction time.
    pub fn build(self) -> ConfigResult<ExtractorConfig> {
        let allow = compile_all(&self.allow)?;
        let deny = compile_all(&self.deny)?;
        let restrict_text = compile_all(&self.restrict_text)?;

        for xpath in &self.restrict_xpaths {
            crate::selector::xpath::validate(xpath).map_err(|reason| {
                ConfigurationError::InvalidXPath {
                    expression: xpath.clone(),
                    reason,
                }
            })?;
        }

        for css in &self.restrict_css {
            crate::selector::css::validate(css).map_err(|reason| {
                ConfigurationError::InvalidCssSelector {
                    selector: css.clone(),
                    reason,
                }
            })?;
        }

        let tags = self
            .tags
            .unwrap_or_else(|| crate::defaults::DEFAULT_TAGS.iter().map(|s| s.to_string()).collect())
            .into_iter()
            .map(|t| CompactString::from(t.to_ascii_lowercase()))
            .collect();

        let attrs = self
            .attrs
            .unwrap_or_else(|| crate::defaults::DEFAULT_ATTRS.iter().map(|s| s.to_string()).collect())
            .into_iter()
            .map(|a| CompactString::from(a.to_ascii_lowercase()))
            .collect();

        let deny_extensions = self.deny_extensions.map(|exts| {
            exts.into_iter()
                .map(|e| CompactString::from(e.trim_start_matches('.').to_ascii_lowercase()))
                .collect()
        });

        Ok(ExtractorConfig {
            allow,
            deny,
            allow_domains: self.allow_domains.into_iter().map(CompactString::from).collect(),
            deny_domains: self.deny_domains.into_iter().map(CompactString::from).collect(),
            restrict_xpaths: self.restrict_xpaths,
            restrict_css: self.restrict_css,
            restrict_text,
            tags,
            attrs,
            deny_extensions,
            canonicalize: self.canonicalize,
            unique: self.unique,
            process_value: self.process_value,
            strip: self.strip,
        })
    }
}

impl Default for ExtractorConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn compile_all(patterns: &[String]) -> ConfigResult<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p).map_err(|source| ConfigurationError::InvalidRegex {
                pattern: p.clone(),
                source,
            })
        })
        .collect()
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::de::Error as DeError;
    use serde::ser::Error as SerError;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct SerializableConfig {
        #[serde(with = "serde_regex")]
        allow: Vec<Regex>,
        #[serde(with = "serde_regex")]
        deny: Vec<Regex>,
        allow_domains: Vec<CompactString>,
        deny_domains: Vec<CompactString>,
        restrict_xpaths: Vec<String>,
        restrict_css: Vec<String>,
        #[serde(with = "serde_regex")]
        restrict_text: Vec<Regex>,
        tags: HashSet<CompactString>,
        attrs: HashSet<CompactString>,
        deny_extensions: Option<HashSet<CompactString>>,
        canonicalize: bool,
        unique: bool,
        strip: bool,
    }

    impl Serialize for ExtractorConfig {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if self.process_value.is_some() {
                return Err(S::Error::custom(
                    "ExtractorConfig with a process_value callback cannot be serialized",
                ));
            }
            SerializableConfig {
                allow: self.allow.clone(),
                deny: self.deny.clone(),
                allow_domains: self.allow_domains.clone(),
                deny_domains: self.deny_domains.clone(),
                restrict_xpaths: self.restrict_xpaths.clone(),
                restrict_css: self.restrict_css.clone(),
                restrict_text: self.restrict_text.clone(),
                tags: self.tags.clone(),
                attrs: self.attrs.clone(),
                deny_extensions: self.deny_extensions.clone(),
                canonicalize: self.canonicalize,
                unique: self.unique,
                strip: self.strip,
            }
            .serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for ExtractorConfig {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = SerializableConfig::deserialize(deserializer)?;
            if s.tags.is_empty() || s.attrs.is_empty() {
                return Err(D::Error::custom("tags and attrs must be non-empty"));
            }
            Ok(ExtractorConfig {
                allow: s.allow,
                deny: s.deny,
                allow_domains: s.allow_domains,
                deny_domains: s.deny_domains,
                restrict_xpaths: s.restrict_xpaths,
                restrict_css: s.restrict_css,
                restrict_text: s.restrict_text,
                tags: s.tags,
                attrs: s.attrs,
                deny_extensions: s.deny_extensions,
                canonicalize: s.canonicalize,
                unique: s.unique,
                process_value: None,
                strip: s.strip,
            })
        }
    }
}
