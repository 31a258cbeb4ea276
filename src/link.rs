use std::fmt;

/// A single hyperlink extracted from a document, resolved to an absolute URL.
///
/// Two links are equal iff all four fields are equal; the `url` field never
/// carries a fragment, see [`Link::fragment`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Link {
    /// Absolute, resolved URL with the fragment stripped.
    pub url: String,
    /// Anchor text, trimmed of surrounding whitespace.
    pub text: String,
    /// The fragment component of the original href, empty when none was present.
    pub fragment: String,
    /// True when the source element's `rel` attribute carries the `nofollow` token.
    pub nofollow: bool,
}

impl Link {
    pub(crate) fn new(url: String, text: String, fragment: String, nofollow: bool) -> Self {
        Self {
            url,
            text,
            fragment,
            nofollow,
        }
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}
