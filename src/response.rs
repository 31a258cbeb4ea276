/// Discriminates the document type a [`Response`] carries, driving which
/// parser backend the decoder dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Parse permissively with the HTML backend, regardless of well-formedness.
    Html,
    /// Parse strictly as XML; ill-formed input yields an empty tree.
    Xml,
}

impl Default for DocumentKind {
    fn default() -> Self {
        DocumentKind::Html
    }
}

/// The fetched document an extractor consumes: the URL it came from, its raw
/// bytes, its declared character encoding, and its document kind.
#[derive(Debug, Clone)]
pub struct Response {
    /// The absolute URL the document was retrieved from.
    pub url: String,
    /// Raw response body bytes, not yet decoded.
    pub body: Vec<u8>,
    /// Declared character encoding label, e.g. `"utf-8"` or `"iso-8859-15"`.
    /// Falls back to UTF-8 when absent or unrecognized.
    pub encoding: Option<String>,
    /// Whether to parse this response as HTML or XML.
    pub kind: DocumentKind,
}

impl Response {
    /// Build a response from a UTF-8 string body, the common case in tests
    /// and for callers that already decoded the bytes themselves.
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: body.into().into_bytes(),
            encoding: None,
            kind: DocumentKind::Html,
        }
    }

    /// Set the declared encoding label.
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    /// Mark this response as XML rather than HTML.
    pub fn as_xml(mut self) -> Self {
        self.kind = DocumentKind::Xml;
        self
    }

    /// Build a response directly from raw bytes, e.g. a non-UTF-8 fetch.
    pub fn from_bytes(url: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            url: url.into(),
            body,
            encoding: None,
            kind: DocumentKind::Html,
        }
    }
}
