//! A small arena-backed XML tree, used for XHTML/XML responses where
//! html5ever's permissive parsing is not applicable: ill-formed input is
//! rejected outright rather than recovered from.

use quick_xml::events::Event;
use quick_xml::Reader;

use super::ElementLike;

#[derive(Debug)]
enum XmlChild {
    Element(usize),
    Text(String),
}

#[derive(Debug)]
struct XmlNodeData {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<XmlChild>,
}

/// An XML document parsed into a flat arena; empty when the source was
/// ill-formed or contained no root element.
#[derive(Debug, Default)]
pub(crate) struct XmlDocument {
    nodes: Vec<XmlNodeData>,
    root: Option<usize>,
}

impl XmlDocument {
    /// Parses `body` as XML. Returns an empty document (no root) on any
    /// well-formedness error, rather than a partially built tree.
    pub(crate) fn parse(body: &str) -> Self {
        let mut reader = Reader::from_str(body);
        reader.config_mut().trim_text(false);

        let mut nodes: Vec<XmlNodeData> = Vec::new();
        let mut stack: Vec<usize> = Vec::new();
        let mut root: Option<usize> = None;

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let idx = push_node(&mut nodes, e);
                    attach(&mut nodes, &stack, root, idx);
                    if root.is_none() {
                        root = Some(idx);
                    }
                    stack.push(idx);
                }
                Ok(Event::Empty(ref e)) => {
                    let idx = push_node(&mut nodes, e);
                    attach(&mut nodes, &stack, root, idx);
                    if root.is_none() {
                        root = Some(idx);
                    }
                }
                Ok(Event::End(_)) => {
                    if stack.pop().is_none() {
                        return XmlDocument::default();
                    }
                }
                Ok(Event::Text(t)) => {
                    if let Some(&parent) = stack.last() {
                        let text = t.unescape().unwrap_or_default().into_owned();
                        nodes[parent].children.push(XmlChild::Text(text));
                    }
                }
                Ok(Event::CData(t)) => {
                    if let Some(&parent) = stack.last() {
                        let text = String::from_utf8_lossy(t.as_ref()).into_owned();
                        nodes[parent].children.push(XmlChild::Text(text));
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(_) => return XmlDocument::default(),
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return XmlDocument::default();
        }

        XmlDocument { nodes, root }
    }

    /// The document's root element, if parsing succeeded.
    pub(crate) fn root(&self) -> Option<XmlElementRef<'_>> {
        self.root.map(|id| XmlElementRef { doc: self, id })
    }

    /// Returns the `href` of the first `base` element in the document, if
    /// any, mirroring [`super::html::find_base_href`] for XHTML responses
    /// that also carry a `<base>` element.
    pub(crate) fn find_base_href(&self) -> Option<String> {
        let root = self.root()?;
        root.self_and_descendants()
            .into_iter()
            .find(|el| local_name(el.tag_name()).eq_ignore_ascii_case("base"))
            .and_then(|el| el.attr("href"))
            .map(|s| s.to_string())
    }
}

/// Strips an XML namespace prefix (`"html:base"` -> `"base"`) so `find_base_href`
/// matches regardless of whether the document declares a default namespace.
fn local_name(tag: &str) -> &str {
    tag.rsplit(':').next().unwrap_or(tag)
}

fn push_node(nodes: &mut Vec<XmlNodeData>, e: &quick_xml::events::BytesStart) -> usize {
    let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let attrs = e
        .attributes()
        .filter_map(|a| a.ok())
        .map(|a| {
            let key = String::from_utf8_lossy(a.key.as_ref()).into_owned();
            let value = a
                .decode_and_unescape_value(quick_xml::encoding::Decoder::utf8())
                .map(|v| v.into_owned())
                .unwrap_or_default();
            (key, value)
        })
        .collect();
    nodes.push(XmlNodeData {
        tag,
        attrs,
        children: Vec::new(),
    });
    nodes.len() - 1
}

fn attach(nodes: &mut [XmlNodeData], stack: &[usize], root: Option<usize>, idx: usize) {
    if let Some(&parent) = stack.last() {
        nodes[parent].children.push(XmlChild::Element(idx));
    } else if root.is_some() {
        // a second top-level element with no enclosing parent: not well-formed XML.
    }
}

/// A handle into an [`XmlDocument`]'s arena, cheap to copy.
#[derive(Clone, Copy, Debug)]
pub(crate) struct XmlElementRef<'a> {
    doc: &'a XmlDocument,
    id: usize,
}

impl<'a> XmlElementRef<'a> {
    fn data(&self) -> &'a XmlNodeData {
        &self.doc.nodes[self.id]
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.data().children {
            match child {
                XmlChild::Text(t) => out.push_str(t),
                XmlChild::Element(id) => {
                    XmlElementRef {
                        doc: self.doc,
                        id: *id,
                    }
                    .collect_text(out);
                }
            }
        }
    }
}

impl<'a> ElementLike for XmlElementRef<'a> {
    fn tag_name(&self) -> &str {
        &self.data().tag
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.data()
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn element_children(&self) -> Vec<Self> {
        self.data()
            .children
            .iter()
            .filter_map(|c| match c {
                XmlChild::Element(id) => Some(XmlElementRef {
                    doc: self.doc,
                    id: *id,
                }),
                XmlChild::Text(_) => None,
            })
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
        let doc = XmlDocument::parse(r#"<root><a href="x">text</a></root>"#);
        let root = doc.root().unwrap();
        assert_eq!(root.tag_name(), "root");
        let children = root.element_children();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].tag_name(), "a");
        assert_eq!(children[0].attr("href"), Some("x"));
        assert_eq!(children[0].text_content(), "text");
    }

    #[test]
    fn test_ill_formed_xml_yields_empty_document() {
        let doc = XmlDocument::parse("<root><a></root>");
        assert!(doc.root().is_none());
    }

    #[test]
    fn test_unclosed_tag_yields_empty_document() {
        let doc = XmlDocument::parse("<root><a href=\"x\">text</a>");
        assert!(doc.root().is_none());
    }

    #[test]
    fn test_self_and_descendants_preorder() {
        let doc = XmlDocument::parse(r#"<root><a/><b><c/></b></root>"#);
        let root = doc.root().unwrap();
        let names: Vec<&str> = root
            .self_and_descendants()
            .iter()
            .map(|e| e.tag_name())
            .collect();
        assert_eq!(names, vec!["root", "a", "b", "c"]);
    }

    #[test]
    fn test_find_base_href_present() {
        let doc = XmlDocument::parse(
            r#"<html><head><base href="http://other.example/base/"/></head><body/></html>"#,
        );
        assert_eq!(
            doc.find_base_href().as_deref(),
            Some("http://other.example/base/")
        );
    }

    #[test]
    fn test_find_base_href_absent() {
        let doc = XmlDocument::parse(r#"<html><head/><body/></html>"#);
        assert_eq!(doc.find_base_href(), None);
    }
}
