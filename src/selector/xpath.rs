//! XPath region selection via `sxd-xpath`, evaluated against a dedicated
//! `sxd-document` parse of the response body. This is the same library
//! pairing the teacher's `spider_utils` crate depends on for its own
//! XPath-selector map (`spider_utils::css_query_select_map`,
//! `spider_utils::is_valid_xpath`) — adopted here rather than hand-rolled,
//! since the corpus already reaches for it.

use sxd_xpath::{evaluate_xpath, Factory, Value};

use crate::dom::sxd::SxdElementRef;

/// Checks that `expr` compiles as an XPath expression, without evaluating
/// it. Mirrors `spider_utils::is_valid_xpath`.
pub(crate) fn validate(expr: &str) -> Result<(), String> {
    lazy_static::lazy_static! {
        static ref XPATH_FACTORY: Factory = Factory::new();
    }
    match XPATH_FACTORY.build(expr) {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(format!(
            "xpath expression {:?} did not compile to an executable step",
            expr
        )),
        Err(e) => Err(e.to_string()),
    }
}

/// Evaluates `expr` against `document`, returning matched elements in
/// document order. A result that isn't a node-set (a string/number/boolean
/// expression) contributes no region roots — only elements can be walked
/// for links.
pub(crate) fn evaluate<'d>(
    document: &sxd_document::dom::Document<'d>,
    expr: &str,
) -> Result<Vec<SxdElementRef<'d>>, String> {
    let value = evaluate_xpath(document, expr).map_err(|e| e.to_string())?;

    let elements = match value {
        Value::Nodeset(nodes) => nodes
            .document_order()
            .into_iter()
            .filter_map(|node| node.element())
            .map(SxdElementRef::new)
            .collect(),
        _ => Vec::new(),
    };

    Ok(elements)
}
