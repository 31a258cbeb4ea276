//! A hand-rolled CSS selector subset.
//!
//! Covers the compound-selector shape real restriction configs write: a
//! type selector or `*`, `#id`, `.class` (repeatable), `[attr]`/`[attr=value]`
//! attribute tests, combined with descendant (whitespace) and child (`>`)
//! combinators. Evaluated directly over [`ElementLike`] so the same engine
//! applies to both the HTML and XML tree backends, rather than routing
//! through `scraper::Selector`, which only understands the `scraper` tree.
//!
//! Sibling combinators (`+`, `~`) aren't implemented — `validate`/`compile`
//! reject them outright rather than silently compiling to a selector that
//! can never match anything.

use crate::dom::ElementLike;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default)]
struct SimpleSelector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
}

/// A parsed `restrict_css` selector, ready to evaluate against a tree.
#[derive(Debug, Clone)]
pub(crate) struct CompiledCss {
    parts: Vec<(Option<Combinator>, SimpleSelector)>,
}

/// Checks that `expr` parses, without evaluating it.
pub(crate) fn validate(expr: &str) -> Result<(), String> {
    compile(expr).map(|_| ())
}

enum Token {
    Combinator(Combinator),
    Compound(String),
}

fn tokenize(expr: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut buf = String::new();
    let mut chars = expr.chars().peekable();
    let mut bracket_depth = 0i32;

    while let Some(c) = chars.next() {
        if c == '[' {
            bracket_depth += 1;
            buf.push(c);
        } else if c == ']' {
            bracket_depth -= 1;
            buf.push(c);
        } else if bracket_depth > 0 {
            buf.push(c);
        } else if c == '+' || c == '~' {
            return Err(format!(
                "sibling combinators are not supported in selector {:?}",
                expr
            ));
        } else if c.is_whitespace() {
            if !buf.is_empty() {
                tokens.push(Token::Compound(std::mem::take(&mut buf)));
            }
            while let Some(&next) = chars.peek() {
                if next.is_whitespace() {
                    chars.next();
                } else {
                    break;
                }
            }
            match chars.peek() {
                Some(&'>') => {
                    chars.next();
                    tokens.push(Token::Combinator(Combinator::Child));
                    while let Some(&next) = chars.peek() {
                        if next.is_whitespace() {
                            chars.next();
                        } else {
                            break;
                        }
                    }
                }
                Some(&'+') | Some(&'~') => {
                    return Err(format!(
                        "sibling combinators are not supported in selector {:?}",
                        expr
                    ));
                }
                Some(_) => tokens.push(Token::Combinator(Combinator::Descendant)),
                None => {}
            }
        } else if c == '>' {
            if !buf.is_empty() {
                tokens.push(Token::Compound(std::mem::take(&mut buf)));
            }
            tokens.push(Token::Combinator(Combinator::Child));
            while let Some(&next) = chars.peek() {
                if next.is_whitespace() {
                    chars.next();
                } else {
                    break;
                }
            }
        } else {
            buf.push(c);
        }
    }
    if !buf.is_empty() {
        tokens.push(Token::Compound(buf));
    }
    Ok(tokens)
}

/// Parses `expr` into a [`CompiledCss`].
pub(crate) fn compile(expr: &str) -> Result<CompiledCss, String> {
    let trimmed = expr.trim();
    if trimmed.is_empty() {
        return Err("empty css selector".to_string());
    }

    let mut parts = Vec::new();
    let mut pending_combinator = None;
    for token in tokenize(trimmed)? {
        match token {
            Token::Combinator(c) => pending_combinator = Some(c),
            Token::Compound(s) => {
                let simple = parse_simple(&s)?;
                parts.push((pending_combinator.take(), simple));
            }
        }
    }

    if parts.is_empty() {
        return Err(format!("css selector {:?} has no compound selectors", expr));
    }

    Ok(CompiledCss { parts })
}

fn parse_simple(s: &str) -> Result<SimpleSelector, String> {
    let mut simple = SimpleSelector::default();
    let mut chars = s.chars().peekable();

    if let Some(&c) = chars.peek() {
        if c != '.' && c != '#' && c != '[' {
            let mut buf = String::new();
            while let Some(&c) = chars.peek() {
                if c == '.' || c == '#' || c == '[' {
                    break;
                }
                buf.push(c);
                chars.next();
            }
            if buf != "*" {
                simple.tag = Some(buf.to_ascii_lowercase());
            }
        }
    }

    while let Some(&c) = chars.peek() {
        match c {
            '.' => {
                chars.next();
                let name = take_until_marker(&mut chars);
                if name.is_empty() {
                    return Err(format!("empty class name in selector {:?}", s));
                }
                simple.classes.push(name);
            }
            '#' => {
                chars.next();
                let name = take_until_marker(&mut chars);
                if name.is_empty() {
                    return Err(format!("empty id in selector {:?}", s));
                }
                simple.id = Some(name);
            }
            '[' => {
                chars.next();
                let mut buf = String::new();
                let mut closed = false;
                for c2 in chars.by_ref() {
                    if c2 == ']' {
                        closed = true;
                        break;
                    }
                    buf.push(c2);
                }
                if !closed {
                    return Err(format!("unterminated attribute selector in {:?}", s));
                }
                simple.attrs.push(parse_attr_expr(&buf, s)?);
            }
            other => return Err(format!("unexpected character {:?} in selector {:?}", other, s)),
        }
    }

    Ok(simple)
}

fn take_until_marker(chars: &mut std::iter::Peekable<std::str::Chars>) -> String {
    let mut buf = String::new();
    while let Some(&c) = chars.peek() {
        if c == '.' || c == '#' || c == '[' {
            break;
        }
        buf.push(c);
        chars.next();
    }
    buf
}

fn parse_attr_expr(raw: &str, selector: &str) -> Result<(String, Option<String>), String> {
    if let Some(eq) = raw.find('=') {
        let name = raw[..eq].trim();
        let mut value = raw[eq + 1..].trim();
        if value.len() >= 2 {
            let bytes = value.as_bytes();
            if (bytes[0] == b'"' && bytes[value.len() - 1] == b'"')
                || (bytes[0] == b'\'' && bytes[value.len() - 1] == b'\'')
            {
                value = &value[1..value.len() - 1];
            }
        }
        if name.is_empty() {
            return Err(format!("empty attribute name in selector {:?}", selector));
        }
        Ok((name.to_string(), Some(value.to_string())))
    } else {
        let name = raw.trim();
        if name.is_empty() {
            return Err(format!("empty attribute selector in {:?}", selector));
        }
        Ok((name.to_string(), None))
    }
}

/// Evaluates `compiled` against `root`, returning matching elements in
/// document order.
pub(crate) fn evaluate<E: ElementLike + Copy>(compiled: &CompiledCss, root: E) -> Vec<E> {
    let mut context: Vec<E> = vec![root];

    for (combinator, simple) in &compiled.parts {
        let descendant = !matches!(combinator, Some(Combinator::Child));
        let mut next_context = Vec::new();
        for ctx_node in &context {
            let candidates: Vec<E> = if descendant {
                let mut all = ctx_node.self_and_descendants();
                if !all.is_empty() {
                    all.remove(0);
                }
                all
            } else {
                ctx_node.element_children()
            };
            next_context.extend(candidates.into_iter().filter(|c| simple_matches(simple, c)));
        }
        context = next_context;
        if context.is_empty() {
            break;
        }
    }

    context
}

fn simple_matches<E: ElementLike>(simple: &SimpleSelector, el: &E) -> bool {
    if let Some(tag) = &simple.tag {
        if !el.tag_name().eq_ignore_ascii_case(tag) {
            return false;
        }
    }
    if let Some(id) = &simple.id {
        if el.attr("id") != Some(id.as_str()) {
            return false;
        }
    }
    for class in &simple.classes {
        let has = el
            .attr("class")
            .map(|c| c.split_ascii_whitespace().any(|t| t == class))
            .unwrap_or(false);
        if !has {
            return false;
        }
    }
    for (name, value) in &simple.attrs {
        match (el.attr(name), value) {
            (Some(actual), Some(expected)) => {
                if actual != expected {
                    return false;
                }
            }
            (Some(_), None) => {}
            (None, _) => return false,
        }
    }
    true
}
