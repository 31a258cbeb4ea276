//! Tag/attribute walker: visits descendants of a region root whose tag is
//! in the configured `tags`, reading each configured attribute into a
//! [`RawLink`] before resolution and filtering.

use crate::config::ExtractorConfig;
use crate::dom::{has_nofollow_rel, ElementLike};

/// A candidate link gathered by the walker, before URL resolution.
pub(crate) struct RawLink {
    pub(crate) value: String,
    pub(crate) text: String,
    pub(crate) nofollow: bool,
}

/// Walks every descendant of `root` (not `root` itself — a region root
/// selected by `restrict_css`/`restrict_xpaths` scopes traversal, it is not
/// itself a candidate element), emitting one [`RawLink`] per present,
/// non-empty, configured attribute on a configured tag.
pub(crate) fn walk<E: ElementLike + Copy>(root: E, config: &ExtractorConfig) -> Vec<RawLink> {
    if config.tags.is_empty() || config.attrs.is_empty() {
        return Vec::new();
    }

    let mut descendants = root.self_and_descendants();
    if !descendants.is_empty() {
        descendants.remove(0);
    }

    let mut out = Vec::new();
    for el in descendants {
        // `config.tags` is always lowercased at config-build time (config.rs);
        // fold the element's tag here too, since only the HTML backend's
        // tag names are guaranteed already-lowercased (see `ElementLike::tag_name`).
        if !config.tags.contains(el.tag_name().to_ascii_lowercase().as_str()) {
            continue;
        }

        for attr in &config.attrs {
            let Some(raw) = el.attr(attr.as_str()) else {
                continue;
            };
            if raw.is_empty() {
                continue;
            }

            let mut value = raw.to_string();
            if let Some(process_value) = &config.process_value {
                match process_value(&value) {
                    Some(replaced) => value = replaced,
                    None => {
                        log::trace!("process_value dropped a link for attribute {:?}", attr);
                        continue;
                    }
                }
            }

            if config.strip {
                value = value.trim().to_string();
            }
            if value.is_empty() {
                continue;
            }

            let text = el.text_content();
            let text = text.trim().to_string();
            let nofollow = has_nofollow_rel(el.attr("rel"));

            out.push(RawLink {
                value,
                text,
                nofollow,
            });
        }
    }

    out
}
