// ABOUTME: Rewrites relative link and image references to absolute addresses.
// ABOUTME: Absolute, fragment-only and mailto references are left alone; failures keep the original value.

use url::Url;

use crate::dom::node::{Element, Node};
use crate::dom::rewrite::{rewrite_children, Rewrite};
use crate::error::ExtractError;

/// Resolve `a[href]` and `img[src]` under `root` against `base`.
///
/// Without a base nothing is rewritten.
pub fn resolve_references(root: Element, base: Option<&Url>) -> Element {
    if base.is_none() {
        tracing::debug!("no base address; references left as-is");
        return root;
    }
    rewrite_children(root, &mut |node| match node {
        Node::Element(mut el) => {
            if el.is("a") {
                resolve_attr(&mut el, "href", base);
            } else if el.is("img") {
                resolve_attr(&mut el, "src", base);
            }
            Rewrite::Keep(Node::Element(el))
        }
        other => Rewrite::Keep(other),
    })
}

fn resolve_attr(el: &mut Element, attr: &str, base: Option<&Url>) {
    let Some(value) = el.attr(attr) else {
        return;
    };
    match resolve(value, base) {
        Ok(Some(absolute)) => el.set_attr(attr, absolute),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "reference left unresolved"),
    }
}

/// Resolve one reference.
///
/// Returns `Ok(None)` when the reference must not be rewritten.
pub fn resolve(reference: &str, base: Option<&Url>) -> Result<Option<String>, ExtractError> {
    let trimmed = reference.trim();
    if is_exempt(trimmed) {
        return Ok(None);
    }
    let Some(base) = base else {
        return Err(ExtractError::resolve(
            reference,
            "resolve reference",
            Some(anyhow::anyhow!("no base address")),
        ));
    };
    base.join(trimmed)
        .map(|u| Some(u.to_string()))
        .map_err(|e| ExtractError::resolve(reference, "resolve reference", Some(e.into())))
}

fn is_exempt(reference: &str) -> bool {
    reference.is_empty()
        || reference.starts_with('#')
        || reference
            .get(..7)
            .map_or(false, |s| s.eq_ignore_ascii_case("mailto:"))
        || Url::parse(reference).is_ok()
}
