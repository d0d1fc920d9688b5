//! Reference extraction: pull raw image references out of page markup.
//!
//! One pass over the document's `<img>` elements, in document order. Each
//! element contributes at most one reference, chosen by attribute priority:
//! `src`, else the lazy-load `data-src`, else the first candidate of
//! `srcset`. An element with none of these yields nothing — that is a normal
//! outcome, not an error.
//!
//! The collected `Vec` is deliberate: `scraper::Html` is not `Send`, so the
//! document must be fully consumed before the coordinator's first `await`.
//! The sequence stays single-pass, finite, and ordered.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

static IMG_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    // Static selector string; parse cannot fail.
    Selector::parse("img").unwrap()
});

/// Extract raw image references from page markup, in document order.
pub fn image_refs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let refs: Vec<String> = document
        .select(&IMG_SELECTOR)
        .filter_map(ref_from_element)
        .collect();
    debug!("extracted {} image references", refs.len());
    refs
}

/// Pick the reference for one `<img>` element, or `None` if it carries no
/// usable source attribute. An attribute that is present but empty counts
/// as absent, so the fallback chain keeps going.
fn ref_from_element(el: ElementRef<'_>) -> Option<String> {
    let v = el.value();
    v.attr("src")
        .filter(|s| !s.is_empty())
        .or_else(|| v.attr("data-src").filter(|s| !s.is_empty()))
        .map(|s| s.to_string())
        .or_else(|| v.attr("srcset").and_then(first_srcset_entry))
        .filter(|s| !s.is_empty())
}

/// First entry of a `srcset` attribute: the URL token of the first
/// comma-separated candidate, ignoring any width/density descriptor.
///
/// The first entry wins regardless of declared resolution — this can pick a
/// deliberately low-resolution variant, and that is the documented
/// behaviour.
fn first_srcset_entry(srcset: &str) -> Option<String> {
    srcset
        .split(',')
        .next()?
        .split_whitespace()
        .next()
        .map(|s| s.to_string())
}
