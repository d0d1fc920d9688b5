//! Reference resolution: raw markup reference → absolute fetchable URL.
//!
//! Markup references come in four shapes and the rules are applied in this
//! order:
//!
//! 1. scheme-relative `//host/path` → prefixed with `https:`
//! 2. root-relative `/path` → joined to the page **origin** (scheme + host,
//!    no trailing slash) — not to the full page URL, so
//!    `https://example.com/blog` + `/a.jpg` resolves to
//!    `https://example.com/a.jpg`
//! 3. already absolute (`http...`) → accepted unchanged
//! 4. anything else (data URIs, bare filenames) → unresolvable
//!
//! Vector-format references are rejected before any of this: an `.svg` is
//! never fetched, however cleanly it would resolve.

use crate::error::CandidateError;
use crate::pipeline::filter;
use url::Url;

/// Resolve a raw image reference against the page it was found on.
///
/// Returns a URL guaranteed to use `http` or `https` and to be fetchable
/// without further string transformation, or a [`CandidateError`] naming why
/// the candidate was dropped.
pub fn resolve(raw: &str, page: &Url) -> Result<Url, CandidateError> {
    if filter::is_vector_format(raw) {
        return Err(CandidateError::VectorFormat {
            raw: raw.to_string(),
        });
    }

    let absolute = if let Some(rest) = raw.strip_prefix("//") {
        format!("https://{rest}")
    } else if raw.starts_with('/') {
        // Url::origin() serialises as scheme://host[:port] with no trailing
        // slash, which is exactly the base the path concatenates onto.
        format!("{}{}", page.origin().ascii_serialization(), raw)
    } else if raw.starts_with("http") {
        raw.to_string()
    } else {
        return Err(CandidateError::Unresolvable {
            raw: raw.to_string(),
        });
    };

    let url = Url::parse(&absolute).map_err(|_| CandidateError::Unresolvable {
        raw: raw.to_string(),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(CandidateError::Unresolvable {
            raw: raw.to_string(),
        });
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn scheme_relative_gets_https() {
        let url = resolve("//cdn.example.com/x.jpg", &page("https://site.com")).unwrap();
        assert_eq!(url.as_str(), "https://cdn.example.com/x.jpg");
    }

    #[test]
    fn root_relative_joins_page_origin() {
        let url = resolve("/images/cat.png", &page("https://example.com/blog")).unwrap();
        assert_eq!(url.as_str(), "https://example.com/images/cat.png");
    }

    #[test]
    fn root_relative_keeps_explicit_port() {
        let url = resolve("/a.jpg", &page("http://localhost:8080/page")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/a.jpg");
    }

    #[test]
    fn absolute_http_passes_through_unchanged() {
        let url = resolve("http://x.test/b.jpg", &page("https://site.com")).unwrap();
        assert_eq!(url.as_str(), "http://x.test/b.jpg");
    }

    #[test]
    fn data_uri_is_unresolvable() {
        let err = resolve("data:image/png;base64,iVBOR", &page("https://site.com")).unwrap_err();
        assert!(matches!(err, CandidateError::Unresolvable { .. }));
    }

    #[test]
    fn bare_filename_is_unresolvable() {
        let err = resolve("photo.jpg", &page("https://site.com")).unwrap_err();
        assert!(matches!(err, CandidateError::Unresolvable { .. }));
    }

    #[test]
    fn empty_reference_is_unresolvable() {
        let err = resolve("", &page("https://site.com")).unwrap_err();
        assert!(matches!(err, CandidateError::Unresolvable { .. }));
    }

    #[test]
    fn svg_rejected_even_when_absolute() {
        let err = resolve("http://x/b.svg", &page("https://site.com")).unwrap_err();
        assert!(matches!(err, CandidateError::VectorFormat { .. }));
    }

    #[test]
    fn svg_rejected_anywhere_in_reference() {
        let err = resolve("/icons/logo.svg?v=2", &page("https://site.com")).unwrap_err();
        assert!(matches!(err, CandidateError::VectorFormat { .. }));
    }

    #[test]
    fn reference_mix_resolves_only_the_fetchable_two() {
        // <img src="/a.jpg"><img src="http://x/b.svg"><img data-src="//cdn/c.jpg">
        let base = page("https://site.com");
        let raws = ["/a.jpg", "http://x/b.svg", "//cdn/c.jpg"];
        let resolved: Vec<String> = raws
            .iter()
            .filter_map(|r| resolve(r, &base).ok())
            .map(|u| u.to_string())
            .collect();
        assert_eq!(resolved, vec!["https://site.com/a.jpg", "https://cdn/c.jpg"]);
    }
}
