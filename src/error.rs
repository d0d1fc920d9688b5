//! Error types for the web2caption library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ScanError`] — **Fatal**: the scan cannot proceed at all (the page
//!   itself could not be fetched, no provider is configured, the config is
//!   invalid). Returned as `Err(ScanError)` from the top-level `scan*`
//!   functions.
//!
//! * [`CandidateError`] — **Non-fatal**: a single image candidate failed
//!   somewhere between extraction and captioning. The coordinator logs it,
//!   counts it, and moves on to the next candidate; it never reaches the
//!   caller as an `Err`.
//!
//! The split keeps the caller-visible contract simple: the only outcome a
//! caller ever sees for candidate-level trouble is a shorter (possibly
//! empty) result list.

use thiserror::Error;

/// All fatal errors returned by the web2caption library.
///
/// Candidate-level failures use [`CandidateError`] and are swallowed by the
/// coordinator rather than propagated here.
#[derive(Debug, Error)]
pub enum ScanError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The supplied page reference is not an absolute http/https URL.
    #[error("Invalid page URL '{url}': {reason}")]
    InvalidPageUrl { url: String, reason: String },

    /// The page markup request failed at the transport level.
    #[error("Failed to fetch page '{url}': {reason}\nCheck your internet connection.")]
    PageFetchFailed { url: String, reason: String },

    /// The page markup request exceeded the configured timeout.
    #[error("Page fetch timed out after {secs}s for '{url}'\nIncrease fetch_timeout_secs.")]
    PageFetchTimeout { url: String, secs: u64 },

    /// The page responded with a non-success status.
    #[error("Page '{url}' returned HTTP {status}")]
    PageHttpStatus { url: String, status: u16 },

    // ── Captioning-model errors ───────────────────────────────────────────
    /// The configured provider is not initialised (missing API key etc.).
    #[error("Captioning provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single image candidate.
///
/// Every pipeline stage is a partial function over its candidate: any of
/// these terminates one candidate's journey without touching the rest of the
/// scan. The coordinator pattern-matches on the `Result`, logs the variant,
/// and continues — no unwinding.
#[derive(Debug, Clone, Error)]
pub enum CandidateError {
    /// The raw reference could not be made absolute (data URI, bare
    /// filename, unparseable fragment).
    #[error("reference '{raw}' is not resolvable to an absolute URL")]
    Unresolvable { raw: String },

    /// The reference points at a vector image, which is never fetched.
    #[error("reference '{raw}' is a vector format")]
    VectorFormat { raw: String },

    /// The image request failed at the transport level.
    #[error("fetch failed: {reason}")]
    FetchFailed { reason: String },

    /// The image request exceeded the configured timeout.
    #[error("fetch timed out after {secs}s")]
    FetchTimeout { secs: u64 },

    /// The image host responded with a non-success status.
    #[error("fetch returned HTTP {status}")]
    HttpStatus { status: u16 },

    /// The response body is not a decodable raster image.
    #[error("decode failed: {reason}")]
    DecodeFailed { reason: String },

    /// The decoded image is below the minimum pixel-area threshold.
    #[error("image too small ({width}x{height})")]
    TooSmall { width: u32, height: u32 },

    /// The captioning model call failed.
    #[error("caption failed: {reason}")]
    CaptionFailed { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_page_url_display() {
        let e = ScanError::InvalidPageUrl {
            url: "ftp://x".into(),
            reason: "only http/https is supported".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("ftp://x"), "got: {msg}");
        assert!(msg.contains("http/https"));
    }

    #[test]
    fn page_timeout_display() {
        let e = ScanError::PageFetchTimeout {
            url: "https://example.com".into(),
            secs: 10,
        };
        assert!(e.to_string().contains("10s"));
    }

    #[test]
    fn candidate_too_small_display() {
        let e = CandidateError::TooSmall {
            width: 1,
            height: 1,
        };
        assert!(e.to_string().contains("1x1"));
    }

    #[test]
    fn candidate_http_status_display() {
        let e = CandidateError::HttpStatus { status: 404 };
        assert!(e.to_string().contains("404"));
    }
}
