//! Scan entry points: drive the pipeline over one page.
//!
//! [`scan`] fetches the page markup and hands it to [`scan_markup`], which
//! runs the candidate loop. The page fetch is the single place a network
//! failure propagates to the caller — without markup there is nothing to
//! extract. Every failure after that point is per-candidate: logged,
//! counted, skipped.

use crate::config::ScanConfig;
use crate::error::{CandidateError, ScanError};
use crate::output::{CaptionResult, ScanOutput, ScanStats};
use crate::pipeline::{caption, extract, fetch, filter, resolve};
use edgequake_llm::{LLMProvider, ProviderFactory};
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

/// Scan a web page and caption up to `config.quota` of its images.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `page_url` — Absolute http/https URL of the page to scan
/// * `config` — Scan configuration
///
/// # Returns
/// `Ok(ScanOutput)` with 0 to `quota` captioned images. A page with no
/// qualifying images is a success with an empty list, not an error.
///
/// # Errors
/// Returns `Err(ScanError)` only for fatal problems: an invalid page URL,
/// a failed page fetch, or an unconfigured captioning provider.
pub async fn scan(
    page_url: impl AsRef<str>,
    config: &ScanConfig,
) -> Result<ScanOutput, ScanError> {
    let page_url = page_url.as_ref();
    let page = parse_page_url(page_url)?;
    let client = build_client(config)?;

    info!("Scanning page: {}", page_url);
    let html = fetch_markup(&client, &page, config.fetch_timeout_secs).await?;

    run_pipeline(&html, &page, &client, config).await
}

/// Run the pipeline over markup the caller already holds.
///
/// Useful when the surrounding application performs the page fetch itself
/// (server-side render, cached body, test fixture) — the pipeline consumes
/// the body as text either way. `page_url` is still required: root- and
/// scheme-relative references resolve against it.
pub async fn scan_markup(
    html: &str,
    page_url: impl AsRef<str>,
    config: &ScanConfig,
) -> Result<ScanOutput, ScanError> {
    let page = parse_page_url(page_url.as_ref())?;
    let client = build_client(config)?;
    run_pipeline(html, &page, &client, config).await
}

/// Synchronous wrapper around [`scan`].
///
/// Creates a temporary tokio runtime internally.
pub fn scan_sync(
    page_url: impl AsRef<str>,
    config: &ScanConfig,
) -> Result<ScanOutput, ScanError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ScanError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(scan(page_url, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// The candidate loop: extract once, then resolve → fetch → filter →
/// caption each reference in discovery order until the quota fills or the
/// candidates run out.
async fn run_pipeline(
    html: &str,
    page: &Url,
    client: &Client,
    config: &ScanConfig,
) -> Result<ScanOutput, ScanError> {
    let total_start = Instant::now();

    let refs = extract::image_refs(html);
    info!("Found {} image elements", refs.len());

    let mut stats = ScanStats {
        discovered: refs.len(),
        ..ScanStats::default()
    };

    // A page without images is a complete, empty result — settled before
    // the provider is even looked up.
    if refs.is_empty() {
        stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
        return Ok(ScanOutput {
            captions: Vec::new(),
            stats,
        });
    }

    let provider = resolve_provider(config)?;

    let mut captions: Vec<CaptionResult> = Vec::with_capacity(config.quota);

    for (idx, raw) in refs.iter().enumerate() {
        // Capacity check up front: a full accumulator means no further
        // candidate is even attempted.
        if captions.len() >= config.quota {
            debug!(
                "Quota of {} reached, ignoring remaining {} candidates",
                config.quota,
                refs.len() - idx
            );
            break;
        }

        let resolved = match resolve::resolve(raw, page) {
            Ok(url) => url,
            Err(e) => {
                debug!("Candidate {}: {}", idx + 1, e);
                stats.skipped += 1;
                continue;
            }
        };
        stats.resolved += 1;

        match caption_candidate(&provider, client, &resolved, config).await {
            Ok((text, model_ms)) => {
                stats.captioned += 1;
                stats.caption_duration_ms += model_ms;
                captions.push(CaptionResult {
                    image_url: resolved.to_string(),
                    caption: text,
                });
            }
            Err(e) => {
                warn!("Candidate {} ({}): {}", idx + 1, resolved, e);
                stats.skipped += 1;
            }
        }
    }

    stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
    info!(
        "Scan complete: {}/{} candidates captioned, {}ms total",
        stats.captioned, stats.discovered, stats.total_duration_ms
    );

    Ok(ScanOutput { captions, stats })
}

/// Fetch, size-filter, and caption one resolved candidate.
///
/// Returns the cleaned caption and the milliseconds spent inside the model
/// call. Any error here belongs to this candidate alone.
async fn caption_candidate(
    provider: &Arc<dyn LLMProvider>,
    client: &Client,
    url: &Url,
    config: &ScanConfig,
) -> Result<(String, u64), CandidateError> {
    let img = fetch::fetch_image(client, url, config.fetch_timeout_secs).await?;

    if !filter::meets_min_area(img.width(), img.height(), config.min_pixel_area) {
        return Err(CandidateError::TooSmall {
            width: img.width(),
            height: img.height(),
        });
    }

    let model_start = Instant::now();
    let text = caption::caption_image(provider, &img, config).await?;
    Ok((text, model_start.elapsed().as_millis() as u64))
}

/// Validate the caller-supplied page reference.
fn parse_page_url(page_url: &str) -> Result<Url, ScanError> {
    let url = Url::parse(page_url).map_err(|e| ScanError::InvalidPageUrl {
        url: page_url.to_string(),
        reason: e.to_string(),
    })?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ScanError::InvalidPageUrl {
            url: page_url.to_string(),
            reason: "only http/https is supported".to_string(),
        });
    }
    Ok(url)
}

/// One client per scan: carries the configured `User-Agent` on every
/// request and bounds each of them with the same timeout.
fn build_client(config: &ScanConfig) -> Result<Client, ScanError> {
    Client::builder()
        .timeout(Duration::from_secs(config.fetch_timeout_secs))
        .user_agent(&config.user_agent)
        .build()
        .map_err(|e| ScanError::Internal(format!("Failed to build HTTP client: {e}")))
}

/// Fetch the page body as text. The sole step whose failure is fatal.
async fn fetch_markup(
    client: &Client,
    page: &Url,
    timeout_secs: u64,
) -> Result<String, ScanError> {
    let response = client.get(page.clone()).send().await.map_err(|e| {
        if e.is_timeout() {
            ScanError::PageFetchTimeout {
                url: page.to_string(),
                secs: timeout_secs,
            }
        } else {
            ScanError::PageFetchFailed {
                url: page.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(ScanError::PageHttpStatus {
            url: page.to_string(),
            status: response.status().as_u16(),
        });
    }

    response.text().await.map_err(|e| ScanError::PageFetchFailed {
        url: page.to_string(),
        reason: e.to_string(),
    })
}

/// Resolve the captioning provider, from most-specific to least-specific.
///
/// The fallback chain lets library users and CLI users each set exactly as
/// much or as little as they need:
///
/// 1. **Pre-built provider** (`config.provider`) — the caller constructed
///    and configured the handle entirely; we use it as-is. This is also the
///    injection point for a model the surrounding application loaded once
///    at startup.
///
/// 2. **Named provider + model** (`config.provider_name`) — reads the
///    corresponding API key from the environment.
///
/// 3. **Environment pair** (`EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`) —
///    a provider and model chosen at the execution-environment level.
///
/// 4. **Full auto-detection** (`ProviderFactory::from_env`) — scans known
///    API key variables and picks the first available provider, preferring
///    OpenAI when its key is present.
fn resolve_provider(config: &ScanConfig) -> Result<Arc<dyn LLMProvider>, ScanError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    if let Some(ref name) = config.provider_name {
        let model = config.model.as_deref().unwrap_or("gpt-4.1-nano");
        return create_vision_provider(name, model);
    }

    if let (Ok(prov), Ok(model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return create_vision_provider(&prov, &model);
        }
    }

    if let Ok(openai_key) = std::env::var("OPENAI_API_KEY") {
        if !openai_key.is_empty() {
            let model = config.model.as_deref().unwrap_or("gpt-4.1-nano");
            return create_vision_provider("openai", model);
        }
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| ScanError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No captioning provider could be auto-detected from environment.\n\
                Set OPENAI_API_KEY, ANTHROPIC_API_KEY, or configure a provider.\n\
                Error: {}",
                e
            ),
        })?;

    Ok(llm_provider)
}

/// Instantiate a named provider with the given model.
fn create_vision_provider(
    provider_name: &str,
    model: &str,
) -> Result<Arc<dyn LLMProvider>, ScanError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        ScanError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_url_must_be_absolute() {
        let err = parse_page_url("/relative/path").unwrap_err();
        assert!(matches!(err, ScanError::InvalidPageUrl { .. }));
    }

    #[test]
    fn page_url_must_be_http_or_https() {
        let err = parse_page_url("ftp://example.com/gallery").unwrap_err();
        assert!(matches!(err, ScanError::InvalidPageUrl { .. }));
    }

    #[test]
    fn https_page_url_is_accepted() {
        let url = parse_page_url("https://example.com/blog").unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
    }

    #[test]
    fn client_builds_with_defaults() {
        let config = ScanConfig::default();
        assert!(build_client(&config).is_ok());
    }
}
