//! Captioner adapter: one decoded image in, one caption string out.
//!
//! This module converts a decoded image into a vision API call and returns
//! the cleaned caption. It is intentionally thin — the prompt lives in
//! [`crate::prompts`] so it can be changed without touching the call or
//! error handling here.
//!
//! There is no retry policy: a failed caption drops its candidate exactly
//! like a failed fetch does, and the coordinator moves on. The call is
//! awaited to completion before the next candidate starts, so the model
//! handle sees one inference at a time.

use crate::config::ScanConfig;
use crate::error::CandidateError;
use crate::pipeline::fetch::DecodedImage;
use crate::prompts::DEFAULT_CAPTION_PROMPT;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use edgequake_llm::{ChatMessage, CompletionOptions, ImageData, LLMProvider};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::Cursor;
use std::sync::Arc;
use tracing::debug;

/// Caption one image via the model provider.
///
/// ## Message Layout
///
/// The request contains (in order):
/// 1. **System message** — the captioning rules (or user-supplied override)
/// 2. **User message** — the image as a base64 PNG attachment with empty
///    text
///
/// The empty user text is intentional: vision APIs require at least one user
/// turn to respond to, but the image carries all the actual input.
pub async fn caption_image(
    provider: &Arc<dyn LLMProvider>,
    img: &DecodedImage,
    config: &ScanConfig,
) -> Result<String, CandidateError> {
    let image_data = encode_image(img).map_err(|e| CandidateError::CaptionFailed {
        reason: format!("image encoding failed: {e}"),
    })?;

    let prompt = config
        .caption_prompt
        .as_deref()
        .unwrap_or(DEFAULT_CAPTION_PROMPT);

    let messages = vec![
        ChatMessage::system(prompt),
        ChatMessage::user_with_images("", vec![image_data]),
    ];

    let options = build_options(config);

    let response = provider
        .chat(&messages, Some(&options))
        .await
        .map_err(|e| CandidateError::CaptionFailed {
            reason: e.to_string(),
        })?;

    debug!(
        "caption call used {} input / {} output tokens",
        response.prompt_tokens, response.completion_tokens
    );

    let caption = clean_caption(&response.content);
    if caption.is_empty() {
        return Err(CandidateError::CaptionFailed {
            reason: "model returned an empty caption".to_string(),
        });
    }

    Ok(caption)
}

/// Encode a decoded image as a base64 PNG ready for the vision API.
///
/// PNG over JPEG: re-encoding an already lossy web JPEG with a second lossy
/// pass degrades exactly the detail the model is asked to describe.
fn encode_image(img: &DecodedImage) -> Result<ImageData, image::ImageError> {
    let mut buf = Vec::new();
    img.as_rgb()
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;

    let b64 = STANDARD.encode(&buf);
    debug!("encoded image → {} bytes base64", b64.len());

    Ok(ImageData::new(b64, "image/png"))
}

/// Build `CompletionOptions` from the scan config.
fn build_options(config: &ScanConfig) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(config.temperature),
        max_tokens: Some(config.max_caption_tokens),
        ..Default::default()
    }
}

// ── Caption cleanup ──────────────────────────────────────────────────────────

static RE_OUTER_FENCES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```[a-z]*\n?(.*?)\n?```\s*$").unwrap());

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Strip model formatting artefacts from a raw caption.
///
/// Even with a prompt that forbids it, models occasionally wrap the caption
/// in quotes or code fences, or pad it with newlines. Three deterministic
/// passes: unwrap fences, collapse whitespace runs to single spaces, unwrap
/// one layer of surrounding quotes.
pub fn clean_caption(raw: &str) -> String {
    let s = raw.trim();
    let s = match RE_OUTER_FENCES.captures(s) {
        Some(caps) => caps[1].to_string(),
        None => s.to_string(),
    };
    let s = RE_WHITESPACE.replace_all(s.trim(), " ").to_string();
    strip_wrapping_quotes(&s).to_string()
}

fn strip_wrapping_quotes(s: &str) -> &str {
    for (open, close) in [('"', '"'), ('\'', '\''), ('“', '”')] {
        if s.len() >= 2 && s.starts_with(open) && s.ends_with(close) {
            return &s[open.len_utf8()..s.len() - close.len_utf8()];
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_options_defaults() {
        let config = ScanConfig::default();
        let opts = build_options(&config);
        assert_eq!(opts.temperature, Some(0.1));
        assert_eq!(opts.max_tokens, Some(50));
    }

    #[test]
    fn encode_small_image() {
        let img = DecodedImage::new(image::DynamicImage::ImageRgb8(
            image::RgbImage::from_pixel(10, 10, image::Rgb([255, 0, 0])),
        ));
        let data = encode_image(&img).expect("encode should succeed");
        assert_eq!(data.mime_type, "image/png");
        let decoded = STANDARD.decode(&data.data).expect("valid base64");
        assert!(!decoded.is_empty());
    }

    #[test]
    fn clean_caption_trims_and_collapses_whitespace() {
        assert_eq!(
            clean_caption("  a dog \n running on  the beach \n"),
            "a dog running on the beach"
        );
    }

    #[test]
    fn clean_caption_strips_wrapping_quotes() {
        assert_eq!(clean_caption("\"a red car\""), "a red car");
        assert_eq!(clean_caption("“a red car”"), "a red car");
    }

    #[test]
    fn clean_caption_keeps_interior_quotes() {
        assert_eq!(
            clean_caption("a sign reading \"open\" on a door"),
            "a sign reading \"open\" on a door"
        );
    }

    #[test]
    fn clean_caption_unwraps_code_fences() {
        assert_eq!(clean_caption("```\na city skyline\n```"), "a city skyline");
        assert_eq!(clean_caption("```text\na city skyline\n```"), "a city skyline");
    }

    #[test]
    fn clean_caption_of_empty_is_empty() {
        assert_eq!(clean_caption("   \n "), "");
    }
}
