//! System prompt for image captioning.
//!
//! Centralising the prompt here serves two purposes:
//!
//! 1. **Single source of truth** — changing the default captioning behaviour
//!    requires editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect the prompt directly without
//!    calling a real model.
//!
//! Callers can override the default via
//! [`crate::config::ScanConfig::caption_prompt`]; the constant here is used
//! only when no override is provided.

/// Default system prompt for captioning one image.
///
/// The user message that accompanies the image carries no text at all — the
/// image is the whole input, and the rules below shape the single-sentence
/// output. Used when `ScanConfig::caption_prompt` is `None`.
pub const DEFAULT_CAPTION_PROMPT: &str = r#"You are an image captioning model. Describe the image in one short sentence.

Rules:
- Describe only what is visible; do not guess at context outside the frame
- Plain language, no flourishes
- Output ONLY the caption text
- Do NOT wrap the caption in quotes or markdown
- Do NOT add commentary, labels, or explanations"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_prompt_forbids_wrapping() {
        assert!(DEFAULT_CAPTION_PROMPT.contains("ONLY the caption"));
        assert!(DEFAULT_CAPTION_PROMPT.contains("quotes"));
    }
}
