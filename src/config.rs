//! Configuration types for a page scan.
//!
//! All scan behaviour is controlled through [`ScanConfig`], built via its
//! [`ScanConfigBuilder`]. Keeping every knob in one struct makes it trivial
//! to share configs across calls, log them, and diff two runs to understand
//! why their outputs differ.
//!
//! # Design choice: builder over constructor
//! A ten-field constructor is unreadable and breaks on every new field. The
//! builder pattern lets callers set only what they care about and rely on
//! well-documented defaults for the rest.

use crate::error::ScanError;
use edgequake_llm::LLMProvider;
use std::fmt;
use std::sync::Arc;

/// Configuration for one page scan.
///
/// Built via [`ScanConfig::builder()`] or using [`ScanConfig::default()`].
///
/// # Example
/// ```rust
/// use web2caption::ScanConfig;
///
/// let config = ScanConfig::builder()
///     .quota(3)
///     .fetch_timeout_secs(5)
///     .model("gpt-4.1-nano")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ScanConfig {
    /// Maximum number of successful captions collected per scan. Default: 5.
    ///
    /// The pipeline stops as soon as this many candidates have produced a
    /// caption, regardless of how many more images the page contains. This
    /// is a bounded-cost policy, not a relevance ranking — candidates past
    /// the cutoff are never considered.
    pub quota: usize,

    /// Minimum width × height (in pixels) a decoded image must reach to be
    /// captioned. Default: 200.
    ///
    /// Guards against icons, spacers, and tracking pixels. The check runs
    /// after decode because dimensions are only known then.
    pub min_pixel_area: u32,

    /// Per-request timeout in seconds, applied to the page fetch and to each
    /// image fetch. Default: 10.
    pub fetch_timeout_secs: u64,

    /// `User-Agent` header sent on every request. Default: `"Mozilla/5.0"`.
    ///
    /// Many sites return an error page (or nothing) to clients with no
    /// browser-looking agent string; the default is the minimum that gets
    /// past trivial bot-blocking.
    pub user_agent: String,

    /// Maximum tokens the model may generate per caption. Default: 50.
    ///
    /// A caption is one sentence; 50 tokens covers it with room to spare
    /// while keeping per-image cost predictable. The bound is in generated
    /// tokens, not characters.
    pub max_caption_tokens: usize,

    /// Sampling temperature for the caption completion. Default: 0.1.
    ///
    /// Low temperature keeps the model describing what it sees rather than
    /// embellishing. Higher values produce flowery captions that drift from
    /// the image content.
    pub temperature: f32,

    /// Custom captioning system prompt. If None, uses the built-in default.
    pub caption_prompt: Option<String>,

    /// Model identifier, e.g. "gpt-4.1-nano", "pixtral-12b-2409".
    /// If None, uses the provider default.
    pub model: Option<String>,

    /// Provider name (e.g. "openai", "anthropic", "ollama").
    /// If None along with `provider`, uses `ProviderFactory::from_env()`.
    pub provider_name: Option<String>,

    /// Pre-constructed model provider. Takes precedence over `provider_name`.
    ///
    /// The handle is long-lived: the surrounding application constructs it
    /// once at startup and injects it here, so model load cost is paid
    /// before the first scan.
    pub provider: Option<Arc<dyn LLMProvider>>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            quota: 5,
            min_pixel_area: 200,
            fetch_timeout_secs: 10,
            user_agent: "Mozilla/5.0".to_string(),
            max_caption_tokens: 50,
            temperature: 0.1,
            caption_prompt: None,
            model: None,
            provider_name: None,
            provider: None,
        }
    }
}

impl fmt::Debug for ScanConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanConfig")
            .field("quota", &self.quota)
            .field("min_pixel_area", &self.min_pixel_area)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_caption_tokens", &self.max_caption_tokens)
            .field("temperature", &self.temperature)
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .finish()
    }
}

impl ScanConfig {
    /// Create a new builder for `ScanConfig`.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ScanConfig`].
#[derive(Debug)]
pub struct ScanConfigBuilder {
    config: ScanConfig,
}

impl ScanConfigBuilder {
    pub fn quota(mut self, n: usize) -> Self {
        self.config.quota = n.max(1);
        self
    }

    pub fn min_pixel_area(mut self, area: u32) -> Self {
        self.config.min_pixel_area = area;
        self
    }

    pub fn fetch_timeout_secs(mut self, secs: u64) -> Self {
        self.config.fetch_timeout_secs = secs.max(1);
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    pub fn max_caption_tokens(mut self, n: usize) -> Self {
        self.config.max_caption_tokens = n;
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn caption_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.caption_prompt = Some(prompt.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ScanConfig, ScanError> {
        let c = &self.config;
        if c.quota == 0 {
            return Err(ScanError::InvalidConfig("Quota must be ≥ 1".into()));
        }
        if c.max_caption_tokens == 0 {
            return Err(ScanError::InvalidConfig(
                "max_caption_tokens must be ≥ 1".into(),
            ));
        }
        if c.user_agent.is_empty() {
            return Err(ScanError::InvalidConfig(
                "user_agent must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_behaviour() {
        let config = ScanConfig::default();
        assert_eq!(config.quota, 5);
        assert_eq!(config.min_pixel_area, 200);
        assert_eq!(config.fetch_timeout_secs, 10);
        assert_eq!(config.max_caption_tokens, 50);
        assert_eq!(config.user_agent, "Mozilla/5.0");
    }

    #[test]
    fn builder_clamps_quota_to_one() {
        let config = ScanConfig::builder().quota(0).build().unwrap();
        assert_eq!(config.quota, 1);
    }

    #[test]
    fn builder_clamps_temperature() {
        let config = ScanConfig::builder().temperature(9.0).build().unwrap();
        assert_eq!(config.temperature, 2.0);
    }

    #[test]
    fn build_rejects_empty_user_agent() {
        let result = ScanConfig::builder().user_agent("").build();
        assert!(matches!(result, Err(ScanError::InvalidConfig(_))));
    }
}
