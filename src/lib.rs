//! # web2caption
//!
//! Discover images on a web page and caption them with a Vision Language
//! Model (VLM).
//!
//! ## Why this crate?
//!
//! A page's `<img>` soup is mostly noise — tracking pixels, icons, SVG
//! logos, lazy-load placeholders, broken links. This crate walks the markup
//! once, resolves each reference into something actually fetchable, throws
//! away the assets that cannot be photographs, and hands the survivors to a
//! vision model one at a time until a fixed number of captions has been
//! collected. A bad candidate costs a log line, never the scan.
//!
//! ## Pipeline Overview
//!
//! ```text
//! page URL
//!  │
//!  ├─ 1. Fetch    download the page markup (the only fatal network step)
//!  ├─ 2. Extract  raw refs from <img> src / data-src / srcset, in order
//!  ├─ 3. Resolve  make each ref absolute; drop data URIs and vector formats
//!  ├─ 4. Fetch    bounded GET per image, decode, normalise to RGB
//!  ├─ 5. Filter   drop icons/spacers below the pixel-area threshold
//!  └─ 6. Caption  one VLM call per image, stop at the quota (default 5)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use web2caption::{scan, ScanConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider auto-detected from OPENAI_API_KEY / ANTHROPIC_API_KEY / …
//!     let config = ScanConfig::default();
//!     let output = scan("https://en.wikipedia.org/wiki/Bicycle", &config).await?;
//!     for item in &output.captions {
//!         println!("{} — {}", item.image_url, item.caption);
//!     }
//!     eprintln!("captioned {}/{} candidates",
//!         output.stats.captioned,
//!         output.stats.discovered);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `web2caption` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! web2caption = { version = "0.1", default-features = false }
//! ```
//!
//! ## Failure model
//!
//! Only three things fail a scan: an invalid page URL, a failed page fetch,
//! and an unconfigured model provider. Everything that can go wrong with an
//! individual image — unresolvable reference, SVG, timeout, 404, corrupt
//! bytes, tiny dimensions, a model error — drops that one candidate and is
//! visible only in the logs and the [`ScanStats`] counters.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod scan;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ScanConfig, ScanConfigBuilder};
pub use error::{CandidateError, ScanError};
pub use output::{CaptionResult, ScanOutput, ScanStats};
pub use scan::{scan, scan_markup, scan_sync};
