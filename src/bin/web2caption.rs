//! CLI binary for web2caption.
//!
//! A thin shim over the library crate that maps CLI flags to `ScanConfig`
//! and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use web2caption::{scan, ScanConfig};

#[derive(Parser, Debug)]
#[command(
    name = "web2caption",
    version,
    about = "Caption the images on a web page with a Vision Language Model"
)]
struct Cli {
    /// Page URL to scan (absolute, http or https).
    url: String,

    /// Maximum number of captions to collect.
    #[arg(long, default_value_t = 5)]
    quota: usize,

    /// Per-request timeout in seconds (page and images).
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Minimum width × height (pixels) for an image to be captioned.
    #[arg(long, default_value_t = 200)]
    min_area: u32,

    /// Model identifier, e.g. "gpt-4.1-nano" (provider default if unset).
    #[arg(long)]
    model: Option<String>,

    /// Provider name: openai, anthropic, gemini, mistral, ollama, lmstudio.
    /// Auto-detected from environment API keys if unset.
    #[arg(long, env = "WEB2CAPTION_PROVIDER")]
    provider: Option<String>,

    /// Emit the full result (captions + stats) as JSON on stdout.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut builder = ScanConfig::builder()
        .quota(cli.quota)
        .fetch_timeout_secs(cli.timeout)
        .min_pixel_area(cli.min_area);
    if let Some(model) = cli.model {
        builder = builder.model(model);
    }
    if let Some(provider) = cli.provider {
        builder = builder.provider_name(provider);
    }
    let config = builder.build().context("invalid configuration")?;

    let output = scan(&cli.url, &config)
        .await
        .with_context(|| format!("scan of '{}' failed", cli.url))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if output.captions.is_empty() {
        eprintln!("No qualifying images found on {}", cli.url);
        return Ok(());
    }

    for (i, item) in output.captions.iter().enumerate() {
        println!("{}. {}", i + 1, item.caption);
        println!("   {}", item.image_url);
    }
    eprintln!(
        "{}/{} candidates captioned in {}ms",
        output.stats.captioned, output.stats.discovered, output.stats.total_duration_ms
    );

    Ok(())
}
