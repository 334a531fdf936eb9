//! Typolens CLI
//!
//! Runs one typography analysis and writes the report as JSON.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use typolens::{classify, AnalysisOptions, Analyzer};

#[derive(Parser)]
#[command(name = "typolens")]
#[command(author, version, about = "Typography analysis for rendered web pages")]
struct Cli {
    /// Page to analyze (http/https)
    url: String,

    /// Include elements hidden via display, visibility, or zero opacity
    #[arg(long)]
    include_hidden: bool,

    /// Maximum number of elements to extract (1-1000)
    #[arg(long, default_value_t = typolens::DEFAULT_MAX_ELEMENTS)]
    max_elements: usize,

    /// Navigation timeout in milliseconds (5000-60000)
    #[arg(long, default_value_t = typolens::DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,

    /// Write the report to a file instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,

    /// Enable verbose logging
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if !cli.url.starts_with("http://") && !cli.url.starts_with("https://") {
        bail!("only http and https URLs are supported");
    }

    let options = AnalysisOptions {
        include_hidden: cli.include_hidden,
        max_elements: cli.max_elements,
        timeout_ms: cli.timeout_ms,
    }
    .clamped();

    let analyzer = Analyzer::new();
    let report = match analyzer.analyze(&cli.url, options).await {
        Ok(report) => report,
        Err(error) => {
            let classified = classify(&error);
            log::debug!("underlying failure: {}", error);
            bail!(
                "{} (code {}, status {})",
                classified.message,
                classified.code,
                classified.status
            );
        }
    };

    let json = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };

    match cli.output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        None => println!("{}", json),
    }

    Ok(())
}
