// ABOUTME: CLI binary for the pagelift content-migration scraper.
// ABOUTME: Scrapes source URLs (ad hoc or via a page mapping) and writes block JSON files.

mod mapping;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use pagelift_extract::{Client, ExtractMode, PageExtract};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "pagelift")]
#[command(about = "Scrape legacy pages into content-block JSON for a site rebuild")]
struct Args {
    /// Extraction mode: sections (default) or blocks
    #[arg(long = "mode", default_value = "sections")]
    mode: String,

    /// Output file path for ad-hoc URL scrapes (default: derived from the URL)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Page mapping file: JSON object of output slug -> source URL list
    #[arg(long = "mapping")]
    mapping: Option<PathBuf>,

    /// Directory for per-slug output files in mapping mode
    #[arg(long = "out-dir", default_value = ".")]
    out_dir: PathBuf,

    /// Minimum approximate word count for a section to be kept
    #[arg(long = "min-words", default_value_t = 20)]
    min_words: usize,

    /// Request timeout in seconds
    #[arg(long = "timeout", default_value_t = 15)]
    timeout: u64,

    /// Override the User-Agent header
    #[arg(long = "user-agent")]
    user_agent: Option<String>,

    /// Allow fetching from private/local networks
    #[arg(long = "allow-private-networks")]
    allow_private_networks: bool,

    /// Write compact JSON instead of pretty-printed
    #[arg(long = "compact")]
    compact: bool,

    /// Source URLs to scrape and merge into one document
    #[arg()]
    urls: Vec<String>,
}

fn write_extract(extract: &PageExtract, path: &Path, compact: bool) -> anyhow::Result<()> {
    let json = if compact {
        serde_json::to_string(extract)?
    } else {
        serde_json::to_string_pretty(extract)?
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, json)?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    // Validate args
    if args.mapping.is_some() && !args.urls.is_empty() {
        eprintln!("error: cannot use both --mapping and positional URLs");
        return ExitCode::from(1);
    }
    if args.mapping.is_none() && args.urls.is_empty() {
        eprintln!("error: at least one URL is required, or use --mapping");
        return ExitCode::from(1);
    }

    let mut builder = Client::builder()
        .mode(ExtractMode::from(args.mode.as_str()))
        .min_section_words(args.min_words)
        .timeout(Duration::from_secs(args.timeout))
        .allow_private_networks(args.allow_private_networks);
    if let Some(user_agent) = &args.user_agent {
        builder = builder.user_agent(user_agent);
    }
    let client = builder.build();

    let mut had_error = false;

    if let Some(mapping_path) = &args.mapping {
        // Mapping mode: one output document per slug.
        let mapping = match mapping::load_mapping(mapping_path) {
            Ok(m) => m,
            Err(e) => {
                error!(error = %e, "could not load mapping");
                return ExitCode::from(1);
            }
        };

        info!(pages = mapping.len(), "starting mapped migration scrape");

        for (slug, urls) in &mapping {
            info!(slug = %slug, sources = urls.len(), "building page");
            let outcome = client.scrape_group(urls).await;
            if !outcome.failures.is_empty() {
                had_error = true;
            }

            let path = args.out_dir.join(mapping::slug_filename(slug));
            match write_extract(&outcome.extract, &path, args.compact) {
                Ok(()) => info!(
                    slug = %slug,
                    blocks = outcome.extract.total_blocks,
                    path = %path.display(),
                    "saved"
                ),
                Err(e) => {
                    error!(slug = %slug, error = %e, "could not write output");
                    had_error = true;
                }
            }
        }
    } else {
        // Ad-hoc mode: merge all URLs into one document.
        info!(urls = args.urls.len(), "starting multi-page scrape");
        let outcome = client.scrape_group(&args.urls).await;
        if !outcome.failures.is_empty() {
            had_error = true;
        }

        let path = args
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(mapping::output_filename(&args.urls)));
        match write_extract(&outcome.extract, &path, args.compact) {
            Ok(()) => info!(
                processed = args.urls.len() - outcome.failures.len(),
                total = args.urls.len(),
                blocks = outcome.extract.total_blocks,
                path = %path.display(),
                "saved"
            ),
            Err(e) => {
                error!(error = %e, "could not write output");
                had_error = true;
            }
        }
    }

    if had_error {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
