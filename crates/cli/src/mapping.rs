// ABOUTME: The page mapping (output slug -> source URLs) and output filename rules.
// ABOUTME: A mapping file describes which legacy pages combine into each rebuilt page.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use url::Url;

/// Slug used when a URL yields nothing usable for a filename.
const FALLBACK_SLUG: &str = "scraped_content";

/// Load a mapping file: a JSON object of output slug to the list of source
/// URLs whose content combines into that page.
pub fn load_mapping(path: &Path) -> anyhow::Result<BTreeMap<String, Vec<String>>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading mapping file {}", path.display()))?;
    let mapping: BTreeMap<String, Vec<String>> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing mapping file {}", path.display()))?;
    Ok(mapping)
}

/// Derive a filesystem-safe slug from a URL's first path segment.
pub fn slug_for(url: &str) -> String {
    let segment = Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut segments| segments.next().map(|s| s.to_string()))
        })
        .unwrap_or_default();

    let slug: String = segment
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                '-'
            }
        })
        .collect();

    if slug.chars().all(|c| c == '-') {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Default output filename for an ad-hoc URL scrape: the first URL's slug
/// for a single page, a fixed merge name otherwise.
pub fn output_filename(urls: &[String]) -> String {
    if urls.len() == 1 {
        format!("{}.json", slug_for(&urls[0]))
    } else {
        "merged_scraped_content.json".to_string()
    }
}

/// Slugs may contain `/` to express nesting; flatten for the filesystem.
pub fn slug_filename(slug: &str) -> String {
    format!("{}.json", slug.replace('/', "-"))
}
