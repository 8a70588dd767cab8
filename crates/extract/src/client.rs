// ABOUTME: The main Client for pagelift: fetches pages and runs the configured extractor.
// ABOUTME: Provides scrape() for one URL, extract_html() offline, and scrape_group() batches.

use std::net::ToSocketAddrs;

use scraper::Html;
use tracing::{info, warn};
use url::Url;

use crate::blocks::ContentBlock;
use crate::error::ScrapeError;
use crate::extractors::sections::extract_sections;
use crate::extractors::tree::extract_blocks;
use crate::options::{ClientBuilder, ExtractMode, Options};
use crate::resource::{fetch, FetchOptions};
use crate::result::PageExtract;

/// The blocks extracted from a single page, with the URL the content was
/// actually served from (after redirects).
#[derive(Debug, Clone)]
pub struct PageBlocks {
    pub url: String,
    pub blocks: Vec<ContentBlock>,
}

/// Outcome of a multi-URL scrape: the merged document plus the per-page
/// failures that were skipped along the way.
#[derive(Debug)]
pub struct BatchOutcome {
    pub extract: PageExtract,
    pub failures: Vec<ScrapeError>,
}

/// The pagelift scraping client.
pub struct Client {
    opts: Options,
    http_client: reqwest::Client,
}

impl Client {
    /// Create a new ClientBuilder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a new Client with the given options.
    pub fn new(opts: Options) -> Self {
        let http_client = opts.http_client.clone().unwrap_or_else(|| {
            let allow_private = opts.allow_private_networks;
            // Redirects re-run the private-address check; DNS here is
            // synchronous because reqwest's redirect policy is not async.
            let redirect_policy = reqwest::redirect::Policy::custom(move |attempt| {
                let next = attempt.url().clone();
                if !allow_private {
                    if let Some(host) = next.host_str() {
                        let scheme = next.scheme();
                        let port = next
                            .port()
                            .unwrap_or(if scheme == "https" { 443 } else { 80 });
                        if let Ok(ip) = host.parse::<std::net::IpAddr>() {
                            if crate::resource::is_private_ip(&ip) {
                                return attempt.error("redirect to private IP blocked");
                            }
                        } else {
                            let addr_str = format!("{}:{}", host, port);
                            match addr_str.to_socket_addrs() {
                                Ok(addrs) => {
                                    for sa in addrs {
                                        if crate::resource::is_private_ip(&sa.ip()) {
                                            return attempt.error("redirect to private IP blocked");
                                        }
                                    }
                                }
                                Err(_) => {
                                    return attempt.error("DNS lookup failed during redirect");
                                }
                            }
                        }
                    }
                }
                attempt.follow()
            });

            reqwest::Client::builder()
                .redirect(redirect_policy)
                .user_agent(&opts.user_agent)
                .timeout(opts.timeout)
                .gzip(true)
                .brotli(true)
                .deflate(true)
                .build()
                .expect("failed to build HTTP client")
        });

        Self { opts, http_client }
    }

    /// Fetch one page and extract its blocks with the configured mode.
    pub async fn scrape(&self, url: &str) -> Result<PageBlocks, ScrapeError> {
        if url.is_empty() {
            return Err(ScrapeError::invalid_url(url, "Scrape", None));
        }
        if Url::parse(url).is_err() {
            return Err(ScrapeError::invalid_url(
                url,
                "Scrape",
                Some(anyhow::anyhow!("malformed URL")),
            ));
        }

        let fetch_opts = FetchOptions {
            headers: self.opts.headers.clone(),
            allow_private_networks: self.opts.allow_private_networks,
        };

        let fetch_result = fetch(&self.http_client, url, &fetch_opts).await?;
        let raw_html = fetch_result.text();

        // Image URLs resolve against the URL the page was served from, so a
        // redirected page still yields usable absolute sources.
        let blocks = self.extract_html(&raw_html, &fetch_result.final_url)?;

        Ok(PageBlocks {
            url: fetch_result.final_url,
            blocks,
        })
    }

    /// Extract blocks from an HTML string without touching the network. The
    /// URL provides the base for resolving relative image sources.
    pub fn extract_html(&self, html: &str, url: &str) -> Result<Vec<ContentBlock>, ScrapeError> {
        let base = Url::parse(url).map_err(|e| {
            ScrapeError::invalid_url(url, "Extract", Some(anyhow::anyhow!("malformed URL: {}", e)))
        })?;

        // Unparseable markup degrades to whatever the tolerant parser kept;
        // extraction itself never fails a page.
        let doc = Html::parse_document(html);
        let blocks = match self.opts.mode {
            ExtractMode::Sections => extract_sections(&doc, &base, self.opts.min_section_words),
            ExtractMode::Blocks => extract_blocks(&doc, &base),
        };
        Ok(blocks)
    }

    /// Scrape several source pages sequentially and merge their blocks into
    /// one document. A failing page is logged and skipped; it never aborts
    /// the rest of the group.
    pub async fn scrape_group(&self, urls: &[String]) -> BatchOutcome {
        let mut blocks = Vec::new();
        let mut failures = Vec::new();

        for url in urls {
            info!(url = %url, "scraping");
            match self.scrape(url).await {
                Ok(page) => {
                    info!(url = %page.url, blocks = page.blocks.len(), "extracted");
                    blocks.extend(page.blocks);
                }
                Err(err) => {
                    warn!(url = %url, error = %err, "page failed, skipping");
                    failures.push(err);
                }
            }
        }

        BatchOutcome {
            extract: PageExtract::new(urls.to_vec(), blocks),
            failures,
        }
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"<html><body>
        <h1>Notre expertise</h1>
        <p>Operational consulting for industrial companies across Europe.</p>
        <h2>Ce que nous faisons</h2>
        <p>We run diagnostics, redesign processes, and coach teams through the
           change until the new operating model actually sticks.</p>
        </body></html>"#;

    fn test_client(mode: ExtractMode) -> Client {
        Client::builder()
            .mode(mode)
            .min_section_words(1)
            .allow_private_networks(true)
            .build()
    }

    #[test]
    fn extract_html_sections_mode() {
        let client = test_client(ExtractMode::Sections);
        let blocks = client.extract_html(PAGE, "https://example.com/").unwrap();
        assert_eq!(blocks.len(), 2);
        assert!(matches!(blocks[0], ContentBlock::Hero(_)));
        assert!(matches!(blocks[1], ContentBlock::Section(_)));
    }

    #[test]
    fn extract_html_blocks_mode() {
        let client = test_client(ExtractMode::Blocks);
        let blocks = client.extract_html(PAGE, "https://example.com/").unwrap();
        assert!(blocks
            .iter()
            .any(|b| matches!(b, ContentBlock::Heading { level: 1, .. })));
        assert!(blocks
            .iter()
            .any(|b| matches!(b, ContentBlock::Paragraph { .. })));
    }

    #[test]
    fn extract_html_rejects_bad_base_url() {
        let client = test_client(ExtractMode::Sections);
        let err = client.extract_html(PAGE, "not a url").unwrap_err();
        assert!(err.is_invalid_url());
    }

    #[tokio::test]
    async fn scrape_fetches_and_extracts() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/expertise");
            then.status(200)
                .header("content-type", "text/html; charset=utf-8")
                .body(PAGE);
        });

        let client = test_client(ExtractMode::Sections);
        let page = client.scrape(&server.url("/expertise")).await.unwrap();
        mock.assert();

        assert_eq!(page.blocks.len(), 2);
        assert!(page.url.ends_with("/expertise"));
    }

    #[tokio::test]
    async fn scrape_group_skips_failed_pages() {
        let server = MockServer::start();
        let ok = server.mock(|when, then| {
            when.method(GET).path("/ok");
            then.status(200)
                .header("content-type", "text/html; charset=utf-8")
                .body(PAGE);
        });
        let bad = server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404).body("gone");
        });

        let client = test_client(ExtractMode::Sections);
        let urls = vec![server.url("/missing"), server.url("/ok")];
        let outcome = client.scrape_group(&urls).await;
        ok.assert();
        bad.assert();

        assert_eq!(outcome.failures.len(), 1);
        assert!(outcome.failures[0].is_fetch());
        assert_eq!(outcome.extract.source_urls, urls);
        assert_eq!(outcome.extract.total_blocks, 2);
    }

    #[tokio::test]
    async fn scrape_rejects_empty_url() {
        let client = test_client(ExtractMode::Sections);
        let err = client.scrape("").await.unwrap_err();
        assert!(err.is_invalid_url());
    }
}
