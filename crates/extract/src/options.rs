// ABOUTME: Configuration for the pagelift client: ExtractMode, Options, and ClientBuilder.
// ABOUTME: ClientBuilder provides a fluent API for constructing Client instances.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use crate::client::Client;

/// Default request timeout per page fetch.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Fixed desktop browser User-Agent. Several of the legacy CMSes this tool
/// targets serve stripped-down markup to unknown agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.114 Safari/537.36";

/// Sections with an approximate word count below this are dropped as noise.
pub const DEFAULT_MIN_SECTION_WORDS: usize = 20;

/// Which extractor produces the block sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractMode {
    /// Heading-delimited hero/section/grid_candidate blocks. The canonical
    /// mode; this is the shape the downstream page-builder was tuned on.
    #[default]
    Sections,
    /// Whole-tree recursive heading/paragraph/list/image/container blocks.
    Blocks,
}

impl fmt::Display for ExtractMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExtractMode::Sections => "sections",
            ExtractMode::Blocks => "blocks",
        };
        write!(f, "{}", s)
    }
}

impl From<&str> for ExtractMode {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "blocks" | "tree" => ExtractMode::Blocks,
            _ => ExtractMode::Sections,
        }
    }
}

/// Configuration options for the pagelift client.
#[derive(Debug, Clone)]
pub struct Options {
    pub timeout: Duration,
    pub user_agent: String,
    pub mode: ExtractMode,
    pub min_section_words: usize,
    pub allow_private_networks: bool,
    pub headers: HashMap<String, String>,
    pub http_client: Option<reqwest::Client>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            mode: ExtractMode::default(),
            min_section_words: DEFAULT_MIN_SECTION_WORDS,
            allow_private_networks: false,
            headers: HashMap::new(),
            http_client: None,
        }
    }
}

/// Builder for constructing Client instances with custom configuration.
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    opts: Options,
}

impl ClientBuilder {
    /// Create a new ClientBuilder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Select the extraction mode.
    pub fn mode(mut self, mode: ExtractMode) -> Self {
        self.opts.mode = mode;
        self
    }

    /// Set the minimum approximate word count for a section to survive.
    pub fn min_section_words(mut self, min: usize) -> Self {
        self.opts.min_section_words = min;
        self
    }

    /// Allow or disallow requests to private networks.
    pub fn allow_private_networks(mut self, allow: bool) -> Self {
        self.opts.allow_private_networks = allow;
        self
    }

    /// Add a custom header to all requests.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    /// Use a custom HTTP client.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Build the Client with the configured options.
    pub fn build(self) -> Client {
        Client::new(self.opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_the_scraper_calibration() {
        let opts = Options::default();
        assert_eq!(opts.timeout, Duration::from_secs(15));
        assert_eq!(opts.min_section_words, 20);
        assert_eq!(opts.mode, ExtractMode::Sections);
        assert!(!opts.allow_private_networks);
        assert!(opts.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn mode_parses_loosely() {
        assert_eq!(ExtractMode::from("blocks"), ExtractMode::Blocks);
        assert_eq!(ExtractMode::from("TREE"), ExtractMode::Blocks);
        assert_eq!(ExtractMode::from("sections"), ExtractMode::Sections);
        assert_eq!(ExtractMode::from("anything-else"), ExtractMode::Sections);
        assert_eq!(ExtractMode::Blocks.to_string(), "blocks");
    }
}
