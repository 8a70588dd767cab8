// ABOUTME: Main library entry point for the pagelift content-migration scraper.
// ABOUTME: Re-exports the public API: Client, ClientBuilder, ContentBlock, PageExtract, ScrapeError.

//! pagelift - scrape legacy marketing pages into typed content blocks.
//!
//! This crate fetches web pages and extracts their visible structure into an
//! ordered sequence of typed blocks (headings, paragraphs, lists, images,
//! containers, or heading-delimited sections), serialized as JSON for a
//! downstream page-rebuild pipeline.
//!
//! # Example
//!
//! ```no_run
//! use pagelift_extract::{Client, ScrapeError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ScrapeError> {
//!     let client = Client::builder().build();
//!     let page = client.scrape("https://example.com/a-propos/").await?;
//!     println!("{} blocks", page.blocks.len());
//!     Ok(())
//! }
//! ```

pub mod blocks;
pub mod client;
pub mod dom;
pub mod error;
pub mod extractors;
pub mod options;
pub mod resource;
pub mod result;

pub use crate::blocks::{ContentBlock, Fragment, ImageRef, ListStyle, SectionPayload};
pub use crate::client::{BatchOutcome, Client, PageBlocks};
pub use crate::error::{ErrorCode, ScrapeError};
pub use crate::options::{ClientBuilder, ExtractMode, Options};
pub use crate::result::PageExtract;
