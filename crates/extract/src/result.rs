// ABOUTME: PageExtract: the merged JSON document written for each migration page.
// ABOUTME: Holds the source URLs, total block count, and the ordered block sequence.

use serde::{Deserialize, Serialize};

use crate::blocks::ContentBlock;

/// The output document for one migration page (or merge group of source
/// pages). `total_blocks` always equals `blocks.len()`; it is kept explicit
/// because the downstream page-builder sanity-checks it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PageExtract {
    pub source_urls: Vec<String>,
    pub total_blocks: usize,
    pub blocks: Vec<ContentBlock>,
}

impl PageExtract {
    /// Assemble a document from the blocks of one or more source pages.
    pub fn new(source_urls: Vec<String>, blocks: Vec<ContentBlock>) -> Self {
        Self {
            total_blocks: blocks.len(),
            source_urls,
            blocks,
        }
    }

    /// Returns true if no blocks were extracted.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{ContentBlock, SectionPayload};
    use pretty_assertions::assert_eq;

    fn sample() -> PageExtract {
        PageExtract::new(
            vec!["https://example.com/a-propos/".to_string()],
            vec![ContentBlock::Hero(SectionPayload {
                heading: "About us".to_string(),
                content: vec!["Founded in 1998.".to_string()],
                images: vec![],
                word_count: 3,
                suggested_component: Some("HeroMultiTemplate".to_string()),
                source_url: "https://example.com/a-propos/".to_string(),
            })],
        )
    }

    #[test]
    fn total_blocks_tracks_len() {
        let doc = sample();
        assert_eq!(doc.total_blocks, doc.blocks.len());
        assert!(!doc.is_empty());
        assert!(PageExtract::new(vec![], vec![]).is_empty());
    }

    #[test]
    fn json_round_trip() {
        let doc = sample();
        let json = serde_json::to_string_pretty(&doc).unwrap();
        let back: PageExtract = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn top_level_field_names_are_stable() {
        let value = serde_json::to_value(sample()).unwrap();
        assert!(value.get("source_urls").is_some());
        assert!(value.get("total_blocks").is_some());
        assert!(value.get("blocks").is_some());
    }
}
