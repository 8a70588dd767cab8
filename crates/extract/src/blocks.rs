// ABOUTME: The ContentBlock model: one tagged enum covering both extractor output shapes.
// ABOUTME: Blocks are plain immutable records; the JSON field names here are the wire format.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// List rendering style, from the originating tag (`ol` vs `ul`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStyle {
    Ordered,
    Unordered,
}

/// One inline piece of a paragraph: plain text, or anchor text with its href.
///
/// Serialized untagged: `{"link": href, "text": ...}` for anchors,
/// `{"text": ...}` otherwise. `Link` must stay first so deserialization
/// tries the wider shape before the narrower one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Fragment {
    Link { link: String, text: String },
    Text { text: String },
}

impl Fragment {
    /// The visible text of the fragment, ignoring any link target.
    pub fn text(&self) -> &str {
        match self {
            Fragment::Link { text, .. } => text,
            Fragment::Text { text } => text,
        }
    }
}

/// An image reference with its resolved absolute source URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub src: String,
    pub alt: String,
}

/// Payload shared by the heading-delimited section blocks
/// (`hero`, `section`, `grid_candidate`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionPayload {
    pub heading: String,
    pub content: Vec<String>,
    pub images: Vec<ImageRef>,
    pub word_count: usize,
    pub suggested_component: Option<String>,
    pub source_url: String,
}

/// One structured unit of extracted page content.
///
/// The `type` tag and field names are consumed verbatim by the downstream
/// page-builder; do not rename them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Heading {
        level: u8,
        text: String,
    },
    Paragraph {
        fragments: Vec<Fragment>,
    },
    List {
        style: ListStyle,
        items: Vec<String>,
    },
    Image {
        src: String,
        alt: String,
    },
    Container {
        tag: String,
        attrs: BTreeMap<String, String>,
        children: Vec<ContentBlock>,
    },
    Hero(SectionPayload),
    Section(SectionPayload),
    GridCandidate(SectionPayload),
}

impl ContentBlock {
    /// Normalized signature used to suppress duplicate blocks within one
    /// traversal. Containers and section-mode blocks have no signature and
    /// are never deduplicated.
    pub fn signature(&self) -> Option<String> {
        match self {
            ContentBlock::Heading { text, .. } => Some(text.clone()),
            ContentBlock::Paragraph { fragments } => Some(
                fragments
                    .iter()
                    .map(Fragment::text)
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            ContentBlock::List { items, .. } => Some(items.join(" ")),
            ContentBlock::Image { src, .. } => Some(src.clone()),
            _ => None,
        }
    }
}
