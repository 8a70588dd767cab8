// ABOUTME: Section-mode extractor: heading-delimited hero/section/grid_candidate blocks
// ABOUTME: with word-count filtering and downstream component suggestions.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::blocks::{ContentBlock, ImageRef, SectionPayload};
use crate::dom::{find_images, is_excluded, is_hidden, resolve_src, visible_text, SECTION_CLUTTER_TAGS};

/// Component the hero always maps to in the target page schema.
const HERO_COMPONENT: &str = "HeroMultiTemplate";

/// Sibling text shorter than this is treated as noise, not section content.
const MIN_TEXT_CHARS: usize = 10;

/// Text volume above which an illustrated section maps to an image+text
/// component instead of a bare image.
const IMAGE_TEXT_THRESHOLD: usize = 100;

static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());
static H2: Lazy<Selector> = Lazy::new(|| Selector::parse("h2").unwrap());
static H3: Lazy<Selector> = Lazy::new(|| Selector::parse("h3").unwrap());
static LI: Lazy<Selector> = Lazy::new(|| Selector::parse("li").unwrap());

/// Extract heading-delimited blocks: an optional hero first, then one block
/// per `h2` (or per `h3` when the page has no `h2` at all). Sections whose
/// approximate word count falls below `min_words` are dropped as noise; the
/// hero never is.
pub fn extract_sections(doc: &Html, base: &Url, min_words: usize) -> Vec<ContentBlock> {
    let mut out = Vec::new();

    if let Some(hero) = extract_hero(doc, base) {
        out.push(hero);
    }

    let mut headings: Vec<ElementRef<'_>> = doc
        .select(&H2)
        .filter(|h| !is_excluded(*h, SECTION_CLUTTER_TAGS))
        .collect();
    if headings.is_empty() {
        headings = doc
            .select(&H3)
            .filter(|h| !is_excluded(*h, SECTION_CLUTTER_TAGS))
            .collect();
    }

    for heading in headings {
        let (payload, grid) = section_content(heading, base);
        if payload.word_count < min_words {
            continue;
        }
        out.push(if grid {
            ContentBlock::GridCandidate(payload)
        } else {
            ContentBlock::Section(payload)
        });
    }

    out
}

/// The hero is the document's first visible `h1` paired with the first
/// following `p`/`div` sibling that has text, stopping at the next
/// `h2`/`section` boundary.
pub fn extract_hero(doc: &Html, base: &Url) -> Option<ContentBlock> {
    let h1 = doc
        .select(&H1)
        .find(|h| !is_excluded(*h, SECTION_CLUTTER_TAGS))?;

    let mut content = Vec::new();
    for sibling in h1.next_siblings() {
        let Some(el) = ElementRef::wrap(sibling) else {
            continue;
        };
        let name = el.value().name();
        if matches!(name, "h2" | "section") {
            break;
        }
        if SECTION_CLUTTER_TAGS.contains(&name) || is_hidden(&el) {
            continue;
        }
        if matches!(name, "p" | "div") {
            let text = visible_text(el, SECTION_CLUTTER_TAGS);
            if !text.is_empty() {
                // Just the intro: one fragment is enough for a hero.
                content.push(text);
                break;
            }
        }
    }

    let word_count = approx_word_count(&content);
    Some(ContentBlock::Hero(SectionPayload {
        heading: visible_text(h1, SECTION_CLUTTER_TAGS),
        content,
        images: Vec::new(),
        word_count,
        suggested_component: Some(HERO_COMPONENT.to_string()),
        source_url: base.to_string(),
    }))
}

/// Gather everything under a heading until the next heading boundary, and
/// return the payload plus whether a qualifying list reclassified it as a
/// grid candidate.
fn section_content(heading: ElementRef<'_>, base: &Url) -> (SectionPayload, bool) {
    let mut content: Vec<String> = Vec::new();
    let mut images: Vec<ImageRef> = Vec::new();
    let mut grid = false;

    for sibling in heading.next_siblings() {
        let Some(el) = ElementRef::wrap(sibling) else {
            continue;
        };
        let name = el.value().name();
        if matches!(name, "h1" | "h2" | "header" | "footer") {
            break;
        }
        if SECTION_CLUTTER_TAGS.contains(&name) || is_hidden(&el) {
            continue;
        }

        if matches!(name, "p" | "div" | "span") {
            let text = visible_text(el, SECTION_CLUTTER_TAGS);
            if text.chars().count() > MIN_TEXT_CHARS {
                content.push(text);
            }
        }

        if name == "img" {
            if let Some(src) = el.value().attr("src") {
                images.push(ImageRef {
                    src: resolve_src(base, src),
                    alt: el.value().attr("alt").unwrap_or("").to_string(),
                });
            }
        }
        find_images(el, SECTION_CLUTTER_TAGS, base, &mut images);

        if matches!(name, "ul" | "ol") {
            let items: Vec<String> = el
                .select(&LI)
                .filter(|li| !is_hidden(li))
                .map(|li| visible_text(li, SECTION_CLUTTER_TAGS))
                .filter(|text| !text.is_empty())
                .collect();
            if items.len() > 2 {
                grid = true;
                content.extend(items);
            }
        }
    }

    let text_chars: usize = content.iter().map(|s| s.chars().count()).sum();
    let word_count = text_chars / 5;

    let suggested_component = if !images.is_empty() && text_chars > IMAGE_TEXT_THRESHOLD {
        Some("BodyCopyImage".to_string())
    } else if grid {
        Some("CardGrid".to_string())
    } else if text_chars > 0 {
        Some("TextOnlySection".to_string())
    } else {
        None
    };

    (
        SectionPayload {
            heading: visible_text(heading, SECTION_CLUTTER_TAGS),
            content,
            images,
            word_count,
            suggested_component,
            source_url: base.to_string(),
        },
        grid,
    )
}

/// Word count approximated as total characters over five, the calibration
/// the noise threshold was tuned against.
fn approx_word_count(content: &[String]) -> usize {
    content.iter().map(|s| s.chars().count()).sum::<usize>() / 5
}
