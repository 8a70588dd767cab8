// ABOUTME: DOM helpers shared by both extractors: tag classification, visibility
// ABOUTME: predicates, visible-text collection, image gathering, and URL resolution.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

use crate::blocks::{ImageRef, ListStyle};

/// Non-visual tags skipped entirely by the tree-mode walk.
pub const TREE_SKIP_TAGS: &[&str] = &[
    "script", "style", "meta", "link", "head", "nav", "aside", "form",
];

/// Clutter ignored by the section-mode walk. The source documents are legacy
/// marketing pages; chrome and embeds only pollute the section text.
pub const SECTION_CLUTTER_TAGS: &[&str] = &[
    "script", "style", "noscript", "iframe", "svg", "header", "footer", "nav", "form",
];

static DISPLAY_NONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)display\s*:\s*none").unwrap());

/// Closed category over the tags the tree-mode walk dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagCategory {
    Heading(u8),
    Paragraph,
    List(ListStyle),
    Image,
    Container,
    Skip,
    Other,
}

/// Classify a tag name into its traversal category. First match wins, in the
/// same order the leaf rules are applied.
pub fn classify(tag: &str) -> TagCategory {
    match tag {
        "h1" => TagCategory::Heading(1),
        "h2" => TagCategory::Heading(2),
        "h3" => TagCategory::Heading(3),
        "h4" => TagCategory::Heading(4),
        "h5" => TagCategory::Heading(5),
        "h6" => TagCategory::Heading(6),
        "p" => TagCategory::Paragraph,
        "ul" => TagCategory::List(ListStyle::Unordered),
        "ol" => TagCategory::List(ListStyle::Ordered),
        "img" => TagCategory::Image,
        "div" | "section" | "article" | "main" | "header" | "footer" => TagCategory::Container,
        t if TREE_SKIP_TAGS.contains(&t) => TagCategory::Skip,
        _ => TagCategory::Other,
    }
}

/// True if the element carries an inline `display: none`.
pub fn is_hidden(el: &ElementRef<'_>) -> bool {
    el.value()
        .attr("style")
        .is_some_and(|style| DISPLAY_NONE_RE.is_match(style))
}

/// True if the element itself, or any ancestor, is clutter or hidden.
///
/// The DOM here is immutable, so instead of decomposing clutter subtrees the
/// extractors treat them as absent via this predicate.
pub fn is_excluded(el: ElementRef<'_>, clutter: &[&str]) -> bool {
    if clutter.contains(&el.value().name()) || is_hidden(&el) {
        return true;
    }
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| clutter.contains(&a.value().name()) || is_hidden(&a))
}

/// Collect the visible descendant text of an element, skipping subtrees whose
/// tag is in `skip_tags` or that are hidden inline, with whitespace collapsed.
pub fn visible_text(el: ElementRef<'_>, skip_tags: &[&str]) -> String {
    let mut buf = String::new();
    collect_text(el, skip_tags, &mut buf);
    normalize_ws(&buf)
}

fn collect_text(el: ElementRef<'_>, skip_tags: &[&str], buf: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => buf.push_str(&text.text),
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    if skip_tags.contains(&child_el.value().name()) || is_hidden(&child_el) {
                        continue;
                    }
                    collect_text(child_el, skip_tags, buf);
                }
            }
            _ => {}
        }
    }
}

/// Collapse all whitespace runs to single spaces and trim.
pub fn normalize_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Gather every visible `<img>` under an element (excluding the element
/// itself), resolving sources against the page base URL.
pub fn find_images(el: ElementRef<'_>, skip_tags: &[&str], base: &Url, out: &mut Vec<ImageRef>) {
    for child in el.children() {
        let Some(child_el) = ElementRef::wrap(child) else {
            continue;
        };
        if skip_tags.contains(&child_el.value().name()) || is_hidden(&child_el) {
            continue;
        }
        if child_el.value().name() == "img" {
            if let Some(src) = child_el.value().attr("src") {
                out.push(ImageRef {
                    src: resolve_src(base, src),
                    alt: child_el.value().attr("alt").unwrap_or("").to_string(),
                });
            }
            continue;
        }
        find_images(child_el, skip_tags, base, out);
    }
}

/// Resolve an image `src` against the page base URL. Relative paths are
/// joined; absolute URLs pass through. An unjoinable src is kept verbatim
/// rather than failing the traversal.
pub fn resolve_src(base: &Url, src: &str) -> String {
    base.join(src)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| src.to_string())
}

/// Pick the primary content root: `<main>`, else `<article>`, else `<body>`,
/// else the whole document. Chosen once per page.
pub fn content_root(doc: &Html) -> ElementRef<'_> {
    static MAIN: Lazy<Selector> = Lazy::new(|| Selector::parse("main").unwrap());
    static ARTICLE: Lazy<Selector> = Lazy::new(|| Selector::parse("article").unwrap());
    static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());

    doc.select(&MAIN)
        .next()
        .or_else(|| doc.select(&ARTICLE).next())
        .or_else(|| doc.select(&BODY).next())
        .unwrap_or_else(|| doc.root_element())
}
