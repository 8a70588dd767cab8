// ABOUTME: Tree-mode extractor: depth-first recursive walk of the content root
// ABOUTME: emitting heading/paragraph/list/image/container blocks with signature dedup.

use std::collections::HashSet;

use scraper::{ElementRef, Html, Node};
use url::Url;

use crate::blocks::{ContentBlock, Fragment};
use crate::dom::{
    classify, content_root, is_hidden, normalize_ws, resolve_src, visible_text, TagCategory,
    TREE_SKIP_TAGS,
};

/// Recursion guard against pathological nesting in malformed markup.
const MAX_DEPTH: usize = 64;

/// Tags excluded from a list item's own text so nested lists are not
/// flattened into the parent item.
const LIST_ITEM_SKIP: &[&str] = &[
    "ul", "ol", "script", "style", "meta", "link", "head", "nav", "aside", "form",
];

/// Walk the document's content root depth-first and emit typed blocks in
/// source order. The dedup set lives for exactly one call; it is never shared
/// across documents.
pub fn extract_blocks(doc: &Html, base: &Url) -> Vec<ContentBlock> {
    let root = content_root(doc);
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for child in root.children() {
        if let Some(el) = ElementRef::wrap(child) {
            visit(el, base, &mut seen, 0, &mut out);
        }
    }
    out
}

fn visit(
    el: ElementRef<'_>,
    base: &Url,
    seen: &mut HashSet<String>,
    depth: usize,
    out: &mut Vec<ContentBlock>,
) {
    if depth > MAX_DEPTH {
        return;
    }
    if is_hidden(&el) {
        return;
    }

    match classify(el.value().name()) {
        TagCategory::Heading(level) => {
            let text = visible_text(el, TREE_SKIP_TAGS);
            if !text.is_empty() {
                emit(ContentBlock::Heading { level, text }, seen, out);
            }
        }
        TagCategory::Paragraph => {
            let fragments = inline_fragments(el);
            if !fragments.is_empty() {
                emit(ContentBlock::Paragraph { fragments }, seen, out);
            }
        }
        TagCategory::List(style) => {
            let items = direct_items(el);
            // Fewer than 3 items is navigation or layout noise, not content.
            if items.len() > 2 {
                emit(ContentBlock::List { style, items }, seen, out);
            }
        }
        TagCategory::Image => {
            if let Some(src) = el.value().attr("src") {
                emit(
                    ContentBlock::Image {
                        src: resolve_src(base, src),
                        alt: el.value().attr("alt").unwrap_or("").to_string(),
                    },
                    seen,
                    out,
                );
            }
        }
        TagCategory::Container => {
            let mut children = Vec::new();
            for child in el.children() {
                if let Some(child_el) = ElementRef::wrap(child) {
                    visit(child_el, base, seen, depth + 1, &mut children);
                }
            }
            // Purely structural wrappers produce nothing.
            if !children.is_empty() {
                out.push(ContentBlock::Container {
                    tag: el.value().name().to_string(),
                    attrs: el
                        .value()
                        .attrs()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                    children,
                });
            }
        }
        TagCategory::Skip | TagCategory::Other => {}
    }
}

/// Emit a block unless its signature was already seen in this traversal.
fn emit(block: ContentBlock, seen: &mut HashSet<String>, out: &mut Vec<ContentBlock>) {
    if let Some(sig) = block.signature() {
        if !seen.insert(sig) {
            return;
        }
    }
    out.push(block);
}

/// Immediate inline children of a paragraph: anchors become link fragments,
/// other non-empty text nodes become text fragments.
fn inline_fragments(el: ElementRef<'_>) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    for child in el.children() {
        match child.value() {
            Node::Text(text) => {
                let text = normalize_ws(&text.text);
                if !text.is_empty() {
                    fragments.push(Fragment::Text { text });
                }
            }
            Node::Element(element) if element.name() == "a" => {
                let Some(anchor) = ElementRef::wrap(child) else {
                    continue;
                };
                let text = visible_text(anchor, TREE_SKIP_TAGS);
                if text.is_empty() {
                    continue;
                }
                match anchor.value().attr("href") {
                    Some(href) => fragments.push(Fragment::Link {
                        link: href.to_string(),
                        text,
                    }),
                    // An anchor without a target is just styled text.
                    None => fragments.push(Fragment::Text { text }),
                }
            }
            _ => {}
        }
    }
    fragments
}

/// Texts of the direct `<li>` children, excluding any nested list content.
fn direct_items(el: ElementRef<'_>) -> Vec<String> {
    el.children()
        .filter_map(ElementRef::wrap)
        .filter(|li| li.value().name() == "li" && !is_hidden(li))
        .map(|li| visible_text(li, LIST_ITEM_SKIP))
        .filter(|text| !text.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::ListStyle;
    use pretty_assertions::assert_eq;

    fn extract(html: &str, base: &str) -> Vec<ContentBlock> {
        let doc = Html::parse_document(html);
        let base = Url::parse(base).unwrap();
        extract_blocks(&doc, &base)
    }

    #[test]
    fn headings_paragraphs_and_links() {
        let blocks = extract(
            r#"<main>
                <h1>Welcome</h1>
                <p>We are <a href="/about/">Acme</a> consulting.</p>
               </main>"#,
            "https://example.com/",
        );
        assert_eq!(
            blocks,
            vec![
                ContentBlock::Heading {
                    level: 1,
                    text: "Welcome".to_string(),
                },
                ContentBlock::Paragraph {
                    fragments: vec![
                        Fragment::Text {
                            text: "We are".to_string(),
                        },
                        Fragment::Link {
                            link: "/about/".to_string(),
                            text: "Acme".to_string(),
                        },
                        Fragment::Text {
                            text: "consulting.".to_string(),
                        },
                    ],
                },
            ]
        );
    }

    #[test]
    fn two_item_list_is_noise_three_is_a_block() {
        let blocks = extract(
            "<main><ul><li>one</li><li>two</li></ul></main>",
            "https://example.com/",
        );
        assert_eq!(blocks, vec![]);

        let blocks = extract(
            "<main><ul><li>one</li><li>two</li><li>three</li></ul></main>",
            "https://example.com/",
        );
        assert_eq!(
            blocks,
            vec![ContentBlock::List {
                style: ListStyle::Unordered,
                items: vec!["one".to_string(), "two".to_string(), "three".to_string()],
            }]
        );
    }

    #[test]
    fn nested_list_items_stay_out_of_the_parent() {
        let blocks = extract(
            r#"<main><ol>
                <li>alpha <ul><li>x</li><li>y</li></ul></li>
                <li>beta</li>
                <li>gamma</li>
               </ol></main>"#,
            "https://example.com/",
        );
        assert_eq!(
            blocks,
            vec![ContentBlock::List {
                style: ListStyle::Ordered,
                items: vec![
                    "alpha".to_string(),
                    "beta".to_string(),
                    "gamma".to_string()
                ],
            }]
        );
    }

    #[test]
    fn relative_image_src_resolves_against_base() {
        let blocks = extract(
            r#"<main><img src="/img/a.png" alt="Logo"></main>"#,
            "https://example.com/path/",
        );
        assert_eq!(
            blocks,
            vec![ContentBlock::Image {
                src: "https://example.com/img/a.png".to_string(),
                alt: "Logo".to_string(),
            }]
        );
    }

    #[test]
    fn container_emitted_only_with_content() {
        let blocks = extract(
            r#"<main>
                <div class="wrapper"><div></div></div>
                <section id="intro"><h2>Intro</h2></section>
               </main>"#,
            "https://example.com/",
        );
        assert_eq!(
            blocks,
            vec![ContentBlock::Container {
                tag: "section".to_string(),
                attrs: [("id".to_string(), "intro".to_string())].into(),
                children: vec![ContentBlock::Heading {
                    level: 2,
                    text: "Intro".to_string(),
                }],
            }]
        );
    }

    #[test]
    fn duplicate_heading_in_nested_containers_emitted_once() {
        let blocks = extract(
            r#"<main>
                <div class="a"><h2>Contact us</h2></div>
                <div class="b"><h2>Contact us</h2></div>
               </main>"#,
            "https://example.com/",
        );
        // The second container loses its only child to dedup, so it
        // disappears entirely.
        assert_eq!(
            blocks,
            vec![ContentBlock::Container {
                tag: "div".to_string(),
                attrs: [("class".to_string(), "a".to_string())].into(),
                children: vec![ContentBlock::Heading {
                    level: 2,
                    text: "Contact us".to_string(),
                }],
            }]
        );
    }

    #[test]
    fn skips_non_visual_and_hidden_elements() {
        let blocks = extract(
            r#"<main>
                <nav><p>menu</p></nav>
                <form><p>newsletter</p></form>
                <p style="display:none">ghost</p>
                <p>visible</p>
               </main>"#,
            "https://example.com/",
        );
        assert_eq!(
            blocks,
            vec![ContentBlock::Paragraph {
                fragments: vec![Fragment::Text {
                    text: "visible".to_string(),
                }],
            }]
        );
    }

    #[test]
    fn empty_paragraph_and_missing_src_yield_nothing() {
        let blocks = extract(
            r#"<main><p>   </p><p><b>bold only</b></p><img alt="no src"></main>"#,
            "https://example.com/",
        );
        assert_eq!(blocks, vec![]);
    }

    #[test]
    fn recursion_stops_at_the_depth_limit() {
        let mut html = String::from("<body>");
        for _ in 0..(MAX_DEPTH + 10) {
            html.push_str("<div class=\"d\">");
        }
        html.push_str("<h2>Deep</h2>");
        for _ in 0..(MAX_DEPTH + 10) {
            html.push_str("</div>");
        }
        html.push_str("</body>");

        let blocks = extract(&html, "https://example.com/");
        // The heading sits beyond the limit, so nothing survives.
        assert_eq!(blocks, vec![]);
    }

    #[test]
    fn falls_back_to_body_without_landmarks() {
        let blocks = extract(
            "<html><body><h1>Title</h1></body></html>",
            "https://example.com/",
        );
        assert_eq!(
            blocks,
            vec![ContentBlock::Heading {
                level: 1,
                text: "Title".to_string(),
            }]
        );
    }
}
