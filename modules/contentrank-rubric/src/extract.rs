//! Markup → plain prose + headings.
//!
//! Parsed with `scraper` as an HTML fragment. Best-effort: unbalanced or
//! malformed markup never errors, it just yields whatever text the parser
//! recovers. Attribute values and comments never reach the text.

use scraper::{ElementRef, Html, Selector};

const HEADINGS: &str = "h1, h2, h3, h4, h5, h6";

/// Elements whose text children are not prose.
const NON_CONTENT: &[&str] = &["script", "style", "noscript", "template"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText {
    /// Tag-free text, whitespace collapsed to single spaces.
    pub text: String,
    /// `h1`-`h6` contents in document order, nested markup stripped.
    pub headings: Vec<String>,
}

pub fn extract(markup: &str) -> ExtractedText {
    if markup.trim().is_empty() {
        return ExtractedText::default();
    }

    let fragment = Html::parse_fragment(markup);
    let root = fragment.root_element();

    let headings = match Selector::parse(HEADINGS) {
        Ok(selector) => root
            .select(&selector)
            .map(visible_text)
            .filter(|heading| !heading.is_empty())
            .collect(),
        Err(_) => Vec::new(),
    };

    ExtractedText {
        text: visible_text(root),
        headings,
    }
}

/// True if the markup contains an `<img>` element.
pub fn contains_image(markup: &str) -> bool {
    let Ok(selector) = Selector::parse("img") else {
        return false;
    };
    Html::parse_fragment(markup)
        .root_element()
        .select(&selector)
        .next()
        .is_some()
}

/// Text nodes under `element`, joined with spaces so adjacent blocks do not
/// fuse, skipping anything inside a non-content element.
fn visible_text(element: ElementRef) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| NON_CONTENT.contains(&el.name()))
        });
        if !hidden {
            parts.push(text);
        }
    }
    collapse_whitespace(&parts.join(" "))
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
