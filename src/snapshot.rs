use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Node, Selector};

lazy_static! {
    static ref TITLE_SELECTOR: Selector = Selector::parse("title").unwrap();
    static ref BODY_SELECTOR: Selector = Selector::parse("body").unwrap();
    static ref INPUT_SELECTOR: Selector = Selector::parse("input").unwrap();
}

/// Elements whose text never renders; skipped by all text predicates.
const NON_RENDERED_TAGS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// A read-only view of one document state: the page URL plus the parsed tree.
///
/// A snapshot is parsed fresh for every extraction pass and dropped at the end
/// of it. VinConnect re-renders replace subtrees wholesale, so node references
/// taken from one snapshot must never be carried into the next.
pub struct DocSnapshot {
    url: String,
    document: Html,
}

impl DocSnapshot {
    /// Parse a document snapshot from raw HTML and the URL it was served at.
    pub fn parse(url: &str, html: &str) -> Self {
        DocSnapshot {
            url: url.to_string(),
            document: Html::parse_document(html),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Case-insensitive URL substring test, the classifier's cheapest signal.
    pub fn url_contains(&self, needle: &str) -> bool {
        self.url.to_lowercase().contains(&needle.to_lowercase())
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    /// Root element of the tree; extraction scopes default to it.
    pub fn root(&self) -> ElementRef<'_> {
        self.document.root_element()
    }

    pub fn title(&self) -> Option<String> {
        self.document
            .select(&TITLE_SELECTOR)
            .next()
            .map(|t| collapse_whitespace(&t.text().collect::<Vec<_>>().join(" ")))
            .filter(|t| !t.is_empty())
    }

    /// Normalized (collapsed, lowercased) text of the whole body.
    pub fn body_text(&self) -> String {
        self.document
            .select(&BODY_SELECTOR)
            .next()
            .map(element_text)
            .unwrap_or_default()
    }

    /// Whether the body text contains the phrase, after normalization on both
    /// sides.
    pub fn has_phrase(&self, phrase: &str) -> bool {
        self.body_text().contains(&normalize_text(phrase))
    }

    /// Whether any element matches the CSS selector. Invalid selectors count
    /// as "no match" rather than failing the classification pass.
    pub fn matches_selector(&self, css: &str) -> bool {
        match Selector::parse(css) {
            Ok(sel) => self.document.select(&sel).next().is_some(),
            Err(_) => false,
        }
    }

    /// All `<input>` elements, for the date-range recovery heuristic.
    pub fn inputs(&self) -> Vec<ElementRef<'_>> {
        self.document.select(&INPUT_SELECTOR).collect()
    }
}

/// Collapse whitespace runs to single spaces and trim, preserving case.
pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical text normalization: collapsed whitespace, lowercased. Every
/// label/phrase comparison in the engine goes through this.
pub fn normalize_text(raw: &str) -> String {
    collapse_whitespace(raw).to_lowercase()
}

/// Normalized text of an element's rendered content.
pub fn element_text(el: ElementRef<'_>) -> String {
    normalize_text(&rendered_text(el))
}

/// Rendered text with original casing, whitespace collapsed. Used where the
/// output is shown to a human (transcripts, reports).
pub fn display_text(el: ElementRef<'_>) -> String {
    collapse_whitespace(&rendered_text(el))
}

fn rendered_text(el: ElementRef<'_>) -> String {
    let mut out = String::new();
    collect_rendered(*el, &mut out);
    out
}

fn collect_rendered(node: ego_tree::NodeRef<'_, Node>, out: &mut String) {
    for child in node.children() {
        match child.value() {
            Node::Text(t) => {
                out.push_str(&t);
                out.push(' ');
            }
            Node::Element(e) => {
                if NON_RENDERED_TAGS.contains(&e.name()) {
                    continue;
                }
                collect_rendered(child, out);
            }
            _ => {}
        }
    }
}

/// Whether the element has no element children (a text tile, not a wrapper).
pub fn is_leaf_element(el: ElementRef<'_>) -> bool {
    el.children().all(|c| !c.value().is_element())
}

/// Whether normalized text has the shape of a count: digits with optional
/// comma or space thousands separators, nothing else.
pub fn is_count_text(text: &str) -> bool {
    parse_count(text).is_some()
}

/// Parse a count out of normalized text, or `None` when the text is anything
/// other than a bare integer. Absence stays absent; zero-defaulting happens
/// only at the display boundary.
pub fn parse_count(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let first = trimmed.chars().next()?;
    let last = trimmed.chars().last()?;
    if !first.is_ascii_digit() || !last.is_ascii_digit() {
        return None;
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || c == ',' || c == ' ')
    {
        return None;
    }
    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    digits.parse::<i64>().ok()
}

/// Count the numeric leaf tiles under an element. The section resolver uses
/// this to tell a data card apart from an intermediate wrapper.
pub fn numeric_leaf_count(el: ElementRef<'_>) -> usize {
    el.descendants()
        .filter_map(ElementRef::wrap)
        .filter(|e| is_leaf_element(*e))
        .filter(|e| is_count_text(&element_text(*e)))
        .count()
}

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod snapshot_test;
