use scraper::ElementRef;

use crate::snapshot::{element_text, normalize_text};

#[derive(Clone, Copy)]
enum MatchTier {
    Exact,
    Substring,
}

/// Find the element labeling a field or section under `root`.
///
/// Two passes over the aliases in order: exact normalized equality first,
/// then substring containment. Exact matches rarely mis-fire on unrelated
/// text that merely mentions the word, so the lower-precision substring pass
/// only runs when the exact pass finds nothing at all.
pub fn find_label<'a>(root: ElementRef<'a>, aliases: &[&str]) -> Option<ElementRef<'a>> {
    for alias in aliases {
        if let Some(el) = match_alias(root, alias, MatchTier::Exact) {
            return Some(el);
        }
    }
    for alias in aliases {
        if let Some(el) = match_alias(root, alias, MatchTier::Substring) {
            return Some(el);
        }
    }
    None
}

fn match_alias<'a>(root: ElementRef<'a>, alias: &str, tier: MatchTier) -> Option<ElementRef<'a>> {
    let needle = normalize_text(alias);
    if needle.is_empty() {
        return None;
    }
    for el in root.descendants().filter_map(ElementRef::wrap) {
        if !tier_matches(tier, &element_text(el), &needle) {
            continue;
        }
        // Prefer the innermost matching element: a wrapper whose child also
        // matches would otherwise win on document order alone.
        let child_matches = el
            .children()
            .filter_map(ElementRef::wrap)
            .any(|c| tier_matches(tier, &element_text(c), &needle));
        if !child_matches {
            return Some(el);
        }
    }
    None
}

fn tier_matches(tier: MatchTier, text: &str, needle: &str) -> bool {
    match tier {
        MatchTier::Exact => text == needle,
        MatchTier::Substring => text.contains(needle),
    }
}

#[cfg(test)]
#[path = "label_test.rs"]
mod label_test;
