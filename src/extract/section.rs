use scraper::ElementRef;

use crate::snapshot::numeric_leaf_count;

/// A real data card co-locates at least this many number tiles; intermediate
/// wrapper divs do not.
pub const NUMERIC_LEAF_THRESHOLD: usize = 2;

/// Bound on the ancestor climb. Unbounded climbing eventually resolves to the
/// whole page body, which defeats positional scoring later.
pub const MAX_CLIMB: usize = 6;

/// Resolve the section container for a matched label node.
///
/// Climbs ancestors from the label, returning the first one whose
/// numeric-leaf descendant count crosses [`NUMERIC_LEAF_THRESHOLD`]. Falls
/// back to the label's immediate parent after [`MAX_CLIMB`] levels.
pub fn resolve_section(label: ElementRef<'_>) -> ElementRef<'_> {
    for anc in label
        .ancestors()
        .filter_map(ElementRef::wrap)
        .take(MAX_CLIMB)
    {
        if numeric_leaf_count(anc) >= NUMERIC_LEAF_THRESHOLD {
            return anc;
        }
    }
    parent_element(label).unwrap_or(label)
}

/// The label's immediate parent element, when it has one.
pub fn parent_element(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.parent().and_then(ElementRef::wrap)
}

#[cfg(test)]
#[path = "section_test.rs"]
mod section_test;
