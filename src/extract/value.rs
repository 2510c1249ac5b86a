use std::collections::HashMap;

use scraper::ElementRef;
use ego_tree::NodeId;

use crate::snapshot::{element_text, normalize_text, parse_count};

/// Added to a candidate's score when it follows the label in document order.
/// The dominant tile layout puts the number box before its label, so
/// preceding candidates are slightly favored. Must stay below the
/// tree-distance gap between a same-card value and a neighbouring card's
/// value (2 edges), or cross-card mismatches win.
pub const FOLLOWS_LABEL_PENALTY: u32 = 1;

/// Recover the numeric value associated with `label` inside `container`.
///
/// Candidates are descendants whose normalized text parses as a bare count,
/// excluding the label itself and anything whose text contains the label
/// phrase (guards against stats with number-looking names, e.g. "Top 10").
/// Each candidate is scored by tree distance to the lowest common ancestor
/// with the label, summed over both paths, plus [`FOLLOWS_LABEL_PENALTY`]
/// when it reads after the label. Lowest score wins; ties break to the
/// earliest candidate in document order.
///
/// Returns `None` when no candidate qualifies. Absence propagates to the
/// record; turning it into a zero is a display decision made elsewhere.
pub fn associate_value(
    container: ElementRef<'_>,
    label: ElementRef<'_>,
    label_phrase: &str,
) -> Option<i64> {
    let needle = normalize_text(label_phrase);

    // Document-order index of every node in the container subtree.
    let order: HashMap<NodeId, usize> = container
        .descendants()
        .enumerate()
        .map(|(i, n)| (n.id(), i))
        .collect();
    let label_order = order.get(&label.id()).copied().unwrap_or(0);

    // Distance from the label to each of its ancestors, so a candidate's walk
    // upward stops at the lowest common ancestor.
    let mut label_path: HashMap<NodeId, u32> = HashMap::new();
    for (dist, node) in std::iter::once(*label).chain(label.ancestors()).enumerate() {
        label_path.insert(node.id(), dist as u32);
        if node.id() == container.id() {
            break;
        }
    }

    let mut best: Option<(u32, usize, i64)> = None;
    for el in container.descendants().filter_map(ElementRef::wrap) {
        if el.id() == label.id() {
            continue;
        }
        let text = element_text(el);
        let Some(value) = parse_count(&text) else {
            continue;
        };
        if !needle.is_empty() && text.contains(&needle) {
            continue;
        }

        let mut steps = 0u32;
        let mut distance = None;
        for node in std::iter::once(*el).chain(el.ancestors()) {
            if let Some(label_dist) = label_path.get(&node.id()) {
                distance = Some(steps + label_dist);
                break;
            }
            steps += 1;
        }
        let Some(mut score) = distance else {
            continue;
        };

        let doc_index = order.get(&el.id()).copied().unwrap_or(usize::MAX);
        if doc_index > label_order {
            score += FOLLOWS_LABEL_PENALTY;
        }

        let candidate = (score, doc_index, value);
        match best {
            None => best = Some(candidate),
            Some((best_score, best_index, _))
                if (score, doc_index) < (best_score, best_index) =>
            {
                best = Some(candidate)
            }
            _ => {}
        }
    }

    best.map(|(_, _, value)| value)
}

#[cfg(test)]
#[path = "value_test.rs"]
mod value_test;
