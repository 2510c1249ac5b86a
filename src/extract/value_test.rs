// Unit tests for the value associator

use super::*;
use crate::extract::label::find_label;
use crate::snapshot::DocSnapshot;

fn doc(body: &str) -> DocSnapshot {
    DocSnapshot::parse(
        "https://x.test",
        &format!("<html><body>{}</body></html>", body),
    )
}

const FUNNEL_TILES: &str = r#"
    <div class="card">
      <div class="tile"><span>Customers</span><span>42</span></div>
      <div class="tile"><span>Contacted</span><span>17</span></div>
      <div class="tile"><span>Appts Set</span><span>5</span></div>
    </div>"#;

#[test]
fn test_same_tile_value_wins() {
    let d = doc(FUNNEL_TILES);
    let container = d.root();

    let customers = find_label(container, &["Customers"]).unwrap();
    assert_eq!(associate_value(container, customers, "Customers"), Some(42));

    // The value after "Contacted" carries the follows-label penalty but its
    // tree distance still beats the preceding tile's 42.
    let contacted = find_label(container, &["Contacted"]).unwrap();
    assert_eq!(associate_value(container, contacted, "Contacted"), Some(17));

    let appts = find_label(container, &["Appts Set"]).unwrap();
    assert_eq!(associate_value(container, appts, "Appts Set"), Some(5));
}

#[test]
fn test_number_before_label_layout() {
    let d = doc(
        r#"<div class="card">
             <div class="tile"><span>42</span><span>Customers</span></div>
             <div class="tile"><span>17</span><span>Contacted</span></div>
           </div>"#,
    );
    let container = d.root();
    let contacted = find_label(container, &["Contacted"]).unwrap();
    assert_eq!(associate_value(container, contacted, "Contacted"), Some(17));
}

#[test]
fn test_no_candidates_returns_none_not_zero() {
    let d = doc(r#"<div class="card"><span>Customers</span><span>n/a</span></div>"#);
    let container = d.root();
    let label = find_label(container, &["Customers"]).unwrap();
    assert_eq!(associate_value(container, label, "Customers"), None);
}

#[test]
fn test_thousands_separators_parse() {
    let d = doc(r#"<div class="tile"><span>Customers</span><span>1,204</span></div>"#);
    let container = d.root();
    let label = find_label(container, &["Customers"]).unwrap();
    assert_eq!(associate_value(container, label, "Customers"), Some(1204));
}

#[test]
fn test_tie_breaks_to_earliest_in_document_order() {
    // Two equidistant siblings on the same side of the label.
    let d = doc(
        r#"<div class="tile"><span>Sold</span><span>3</span><span>9</span></div>"#,
    );
    let container = d.root();
    let label = find_label(container, &["Sold"]).unwrap();
    assert_eq!(associate_value(container, label, "Sold"), Some(3));
}

#[test]
fn test_idempotent_for_a_fixed_snapshot() {
    let d = doc(FUNNEL_TILES);
    let container = d.root();
    let label = find_label(container, &["Contacted"]).unwrap();
    let first = associate_value(container, label, "Contacted");
    let second = associate_value(container, label, "Contacted");
    assert_eq!(first, second);
}
