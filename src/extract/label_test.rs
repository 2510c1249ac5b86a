// Unit tests for the label locator

use super::*;
use crate::snapshot::DocSnapshot;

fn doc(body: &str) -> DocSnapshot {
    DocSnapshot::parse(
        "https://x.test",
        &format!("<html><body>{}</body></html>", body),
    )
}

#[test]
fn test_exact_match_wins_over_substring() {
    let d = doc(
        r#"<div class="tooltip">All your Customers are listed below</div>
           <div class="tile"><span class="lbl">Customers</span><span>42</span></div>"#,
    );
    let label = find_label(d.root(), &["Customers"]).unwrap();
    assert_eq!(element_text(label), "customers");
    assert_eq!(label.value().attr("class"), Some("lbl"));
}

#[test]
fn test_substring_fallback_when_no_exact_match() {
    let d = doc(r#"<div><span class="hit">Customers (new)</span></div>"#);
    let label = find_label(d.root(), &["Customers"]).unwrap();
    assert_eq!(label.value().attr("class"), Some("hit"));
}

#[test]
fn test_alias_order_is_respected() {
    let d = doc(
        r#"<span class="second">Appointments Set</span>
           <span class="first">Appts Set</span>"#,
    );
    // The first alias with an exact match anywhere wins, even when a later
    // alias also matches an earlier node.
    let label = find_label(d.root(), &["Appts Set", "Appointments Set"]).unwrap();
    assert_eq!(label.value().attr("class"), Some("first"));
}

#[test]
fn test_innermost_element_is_selected() {
    let d = doc(r#"<div class="outer"><div class="inner">Sold</div></div>"#);
    let label = find_label(d.root(), &["Sold"]).unwrap();
    assert_eq!(label.value().attr("class"), Some("inner"));
}

#[test]
fn test_absent_label_returns_none() {
    let d = doc("<p>nothing to see</p>");
    assert!(find_label(d.root(), &["Sales Funnel"]).is_none());
    assert!(find_label(d.root(), &[]).is_none());
}

#[test]
fn test_matching_is_case_and_whitespace_insensitive() {
    let d = doc("<span>  APPTS \n SHOWN </span>");
    assert!(find_label(d.root(), &["Appts Shown"]).is_some());
}
