// Unit tests for report formatting

use super::*;
use crate::extract::{ExtractedRecord, FieldValue};
use pretty_assertions::assert_eq;

fn report() -> DashboardReport {
    DashboardReport {
        url: "https://x.test/dash".to_string(),
        title: Some("Dealer Dashboard".to_string()),
        date_range: Some("08/01 - 08/25".to_string()),
        records: vec![ExtractedRecord {
            section: "Sales Funnel".to_string(),
            fields: vec![
                FieldValue {
                    name: "Customers".to_string(),
                    value: Some(42),
                },
                FieldValue {
                    name: "Sold".to_string(),
                    value: None,
                },
            ],
        }],
    }
}

#[test]
fn test_format_dashboard_text() {
    let text = format_dashboard_text(&report());
    assert_eq!(
        text,
        "Vinconnect - Dealer Dashboard\n\
         Date range: 08/01 - 08/25\n\
         Sales Funnel:\n\
         Customers: 42 | Sold: 0\n\
         URL: https://x.test/dash"
    );
}

#[test]
fn test_absent_values_zero_only_at_display() {
    let r = report();
    // The record keeps the absence; only the rendered text shows 0.
    assert_eq!(r.records[0].get("Sold"), None);
    assert!(format_dashboard_text(&r).contains("Sold: 0"));
}

#[test]
fn test_conversation_prompt_wraps_transcript() {
    let prompt = format_conversation_prompt("Hi\nHello");
    assert!(prompt.starts_with("Draft a concise, friendly reply"));
    assert!(prompt.ends_with("Hi\nHello"));
}
