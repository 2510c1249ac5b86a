//! Display formatting for extracted records. This is the only place where an
//! absent value renders as 0.

use crate::extract::DashboardReport;

/// Render a dashboard report as the panel's plain-text summary. Doubles as
/// the local fallback when the summarizer service is unreachable.
pub fn format_dashboard_text(report: &DashboardReport) -> String {
    let mut lines = Vec::new();

    let heading = match &report.title {
        Some(title) => format!("Vinconnect - {}", title),
        None => "Vinconnect".to_string(),
    };
    lines.push(heading);

    if let Some(range) = &report.date_range {
        lines.push(format!("Date range: {}", range));
    }

    for record in &report.records {
        lines.push(format!("{}:", record.section));
        let row = record
            .fields
            .iter()
            .map(|f| format!("{}: {}", f.name, f.value.unwrap_or(0)))
            .collect::<Vec<_>>()
            .join(" | ");
        lines.push(row);
    }

    lines.push(format!("URL: {}", report.url));
    lines.join("\n")
}

/// Build the drafting prompt sent to the summarizer for a conversation.
pub fn format_conversation_prompt(transcript: &str) -> String {
    format!(
        "Draft a concise, friendly reply to the customer based on this conversation:\n\n{}",
        transcript
    )
}

#[cfg(test)]
#[path = "report_test.rs"]
mod report_test;
