use anyhow::Result;

use crate::commands::utils::load_source;
use crate::extract;
use crate::report;
use crate::snapshot::DocSnapshot;

/// Run the dashboard extraction offline and print the report.
pub async fn handle_scrape(source: String, text: bool) -> Result<()> {
    let (url, html) = load_source(&source).await?;
    let report = {
        let doc = DocSnapshot::parse(&url, &html);
        extract::scrape_dashboard(&doc)
    };

    if text {
        println!("{}", report::format_dashboard_text(&report));
    } else {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}
