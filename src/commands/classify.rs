use anyhow::Result;
use serde_json::json;

use crate::commands::utils::load_source;
use crate::context;
use crate::snapshot::DocSnapshot;

/// Classify a page without a browser: fetch or read it, print the context
/// as JSON on stdout.
pub async fn handle_classify(source: String) -> Result<()> {
    let (url, html) = load_source(&source).await?;
    let context = {
        let doc = DocSnapshot::parse(&url, &html);
        context::classify(&doc)
    };

    let output = json!({
        "url": url,
        "context": context,
        "known": context.is_known(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
