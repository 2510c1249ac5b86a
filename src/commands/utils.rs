use anyhow::{Context, Result};

use crate::control::ControlClient;

/// Require a running watcher for panel control operations.
pub fn require_watcher() -> Result<()> {
    if !ControlClient::is_watcher_running() {
        eprintln!("Error: No watcher is running.");
        eprintln!("Start one with: vinpanel watch <url>");
        return Err(anyhow::anyhow!(
            "Failed to connect to the watcher. Is it running?"
        ));
    }
    Ok(())
}

/// Load a page for offline analysis: an http(s) URL is fetched, anything
/// else is read as a local file. Returns (url, html).
pub async fn load_source(source: &str) -> Result<(String, String)> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let html = reqwest::get(source)
            .await
            .with_context(|| format!("Failed to fetch {}", source))?
            .text()
            .await?;
        Ok((source.to_string(), html))
    } else {
        let html = tokio::fs::read_to_string(source)
            .await
            .with_context(|| format!("Failed to read {}", source))?;
        Ok((format!("file://{}", source), html))
    }
}
