use anyhow::Result;
use tokio::sync::mpsc;
use tracing::info;

use crate::api::SummarizerClient;
use crate::browser::{Browser, BrowserType};
use crate::control::ControlServer;
use crate::pipeline::Watcher;

/// Attach to a browser, navigate to the host page, and run the watcher loop
/// until `vinpanel panel stop` or Ctrl-C.
pub async fn handle_watch(
    url: String,
    browser: String,
    no_headless: bool,
    endpoints: Vec<String>,
) -> Result<()> {
    let browser_type: BrowserType = browser.parse()?;

    let api = if endpoints.is_empty() {
        SummarizerClient::with_default_endpoints()?
    } else {
        let refs: Vec<&str> = endpoints.iter().map(String::as_str).collect();
        SummarizerClient::new(&refs)?
    };

    let (tx, rx) = mpsc::channel(16);
    let _server = ControlServer::spawn(tx)?;

    let session = Browser::launch(browser_type, !no_headless).await?;
    session.goto(&url).await?;
    info!("Watching {}", url);

    Watcher::new(session, api).run(rx).await
}
