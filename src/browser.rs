//! WebDriver attachment and panel DOM ownership.
//!
//! The host page's tree is read-only from our side with one exception: the
//! panel subtree (`#vinpanel-root` / `#vinpanel-trigger`), which this module
//! owns exclusively. Observation happens through an injected sentinel that
//! counts mutations and user activity; the watcher polls it and turns deltas
//! into lifecycle events.

use anyhow::{Context, Result};
use fantoccini::{Client, ClientBuilder};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

/// Supported browser types
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum BrowserType {
    /// Mozilla Firefox
    Firefox,
    /// Google Chrome/Chromium
    Chrome,
}

impl std::str::FromStr for BrowserType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "firefox" => Ok(BrowserType::Firefox),
            "chrome" | "chromium" => Ok(BrowserType::Chrome),
            _ => anyhow::bail!("Unsupported browser: {}", s),
        }
    }
}

impl std::fmt::Display for BrowserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BrowserType::Firefox => "firefox",
            BrowserType::Chrome => "chrome",
        };
        write!(f, "{}", name)
    }
}

impl BrowserType {
    /// Get the WebDriver URL for this browser type
    pub fn webdriver_url(&self) -> &'static str {
        match self {
            BrowserType::Firefox => "http://localhost:4444",
            BrowserType::Chrome => "http://localhost:9515",
        }
    }

    fn driver_name(&self) -> &'static str {
        match self {
            BrowserType::Firefox => "geckodriver",
            BrowserType::Chrome => "chromedriver",
        }
    }
}

/// One snapshot of the sentinel's counters plus singleton node counts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageProbe {
    /// False right after a navigation wiped the injected state.
    pub sentinel: bool,
    pub url: String,
    pub mutations: u64,
    pub activity: u64,
    pub hovered: bool,
    /// Explicit minimize clicks on the panel header.
    pub minimize: u64,
    /// Explicit expand clicks on the collapsed trigger.
    pub expand: u64,
    pub panels: u64,
    pub triggers: u64,
}

/// Browser session hosting the watched page.
pub struct Browser {
    client: Client,
    browser_type: BrowserType,
}

impl Browser {
    /// Connect to a local WebDriver and open a session.
    pub async fn launch(browser_type: BrowserType, headless: bool) -> Result<Self> {
        info!("Connecting to {:?} WebDriver", browser_type);

        let mut caps = serde_json::Map::new();
        match browser_type {
            BrowserType::Firefox => {
                let mut args = Vec::new();
                if headless {
                    args.push("--headless".to_string());
                }
                caps.insert(
                    "moz:firefoxOptions".to_string(),
                    json!({ "args": args }),
                );
            }
            BrowserType::Chrome => {
                let mut args = vec!["--no-sandbox".to_string()];
                if headless {
                    args.push("--headless=new".to_string());
                    args.push("--disable-gpu".to_string());
                    args.push("--disable-dev-shm-usage".to_string());
                }
                caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
            }
        }

        let client = ClientBuilder::rustls()
            .capabilities(caps)
            .connect(browser_type.webdriver_url())
            .await
            .with_context(|| {
                format!(
                    "Cannot connect to {} at {}.\n\
                     Please ensure it is running:\n\
                       For Firefox: geckodriver --port 4444\n\
                       For Chrome: chromedriver --port 9515",
                    browser_type.driver_name(),
                    browser_type.webdriver_url(),
                )
            })?;

        Ok(Browser {
            client,
            browser_type,
        })
    }

    pub fn browser_type(&self) -> BrowserType {
        self.browser_type
    }

    pub async fn goto(&self, url: &str) -> Result<()> {
        info!("Navigating to {}", url);
        self.client.goto(url).await?;

        // Wait for the page to be ready before injecting anything
        let wait_script = "return document.readyState === 'complete';";
        for _ in 0..20 {
            match self.client.execute(wait_script, vec![]).await {
                Ok(val) if val.as_bool().unwrap_or(false) => break,
                _ => tokio::time::sleep(std::time::Duration::from_millis(100)).await,
            }
        }
        Ok(())
    }

    pub async fn current_url(&self) -> Result<String> {
        Ok(self.client.current_url().await?.to_string())
    }

    /// The page URL and its serialized tree, captured together for one
    /// extraction pass.
    pub async fn page_snapshot(&self) -> Result<(String, String)> {
        let url = self.current_url().await?;
        let html = self.client.source().await?;
        Ok((url, html))
    }

    /// Close the session. Timers and injected state die with the document.
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }

    /// Install the observation sentinel. Idempotent, and a no-op inside
    /// iframes: only the top window may own a panel.
    pub async fn install_sentinel(&self) -> Result<()> {
        let script = r#"
            (() => {
                if (window.top !== window.self) return;
                if (window.__vinpanel_sentinel) return;
                const s = { mutations: 0, activity: 0, hovered: false, minimize: 0, expand: 0 };
                window.__vinpanel_sentinel = s;

                const ownSubtree = (node) => {
                    const root = document.getElementById('vinpanel-root');
                    const trigger = document.getElementById('vinpanel-trigger');
                    return (root && root.contains(node)) || (trigger && trigger.contains(node));
                };
                new MutationObserver((records) => {
                    for (const r of records) {
                        if (ownSubtree(r.target)) continue;
                        s.mutations += 1;
                    }
                }).observe(document.documentElement, { childList: true, subtree: true });

                for (const ev of ['pointerdown', 'keydown', 'scroll', 'wheel']) {
                    window.addEventListener(ev, () => { s.activity += 1; },
                        { passive: true, capture: true });
                }
            })();
        "#;
        self.client.execute(script, vec![]).await?;
        Ok(())
    }

    /// Read the sentinel counters and singleton node counts in one round
    /// trip.
    pub async fn probe(&self) -> Result<PageProbe> {
        let script = r#"
            const s = window.__vinpanel_sentinel;
            return {
                sentinel: !!s,
                url: location.href,
                mutations: s ? s.mutations : 0,
                activity: s ? s.activity : 0,
                hovered: s ? s.hovered : false,
                minimize: s ? s.minimize : 0,
                expand: s ? s.expand : 0,
                panels: document.querySelectorAll('[id="vinpanel-root"]').length,
                triggers: document.querySelectorAll('[id="vinpanel-trigger"]').length,
            };
        "#;
        let value = self.client.execute(script, vec![]).await?;
        let probe = serde_json::from_value(value).context("Failed to parse page probe")?;
        Ok(probe)
    }

    /// Create the panel subtree. The caller guarantees (via the lifecycle
    /// controller) that no visible panel exists; stray copies are handled by
    /// [`Browser::cleanup_duplicates`].
    pub async fn mount_panel(&self) -> Result<()> {
        let script = r#"
            (() => {
                if (window.top !== window.self) return;
                const panel = document.createElement('div');
                panel.id = 'vinpanel-root';
                panel.dataset.created = String(Date.now());
                panel.style.cssText = 'position:fixed;z-index:2147483647;bottom:16px;right:16px;' +
                    'width:420px;background:#fff;border:1px solid #e7e7e7;border-radius:12px;' +
                    'box-shadow:0 10px 28px rgba(0,0,0,.2);font-family:system-ui,Arial,sans-serif;' +
                    'color:#111;overflow:hidden;';
                panel.innerHTML =
                    '<div style="display:flex;align-items:center;gap:12px;padding:12px;">' +
                    '<div style="font-weight:700;">Vinconnect Assistant</div>' +
                    '<div id="vinpanel-context" style="flex:1;color:#888;"></div>' +
                    '<button id="vinpanel-minimize" style="padding:6px 10px;border:1px solid #ddd;' +
                    'border-radius:8px;background:#fff;cursor:pointer;">&ndash;</button>' +
                    '</div>' +
                    '<pre id="vinpanel-log" style="margin:0 12px 12px;height:220px;overflow:auto;' +
                    'white-space:pre-wrap;background:#0b1021;color:#c7e0ff;border-radius:10px;' +
                    'padding:10px;font-size:12px;"></pre>';
                document.documentElement.appendChild(panel);

                const s = window.__vinpanel_sentinel;
                if (s) {
                    panel.addEventListener('pointerenter', () => { s.hovered = true; });
                    panel.addEventListener('pointerleave', () => { s.hovered = false; });
                    const btn = panel.querySelector('#vinpanel-minimize');
                    if (btn) btn.addEventListener('click', () => { s.minimize += 1; });
                }
            })();
        "#;
        self.client.execute(script, vec![]).await?;
        debug!("Panel mounted");
        Ok(())
    }

    /// Remove every panel/trigger node except the most recently created one.
    /// Identity-based: nodes are compared and removed individually, never by
    /// assuming a count. Returns how many nodes were removed.
    pub async fn cleanup_duplicates(&self) -> Result<u64> {
        let script = r#"
            let removed = 0;
            for (const id of ['vinpanel-root', 'vinpanel-trigger']) {
                const nodes = Array.from(document.querySelectorAll('[id="' + id + '"]'));
                if (nodes.length <= 1) continue;
                nodes.sort((a, b) =>
                    Number(a.dataset.created || 0) - Number(b.dataset.created || 0));
                const keep = nodes[nodes.length - 1];
                for (const n of nodes) {
                    if (n !== keep) { n.remove(); removed += 1; }
                }
            }
            return removed;
        "#;
        let value = self.client.execute(script, vec![]).await?;
        let removed = value.as_u64().unwrap_or(0);
        if removed > 0 {
            debug!(removed, "Removed duplicate panel nodes");
        }
        Ok(removed)
    }

    /// Hide the panel and show the collapsed trigger control.
    pub async fn collapse_panel(&self) -> Result<()> {
        let script = r#"
            const panel = document.getElementById('vinpanel-root');
            if (panel) panel.style.display = 'none';
            if (!document.getElementById('vinpanel-trigger')) {
                const trigger = document.createElement('button');
                trigger.id = 'vinpanel-trigger';
                trigger.dataset.created = String(Date.now());
                trigger.textContent = 'VIN';
                trigger.style.cssText = 'position:fixed;z-index:2147483647;bottom:16px;right:16px;' +
                    'padding:10px 14px;border:0;border-radius:10px;background:#2563eb;color:#fff;' +
                    'font-weight:700;cursor:pointer;';
                trigger.addEventListener('click', () => {
                    const s = window.__vinpanel_sentinel;
                    if (s) s.expand += 1;
                });
                document.documentElement.appendChild(trigger);
            }
        "#;
        self.client.execute(script, vec![]).await?;
        Ok(())
    }

    /// Show the panel again and remove the trigger.
    pub async fn expand_panel(&self) -> Result<()> {
        let script = r#"
            const panel = document.getElementById('vinpanel-root');
            if (panel) panel.style.display = '';
            const trigger = document.getElementById('vinpanel-trigger');
            if (trigger) trigger.remove();
        "#;
        self.client.execute(script, vec![]).await?;
        Ok(())
    }

    /// Replace the panel body with content for the given context.
    pub async fn render_panel_body(&self, context_label: &str, text: &str) -> Result<()> {
        let script = r#"
            const tag = document.getElementById('vinpanel-context');
            if (tag) tag.textContent = arguments[0];
            const log = document.getElementById('vinpanel-log');
            if (log) { log.textContent = arguments[1]; log.scrollTop = log.scrollHeight; }
        "#;
        self.client
            .execute(script, vec![json!(context_label), json!(text)])
            .await?;
        Ok(())
    }

    /// Append a timestamped line to the panel log.
    pub async fn panel_log(&self, message: &str) -> Result<()> {
        let line = format!("{} {}", chrono::Local::now().format("%H:%M:%S"), message);
        let script = r#"
            const log = document.getElementById('vinpanel-log');
            if (log) {
                log.textContent = log.textContent
                    ? log.textContent + '\n' + arguments[0] : arguments[0];
                log.scrollTop = log.scrollHeight;
            }
        "#;
        self.client.execute(script, vec![json!(line)]).await?;
        Ok(())
    }

    /// The panel log's current text, empty when the panel is unmounted.
    pub async fn panel_text(&self) -> Result<String> {
        let script = r#"
            const log = document.getElementById('vinpanel-log');
            return log ? log.textContent : '';
        "#;
        let value = self.client.execute(script, vec![]).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    /// The page's current text selection, empty when nothing is selected.
    pub async fn selected_text(&self) -> Result<String> {
        let script = "return window.getSelection ? window.getSelection().toString() : '';";
        let value = self.client.execute(script, vec![]).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    /// Best-effort clipboard write; pages without clipboard permission fail
    /// silently on their side and that is acceptable here.
    pub async fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        let script = r#"
            if (navigator.clipboard && navigator.clipboard.writeText) {
                navigator.clipboard.writeText(arguments[0]).catch(() => {});
            }
        "#;
        self.client.execute(script, vec![json!(text)]).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "browser_test.rs"]
mod browser_test;
