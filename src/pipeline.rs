//! The watcher loop: one coalescing event source feeding one
//! classification+render pipeline.
//!
//! Navigation, DOM mutation, user activity, and control requests all funnel
//! through this single task, so classification and rendering are totally
//! ordered per burst. Mutation bursts are debounced with a fixed quiet
//! period before a pass runs; the host page mutates its tree many times per
//! navigation and acting on each one would flicker and double-render.
//! Network results carry the pass counter that started them and are dropped
//! when a newer pass has run since (stale-response guard).

use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::api::{ApiError, SummarizeRequest, SummarizerClient};
use crate::browser::{Browser, PageProbe};
use crate::context::{self, PageContext};
use crate::control::{ControlChannel, ControlRequest, ControlResponse};
use crate::extract::{self, DashboardReport};
use crate::panel::{PanelAction, PanelController, PanelEvent, PanelPhase};
use crate::report;
use crate::session::TabSession;
use crate::snapshot::DocSnapshot;

/// Quiet period after the last observed mutation before a pass runs.
pub const QUIET_PERIOD: Duration = Duration::from_millis(250);

/// Sentinel polling cadence; also the granularity of lifecycle deadlines.
pub const POLL_INTERVAL: Duration = Duration::from_millis(300);

/// Upper bound on debounce rounds so a permanently chattering page cannot
/// starve the pipeline.
const MAX_DEBOUNCE_ROUNDS: usize = 20;

/// Result of one classification pass over a snapshot.
pub struct PassOutcome {
    pub context: PageContext,
    pub body: PassBody,
}

/// What the panel body shows for the classified context.
pub enum PassBody {
    Dashboard(DashboardReport),
    Conversation { prompt: String, fallback: String },
    Plain(String),
}

/// Classify a snapshot and derive the panel content for it. Pure with
/// respect to the inputs; the snapshot lives only inside this call, honoring
/// the rule that node references never outlive one pass.
pub fn compute_pass(url: &str, html: &str) -> PassOutcome {
    let doc = DocSnapshot::parse(url, html);
    let context = context::classify(&doc);
    let body = match context {
        PageContext::Dashboard => PassBody::Dashboard(extract::scrape_dashboard(&doc)),
        PageContext::Conversation => {
            let transcript = extract::conversation::transcript(&doc);
            PassBody::Conversation {
                prompt: report::format_conversation_prompt(&transcript),
                fallback: "Local summarizer unreachable; showing the transcript only."
                    .to_string(),
            }
        }
        PageContext::Unknown => PassBody::Plain(
            "Unknown context. Open the dealer dashboard or the VIN text pop-up.".to_string(),
        ),
        other => PassBody::Plain(format!("Watching the {} screen.", other)),
    };
    PassOutcome { context, body }
}

/// Whether the host page removed our mounted nodes. While collapsed the root
/// stays in the tree hidden, so a missing trigger alone also counts as a
/// purge.
pub fn panel_purged(phase: PanelPhase, collapsed: bool, probe: &PageProbe) -> bool {
    if phase == PanelPhase::Unmounted {
        return false;
    }
    probe.panels == 0 || (collapsed && probe.triggers == 0)
}

struct ApiOutcome {
    pass: u64,
    result: Result<String, ApiError>,
    fallback: String,
}

/// The watcher owns the browser session, the lifecycle controller, and the
/// per-tab session for exactly one top-level document.
pub struct Watcher {
    browser: Browser,
    api: SummarizerClient,
    controller: PanelController,
    session: TabSession,
    baseline: PageProbe,
    pass: u64,
    api_tx: mpsc::Sender<ApiOutcome>,
    api_rx: mpsc::Receiver<ApiOutcome>,
}

impl Watcher {
    pub fn new(browser: Browser, api: SummarizerClient) -> Self {
        let (api_tx, api_rx) = mpsc::channel(8);
        Watcher {
            browser,
            api,
            controller: PanelController::new(Instant::now()),
            session: TabSession::new(),
            baseline: PageProbe::default(),
            pass: 0,
            api_tx,
            api_rx,
        }
    }

    /// Run until a `Shutdown` control request arrives or the control channel
    /// closes. The inactivity timer lives inside this loop, so it cannot
    /// outlive the watcher.
    pub async fn run(mut self, mut control_rx: mpsc::Receiver<ControlChannel>) -> Result<()> {
        self.browser.install_sentinel().await?;
        self.baseline = self.browser.probe().await?;

        let boot = self.controller.handle(PanelEvent::Boot, Instant::now());
        self.apply_actions(boot).await?;
        self.run_pass().await?;

        loop {
            while let Ok(outcome) = self.api_rx.try_recv() {
                self.handle_api_outcome(outcome).await?;
            }
            match tokio::time::timeout(POLL_INTERVAL, control_rx.recv()).await {
                Ok(Some(channel)) => {
                    if self.handle_control(channel).await? {
                        break;
                    }
                }
                Ok(None) => break,
                Err(_) => self.poll().await?,
            }
        }

        info!(
            browser = %self.browser.browser_type(),
            context = %self.session.last_context(),
            collapsed = self.session.collapsed(),
            "Watcher shutting down"
        );
        self.browser.close().await
    }

    /// One observation round: read the sentinel, turn deltas into lifecycle
    /// events, and kick off a debounced pass when a burst is detected.
    async fn poll(&mut self) -> Result<()> {
        let probe = self.browser.probe().await?;
        let now = Instant::now();

        let mut burst = false;
        if !probe.sentinel {
            // Navigation wiped the injected state.
            debug!("Sentinel missing, reinstalling after navigation");
            self.browser.install_sentinel().await?;
            burst = true;
        }
        if probe.url != self.baseline.url || probe.mutations != self.baseline.mutations {
            burst = true;
        }

        self.absorb_interaction(&probe, now).await?;

        if probe.panels > 1 || probe.triggers > 1 {
            // Self-healing: more than one singleton node is a defect, remove
            // all but the newest before anything else runs.
            self.browser.cleanup_duplicates().await?;
        }
        let purged = panel_purged(self.controller.phase(), self.session.collapsed(), &probe);
        let root_present = probe.panels > 0;
        self.baseline = probe;

        if burst {
            self.debounce().await?;
            self.run_pass().await?;
        } else if purged {
            if root_present {
                // Only the trigger was removed; the hidden root survived, so
                // recreating the trigger is enough.
                self.browser.collapse_panel().await?;
            } else {
                let actions = self.controller.handle(PanelEvent::PanelMissing, now);
                let needs_render = self.apply_actions(actions).await?;
                if needs_render {
                    self.render_content().await?;
                }
            }
        } else if self.controller.deadline().is_some_and(|d| now >= d) {
            let actions = self.controller.handle(PanelEvent::Tick, now);
            self.apply_actions(actions).await?;
        }
        Ok(())
    }

    /// Fold user-interaction deltas from a probe into the controller.
    async fn absorb_interaction(&mut self, probe: &PageProbe, now: Instant) -> Result<()> {
        if probe.activity > self.baseline.activity {
            let actions = self.controller.handle(PanelEvent::Activity, now);
            self.apply_actions(actions).await?;
        }
        if probe.hovered != self.baseline.hovered {
            let actions = self
                .controller
                .handle(PanelEvent::HoverChanged(probe.hovered), now);
            self.apply_actions(actions).await?;
        }
        if probe.minimize > self.baseline.minimize {
            let actions = self.controller.handle(PanelEvent::Minimize, now);
            self.apply_actions(actions).await?;
        }
        if probe.expand > self.baseline.expand {
            let actions = self.controller.handle(PanelEvent::Expand, now);
            let needs_render = self.apply_actions(actions).await?;
            if needs_render {
                self.render_content().await?;
            }
        }
        Ok(())
    }

    /// Wait out the mutation burst: keep sampling until a full quiet period
    /// passes with no further mutations, bounded so a chattering page cannot
    /// stall classification forever.
    async fn debounce(&mut self) -> Result<()> {
        for _ in 0..MAX_DEBOUNCE_ROUNDS {
            tokio::time::sleep(QUIET_PERIOD).await;
            let probe = self.browser.probe().await?;
            if !probe.sentinel {
                self.browser.install_sentinel().await?;
            }
            let now = Instant::now();
            self.absorb_interaction(&probe, now).await?;
            let quiet =
                probe.mutations == self.baseline.mutations && probe.url == self.baseline.url;
            self.baseline = probe;
            if quiet {
                break;
            }
        }
        Ok(())
    }

    /// One full classification pass: snapshot, classify, transition, render.
    async fn run_pass(&mut self) -> Result<()> {
        self.pass += 1;
        let pass = self.pass;
        let (url, html) = self.browser.page_snapshot().await?;
        let outcome = compute_pass(&url, &html);
        if outcome.context != self.session.last_context() {
            info!(pass, context = %outcome.context, "screen changed");
        } else {
            debug!(pass, context = %outcome.context, "classification pass");
        }

        let actions = self
            .controller
            .handle(PanelEvent::ContextChanged(outcome.context), Instant::now());
        self.session.set_last_context(outcome.context);
        self.apply_actions(actions).await?;

        if self.controller.phase() == PanelPhase::Visible {
            self.render_outcome(pass, outcome).await?;
        }
        Ok(())
    }

    /// Re-render from a fresh snapshot, for transitions that need content but
    /// happened outside a classification pass (toggle, expand, remount).
    async fn render_content(&mut self) -> Result<()> {
        self.pass += 1;
        let pass = self.pass;
        let (url, html) = self.browser.page_snapshot().await?;
        let outcome = compute_pass(&url, &html);
        self.render_outcome(pass, outcome).await
    }

    async fn render_outcome(&mut self, pass: u64, outcome: PassOutcome) -> Result<()> {
        let label = outcome.context.to_string();
        match outcome.body {
            PassBody::Dashboard(report) => {
                let text = report::format_dashboard_text(&report);
                self.browser.render_panel_body(&label, &text).await?;
            }
            PassBody::Conversation { prompt, fallback } => {
                self.browser.render_panel_body(&label, &prompt).await?;
                self.spawn_api_call(pass, prompt, fallback);
            }
            PassBody::Plain(text) => {
                self.browser.render_panel_body(&label, &text).await?;
            }
        }
        Ok(())
    }

    /// Fire the drafting call without blocking the loop. The outcome comes
    /// back tagged with `pass` so late responses cannot overwrite newer
    /// panel content.
    fn spawn_api_call(&self, pass: u64, prompt: String, fallback: String) {
        let api = self.api.clone();
        let tx = self.api_tx.clone();
        tokio::spawn(async move {
            let result = api.suggest(&SummarizeRequest::note(prompt)).await;
            let _ = tx.send(ApiOutcome {
                pass,
                result,
                fallback,
            })
            .await;
        });
    }

    async fn handle_api_outcome(&mut self, outcome: ApiOutcome) -> Result<()> {
        if outcome.pass != self.pass {
            debug!(
                stale = outcome.pass,
                current = self.pass,
                "Discarding stale summarizer response"
            );
            return Ok(());
        }
        if self.controller.phase() != PanelPhase::Visible {
            return Ok(());
        }
        match outcome.result {
            Ok(text) => {
                self.browser
                    .panel_log(&format!("--- Suggested reply ---\n{}", text))
                    .await?;
            }
            Err(e) => {
                warn!(error = %e, "Summarizer call failed, using local fallback");
                self.browser.panel_log(&outcome.fallback).await?;
            }
        }
        Ok(())
    }

    /// Handle one control request. Always answers on the reply slot; returns
    /// true when the watcher should shut down.
    async fn handle_control(&mut self, channel: ControlChannel) -> Result<bool> {
        let ControlChannel { request, reply } = channel;
        let mut shutdown = false;
        let response = match request {
            ControlRequest::Ping => ControlResponse::Pong,
            ControlRequest::Shutdown => {
                shutdown = true;
                ControlResponse::Ack("Watcher shutting down".to_string())
            }
            ControlRequest::TogglePanel => match self.toggle().await {
                Ok(msg) => ControlResponse::Ack(msg),
                Err(e) => ControlResponse::Error(e.to_string()),
            },
            ControlRequest::OpenWithSelection { text } => {
                match self.open_with_selection(text).await {
                    Ok(msg) => ControlResponse::Ack(msg),
                    Err(e) => ControlResponse::Error(e.to_string()),
                }
            }
            ControlRequest::ScrapeDashboard => match self.scrape_now().await {
                Ok(report) => ControlResponse::Report(report),
                Err(e) => ControlResponse::Error(e.to_string()),
            },
            ControlRequest::CopyLog => match self.copy_panel_text().await {
                Ok(msg) => ControlResponse::Ack(msg),
                Err(e) => ControlResponse::Error(e.to_string()),
            },
            ControlRequest::Summarize { note } => {
                // The reply slot moves into the task so the channel stays
                // open until the service answers or fails.
                self.summarize_async(note, reply);
                return Ok(false);
            }
        };
        let _ = reply.send(response);
        Ok(shutdown)
    }

    async fn toggle(&mut self) -> Result<String> {
        let actions = self.controller.handle(PanelEvent::Toggle, Instant::now());
        let needs_render = self.apply_actions(actions).await?;
        if needs_render {
            self.render_content().await?;
        }
        Ok(match self.controller.phase() {
            PanelPhase::Visible => "Panel visible".to_string(),
            PanelPhase::Collapsed => "Panel collapsed".to_string(),
            PanelPhase::Unmounted => "Panel unmounted".to_string(),
        })
    }

    async fn open_with_selection(&mut self, text: String) -> Result<String> {
        let text = if text.is_empty() {
            self.browser.selected_text().await?
        } else {
            text
        };
        let actions = self.controller.handle(PanelEvent::Open, Instant::now());
        self.apply_actions(actions).await?;
        if text.is_empty() {
            self.render_content().await?;
            return Ok("Panel opened; no selection found".to_string());
        }
        let label = self.controller.context().to_string();
        self.browser
            .render_panel_body(&label, &format!("Selection:\n{}", text))
            .await?;
        Ok("Panel opened with selection".to_string())
    }

    async fn copy_panel_text(&mut self) -> Result<String> {
        let text = self.browser.panel_text().await?;
        if text.is_empty() {
            anyhow::bail!("Panel has no content to copy");
        }
        self.browser.copy_to_clipboard(&text).await?;
        Ok("Panel text copied to clipboard".to_string())
    }

    /// Immediate extraction pass, regardless of debouncing.
    async fn scrape_now(&mut self) -> Result<DashboardReport> {
        self.pass += 1;
        let (url, html) = self.browser.page_snapshot().await?;
        let report = {
            let doc = DocSnapshot::parse(&url, &html);
            extract::scrape_dashboard(&doc)
        };
        if self.controller.phase() == PanelPhase::Visible {
            let text = report::format_dashboard_text(&report);
            self.browser.render_panel_body("dashboard", &text).await?;
        }
        Ok(report)
    }

    fn summarize_async(&self, note: String, reply: oneshot::Sender<ControlResponse>) {
        let api = self.api.clone();
        tokio::spawn(async move {
            let response = match api.summarize(&SummarizeRequest::note(note)).await {
                Ok(text) => ControlResponse::Summary(text),
                Err(e) => ControlResponse::Error(e.to_string()),
            };
            let _ = reply.send(response);
        });
    }

    /// Execute lifecycle actions against the DOM. Returns whether any of
    /// them asked for a content re-render, which callers perform from a
    /// fresh snapshot.
    async fn apply_actions(&mut self, actions: Vec<PanelAction>) -> Result<bool> {
        let mut needs_render = false;
        for action in actions {
            match action {
                PanelAction::CleanupDuplicates => {
                    self.browser.cleanup_duplicates().await?;
                }
                PanelAction::Mount => self.browser.mount_panel().await?,
                PanelAction::RenderBody(_) => needs_render = true,
                PanelAction::Collapse => self.browser.collapse_panel().await?,
                PanelAction::Expand => self.browser.expand_panel().await?,
            }
        }
        self.session
            .set_collapsed(self.controller.phase() == PanelPhase::Collapsed);
        Ok(needs_render)
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod pipeline_test;
