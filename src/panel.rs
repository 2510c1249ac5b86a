//! Panel lifecycle state machine.
//!
//! The controller is pure: it consumes events with an explicit `now` and
//! returns the DOM actions the browser layer must perform. Keeping the time
//! source and the DOM out of the transitions makes every lifecycle rule
//! testable without a browser.

use std::time::{Duration, Instant};

use crate::context::PageContext;

/// How long the panel stays visible with no activity and no hover.
pub const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(90);

/// How long an `Unknown` classification is tolerated before auto-collapse.
pub const UNKNOWN_GRACE: Duration = Duration::from_secs(20);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelPhase {
    Unmounted,
    Visible,
    Collapsed,
}

/// Inputs to the state machine: user actions, observation deltas, and time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    /// First boot signal after attach.
    Boot,
    /// Explicit open request (toolbar action, open-with-selection).
    Open,
    /// Explicit visible/collapsed flip.
    Toggle,
    /// Explicit minimize from the panel header.
    Minimize,
    /// Explicit expand from the collapsed trigger control.
    Expand,
    /// Pointer/keyboard/scroll activity anywhere on the page.
    Activity,
    /// Pointer entered or left the panel itself.
    HoverChanged(bool),
    /// The debounced classification pass produced this context.
    ContextChanged(PageContext),
    /// The singleton panel is missing from the tree (host page purged it).
    PanelMissing,
    /// The deadline returned by [`PanelController::deadline`] elapsed.
    Tick,
}

/// DOM work the browser layer performs in response to a transition. A render
/// pass that is already in the target state produces no actions; it must
/// never create a second subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelAction {
    /// Remove all panel/trigger nodes except the most recently created.
    CleanupDuplicates,
    Mount,
    RenderBody(PageContext),
    Collapse,
    Expand,
}

pub struct PanelController {
    phase: PanelPhase,
    last_activity: Instant,
    hovered: bool,
    context: PageContext,
    unknown_since: Option<Instant>,
}

impl PanelController {
    pub fn new(now: Instant) -> Self {
        PanelController {
            phase: PanelPhase::Unmounted,
            last_activity: now,
            hovered: false,
            context: PageContext::Unknown,
            unknown_since: None,
        }
    }

    pub fn phase(&self) -> PanelPhase {
        self.phase
    }

    pub fn context(&self) -> PageContext {
        self.context
    }

    /// The next instant at which [`PanelEvent::Tick`] could cause a
    /// transition, or `None` when no timer is needed. The caller owns the
    /// actual timer and drops it with the controller, so nothing leaks past
    /// teardown.
    pub fn deadline(&self) -> Option<Instant> {
        if self.phase != PanelPhase::Visible {
            return None;
        }
        let mut next = None;
        if !self.hovered {
            next = Some(self.last_activity + INACTIVITY_TIMEOUT);
        }
        if let Some(since) = self.unknown_since {
            let grace = since + UNKNOWN_GRACE;
            next = Some(next.map_or(grace, |n: Instant| n.min(grace)));
        }
        next
    }

    pub fn handle(&mut self, event: PanelEvent, now: Instant) -> Vec<PanelAction> {
        match event {
            PanelEvent::Boot | PanelEvent::Open => self.show(now),
            PanelEvent::Toggle => match self.phase {
                PanelPhase::Visible => self.collapse(),
                _ => self.show(now),
            },
            PanelEvent::Minimize => match self.phase {
                PanelPhase::Visible => self.collapse(),
                _ => Vec::new(),
            },
            PanelEvent::Expand => match self.phase {
                PanelPhase::Collapsed => self.show(now),
                _ => Vec::new(),
            },
            PanelEvent::Activity => {
                self.last_activity = now;
                Vec::new()
            }
            PanelEvent::HoverChanged(hovered) => {
                // Leaving the panel counts as activity, so the inactivity
                // window restarts from the hover end.
                if self.hovered && !hovered {
                    self.last_activity = now;
                }
                self.hovered = hovered;
                Vec::new()
            }
            PanelEvent::ContextChanged(context) => self.context_changed(context, now),
            PanelEvent::PanelMissing => self.remount(now),
            PanelEvent::Tick => self.tick(now),
        }
    }

    /// Transition into Mounted(Visible). No-op when already visible.
    fn show(&mut self, now: Instant) -> Vec<PanelAction> {
        match self.phase {
            PanelPhase::Visible => Vec::new(),
            PanelPhase::Unmounted => {
                self.phase = PanelPhase::Visible;
                self.last_activity = now;
                vec![
                    PanelAction::CleanupDuplicates,
                    PanelAction::Mount,
                    PanelAction::RenderBody(self.context),
                ]
            }
            PanelPhase::Collapsed => {
                self.phase = PanelPhase::Visible;
                self.last_activity = now;
                vec![PanelAction::Expand, PanelAction::RenderBody(self.context)]
            }
        }
    }

    fn collapse(&mut self) -> Vec<PanelAction> {
        self.phase = PanelPhase::Collapsed;
        vec![PanelAction::Collapse]
    }

    fn context_changed(&mut self, context: PageContext, now: Instant) -> Vec<PanelAction> {
        if context.is_known() {
            self.unknown_since = None;
        } else if self.unknown_since.is_none() {
            self.unknown_since = Some(now);
        }

        if context == self.context {
            return Vec::new();
        }
        self.context = context;
        match self.phase {
            PanelPhase::Visible => vec![PanelAction::RenderBody(context)],
            _ => Vec::new(),
        }
    }

    /// The host page purged our subtree: rebuild it in the phase we last
    /// held, cleaning up any stray copies first.
    fn remount(&mut self, now: Instant) -> Vec<PanelAction> {
        match self.phase {
            PanelPhase::Collapsed => vec![
                PanelAction::CleanupDuplicates,
                PanelAction::Mount,
                PanelAction::Collapse,
            ],
            _ => {
                self.phase = PanelPhase::Unmounted;
                self.show(now)
            }
        }
    }

    fn tick(&mut self, now: Instant) -> Vec<PanelAction> {
        if self.phase != PanelPhase::Visible {
            return Vec::new();
        }
        let unknown_expired = self
            .unknown_since
            .is_some_and(|since| now >= since + UNKNOWN_GRACE);
        let inactive =
            !self.hovered && now.duration_since(self.last_activity) >= INACTIVITY_TIMEOUT;
        if unknown_expired || inactive {
            self.collapse()
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
#[path = "panel_test.rs"]
mod panel_test;
