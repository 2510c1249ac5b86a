//! Per-tab ephemeral state: exactly two keys, scoped to one watcher's
//! lifetime and discarded with it. Nothing here survives across sessions.

use crate::context::PageContext;

#[derive(Debug, Clone)]
pub struct TabSession {
    collapsed: bool,
    last_context: PageContext,
}

impl TabSession {
    pub fn new() -> Self {
        TabSession {
            collapsed: false,
            last_context: PageContext::Unknown,
        }
    }

    pub fn collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn set_collapsed(&mut self, collapsed: bool) {
        self.collapsed = collapsed;
    }

    pub fn last_context(&self) -> PageContext {
        self.last_context
    }

    pub fn set_last_context(&mut self, context: PageContext) {
        self.last_context = context;
    }
}

impl Default for TabSession {
    fn default() -> Self {
        Self::new()
    }
}
