use serde::{Deserialize, Serialize};
use std::fmt;

use crate::snapshot::DocSnapshot;

/// The logical screen the host application is currently showing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageContext {
    /// Deal structuring screen
    Desking,
    /// Main dealer dashboard
    Dashboard,
    /// SMS texting popup
    Conversation,
    /// Vehicle inventory search
    Inventory,
    /// Single customer record
    Customer,
    /// Lead management bucket
    Leads,
    /// No context predicate matched
    Unknown,
}

impl PageContext {
    pub fn is_known(&self) -> bool {
        !matches!(self, PageContext::Unknown)
    }
}

impl fmt::Display for PageContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PageContext::Desking => "desking",
            PageContext::Dashboard => "dashboard",
            PageContext::Conversation => "conversation",
            PageContext::Inventory => "inventory",
            PageContext::Customer => "customer",
            PageContext::Leads => "leads",
            PageContext::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// One context definition: a tag and a pure predicate over the snapshot.
struct ContextDef {
    context: PageContext,
    matches: fn(&DocSnapshot) -> bool,
}

// Evaluation order is part of the contract. Predicates overlap ("Desking" text
// shows up inside a dashboard activity feed), so the first match wins and the
// list must stay in priority order:
// Desking > Dashboard > Conversation > Inventory > Customer > Leads.
const CONTEXT_DEFS: &[ContextDef] = &[
    ContextDef {
        context: PageContext::Desking,
        matches: is_desking,
    },
    ContextDef {
        context: PageContext::Dashboard,
        matches: is_dashboard,
    },
    ContextDef {
        context: PageContext::Conversation,
        matches: is_conversation,
    },
    ContextDef {
        context: PageContext::Inventory,
        matches: is_inventory,
    },
    ContextDef {
        context: PageContext::Customer,
        matches: is_customer,
    },
    ContextDef {
        context: PageContext::Leads,
        matches: is_leads,
    },
];

fn is_desking(doc: &DocSnapshot) -> bool {
    doc.url_contains("vinconnect-desking")
        || doc.url_contains("/desking")
        || doc.matches_selector(r#"[id*="DeskingWorkspace"]"#)
}

fn is_dashboard(doc: &DocSnapshot) -> bool {
    doc.url_contains("/vinconnect/pane-both/vinconnect-dealer-dashboard")
        || doc.has_phrase("Sales Funnel")
}

fn is_conversation(doc: &DocSnapshot) -> bool {
    // VIN texting popup (Comms window)
    doc.url_contains("communication.vinwfetextingbase")
        || doc.matches_selector(r#"[id*="pnlSMSChatHistory"]"#)
        || doc.matches_selector(r#"textarea[maxlength="1200"]"#)
}

fn is_inventory(doc: &DocSnapshot) -> bool {
    doc.url_contains("vehicle-inventory") || doc.has_phrase("Inventory Search")
}

fn is_customer(doc: &DocSnapshot) -> bool {
    doc.url_contains("customer-dashboard") || doc.matches_selector(r#"[id*="CustomerRecord"]"#)
}

fn is_leads(doc: &DocSnapshot) -> bool {
    doc.url_contains("lead-management") || doc.has_phrase("Unassigned Leads")
}

/// Classify the snapshot into exactly one context.
///
/// Total and deterministic for a given snapshot, side-effect free, and cheap
/// enough to call from the debounced mutation loop at arbitrary frequency.
pub fn classify(doc: &DocSnapshot) -> PageContext {
    for def in CONTEXT_DEFS {
        if (def.matches)(doc) {
            return def.context;
        }
    }
    PageContext::Unknown
}

#[cfg(test)]
#[path = "context_test.rs"]
mod context_test;
