use std::collections::HashSet;

use lazy_static::lazy_static;
use scraper::{ElementRef, Selector};

use crate::snapshot::{DocSnapshot, display_text};

lazy_static! {
    // The SMS chat history panel, then looser class hints.
    static ref HOST_SELECTOR: Selector = Selector::parse(
        r#"[id*="pnlSMSChatHistory"], [class*="sms"], [class*="conversation"], [class*="chat"]"#
    )
    .unwrap();
    static ref BUBBLE_SELECTOR: Selector = Selector::parse(concat!(
        ".bubbleText, .message, .message-text, .speech-bubble, .messageBody, .smsMessage, ",
        r#"[class*="bubble"], [class*="msg"], [data-qa*="message"]"#
    ))
    .unwrap();
}

/// Carrier opt-out footers that add nothing to a drafting prompt.
const BOILERPLATE_MARKERS: &[&str] = &["reply stop to cancel"];

/// Recover the message transcript from a texting popup snapshot.
///
/// Looks for the chat history container first and collects message bubbles
/// under it, de-duplicated and stripped of boilerplate footers. When the
/// layout defeats every bubble selector, falls back to the whole body text so
/// the caller still has something to draft from.
pub fn transcript(doc: &DocSnapshot) -> String {
    let host = doc
        .document()
        .select(&HOST_SELECTOR)
        .next()
        .unwrap_or_else(|| doc.root());

    let mut seen: HashSet<String> = HashSet::new();
    let mut lines: Vec<String> = Vec::new();

    for bubble in bubbles_under(host) {
        let text = display_text(bubble);
        if text.len() < 2 {
            continue;
        }
        let key = text.to_lowercase();
        if BOILERPLATE_MARKERS.iter().any(|m| key.contains(m)) {
            continue;
        }
        if !seen.insert(key) {
            continue;
        }
        lines.push(text);
    }

    if lines.is_empty() {
        doc.body_text()
    } else {
        lines.join("\n")
    }
}

fn bubbles_under<'a>(host: ElementRef<'a>) -> Vec<ElementRef<'a>> {
    // Innermost bubbles only: a wrapper that itself matches would duplicate
    // every message it contains.
    host.select(&BUBBLE_SELECTOR)
        .filter(|el| el.select(&BUBBLE_SELECTOR).next().is_none())
        .collect()
}

#[cfg(test)]
#[path = "conversation_test.rs"]
mod conversation_test;
