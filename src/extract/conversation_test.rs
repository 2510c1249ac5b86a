// Unit tests for conversation transcript recovery

use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_collects_bubbles_in_order() {
    let doc = DocSnapshot::parse(
        "https://x.test",
        r#"<html><body>
            <div id="pnlSMSChatHistory">
              <div class="bubbleText">Hi, is the Tahoe still available?</div>
              <div class="bubbleText">Yes! Want to come by today?</div>
            </div>
        </body></html>"#,
    );
    assert_eq!(
        transcript(&doc),
        "Hi, is the Tahoe still available?\nYes! Want to come by today?"
    );
}

#[test]
fn test_deduplicates_and_drops_boilerplate() {
    let doc = DocSnapshot::parse(
        "https://x.test",
        r#"<html><body>
            <div class="chatWindow">
              <div class="message">Sounds good</div>
              <div class="message">Sounds good</div>
              <div class="message">Reply STOP to cancel</div>
              <div class="message">x</div>
            </div>
        </body></html>"#,
    );
    assert_eq!(transcript(&doc), "Sounds good");
}

#[test]
fn test_wrapper_bubbles_do_not_duplicate_messages() {
    let doc = DocSnapshot::parse(
        "https://x.test",
        r#"<html><body>
            <div class="sms-history">
              <div class="msgRow"><div class="bubbleText">See you at 3pm</div></div>
            </div>
        </body></html>"#,
    );
    assert_eq!(transcript(&doc), "See you at 3pm");
}

#[test]
fn test_body_fallback_when_no_bubbles_match() {
    let doc = DocSnapshot::parse(
        "https://x.test",
        "<html><body><p>Customer called about financing.</p></body></html>",
    );
    assert_eq!(transcript(&doc), "customer called about financing.");
}
