//! # vinpanel
#![allow(clippy::uninlined_format_args)]
//!
//! Context-aware assistant panel for the VinConnect dealer CRM.
//!
//! vinpanel attaches to a browser over WebDriver, watches a VinConnect tab,
//! classifies the screen the user is on, extracts the structured data that
//! screen carries (dashboard metrics, SMS transcripts), and renders an
//! overlay panel with that data plus drafts from a local summarizer service.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Start watching a VinConnect tab (runs in the foreground)
//! vinpanel watch "https://apps.vinmanager.com/vinconnect/pane-both/vinconnect-dealer-dashboard"
//!
//! # Control the panel from another shell
//! vinpanel panel toggle
//! vinpanel panel open --text "call back about the F-150"
//! vinpanel panel scrape | jq '.records[0].fields'
//! vinpanel panel stop
//!
//! # Offline analysis, no browser needed
//! vinpanel classify saved-page.html
//! vinpanel scrape saved-page.html --text
//!
//! # Talk to the local summarizer directly
//! echo "three test drives booked, two no-shows" | vinpanel summarize
//! ```
//!
//! ## Library Usage
//!
//! The extraction pipeline works on plain HTML and needs no browser:
//!
//! ```no_run
//! use vinpanel::{DocSnapshot, classify, scrape_dashboard};
//!
//! let doc = DocSnapshot::parse("https://example.com/dashboard", "<html>...</html>");
//! let context = classify(&doc);
//! let report = scrape_dashboard(&doc);
//! println!("{} records on the {} screen", report.records.len(), context);
//! ```

/// Summarizer service client
pub mod api;

/// WebDriver browser control: sentinel injection and panel DOM
pub mod browser;

/// Screen classification
pub mod context;

/// Control socket between CLI invocations and a running watcher
pub mod control;

/// Label, section, and value extraction from snapshots
pub mod extract;

/// Panel lifecycle state machine
pub mod panel;

/// The debounced watcher loop
pub mod pipeline;

/// Text renderings of extracted data
pub mod report;

/// Per-tab session state
pub mod session;

/// Parsed page snapshots and text normalization
pub mod snapshot;

pub use api::{SummarizeRequest, SummarizerClient};
pub use browser::{Browser, BrowserType, PageProbe};
pub use context::{PageContext, classify};
pub use extract::{DashboardReport, ExtractedRecord, FieldValue, scrape_dashboard};
pub use panel::{PanelAction, PanelController, PanelEvent, PanelPhase};
pub use snapshot::DocSnapshot;
