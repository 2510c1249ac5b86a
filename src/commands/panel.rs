use anyhow::Result;
use clap::Subcommand;

use crate::commands::utils::require_watcher;
use crate::control::{ControlClient, ControlRequest, ControlResponse};

#[derive(Subcommand)]
pub enum PanelCommands {
    /// Flip the panel between visible and collapsed
    Toggle,

    /// Open the panel pre-filled with text (or the page's selection)
    Open {
        /// Text to pre-fill; omit to use the current selection
        #[arg(long, default_value = "")]
        text: String,
    },

    /// Run an immediate dashboard extraction in the watched tab
    Scrape,

    /// Copy the panel's current text to the clipboard
    Copy,

    /// Proxy a note through the running watcher's summarizer
    Summarize {
        /// Note to summarize
        note: String,
    },

    /// Check whether a watcher is running
    Status,

    /// Stop the running watcher
    Stop,
}

pub async fn handle_panel(command: PanelCommands) -> Result<()> {
    match command {
        PanelCommands::Status => {
            if ControlClient::is_watcher_running() {
                println!("Watcher is running");
            } else {
                println!("Watcher is not running");
            }
            return Ok(());
        }
        PanelCommands::Stop => {
            if !ControlClient::is_watcher_running() {
                println!("Watcher is not running");
                return Ok(());
            }
            match ControlClient::send_request(ControlRequest::Shutdown)? {
                ControlResponse::Ack(msg) => println!("{}", msg),
                other => println!("Unexpected response: {:?}", other),
            }
            return Ok(());
        }
        _ => {}
    }

    require_watcher()?;
    let request = match command {
        PanelCommands::Toggle => ControlRequest::TogglePanel,
        PanelCommands::Open { text } => ControlRequest::OpenWithSelection { text },
        PanelCommands::Scrape => ControlRequest::ScrapeDashboard,
        PanelCommands::Copy => ControlRequest::CopyLog,
        PanelCommands::Summarize { note } => ControlRequest::Summarize { note },
        PanelCommands::Status | PanelCommands::Stop => unreachable!(),
    };

    match ControlClient::send_request(request)? {
        ControlResponse::Ack(msg) => println!("{}", msg),
        ControlResponse::Summary(text) => println!("{}", text),
        ControlResponse::Report(report) => {
            println!("{}", serde_json::to_string_pretty(&report)?)
        }
        ControlResponse::Pong => println!("Watcher is running"),
        ControlResponse::Error(msg) => anyhow::bail!(msg),
    }
    Ok(())
}
