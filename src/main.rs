#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod browser;
mod commands;
mod context;
mod control;
mod errors;
mod extract;
mod panel;
mod pipeline;
mod report;
mod session;
mod snapshot;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const _EXIT_COMMAND_ERROR: i32 = 1;
const _EXIT_WATCHER_UNAVAILABLE: i32 = 2;
const _EXIT_BROWSER_FAILED: i32 = 4;
const _EXIT_TIMEOUT: i32 = 5;

use crate::commands::panel::PanelCommands;

#[derive(Parser)]
#[command(name = "vinpanel")]
#[command(about = "Context-aware assistant panel for VinConnect", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Attach to a browser, open a VinConnect tab, and run the watcher
    Watch {
        /// URL to open
        url: String,

        /// Browser to use (firefox or chrome)
        #[arg(short, long, default_value = "firefox")]
        browser: String,

        /// Run browser in visible mode (disables headless)
        #[arg(long = "no-headless")]
        no_headless: bool,

        /// Summarizer endpoint, repeatable (defaults to the local service)
        #[arg(long = "endpoint")]
        endpoints: Vec<String>,
    },

    /// Classify a page without a browser
    Classify {
        /// URL to fetch or local HTML file to read
        source: String,
    },

    /// Extract dashboard metrics from a URL or local HTML file
    Scrape {
        /// URL to fetch or local HTML file to read
        source: String,

        /// Print the panel text rendering instead of JSON
        #[arg(long)]
        text: bool,
    },

    /// Summarize a note via the local service
    Summarize {
        /// Note to summarize (reads stdin if omitted)
        note: Option<String>,

        /// Summarizer endpoint, repeatable (defaults to the local service)
        #[arg(long = "endpoint")]
        endpoints: Vec<String>,
    },

    /// Control a running watcher's panel
    Panel {
        #[command(subcommand)]
        command: PanelCommands,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() {
    let result = run().await;

    // Handle exit codes based on error type
    match result {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(err) => {
            // Convert to our error type to get proper exit code
            let vinpanel_err: errors::VinpanelError = err.into();

            // Output JSON error to stdout for programmatic consumption
            let error_json = json!({
                "error": true,
                "message": vinpanel_err.to_string(),
                "exit_code": vinpanel_err.exit_code()
            });
            println!(
                "{}",
                serde_json::to_string(&error_json).unwrap_or_else(|_| "{}".to_string())
            );

            // Also log to stderr for human reading
            eprintln!("Error: {}", vinpanel_err);
            std::process::exit(vinpanel_err.exit_code());
        }
    }
}

async fn run() -> Result<()> {
    // Initialize tracing to stderr (so JSON output to stdout remains clean)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vinpanel=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr) // Output logs to stderr
                .with_target(false), // Don't show target module in logs
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Watch {
            url,
            browser,
            no_headless,
            endpoints,
        } => commands::watch::handle_watch(url, browser, no_headless, endpoints).await?,

        Commands::Classify { source } => commands::classify::handle_classify(source).await?,

        Commands::Scrape { source, text } => commands::scrape::handle_scrape(source, text).await?,

        Commands::Summarize { note, endpoints } => {
            commands::summarize::handle_summarize(note, endpoints).await?
        }

        Commands::Panel { command } => commands::panel::handle_panel(command).await?,

        Commands::Version => {
            println!("vinpanel {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
