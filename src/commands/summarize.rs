use anyhow::Result;
use std::io::Read;

use crate::api::{SummarizeRequest, SummarizerClient};

/// Send a note to the local summarizer service and print the result. Reads
/// stdin when no note is given, so it composes with pipes.
pub async fn handle_summarize(note: Option<String>, endpoints: Vec<String>) -> Result<()> {
    let note = match note {
        Some(note) => note,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    if note.trim().is_empty() {
        anyhow::bail!("Nothing to summarize: pass a note or pipe text on stdin");
    }

    let client = if endpoints.is_empty() {
        SummarizerClient::with_default_endpoints()?
    } else {
        let refs: Vec<&str> = endpoints.iter().map(String::as_str).collect();
        SummarizerClient::new(&refs)?
    };

    let summary = client.summarize(&SummarizeRequest::note(note)).await?;
    println!("{}", summary);
    Ok(())
}
