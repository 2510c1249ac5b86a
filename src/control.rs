//! Control channel between CLI invocations and a running watcher.
//!
//! Newline-delimited JSON over a local socket. The server side forwards every
//! request into the watcher's event loop with a reply slot and always writes
//! a response back, success or explicit failure; requests are never silently
//! dropped.

use anyhow::{Context, Result};
use interprocess::local_socket::{
    GenericFilePath, Listener, ListenerOptions, Name, Stream, ToFsName,
    traits::{ListenerExt, Stream as StreamTrait},
};
use serde::{Deserialize, Serialize};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

use crate::extract::DashboardReport;

/// Messages a client can send to the watcher.
#[derive(Debug, Serialize, Deserialize)]
pub enum ControlRequest {
    /// Flip the panel Visible <-> Collapsed.
    TogglePanel,
    /// Open the panel pre-filled with the given text; empty text means "use
    /// the page's current selection".
    OpenWithSelection { text: String },
    /// Run an immediate dashboard extraction pass.
    ScrapeDashboard,
    /// Copy the panel's current text to the page clipboard.
    CopyLog,
    /// Proxy a note to the summarizer service.
    Summarize { note: String },
    Ping,
    Shutdown,
}

/// Replies from the watcher.
#[derive(Debug, Serialize, Deserialize)]
pub enum ControlResponse {
    Ack(String),
    Summary(String),
    Report(DashboardReport),
    Error(String),
    Pong,
}

/// One in-flight request: the payload plus the slot the watcher must answer
/// on. Dropping the slot without replying is converted into an explicit
/// error response by the socket handler.
pub struct ControlChannel {
    pub request: ControlRequest,
    pub reply: oneshot::Sender<ControlResponse>,
}

pub struct ControlServer;

impl ControlServer {
    fn socket_path() -> Result<PathBuf> {
        let runtime_dir = dirs::runtime_dir()
            .or_else(dirs::cache_dir)
            .or_else(|| std::env::temp_dir().into())
            .context("Could not determine runtime directory")?;
        Ok(runtime_dir.join("vinpanel-control.sock"))
    }

    fn socket_name() -> Result<Name<'static>> {
        let socket_path = Self::socket_path()?;
        let path_string = socket_path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("Socket path is not valid UTF-8"))?
            .to_owned();
        // Leak the string to get 'static lifetime - one watcher per machine
        let path_str: &'static str = Box::leak(path_string.into_boxed_str());
        Ok(path_str.to_fs_name::<GenericFilePath>()?)
    }

    pub fn is_watcher_running() -> bool {
        match Self::socket_name() {
            Ok(name) => Stream::connect(name).is_ok(),
            Err(_) => false,
        }
    }

    /// Bind the socket and serve it from a dedicated thread, forwarding each
    /// request into `tx`. The thread ends when the listener errors out or the
    /// watcher side of `tx` is gone.
    pub fn spawn(tx: mpsc::Sender<ControlChannel>) -> Result<std::thread::JoinHandle<()>> {
        if Self::is_watcher_running() {
            anyhow::bail!("A watcher is already running");
        }

        let socket_path = Self::socket_path()?;
        if socket_path.exists() {
            std::fs::remove_file(&socket_path)?;
        }

        let name = Self::socket_name()?;
        let listener = ListenerOptions::new().name(name).create_sync()?;
        info!("Control channel listening on {:?}", socket_path);

        let handle = std::thread::spawn(move || Self::run_server(listener, tx));
        Ok(handle)
    }

    fn run_server(listener: Listener, tx: mpsc::Sender<ControlChannel>) {
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    if let Err(e) = Self::handle_client(stream, &tx) {
                        error!("Error handling control client: {}", e);
                    }
                }
                Err(e) => {
                    error!("Error accepting control connection: {}", e);
                }
            }
            if tx.is_closed() {
                debug!("Watcher gone, control channel shutting down");
                break;
            }
        }
        if let Ok(path) = Self::socket_path() {
            let _ = std::fs::remove_file(path);
        }
    }

    fn handle_client(mut stream: Stream, tx: &mpsc::Sender<ControlChannel>) -> Result<()> {
        let mut reader = BufReader::new(&mut stream);
        let mut request_line = String::new();
        let bytes_read = reader.read_line(&mut request_line)?;

        // Zero bytes is just a connection check (from is_watcher_running)
        if bytes_read == 0 || request_line.trim().is_empty() {
            return Ok(());
        }

        let request: ControlRequest = serde_json::from_str(request_line.trim_end())?;
        debug!("Received control request: {:?}", request);

        let (reply_tx, reply_rx) = oneshot::channel();
        let response = if tx
            .blocking_send(ControlChannel {
                request,
                reply: reply_tx,
            })
            .is_err()
        {
            ControlResponse::Error("Watcher is shutting down".to_string())
        } else {
            // The watcher must always answer; a dropped slot becomes an
            // explicit failure instead of a hung client.
            reply_rx
                .blocking_recv()
                .unwrap_or_else(|_| ControlResponse::Error("Watcher dropped the request".into()))
        };

        let response_json = serde_json::to_string(&response)?;
        stream.write_all(response_json.as_bytes())?;
        stream.write_all(b"\n")?;
        stream.flush()?;
        Ok(())
    }
}

pub struct ControlClient;

impl ControlClient {
    pub fn send_request(request: ControlRequest) -> Result<ControlResponse> {
        let name = ControlServer::socket_name()?;
        let mut stream =
            Stream::connect(name).context("Failed to connect to the watcher. Is it running?")?;

        let request_json = serde_json::to_string(&request)?;
        stream.write_all(request_json.as_bytes())?;
        stream.write_all(b"\n")?;
        stream.flush()?;

        let mut reader = BufReader::new(stream);
        let mut response_line = String::new();
        match reader.read_line(&mut response_line) {
            Ok(0) => anyhow::bail!("Watcher closed connection without sending a response"),
            Ok(_) => {
                let response: ControlResponse = serde_json::from_str(response_line.trim_end())
                    .with_context(|| format!("Failed to parse response: {}", response_line))?;
                Ok(response)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn is_watcher_running() -> bool {
        ControlServer::is_watcher_running()
    }
}

#[cfg(test)]
#[path = "control_test.rs"]
mod control_test;
