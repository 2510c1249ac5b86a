use std::fmt;

/// Custom error type that includes exit codes
#[derive(Debug)]
pub enum VinpanelError {
    /// No watcher reachable on the control socket (exit code 2)
    WatcherUnavailable(String),
    /// WebDriver connection failed (exit code 4)
    BrowserFailed(String),
    /// Operation timeout (exit code 5)
    Timeout(String),
    /// Generic error (exit code 1)
    Other(anyhow::Error),
}

impl VinpanelError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            VinpanelError::WatcherUnavailable(_) => 2,
            VinpanelError::BrowserFailed(_) => 4,
            VinpanelError::Timeout(_) => 5,
            VinpanelError::Other(_) => 1,
        }
    }
}

impl fmt::Display for VinpanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VinpanelError::WatcherUnavailable(msg) => {
                write!(f, "No watcher is running: {}", msg)
            }
            VinpanelError::BrowserFailed(msg) => {
                write!(f, "WebDriver connection failed: {}", msg)
            }
            VinpanelError::Timeout(msg) => {
                write!(f, "Operation timed out: {}", msg)
            }
            VinpanelError::Other(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for VinpanelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VinpanelError::Other(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for VinpanelError {
    fn from(err: anyhow::Error) -> Self {
        // Try to detect specific error types from the error message
        let msg = err.to_string();

        if msg.contains("Failed to connect to the watcher") || msg.contains("Is it running?") {
            VinpanelError::WatcherUnavailable(msg)
        } else if msg.contains("Failed to connect to WebDriver")
            || msg.contains("WebDriver")
            || msg.contains("geckodriver")
            || msg.contains("chromedriver")
        {
            VinpanelError::BrowserFailed(msg)
        } else if msg.contains("timeout") || msg.contains("timed out") {
            VinpanelError::Timeout(msg)
        } else {
            VinpanelError::Other(err)
        }
    }
}
