use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("browser error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),

    #[error("invalid browser configuration: {0}")]
    BrowserConfig(String),

    #[error("timed out after {timeout_ms}ms waiting for \"{pattern}\"")]
    Timeout { pattern: String, timeout_ms: u64 },

    #[error("element reference is stale (page navigated since it was found)")]
    StaleElement,

    #[error("no element matches \"{pattern}\"")]
    ElementNotFound { pattern: String },

    #[error("navigation to {location} failed: {reason}")]
    Navigation { location: String, reason: String },

    #[error("login failed: {0}")]
    Login(String),
}

impl ScraperError {
    pub(crate) fn timeout(pattern: &str, timeout: std::time::Duration) -> Self {
        Self::Timeout {
            pattern: pattern.to_string(),
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }
}
