use thiserror::Error;

#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("sentiment service returned status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid sentiment service URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid sentiment response: {0}")]
    InvalidResponse(String),
}
