//! Client for an external sentiment scoring service.
//!
//! The service accepts `POST {base}/score` with `{"text": "..."}` and answers
//! `{"polarity": f64, "subjectivity": f64}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tagpulse_core::SentimentScore;

use crate::error::SentimentError;
use crate::oracle::SentimentOracle;

#[derive(Serialize)]
struct ScoreRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct ScoreResponse {
    polarity: f64,
    subjectivity: f64,
}

pub struct HttpOracle {
    client: Client,
    url: Url,
}

impl HttpOracle {
    /// # Errors
    ///
    /// Returns [`SentimentError::InvalidUrl`] if `base_url` does not parse, or
    /// [`SentimentError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, SentimentError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        let joined = format!("{}/score", base_url.trim_end_matches('/'));
        let url = Url::parse(&joined).map_err(|e| SentimentError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, url })
    }
}

#[async_trait]
impl SentimentOracle for HttpOracle {
    async fn score(&self, text: &str) -> Result<SentimentScore, SentimentError> {
        let response = self
            .client
            .post(self.url.clone())
            .json(&ScoreRequest { text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SentimentError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.url.to_string(),
            });
        }

        let body: ScoreResponse = response
            .json()
            .await
            .map_err(|e| SentimentError::InvalidResponse(e.to_string()))?;

        if !body.polarity.is_finite() || !body.subjectivity.is_finite() {
            return Err(SentimentError::InvalidResponse(
                "non-finite polarity or subjectivity".to_string(),
            ));
        }

        tracing::trace!(
            polarity = body.polarity,
            subjectivity = body.subjectivity,
            "scored text remotely"
        );
        Ok(SentimentScore::new(body.polarity, body.subjectivity))
    }
}
