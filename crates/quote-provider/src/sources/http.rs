use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

use papertrade_ports::QuoteError;

#[derive(Error, Debug)]
pub enum HttpError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Transport failures that no source-specific mapping claimed
impl From<HttpError> for QuoteError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Status { status, .. } if status == StatusCode::TOO_MANY_REQUESTS => {
                QuoteError::RateLimited(status.to_string())
            }
            other => QuoteError::NetworkFailure(other.to_string()),
        }
    }
}

/// JSON-over-HTTP client shared by the network-backed sources
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, QuoteError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("papertrade/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| QuoteError::NetworkFailure(e.to_string()))?;

        Ok(HttpClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` and return the status with the raw body
    ///
    /// Error statuses are not converted here: some upstreams carry their
    /// error marker in a non-2xx JSON body.
    pub async fn get_raw(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<(StatusCode, String), HttpError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self.client.get(&url).query(query).send().await?;

        let status = resp.status();
        let text = resp.text().await?;
        Ok((status, text))
    }

    /// GET `path` and decode a successful JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, HttpError> {
        let (status, text) = self.get_raw(path, query).await?;

        if !status.is_success() {
            return Err(HttpError::Status { status, body: text });
        }

        parse_json(&text)
    }
}

pub fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, HttpError> {
    serde_json::from_str(text).map_err(|e| HttpError::Parse(e.to_string()))
}

/// Percent-encode a single path segment
pub fn segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}
