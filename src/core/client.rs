//! The one outbound HTTP call: `POST {"data": ...}` to the BFHL endpoint.

use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;

/// Compiled-in endpoint.  Not exposed through the CLI or the config file.
pub const ENDPOINT_URL: &str = "https://main--ra2111004010155.netlify.app/bfhl";

/// Why a submission did not produce a new response.
#[derive(Debug, thiserror::Error)]
pub enum RequestFailure {
    #[error("request to endpoint failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("endpoint answered with HTTP {0}")]
    Status(StatusCode),
}

/// Request body.  Exactly one field.
#[derive(Debug, Serialize)]
pub struct SubmitBody<'a> {
    pub data: &'a str,
}

/// Thin wrapper around a shared `reqwest::Client` bound to one URL.
///
/// Cloning is cheap (the inner client is reference counted), so each
/// in-flight submission gets its own clone.
#[derive(Debug, Clone)]
pub struct EndpointClient {
    http: reqwest::Client,
    url: String,
}

impl Default for EndpointClient {
    fn default() -> Self {
        Self::new(ENDPOINT_URL)
    }
}

impl EndpointClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send `data` and return the reply body as JSON.
    ///
    /// Any 2xx is a success.  A body that does not parse as JSON is kept as
    /// a JSON string of the raw text.  That includes JSON serde_json rejects,
    /// such as numbers beyond `f64` range (`1e400`); every selected key then
    /// projects to `null`.  No timeout, no retry.
    pub async fn post(&self, data: &str) -> Result<Value, RequestFailure> {
        tracing::trace!(url = %self.url, len = data.len(), "posting submission");
        let resp = self
            .http
            .post(&self.url)
            .json(&SubmitBody { data })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RequestFailure::Status(status));
        }

        let text = resp.text().await?;
        match serde_json::from_str(&text) {
            Ok(value) => Ok(value),
            Err(err) => {
                tracing::debug!(%err, len = text.len(), "reply is not JSON; keeping raw text");
                Ok(Value::String(text))
            }
        }
    }
}
